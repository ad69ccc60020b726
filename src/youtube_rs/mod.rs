pub mod client;
pub mod search;
pub mod types;
