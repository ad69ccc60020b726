pub mod spotify;
pub mod track_cache;
pub mod transfer;
pub mod youtube;
