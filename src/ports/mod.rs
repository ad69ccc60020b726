pub mod spotify;
pub mod track_cache;
pub mod youtube;
