pub mod artist;
pub mod cached_track;
pub mod cached_track_artist;
