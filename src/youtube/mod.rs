pub mod duration;
pub mod metadata;
pub mod thumbnail;
pub mod video_id;
