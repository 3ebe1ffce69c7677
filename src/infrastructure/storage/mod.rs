pub mod local_media_store;
pub mod png;
pub mod traits;
