pub mod image_source;
pub mod ml;
pub mod platform;
pub mod preprocess;
pub mod storage;
