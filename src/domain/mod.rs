pub mod classification;
pub mod errors;
pub mod events;
pub mod image;
pub mod persistence;
pub mod session;
