pub mod entity;
pub mod ranking;
