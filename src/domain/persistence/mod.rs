pub mod entity;
pub mod state;
pub mod value_objects;
