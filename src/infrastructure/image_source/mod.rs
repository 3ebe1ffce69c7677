pub mod adapter;
pub mod codec;
pub mod path_file_picker;
pub mod traits;
