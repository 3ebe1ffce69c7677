pub mod labels;
pub mod model_provider;
pub mod onnx_food_classifier;
pub mod tensor;
pub mod traits;
