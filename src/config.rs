//! Application configuration loading from environment variables.
//!
//! Values come from the process environment (a `.env` file is honoured by
//! [`Config::from_env`]), with defaults for everything so a bare checkout
//! starts up with the bundled model paths.
//!
//! # Environment Variables
//!
//! - `FOOD_MODEL_PATH`: ONNX classifier (default: "./models/food_model.onnx")
//! - `FOOD_LABELS_PATH`: category names, one per output (default: "./models/food_labels.txt")
//! - `ENABLE_CLASSIFICATION`: load the model at all (default: true)
//! - `MODEL_INPUT_WIDTH` / `MODEL_INPUT_HEIGHT`: model input size (default: 192)
//! - `MODEL_INPUT_LAYOUT`: `nhwc` or `nchw` (default: "nhwc")
//! - `MODEL_INPUT_ELEMENT`: `u8` or `f32` (default: "u8")
//! - `MEDIA_STORE_DIR`: where saved images go (default: "./media/Pictures")
//! - `SEARCH_BASE_URL`: web search used for labels (default: "https://www.google.com/search")
//! - `RUST_LOG`: logging filter (default: "info,food_lens=debug")

use crate::infrastructure::ml::{
    model_provider::ModelSettings,
    tensor::{InputElement, ModelInputSpec, TensorLayout},
};
use serde::Deserialize;
use std::path::PathBuf;

/// Complete pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the ONNX food classifier
    pub food_model_path: String,

    /// Path to the label file, in model output order
    pub food_labels_path: String,

    /// When false every classification fails with an inference error
    pub enable_classification: bool,

    pub model_input_width: u32,
    pub model_input_height: u32,

    /// `nhwc` or `nchw`
    pub model_input_layout: String,

    /// `u8` for quantized models, `f32` for float models
    pub model_input_element: String,

    /// Root directory of the media collection
    pub media_store_dir: String,

    /// Base URL for "search this label" links
    pub search_base_url: String,
}

impl Config {
    /// Load configuration from the environment, after reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            food_model_path: env_or(&lookup, "FOOD_MODEL_PATH", "./models/food_model.onnx".to_string())?,
            food_labels_path: env_or(
                &lookup,
                "FOOD_LABELS_PATH",
                "./models/food_labels.txt".to_string(),
            )?,
            enable_classification: env_or(&lookup, "ENABLE_CLASSIFICATION", true)?,
            model_input_width: env_or(&lookup, "MODEL_INPUT_WIDTH", 192)?,
            model_input_height: env_or(&lookup, "MODEL_INPUT_HEIGHT", 192)?,
            model_input_layout: env_or(&lookup, "MODEL_INPUT_LAYOUT", "nhwc".to_string())?,
            model_input_element: env_or(&lookup, "MODEL_INPUT_ELEMENT", "u8".to_string())?,
            media_store_dir: env_or(&lookup, "MEDIA_STORE_DIR", "./media/Pictures".to_string())?,
            search_base_url: env_or(
                &lookup,
                "SEARCH_BASE_URL",
                "https://www.google.com/search".to_string(),
            )?,
        };

        if config.model_input_width == 0 || config.model_input_height == 0 {
            anyhow::bail!("MODEL_INPUT_WIDTH and MODEL_INPUT_HEIGHT must be non-zero");
        }
        // Surface bad layout/element strings at startup rather than first use.
        config.model_input()?;

        Ok(config)
    }

    pub fn model_input(&self) -> anyhow::Result<ModelInputSpec> {
        let layout: TensorLayout = self
            .model_input_layout
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse MODEL_INPUT_LAYOUT: {}", e))?;
        let element: InputElement = self
            .model_input_element
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse MODEL_INPUT_ELEMENT: {}", e))?;

        Ok(ModelInputSpec {
            width: self.model_input_width,
            height: self.model_input_height,
            layout,
            element,
        })
    }

    pub fn model_settings(&self) -> anyhow::Result<ModelSettings> {
        Ok(ModelSettings {
            enabled: self.enable_classification,
            model_path: PathBuf::from(&self.food_model_path),
            labels_path: PathBuf::from(&self.food_labels_path),
            input: self.model_input()?,
        })
    }
}

/// Load a variable through `lookup`, falling back to `default` when unset.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        None => Ok(default),
    }
}
