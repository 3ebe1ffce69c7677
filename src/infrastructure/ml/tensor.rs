//! Model input shaping: resize to the model's fixed input and lay out as a tensor.

use crate::domain::image::entity::NormalizedTensorImage;
use image::{RgbImage, imageops::FilterType};
use ndarray::{Array, IxDyn};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorLayout {
    /// `[1, height, width, 3]`, TFLite style.
    Nhwc,
    /// `[1, 3, height, width]`, PyTorch style.
    Nchw,
}

impl FromStr for TensorLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Ok(TensorLayout::Nhwc),
            "nchw" => Ok(TensorLayout::Nchw),
            other => Err(format!("unknown tensor layout '{}', expected nhwc or nchw", other)),
        }
    }
}

impl fmt::Display for TensorLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorLayout::Nhwc => f.write_str("nhwc"),
            TensorLayout::Nchw => f.write_str("nchw"),
        }
    }
}

/// Element type of the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputElement {
    /// Raw 0..=255 bytes, for quantized models.
    U8,
    /// Floats scaled to `[0, 1]`.
    F32,
}

impl FromStr for InputElement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u8" | "uint8" => Ok(InputElement::U8),
            "f32" | "float32" => Ok(InputElement::F32),
            other => Err(format!("unknown input element '{}', expected u8 or f32", other)),
        }
    }
}

impl fmt::Display for InputElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputElement::U8 => f.write_str("u8"),
            InputElement::F32 => f.write_str("f32"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInputSpec {
    pub width: u32,
    pub height: u32,
    pub layout: TensorLayout,
    pub element: InputElement,
}

impl Default for ModelInputSpec {
    fn default() -> Self {
        Self {
            width: 192,
            height: 192,
            layout: TensorLayout::Nhwc,
            element: InputElement::U8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputData {
    U8(Vec<u8>),
    F32(Vec<f32>),
}

/// Shape plus flat data, ready for `ort::value::Value::from_array`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub shape: Vec<i64>,
    pub data: InputData,
}

pub fn build_input(image: &NormalizedTensorImage, spec: &ModelInputSpec) -> anyhow::Result<InputTensor> {
    if spec.width == 0 || spec.height == 0 {
        anyhow::bail!("model input shape {}x{} is degenerate", spec.width, spec.height);
    }

    let source = RgbImage::from_raw(image.width(), image.height(), image.rgb().to_vec())
        .ok_or_else(|| anyhow::anyhow!("normalized buffer does not match its dimensions"))?;
    let resized = if source.dimensions() == (spec.width, spec.height) {
        source
    } else {
        image::imageops::resize(&source, spec.width, spec.height, FilterType::Triangle)
    };

    let (w, h) = (spec.width as usize, spec.height as usize);
    let dims = match spec.layout {
        TensorLayout::Nhwc => [1, h, w, 3],
        TensorLayout::Nchw => [1, 3, h, w],
    };
    let shape: Vec<i64> = dims.iter().map(|&d| d as i64).collect();

    let data = match spec.element {
        InputElement::U8 => InputData::U8(fill(&resized, dims, spec.layout, |v| v).into_raw_vec()),
        InputElement::F32 => InputData::F32(
            fill(&resized, dims, spec.layout, |v| v as f32 / 255.0).into_raw_vec(),
        ),
    };

    Ok(InputTensor { shape, data })
}

fn fill<T, F>(img: &RgbImage, dims: [usize; 4], layout: TensorLayout, convert: F) -> Array<T, IxDyn>
where
    T: Clone,
    F: Fn(u8) -> T,
{
    let mut array = Array::from_elem(IxDyn(&dims), convert(0));
    for (x, y, pixel) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let value = convert(pixel[c]);
            match layout {
                TensorLayout::Nhwc => array[[0, y, x, c]] = value,
                TensorLayout::Nchw => array[[0, c, y, x]] = value,
            }
        }
    }
    array
}
