//! Fixed-geometry image normalization for the character classifier.
//!
//! Order matters: grayscale, resize, orientation fix, scale, flatten. The
//! training images are stored transposed, so uploads are mirrored left to
//! right and then rotated a quarter turn counter-clockwise before scaling.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use ndarray::{Array2, ArrayView2, Axis};
use serde::Deserialize;

use crate::error::{PredictError, Result};

/// Resampling filter applied when resizing uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    /// Bicubic with a = -0.5.
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ImageNormalizer {
    width: u32,
    height: u32,
    filter: ResizeFilter,
}

impl ImageNormalizer {
    pub fn new(width: u32, height: u32, filter: ResizeFilter) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PredictError::Validation(format!(
                "target geometry must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            filter,
        })
    }

    /// Length of every vector this normalizer produces.
    pub fn output_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Decode an uploaded file and normalize it.
    pub fn normalize_bytes(&self, bytes: &[u8]) -> Result<Vec<f64>> {
        if bytes.is_empty() {
            return Err(PredictError::InvalidImage("upload is empty".to_string()));
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| PredictError::InvalidImage(format!("could not decode image: {e}")))?;
        self.normalize(&image)
    }

    pub fn normalize(&self, image: &DynamicImage) -> Result<Vec<f64>> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PredictError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let gray = to_luma(image);
        let resized = imageops::resize(&gray, self.width, self.height, self.filter.into());

        let grid = Array2::from_shape_vec(
            (self.height as usize, self.width as usize),
            resized.into_raw(),
        )
        .map_err(|e| PredictError::Internal(format!("pixel grid reshape failed: {e}")))?;

        Ok(scale_and_flatten(correct_orientation(grid.view())))
    }
}

/// 8-bit luma with the ITU-R 601-2 weights used when the dataset was built.
fn to_luma(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }
    let rgb = image.to_rgb8();
    ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let l = (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
        Luma([l as u8])
    })
}

/// Mirror left-right.
pub fn flip_horizontal<T>(mut grid: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    grid.invert_axis(Axis(1));
    grid
}

/// Quarter turn counter-clockwise: the last column becomes the first row.
pub fn rotate_ccw<T>(grid: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    let mut rotated = grid.reversed_axes();
    rotated.invert_axis(Axis(0));
    rotated
}

/// Undo the dataset's storage convention: flip, then rotate.
pub fn correct_orientation<T>(grid: ArrayView2<'_, T>) -> ArrayView2<'_, T> {
    rotate_ccw(flip_horizontal(grid))
}

/// Map intensities to [0, 1] and read the grid out row-major.
fn scale_and_flatten(grid: ArrayView2<'_, u8>) -> Vec<f64> {
    grid.iter().map(|&p| f64::from(p) / 255.0).collect()
}
