//! Fetch-and-decode: retrieve a candidate's bytes and turn them into pixels.
//!
//! The only stage with per-candidate network I/O. Every failure mode —
//! transport error, timeout, non-2xx status, undecodable body — is caught
//! here and converted into a [`CandidateError`], so a single bad image can
//! never abort the scan.
//!
//! ## Why normalise to RGB here?
//!
//! Web images arrive as RGBA PNGs, palette GIFs, greyscale JPEGs and
//! whatever else. The captioning model wants one fixed 3-channel layout, and
//! doing the conversion at decode time means everything downstream can
//! assume it: [`DecodedImage`] cannot be constructed any other way.

use crate::error::CandidateError;
use image::RgbImage;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// An in-memory raster image, normalised to 3-channel RGB.
///
/// Owned exclusively by the pipeline: created here, handed to the captioner,
/// and dropped as soon as the caption attempt finishes.
pub struct DecodedImage {
    pixels: RgbImage,
}

impl DecodedImage {
    /// Normalise any decoded image to RGB8.
    pub fn new(image: image::DynamicImage) -> Self {
        Self {
            pixels: image.to_rgb8(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The normalised pixel buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Fetch one candidate image and decode it.
///
/// The request is bounded by the client's configured timeout
/// (`timeout_secs` is only threaded through for the error message).
pub async fn fetch_image(
    client: &Client,
    url: &Url,
    timeout_secs: u64,
) -> Result<DecodedImage, CandidateError> {
    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            CandidateError::FetchTimeout { secs: timeout_secs }
        } else {
            CandidateError::FetchFailed {
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(CandidateError::HttpStatus {
            status: response.status().as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            CandidateError::FetchTimeout { secs: timeout_secs }
        } else {
            CandidateError::FetchFailed {
                reason: e.to_string(),
            }
        }
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|e| CandidateError::DecodeFailed {
        reason: e.to_string(),
    })?;

    let img = DecodedImage::new(decoded);
    debug!("fetched {} → {}x{} px", url, img.width(), img.height());

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Luma, Rgba};

    #[test]
    fn rgba_input_is_normalised_to_rgb() {
        let rgba = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            4,
            3,
            Rgba([10, 20, 30, 128]),
        ));
        let img = DecodedImage::new(rgba);
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 3);
        assert_eq!(img.as_rgb().get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn greyscale_input_is_normalised_to_rgb() {
        let grey = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(2, 2, Luma([77])));
        let img = DecodedImage::new(grey);
        assert_eq!(img.as_rgb().get_pixel(1, 1).0, [77, 77, 77]);
    }

    #[test]
    fn undecodable_bytes_map_to_decode_failed() {
        let err = image::load_from_memory(b"<!doctype html><html>not an image")
            .map_err(|e| CandidateError::DecodeFailed {
                reason: e.to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, CandidateError::DecodeFailed { .. }));
    }
}
