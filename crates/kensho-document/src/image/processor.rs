// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, grayscale, edge magnitude, rotation about the
// centre, contrast, unsharp mask, median denoise, and re-encode. Operates on
// in-memory images using the `image` and `imageproc` crates.

use image::{DynamicImage, GrayImage, ImageError, ImageFormat, Luma, Rgba, RgbaImage};
use imageproc::definitions::Image;
use imageproc::filter::{gaussian_blur_f32, median_filter};
use imageproc::geometric_transformations::{self, Interpolation};
use imageproc::gradients::sobel_gradients;
use kensho_core::error::KenshoError;
use tracing::{debug, instrument};

/// Sobel gradient magnitude of a grayscale image.
pub type EdgeImage = Image<Luma<u16>>;

/// Image processing pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor` wrapping
/// the transformed image, enabling method chaining.
///
/// ```ignore
/// let png = ImageProcessor::decode(&bytes, Some(ImageFormat::Jpeg))?
///     .rotate_about_center(2.4, Rgba([0, 0, 0, 0]))
///     .adjust_contrast(1.5)
///     .unsharp_mask(1.0, 1.2)
///     .median_denoise(1)
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw bytes, using `format` when the container is known and
    /// content sniffing otherwise.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8], format: Option<ImageFormat>) -> Result<Self, ImageError> {
        let img = match format {
            Some(format) => image::load_from_memory_with_format(data, format)?,
            None => image::load_from_memory(data)?,
        };
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Derived images (borrow self) -----------------------------------------

    /// Luma conversion of the current image.
    pub fn grayscale(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Sobel gradient magnitude of the grayscale image. Used for skew
    /// estimation only; never part of the output.
    #[instrument(skip(self))]
    pub fn edge_magnitude(&self) -> EdgeImage {
        sobel_gradients(&self.grayscale())
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Rotate clockwise by `degrees` about the image centre, keeping the
    /// canvas size. Content leaving the canvas is clipped; exposed corners
    /// are filled with `background`.
    #[instrument(skip(self, background), fields(degrees))]
    pub fn rotate_about_center(self, degrees: f32, background: Rgba<u8>) -> Self {
        let rgba = self.image.to_rgba8();
        let rotated: RgbaImage = geometric_transformations::rotate_about_center(
            &rgba,
            degrees.to_radians(),
            Interpolation::Bilinear,
            background,
        );
        debug!("Rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Adjust contrast by a factor. Values > 1.0 increase contrast; values
    /// < 1.0 decrease it. A value of 1.0 is a no-op.
    #[instrument(skip(self), fields(factor))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        let rgba = self.image.to_rgba8();

        let contrasted = RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let adjust = |channel: u8| -> u8 {
                let val = factor * (channel as f32 - 128.0) + 128.0;
                val.clamp(0.0, 255.0) as u8
            };
            Rgba([adjust(r), adjust(g), adjust(b), a])
        });

        Self {
            image: DynamicImage::ImageRgba8(contrasted),
        }
    }

    /// Unsharp mask: `out = in + amount * (in - gaussian(in, radius))` on the
    /// colour channels. Alpha is left untouched. A radius that is not a
    /// positive finite number leaves the image as is.
    #[instrument(skip(self), fields(radius, amount))]
    pub fn unsharp_mask(self, radius: f32, amount: f32) -> Self {
        if !(radius.is_finite() && radius > 0.0) {
            debug!("Sharpening skipped for non-positive radius");
            return self;
        }
        let rgba = self.image.to_rgba8();
        let blurred = gaussian_blur_f32(&rgba, radius);

        let sharpened = RgbaImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let Rgba([br, bg, bb, _]) = *blurred.get_pixel(x, y);
            let apply = |orig: u8, blur: u8| -> u8 {
                let detail = orig as f32 - blur as f32;
                (orig as f32 + amount * detail).round().clamp(0.0, 255.0) as u8
            };
            Rgba([apply(r, br), apply(g, bg), apply(b, bb), a])
        });

        Self {
            image: DynamicImage::ImageRgba8(sharpened),
        }
    }

    /// Median filter over a `(2 * radius + 1)` square window.
    #[instrument(skip(self), fields(radius))]
    pub fn median_denoise(self, radius: u32) -> Self {
        let rgba = self.image.to_rgba8();
        let filtered = median_filter(&rgba, radius, radius);
        Self {
            image: DynamicImage::ImageRgba8(filtered),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, KenshoError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| KenshoError::ImageEncode(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, KenshoError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| KenshoError::ImageEncode(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Rotate an edge-magnitude image clockwise about its centre without resizing
/// the canvas; exposed regions are zero.
pub fn rotate_edges(edges: &EdgeImage, degrees: f32) -> EdgeImage {
    geometric_transformations::rotate_about_center(
        edges,
        degrees.to_radians(),
        Interpolation::Bilinear,
        Luma([0u16]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_split(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, _| {
            if x < width / 2 { Luma([20u8]) } else { Luma([230u8]) }
        }))
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        assert!(ImageProcessor::decode(b"%PDF-1.7 not an image", None).is_err());
        assert!(ImageProcessor::decode(b"", Some(ImageFormat::Png)).is_err());
    }

    #[test]
    fn png_bytes_decode_back() {
        let processor = ImageProcessor::from_dynamic(half_split(12, 8));
        let png = processor.to_png_bytes().unwrap();
        let decoded = ImageProcessor::decode(&png, Some(ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 8));
    }

    #[test]
    fn jpeg_bytes_carry_jpeg_magic() {
        let jpeg = ImageProcessor::from_dynamic(half_split(16, 16))
            .to_jpeg_bytes(90)
            .unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn edge_magnitude_peaks_on_the_boundary() {
        let edges = ImageProcessor::from_dynamic(half_split(20, 10)).edge_magnitude();
        assert_eq!(edges.dimensions(), (20, 10));
        assert_eq!(edges.get_pixel(2, 5).0[0], 0);
        assert!(edges.get_pixel(10, 5).0[0] > 0);
    }

    #[test]
    fn rotation_keeps_canvas_and_fills_corners() {
        let white = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            40,
            30,
            Rgba([255, 255, 255, 255]),
        ));
        let rotated = ImageProcessor::from_dynamic(white)
            .rotate_about_center(10.0, Rgba([0, 0, 0, 0]))
            .into_dynamic()
            .to_rgba8();
        assert_eq!(rotated.dimensions(), (40, 30));
        assert_eq!(*rotated.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*rotated.get_pixel(20, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn contrast_stretches_around_mid_grey() {
        let grey = DynamicImage::ImageLuma8(GrayImage::from_fn(2, 1, |x, _| {
            if x == 0 { Luma([100u8]) } else { Luma([160u8]) }
        }));
        let out = ImageProcessor::from_dynamic(grey)
            .adjust_contrast(1.5)
            .into_dynamic()
            .to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0[0], 86);
        assert_eq!(out.get_pixel(1, 0).0[0], 176);
    }

    #[test]
    fn unsharp_mask_leaves_flat_regions_alone() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(9, 9, Luma([120u8])));
        let out = ImageProcessor::from_dynamic(flat)
            .unsharp_mask(1.0, 1.2)
            .into_dynamic()
            .to_rgba8();
        assert!(
            out.pixels()
                .all(|p| p.0[0].abs_diff(120) <= 1 && p.0[3] == 255)
        );
    }

    #[test]
    fn unsharp_mask_with_zero_radius_is_a_no_op() {
        let mut img = GrayImage::from_pixel(5, 5, Luma([40u8]));
        img.put_pixel(2, 2, Luma([210u8]));
        let original = DynamicImage::ImageLuma8(img);
        let out = ImageProcessor::from_dynamic(original.clone())
            .unsharp_mask(0.0, 1.2)
            .into_dynamic();
        assert_eq!(out, original);
    }

    #[test]
    fn median_removes_isolated_pixel() {
        let mut img = GrayImage::from_pixel(7, 7, Luma([200u8]));
        img.put_pixel(3, 3, Luma([0u8]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .median_denoise(1)
            .into_dynamic()
            .to_luma8();
        assert_eq!(out.get_pixel(3, 3).0[0], 200);
    }

    #[test]
    fn rotated_edges_keep_canvas_and_zero_corners() {
        let edges = ImageProcessor::from_dynamic(half_split(32, 24)).edge_magnitude();
        let rotated = rotate_edges(&edges, -8.0);
        assert_eq!(rotated.dimensions(), (32, 24));
        assert_eq!(rotated.get_pixel(0, 0).0[0], 0);
        assert!(rotated.pixels().any(|p| p.0[0] > 0));
    }
}
