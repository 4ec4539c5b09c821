//! Image processing implementation
//!
//! Handles the actual image transformation: decode → cover crop → resize → encode

use fast_image_resize::{FilterType, Image, PixelType, ResizeAlg, Resizer};
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::io::Cursor;
use std::num::NonZeroU32;

use super::encoder::EncoderFactory;
use super::error::ImageError;
use super::params::{FitPolicy, OutputFormat, TransformRequest};
use super::security::{validate_dimensions, validate_file_size};
use crate::config::SourceLimits;

/// Result of image processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    /// The encoded image data
    pub data: Vec<u8>,
    pub format: OutputFormat,
    /// Original dimensions (width, height)
    pub original_size: (u32, u32),
    /// Output dimensions (width, height)
    pub output_size: (u32, u32),
}

/// Source region to keep and the size it is scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CoverPlan {
    pub crop_x: u32,
    pub crop_y: u32,
    pub crop_width: u32,
    pub crop_height: u32,
    pub output_width: u32,
    pub output_height: u32,
}

impl CoverPlan {
    fn needs_resize(&self) -> bool {
        self.crop_width != self.output_width || self.crop_height != self.output_height
    }
}

/// Decode, fit and re-encode `data` as described by `request`
pub fn process_image(
    data: &[u8],
    request: &TransformRequest,
    limits: &SourceLimits,
) -> Result<ProcessedImage, ImageError> {
    if request.width == 0 || request.height == 0 {
        return Err(ImageError::resize_failed("Target dimensions must be positive"));
    }

    // 1. Reject oversized sources before decoding
    validate_file_size(data.len(), limits)?;
    let (header_width, header_height) = header_dimensions(data)?;
    validate_dimensions(header_width, header_height, limits)?;

    // 2. Decode the image
    let img = decode_image(data)?;
    let src_width = img.width();
    let src_height = img.height();

    // 3. Fit into the target box
    let plan = match request.fit {
        FitPolicy::Cover => plan_cover(src_width, src_height, request.width, request.height),
    };
    let cropped = if plan.crop_width == src_width && plan.crop_height == src_height {
        img
    } else {
        img.crop_imm(plan.crop_x, plan.crop_y, plan.crop_width, plan.crop_height)
    };
    let fitted = if plan.needs_resize() {
        resize_image(&cropped, plan.output_width, plan.output_height)?
    } else {
        cropped
    };

    // 4. Encode to target format
    let encoder = EncoderFactory::create(request.format);
    let rgba_data = fitted.to_rgba8().into_raw();
    let encoded = encoder.encode(
        &rgba_data,
        plan.output_width,
        plan.output_height,
        request.quality,
    )?;

    Ok(ProcessedImage {
        data: encoded.data,
        format: encoded.format,
        original_size: (src_width, src_height),
        output_size: (plan.output_width, plan.output_height),
    })
}

/// Read width and height from the image header only
fn header_dimensions(data: &[u8]) -> Result<(u32, u32), ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Decode image data into a DynamicImage (first frame for animations)
fn decode_image(data: &[u8]) -> Result<DynamicImage, ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageError::decode_failed(e.to_string()))?
        .decode()
        .map_err(|e| ImageError::decode_failed(e.to_string()))
}

/// Plan a centered cover fit of `src` into `dst` without enlargement.
///
/// The kept region is the largest centered rectangle with the target aspect
/// ratio. When that region is at least as large as the target it is scaled
/// down to exactly `dst`. Otherwise scaling would enlarge, so the output is
/// the centered `min(dst, src)` crop at native resolution.
pub(crate) fn plan_cover(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> CoverPlan {
    let (sw, sh, dw, dh) = (src_w as u64, src_h as u64, dst_w as u64, dst_h as u64);

    let (region_w, region_h) = if sw * dh > sh * dw {
        // Source is wider than the target: keep full height
        let w = ((sh * dw + dh / 2) / dh).clamp(1, sw);
        (w as u32, src_h)
    } else {
        let h = ((sw * dh + dw / 2) / dw).clamp(1, sh);
        (src_w, h as u32)
    };

    if region_w >= dst_w && region_h >= dst_h {
        CoverPlan {
            crop_x: (src_w - region_w) / 2,
            crop_y: (src_h - region_h) / 2,
            crop_width: region_w,
            crop_height: region_h,
            output_width: dst_w,
            output_height: dst_h,
        }
    } else {
        let width = dst_w.min(src_w);
        let height = dst_h.min(src_h);
        CoverPlan {
            crop_x: (src_w - width) / 2,
            crop_y: (src_h - height) / 2,
            crop_width: width,
            crop_height: height,
            output_width: width,
            output_height: height,
        }
    }
}

/// Resize image using fast-image-resize with Lanczos3 filter
fn resize_image(
    img: &DynamicImage,
    target_w: u32,
    target_h: u32,
) -> Result<DynamicImage, ImageError> {
    let src_width = NonZeroU32::new(img.width())
        .ok_or_else(|| ImageError::resize_failed("Source width is 0"))?;
    let src_height = NonZeroU32::new(img.height())
        .ok_or_else(|| ImageError::resize_failed("Source height is 0"))?;
    let dst_width =
        NonZeroU32::new(target_w).ok_or_else(|| ImageError::resize_failed("Target width is 0"))?;
    let dst_height =
        NonZeroU32::new(target_h).ok_or_else(|| ImageError::resize_failed("Target height is 0"))?;

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.to_rgba8().into_raw(),
        PixelType::U8x4,
    )
    .map_err(|e| ImageError::resize_failed(format!("Failed to create source image: {:?}", e)))?;

    let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x4);

    let mut resizer = Resizer::new(ResizeAlg::Convolution(FilterType::Lanczos3));

    resizer
        .resize(&src_image.view(), &mut dst_image.view_mut())
        .map_err(|e| ImageError::resize_failed(format!("Resize operation failed: {:?}", e)))?;

    let rgba_image = image::RgbaImage::from_raw(target_w, target_h, dst_image.into_vec())
        .ok_or_else(|| ImageError::resize_failed("Failed to create output image buffer"))?;

    Ok(DynamicImage::ImageRgba8(rgba_image))
}
