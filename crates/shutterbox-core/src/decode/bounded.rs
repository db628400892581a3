//! Budgeted decoding with a measure-then-subsample strategy.
//!
//! Decoding an image of unknown dimensions at full resolution is the single
//! largest memory risk in the pipeline. The bounded modes here measure the
//! source first (header only, no pixel buffer), pick a subsample factor that
//! lands the decode at or near the caller's budget, and only then read pixel
//! data.
//!
//! The underlying decoder has no subsampled read, so a factor-`s` decode
//! materializes the frame once and immediately point-samples it down; the
//! full buffer is dropped before the function returns, and every later stage
//! works on the reduced raster.

use image::ImageReader;

use super::probe::probe_dimensions;
use super::resize::resize;
use super::{DecodeBudget, DecodeError, FilterType, ImageDimensions, Raster};
use crate::resource::ImageResource;

/// Edge length used by display-sized decodes when the caller has no better
/// number.
pub const DEFAULT_DISPLAY_EDGE: u32 = 600;

/// Decode `resource` at full resolution.
///
/// # Errors
///
/// Returns [`DecodeError::ResourceNotFound`] for a missing resource and
/// [`DecodeError::DecodeFailed`] if the codec rejects the bytes.
pub fn decode_full(resource: &ImageResource) -> Result<Raster, DecodeError> {
    decode_at_sample_size(resource, 1)
}

/// Decode `resource`, keeping the decoded pixel count at or near
/// `max_pixels`.
///
/// Two passes: the dimensions are measured first, then the image is decoded
/// at the largest subsample factor that still yields more pixels than the
/// budget, and finally resized down to the exact aspect-preserving target.
/// Sources already within budget decode at full resolution, untouched.
///
/// Every failure is absorbed: the error is logged and `None` is returned.
/// Callers must treat an absent raster as the failure signal.
pub fn decode_within_pixel_budget(resource: &ImageResource, max_pixels: u32) -> Option<Raster> {
    match pixel_budget_decode(resource, max_pixels) {
        Ok(raster) => Some(raster),
        Err(err) => {
            log::error!("budgeted decode failed: {err}");
            None
        }
    }
}

fn pixel_budget_decode(
    resource: &ImageResource,
    max_pixels: u32,
) -> Result<Raster, DecodeError> {
    let dims = probe_dimensions(resource)?;
    let sample = sample_size_for_budget(dims, max_pixels);

    if sample > 1 {
        // Decode one step above the budget, then do the one precise resize
        // on the already-reduced buffer.
        let coarse = decode_at_sample_size(resource, sample - 1)?;
        let (w, h) = (coarse.width as f64, coarse.height as f64);
        let target_h = (max_pixels as f64 / (w / h)).sqrt();
        let target_w = (target_h / h) * w;
        resize(coarse, target_w as u32, target_h as u32, FilterType::Bilinear)
    } else {
        decode_at_sample_size(resource, 1)
    }
}

/// Smallest factor whose subsampled pixel count fits under `max_pixels`.
///
/// The search is linear, not a power-of-two ladder: factors step by one
/// until `width*height / s^2` drops to the budget.
fn sample_size_for_budget(dims: ImageDimensions, max_pixels: u32) -> u32 {
    let total = dims.pixel_count() as f64;
    let mut sample = 1u32;
    while total / (sample as f64 * sample as f64) > max_pixels as f64 {
        sample += 1;
    }
    sample
}

/// Decode `resource` at a sample size derived from requested dimensions.
///
/// This is the approximate mode: the sample size is `base_sample_size`
/// multiplied by the truncating ratio of the shorter source axis to its
/// requested bound, so the result lands on a multiple-of-sample-size
/// rendition near the request, not necessarily within it. For a request of
/// 1080:
///
/// * source width 1200 stays 1200 (sample size 1)
/// * source width 2200 becomes 1100 (sample size 2)
/// * source width 2160 becomes 1080 (sample size 2)
///
/// There is no secondary resize. Callers needing an exact bound use
/// [`decode_within_pixel_budget`] instead.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidTarget`] if either requested dimension is
/// zero, and the usual not-found/decode errors otherwise.
pub fn decode_approx_dimensions(
    resource: &ImageResource,
    base_sample_size: u32,
    width: u32,
    height: u32,
) -> Result<Raster, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidTarget { width, height });
    }
    let dims = probe_dimensions(resource)?;
    let sample = approx_sample_size(dims, base_sample_size, width, height);
    decode_at_sample_size(resource, sample)
}

/// Truncating sample-size arithmetic of the approximate mode.
///
/// Factors below 1 decode at full resolution.
fn approx_sample_size(dims: ImageDimensions, base: u32, width: u32, height: u32) -> u32 {
    let mut sample = base.max(1);
    if dims.height > height || dims.width > width {
        let factor = if dims.width > dims.height {
            dims.height / height
        } else {
            dims.width / width
        };
        sample = sample.saturating_mul(factor).max(1);
    }
    sample
}

/// Decode `resource` for display, halving until at least one edge fits
/// under `required_edge`.
///
/// The factor doubles, so the result is a power-of-two reduction of the
/// source. Failures are absorbed the same way as in
/// [`decode_within_pixel_budget`]: logged, `None` returned.
pub fn decode_fit_edge(resource: &ImageResource, required_edge: u32) -> Option<Raster> {
    match fit_edge_decode(resource, required_edge) {
        Ok(raster) => Some(raster),
        Err(err) => {
            log::error!("display-sized decode failed: {err}");
            None
        }
    }
}

fn fit_edge_decode(resource: &ImageResource, required_edge: u32) -> Result<Raster, DecodeError> {
    let dims = probe_dimensions(resource)?;
    let mut sample = 1u32;
    while dims.width / sample > required_edge && dims.height / sample > required_edge {
        sample *= 2;
    }
    decode_at_sample_size(resource, sample)
}

/// Dispatch over a [`DecodeBudget`].
///
/// `MaxPixelCount` routes through [`decode_within_pixel_budget`]; its
/// absorbed failure surfaces here as [`DecodeError::DecodeFailed`]. Callers
/// that want the absent-raster signal of that mode call it directly.
pub fn decode_with_budget(
    resource: &ImageResource,
    budget: &DecodeBudget,
) -> Result<Raster, DecodeError> {
    match *budget {
        DecodeBudget::Unbounded => decode_full(resource),
        DecodeBudget::MaxPixelCount(max_pixels) => decode_within_pixel_budget(resource, max_pixels)
            .ok_or_else(|| DecodeError::DecodeFailed("budgeted decode produced no raster".into())),
        DecodeBudget::ApproxDimensions {
            base_sample_size,
            width,
            height,
        } => decode_approx_dimensions(resource, base_sample_size, width, height),
    }
}

fn decode_at_sample_size(resource: &ImageResource, sample: u32) -> Result<Raster, DecodeError> {
    let reader = resource.open()?;
    let img = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|err| DecodeError::Io(err.to_string()))?
        .decode()
        .map_err(|err| DecodeError::DecodeFailed(err.to_string()))?;
    // The full frame lives only until the subsampled copy exists.
    let full = Raster::from_rgb_image(img.into_rgb8());
    Ok(subsample(full, sample))
}

/// Keep every `sample`-th pixel along both axes.
///
/// Output dimensions round up: a 5x5 input at factor 2 yields 3x3.
fn subsample(raster: Raster, sample: u32) -> Raster {
    if sample <= 1 {
        return raster;
    }
    let out_w = raster.width.div_ceil(sample);
    let out_h = raster.height.div_ceil(sample);
    let mut pixels = Vec::with_capacity(out_w as usize * out_h as usize * 3);
    for y in (0..raster.height as usize).step_by(sample as usize) {
        for x in (0..raster.width as usize).step_by(sample as usize) {
            let idx = (y * raster.width as usize + x) * 3;
            pixels.extend_from_slice(&raster.pixels[idx..idx + 3]);
        }
    }
    Raster::new(out_w, out_h, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{gradient_raster, jpeg_bytes};

    fn jpeg_resource(width: u32, height: u32) -> ImageResource {
        ImageResource::from_bytes(jpeg_bytes(&gradient_raster(width, height)))
    }

    #[test]
    fn test_decode_full_preserves_dimensions() {
        let raster = decode_full(&jpeg_resource(100, 50)).unwrap();
        assert_eq!((raster.width, raster.height), (100, 50));
    }

    #[test]
    fn test_decode_full_missing_resource() {
        let resource = ImageResource::from_path("/gone/img.jpg");
        assert!(matches!(
            decode_full(&resource),
            Err(DecodeError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn test_budget_larger_than_source_keeps_full_resolution() {
        let raster = decode_within_pixel_budget(&jpeg_resource(100, 50), 10_000).unwrap();
        assert_eq!((raster.width, raster.height), (100, 50));
    }

    #[test]
    fn test_budget_smaller_than_source_resizes_to_exact_target() {
        // 64x48 = 3072 pixels against a 500 pixel budget. The search stops
        // at factor 3, backs off to 2 (32x24), and the precise resize lands
        // on the truncated sqrt targets.
        let raster = decode_within_pixel_budget(&jpeg_resource(64, 48), 500).unwrap();
        assert_eq!((raster.width, raster.height), (25, 19));
        assert!(raster.pixel_count() <= 500);
    }

    #[test]
    fn test_budget_decode_absorbs_missing_resource() {
        crate::testkit::init_test_logging();
        let resource = ImageResource::from_path("/gone/img.jpg");
        assert!(decode_within_pixel_budget(&resource, 10_000).is_none());
    }

    #[test]
    fn test_budget_decode_absorbs_garbage() {
        let resource = ImageResource::from_bytes(vec![1, 2, 3]);
        assert!(decode_within_pixel_budget(&resource, 10_000).is_none());
    }

    #[test]
    fn test_approx_decode_exact_multiple() {
        // 40x30 against a 20x15 request: the landscape source picks the
        // height ratio, 30/15 = 2.
        let raster = decode_approx_dimensions(&jpeg_resource(40, 30), 1, 20, 15).unwrap();
        assert_eq!((raster.width, raster.height), (20, 15));
    }

    #[test]
    fn test_approx_decode_may_overshoot_request() {
        // 45x30 against a 20x20 request: the height ratio truncates to 1,
        // so the result stays above the requested bound.
        let raster = decode_approx_dimensions(&jpeg_resource(45, 30), 1, 20, 20).unwrap();
        assert_eq!((raster.width, raster.height), (45, 30));
    }

    #[test]
    fn test_approx_decode_honors_base_sample_size() {
        let raster = decode_approx_dimensions(&jpeg_resource(40, 30), 2, 100, 100).unwrap();
        // Source within the request; only the base factor applies.
        assert_eq!((raster.width, raster.height), (20, 15));
    }

    #[test]
    fn test_approx_decode_zero_target_is_error() {
        assert!(matches!(
            decode_approx_dimensions(&jpeg_resource(10, 10), 1, 0, 10),
            Err(DecodeError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_approx_sample_size_documented_examples() {
        // The 1080 examples from the approximate-mode contract.
        let request = (1080, 1080);
        assert_eq!(
            approx_sample_size(ImageDimensions::new(1200, 1300), 1, request.0, request.1),
            1
        );
        assert_eq!(
            approx_sample_size(ImageDimensions::new(2200, 2400), 1, request.0, request.1),
            2
        );
        assert_eq!(
            approx_sample_size(ImageDimensions::new(2160, 2160), 1, request.0, request.1),
            2
        );
    }

    #[test]
    fn test_approx_sample_size_truncated_zero_clamps_to_one() {
        // Width exceeds the request but the height ratio truncates to zero.
        let dims = ImageDimensions::new(1200, 900);
        assert_eq!(approx_sample_size(dims, 1, 1080, 1080), 1);
    }

    #[test]
    fn test_fit_edge_power_of_two_reduction() {
        // 64x48 with a 16 edge: 1 -> 2 -> 4 and stop once one edge fits.
        let raster = decode_fit_edge(&jpeg_resource(64, 48), 16).unwrap();
        assert_eq!((raster.width, raster.height), (16, 12));
    }

    #[test]
    fn test_fit_edge_small_source_untouched() {
        let raster = decode_fit_edge(&jpeg_resource(30, 20), DEFAULT_DISPLAY_EDGE).unwrap();
        assert_eq!((raster.width, raster.height), (30, 20));
    }

    #[test]
    fn test_fit_edge_absorbs_missing_resource() {
        let resource = ImageResource::from_path("/gone/img.jpg");
        assert!(decode_fit_edge(&resource, 600).is_none());
    }

    #[test]
    fn test_decode_with_budget_dispatch() {
        let resource = jpeg_resource(64, 48);

        let full = decode_with_budget(&resource, &DecodeBudget::Unbounded).unwrap();
        assert_eq!((full.width, full.height), (64, 48));

        let bounded =
            decode_with_budget(&resource, &DecodeBudget::MaxPixelCount(500)).unwrap();
        assert!(bounded.pixel_count() <= 500);

        let approx = decode_with_budget(
            &resource,
            &DecodeBudget::ApproxDimensions {
                base_sample_size: 1,
                width: 32,
                height: 24,
            },
        )
        .unwrap();
        assert_eq!((approx.width, approx.height), (32, 24));
    }

    #[test]
    fn test_decode_with_budget_surfaces_absorbed_failure() {
        let resource = ImageResource::from_bytes(vec![0xFF]);
        assert!(matches!(
            decode_with_budget(&resource, &DecodeBudget::MaxPixelCount(100)),
            Err(DecodeError::DecodeFailed(_))
        ));
    }

    #[test]
    fn test_subsample_rounds_up() {
        let raster = gradient_raster(5, 5);
        let reduced = subsample(raster, 2);
        assert_eq!((reduced.width, reduced.height), (3, 3));
    }

    #[test]
    fn test_subsample_keeps_corner_pixels() {
        let raster = gradient_raster(8, 8);
        let top_left = raster.pixels[..3].to_vec();
        let reduced = subsample(raster, 4);
        assert_eq!((reduced.width, reduced.height), (2, 2));
        assert_eq!(&reduced.pixels[..3], top_left.as_slice());
    }
}
