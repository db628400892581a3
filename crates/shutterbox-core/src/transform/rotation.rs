//! Raster rotation with bounding-box re-framing.
//!
//! Rotation is about the raster's own center, and the output canvas is
//! expanded to the rotated bounding box so no content is clipped. Positive
//! angles rotate clockwise.
//!
//! Exact quarter turns are pure index remaps and lose no pixel data. Every
//! other angle uses inverse mapping: for each output pixel, the source
//! location is found by applying the inverse rotation and sampled with
//! bilinear interpolation.

use crate::decode::resize;
use crate::decode::{DecodeError, FilterType, Raster};

/// Compute the bounding box of a raster rotated by `angle_degrees`.
///
/// Quarter turns swap or keep the dimensions exactly; other angles use the
/// rotated-rectangle formula `w' = w|cos| + h|sin|`, `h' = w|sin| + h|cos|`.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return if turns % 2 == 1 {
            (height, width)
        } else {
            (width, height)
        };
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate a raster clockwise by `angle_degrees` about its center.
///
/// Consumes the input; the output canvas is the rotated bounding box.
/// Regions of the output with no source pixel behind them are black.
pub fn rotate(raster: Raster, angle_degrees: f64) -> Raster {
    if let Some(turns) = quarter_turns(angle_degrees) {
        return rotate_quarter(raster, turns);
    }

    let (dst_w, dst_h) = compute_rotated_bounds(raster.width, raster.height, angle_degrees);

    // Inverse mapping: walk the destination and ask where each pixel came
    // from. With y pointing down, the un-negated angle rotates clockwise.
    let angle_rad = angle_degrees.to_radians();
    let (sin, cos) = angle_rad.sin_cos();

    let src_cx = raster.width as f64 / 2.0;
    let src_cy = raster.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut pixels = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 - dst_cx;
            let dy = dst_y as f64 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx;
            let src_y = dx * sin + dy * cos + src_cy;

            pixels.extend_from_slice(&sample_bilinear(&raster, src_x, src_y));
        }
    }

    Raster::new(dst_w, dst_h, pixels)
}

/// Rotate by whole quarter turns clockwise, losslessly.
pub(crate) fn rotate_quarter(raster: Raster, turns: u32) -> Raster {
    let (w, h) = (raster.width, raster.height);
    match turns % 4 {
        1 => remap(&raster, h, w, |x, y| (y, h - 1 - x)),
        2 => remap(&raster, w, h, |x, y| (w - 1 - x, h - 1 - y)),
        3 => remap(&raster, h, w, |x, y| (w - 1 - y, x)),
        _ => raster,
    }
}

/// Resize to `width`x`height`, then rotate by `angle_degrees`.
///
/// The order matters: rotating first and then resizing to literal
/// width/height would stretch the content disproportionately after a
/// quarter turn, so the scale is applied while the axes still match the
/// target.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidTarget`] if either dimension is zero.
pub fn resize_then_rotate(
    raster: Raster,
    angle_degrees: f64,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    let resized = resize(raster, width, height, filter)?;
    Ok(rotate(resized, angle_degrees))
}

/// Whole quarter turns in `angle_degrees`, if it is one.
fn quarter_turns(angle_degrees: f64) -> Option<u32> {
    let normalized = angle_degrees.rem_euclid(360.0);
    let turns = ((normalized / 90.0).round() as u32) % 4;
    let nearest = turns as f64 * 90.0;
    if (normalized - nearest).abs() < 1e-3 || (normalized - 360.0).abs() < 1e-3 {
        Some(turns)
    } else {
        None
    }
}

/// Build a raster of `dst_w`x`dst_h` where pixel (x, y) is copied from the
/// source coordinates returned by `map`.
fn remap(src: &Raster, dst_w: u32, dst_h: u32, map: impl Fn(u32, u32) -> (u32, u32)) -> Raster {
    let mut pixels = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let (src_x, src_y) = map(x, y);
            let idx = (src_y as usize * src.width as usize + src_x as usize) * 3;
            pixels.extend_from_slice(&src.pixels[idx..idx + 3]);
        }
    }
    Raster::new(dst_w, dst_h, pixels)
}

/// Sample a pixel with bilinear interpolation, black outside the source.
fn sample_bilinear(raster: &Raster, x: f64, y: f64) -> [u8; 3] {
    let (w, h) = (raster.width as i64, raster.height as i64);

    if x < 0.0 || x >= (w - 1) as f64 || y < 0.0 || y >= (h - 1) as f64 {
        return [0, 0, 0];
    }

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let at = |px: usize, py: usize| -> [f64; 3] {
        let idx = (py * raster.width as usize + px) * 3;
        [
            raster.pixels[idx] as f64,
            raster.pixels[idx + 1] as f64,
            raster.pixels[idx + 2] as f64,
        ]
    };

    let p00 = at(x0, y0);
    let p10 = at(x0 + 1, y0);
    let p01 = at(x0, y0 + 1);
    let p11 = at(x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for channel in 0..3 {
        let value = p00[channel] * (1.0 - fx) * (1.0 - fy)
            + p10[channel] * fx * (1.0 - fy)
            + p01[channel] * (1.0 - fx) * fy
            + p11[channel] * fx * fy;
        result[channel] = value.clamp(0.0, 255.0).round() as u8;
    }
    result
}
