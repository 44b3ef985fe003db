//! Image filters used by the roughness and metallic generators.
//!
//! All filters take and return 8-bit images so every stage is re-quantized
//! the same way a typical 8-bit imaging pipeline would be.

use image::{GrayImage, Luma};

use crate::color::{Hsv8, HsvImage};
use crate::convolve::sobel_gradients;
use crate::field::IntensityField;

/// Binomial weights of the 5-tap Gaussian (sigma derived from the kernel size).
const GAUSSIAN_5: [u32; 5] = [1, 4, 6, 4, 1];
/// Sum of `GAUSSIAN_5`.
const GAUSSIAN_5_SUM: u32 = 16;

/// Mirror an index into `0..n` without repeating the border pixel
/// (`dcb|abcd|cba`).
#[inline]
fn reflect_101(i: i64, n: u32) -> u32 {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as i64 - 1);
    let i = i.rem_euclid(period);
    if i >= n as i64 {
        (period - i) as u32
    } else {
        i as u32
    }
}

/// Gaussian blur with a fixed 5x5 kernel and reflect-101 borders.
///
/// The kernel is the separable outer product of `[1, 4, 6, 4, 1] / 16`.
/// Accumulation is exact in integers and rounded to nearest once at the end.
pub fn gaussian_blur_5x5(img: &GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let src = img.as_raw();
    let wu = w as usize;

    // Horizontal pass (scaled by 16)
    let mut tmp = vec![0u32; src.len()];
    for y in 0..h as usize {
        let row = &src[y * wu..(y + 1) * wu];
        for x in 0..wu {
            let mut sum = 0u32;
            for (k, &weight) in GAUSSIAN_5.iter().enumerate() {
                let sx = reflect_101(x as i64 + k as i64 - 2, w) as usize;
                sum += weight * u32::from(row[sx]);
            }
            tmp[y * wu + x] = sum;
        }
    }

    // Vertical pass (scaled by 256 overall)
    let total = GAUSSIAN_5_SUM * GAUSSIAN_5_SUM;
    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u32;
            for (k, &weight) in GAUSSIAN_5.iter().enumerate() {
                let sy = reflect_101(y as i64 + k as i64 - 2, h) as usize;
                sum += weight * tmp[sy * wu + x as usize];
            }
            out.put_pixel(x, y, Luma([((sum + total / 2) / total) as u8]));
        }
    }

    out
}

/// Canny edge detector.
///
/// Gradients come from the 3x3 Sobel pair with replicated borders, magnitude
/// is the L1 norm `|dx| + |dy|`. After non-maximum suppression, pixels above
/// `high` seed edges and pixels above `low` that are 8-connected to a seed are
/// kept. Output is 255 on edges and 0 elsewhere.
pub fn canny(img: &GrayImage, low: f32, high: f32) -> GrayImage {
    let (dx, dy) = sobel_gradients(&IntensityField::from_gray_image(img));
    let thin = non_max_suppression(&dx, &dy);
    hysteresis(&thin, low, high)
}

/// Keep the L1 gradient magnitude only where it peaks across the edge.
///
/// The gradient direction is binned into horizontal, vertical and the two
/// diagonals (22.5 / 67.5 degree boundaries). Suppressed pixels are 0, and
/// neighbors outside the image count as 0.
fn non_max_suppression(dx: &IntensityField, dy: &IntensityField) -> IntensityField {
    let (w, h) = (dx.width, dx.height);
    let mag: Vec<f32> = dx
        .data
        .iter()
        .zip(&dy.data)
        .map(|(gx, gy)| gx.abs() + gy.abs())
        .collect();
    let mag_at = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            0.0
        } else {
            mag[y as usize * w as usize + x as usize]
        }
    };

    // tan(22.5 deg) and tan(67.5 deg)
    let tan_22 = std::f32::consts::SQRT_2 - 1.0;
    let tan_67 = std::f32::consts::SQRT_2 + 1.0;

    let mut out = IntensityField::new(w, h, 0.0);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let idx = y as usize * w as usize + x as usize;
            let m = mag[idx];
            if m == 0.0 {
                continue;
            }

            let gx = dx.data[idx];
            let gy = dy.data[idx];
            let ax = gx.abs();
            let ay = gy.abs();

            let is_max = if ay < ax * tan_22 {
                m > mag_at(x - 1, y) && m >= mag_at(x + 1, y)
            } else if ay > ax * tan_67 {
                m > mag_at(x, y - 1) && m >= mag_at(x, y + 1)
            } else if (gx < 0.0) == (gy < 0.0) {
                m > mag_at(x - 1, y - 1) && m > mag_at(x + 1, y + 1)
            } else {
                m > mag_at(x + 1, y - 1) && m > mag_at(x - 1, y + 1)
            };

            if is_max {
                out.set(x as u32, y as u32, m);
            }
        }
    }

    out
}

/// Double-threshold edge tracking.
///
/// Pixels above `high` are edges; pixels above `low` are edges only when
/// 8-connected, through other such pixels, to one above `high`. A negative
/// `low` is treated as 0.
fn hysteresis(thin: &IntensityField, low: f32, high: f32) -> GrayImage {
    let (w, h) = (thin.width, thin.height);
    let low = low.max(0.0);

    let mut out = GrayImage::new(w, h);
    let mut stack: Vec<(u32, u32)> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let v = thin.get(x, y);
            if v > high && v > low {
                stack.push((x, y));
            }
        }
    }

    while let Some((x, y)) = stack.pop() {
        if out.get_pixel(x, y)[0] == 255 {
            continue;
        }
        out.put_pixel(x, y, Luma([255]));

        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                if thin.get(nx, ny) > low && out.get_pixel(nx, ny)[0] == 0 {
                    stack.push((nx, ny));
                }
            }
        }
    }

    out
}

/// Morphology operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphOp {
    Erode,
    Dilate,
}

/// Apply a morphological operation with a square all-ones element of side `size`.
///
/// Erode takes the window minimum, dilate the window maximum. Neighbors that
/// fall outside the image are ignored, so borders neither grow nor shrink
/// the mask.
pub fn morphology(img: &GrayImage, size: u32, op: MorphOp) -> GrayImage {
    let r = (size / 2) as i64;
    let (w, h) = img.dimensions();
    let mut out = GrayImage::new(w, h);

    for y in 0..h as i64 {
        let y0 = (y - r).max(0) as u32;
        let y1 = (y + r).min(h as i64 - 1) as u32;
        for x in 0..w as i64 {
            let x0 = (x - r).max(0) as u32;
            let x1 = (x + r).min(w as i64 - 1) as u32;

            let mut extremum = match op {
                MorphOp::Erode => u8::MAX,
                MorphOp::Dilate => u8::MIN,
            };
            for sy in y0..=y1 {
                for sx in x0..=x1 {
                    let v = img.get_pixel(sx, sy)[0];
                    extremum = match op {
                        MorphOp::Erode => extremum.min(v),
                        MorphOp::Dilate => extremum.max(v),
                    };
                }
            }

            out.put_pixel(x as u32, y as u32, Luma([extremum]));
        }
    }

    out
}

/// Morphological closing: dilation followed by erosion.
pub fn close(img: &GrayImage, size: u32) -> GrayImage {
    let dilated = morphology(img, size, MorphOp::Dilate);
    morphology(&dilated, size, MorphOp::Erode)
}

/// Linearly rescale so the smallest value maps to 0 and the largest to 255.
///
/// A constant image has no range to stretch and maps to all zeros.
pub fn normalize_min_max(img: &GrayImage) -> GrayImage {
    let (lo, hi) = img
        .as_raw()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if hi <= lo {
        return GrayImage::new(img.width(), img.height());
    }

    // Halfway values round to even.
    let scale = 255.0 / f32::from(hi - lo);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let v = f32::from(img.get_pixel(x, y)[0] - lo) * scale;
        Luma([v.round_ties_even().clamp(0.0, 255.0) as u8])
    })
}

/// Mask of pixels whose every HSV channel lies in `[lower, upper]` (inclusive).
///
/// Matching pixels are 255, the rest 0.
pub fn in_range(hsv: &HsvImage, lower: Hsv8, upper: Hsv8) -> GrayImage {
    GrayImage::from_fn(hsv.width, hsv.height, |x, y| {
        let p = hsv.get(x, y);
        let inside = (lower.h..=upper.h).contains(&p.h)
            && (lower.s..=upper.s).contains(&p.s)
            && (lower.v..=upper.v).contains(&p.v);
        Luma([if inside { 255 } else { 0 }])
    })
}
