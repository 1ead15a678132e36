use rayon::prelude::*;

use crate::{
    assets::decode::DecodedImage,
    foundation::core::Affine,
    foundation::error::{FramekitError, FramekitResult},
    foundation::math::mul_div255,
};

pub type PremulRgba8 = [u8; 4];

/// Fill a premultiplied RGBA8 buffer with one pixel value.
pub fn fill_rgba8(dst: &mut [u8], px: PremulRgba8) {
    for chunk in dst.chunks_exact_mut(4) {
        chunk.copy_from_slice(&px);
    }
}

/// Convert a straight-alpha RGBA pixel to premultiplied.
pub fn premul_rgba8(rgba: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(rgba[3]);
    [
        mul_div255(u16::from(rgba[0]), a),
        mul_div255(u16::from(rgba[1]), a),
        mul_div255(u16::from(rgba[2]), a),
        rgba[3],
    ]
}

/// Source-over for premultiplied pixels.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Scale the color channels of a premultiplied pixel by `factor`.
///
/// Alpha is untouched; channels saturate at the pixel's own alpha so the
/// result stays valid premultiplied data for factors above 1.
pub(crate) fn scale_brightness(px: PremulRgba8, factor: f32) -> PremulRgba8 {
    let a = px[3];
    let mut out = px;
    for i in 0..3 {
        let scaled = (f32::from(px[i]) * factor + 0.5) as u16;
        out[i] = scaled.min(u16::from(a)) as u8;
    }
    out
}

/// Draw `src` into `dst` through `local_to_canvas`.
///
/// Each destination pixel center is inverse-mapped into source pixel space
/// and sampled bilinearly. Samples outside the source rect are transparent
/// (the destination shows through); in-rect samples clamp at the edge
/// texels, keeping a hard boundary with no transparent border bleed.
/// `brightness` scales the sampled pixel's color channels only.
///
/// Rows are processed in parallel; per-pixel arithmetic is independent of
/// scheduling, so output is byte-identical across runs and thread counts.
pub fn draw_image(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &DecodedImage,
    local_to_canvas: Affine,
    brightness: Option<f32>,
) -> FramekitResult<()> {
    let expected = (dst_w as usize)
        .checked_mul(dst_h as usize)
        .and_then(|v| v.checked_mul(4));
    if dst_w == 0 || dst_h == 0 || expected != Some(dst.len()) {
        return Err(FramekitError::validation(
            "draw_image expects dst matching width*height*4 with nonzero dimensions",
        ));
    }
    let det = local_to_canvas.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return Err(FramekitError::validation("draw transform is degenerate"));
    }

    let inv = local_to_canvas.inverse().as_coeffs();
    let src_w = f64::from(src.width);
    let src_h = f64::from(src.height);
    let max_x = i64::from(src.width) - 1;
    let max_y = i64::from(src.height) - 1;
    let pixels = src.rgba8_premul.as_slice();
    let stride = src.width as usize * 4;

    let row_bytes = dst_w as usize * 4;
    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let cy = y as f64 + 0.5;
            for (x, px_out) in row.chunks_exact_mut(4).enumerate() {
                let cx = x as f64 + 0.5;
                // Coeffs [a, b, c, d, e, f] map (x, y) to (ax + cy + e, bx + dy + f).
                let u = inv[0] * cx + inv[2] * cy + inv[4];
                let v = inv[1] * cx + inv[3] * cy + inv[5];
                if u < 0.0 || u >= src_w || v < 0.0 || v >= src_h {
                    continue;
                }

                let mut sampled = sample_bilinear_clamped(pixels, stride, max_x, max_y, u, v);
                if let Some(factor) = brightness {
                    sampled = scale_brightness(sampled, factor);
                }
                let cur = [px_out[0], px_out[1], px_out[2], px_out[3]];
                px_out.copy_from_slice(&over(cur, sampled));
            }
        });

    Ok(())
}

fn sample_bilinear_clamped(
    pixels: &[u8],
    stride: usize,
    max_x: i64,
    max_y: i64,
    u: f64,
    v: f64,
) -> PremulRgba8 {
    let su = u - 0.5;
    let sv = v - 0.5;
    let fx0 = su.floor();
    let fy0 = sv.floor();
    let wx = (su - fx0) as f32;
    let wy = (sv - fy0) as f32;
    let x0 = fx0 as i64;
    let y0 = fy0 as i64;

    let texel = |x: i64, y: i64| -> [f32; 4] {
        let x = x.clamp(0, max_x) as usize;
        let y = y.clamp(0, max_y) as usize;
        let idx = y * stride + x * 4;
        [
            f32::from(pixels[idx]),
            f32::from(pixels[idx + 1]),
            f32::from(pixels[idx + 2]),
            f32::from(pixels[idx + 3]),
        ]
    };

    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = p00[i] + (p10[i] - p00[i]) * wx;
        let bot = p01[i] + (p11[i] - p01[i]) * wx;
        out[i] = (top + (bot - top) * wy + 0.5) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> DecodedImage {
        let mut data = Vec::with_capacity(w as usize * h as usize * 4);
        for _ in 0..(w * h) {
            data.extend_from_slice(&rgba);
        }
        DecodedImage::from_straight_rgba8(w, h, data).unwrap()
    }

    #[test]
    fn over_transparent_src_is_noop() {
        let dst = [10, 20, 30, 255];
        assert_eq!(over(dst, [0, 0, 0, 0]), dst);
    }

    #[test]
    fn over_opaque_src_replaces_dst() {
        assert_eq!(over([10, 20, 30, 255], [200, 0, 0, 255]), [200, 0, 0, 255]);
    }

    #[test]
    fn over_blends_premultiplied_alpha() {
        // src at 50% gray over opaque black.
        let out = over([0, 0, 0, 255], [64, 64, 64, 128]);
        assert_eq!(out[3], 255);
        assert!(out[0] >= 63 && out[0] <= 65);
    }

    #[test]
    fn brightness_scales_and_clamps_to_alpha() {
        assert_eq!(scale_brightness([100, 100, 100, 255], 0.5), [50, 50, 50, 255]);
        assert_eq!(scale_brightness([100, 100, 100, 255], 0.0), [0, 0, 0, 255]);
        // Factor above 1 saturates at the pixel's alpha.
        assert_eq!(scale_brightness([80, 80, 80, 128], 4.0), [128, 128, 128, 128]);
    }

    #[test]
    fn draw_image_rejects_mismatched_buffers() {
        let src = solid(2, 2, [255, 0, 0, 255]);
        let mut dst = vec![0u8; 8];
        let err = draw_image(&mut dst, 2, 2, &src, Affine::IDENTITY, None).unwrap_err();
        assert!(matches!(err, FramekitError::Validation(_)));
    }

    #[test]
    fn draw_image_rejects_degenerate_transform() {
        let src = solid(2, 2, [255, 0, 0, 255]);
        let mut dst = vec![0u8; 2 * 2 * 4];
        let err = draw_image(&mut dst, 2, 2, &src, Affine::scale(0.0), None).unwrap_err();
        assert!(matches!(err, FramekitError::Validation(_)));
    }

    #[test]
    fn identity_draw_copies_solid_source() {
        let src = solid(4, 4, [12, 34, 56, 255]);
        let mut dst = vec![0u8; 4 * 4 * 4];
        fill_rgba8(&mut dst, premul_rgba8([1, 2, 3, 255]));
        draw_image(&mut dst, 4, 4, &src, Affine::IDENTITY, None).unwrap();
        for px in dst.chunks_exact(4) {
            assert_eq!(px, [12, 34, 56, 255]);
        }
    }

    #[test]
    fn out_of_rect_pixels_keep_destination() {
        let src = solid(2, 2, [255, 255, 255, 255]);
        let mut dst = vec![0u8; 4 * 4 * 4];
        fill_rgba8(&mut dst, [9, 9, 9, 255]);
        // Draw the 2x2 source into the top-left quadrant only.
        draw_image(&mut dst, 4, 4, &src, Affine::IDENTITY, None).unwrap();
        assert_eq!(&dst[..4], [255, 255, 255, 255]);
        // Bottom-right pixel is outside the drawn rect.
        let last = &dst[(3 * 4 + 3) * 4..];
        assert_eq!(last, [9, 9, 9, 255]);
    }
}
