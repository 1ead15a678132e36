use crate::{compose::settings::TransformSettings, foundation::core::Affine};

/// Cover-fit draw dimensions for a `src_w` x `src_h` source on a square
/// canvas.
///
/// The shorter axis matches the canvas exactly; the longer axis overflows
/// and is cropped. With no zoom this leaves no background gaps.
pub fn cover_fit_size(src_w: u32, src_h: u32, canvas_side: u32) -> (f64, f64) {
    let side = f64::from(canvas_side);
    let aspect = f64::from(src_w) / f64::from(src_h);
    if aspect > 1.0 {
        (side * aspect, side)
    } else {
        (side, side / aspect)
    }
}

/// Affine mapping source pixel coordinates to canvas coordinates.
///
/// Composition order: translate to the canvas center, rotate, then flip,
/// then place the zoomed cover-fit rect centered on the origin. Flipping
/// after rotation changes the result for non-zero angles; the order is
/// intentional and must not be swapped.
pub fn source_to_canvas(
    settings: &TransformSettings,
    src_w: u32,
    src_h: u32,
    canvas_side: u32,
) -> Affine {
    let center = f64::from(canvas_side) / 2.0;
    let (mut draw_w, mut draw_h) = cover_fit_size(src_w, src_h, canvas_side);
    draw_w *= settings.zoom;
    draw_h *= settings.zoom;

    let flip_x = if settings.flip_horizontal { -1.0 } else { 1.0 };
    let flip_y = if settings.flip_vertical { -1.0 } else { 1.0 };

    Affine::translate((center, center))
        * Affine::rotate(settings.rotate_deg.to_radians())
        * Affine::scale_non_uniform(flip_x, flip_y)
        * Affine::translate((-draw_w / 2.0, -draw_h / 2.0))
        * Affine::scale_non_uniform(draw_w / f64::from(src_w), draw_h / f64::from(src_h))
}

/// Affine stretching a `src_w` x `src_h` overlay to exactly cover the
/// canvas, drawn at (0,0) in canvas space.
pub fn overlay_to_canvas(src_w: u32, src_h: u32, canvas_side: u32) -> Affine {
    let side = f64::from(canvas_side);
    Affine::scale_non_uniform(side / f64::from(src_w), side / f64::from(src_h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn cover_fit_wide_source() {
        // Aspect 2.0 on a 2048 canvas: height pinned, width overflows.
        assert_eq!(cover_fit_size(4000, 2000, 2048), (4096.0, 2048.0));
    }

    #[test]
    fn cover_fit_tall_and_square_sources() {
        assert_eq!(cover_fit_size(1000, 2000, 100), (100.0, 200.0));
        assert_eq!(cover_fit_size(512, 512, 100), (100.0, 100.0));
    }

    #[test]
    fn wide_source_draw_rect_geometry() {
        // 4000x2000 at canvas 2048, zoom 1: draw rect 4096x2048 with top-left
        // (-2048, -1024) relative to the canvas center (1024, 1024).
        let a = source_to_canvas(&TransformSettings::default(), 4000, 2000, 2048);
        assert!(close(a * Point::new(0.0, 0.0), Point::new(-1024.0, 0.0)));
        assert!(close(a * Point::new(4000.0, 2000.0), Point::new(3072.0, 2048.0)));
        // Source center lands on the canvas center.
        assert!(close(a * Point::new(2000.0, 1000.0), Point::new(1024.0, 1024.0)));
    }

    #[test]
    fn identity_settings_map_square_source_onto_canvas() {
        let a = source_to_canvas(&TransformSettings::default(), 64, 64, 64);
        assert!(close(a * Point::new(0.0, 0.0), Point::new(0.0, 0.0)));
        assert!(close(a * Point::new(64.0, 64.0), Point::new(64.0, 64.0)));
    }

    #[test]
    fn zoom_scales_about_the_center() {
        let settings = TransformSettings {
            zoom: 2.0,
            ..TransformSettings::default()
        };
        let a = source_to_canvas(&settings, 64, 64, 64);
        assert!(close(a * Point::new(32.0, 32.0), Point::new(32.0, 32.0)));
        assert!(close(a * Point::new(0.0, 0.0), Point::new(-32.0, -32.0)));
    }

    #[test]
    fn rotation_applies_before_flip() {
        let settings = TransformSettings {
            rotate_deg: 90.0,
            flip_horizontal: true,
            ..TransformSettings::default()
        };
        let ours = source_to_canvas(&settings, 64, 64, 64);

        // Same factors composed flip-first; must NOT match.
        let swapped = Affine::translate((32.0, 32.0))
            * Affine::scale_non_uniform(-1.0, 1.0)
            * Affine::rotate(90f64.to_radians())
            * Affine::translate((-32.0, -32.0));

        let p = Point::new(0.0, 0.0);
        let a = ours * p;
        let b = swapped * p;
        assert!((a.x - b.x).abs() > 1.0 || (a.y - b.y).abs() > 1.0);
    }

    #[test]
    fn overlay_stretch_covers_canvas() {
        let a = overlay_to_canvas(512, 256, 1024);
        assert!(close(a * Point::new(0.0, 0.0), Point::new(0.0, 0.0)));
        assert!(close(a * Point::new(512.0, 256.0), Point::new(1024.0, 1024.0)));
    }
}
