use crate::{
    assets::decode::DecodedImage,
    compose::{raster, settings::TransformSettings, transform},
    foundation::core::CanvasSize,
    foundation::error::FramekitResult,
};

/// Default canvas background fill (`#00a524`).
pub const DEFAULT_BACKGROUND_RGBA: [u8; 4] = [0x00, 0xa5, 0x24, 0xff];

/// Compositor configuration that is not part of the interactive settings.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Straight-alpha RGBA fill painted before the source layer.
    pub background_rgba: [u8; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            background_rgba: DEFAULT_BACKGROUND_RGBA,
        }
    }
}

/// A finished composite raster. Produced fresh per render; never mutated,
/// only superseded.
#[derive(Clone, Debug)]
pub struct CompositeOutput {
    pub width: u32,
    pub height: u32,
    /// Pixel bytes in row-major RGBA8.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Compose `source` behind `frame` on a square canvas.
///
/// The stages, in order:
///
/// 1. fill the canvas with the background color
/// 2. transform: center translate, rotation, flips (rotation first)
/// 3. cover-fit the source, scaled by zoom, drawn centered
/// 4. brightness applied to the source layer only
/// 5. the frame overlay stretched to canvas size, drawn last
///
/// A `None` frame degrades to background + source. The call is pure over
/// decoded rasters: identical inputs produce byte-identical output.
#[tracing::instrument(skip_all, fields(canvas = canvas.side(), has_frame = frame.is_some()))]
pub fn render_composite(
    source: &DecodedImage,
    settings: &TransformSettings,
    frame: Option<&DecodedImage>,
    canvas: CanvasSize,
    render: &RenderSettings,
) -> FramekitResult<CompositeOutput> {
    settings.validate()?;

    let side = canvas.side();
    let mut data = vec![0u8; canvas.pixel_bytes()];
    raster::fill_rgba8(&mut data, raster::premul_rgba8(render.background_rgba));

    let to_canvas = transform::source_to_canvas(settings, source.width, source.height, side);
    let brightness = (settings.brightness_pct / 100.0) as f32;
    raster::draw_image(&mut data, side, side, source, to_canvas, Some(brightness))?;

    if let Some(overlay) = frame {
        let stretch = transform::overlay_to_canvas(overlay.width, overlay.height, side);
        raster::draw_image(&mut data, side, side, overlay, stretch, None)?;
    }

    Ok(CompositeOutput {
        width: side,
        height: side,
        data,
        premultiplied: true,
    })
}
