use std::path::{Path, PathBuf};

use crate::{
    compose::render::CompositeOutput,
    foundation::core::CanvasSize,
    foundation::error::{FramekitError, FramekitResult},
};

/// Standard export resolutions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportSize {
    /// 2048x2048 download.
    Hd,
    /// 1200x1200 share image.
    Share,
}

impl ExportSize {
    pub fn canvas(self) -> CanvasSize {
        match self {
            Self::Hd => CanvasSize::HD,
            Self::Share => CanvasSize::SHARE,
        }
    }
}

/// Encode a composite as PNG bytes (straight alpha).
pub fn encode_png(output: &CompositeOutput) -> FramekitResult<Vec<u8>> {
    use image::ImageEncoder as _;

    let pixels = straight_alpha_pixels(output);
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(std::io::Cursor::new(&mut bytes))
        .write_image(
            &pixels,
            output.width,
            output.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| FramekitError::export(format!("encode png: {e}")))?;
    Ok(bytes)
}

/// Write a composite to `path` as PNG, creating parent directories.
pub fn write_png(path: impl AsRef<Path>, output: &CompositeOutput) -> FramekitResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            FramekitError::export(format!("create output dir '{}': {e}", parent.display()))
        })?;
    }

    let pixels = straight_alpha_pixels(output);
    image::save_buffer_with_format(
        path,
        &pixels,
        output.width,
        output.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| FramekitError::export(format!("write png '{}': {e}", path.display())))
}

/// Build an export file name: `<stem>_<nnnn>.png`.
///
/// The 4-digit suffix (1000..=9999) is derived from wall-clock nanos, so
/// repeated exports into the same directory get distinct names.
pub fn export_file_name(stem: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let suffix = 1000 + (nanos % 9000) as u64;
    format!("{stem}_{suffix}.png")
}

/// Write a composite into `dir` under a generated file name.
pub fn export_to_dir(
    dir: impl AsRef<Path>,
    stem: &str,
    output: &CompositeOutput,
) -> FramekitResult<PathBuf> {
    let path = dir.as_ref().join(export_file_name(stem));
    write_png(&path, output)?;
    Ok(path)
}

fn straight_alpha_pixels(output: &CompositeOutput) -> Vec<u8> {
    let mut pixels = output.data.clone();
    if output.premultiplied {
        unpremultiply_rgba8_in_place(&mut pixels);
    }
    pixels
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for i in 0..3 {
            let c = px[i] as u16;
            px[i] = ((c * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
