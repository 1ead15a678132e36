//! framekit composes a user photo behind a decorative frame overlay on a
//! square canvas and exports the result as a PNG.
//!
//! # Pipeline overview
//!
//! 1. **Validate + decode**: [`UploadPolicy`] checks (size cap, sniffed
//!    format) front-load IO into a premultiplied-RGBA8 [`DecodedImage`];
//!    frame overlays are prepared once into a [`FrameLibrary`].
//! 2. **Compose**: [`render_composite`] deterministically maps
//!    `(photo, TransformSettings, overlay, canvas size)` to a
//!    [`CompositeOutput`]: cover fit, zoom, rotation, flips, brightness on
//!    the photo layer, overlay drawn last.
//! 3. **Export**: PNG encoding at HD (2048) or share (1200) resolution.
//!
//! Key constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical inputs produce byte-identical rasters.
//! - **No IO in the compositor**: decoding happens up front; a render is a
//!   pure function over already-decoded rasters.
//! - **Premultiplied RGBA8** end-to-end; export unmultiplies before
//!   encoding.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod export;
mod foundation;
mod preset;
mod session;

pub use assets::catalog::{
    FrameAsset, FrameCatalog, FrameEntry, FrameLibrary, normalize_rel_path,
};
pub use assets::decode::{DecodedImage, decode_image};
pub use assets::upload::{
    DEFAULT_MAX_UPLOAD_BYTES, UploadFormat, UploadPolicy, load_photo_bytes, load_photo_file,
};
pub use compose::render::{
    CompositeOutput, DEFAULT_BACKGROUND_RGBA, RenderSettings, render_composite,
};
pub use compose::settings::TransformSettings;
pub use compose::transform::{cover_fit_size, overlay_to_canvas, source_to_canvas};
pub use export::{ExportSize, encode_png, export_file_name, export_to_dir, write_png};
pub use foundation::core::CanvasSize;
pub use foundation::error::{FramekitError, FramekitResult};
pub use preset::{PRESET_FILE_NAME, Preset, load_preset, save_preset};
pub use session::EditorSession;
