use std::path::{Path, PathBuf};

use crate::{
    assets::catalog::FrameLibrary,
    assets::decode::DecodedImage,
    assets::upload::{self, UploadPolicy},
    compose::render::{self, CompositeOutput, RenderSettings},
    compose::settings::TransformSettings,
    export::{self, ExportSize},
    foundation::core::CanvasSize,
    foundation::error::{FramekitError, FramekitResult},
    preset::{self, Preset},
};

/// Owned editing state for one user: photo, frame choice, and transform
/// settings.
///
/// The session is the single writer of its settings; renders only read
/// them. There are no ambient globals; everything an operation needs lives
/// on this struct.
#[derive(Debug)]
pub struct EditorSession {
    library: FrameLibrary,
    policy: UploadPolicy,
    render: RenderSettings,
    source: Option<DecodedImage>,
    selected_frame: u32,
    settings: TransformSettings,
}

impl EditorSession {
    /// Build a session over a prepared frame library. The first catalog
    /// frame starts selected.
    pub fn new(library: FrameLibrary) -> FramekitResult<Self> {
        let selected_frame = library.first_id().ok_or_else(|| {
            FramekitError::validation("frame library must contain at least one frame")
        })?;
        Ok(Self {
            library,
            policy: UploadPolicy::default(),
            render: RenderSettings::default(),
            source: None,
            selected_frame,
            settings: TransformSettings::default(),
        })
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_render_settings(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    pub fn library(&self) -> &FrameLibrary {
        &self.library
    }

    pub fn settings(&self) -> &TransformSettings {
        &self.settings
    }

    pub fn selected_frame(&self) -> u32 {
        self.selected_frame
    }

    pub fn has_photo(&self) -> bool {
        self.source.is_some()
    }

    /// Validate and decode an uploaded photo.
    ///
    /// On any rejection or decode failure the previously loaded photo (if
    /// any) stays in place.
    #[tracing::instrument(skip_all, fields(size_bytes = bytes.len()))]
    pub fn load_photo_bytes(&mut self, bytes: &[u8]) -> FramekitResult<()> {
        let decoded = upload::load_photo_bytes(&self.policy, bytes)?;
        tracing::debug!(width = decoded.width, height = decoded.height, "photo loaded");
        self.source = Some(decoded);
        Ok(())
    }

    /// Validate and decode a photo from disk. Same failure semantics as
    /// [`EditorSession::load_photo_bytes`].
    #[tracing::instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn load_photo_file(&mut self, path: impl AsRef<Path>) -> FramekitResult<()> {
        let decoded = upload::load_photo_file(&self.policy, path)?;
        self.source = Some(decoded);
        Ok(())
    }

    pub fn select_frame(&mut self, id: u32) -> FramekitResult<()> {
        if !self.library.contains(id) {
            return Err(FramekitError::validation(format!("unknown frame id {id}")));
        }
        self.selected_frame = id;
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> FramekitResult<()> {
        let mut next = self.settings;
        next.zoom = zoom;
        next.validate()?;
        self.settings = next;
        Ok(())
    }

    pub fn set_rotation_deg(&mut self, rotate_deg: f64) -> FramekitResult<()> {
        let mut next = self.settings;
        next.rotate_deg = rotate_deg;
        next.validate()?;
        self.settings = next;
        Ok(())
    }

    pub fn set_brightness_pct(&mut self, brightness_pct: f64) -> FramekitResult<()> {
        let mut next = self.settings;
        next.brightness_pct = brightness_pct;
        next.validate()?;
        self.settings = next;
        Ok(())
    }

    /// Toggle the horizontal mirror; returns the new state.
    pub fn toggle_flip_horizontal(&mut self) -> bool {
        self.settings.flip_horizontal = !self.settings.flip_horizontal;
        self.settings.flip_horizontal
    }

    /// Toggle the vertical mirror; returns the new state.
    pub fn toggle_flip_vertical(&mut self) -> bool {
        self.settings.flip_vertical = !self.settings.flip_vertical;
        self.settings.flip_vertical
    }

    pub fn reset_settings(&mut self) {
        self.settings.reset();
    }

    /// Render the current state at `canvas` resolution.
    ///
    /// A selected frame whose overlay failed to load degrades to background
    /// + photo, never an error.
    pub fn render(&self, canvas: CanvasSize) -> FramekitResult<CompositeOutput> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| FramekitError::validation("no photo loaded"))?;
        let overlay = self
            .library
            .get(self.selected_frame)
            .and_then(|f| f.overlay.as_ref());
        render::render_composite(source, &self.settings, overlay, canvas, &self.render)
    }

    pub fn render_preview(&self) -> FramekitResult<CompositeOutput> {
        self.render(CanvasSize::PREVIEW)
    }

    /// Render at a standard export size and write a PNG into `dir` under a
    /// generated file name.
    #[tracing::instrument(skip(self, dir))]
    pub fn export_to_dir(
        &self,
        dir: impl AsRef<Path>,
        size: ExportSize,
        stem: &str,
    ) -> FramekitResult<PathBuf> {
        let output = self.render(size.canvas())?;
        export::export_to_dir(dir, stem, &output)
    }

    /// Save the current settings and frame choice as the preset slot.
    pub fn save_preset(&self, dir: impl AsRef<Path>) -> FramekitResult<PathBuf> {
        preset::save_preset(dir, &self.settings, self.selected_frame)
    }

    /// Apply a loaded preset. The frame is re-selected only if it still
    /// exists in the catalog.
    pub fn apply_preset(&mut self, preset: &Preset) -> FramekitResult<()> {
        preset.settings.validate()?;
        self.settings = preset.settings;
        if self.library.contains(preset.frame_id) {
            self.selected_frame = preset.frame_id;
        } else {
            tracing::warn!(
                frame_id = preset.frame_id,
                "preset frame no longer in catalog; keeping current selection"
            );
        }
        Ok(())
    }
}
