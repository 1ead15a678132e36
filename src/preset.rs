use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    compose::settings::TransformSettings,
    foundation::error::{FramekitError, FramekitResult},
};

/// File name of the single preset slot.
pub const PRESET_FILE_NAME: &str = "preset.json";

/// A saved editing state: transform settings plus the selected frame.
///
/// One slot only; saving overwrites any prior save.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Preset {
    pub settings: TransformSettings,
    pub frame_id: u32,
    pub saved_at_unix_secs: u64,
}

/// Save the preset slot under `dir`, overwriting any prior save.
pub fn save_preset(
    dir: impl AsRef<Path>,
    settings: &TransformSettings,
    frame_id: u32,
) -> FramekitResult<PathBuf> {
    settings.validate()?;
    let saved_at_unix_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let preset = Preset {
        settings: *settings,
        frame_id,
        saved_at_unix_secs,
    };
    let path = dir.as_ref().join(PRESET_FILE_NAME);
    let json = serde_json::to_vec_pretty(&preset)
        .map_err(|e| FramekitError::validation(format!("serialize preset: {e}")))?;
    std::fs::write(&path, json).with_context(|| format!("write preset '{}'", path.display()))?;
    Ok(path)
}

/// Load the preset slot from `dir`.
pub fn load_preset(dir: impl AsRef<Path>) -> FramekitResult<Preset> {
    let path = dir.as_ref().join(PRESET_FILE_NAME);
    let bytes =
        std::fs::read(&path).with_context(|| format!("read preset '{}'", path.display()))?;
    let preset: Preset = serde_json::from_slice(&bytes)
        .map_err(|e| FramekitError::validation(format!("parse preset '{}': {e}", path.display())))?;
    preset.settings.validate()?;
    Ok(preset)
}
