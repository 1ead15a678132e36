use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    assets::decode::{self, DecodedImage},
    foundation::error::{FramekitError, FramekitResult},
};

/// One catalog row mapping a frame id to its overlay file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameEntry {
    pub id: u32,
    /// Overlay file path relative to the library root.
    pub file: String,
}

/// Ordered static list of available frames.
///
/// The catalog is configuration data, not code: deployments with different
/// frame sets ship a different JSON file against the same binary.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameCatalog {
    pub frames: Vec<FrameEntry>,
}

impl FrameCatalog {
    /// Built-in default catalog: ids 1..=8 mapped to `1.png`..`8.png`.
    pub fn builtin() -> Self {
        Self {
            frames: (1..=8)
                .map(|id| FrameEntry {
                    id,
                    file: format!("{id}.png"),
                })
                .collect(),
        }
    }

    /// Load and validate a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> FramekitResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("read frame catalog '{}'", path.display()))?;
        let catalog: Self = serde_json::from_slice(&bytes).map_err(|e| {
            FramekitError::validation(format!("parse frame catalog '{}': {e}", path.display()))
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject empty catalogs, duplicate ids, and unsafe overlay paths.
    pub fn validate(&self) -> FramekitResult<()> {
        if self.frames.is_empty() {
            return Err(FramekitError::validation(
                "frame catalog must contain at least one frame",
            ));
        }
        let mut seen = HashSet::new();
        for entry in &self.frames {
            if !seen.insert(entry.id) {
                return Err(FramekitError::validation(format!(
                    "duplicate frame id {}",
                    entry.id
                )));
            }
            normalize_rel_path(&entry.file)?;
        }
        Ok(())
    }
}

/// Normalize and validate library-relative overlay paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> FramekitResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(FramekitError::validation("overlay paths must be relative"));
    }
    if s.is_empty() {
        return Err(FramekitError::validation("overlay path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FramekitError::validation(
                "overlay paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FramekitError::validation(
            "overlay path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// A catalog entry plus its decoded overlay, if loading succeeded.
#[derive(Clone, Debug)]
pub struct FrameAsset {
    pub entry: FrameEntry,
    /// `None` when the overlay failed to load; composites omit it.
    pub overlay: Option<DecodedImage>,
}

/// Immutable store of decoded frame overlays, loaded up front.
///
/// IO and decoding are front-loaded here so render calls stay pure and
/// IO-free.
#[derive(Clone, Debug)]
pub struct FrameLibrary {
    root: PathBuf,
    frames: Vec<FrameAsset>,
}

impl FrameLibrary {
    /// Decode every overlay in `catalog` relative to `root`.
    ///
    /// A single overlay that fails to read or decode is logged and left
    /// unloaded; it never fails the library as a whole.
    pub fn prepare(catalog: &FrameCatalog, root: impl Into<PathBuf>) -> FramekitResult<Self> {
        catalog.validate()?;
        let root = root.into();

        let mut frames = Vec::with_capacity(catalog.frames.len());
        for entry in &catalog.frames {
            let overlay = match load_overlay(&root, &entry.file) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!(
                        frame_id = entry.id,
                        file = %entry.file,
                        error = %e,
                        "frame overlay unavailable; composites will omit it"
                    );
                    None
                }
            };
            frames.push(FrameAsset {
                entry: entry.clone(),
                overlay,
            });
        }

        Ok(Self { root, frames })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frames(&self) -> &[FrameAsset] {
        &self.frames
    }

    pub fn get(&self, id: u32) -> Option<&FrameAsset> {
        self.frames.iter().find(|f| f.entry.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> Option<u32> {
        self.frames.first().map(|f| f.entry.id)
    }
}

fn load_overlay(root: &Path, file: &str) -> FramekitResult<DecodedImage> {
    let norm = normalize_rel_path(file)?;
    let path = root.join(Path::new(&norm));
    let bytes = std::fs::read(&path)
        .map_err(|e| FramekitError::frame_load(format!("read '{}': {e}", path.display())))?;
    decode::decode_image(&bytes)
        .map_err(|e| FramekitError::frame_load(format!("decode '{}': {e}", path.display())))
}
