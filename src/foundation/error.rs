/// Convenience result type used across framekit.
pub type FramekitResult<T> = Result<T, FramekitError>;

/// Top-level error taxonomy used by library APIs.
#[derive(thiserror::Error, Debug)]
pub enum FramekitError {
    /// Upload rejected before any decode attempt: payload exceeds the policy cap.
    #[error("file too large: {size_bytes} bytes exceeds limit of {max_bytes}")]
    FileTooLarge {
        /// Size of the rejected payload.
        size_bytes: u64,
        /// Policy cap that was exceeded.
        max_bytes: u64,
    },

    /// Upload rejected before any decode attempt: not an accepted image format.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// Decoding an uploaded photo failed. Any previously loaded photo stays intact.
    #[error("image decode error: {0}")]
    ImageDecode(String),

    /// A frame overlay could not be read or decoded. Composites degrade to
    /// no overlay instead of failing.
    #[error("frame load error: {0}")]
    FrameLoad(String),

    /// Encoding or writing an export failed. In-memory state is unaffected.
    #[error("export error: {0}")]
    Export(String),

    /// Invalid caller-provided parameters or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FramekitError {
    /// Build a [`FramekitError::UnsupportedType`] value.
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedType(msg.into())
    }

    /// Build a [`FramekitError::ImageDecode`] value.
    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    /// Build a [`FramekitError::FrameLoad`] value.
    pub fn frame_load(msg: impl Into<String>) -> Self {
        Self::FrameLoad(msg.into())
    }

    /// Build a [`FramekitError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`FramekitError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_detail() {
        let e = FramekitError::FileTooLarge {
            size_bytes: 6_000_000,
            max_bytes: 5_242_880,
        };
        assert_eq!(
            e.to_string(),
            "file too large: 6000000 bytes exceeds limit of 5242880"
        );

        let e = FramekitError::validation("zoom must be finite and > 0");
        assert_eq!(e.to_string(), "validation error: zoom must be finite and > 0");
    }
}
