use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::decode::{self, DecodedImage},
    foundation::error::{FramekitError, FramekitResult},
};

/// Default upload size cap (5 MiB), matching the accepted-upload policy.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Encoded image formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
    Webp,
}

impl UploadFormat {
    /// Sniff the format from magic bytes. File extensions are not trusted.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 8 && bytes[..8] == [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a] {
            return Some(Self::Png);
        }
        if bytes.len() >= 3 && bytes[..3] == [0xff, 0xd8, 0xff] {
            return Some(Self::Jpeg);
        }
        if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }
        None
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

/// Acceptance policy applied to uploads before any decode attempt.
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    pub accept: Vec<UploadFormat>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accept: vec![UploadFormat::Jpeg, UploadFormat::Png, UploadFormat::Webp],
        }
    }
}

impl UploadPolicy {
    /// Check the size cap and sniffed format. Rejection happens before any
    /// decode work and mutates no state.
    pub fn check(&self, bytes: &[u8]) -> FramekitResult<UploadFormat> {
        let size_bytes = bytes.len() as u64;
        if size_bytes > self.max_bytes {
            return Err(FramekitError::FileTooLarge {
                size_bytes,
                max_bytes: self.max_bytes,
            });
        }
        let format = UploadFormat::sniff(bytes).ok_or_else(|| {
            FramekitError::unsupported_type("unrecognized image data (accepted: JPEG, PNG, WebP)")
        })?;
        if !self.accept.contains(&format) {
            return Err(FramekitError::unsupported_type(format.mime()));
        }
        Ok(format)
    }
}

/// Validate and decode an uploaded photo held in memory.
pub fn load_photo_bytes(policy: &UploadPolicy, bytes: &[u8]) -> FramekitResult<DecodedImage> {
    let format = policy.check(bytes)?;
    tracing::debug!(?format, size_bytes = bytes.len(), "accepted upload");
    decode::decode_image(bytes)
}

/// Validate and decode a photo from disk.
///
/// The size cap is checked against file metadata before the file is read.
pub fn load_photo_file(policy: &UploadPolicy, path: impl AsRef<Path>) -> FramekitResult<DecodedImage> {
    let path = path.as_ref();
    let meta =
        std::fs::metadata(path).with_context(|| format!("stat photo '{}'", path.display()))?;
    if meta.len() > policy.max_bytes {
        return Err(FramekitError::FileTooLarge {
            size_bytes: meta.len(),
            max_bytes: policy.max_bytes,
        });
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
    load_photo_bytes(policy, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_png_jpeg_webp() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        assert_eq!(UploadFormat::sniff(&png), Some(UploadFormat::Png));

        let jpeg = [0xff, 0xd8, 0xff, 0xe0];
        assert_eq!(UploadFormat::sniff(&jpeg), Some(UploadFormat::Jpeg));

        let webp = *b"RIFF\x24\x00\x00\x00WEBPVP8 ";
        assert_eq!(UploadFormat::sniff(&webp), Some(UploadFormat::Webp));

        assert_eq!(UploadFormat::sniff(b"GIF89a"), None);
        assert_eq!(UploadFormat::sniff(&[]), None);
    }

    #[test]
    fn policy_rejects_oversized_before_sniffing() {
        let policy = UploadPolicy {
            max_bytes: 16,
            ..UploadPolicy::default()
        };
        let err = policy.check(&[0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            FramekitError::FileTooLarge {
                size_bytes: 32,
                max_bytes: 16
            }
        ));
    }

    #[test]
    fn policy_rejects_unknown_format() {
        let policy = UploadPolicy::default();
        let err = policy.check(b"GIF89a trailer").unwrap_err();
        assert!(matches!(err, FramekitError::UnsupportedType(_)));
    }

    #[test]
    fn policy_respects_accept_list() {
        let policy = UploadPolicy {
            accept: vec![UploadFormat::Png],
            ..UploadPolicy::default()
        };
        let jpeg = [0xff, 0xd8, 0xff, 0xe0];
        let err = policy.check(&jpeg).unwrap_err();
        assert!(matches!(err, FramekitError::UnsupportedType(_)));
    }
}
