// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// MIME type handling for uploaded document parts.
//
// Uploaders send all sorts of Content-Type values ("image/jpeg; charset=…",
// duplicated "image/pngimage/png", or nothing useful at all). Declared types
// are cleaned first and, when still unsupported, the content itself is
// sniffed.

use image::ImageFormat;
use kensho_core::error::{KenshoError, Result};
use tracing::debug;

pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";
pub const MIME_PDF: &str = "application/pdf";

/// Types accepted for extraction.
pub const SUPPORTED_MIME_TYPES: [&str; 4] = [MIME_JPEG, MIME_PNG, MIME_WEBP, MIME_PDF];

/// Strip parameters and whitespace from a declared MIME type. When the value
/// contains `image/` more than once, the last occurrence wins.
pub fn clean_mime_type(raw: &str) -> &str {
    let mut mime = raw.trim();
    if let Some(idx) = mime.find(';') {
        mime = mime[..idx].trim();
    }
    if mime.matches("image/").count() > 1 {
        if let Some(last) = mime.rfind("image/") {
            mime = &mime[last..];
        }
    }
    mime
}

pub fn is_supported(mime: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime)
}

pub fn is_pdf(mime: &str) -> bool {
    mime.contains("pdf")
}

/// Detect the MIME type from magic bytes.
pub fn sniff_mime_type(content: &[u8]) -> Option<&'static str> {
    infer::get(content).map(|kind| kind.mime_type())
}

/// Settle on the MIME type to process a part as.
///
/// The cleaned declared type wins when supported; otherwise the sniffed type
/// is used if supported. Anything else is rejected with the declared type in
/// the error.
pub fn resolve_mime_type(declared: &str, content: &[u8]) -> Result<String> {
    let cleaned = clean_mime_type(declared);
    if is_supported(cleaned) {
        return Ok(cleaned.to_owned());
    }

    match sniff_mime_type(content) {
        Some(detected) if is_supported(detected) => {
            debug!(declared, detected, "Declared MIME type replaced by sniffed type");
            Ok(detected.to_owned())
        }
        _ => Err(KenshoError::UnsupportedMimeType(cleaned.to_owned())),
    }
}

/// Container format to decode with, `None` for a generic sniffing decode.
pub fn decode_format(mime: &str) -> Option<ImageFormat> {
    match mime {
        MIME_JPEG => Some(ImageFormat::Jpeg),
        MIME_PNG => Some(ImageFormat::Png),
        MIME_WEBP => Some(ImageFormat::WebP),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn clean_strips_parameters_and_whitespace() {
        assert_eq!(clean_mime_type("  image/jpeg ; charset=binary "), "image/jpeg");
        assert_eq!(clean_mime_type("image/png"), "image/png");
        assert_eq!(clean_mime_type(""), "");
    }

    #[test]
    fn clean_keeps_last_duplicated_image_type() {
        assert_eq!(clean_mime_type("image/jpegimage/png"), "image/png");
    }

    #[test]
    fn supported_declared_type_wins() {
        assert_eq!(resolve_mime_type("image/webp", b"anything").unwrap(), MIME_WEBP);
        assert_eq!(
            resolve_mime_type("application/pdf", b"%PDF-1.7").unwrap(),
            MIME_PDF
        );
    }

    #[test]
    fn unsupported_declared_type_falls_back_to_sniffing() {
        assert_eq!(
            resolve_mime_type("application/octet-stream", PNG_MAGIC).unwrap(),
            MIME_PNG
        );
    }

    #[test]
    fn unsupported_type_and_content_is_rejected() {
        let err = resolve_mime_type("application/zip", b"fake data").unwrap_err();
        assert!(matches!(err, KenshoError::UnsupportedMimeType(m) if m == "application/zip"));
    }

    #[test]
    fn webp_decodes_as_webp() {
        assert_eq!(decode_format(MIME_WEBP), Some(ImageFormat::WebP));
        assert_eq!(decode_format("text/plain"), None);
        assert!(is_pdf(MIME_PDF));
    }
}
