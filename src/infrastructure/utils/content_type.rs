use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

/// Picks the content type for a static asset.
///
/// The file extension decides first; files without a known extension are
/// sniffed from their leading bytes.
pub fn content_type_for(path: &Path, bytes: &[u8]) -> &'static str {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .and_then(|e| match e.as_str() {
            "svg" => Some("image/svg+xml"),
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "avif" => Some("image/avif"),
            "ico" => Some("image/x-icon"),
            "pdf" => Some("application/pdf"),
            _ => None,
        });

    by_extension
        .or_else(|| infer::get(bytes).map(|kind| kind.mime_type()))
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_wins() {
        assert_eq!(content_type_for(Path::new("logo.svg"), b"<svg/>"), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("photo.JPG"), b""), "image/jpeg");
        assert_eq!(content_type_for(Path::new("logo.png"), b""), "image/png");
    }

    #[test]
    fn sniffs_unknown_extensions() {
        let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(content_type_for(Path::new("photo"), &png_header), "image/png");
    }

    #[test]
    fn falls_back_to_octet_stream() {
        assert_eq!(content_type_for(Path::new("logo.bin"), b"\x00\x01"), FALLBACK);
    }
}
