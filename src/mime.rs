//! Content-type lookup for object keys
//!
//! Static extension table used by the CLI `put` path when the caller
//! does not name a content type. Pure lookup, no I/O.

/// Content type assigned when the key's extension is unknown or absent.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Derive a content type from the key's file extension.
///
/// The extension match is ASCII case-insensitive, so `logo.PNG` and
/// `logo.png` resolve identically.
pub fn content_type_for_key(key: &str) -> &'static str {
    let ext = match key.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => return DEFAULT_CONTENT_TYPE,
    };

    match ext.to_ascii_lowercase().as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(content_type_for_key("notes.txt"), "text/plain");
        assert_eq!(content_type_for_key("index.html"), "text/html");
        assert_eq!(content_type_for_key("index.htm"), "text/html");
        assert_eq!(content_type_for_key("site.css"), "text/css");
        assert_eq!(content_type_for_key("app.js"), "application/javascript");
        assert_eq!(content_type_for_key("data.json"), "application/json");
        assert_eq!(content_type_for_key("feed.xml"), "application/xml");
        assert_eq!(content_type_for_key("logo.png"), "image/png");
        assert_eq!(content_type_for_key("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for_key("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for_key("anim.gif"), "image/gif");
        assert_eq!(content_type_for_key("doc.pdf"), "application/pdf");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for_key("LOGO.PNG"), "image/png");
        assert_eq!(content_type_for_key("readme.TXT"), "text/plain");
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(content_type_for_key("archive.tar.zst"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_key("no_extension"), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_key("trailing."), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for_key(""), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_last_extension_wins() {
        assert_eq!(content_type_for_key("bundle.min.js"), "application/javascript");
        assert_eq!(content_type_for_key("backup.json.txt"), "text/plain");
    }
}
