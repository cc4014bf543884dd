//! Content types for served files, looked up by extension in a fixed table.

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

pub fn from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        _ => FALLBACK,
    }
}

pub fn from_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(from_extension)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_files() {
        assert_eq!(from_path(Path::new("public/index.html")), "text/html");
        assert_eq!(from_path(Path::new("INDEX.HTM")), "text/html");
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(from_path(Path::new("data.bin")), FALLBACK);
        assert_eq!(from_path(Path::new("Makefile")), FALLBACK);
    }
}
