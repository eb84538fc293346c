use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::LogoError;

/// Turn a logo source into the value stored in `template.logo_url`.
///
/// An existing file is embedded as a `data:` URI; anything else is taken to
/// be a URL and kept verbatim. Reachability and MIME type are not checked.
pub fn ingest(source: &str) -> Result<String, LogoError> {
    let source = source.trim();
    let path = Path::new(source);
    if !source.is_empty() && path.is_file() {
        embed_file(path)
    } else {
        debug!(url = %source, "storing logo as url");
        Ok(source.to_string())
    }
}

pub fn embed_file(path: &Path) -> Result<String, LogoError> {
    let bytes = fs::read(path).map_err(|source| LogoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(path = %path.display(), %mime, size = bytes.len(), "embedding logo");
    Ok(data_uri(mime.essence_str(), &bytes))
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
