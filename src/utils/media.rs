// src/utils/media.rs

use url::Url;

/// Turns relative media paths from the answer key into absolute URLs for email clients.
#[derive(Debug, Clone)]
pub struct MediaResolver {
    base: Url,
}

impl MediaResolver {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        // Without a trailing slash `join` would replace the last path segment.
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    /// Resolves `path` against the base URL. Absolute URLs pass through unchanged.
    ///
    /// The result is always percent-encoded, so it can be placed inside an HTML attribute.
    pub fn resolve(&self, path: &str) -> String {
        match self.base.join(path.trim_start_matches('/')) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Could not resolve media path {:?}: {}", path, e);
                self.fallback(path)
            }
        }
    }

    /// Base URL followed by the whole path encoded as a single segment.
    fn fallback(&self, path: &str) -> String {
        let encoded: String =
            url::form_urlencoded::byte_serialize(path.trim_start_matches('/').as_bytes()).collect();
        format!("{}{}", self.base, encoded)
    }
}
