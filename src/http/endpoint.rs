//! Endpoint validation and URL resolution

use crate::error::{Error, Result};
use url::Url;

/// Validate a relative endpoint path
///
/// Leading slashes are stripped. Empty endpoints, absolute URLs and any
/// `..` segment (including its percent-encoded forms) are rejected.
pub fn validate_endpoint(endpoint: &str) -> Result<&str> {
    let trimmed = endpoint.trim().trim_start_matches('/');
    let path = trimmed.split(['?', '#']).next().unwrap_or_default();

    if path.is_empty() {
        return Err(Error::validation("endpoint must not be empty"));
    }

    if trimmed.contains("://") || trimmed.contains('\\') {
        return Err(Error::validation(format!("invalid endpoint: {endpoint}")));
    }

    let traverses = path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == ".."
    });
    if traverses {
        return Err(Error::validation(format!(
            "path traversal in endpoint: {endpoint}"
        )));
    }

    Ok(trimmed)
}

/// Resolve a validated endpoint against the base URL
///
/// The result must use `http` or `https` and stay under the base URL.
pub fn resolve_endpoint(base_url: &Url, endpoint: &str) -> Result<Url> {
    let endpoint = validate_endpoint(endpoint)?;

    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    let resolved = base.join(endpoint)?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(Error::validation(format!(
            "unsupported URL scheme: {}",
            resolved.scheme()
        )));
    }

    if !resolved.as_str().starts_with(base.as_str()) {
        return Err(Error::validation(format!(
            "endpoint resolves outside base_url: {endpoint}"
        )));
    }

    Ok(resolved)
}
