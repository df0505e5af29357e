//! Landing and fallback URL validation.

use url::Url;

/// Errors produced while validating a redirect target.
#[derive(Debug, thiserror::Error)]
pub enum LandingUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Validates a redirect target and returns its canonical form.
///
/// # Rules
///
/// 1. **Protocol**: only HTTP and HTTPS
/// 2. **Host**: required, lowercased by the parser
/// 3. **Default ports**: removed (80 for HTTP, 443 for HTTPS)
/// 4. **Path, query, fragment**: preserved
///
/// Rejects `javascript:`, `data:`, `file:` and similar schemes so a stored
/// placement can never turn the tracking endpoint into an open script sink.
///
/// # Errors
///
/// Returns [`LandingUrlError`] describing the first violated rule.
pub fn normalize_landing_url(input: &str) -> Result<String, LandingUrlError> {
    let url = Url::parse(input.trim()).map_err(|e| LandingUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(LandingUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(LandingUrlError::MissingHost);
    }

    Ok(url.to_string())
}
