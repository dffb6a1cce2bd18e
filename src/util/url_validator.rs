use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// Plain HTTP to a non-local host.
    #[error("Insecure API URL: HTTPS required (except localhost)")]
    InsecureBaseUrl,
}

/// Validates a link before it is handed to the system browser.
///
/// Source links and media URLs come from the article document, so anything
/// that is not plain `http`/`https` (e.g. `file://`, `javascript:`, custom
/// URL handlers) is refused rather than passed to the OS opener.
///
/// # Examples
///
/// ```
/// use lenta::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/story").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("/placeholder.svg").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str.trim())?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
}

/// Validates the engagement API base URL from config.
///
/// HTTPS is required so the bearer token never crosses the wire in clear
/// text; plain HTTP is allowed only for loopback hosts (local development
/// and tests).
pub fn validate_api_base_url(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = validate_url_for_open(url_str)?;

    if url.scheme() == "http" {
        let local = matches!(
            url.host_str(),
            Some("localhost") | Some("127.0.0.1") | Some("[::1]")
        );
        if !local {
            return Err(UrlValidationError::InsecureBaseUrl);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url_for_open("https://example.com/articles/1").is_ok());
        assert!(validate_url_for_open("http://news.example.org").is_ok());
    }

    #[test]
    fn test_invalid_schemes() {
        assert!(validate_url_for_open("file:///etc/passwd").is_err());
        assert!(validate_url_for_open("ftp://example.com").is_err());
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_relative_reference_rejected() {
        let result = validate_url_for_open("/placeholder.svg");
        assert!(matches!(result, Err(UrlValidationError::InvalidUrl(_))));
    }

    #[test]
    fn test_surrounding_whitespace_tolerated() {
        let url = validate_url_for_open("  https://example.com/a  ").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_api_base_requires_https() {
        assert!(validate_api_base_url("https://api.example.com").is_ok());
        assert!(matches!(
            validate_api_base_url("http://api.example.com"),
            Err(UrlValidationError::InsecureBaseUrl)
        ));
    }

    #[test]
    fn test_api_base_allows_plain_http_on_loopback() {
        assert!(validate_api_base_url("http://localhost:8080").is_ok());
        assert!(validate_api_base_url("http://127.0.0.1:4000/api").is_ok());
        assert!(validate_api_base_url("http://[::1]:4000").is_ok());
    }
}
