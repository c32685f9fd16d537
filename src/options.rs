//! Gateway connection options.

use std::collections::HashMap;
use std::time::Duration;

/// A secret string type for sensitive data like access tokens.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Connection options for the analysis gateway.
///
/// # Example
/// ```
/// use statstream::options::GatewayOptions;
/// use std::time::Duration;
///
/// let options = GatewayOptions::new("https://gateway.example.com")
///     .with_token("anon-key")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    /// Base URL of the gateway; the analyze endpoint path is appended.
    pub base_url: String,

    /// Bearer token sent with every request.
    pub token: Option<SecretString>,

    /// Request timeout. Note this bounds the whole streaming response, not
    /// individual chunks; leave unset for long-running analyses.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL.
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl GatewayOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<SecretString>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacts_debug() {
        let secret = SecretString::from("sk-very-secret");
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
        assert_eq!(secret.expose_secret(), "sk-very-secret");
    }

    #[test]
    fn test_builder_accumulates_headers() {
        let options = GatewayOptions::new("https://g.example")
            .with_header("x-client-info".to_string(), "statstream".to_string())
            .with_header("apikey".to_string(), "anon".to_string());

        let headers = options.extra_headers.unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["apikey"], "anon");
    }
}
