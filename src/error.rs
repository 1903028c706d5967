//! Error types for doc-merge.
//!
//! The library surfaces one typed taxonomy, [`MergeError`]; each variant names
//! the pipeline stage that failed and, where applicable, the URL or path that
//! was implicated. The CLI boundary wraps this with `anyhow`.

use std::path::PathBuf;

/// Top-level error type for all merge-job operations.
///
/// `Display` and `Error` are implemented by hand rather than via
/// `thiserror::Error`: the derive treats the `Compose` variant's `source`
/// field as the std error source and requires it to implement
/// `std::error::Error`, which `String` does not. The field name is part of
/// the public API (SPEC_FULL §7), so the derive cannot be used.
#[derive(Debug)]
pub enum MergeError {
    /// Bad request shape (e.g. no module URLs). Client error.
    Validation { message: String },

    /// A remote input document could not be retrieved. Upstream failure.
    Fetch { url: String, message: String },

    /// A fetched document could not be parsed or appended. Processing failure;
    /// `source` names the offending input.
    Compose { source: String, message: String },

    /// The object store rejected the write or the transfer failed. Downstream
    /// failure.
    Publish { path: String, message: String },

    /// Required configuration is absent or invalid. Fatal, raised before any
    /// network I/O is attempted.
    Configuration { message: String },

    /// Local scratch-storage I/O error.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::Validation { message } => write!(f, "validation error: {message}"),
            MergeError::Fetch { url, message } => write!(f, "fetch failed for {url}: {message}"),
            MergeError::Compose { source, message } => {
                write!(f, "compose failed for {source}: {message}")
            }
            MergeError::Publish { path, message } => {
                write!(f, "publish failed for {path}: {message}")
            }
            MergeError::Configuration { message } => write!(f, "configuration error: {message}"),
            MergeError::Io { path, source } => write!(f, "I/O error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MergeError>;

impl MergeError {
    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a fetch error for the given source URL.
    pub fn fetch(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a compose error naming the offending source.
    pub fn compose(source: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Compose {
            source: source.into(),
            message: msg.into(),
        }
    }

    /// Create a publish error for the given destination path.
    pub fn publish(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Publish {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a configuration error from any displayable message.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with the scratch path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status a routing layer should map this error onto.
    ///
    /// Validation is a client error; fetch and publish are bad-gateway
    /// (upstream/downstream dependency failures); compose is an
    /// unprocessable-content failure of the inputs themselves.
    pub fn http_status(&self) -> u16 {
        match self {
            MergeError::Validation { .. } => 400,
            MergeError::Fetch { .. } => 502,
            MergeError::Compose { .. } => 422,
            MergeError::Publish { .. } => 502,
            MergeError::Configuration { .. } => 500,
            MergeError::Io { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = MergeError::validation("module_urls is required");
        assert_eq!(err.to_string(), "validation error: module_urls is required");

        let err = MergeError::fetch("https://example.com/a.docx", "HTTP 404");
        assert!(err.to_string().contains("https://example.com/a.docx"));
        assert!(err.to_string().contains("HTTP 404"));

        let err = MergeError::compose("https://example.com/m.docx", "not a zip");
        assert!(err.to_string().starts_with("compose failed for"));

        let err = MergeError::publish("manuals/abc123.docx", "store returned HTTP 500");
        assert!(err.to_string().contains("manuals/abc123.docx"));

        // The CLI surfaces this Display; keep the phrase stable.
        let err = MergeError::configuration("OBJECT_STORE_URL is required");
        assert_eq!(
            err.to_string(),
            "configuration error: OBJECT_STORE_URL is required"
        );
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(MergeError::validation("x").http_status(), 400);
        assert_eq!(MergeError::fetch("u", "m").http_status(), 502);
        assert_eq!(MergeError::compose("s", "m").http_status(), 422);
        assert_eq!(MergeError::publish("p", "m").http_status(), 502);
        assert_eq!(MergeError::configuration("x").http_status(), 500);
        let io = MergeError::io(
            "/tmp/doc-merge",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        assert_eq!(io.http_status(), 500);
    }
}
