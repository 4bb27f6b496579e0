//! # Error Handling for SitemapFlow
//!
//! This module defines custom error types for the various components of the
//! SitemapFlow sitemap generation engine. The `thiserror` crate is used to
//! simplify error creation and ensure consistent handling across the library.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the SitemapFlow library.
///
/// This type alias simplifies function signatures by defining a result type that always uses `SitemapError` as the error variant.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// The main error type for SitemapFlow, encompassing all potential error cases.
///
/// `SitemapError` is an enumerated type that represents different errors that can occur throughout the library. Each variant describes a specific error type with associated details.
#[derive(Error, Debug)]
pub enum SitemapError {
    /// Error related to configuration initialisation or validation.
    ///
    /// This error occurs when there is a problem with configuration files or values.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file that caused the error.
        path: Option<PathBuf>,
    },

    /// Error raised by a resource provider while enumerating sitemap resources.
    ///
    /// Provider failures are fatal for the generation run: the engine does not
    /// catch or retry them, it propagates them to the caller.
    #[error("Resource provider error: {message}.")]
    ProviderError {
        /// Detailed description of the provider error.
        message: String,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error in XML output generation.
    ///
    /// This variant represents issues that arise while serialising a sitemap or
    /// sitemap-index document to the output stream.
    #[error("XML output error: {message}.")]
    XmlOutputError {
        /// Description of the XML output error.
        message: String,
        /// Optional source error providing additional context, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// IO error encountered while writing to the output stream or reading files.
    #[error("File IO error at `{path:?}`: {source}")]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// General internal error.
    ///
    /// This variant represents miscellaneous errors within the library that
    /// do not fall under any specific category.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for SitemapError {
    /// Converts a standard IO error into a `SitemapError::IOError`.
    ///
    /// # Parameters
    /// - `source`: The IO error encountered.
    ///
    /// # Returns
    /// - A `SitemapError::IOError` with an empty path if no path is provided.
    fn from(source: std::io::Error) -> Self {
        SitemapError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl From<quick_xml::Error> for SitemapError {
    /// Converts a `quick_xml` serialization error into a
    /// `SitemapError::XmlOutputError`.
    fn from(source: quick_xml::Error) -> Self {
        SitemapError::XmlOutputError {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl SitemapError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the configuration file causing the error.
    ///
    /// # Returns
    /// - A `SitemapError::ConfigError` containing the message and optional path.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        SitemapError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Creates a `ProviderError` with a specific message and optional source.
    ///
    /// # Parameters
    /// - `message`: A description of the provider error.
    /// - `source`: An optional source error providing additional context.
    ///
    /// # Returns
    /// - A `SitemapError::ProviderError` with the message and optional source.
    pub fn provider_error<S: Into<String>>(
        message: S,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SitemapError::ProviderError {
            message: message.into(),
            source,
        }
    }

    /// Creates an `XmlOutputError` with a specific message and optional source.
    ///
    /// # Parameters
    /// - `message`: A description of the XML output error.
    /// - `source`: An optional source error providing additional context.
    ///
    /// # Returns
    /// - A `SitemapError::XmlOutputError` with the message and optional source.
    pub fn xml_output_error<S: Into<String>>(
        message: S,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SitemapError::XmlOutputError {
            message: message.into(),
            source,
        }
    }

    /// Wraps an IO error as an `IOError` variant with the specified path.
    ///
    /// # Parameters
    /// - `path`: The file path associated with the IO error.
    /// - `source`: The original IO error.
    ///
    /// # Returns
    /// - A `SitemapError::IOError` with the specified path and source.
    pub fn io_error(path: PathBuf, source: std::io::Error) -> Self {
        SitemapError::IOError { path, source }
    }

    /// Creates a general internal error with a custom message.
    ///
    /// # Parameters
    /// - `message`: A description of the internal error.
    ///
    /// # Returns
    /// - A `SitemapError::InternalError` with the provided message.
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        SitemapError::InternalError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = SitemapError::config_error(
            "invalid shard size",
            Some(PathBuf::from("sitemap.toml")),
        );
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid shard size."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        );
        let err: SitemapError = io.into();
        assert!(matches!(err, SitemapError::IOError { .. }));
    }

    #[test]
    fn test_provider_error_source() {
        let source = std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "storage unavailable",
        );
        let err = SitemapError::provider_error(
            "category lookup failed",
            Some(Box::new(source)),
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
