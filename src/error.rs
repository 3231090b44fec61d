//! Unified error handling for the duty-roster crate
//!
//! This module provides a unified error type that wraps the engine errors
//! together with the I/O and serialization failures of the host layer.
//!
//! # Architecture
//!
//! - [`RosterErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use duty_roster::error::{Error, RosterErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("À corriger: {}", err.french_desc());
//!     } else {
//!         eprintln!("Fatal error: {}", err);
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::engine::error::EngineError;

/// Common trait for all duty-roster error types
pub trait RosterErrorTrait: std::error::Error {
    /// Check if this error is recoverable (the operator can fix the input)
    fn is_recoverable(&self) -> bool;

    /// Get French description for operator-facing messages
    fn french_desc(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Roster or schedule data that breaks a structural rule
    Data,
    /// Configuration and validation errors
    Config,
    /// Storage and I/O errors
    Storage,
    /// Serialization errors
    Parsing,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get French description for the category
    pub fn french_desc(&self) -> &'static str {
        match self {
            Self::Data => "Erreur de données",
            Self::Config => "Erreur de configuration",
            Self::Storage => "Erreur de stockage",
            Self::Parsing => "Erreur de lecture",
            Self::Other => "Autre erreur",
        }
    }
}

impl RosterErrorTrait for EngineError {
    fn is_recoverable(&self) -> bool {
        EngineError::is_recoverable(self)
    }

    fn french_desc(&self) -> String {
        EngineError::french_desc(self)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. } => ErrorCategory::Config,
            _ => ErrorCategory::Data,
        }
    }
}

/// Unified error type for the duty-roster crate
#[derive(Error, Debug)]
pub enum Error {
    /// Assignment engine errors
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RosterErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Engine(e) => RosterErrorTrait::is_recoverable(e),
            Self::Io(_) => true,
            Self::Json(_) | Self::Toml(_) => false,
            Self::Other { source, .. } => source
                .as_deref()
                .is_some_and(|e| e.downcast_ref::<io::Error>().is_some()),
        }
    }

    fn french_desc(&self) -> String {
        match self {
            Self::Engine(e) => RosterErrorTrait::french_desc(e),
            Self::Io(e) => format!("Erreur d'entrée/sortie: {e}"),
            Self::Json(e) => format!("JSON invalide: {e}"),
            Self::Toml(e) => format!("TOML invalide: {e}"),
            Self::Other { context, source } => match source {
                Some(e) => format!("{context}: {e}"),
                None => context.clone(),
            },
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Engine(e) => RosterErrorTrait::category(e),
            Self::Io(_) => ErrorCategory::Storage,
            Self::Json(_) => ErrorCategory::Parsing,
            Self::Toml(_) => ErrorCategory::Config,
            Self::Other { source, .. } => match source {
                Some(e) if e.downcast_ref::<io::Error>().is_some() => ErrorCategory::Storage,
                _ => ErrorCategory::Other,
            },
        }
    }
}

impl Error {
    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
