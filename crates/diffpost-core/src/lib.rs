//! Shared types for diffpost.
//!
//! This crate holds the configuration assembled from the CI environment, the
//! annotated-diff data model and the error type used across the workspace.

mod config;
mod error;
mod types;

pub use config::{Config, PrContext, SmtpSettings, DEFAULT_EXTENSIONS};
pub use error::DiffpostError;
pub use types::{AnnotatedFile, LineChange, LineKind, OutputFormat};

/// Convenient result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, DiffpostError>;
