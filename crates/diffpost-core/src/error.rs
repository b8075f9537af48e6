/// Errors that can occur across the diffpost pipeline.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to a `miette` diagnostic at the
/// boundary.
///
/// # Examples
///
/// ```
/// use diffpost_core::DiffpostError;
///
/// let err = DiffpostError::Config("missing BUILD_SOURCEVERSION".into());
/// assert!(err.to_string().contains("BUILD_SOURCEVERSION"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DiffpostError {
    /// Filesystem or subprocess I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git subprocess failure.
    #[error("git error: {0}")]
    Git(String),

    /// Email construction or SMTP delivery failure.
    #[error("mail error: {0}")]
    Mail(String),
}
