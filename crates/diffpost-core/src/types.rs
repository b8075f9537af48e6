use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification of one line in a unified diff.
///
/// # Examples
///
/// ```
/// use diffpost_core::LineKind;
///
/// let kind = LineKind::Added;
/// assert_eq!(format!("{kind}"), "added");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Line present only in the new version.
    Added,
    /// Line present only in the old version.
    Removed,
    /// Unchanged line shown for context.
    Context,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Added => write!(f, "added"),
            LineKind::Removed => write!(f, "removed"),
            LineKind::Context => write!(f, "context"),
        }
    }
}

/// A single annotated line from a file's diff.
///
/// Added lines carry a new-file line number, removed lines an old-file line
/// number, context lines both. `text` is the line content with the diff
/// prefix stripped and nothing else touched.
///
/// # Examples
///
/// ```
/// use diffpost_core::{LineChange, LineKind};
///
/// let change = LineChange {
///     kind: LineKind::Added,
///     old_line: None,
///     new_line: Some(4),
///     text: "implementation(libs.retrofit)".into(),
///     author: Some("Alice".into()),
/// };
/// assert_eq!(change.new_line, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChange {
    /// Kind of change.
    pub kind: LineKind,
    /// Line number in the old version, where applicable.
    pub old_line: Option<u32>,
    /// Line number in the new version, where applicable.
    pub new_line: Option<u32>,
    /// Line content without the leading `+`/`-`/space.
    pub text: String,
    /// Author from `git blame`, once attributed.
    pub author: Option<String>,
}

/// All annotated line changes for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedFile {
    /// Path relative to the repository root.
    pub path: String,
    /// Line changes in diff order.
    pub lines: Vec<LineChange>,
}

impl AnnotatedFile {
    /// Returns `true` if the file has at least one added or removed line.
    ///
    /// A diff that only moves context (e.g. a pure mode change) annotates
    /// nothing and is dropped from the report.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffpost_core::AnnotatedFile;
    ///
    /// let file = AnnotatedFile { path: "build.gradle".into(), lines: vec![] };
    /// assert!(!file.has_changes());
    /// ```
    pub fn has_changes(&self) -> bool {
        self.lines
            .iter()
            .any(|line| line.kind != LineKind::Context)
    }
}

/// Output format for `--dry-run` rendering.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use diffpost_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// The HTML email body exactly as it would be sent.
    Html,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
