/// Substring that makes a path relevant regardless of its extension.
pub const BUILD_LOGIC_MARKER: &str = "build-logic";

/// Decides which changed paths belong in the report.
///
/// A path matches when it contains [`BUILD_LOGIC_MARKER`] or ends with one
/// of the configured suffixes. Suffixes are compared verbatim, so `kts`
/// matches `build.gradle.kts` but not `Build.KTS`.
///
/// # Examples
///
/// ```
/// use diffpost_git::filter::ExtensionFilter;
///
/// let filter = ExtensionFilter::parse("toml,kts");
/// assert!(filter.matches("gradle/libs.versions.toml"));
/// assert!(filter.matches("build-logic/src/Convention.java"));
/// assert!(!filter.matches("src/main.rs"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Create a filter from an already-split suffix list.
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.to_vec(),
        }
    }

    /// Builds a filter from a comma-separated suffix list, dropping empty
    /// segments.
    pub fn parse(raw: &str) -> Self {
        Self {
            extensions: raw
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Check whether a changed path belongs in the report.
    pub fn matches(&self, path: &str) -> bool {
        path.contains(BUILD_LOGIC_MARKER)
            || self.extensions.iter().any(|ext| path.ends_with(ext))
    }
}
