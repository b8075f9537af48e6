use crate::runner::GitRunner;

/// Author name reported when blame cannot attribute a line.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Returns the author of `line` in `path` as of `revision`.
///
/// Line numbers are 1-based. Line 0, a missing path at `revision` and any
/// other blame failure all come back as [`UNKNOWN_AUTHOR`]; the report never
/// fails over attribution.
pub fn line_author(git: &GitRunner, revision: &str, path: &str, line: u32) -> String {
    if line == 0 {
        return UNKNOWN_AUTHOR.to_string();
    }
    let range = format!("{line},{line}");
    match git.run(&["blame", "-L", &range, "--porcelain", revision, "--", path]) {
        Ok(output) => {
            porcelain_author(&output).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
        }
        Err(err) => {
            log::debug!("blame failed for {path}:{line} at {revision}: {err}");
            UNKNOWN_AUTHOR.to_string()
        }
    }
}

/// Extracts the author name from porcelain blame output.
///
/// # Examples
///
/// ```
/// let output = "abc123 1 1 1\nauthor Jane Doe\nauthor-mail <jane@example.com>\n";
/// assert_eq!(diffpost_git::blame::porcelain_author(output), Some("Jane Doe".into()));
/// ```
pub fn porcelain_author(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.strip_prefix("author "))
        .map(str::trim)
        .filter(|author| !author.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn porcelain_author_ignores_mail_and_time_headers() {
        let output = "abc123 4 4 1\n\
                      author Jane Doe\n\
                      author-mail <jane@example.com>\n\
                      author-time 1712000000\n\
                      author-tz +0200\n";
        assert_eq!(porcelain_author(output).as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn porcelain_author_requires_an_author_header() {
        assert_eq!(porcelain_author("abc123 4 4 1\nsummary tweak\n"), None);
        assert_eq!(porcelain_author(""), None);
    }

    #[test]
    fn blank_author_is_treated_as_missing() {
        assert_eq!(porcelain_author("author   \n"), None);
    }

    #[test]
    fn line_zero_is_unknown_without_running_git() {
        let runner = GitRunner::new("/nonexistent");
        assert_eq!(line_author(&runner, "HEAD", "build.gradle", 0), UNKNOWN_AUTHOR);
    }
}
