use diffpost_core::Result;

use crate::runner::{upstream, GitRunner};

/// Returns the subject of the newest commit the pull request adds.
///
/// Reads `git log --pretty=format:%s` over `origin/<base>..origin/<source>`
/// and keeps the first line. `Ok(None)` when the range holds no commits.
pub fn latest_subject(
    git: &GitRunner,
    base_branch: &str,
    source_branch: &str,
) -> Result<Option<String>> {
    let range = format!("{}..{}", upstream(base_branch), upstream(source_branch));
    let output = git.run(&["log", "--pretty=format:%s", &range])?;
    Ok(output.lines().next().map(str::to_string))
}
