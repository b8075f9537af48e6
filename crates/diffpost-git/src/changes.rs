use diffpost_core::Result;

use crate::filter::ExtensionFilter;
use crate::runner::{upstream, GitRunner};

/// Lists the pull request's changed paths that pass `filter`.
///
/// Paths come from `git diff --name-only --diff-filter=MARC` over the
/// merge-base range `origin/<base>...origin/<source>`. Each candidate is then
/// confirmed twice: its merge-base diff must be non-empty and `git diff
/// --quiet` between the branch tips must report a difference. Git failures
/// degrade to an empty list with a warning so a broken checkout never fails
/// the build.
pub fn changed_files(
    git: &GitRunner,
    filter: &ExtensionFilter,
    base_branch: &str,
    source_branch: &str,
) -> Vec<String> {
    match try_changed_files(git, filter, base_branch, source_branch) {
        Ok(files) => files,
        Err(err) => {
            log::warn!("could not list changed files: {err}");
            Vec::new()
        }
    }
}

fn try_changed_files(
    git: &GitRunner,
    filter: &ExtensionFilter,
    base_branch: &str,
    source_branch: &str,
) -> Result<Vec<String>> {
    let merge_range = format!("{}...{}", upstream(base_branch), upstream(source_branch));
    let tip_range = format!("{}..{}", upstream(base_branch), upstream(source_branch));

    let listing = git.run(&["diff", "--name-only", "--diff-filter=MARC", &merge_range])?;

    let mut relevant = Vec::new();
    for path in listing.lines().filter(|path| !path.is_empty()) {
        if !filter.matches(path) {
            continue;
        }
        let content = git.run(&["diff", &merge_range, "--", path])?;
        if content.trim().is_empty() {
            continue;
        }
        if !git.succeeds(&["diff", "--quiet", &tip_range, "--", path])? {
            relevant.push(path.to_string());
        }
    }
    Ok(relevant)
}
