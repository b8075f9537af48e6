use diffpost_core::{AnnotatedFile, LineChange, LineKind, Result};
use diffpost_git::blame::line_author;
use diffpost_git::runner::GitRunner;

/// Diffs one file between two revisions and attributes every changed line.
///
/// Runs `git diff --unified=0 <base_rev>..<target_rev> -- <path>` and walks
/// the output. Returns `Ok(None)` when the diff is empty. Added lines are
/// blamed at `target_rev` under their new line number, removed lines at
/// `base_rev` under their old one, so attribution stays correct even after
/// the line is gone from the checkout.
pub fn annotate_file(
    git: &GitRunner,
    path: &str,
    base_rev: &str,
    target_rev: &str,
) -> Result<Option<AnnotatedFile>> {
    let range = format!("{base_rev}..{target_rev}");
    let diff = git.run(&["diff", "--unified=0", &range, "--", path])?;
    if diff.trim().is_empty() {
        return Ok(None);
    }

    let mut lines = parse_line_changes(&diff);
    for line in &mut lines {
        line.author = match line.kind {
            LineKind::Added => line
                .new_line
                .map(|number| line_author(git, target_rev, path, number)),
            LineKind::Removed => line
                .old_line
                .map(|number| line_author(git, base_rev, path, number)),
            LineKind::Context => None,
        };
    }
    Ok(Some(AnnotatedFile {
        path: path.to_string(),
        lines,
    }))
}

/// Walks unified diff output and records every line change.
///
/// Hunk headers seed the line counters. Headers that do not parse are
/// skipped with the counters left as they were. File headers (`--- `,
/// `+++ `) are filtered out before any `+`/`-` classification.
pub fn parse_line_changes(diff: &str) -> Vec<LineChange> {
    let mut changes = Vec::new();
    let mut old_line: u32 = 0;
    let mut new_line: u32 = 0;

    for line in diff.lines() {
        if line.starts_with("@@") {
            match parse_hunk_header(line) {
                Some((old_start, new_start)) => {
                    old_line = old_start;
                    new_line = new_start;
                }
                None => log::debug!("unparseable hunk header: {line}"),
            }
            continue;
        }
        if line.starts_with("--- ") || line.starts_with("+++ ") {
            continue;
        }
        if let Some(text) = line.strip_prefix('+') {
            changes.push(LineChange {
                kind: LineKind::Added,
                old_line: None,
                new_line: Some(new_line),
                text: text.to_string(),
                author: None,
            });
            new_line += 1;
        } else if let Some(text) = line.strip_prefix('-') {
            changes.push(LineChange {
                kind: LineKind::Removed,
                old_line: Some(old_line),
                new_line: None,
                text: text.to_string(),
                author: None,
            });
            old_line += 1;
        } else if let Some(text) = line.strip_prefix(' ') {
            changes.push(LineChange {
                kind: LineKind::Context,
                old_line: Some(old_line),
                new_line: Some(new_line),
                text: text.to_string(),
                author: None,
            });
            old_line += 1;
            new_line += 1;
        }
    }
    changes
}

/// Parses `@@ -old[,count] +new[,count] @@` into the two start lines.
fn parse_hunk_header(line: &str) -> Option<(u32, u32)> {
    let rest = line.strip_prefix("@@ ")?;
    let end = rest.find(" @@")?;
    let (old_part, new_part) = rest[..end].split_once(' ')?;
    let old_start = old_part.strip_prefix('-')?.split(',').next()?.parse().ok()?;
    let new_start = new_part.strip_prefix('+')?.split(',').next()?.parse().ok()?;
    Some((old_start, new_start))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hunk_header_seeds_the_counters() {
        let diff = "\
diff --git a/build.gradle b/build.gradle
index 1111111..2222222 100644
--- a/build.gradle
+++ b/build.gradle
@@ -3,0 +4,2 @@ dependencies {
+    implementation(libs.retrofit)
+    implementation(libs.moshi)
";
        let changes = parse_line_changes(diff);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, LineKind::Added);
        assert_eq!(changes[0].new_line, Some(4));
        assert_eq!(changes[0].old_line, None);
        assert_eq!(changes[0].text, "    implementation(libs.retrofit)");
        assert_eq!(changes[1].new_line, Some(5));
    }

    #[test]
    fn removed_lines_count_on_the_old_side() {
        let diff = "\
--- a/proguard-rules.pro
+++ b/proguard-rules.pro
@@ -7,2 +6,0 @@
-keep class com.example.** { *; }
-dontwarn okio.**
";
        let changes = parse_line_changes(diff);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, LineKind::Removed);
        assert_eq!(changes[0].old_line, Some(7));
        assert_eq!(changes[0].new_line, None);
        assert_eq!(changes[1].old_line, Some(8));
        assert_eq!(changes[1].text, "dontwarn okio.**");
    }

    #[test]
    fn counts_are_optional_in_hunk_headers() {
        let diff = "@@ -1 +1 @@\n-old = 1\n+old = 2\n";
        let changes = parse_line_changes(diff);
        assert_eq!(changes[0].old_line, Some(1));
        assert_eq!(changes[1].new_line, Some(1));
    }

    #[test]
    fn file_headers_are_not_removals() {
        let diff = "--- a/build.gradle\n+++ b/build.gradle\n@@ -1,1 +1,1 @@\n-x\n+y\n";
        let changes = parse_line_changes(diff);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].text, "x");
        assert_eq!(changes[1].text, "y");
    }

    #[test]
    fn malformed_hunk_headers_leave_counters_alone() {
        let diff = "@@ bogus @@\n+first\n";
        let changes = parse_line_changes(diff);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].new_line, Some(0));
    }

    #[test]
    fn context_lines_advance_both_counters() {
        let diff = "@@ -10,2 +20,3 @@\n plugins {\n+    id(\"maven-publish\")\n";
        let changes = parse_line_changes(diff);
        assert_eq!(changes[0].kind, LineKind::Context);
        assert_eq!(changes[0].old_line, Some(10));
        assert_eq!(changes[0].new_line, Some(20));
        assert_eq!(changes[1].kind, LineKind::Added);
        assert_eq!(changes[1].new_line, Some(21));
    }

    #[test]
    fn metadata_lines_are_ignored() {
        let diff = "\
diff --git a/gradle.properties b/gradle.properties
old mode 100644
new mode 100755
";
        assert!(parse_line_changes(diff).is_empty());
    }

    #[test]
    fn no_newline_marker_is_ignored() {
        let diff = "@@ -1,1 +1,1 @@\n-a\n+b\n\\ No newline at end of file\n";
        let changes = parse_line_changes(diff);
        assert_eq!(changes.len(), 2);
    }
}
