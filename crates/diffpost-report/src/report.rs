use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use diffpost_core::{LineChange, LineKind, PrContext};
use diffpost_git::blame::UNKNOWN_AUTHOR;
use diffpost_git::history::latest_subject;
use diffpost_git::runner::{upstream, GitRunner};

use crate::annotate::annotate_file;
use crate::html;

/// The assembled report for one pull request.
///
/// Serializes with camelCase keys for `--format json`; [`fmt::Display`]
/// renders the plain-text form and [`ChangeReport::to_html`] the email body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeReport {
    /// Pull request title.
    pub title: String,
    /// Target branch name.
    pub base_branch: String,
    /// Subject of the newest commit on the pull request.
    pub commit_message: String,
    /// Pull request URL, when an id was available.
    pub link: Option<String>,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// One section per reportable file.
    pub sections: Vec<FileSection>,
}

/// Report section for one changed file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSection {
    /// Path relative to the repository root.
    pub path: String,
    /// Annotated lines, or the failure that replaced them.
    pub body: SectionBody,
}

/// Outcome of annotating one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionBody {
    /// Line changes with authorship.
    Annotated(Vec<LineChange>),
    /// Annotation failed; the file is still reported.
    Failed(String),
}

impl ChangeReport {
    /// Returns the email subject line.
    pub fn subject(&self) -> String {
        format!("[PR] {} - Changes in {}", self.base_branch, self.title)
    }

    /// Renders the HTML email body.
    pub fn to_html(&self) -> String {
        html::render_body(self)
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pull Request Detected")?;
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Base Branch: {}", self.base_branch)?;
        writeln!(f, "Commit Message: {}", self.commit_message)?;
        writeln!(
            f,
            "Link: {}",
            self.link.as_deref().unwrap_or("PR link not found")
        )?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}:", section.path)?;
            match &section.body {
                SectionBody::Annotated(lines) => {
                    for line in lines {
                        let author = line.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);
                        match line.kind {
                            LineKind::Added => writeln!(
                                f,
                                "  +{} {}: {}",
                                line.new_line.unwrap_or(0),
                                author,
                                line.text
                            )?,
                            LineKind::Removed => writeln!(
                                f,
                                "  -{} {}: {}",
                                line.old_line.unwrap_or(0),
                                author,
                                line.text
                            )?,
                            LineKind::Context => {}
                        }
                    }
                }
                SectionBody::Failed(message) => writeln!(f, "  {message}")?,
            }
        }
        Ok(())
    }
}

/// Assembles the report for `files`.
///
/// The commit message comes from the newest commit on the pull request
/// range. Each file is diffed against `origin/<base>..<commit_hash>` and
/// annotated; files whose diff turns out empty are dropped, files whose
/// annotation fails are kept with a failure note so the report still goes
/// out.
pub fn build_report(git: &GitRunner, pr: &PrContext, files: &[String]) -> ChangeReport {
    let commit_message = match latest_subject(git, &pr.base_branch, &pr.source_branch) {
        Ok(Some(subject)) => subject,
        Ok(None) => "No commit message found".to_string(),
        Err(err) => {
            log::warn!("could not read commit messages: {err}");
            "Error occurred".to_string()
        }
    };

    let base_rev = upstream(&pr.base_branch);
    let mut sections = Vec::new();
    for path in files {
        match annotate_file(git, path, &base_rev, &pr.commit_hash) {
            Ok(Some(file)) if file.has_changes() => sections.push(FileSection {
                path: file.path,
                body: SectionBody::Annotated(file.lines),
            }),
            Ok(_) => {}
            Err(err) => {
                log::warn!("diff failed for {path}: {err}");
                sections.push(FileSection {
                    path: path.clone(),
                    body: SectionBody::Failed("Diff failed".to_string()),
                });
            }
        }
    }

    ChangeReport {
        title: pr.pr_title.clone(),
        base_branch: pr.base_branch.clone(),
        commit_message,
        link: pr.pr_link(),
        generated_at: Utc::now(),
        sections,
    }
}
