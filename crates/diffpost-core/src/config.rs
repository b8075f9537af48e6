use std::path::PathBuf;

use crate::error::DiffpostError;

/// Extension suffixes watched when no override is given on the command line.
pub const DEFAULT_EXTENSIONS: &str = "toml,kts,gradle,pro";

/// Connection and addressing details for the report email.
///
/// Present only when `SMTP_SERVER`, `SMTP_PORT`, `EMAIL_USER` and
/// `TEAM_EMAIL` are all set to non-empty values and the port parses as a
/// number. Anything less and the run degrades to a report without delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    /// SMTP relay host.
    pub server: String,
    /// SMTP relay port.
    pub port: u16,
    /// Sender address (`From`).
    pub sender: String,
    /// Team address, always on `Cc`.
    pub team_email: String,
    /// Review team address (`To`), defaulting to `team_email`.
    pub review_team: String,
}

/// Pull request context read from the CI environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrContext {
    /// Checkout directory of the repository under inspection.
    pub repo_dir: PathBuf,
    /// Target branch of the pull request, without any `refs/heads/` prefix.
    pub base_branch: String,
    /// Source branch of the pull request, without any `refs/heads/` prefix.
    pub source_branch: String,
    /// Commit being built.
    pub commit_hash: String,
    /// Last segment of the collection URI.
    pub organization: String,
    /// Team project name.
    pub project: String,
    /// Repository name.
    pub repo_name: String,
    /// Pull request id, empty outside PR builds.
    pub pr_id: String,
    /// Pull request title, falling back to the source branch name.
    pub pr_title: String,
}

impl PrContext {
    /// Returns the pull request URL, or `None` when no PR id is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use diffpost_core::PrContext;
    ///
    /// let mut pr = PrContext {
    ///     repo_dir: "/work/repo".into(),
    ///     base_branch: "development".into(),
    ///     source_branch: "feature/deps".into(),
    ///     commit_hash: "abc123".into(),
    ///     organization: "acme".into(),
    ///     project: "mobile".into(),
    ///     repo_name: "app".into(),
    ///     pr_id: String::new(),
    ///     pr_title: "feature/deps".into(),
    /// };
    /// assert_eq!(pr.pr_link(), None);
    ///
    /// pr.pr_id = "42".into();
    /// assert_eq!(
    ///     pr.pr_link().unwrap(),
    ///     "https://your-pr-system.com/acme/mobile/_git/app/pullrequest/42"
    /// );
    /// ```
    pub fn pr_link(&self) -> Option<String> {
        if self.pr_id.is_empty() {
            return None;
        }
        Some(format!(
            "https://your-pr-system.com/{}/{}/_git/{}/pullrequest/{}",
            self.organization, self.project, self.repo_name, self.pr_id
        ))
    }
}

/// Everything a run needs, assembled once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pull request context.
    pub pr: PrContext,
    /// Email delivery settings, when complete.
    pub smtp: Option<SmtpSettings>,
    /// Extension suffixes a changed file must match to be reported.
    pub extensions: Vec<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `extensions` overrides [`DEFAULT_EXTENSIONS`] when given.
    pub fn from_env(extensions: Option<&str>) -> Result<Config, DiffpostError> {
        Config::from_lookup(|key| std::env::var(key).ok(), extensions)
    }

    /// Reads the configuration through `lookup`, one environment variable at
    /// a time.
    ///
    /// Fails only when `BUILD_SOURCEVERSION` or `BUILD_REPOSITORY_LOCALPATH`
    /// is missing or empty. Everything else has a default or degrades.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use diffpost_core::Config;
    ///
    /// let vars: HashMap<&str, &str> = [
    ///     ("BUILD_SOURCEVERSION", "abc123"),
    ///     ("BUILD_REPOSITORY_LOCALPATH", "/work/repo"),
    /// ]
    /// .into();
    /// let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()), None).unwrap();
    /// assert_eq!(config.pr.base_branch, "development");
    /// assert!(config.smtp.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F, extensions: Option<&str>) -> Result<Config, DiffpostError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let commit_hash = lookup("BUILD_SOURCEVERSION").unwrap_or_default();
        let repo_dir = lookup("BUILD_REPOSITORY_LOCALPATH").unwrap_or_default();

        let mut missing = Vec::new();
        if commit_hash.is_empty() {
            missing.push("BUILD_SOURCEVERSION");
        }
        if repo_dir.is_empty() {
            missing.push("BUILD_REPOSITORY_LOCALPATH");
        }
        if !missing.is_empty() {
            return Err(DiffpostError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let base_branch = lookup("SYSTEM_PULLREQUEST_TARGETBRANCH")
            .unwrap_or_else(|| "development".to_string())
            .replace("refs/heads/", "");
        let source_branch = lookup("SYSTEM_PULLREQUEST_SOURCEBRANCH")
            .unwrap_or_else(|| "HEAD".to_string())
            .replace("refs/heads/", "");
        let organization = lookup("SYSTEM_COLLECTIONURI")
            .unwrap_or_default()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        let pr_title =
            lookup("SYSTEM_PULLREQUEST_TITLE").unwrap_or_else(|| source_branch.clone());

        let pr = PrContext {
            repo_dir: PathBuf::from(repo_dir),
            base_branch,
            source_branch,
            commit_hash,
            organization,
            project: lookup("SYSTEM_TEAMPROJECT").unwrap_or_default(),
            repo_name: lookup("BUILD_REPOSITORY_NAME").unwrap_or_default(),
            pr_id: lookup("SYSTEM_PULLREQUEST_PULLREQUESTID").unwrap_or_default(),
            pr_title,
        };

        Ok(Config {
            pr,
            smtp: smtp_from_lookup(&lookup),
            extensions: split_extensions(extensions.unwrap_or(DEFAULT_EXTENSIONS)),
        })
    }
}

fn smtp_from_lookup<F>(lookup: &F) -> Option<SmtpSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let server = lookup("SMTP_SERVER").filter(|v| !v.is_empty())?;
    let port = lookup("SMTP_PORT")?.parse::<u16>().ok()?;
    let sender = lookup("EMAIL_USER").filter(|v| !v.is_empty())?;
    let team_email = lookup("TEAM_EMAIL").filter(|v| !v.is_empty())?;
    let review_team = lookup("CONFIG_REVIEW_TEAM")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| team_email.clone());
    Some(SmtpSettings {
        server,
        port,
        sender,
        team_email,
        review_team,
    })
}

fn split_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("BUILD_SOURCEVERSION", "abc123"),
        ("BUILD_REPOSITORY_LOCALPATH", "/work/repo"),
    ];

    #[test]
    fn missing_required_vars_lists_all_names() {
        let err = Config::from_lookup(lookup_in(&[]), None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("BUILD_SOURCEVERSION"));
        assert!(message.contains("BUILD_REPOSITORY_LOCALPATH"));
    }

    #[test]
    fn empty_required_var_counts_as_missing() {
        let vars = [
            ("BUILD_SOURCEVERSION", ""),
            ("BUILD_REPOSITORY_LOCALPATH", "/work/repo"),
        ];
        let err = Config::from_lookup(lookup_in(&vars), None).unwrap_err();
        assert!(err.to_string().contains("BUILD_SOURCEVERSION"));
    }

    #[test]
    fn minimal_environment_uses_defaults() {
        let config = Config::from_lookup(lookup_in(&REQUIRED), None).unwrap();
        assert_eq!(config.pr.base_branch, "development");
        assert_eq!(config.pr.source_branch, "HEAD");
        assert_eq!(config.pr.pr_title, "HEAD");
        assert_eq!(config.pr.pr_id, "");
        assert!(config.smtp.is_none());
        assert_eq!(config.extensions, vec!["toml", "kts", "gradle", "pro"]);
    }

    #[test]
    fn branch_names_drop_refs_heads_prefix() {
        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SYSTEM_PULLREQUEST_TARGETBRANCH", "refs/heads/development"),
            ("SYSTEM_PULLREQUEST_SOURCEBRANCH", "refs/heads/feature/deps"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        assert_eq!(config.pr.base_branch, "development");
        assert_eq!(config.pr.source_branch, "feature/deps");
        assert_eq!(config.pr.pr_title, "feature/deps");
    }

    #[test]
    fn organization_is_last_collection_uri_segment() {
        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SYSTEM_COLLECTIONURI", "https://dev.azure.com/acme/"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        assert_eq!(config.pr.organization, "acme");
    }

    #[test]
    fn smtp_requires_every_value() {
        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("EMAIL_USER", "ci@example.com"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn smtp_rejects_unparseable_port() {
        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "five"),
            ("EMAIL_USER", "ci@example.com"),
            ("TEAM_EMAIL", "team@example.com"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        assert!(config.smtp.is_none());
    }

    #[test]
    fn review_team_defaults_to_team_email() {
        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("EMAIL_USER", "ci@example.com"),
            ("TEAM_EMAIL", "team@example.com"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.review_team, "team@example.com");

        let vars = [
            REQUIRED[0],
            REQUIRED[1],
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "587"),
            ("EMAIL_USER", "ci@example.com"),
            ("TEAM_EMAIL", "team@example.com"),
            ("CONFIG_REVIEW_TEAM", "reviewers@example.com"),
        ];
        let config = Config::from_lookup(lookup_in(&vars), None).unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.review_team, "reviewers@example.com");
        assert_eq!(smtp.team_email, "team@example.com");
    }

    #[test]
    fn extension_override_trims_and_drops_empty_segments() {
        let config = Config::from_lookup(lookup_in(&REQUIRED), Some(" kts, ,gradle ,")).unwrap();
        assert_eq!(config.extensions, vec!["kts", "gradle"]);
    }
}
