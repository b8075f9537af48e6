use clap::Parser;
use env_logger::{Env, Target};
use log::{info, warn};
use miette::{Context, IntoDiagnostic, Result};

use diffpost_core::{Config, OutputFormat};
use diffpost_git::changes::changed_files;
use diffpost_git::filter::ExtensionFilter;
use diffpost_git::runner::GitRunner;
use diffpost_report::mailer::Mailer;
use diffpost_report::report::build_report;

#[derive(Parser)]
#[command(
    name = "diffpost",
    version,
    about = "Emails line-level, blame-annotated build-config diffs for pull requests",
    long_about = "diffpost inspects the pull request a CI build runs for, finds the changed\n\
                   build-configuration files (version catalogs, Gradle scripts, ProGuard rules),\n\
                   annotates every added and removed line with its author via git blame, and\n\
                   emails the review team an HTML summary.\n\n\
                   Context comes from the CI environment: BUILD_SOURCEVERSION and\n\
                   BUILD_REPOSITORY_LOCALPATH are required; SMTP_SERVER, SMTP_PORT, EMAIL_USER\n\
                   and TEAM_EMAIL enable delivery.\n\n\
                   Examples:\n  \
                     diffpost                          Watch the default extensions\n  \
                     diffpost gradle,toml              Watch a custom extension list\n  \
                     diffpost --dry-run --format html  Print the email body instead of sending"
)]
struct Cli {
    /// Comma-separated extension suffixes to watch (default: toml,kts,gradle,pro)
    extensions: Option<String>,

    /// Print the report instead of sending the email
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(
        long,
        default_value = "text",
        long_help = "Output format used with --dry-run.\n\n\
                       Formats:\n  \
                         text  Human-readable summary (default)\n  \
                         json  Machine-readable JSON with camelCase keys\n  \
                         html  The email body exactly as it would be sent"
    )]
    format: OutputFormat,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env(cli.extensions.as_deref())
        .into_diagnostic()
        .wrap_err("reading CI environment")?;

    let git = GitRunner::new(&config.pr.repo_dir);
    let filter = ExtensionFilter::new(&config.extensions);

    let files = changed_files(
        &git,
        &filter,
        &config.pr.base_branch,
        &config.pr.source_branch,
    );
    if files.is_empty() {
        info!("No relevant file changes found.");
        return Ok(());
    }

    let report = build_report(&git, &config.pr, &files);
    if report.sections.is_empty() {
        info!("No changes in specified file types, no email sent.");
        return Ok(());
    }

    if cli.dry_run {
        match cli.format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&report).into_diagnostic()?
            ),
            OutputFormat::Html => print!("{}", report.to_html()),
            OutputFormat::Text => print!("{report}"),
        }
        return Ok(());
    }

    match config.smtp {
        Some(settings) => {
            let mailer = Mailer::new(settings);
            // Delivery failures are reported but never fail the build.
            if let Err(err) = mailer.send(&report.subject(), report.to_html()) {
                warn!("Failed to send email: {err}");
            }
        }
        None => warn!("SMTP settings incomplete, no email sent."),
    }

    Ok(())
}
