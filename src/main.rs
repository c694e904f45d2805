mod config;
mod pr;
mod report;
#[cfg(test)]
mod test_support;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

/// pr-files: list the changed files of a GitHub Pull Request, each with its diff.
///
/// Files GitHub returns without a patch are diffed locally with git, so run it
/// inside a checkout that has fetched both branches.
#[derive(Parser, Debug)]
#[command(name = "pr-files", version, about)]
struct Cli {
    /// GitHub Pull Request URL (e.g., https://github.com/org/repo/pull/42)
    pr_url: String,

    /// Base branch name; read from the pull request when omitted
    #[arg(long)]
    base: Option<String>,

    /// Head branch name; read from the pull request when omitted
    #[arg(long)]
    head: Option<String>,

    /// Regex of file paths to skip (overrides files.ignore_pattern).
    /// Uses Rust `regex` syntax: lookaround and backreferences are not
    /// supported. An empty value skips nothing.
    #[arg(long)]
    ignore_files_pattern: Option<String>,

    /// Checkout used for fallback diffs
    #[arg(long, default_value = ".")]
    repo_dir: PathBuf,

    /// Print the file list as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Optional output file path for markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let _main_span = info_span!("pr_files", pr_url = %cli.pr_url).entered();

    info!("parsing PR URL");
    let pr_url = pr::parse_pr_url(&cli.pr_url)?;
    debug!(owner = %pr_url.owner, repo = %pr_url.repo, pr = pr_url.pr_number, "parsed PR URL");

    info!("loading configuration");
    let config = config::Config::load()?;
    let token = config.github_token().ok_or(pr::PrError::MissingToken)?;
    let client = pr::GitHubClient::new(token, &config.github.api_url, config.github.per_page);

    let (base, head) = match (cli.base, cli.head) {
        (Some(base), Some(head)) => (base, head),
        (base, head) => {
            info!("fetching branch names from GitHub");
            let branches = client
                .fetch_branches(&pr_url.owner, &pr_url.repo, pr_url.pr_number)
                .await?;
            (base.unwrap_or(branches.base), head.unwrap_or(branches.head))
        }
    };

    let params = pr::GetFilesParams {
        owner: pr_url.owner.clone(),
        repo: pr_url.repo.clone(),
        pr_number: pr_url.pr_number,
        base,
        head,
        ignore_files_pattern: cli.ignore_files_pattern.or(config.files.ignore_pattern),
    };

    let differ = pr::GitDiff::new(config.diff.git, config.diff.remote, cli.repo_dir);
    let collector =
        pr::FileChangeCollector::new(client, differ).with_max_concurrency(config.diff.max_concurrency);

    info!("collecting changed files");
    let changes = collector.list_changed_files(&params).await?;
    info!(files = changes.len(), "collected changed files");

    let built_report = report::build(changes, &pr_url);
    report::output(&built_report, cli.output.as_deref(), cli.json)?;
    info!(missing_patches = built_report.missing_patches(), "done");

    Ok(())
}
