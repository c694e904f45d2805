pub mod types;

pub use types::{FileSummary, LineStats, Report};

use crate::pr::{PrUrl, PullRequestFileChange};
use colored::Colorize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Build a Report from the collected file changes.
pub fn build(changes: Vec<PullRequestFileChange>, pr: &PrUrl) -> Report {
    let files = changes
        .iter()
        .map(|change| FileSummary {
            filename: change.filename.clone(),
            blob_url: change.blob_url.clone(),
            stats: LineStats::from_patch(&change.patch),
            has_patch: !change.patch.is_empty(),
        })
        .collect();

    Report {
        owner: pr.owner.clone(),
        repo: pr.repo.clone(),
        pr_number: pr.pr_number,
        files,
        changes,
    }
}

/// Output the report as JSON on stdout, to the terminal, or to a markdown file.
#[instrument(skip(report), fields(pr = report.pr_number, files = report.files.len()))]
pub fn output(report: &Report, output_path: Option<&Path>, json: bool) -> Result<(), ReportError> {
    if json {
        debug!("writing report as JSON");
        println!("{}", to_json(report)?);
        return Ok(());
    }

    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

fn to_json(report: &Report) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&report.changes)?)
}

/// Format and print the report to the terminal with colors.
///
/// PR org/repo#42 | Files: 2 | +12 -3
///
///   src/app.ts  +10 -3
///     https://github.com/org/repo/blob/.../src/app.ts
///   assets/logo.png  no diff
fn print_terminal_report(report: &Report) {
    let total = report.total();
    println!();
    println!(
        "PR {}/{}#{} | Files: {} | {} {}",
        report.owner,
        report.repo,
        report.pr_number,
        report.files.len(),
        format!("+{}", total.added).green(),
        format!("-{}", total.removed).red()
    );
    println!();

    if report.files.is_empty() {
        println!("  No changed files.");
    }
    for file in &report.files {
        if file.has_patch {
            println!(
                "  {}  {} {}",
                file.filename.bold(),
                format!("+{}", file.stats.added).green(),
                format!("-{}", file.stats.removed).red()
            );
        } else {
            println!("  {}  {}", file.filename.bold(), "no diff".yellow());
        }
        println!("    {}", file.blob_url.dimmed());
    }

    let missing = report.missing_patches();
    if missing > 0 {
        println!();
        println!("{}", format!("{} file(s) without a diff", missing).yellow());
    }
    println!();
}

/// Write the report as a markdown file, one fenced diff block per file.
fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let total = report.total();
    let mut md = String::new();
    md.push_str(&format!(
        "# PR {}/{}#{}\n\n",
        report.owner, report.repo, report.pr_number
    ));
    md.push_str(&format!(
        "**Files:** {} | **+{} -{}**\n\n",
        report.files.len(),
        total.added,
        total.removed
    ));

    for (file, change) in report.files.iter().zip(&report.changes) {
        md.push_str(&format!(
            "## `{}` (+{} -{})\n\n",
            file.filename, file.stats.added, file.stats.removed
        ));
        md.push_str(&format!("[View file]({})\n\n", file.blob_url));
        if file.has_patch {
            md.push_str("```diff\n");
            md.push_str(change.patch.trim_end_matches('\n'));
            md.push_str("\n```\n\n");
        } else {
            md.push_str("_No diff available._\n\n");
        }
    }

    std::fs::write(path, md)?;
    Ok(())
}
