pub mod collector;
pub mod diff;
pub mod github;
pub mod types;

pub use collector::FileChangeCollector;
pub use diff::GitDiff;
pub use github::GitHubClient;
pub use types::{GetFilesParams, PrUrl, PullRequestFileChange};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("Invalid PR URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid ignore files pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("GitHub token not found in environment")]
    MissingToken,
}

/// Parse a GitHub PR URL into its component parts.
///
/// Expected format: https://{host}/{owner}/{repo}/pull/{number}. Any host is
/// accepted so that GitHub Enterprise URLs work alongside github.com.
pub fn parse_pr_url(url: &str) -> Result<PrUrl, PrError> {
    let invalid = || PrError::InvalidUrl(url.to_string());
    let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }

    let segments: Vec<_> = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|segment| !segment.is_empty())
        .collect();

    // Trailing segments such as `/files` or `/commits` are tolerated
    if segments.len() < 4 || segments[2] != "pull" {
        return Err(invalid());
    }

    let pr_number = segments[3].parse::<u64>().map_err(|_| invalid())?;

    Ok(PrUrl {
        owner: segments[0].to_string(),
        repo: segments[1].to_string(),
        pr_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_pr_url() {
        let url = parse_pr_url("https://github.com/org/repo/pull/42").unwrap();
        assert_eq!(url.owner, "org");
        assert_eq!(url.repo, "repo");
        assert_eq!(url.pr_number, 42);
    }

    #[test]
    fn test_parse_pr_url_with_files_tab() {
        let url = parse_pr_url("https://github.com/org/repo/pull/7/files").unwrap();
        assert_eq!(url.pr_number, 7);
    }

    #[test]
    fn test_parse_enterprise_pr_url() {
        let url = parse_pr_url("https://git.example.com/team/service/pull/3").unwrap();
        assert_eq!(url.owner, "team");
        assert_eq!(url.repo, "service");
    }

    #[test]
    fn test_parse_invalid_pr_url() {
        assert!(parse_pr_url("https://example.com").is_err());
        assert!(parse_pr_url("not-a-url").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/pulls/42").is_err());
        assert!(parse_pr_url("https://github.com/org/repo/pull/abc").is_err());
        assert!(parse_pr_url("ftp://github.com/org/repo/pull/42").is_err());
    }

    #[test]
    fn test_invalid_pattern_error_message() {
        let err: PrError = regex::Regex::new("(").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid ignore files pattern"));
    }
}
