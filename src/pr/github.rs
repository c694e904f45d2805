use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::collector::FileSource;
use super::types::{PrBranches, RawFileEntry};
use super::PrError;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Asks GitHub to inline a unified-diff `patch` for every file it can.
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

const USER_AGENT: &str = "pr-files";

/// Minimal GitHub REST client for the pull request endpoints.
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, api_url: &str, per_page: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            per_page,
        }
    }

    fn pull_url(&self, owner: &str, repo: &str, pr_number: u64) -> String {
        format!("{}/repos/{}/{}/pulls/{}", self.api_url, owner, repo, pr_number)
    }

    /// Fetch the base and head branch names from the pull request metadata.
    #[instrument(skip(self))]
    pub async fn fetch_branches(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<PrBranches, PrError> {
        #[derive(Deserialize)]
        struct Ref {
            #[serde(rename = "ref")]
            name: String,
        }

        #[derive(Deserialize)]
        struct PullResponse {
            base: Ref,
            head: Ref,
        }

        debug!("fetching PR metadata from GitHub API");
        let metadata = self
            .http
            .get(self.pull_url(owner, repo, pr_number))
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<PullResponse>()
            .await?;
        debug!(base = %metadata.base.name, head = %metadata.head.name, "received PR branches");

        Ok(PrBranches {
            base: metadata.base.name,
            head: metadata.head.name,
        })
    }
}

#[async_trait]
impl FileSource for GitHubClient {
    #[instrument(skip(self))]
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<RawFileEntry>, PrError> {
        let url = format!("{}/files", self.pull_url(owner, repo, pr_number));

        debug!(per_page = self.per_page, "fetching PR files from GitHub API");
        let files = self
            .http
            .get(&url)
            .query(&[("per_page", self.per_page)])
            .header("User-Agent", USER_AGENT)
            .header("Accept", DIFF_MEDIA_TYPE)
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<RawFileEntry>>()
            .await?;
        debug!(files = files.len(), "received PR files");

        Ok(files)
    }
}
