use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use regex::Regex;
use tracing::{debug, instrument};

use super::diff::{DiffOutcome, DiffRunner};
use super::types::{GetFilesParams, PullRequestFileChange, RawFileEntry};
use super::PrError;

/// Source of the raw file list of a pull request.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn list_files(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<Vec<RawFileEntry>, PrError>;
}

/// Decides which API entries are worth returning.
///
/// An entry survives when its status is tracked, it adds at least one line,
/// and its filename does not match the optional ignore pattern.
#[derive(Debug, Default)]
pub struct FileFilter {
    ignore: Option<Regex>,
}

impl FileFilter {
    /// An empty pattern is the same as no pattern.
    pub fn new(ignore_files_pattern: Option<&str>) -> Result<Self, PrError> {
        let ignore = ignore_files_pattern
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()?;
        Ok(Self { ignore })
    }

    pub fn matches(&self, entry: &RawFileEntry) -> bool {
        entry.status.is_tracked()
            && entry.additions > 0
            && !self
                .ignore
                .as_ref()
                .is_some_and(|re| re.is_match(&entry.filename))
    }
}

/// Lists the changed files of a pull request and makes sure each one has a diff.
pub struct FileChangeCollector<S, D> {
    source: S,
    differ: D,
    max_concurrency: Option<usize>,
}

impl<S: FileSource, D: DiffRunner> FileChangeCollector<S, D> {
    pub fn new(source: S, differ: D) -> Self {
        Self {
            source,
            differ,
            max_concurrency: None,
        }
    }

    /// Cap the number of fallback diffs in flight. `None` or `Some(0)` means no cap.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|n| *n > 0);
        self
    }

    /// Fetch, filter and resolve the changed files of a pull request.
    ///
    /// Files are returned in API order. API errors and an invalid ignore
    /// pattern are returned to the caller; fallback diff failures are not.
    #[instrument(skip(self, params), fields(owner = %params.owner, repo = %params.repo, pr = params.pr_number))]
    pub async fn list_changed_files(
        &self,
        params: &GetFilesParams,
    ) -> Result<Vec<PullRequestFileChange>, PrError> {
        debug!(
            base = %params.base,
            head = %params.head,
            ignore_files_pattern = params.ignore_files_pattern.as_deref().unwrap_or(""),
            "listing changed files"
        );
        let filter = FileFilter::new(params.ignore_files_pattern.as_deref())?;

        let entries = self
            .source
            .list_files(&params.owner, &params.repo, params.pr_number)
            .await?;
        let total = entries.len();

        let kept: Vec<RawFileEntry> = entries.into_iter().filter(|e| filter.matches(e)).collect();
        debug!(total, kept = kept.len(), "filtered PR files");

        let resolutions = kept
            .into_iter()
            .map(|entry| self.resolve(entry, &params.base, &params.head));

        let changes: Vec<PullRequestFileChange> = match self.max_concurrency {
            Some(limit) => stream::iter(resolutions).buffered(limit).collect().await,
            None => join_all(resolutions).await,
        };
        Ok(changes)
    }

    /// Diff one file locally. Never fails; see [`DiffOutcome`].
    pub async fn fallback_diff(&self, base: &str, head: &str, filename: &str) -> DiffOutcome {
        self.differ.diff(base, head, filename).await
    }

    async fn resolve(&self, entry: RawFileEntry, base: &str, head: &str) -> PullRequestFileChange {
        // GitHub drops `patch` on large diffs; an empty one is treated the same way
        let patch = match entry.patch {
            Some(patch) if !patch.is_empty() => patch,
            _ => self
                .fallback_diff(base, head, &entry.filename)
                .await
                .into_patch(),
        };

        PullRequestFileChange {
            filename: entry.filename,
            patch,
            blob_url: entry.blob_url,
        }
    }
}
