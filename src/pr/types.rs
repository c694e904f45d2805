use serde::{Deserialize, Serialize};

/// How a file changed within a pull request, as reported by the GitHub API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

impl FileStatus {
    /// Removed and unchanged files carry nothing worth reviewing.
    pub fn is_tracked(self) -> bool {
        !matches!(self, FileStatus::Removed | FileStatus::Unchanged)
    }
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
///
/// Only the fields the collector reads are modelled; the rest of the
/// payload is ignored by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileEntry {
    pub filename: String,
    pub status: FileStatus,
    pub additions: u64,
    /// Omitted by GitHub for large or binary diffs
    #[serde(default)]
    pub patch: Option<String>,
    pub blob_url: String,
}

/// A changed file together with its diff text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestFileChange {
    /// Repository-relative path
    pub filename: String,
    /// Unified diff; empty when no diff could be obtained
    pub patch: String,
    /// Permalink to the file at the head revision
    pub blob_url: String,
}

/// Input to [`super::collector::FileChangeCollector::list_changed_files`].
#[derive(Debug, Clone)]
pub struct GetFilesParams {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    /// Base branch name, used only for the fallback diff
    pub base: String,
    /// Head branch name, used only for the fallback diff
    pub head: String,
    /// Regex source; matching filenames are dropped
    pub ignore_files_pattern: Option<String>,
}

/// Represents the parsed components of a GitHub PR URL.
#[derive(Debug, Clone)]
pub struct PrUrl {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
}

/// Base and head branch names of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrBranches {
    pub base: String,
    pub head: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_file_entry() {
        let json = r#"{
            "sha": "bbcd538c8e72b8c175046e27cc8f907076331401",
            "filename": "src/app.ts",
            "status": "modified",
            "additions": 3,
            "deletions": 1,
            "changes": 4,
            "blob_url": "https://github.com/org/repo/blob/abc/src/app.ts",
            "patch": "@@ -1 +1,3 @@\n-a\n+b\n+c\n+d"
        }"#;
        let entry: RawFileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.filename, "src/app.ts");
        assert_eq!(entry.status, FileStatus::Modified);
        assert_eq!(entry.additions, 3);
        assert!(entry.patch.unwrap().starts_with("@@"));
    }

    #[test]
    fn test_deserialize_entry_without_patch() {
        let json = r#"{
            "filename": "assets/logo.png",
            "status": "added",
            "additions": 0,
            "blob_url": "https://github.com/org/repo/blob/abc/assets/logo.png"
        }"#;
        let entry: RawFileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.status, FileStatus::Added);
        assert!(entry.patch.is_none());
    }

    #[test]
    fn test_untracked_statuses() {
        assert!(!FileStatus::Removed.is_tracked());
        assert!(!FileStatus::Unchanged.is_tracked());
        for status in [
            FileStatus::Added,
            FileStatus::Modified,
            FileStatus::Renamed,
            FileStatus::Copied,
            FileStatus::Changed,
        ] {
            assert!(status.is_tracked(), "{:?} should be tracked", status);
        }
    }

    #[test]
    fn test_file_change_serializes_all_fields() {
        let change = PullRequestFileChange {
            filename: "src/lib.rs".to_string(),
            patch: String::new(),
            blob_url: "https://github.com/org/repo/blob/abc/src/lib.rs".to_string(),
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["filename"], "src/lib.rs");
        assert_eq!(value["patch"], "");
        assert!(value["blob_url"].as_str().unwrap().ends_with("src/lib.rs"));
    }
}
