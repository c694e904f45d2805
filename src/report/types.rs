use crate::pr::PullRequestFileChange;

/// Line counts derived from a file's patch text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub added: usize,
    pub removed: usize,
}

impl LineStats {
    /// Count `+`/`-` lines inside hunks. Everything before the first `@@`
    /// is file header (`---`/`+++` included) and is not counted.
    pub fn from_patch(patch: &str) -> Self {
        let mut stats = LineStats::default();
        let mut in_hunk = false;
        for line in patch.lines() {
            if line.starts_with("@@") {
                in_hunk = true;
                continue;
            }
            if !in_hunk {
                continue;
            }
            if line.starts_with('+') {
                stats.added += 1;
            } else if line.starts_with('-') {
                stats.removed += 1;
            }
        }
        stats
    }
}

/// One row of the report.
#[derive(Debug, Clone)]
pub struct FileSummary {
    pub filename: String,
    pub blob_url: String,
    pub stats: LineStats,
    /// False when neither GitHub nor git produced a diff
    pub has_patch: bool,
}

/// Complete report for one pull request.
#[derive(Debug)]
pub struct Report {
    pub owner: String,
    pub repo: String,
    pub pr_number: u64,
    pub files: Vec<FileSummary>,
    pub changes: Vec<PullRequestFileChange>,
}

impl Report {
    pub fn total(&self) -> LineStats {
        self.files.iter().fold(LineStats::default(), |acc, f| LineStats {
            added: acc.added + f.stats.added,
            removed: acc.removed + f.stats.removed,
        })
    }

    pub fn missing_patches(&self) -> usize {
        self.files.iter().filter(|f| !f.has_patch).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_skip_file_headers() {
        let patch = "diff --git a/a.rs b/a.rs\n--- a/a.rs\n+++ b/a.rs\n@@ -1,2 +1,3 @@\n-old\n+new\n+more\n context\n";
        assert_eq!(LineStats::from_patch(patch), LineStats { added: 2, removed: 1 });
    }

    #[test]
    fn test_stats_of_github_hunk() {
        // The API's `patch` field starts at the first hunk header
        let patch = "@@ -0,0 +1,2 @@\n+hello\n+world";
        assert_eq!(LineStats::from_patch(patch), LineStats { added: 2, removed: 0 });
    }

    #[test]
    fn test_stats_count_dash_and_plus_content_in_hunks() {
        let patch = "--- a/loop.c\n+++ b/loop.c\n@@ -1,2 +1,2 @@\n--- comment\n+++i;\n i--;\n";
        assert_eq!(LineStats::from_patch(patch), LineStats { added: 1, removed: 1 });
    }

    #[test]
    fn test_stats_of_empty_patch() {
        assert_eq!(LineStats::from_patch(""), LineStats::default());
    }
}
