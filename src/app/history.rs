use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::app::error::MigrateError;
use crate::app::git::GitRunner;

/// Discovers every name a configured file has ever had.
///
/// `git log --follow` links a file's successive names across rename commits,
/// so a path that moved several times yields all of its earlier names, which
/// a plain path query would miss. Results from all seeds are unioned, the
/// curated exclusion set is subtracted, and the remainder comes back sorted
/// and deduplicated.
pub struct HistoryResolver<'a> {
    repo_dir: &'a Path,
    git: &'a dyn GitRunner,
}

impl<'a> HistoryResolver<'a> {
    pub fn new(repo_dir: &'a Path, git: &'a dyn GitRunner) -> Self {
        Self { repo_dir, git }
    }

    /// Resolve the full historical path set for `seeds`, minus `excluded`.
    ///
    /// Fails on the first seed whose history query cannot be completed. No
    /// partial result is returned in that case, so callers never write a
    /// filter specification from an incomplete set.
    pub fn resolve(
        &self,
        seeds: &[String],
        excluded: &HashSet<String>,
    ) -> Result<Vec<String>, MigrateError> {
        let mut all_paths = BTreeSet::new();
        for seed in seeds {
            all_paths.extend(self.follow(seed)?);
        }

        Ok(all_paths
            .into_iter()
            .filter(|path| !excluded.contains(path))
            .collect())
    }

    /// Every path name one seed has carried, including the seed itself.
    fn follow(&self, seed: &str) -> Result<BTreeSet<String>, MigrateError> {
        let stdout = self
            .git
            .capture(
                self.repo_dir,
                &[
                    "log",
                    "--follow",
                    "--name-only",
                    "--pretty=format:",
                    "--no-show-signature",
                    seed,
                ],
            )
            .map_err(|source| MigrateError::HistoryTraversal {
                path: seed.to_owned(),
                source: Box::new(source),
            })?;

        let paths: BTreeSet<String> = stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        log::debug!("{seed}: {} historical path(s)", paths.len());
        Ok(paths)
    }
}
