// Declare modules
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod history;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use self::cli::Cli;
use self::config::RepoConfig;
use self::error::MigrateError;
use self::git::{GitCli, GitRunner};
use self::history::HistoryResolver;

/// Branch names while grafting the filtered history onto the template:
/// the filtered `main` moves aside, the template branch takes its place.
const FILTERED_BRANCH: &str = "main-general";
const STAGING_BRANCH: &str = "main-upstream";
const FINAL_BRANCH: &str = "main";

/// Loads configuration and hands the run to [`Migration`].
pub fn run(cli: Cli) -> Result<()> {
    let config_path = config::locate(cli.config.as_deref());
    log::debug!("reading config from {}", config_path.display());
    let config = config::load(&config_path)?;

    fs::create_dir_all(&cli.work_dir).with_context(|| {
        format!("failed to create working directory {}", cli.work_dir.display())
    })?;

    let git = GitCli::new();
    Migration::new(&config.repos, &cli, &git).execute()?;
    Ok(())
}

/// One migration run: a fixed sequence of steps, first failure aborts.
pub struct Migration<'a> {
    repos: &'a RepoConfig,
    opts: &'a Cli,
    git: &'a dyn GitRunner,
}

impl<'a> Migration<'a> {
    pub fn new(repos: &'a RepoConfig, opts: &'a Cli, git: &'a dyn GitRunner) -> Self {
        Self { repos, opts, git }
    }

    pub fn execute(&self) -> Result<(), MigrateError> {
        // 1. Bring the source repository into the working directory
        let repo_dir = self.opts.work_dir.join("repo");
        self.clone_source(&repo_dir)?;

        // 2. Discover every historical name of the configured files
        let excluded: HashSet<String> = self.repos.false_positives.iter().cloned().collect();
        let resolver = HistoryResolver::new(&repo_dir, self.git);
        let paths = resolver.resolve(&self.repos.files, &excluded)?;
        log::info!(
            "keeping {} path(s) for {} configured file(s)",
            paths.len(),
            self.repos.files.len()
        );

        // 3. Write the filter specification next to the checkout
        let filter_file = self.opts.work_dir.join(filter::FILTER_FILE_NAME);
        filter::write_filter_spec(&filter_file, &paths)?;

        // 4. Rewrite history down to the filtered subset
        let from_checkout = format!("../{}", filter::FILTER_FILE_NAME);
        self.git
            .run(&repo_dir, &["filter-repo", "--paths-from-file", &from_checkout])?;

        // 5. Optional: graft onto the template, push the result
        if self.opts.merge {
            self.merge_template(&repo_dir)?;
        }
        if self.opts.push {
            self.push_result(&repo_dir)?;
        }
        Ok(())
    }

    /// Clone the source repository unless a checkout is already in place.
    fn clone_source(&self, repo_dir: &Path) -> Result<(), MigrateError> {
        if repo_dir.join(".git").is_dir() {
            log::info!("reusing existing checkout at {}", repo_dir.display());
            return Ok(());
        }

        log::info!("cloning {}", self.repos.general);
        let target = repo_dir.to_string_lossy().into_owned();
        self.git.run(Path::new("."), &["clone", &self.repos.general, &target])
    }

    /// Graft the filtered history onto the upstream template. Conflicts
    /// always resolve to the branch being merged in, the filtered history.
    fn merge_template(&self, repo_dir: &Path) -> Result<(), MigrateError> {
        log::info!("merging into template from {}", self.repos.proxmox_upstream);
        let upstream_main = format!("upstream/{FINAL_BRANCH}");

        self.git
            .run(repo_dir, &["remote", "add", "upstream", &self.repos.proxmox_upstream])?;
        self.git.run(repo_dir, &["fetch", "upstream"])?;
        self.git
            .run(repo_dir, &["checkout", "-b", STAGING_BRANCH, &upstream_main])?;
        self.git.run(repo_dir, &["branch", "-m", FINAL_BRANCH, FILTERED_BRANCH])?;
        self.git.run(repo_dir, &["branch", "-m", STAGING_BRANCH, FINAL_BRANCH])?;
        self.git.run(
            repo_dir,
            &[
                "merge",
                FILTERED_BRANCH,
                "--allow-unrelated-histories",
                "--no-ff",
                "--no-edit",
                "--strategy-option",
                "theirs",
            ],
        )
    }

    /// Push branches, tags and prune in three separate invocations.
    fn push_result(&self, repo_dir: &Path) -> Result<(), MigrateError> {
        log::info!("pushing to {}", self.repos.proxmox_origin);
        self.git
            .run(repo_dir, &["remote", "add", "origin", &self.repos.proxmox_origin])?;

        for target in ["--branches", "--tags", "--prune"] {
            let mut args = vec!["push", "origin", target];
            if self.opts.force {
                args.push("--force");
            }
            self.git.run(repo_dir, &args)?;
        }
        Ok(())
    }
}
