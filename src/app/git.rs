use std::path::Path;
use std::process::Command;

use crate::app::error::MigrateError;

/// Narrow seam to the `git` command line.
///
/// Everything the tool does to a repository goes through here, so the
/// resolver and the orchestrator can be exercised against a scripted fake
/// instead of a real git installation.
pub trait GitRunner {
    /// Run git with `args` inside `cwd`, streaming output to the terminal.
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<(), MigrateError>;

    /// Run git with `args` inside `cwd`, capturing stdout.
    fn capture(&self, cwd: &Path, args: &[&str]) -> Result<String, MigrateError>;
}

/// The real thing: shells out to the `git` binary on PATH.
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_owned(),
        }
    }

    #[cfg(test)]
    fn with_program(program: &str) -> Self {
        Self {
            program: program.to_owned(),
        }
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.program.clone();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl GitRunner for GitCli {
    fn run(&self, cwd: &Path, args: &[&str]) -> Result<(), MigrateError> {
        let command = self.command_line(args);
        log::debug!("running `{command}`");

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|source| MigrateError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(MigrateError::ExternalCommand {
                command,
                code: status.code(),
            });
        }
        Ok(())
    }

    fn capture(&self, cwd: &Path, args: &[&str]) -> Result<String, MigrateError> {
        let command = self.command_line(args);
        log::debug!("running `{command}`");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|source| MigrateError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                log::error!("{}", stderr.trim_end());
            }
            return Err(MigrateError::ExternalCommand {
                command,
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::path::Path;
    use std::process::Command;

    use super::{GitCli, GitRunner};
    use crate::app::error::MigrateError;

    /// Scripted stand-in for [`GitCli`]: history queries answer from canned
    /// stdout, every other command records its argv and succeeds unless told
    /// to fail.
    #[derive(Default)]
    pub(crate) struct FakeGit {
        history: HashMap<String, String>,
        failing_history: HashSet<String>,
        failing_subcommand: Option<String>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeGit {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// Canned `git log --follow` stdout for one seed path.
        pub(crate) fn with_history(mut self, seed: &str, stdout: &str) -> Self {
            self.history.insert(seed.to_owned(), stdout.to_owned());
            self
        }

        /// Make the history query for `seed` fail like a git error would.
        pub(crate) fn with_failing_history(mut self, seed: &str) -> Self {
            self.failing_history.insert(seed.to_owned());
            self
        }

        /// Make every invocation of `subcommand` (e.g. "filter-repo") fail.
        pub(crate) fn with_failing_subcommand(mut self, subcommand: &str) -> Self {
            self.failing_subcommand = Some(subcommand.to_owned());
            self
        }

        pub(crate) fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }

        fn record(&self, args: &[&str]) {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|arg| arg.to_string()).collect());
        }
    }

    impl GitRunner for FakeGit {
        fn run(&self, _cwd: &Path, args: &[&str]) -> Result<(), MigrateError> {
            self.record(args);
            if self.failing_subcommand.as_deref() == args.first().copied() {
                return Err(MigrateError::ExternalCommand {
                    command: format!("git {}", args.join(" ")),
                    code: Some(1),
                });
            }
            Ok(())
        }

        fn capture(&self, _cwd: &Path, args: &[&str]) -> Result<String, MigrateError> {
            self.record(args);
            assert_eq!(args.first().copied(), Some("log"), "only log queries are captured");
            let seed = *args.last().expect("log query without a pathspec");
            if self.failing_history.contains(seed) {
                return Err(MigrateError::ExternalCommand {
                    command: format!("git {}", args.join(" ")),
                    code: Some(128),
                });
            }
            match self.history.get(seed) {
                Some(stdout) => Ok(stdout.clone()),
                None => panic!("unscripted history query for '{seed}'"),
            }
        }
    }

    /// True when a usable `git` binary is on PATH.
    pub(crate) fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    /// Fresh repository on branch `main` with a throwaway identity.
    pub(crate) fn init_repo(dir: &Path) {
        let git = GitCli::new();
        git.run(dir, &["init", "-q", "-b", "main"]).unwrap();
        git.run(dir, &["config", "user.name", "general2proxmox tests"]).unwrap();
        git.run(dir, &["config", "user.email", "tests@example.invalid"]).unwrap();
    }

    pub(crate) fn commit_all(dir: &Path, message: &str) {
        let git = GitCli::new();
        git.run(dir, &["add", "--all"]).unwrap();
        git.run(dir, &["commit", "-q", "--no-gpg-sign", "-m", message]).unwrap();
    }
}
