use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a migration run.
///
/// There is no retry anywhere: each variant halts the run at the step that
/// produced it.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Configuration file missing or unreadable.
    #[error("cannot read config file {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid TOML or misses required keys.
    #[error("cannot parse config file {}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A rename-following history query could not be completed. The run
    /// stops before any filter specification is written: a partial path set
    /// would silently narrow the history that gets preserved.
    #[error("history query for '{path}' failed")]
    HistoryTraversal {
        path: String,
        #[source]
        source: Box<MigrateError>,
    },

    /// A delegated git command exited unsuccessfully.
    #[error("`{command}` exited with {}", exit_label(.code))]
    ExternalCommand { command: String, code: Option<i32> },

    /// A delegated git command could not be started at all.
    #[error("cannot launch `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The filter specification artifact could not be written.
    #[error("cannot write filter spec {}", .path.display())]
    FilterWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_owned(),
    }
}

impl MigrateError {
    /// Process exit code for this failure. Delegated commands pass their own
    /// exit status through; everything else exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrateError::ExternalCommand { code, .. } => code.unwrap_or(1),
            MigrateError::HistoryTraversal { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}
