//! Migrate community.general to community.proxmox.
//!
//! Reads a curated list of files from `cfg/config.toml`, discovers every
//! historical name those files have carried via `git log --follow`, writes
//! the combined list as a filter specification, and hands it to
//! `git filter-repo`. With `--merge` the filtered history is grafted onto
//! the community.proxmox template repository; with `--push` the result is
//! pushed out.

use std::process;

use clap::Parser;
use log::LevelFilter;

use crate::app::cli::Cli;
use crate::app::error::MigrateError;

mod app;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = app::run(cli) {
        log::error!("{err:#}");
        let code = err
            .downcast_ref::<MigrateError>()
            .map(MigrateError::exit_code)
            .unwrap_or(1);
        process::exit(code);
    }
}
