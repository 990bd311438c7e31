use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "general2proxmox",
    author,
    version,
    about = "Migrate community.general to community.proxmox"
)]
pub struct Cli {
    /// Config file (default: cfg/config.toml, then ~/.config/general2proxmox/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Echo every git command before it runs
    #[arg(short, long)]
    pub verbose: bool,

    /// Force push to the new repository
    #[arg(long)]
    pub force: bool,

    /// Merge the filtered repository into the upstream template
    #[arg(long)]
    pub merge: bool,

    /// Push the merged repository
    #[arg(long)]
    pub push: bool,

    /// Working directory for the checkout and the filter specification
    #[arg(long, default_value = "work")]
    pub work_dir: PathBuf,
}
