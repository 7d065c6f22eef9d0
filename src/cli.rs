//! 命令行界面定义
//!
//! 定义了主程序的命令行参数和选项
use clap::{Parser, Subcommand};
use handlers::{Operation, ResourceKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "invgw")]
#[command(version)]
#[command(about = "Translate inventory REST jobs into inventory gRPC calls")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Configuration file path (defaults to searching standard locations)
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub(crate) config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Test configuration file
    Test {
        /// Configuration file path (optional, defaults to config.toml)
        #[arg(index = 1)]
        config_file: Option<PathBuf>,

        /// Print the effective configuration, defaults included, as TOML
        #[arg(long)]
        print: bool,
    },

    /// Execute one job against the inventory and print the result as JSON
    Call {
        /// Resource type, e.g. region, site, telemetry-logs-profile
        #[arg(short, long)]
        resource: ResourceKind,

        /// Operation: list, get, post, put, patch or delete
        #[arg(short, long)]
        operation: Operation,

        /// Request body or list query as JSON
        #[arg(short, long)]
        data: Option<String>,

        /// Path parameters as JSON, e.g. '{"resourceId":"site-1234"}'
        #[arg(short, long)]
        params: Option<String>,

        /// Tenant the job acts for
        #[arg(long)]
        tenant: Option<String>,

        /// Deadline of the inventory call in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}
