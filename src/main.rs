//! invgw 主程序
//!
//! 加载配置、连接 inventory 服务，并把命令行上的一个 job 交给 handler 执行

mod cli;
mod error;
mod observability;

use anyhow::Context;
use clap::Parser;
use handlers::{
    GrpcInventoryClient, HandlerRegistry, Job, Operation, Payload, RequestContext, ResourceKind,
};
use invgw_common::{ConfigError, GatewayConfig};
use observability::init_observability;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

// 日志系统初始化之前的输出，stdout 只留给命令结果
macro_rules! bootstrap_info {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

macro_rules! bootstrap_error {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

use cli::{Cli, Commands};
use error::{Error, Result};

/// Application launcher utilities
struct ApplicationLauncher;

/// 一次 `call` 子命令的全部输入
struct CallArgs {
    resource: ResourceKind,
    operation: Operation,
    data: Option<String>,
    params: Option<String>,
    tenant: Option<String>,
    timeout_secs: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test { config_file, print } => {
            let config_path =
                ApplicationLauncher::find_config_file(config_file.as_ref().unwrap_or(&cli.config))?;
            ApplicationLauncher::test_config_file(&config_path, print)
        }
        Commands::Call {
            resource,
            operation,
            data,
            params,
            tenant,
            timeout_secs,
        } => {
            let config_path = ApplicationLauncher::find_config_file(&cli.config)?;
            let args = CallArgs {
                resource,
                operation,
                data,
                params,
                tenant,
                timeout_secs,
            };

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;

            runtime.block_on(ApplicationLauncher::run_call(&config_path, args))
        }
    }
}

impl ApplicationLauncher {
    /// Find config file with fallback locations
    fn find_config_file(provided_path: &PathBuf) -> Result<PathBuf> {
        if provided_path != Path::new("config.toml") {
            if provided_path.exists() {
                bootstrap_info!("Using provided config file: {:?}", provided_path);
                return Ok(provided_path.clone());
            }
            bootstrap_error!("Provided config file not found: {:?}", provided_path);
            return Err(Error::custom(format!(
                "Config file not found: {provided_path:?}"
            )));
        }

        let fallback_paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("/etc/invgw/config.toml"),
        ];

        for path in &fallback_paths {
            if path.exists() {
                bootstrap_info!("Found config file: {:?}", path);
                return Ok(path.clone());
            }
        }

        bootstrap_error!("No configuration file found!");
        bootstrap_error!("Please create a config file in one of these locations:");
        for (i, path) in fallback_paths.iter().enumerate() {
            bootstrap_error!("  {}. {:?}", i + 1, path);
        }
        bootstrap_error!("Or specify a custom path with: invgw --config <path>");

        Err(Error::custom(
            "No configuration file found. Please create one or specify path with --config",
        ))
    }

    /// 加载并验证配置，警告只打印不阻断
    fn load_config(config_path: &Path) -> Result<GatewayConfig> {
        let config = GatewayConfig::from_file(config_path).map_err(|e| {
            bootstrap_error!("❌ 配置文件解析失败: {}", e);
            Error::from(e)
        })?;
        bootstrap_info!("✅ 配置文件解析成功: {:?}", config_path);

        match config.validate_strict() {
            Ok(warnings) => {
                for warning in &warnings {
                    bootstrap_info!("  ⚠️  {}", warning);
                }
            }
            Err(ConfigError::Validation(errors)) => {
                bootstrap_error!("❌ 配置验证发现问题:");
                for (i, err) in errors.iter().enumerate() {
                    bootstrap_error!("  {}. ❌ {}", i + 1, err);
                }
                return Err(Error::validation("配置验证失败，请修复上述错误"));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(config)
    }

    /// 测试配置文件是否有效
    fn test_config_file(config_path: &Path, print: bool) -> Result<()> {
        let config = Self::load_config(config_path)?;
        bootstrap_info!("✅ 完整配置验证通过");
        if print {
            print!("{}", config.to_toml()?);
        }
        Ok(())
    }

    /// 执行一次 job 并把结果写到 stdout
    async fn run_call(config_path: &Path, args: CallArgs) -> Result<()> {
        let config = Self::load_config(config_path)?;
        let job = build_job(args)?;
        let _observability = init_observability(&config)?;

        info!(
            instance = %config.name,
            endpoint = %config.inventory.endpoint,
            "connecting to inventory"
        );
        let client = GrpcInventoryClient::connect(config.inventory_config()).await?;
        let registry = HandlerRegistry::new(Arc::new(client));

        let request_id = job.context.request_id;
        match registry.dispatch(&job).await {
            Ok(payload) => {
                let output = payload.data.unwrap_or(Value::Null);
                println!("{}", serde_json::to_string_pretty(&output)?);
                Ok(())
            }
            Err(e) => {
                error!(%request_id, code = ?e.code(), "job failed: {e}");
                Err(e.into())
            }
        }
    }
}

fn build_job(args: CallArgs) -> Result<Job> {
    let data = parse_json_arg("--data", args.data.as_deref())?;
    let params = parse_json_arg("--params", args.params.as_deref())?;

    let mut context = RequestContext::default();
    if let Some(tenant) = args.tenant {
        context = context.with_tenant(tenant);
    }
    match args.timeout_secs {
        Some(0) => return Err(Error::invalid_argument("--timeout-secs must be greater than 0")),
        Some(secs) => context = context.with_timeout(Duration::from_secs(secs)),
        None => {}
    }

    Ok(Job::new(args.operation, args.resource, Payload::new(data, params)).with_context(context))
}

fn parse_json_arg(flag: &str, raw: Option<&str>) -> Result<Option<Value>> {
    raw.map(|s| {
        serde_json::from_str(s)
            .with_context(|| format!("{flag} is not valid JSON"))
            .map_err(Error::from)
    })
    .transpose()
}
