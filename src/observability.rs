//! 日志与追踪初始化
//!
//! `invgw call` 的 stdout 只输出 job 结果，所以控制台日志一律写 stderr。
//! 文件输出使用 JSON 行格式，便于和 inventory 侧日志按 request id 关联。

use invgw_common::config::{GatewayConfig, LogConfig, ObservabilityConfig};
use std::fs;
use std::io::IsTerminal;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter::EnvFilter, fmt, prelude::*};

use crate::error::{Error, Result};

#[cfg(feature = "opentelemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "opentelemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "opentelemetry")]
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};

const LOG_FILE_NAME: &str = "invgw.log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the file writer and the span exporter alive until the job is done.
#[derive(Default)]
pub struct ObservabilityGuard {
    #[cfg(feature = "opentelemetry")]
    tracer_provider: Option<SdkTracerProvider>,
    _log_guard: Option<WorkerGuard>,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        // 进程马上退出，必须先把批量导出器里的 span 刷出去
        #[cfg(feature = "opentelemetry")]
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("invgw: failed to flush spans: {e}");
        }
    }
}

pub fn init_observability(config: &GatewayConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();
    let observability = config.observability_config();

    let output = output_layer(config, &mut guard)?;
    let spans = span_export_layer(config, &mut guard)?;

    tracing_subscriber::registry()
        .with(create_env_filter(observability))
        .with(output)
        .with(spans)
        .try_init()
        .map_err(|e| Error::custom(format!("failed to install log subscriber: {e}")))?;

    #[cfg(not(feature = "opentelemetry"))]
    if observability.tracing.export_endpoint().is_some() {
        tracing::warn!("observability.tracing.enable is set but invgw was built without the opentelemetry feature");
    }

    Ok(guard)
}

/// `RUST_LOG` wins over `observability.filter_level`.
fn create_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| config.filter_level.clone());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!("invgw: bad filter directive '{directive}', using 'info'");
        EnvFilter::new("info")
    })
}

fn output_layer<S>(config: &GatewayConfig, guard: &mut ObservabilityGuard) -> Result<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if config.is_console_logging() {
        let stderr = std::io::stderr();
        return Ok(fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(stderr.is_terminal())
            .with_writer(std::io::stderr)
            .boxed());
    }

    let log = &config.observability_config().log;
    let (writer, worker) = file_writer(log)?;
    guard._log_guard = Some(worker);
    Ok(fmt::layer()
        .json()
        .with_current_span(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer)
        .boxed())
}

fn file_writer(log: &LogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(&log.path)?;
    if log.rotate {
        // 按天轮转
        let appender = tracing_appender::rolling::daily(&log.path, LOG_FILE_NAME);
        return Ok(tracing_appender::non_blocking(appender));
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(std::path::Path::new(&log.path).join(LOG_FILE_NAME))?;
    Ok(tracing_appender::non_blocking(file))
}

#[cfg(feature = "opentelemetry")]
fn span_export_layer<S>(
    config: &GatewayConfig,
    guard: &mut ObservabilityGuard,
) -> Result<Option<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use opentelemetry::trace::TracerProvider as _;

    let tracing_cfg = config.tracing_config();
    let Some(endpoint) = tracing_cfg.export_endpoint() else {
        return Ok(None);
    };
    tracing_cfg.validate().map_err(Error::validation)?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| Error::custom(format!("failed to build OTLP exporter for {endpoint}: {e}")))?;

    // 每个 span 都带上实例与它所连接的 inventory
    let resource = Resource::builder()
        .with_service_name(tracing_cfg.service_name.clone())
        .with_attributes([
            KeyValue::new("service.instance.id", config.name.clone()),
            KeyValue::new("deployment.environment.name", config.env.clone()),
            KeyValue::new("invgw.inventory.endpoint", config.inventory.endpoint.clone()),
        ])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::TraceIdRatioBased(tracing_cfg.sample_ratio))
        .with_batch_exporter(exporter)
        .build();

    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());
    let tracer = provider.tracer("invgw");
    guard.tracer_provider = Some(provider);

    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer).boxed()))
}

#[cfg(not(feature = "opentelemetry"))]
fn span_export_layer<S>(
    _config: &GatewayConfig,
    _guard: &mut ObservabilityGuard,
) -> Result<Option<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    Ok(None)
}
