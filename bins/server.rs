use std::process::ExitCode;

use common::utils::logging::{init_logging, LogFormat};
use configs::AppConfig;
use dotenvy::dotenv;
use tokio::runtime::Runtime;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Identifies this process in every lifecycle log line.
#[derive(Clone, Copy)]
struct Instance {
    id: Uuid,
    pid: u32,
}

fn log_format_of(cfg: &anyhow::Result<AppConfig>) -> LogFormat {
    cfg.as_ref()
        .ok()
        .and_then(|c| c.server.log_format.parse().ok())
        .unwrap_or_default()
}

fn install_panic_hook(instance: Instance) {
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "server", event = "panic", service_id = %instance.id, pid = instance.pid, message = %info, "panic");
    }));
}

fn runtime_for(cfg: &AppConfig) -> std::io::Result<Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = cfg.server.worker_threads {
        builder.worker_threads(threads);
    }
    builder.build()
}

/// Serve until the server stops on its own or Ctrl+C arrives.
async fn serve(cfg: AppConfig, instance: Instance) -> ExitCode {
    tokio::select! {
        res = server::run_with_config(cfg) => match res {
            Ok(()) => {
                info!(service = "server", event = "stop", service_id = %instance.id, "quote server stopped");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "server", event = "run_failed", error = %e, "quote server failed");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!(service = "server", event = "shutdown_signal", service_id = %instance.id, "Ctrl+C received, shutting down");
            ExitCode::SUCCESS
        }
    }
}

fn main() -> ExitCode {
    dotenv().ok();

    let cfg = AppConfig::load_or_env();
    init_logging(log_format_of(&cfg));
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "server", event = "config_invalid", error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let instance = Instance { id: Uuid::new_v4(), pid: std::process::id() };
    install_panic_hook(instance);

    let rt = match runtime_for(&cfg) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "server", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "server",
        event = "start",
        service_id = %instance.id,
        pid = instance.pid,
        version = env!("CARGO_PKG_VERSION"),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        base_path = %cfg.quotes.base_path,
        static_dir = %cfg.static_files.dir,
        "quote server starting"
    );

    rt.block_on(serve(cfg, instance))
}
