use clap::Parser;
use spaserve::config::{AppState, Config};
use spaserve::{logger, server};
use std::sync::Arc;

/// No-cache static file server with SPA fallback and optional live-reload
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Listening port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory to serve (overrides config)
    #[arg(short, long)]
    root: Option<String>,

    /// Enable the live-reload side channel
    #[arg(short, long)]
    livereload: bool,

    /// Name of config file (without extension)
    #[arg(short, long, default_value = "config")]
    config_file: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut cfg = Config::load_from(&args.config_file)?;
    cfg.apply_cli(args.port, args.root.as_deref(), args.livereload);

    if cfg.livereload.enabled && !cfg!(feature = "livereload") {
        return Err(
            "live-reload requested but this binary was built without the `livereload` feature; \
             rebuild with `cargo build --features livereload`"
                .into(),
        );
    }

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    logger::log_server_start(&addr, &cfg);

    #[cfg(feature = "livereload")]
    if cfg.livereload.enabled {
        let lr_cfg = cfg.livereload.clone();
        let watch_root = cfg.watch_root().to_string();
        tokio::spawn(async move {
            if let Err(e) = spaserve::livereload::run(lr_cfg, watch_root).await {
                logger::log_error(&format!("Live-reload channel failed: {e}"));
            }
        });
    }

    server::run(listener, state).await
}
