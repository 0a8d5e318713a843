use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

mod assets;
mod cli;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod routing;
mod server;

use assets::{AssetTree, Dist, EmbeddedTree, MemoryTree};
use error::StartupError;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger::log_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), StartupError> {
    let cli = cli::Cli::parse();
    let cfg = config::Config::load(&cli)?;
    logger::init(&cfg)?;

    // The tree must be complete before the first connection is accepted
    let (assets, asset_source) = load_assets(&cfg.assets)?;
    let addr = cfg.socket_addr()?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers.filter(|&w| w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(StartupError::Runtime)?;

    runtime.block_on(async move {
        let listener = server::bind(addr)?;
        let bound = listener.local_addr().unwrap_or(addr);
        logger::log_server_start(&bound, &cfg, &asset_source);

        let state = Arc::new(config::AppState::new(cfg, assets));
        server::run(listener, state).await;
        Ok(())
    })
}

/// Build the asset tree named by configuration and check its root document
///
/// Returns the tree and a description of where it came from.
fn load_assets(cfg: &config::AssetsConfig) -> Result<(Arc<dyn AssetTree>, String), StartupError> {
    let (tree, source): (Arc<dyn AssetTree>, String) = match &cfg.dir {
        Some(dir) => {
            let tree = MemoryTree::load_dir(dir)?;
            let source = format!("{} files from {}", tree.file_count(), dir.display());
            (Arc::new(tree), source)
        }
        None => {
            let tree = EmbeddedTree::<Dist>::new();
            let source = format!("{} bundled files", tree.file_count());
            (Arc::new(tree), source)
        }
    };

    assets::ensure_root_document(tree.as_ref(), &cfg.root_document)?;
    Ok((tree, source))
}
