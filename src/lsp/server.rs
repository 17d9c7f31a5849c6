use anyhow::Result;
use tokio::io::{stdin, stdout};
use tower_lsp::{LspService, Server};

use crate::lsp::backend::Backend;
use crate::lsp::protocol::{DID_CHANGE_ACTIVE_EDITOR, DID_CHANGE_SELECTION, METRICS_REQUEST};
use crate::Config;

/// Start the LSP server on stdio
pub async fn serve() -> Result<()> {
    let config = Config::from_args_and_env()?;
    init_logging(&config.log_level);

    match &config.project_config_path {
        Some(path) => log::info!("Using config file: {}", path.display()),
        None => log::info!("No {} found, using defaults", crate::config::PROJECT_CONFIG_FILE),
    }

    let (service, socket) = LspService::build(move |client| Backend::new(client, config))
        .custom_method(DID_CHANGE_ACTIVE_EDITOR, Backend::did_change_active_editor)
        .custom_method(DID_CHANGE_SELECTION, Backend::did_change_selection)
        .custom_method(METRICS_REQUEST, Backend::metrics)
        .finish();

    Server::new(stdin(), stdout(), socket).serve(service).await;

    Ok(())
}

/// Log to stderr; stdout carries the protocol. `RUST_LOG` wins over the
/// `--log-level` flag.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();
}
