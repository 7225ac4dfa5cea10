use anyhow::Context;
use std::path::Path;
use tokensweep_core::config::Config;
use tokensweep_server::AppState;

pub fn run(root: &Path, port: u16) -> anyhow::Result<()> {
    let config = Config::load_with_env(root).context("failed to load config")?;
    let state = AppState::new(config).context("invalid gateway configuration")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("tokensweep API on http://localhost:{actual_port}  (Ctrl-C to stop)");

        tokio::select! {
            res = tokensweep_server::serve_on(state, listener) => res,
            _ = tokio::signal::ctrl_c() => Ok(()),
        }
    })
}
