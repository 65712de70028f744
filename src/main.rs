//! Load an image source through a bootstrapped Rune app.
//!
//! Usage: `rune <uri-or-path> [output-file]`
//!
//! Settings come from `rune.toml` plus `RUNE_*` environment overrides;
//! set `RUST_LOG=debug` to watch the loader work.

use anyhow::{Context, Result};
use rune_app::AppBuilder;
use rune_config::RuneConfig;
use rune_io::{CancellationToken, ImageSource, LoadEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let target = args.next().context("usage: rune <uri-or-path> [output-file]")?;
    let output = args.next();

    let (tx, mut events) = mpsc::unbounded_channel::<LoadEvent>();
    let app = AppBuilder::new()
        .with_config(RuneConfig::load())
        .configure_image_sources_with(move |services| services.with_observer(Arc::new(tx)))
        .build()?;
    let services = app
        .image_sources()
        .context("image sources are not configured")?;

    let source = if target.contains("://") {
        services.uri(&target)?
    } else {
        ImageSource::file(&target)
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let loaded = services.get_stream(&source, &cancel).await;
    while let Ok(event) = events.try_recv() {
        info!(?event, "load event");
    }

    let Some(stream) = loaded.with_context(|| format!("loading {source}"))? else {
        info!(%source, "source is empty, nothing to load");
        return Ok(());
    };

    let content_type = stream.content_type().map(String::from);
    let from_cache = stream.is_from_cache();
    let data = stream.into_bytes().await?;
    info!(%source, bytes = data.len(), ?content_type, from_cache, "loaded");

    if let Some(path) = output {
        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("writing {path}"))?;
        info!(%path, "saved");
    }

    Ok(())
}
