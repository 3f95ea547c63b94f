#![doc = include_str!("../README.md")]

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{
    config::{AppConfig, CliArgs},
    telemetry::init_tracing,
    view::ConsoleView,
};
use effectgen::{
    BinaryPayload, JobController, ReqwestTransport, ThreadRandom, TokioJobController,
};
use std::{path::Path, sync::Arc};
use tokio::signal;

type Controller = TokioJobController<ReqwestTransport>;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_tracing()?;
    tracing::debug!(?config, "Starting");

    let bytes = tokio::fs::read(&config.file)
        .await
        .with_context(|| format!("failed to read {}", config.file.display()))?;
    let payload = BinaryPayload::new(config.file_name(), config.mime_type.clone(), bytes);

    let controller: Controller = JobController::new(
        Arc::new(ReqwestTransport::default()),
        config.controller.clone(),
        ThreadRandom,
    );
    let view = tokio::spawn(ConsoleView::new(controller.subscribe()).run());

    let outcome = tokio::select! {
        res = run(&controller, payload, config.output_dir.as_deref()) => res,
        res = signal::ctrl_c() => {
            res.context("failed to install Ctrl+C handler")?;
            tracing::info!("Received Ctrl+C signal");
            controller.reset();
            Err(anyhow::anyhow!("interrupted"))
        }
    };

    // closes the event channel so the view drains and exits
    drop(controller);
    view.await?;
    outcome
}

async fn run(
    controller: &Controller,
    payload: BinaryPayload,
    output_dir: Option<&Path>,
) -> anyhow::Result<()> {
    controller
        .select_file(payload)
        .await?
        .context("controller refused the file")?;
    let result = controller
        .generate()
        .await?
        .context("controller was not ready to generate")?;
    tracing::info!(media_url = %result.media_url, "Job complete");

    let Some(dir) = output_dir else {
        return Ok(());
    };
    let media = controller
        .download()
        .await?
        .context("no asset to download")?;
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(&media.file_name);
    tokio::fs::write(&path, &media.bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved {}", path.display());
    Ok(())
}
