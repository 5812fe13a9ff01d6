mod cli;
mod config;

use anyhow::{Context, Result};
use cli::Cli;
use config::Config;
use light_status_render::{Canvas, Producer, RenderLoop};
use light_status_screen::resolve_target_rect;
use light_status_x11::{PanelOptions, X11Display, X11Panel};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout 留给命令行诊断
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("light_status=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_cli(Cli::parse_args());
    let cancel = CancellationToken::new();

    // SIGINT / SIGTERM
    let mut sigterm = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
    let cancel_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        tracing::info!("shutting down...");
        cancel_signal.cancel();
    });

    if let Err(e) = run(&config, &cancel).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(config: &Config, cancel: &CancellationToken) -> Result<()> {
    let mut producer = Producer::spawn(&config.command)?;
    let display = X11Display::connect()?;

    let region = resolve_target_rect(
        &config.monitors,
        config.monitor,
        config.default_monitor_index,
        config.mouse.as_ref(),
        &display,
    );
    let panel_rect = config.panel_rect(&region.rect);
    tracing::info!(region = %region.rect, source = ?region.source, panel = %panel_rect, "panel placed");

    // 构造时已校验为正数
    let canvas = Canvas::new(
        panel_rect.w.unsigned_abs(),
        panel_rect.h.unsigned_abs(),
        &config.fonts,
        config.text_color,
        config.background,
    );
    let panel = X11Panel::create(
        &display,
        &PanelOptions {
            rect: panel_rect,
            name: &config.window_name,
            class: &config.window_class,
        },
        canvas,
    )?;

    let mut render = RenderLoop::new(
        panel,
        panel_rect,
        config.text_alignment,
        config.max_status_len,
    );
    let result = render.run(producer.stdout(), cancel).await;

    drop(render);
    producer.shutdown().await;
    let termination = result?;
    tracing::info!(?termination, "exiting");
    Ok(())
}
