/*
 *  main.rs
 *
 *  NetWorS - worth watching
 *	(c) 2020-26 Stuart Hunter
 *
 *	TODO:
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use env_logger::Env;
use log::{info, warn};
use std::time::Duration;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind};

use networs::config::{self, PanelKind};
use networs::constants::PAGE_COUNT;
use networs::pacer::Pacer;
use networs::pages::{self, PageCursor};
use networs::panel::{NullPanel, PanelDriver, PpmPanel};
use networs::portfolio::PortfolioFeed;
use networs::snapshot::SnapshotStore;
use networs::touch::{NoTouch, TouchPort};
use networs::vframebuf::VarFrameBuf;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// The render worker: read the latest snapshot copy, keep the page timer
/// and the touch override honest, compose the frame, flush at the paced
/// rate. Never returns; the fetch worker runs beside it.
async fn run_display_loop(
    store: SnapshotStore,
    mut panel: Box<dyn PanelDriver>,
    mut touch: Box<dyn TouchPort>,
    page_cycle: Duration,
) -> anyhow::Result<()> {
    let (width, height) = panel.dimensions();
    let mut frame = VarFrameBuf::new(width, height, Rgb565::BLACK);
    let mut cursor = PageCursor::new();
    let mut pacer = Pacer::new(20);
    let loop_pause = Duration::from_millis(50);

    info!("Entering display loop ({} pages, {:?} per page)", PAGE_COUNT, page_cycle);

    loop {
        let snap = store.read();

        if cursor.due(page_cycle) {
            cursor.advance();
            // New page starts from a cleared band; the backdrop pass
            // restores the rule.
            frame.clear_color(Rgb565::BLACK);
        }

        if touch.poll().is_some() {
            cursor.advance();
            frame.clear_color(Rgb565::BLACK);
            // Resistive overlays bounce; one short sleep filters it.
            tokio::time::sleep(Duration::from_millis(300)).await;
        }

        pages::draw_backdrop(&mut frame, &snap)?;
        pages::render_page(&mut frame, &snap, cursor.page(), cursor.laps())?;
        pages::draw_cycle_progress(&mut frame, cursor.progress(page_cycle))?;

        if pacer.should_flush() {
            panel.flush(&frame)?;
        }

        tokio::time::sleep(loop_pause).await;
    }
}

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> anyhow::Result<()> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(
        Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")),
    )
    .init();
    info!("NetWorS v{} (built {})", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let (width, height) = cfg.panel_size();
    let mut panel: Box<dyn PanelDriver> = match cfg.panel_kind() {
        PanelKind::Null => Box::new(NullPanel::new(width, height)),
        PanelKind::Ppm => Box::new(PpmPanel::new(cfg.frame_path(), width, height)),
    };
    panel.init()?;
    panel.set_backlight(cfg.backlight())?;
    info!("Panel ready: {}x{}, safe band {} rows", width, height, cfg.safe_height());

    let url = cfg
        .feed_url()
        .ok_or_else(|| anyhow::anyhow!("feed url not configured (feed.url or --feed-url)"))?;
    let key_env = cfg.api_key_env();
    let api_key = std::env::var(&key_env).unwrap_or_else(|_| {
        warn!("{} not set; fetching without an access key", key_env);
        String::new()
    });

    let store = SnapshotStore::new();
    let feed = PortfolioFeed::new(url, api_key)?;
    let (poll_handle, stop_tx) = feed.start_polling(store.clone(), cfg.fetch_interval());

    // The overlay port is hardware-specific; nothing is wired into this
    // build, so an enabled flag still polls the stub.
    if cfg.touch_enabled() {
        warn!("touch enabled in config but no overlay port is compiled in");
    }
    let touch: Box<dyn TouchPort> = Box::new(NoTouch);

    tokio::select! {
        result = run_display_loop(store, panel, touch, cfg.page_cycle()) => {
            result?;
        }
        _ = signal_handler() => {
            let _ = stop_tx.send(()).await;
            let _ = poll_handle.await;
        }
    }

    info!("NetWorS stopped.");
    Ok(())
}
