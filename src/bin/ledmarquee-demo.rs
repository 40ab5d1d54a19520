/*
 *  bin/ledmarquee-demo.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  Terminal demo: runs the marquee against a stdout "LED screen".
 *
 *  Usage:
 *    cargo run --bin ledmarquee-demo
 *    cargo run --bin ledmarquee-demo -- --width 24 --tick-interval-ms 250
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 */
use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use env_logger::Env;
use log::info;

use ledmarquee::{MarqueeController, MarqueeSink, config};

/// Renders the marquee window on one stdout line, bracketed and padded to
/// the display width so shorter windows blank the trailing cells.
struct TerminalSink {
    width: usize,
    available: AtomicBool,
}

impl TerminalSink {
    fn new(width: usize) -> Self {
        // prime the display with a blank line
        print!("\r[{:width$}]", "", width = width);
        let _ = std::io::stdout().flush();
        Self {
            width,
            available: AtomicBool::new(true),
        }
    }
}

impl MarqueeSink for TerminalSink {
    fn set_text(&self, window: &str) {
        print!("\r[{:width$}]", window, width = self.width);
    }

    fn width(&self) -> usize {
        self.width
    }

    fn request_repaint(&self) {
        let _ = std::io::stdout().flush();
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    env_logger::Builder::from_env(
        Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("warn")),
    )
    .init();

    let controller = MarqueeController::start(&cfg.tuning());
    let sink = Arc::new(TerminalSink::new(cfg.display_width()));
    controller.register_display(sink);

    // a short guided tour: three timed messages, then an open-ended one
    controller.enqueue("100", Some(Duration::from_secs(2)));
    controller.enqueue("200", Some(Duration::from_secs(2)));
    controller.enqueue("300", Some(Duration::from_secs(2)));
    controller.enqueue("end of test", None);

    // after a while, simulate a preset switch from the config's table
    if let Some(preset) = cfg.presets.as_ref().and_then(|p| p.first()).cloned() {
        let name = preset.name;
        info!("will switch to preset {} ({})", name, preset.url);
        tokio::time::sleep(Duration::from_secs(15)).await;
        controller.interrupt_with_preset(&name).await;
    }

    tokio::signal::ctrl_c().await?;
    println!();
    info!("interrupt received, shutting down");
    controller.shutdown();
    Ok(())
}
