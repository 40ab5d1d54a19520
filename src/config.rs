/*
 *  config.rs
 *
 *  ledmarquee - queue-driven LED marquee scroller
 *  (c) 2025-26 ledmarquee authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::constants::{
    DEFAULT_DISPLAY_WIDTH, DEFAULT_GRACE_DELAY, DEFAULT_POLL_INTERVAL, DEFAULT_TICK_INTERVAL,
};

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>, // e.g., "info" | "debug"
    /// marquee geometry & timing
    pub led_screen: Option<LedScreenConfig>,
    /// station shortcuts; the player side of a preset is out of scope here,
    /// the marquee side shows its name on switch
    pub presets: Option<Vec<Preset>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LedScreenConfig {
    pub width: Option<usize>,
    pub tick_interval_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub grace_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub name: String,
    pub url: String,
}

/// Resolved timing knobs handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarqueeTuning {
    pub tick_interval: Duration,
    pub poll_interval: Duration,
    pub grace_delay: Duration,
}

impl Default for MarqueeTuning {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            grace_delay: DEFAULT_GRACE_DELAY,
        }
    }
}

impl Config {
    /// Collapse the optional ms fields into concrete durations.
    pub fn tuning(&self) -> MarqueeTuning {
        let defaults = MarqueeTuning::default();
        let screen = self.led_screen.as_ref();
        let ms = |v: Option<u64>, d: Duration| v.map(Duration::from_millis).unwrap_or(d);
        MarqueeTuning {
            tick_interval: ms(screen.and_then(|s| s.tick_interval_ms), defaults.tick_interval),
            poll_interval: ms(screen.and_then(|s| s.poll_interval_ms), defaults.poll_interval),
            grace_delay: ms(screen.and_then(|s| s.grace_delay_ms), defaults.grace_delay),
        }
    }

    pub fn display_width(&self) -> usize {
        self.led_screen
            .as_ref()
            .and_then(|s| s.width)
            .unwrap_or(DEFAULT_DISPLAY_WIDTH)
    }
}

/// CLI overrides. All fields are Options so we can layer them over JSON.
#[derive(Debug, Parser, Clone)]
#[command(name = "ledmarquee", about = "LED marquee scroller demo", disable_help_flag = false)]
pub struct Cli {
    /// Path to a JSON config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub width: Option<usize>,
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
    #[arg(long)]
    pub grace_delay_ms: Option<u64>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read JSON, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();

    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) JSON file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let j = read_json(p)?;
            merge(&mut cfg, j);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let j = read_json(&p)?;
        merge(&mut cfg, j);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        // Pretty JSON of effective config (nice for debugging)
        let s = serde_json::to_string_pretty(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/ledmarquee/config.json
    if let Some(home) = home_dir() {
        let p = home.join(".config/ledmarquee/config.json");
        if p.exists() {
            return Some(p);
        }
        let p = home.join(".config/ledmarquee.json");
        if p.exists() {
            return Some(p);
        }
    }
    // project local
    for candidate in &["ledmarquee.json", "config.json", "config/ledmarquee.json"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

fn read_json(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_json::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() {
        dst.log_level = src.log_level;
    }
    if src.presets.is_some() {
        dst.presets = src.presets;
    }
    match (&mut dst.led_screen, src.led_screen) {
        (None, Some(c)) => dst.led_screen = Some(c),
        (Some(d), Some(s)) => merge_led_screen(d, s),
        _ => {}
    }
}

fn merge_led_screen(dst: &mut LedScreenConfig, src: LedScreenConfig) {
    if src.width.is_some() {
        dst.width = src.width;
    }
    if src.tick_interval_ms.is_some() {
        dst.tick_interval_ms = src.tick_interval_ms;
    }
    if src.poll_interval_ms.is_some() {
        dst.poll_interval_ms = src.poll_interval_ms;
    }
    if src.grace_delay_ms.is_some() {
        dst.grace_delay_ms = src.grace_delay_ms;
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }
    let any_case = cli.width.is_some()
        || cli.tick_interval_ms.is_some()
        || cli.poll_interval_ms.is_some()
        || cli.grace_delay_ms.is_some();

    if any_case && cfg.led_screen.is_none() {
        cfg.led_screen = Some(LedScreenConfig::default());
    }
    if let Some(screen) = cfg.led_screen.as_mut() {
        if cli.width.is_some() {
            screen.width = cli.width;
        }
        if cli.tick_interval_ms.is_some() {
            screen.tick_interval_ms = cli.tick_interval_ms;
        }
        if cli.poll_interval_ms.is_some() {
            screen.poll_interval_ms = cli.poll_interval_ms;
        }
        if cli.grace_delay_ms.is_some() {
            screen.grace_delay_ms = cli.grace_delay_ms;
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(screen) = cfg.led_screen.as_ref() {
        // a zero display width is a valid degenerate marquee, but zero
        // intervals would spin the loops
        if screen.tick_interval_ms == Some(0) {
            return Err(ConfigError::Validation("tick_interval_ms must be > 0".into()));
        }
        if screen.poll_interval_ms == Some(0) {
            return Err(ConfigError::Validation("poll_interval_ms must be > 0".into()));
        }
    }
    if let Some(presets) = cfg.presets.as_ref() {
        if presets.iter().any(|p| p.name.is_empty()) {
            return Err(ConfigError::Validation("preset name must not be empty".into()));
        }
    }
    Ok(())
}
