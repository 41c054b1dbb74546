use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::clock::{HourFormat, TimeFields};
use crate::display::drivers::framebuffer::FrameSink;
use crate::display::layout::DisplayGeometry;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,        // e.g., "info" | "debug"
    pub hour_format: Option<HourFormat>,  // "auto" | "12h" | "24h"
    /// face geometry
    pub display: Option<DisplayConfig>,
    /// where frames go
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub circle_radius: Option<u32>,
    pub circle_padding: Option<u32>,
    pub line_thickness: Option<u32>,
    pub invert: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    pub mode: Option<OutputMode>,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// draw on stdout
    #[default]
    Terminal,
    /// rewrite a PBM image every second
    Pbm,
    /// render without output (logging only)
    None,
}

const DEFAULT_PBM_PATH: &str = "bitclock.pbm";

impl Config {
    /// Geometry with unset values taken from the 144x168 reference face
    pub fn geometry(&self) -> DisplayGeometry {
        let mut g = DisplayGeometry::default();
        if let Some(d) = self.display.as_ref() {
            if let Some(v) = d.width          { g.screen_width = v; }
            if let Some(v) = d.height         { g.screen_height = v; }
            if let Some(v) = d.circle_radius  { g.circle_radius = v; }
            if let Some(v) = d.circle_padding { g.circle_padding = v; }
            if let Some(v) = d.line_thickness { g.line_thickness = v; }
        }
        g
    }

    pub fn hour_format(&self) -> HourFormat {
        self.hour_format.unwrap_or_default()
    }

    pub fn invert(&self) -> bool {
        self.display.as_ref().and_then(|d| d.invert).unwrap_or(false)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn frame_sink(&self) -> FrameSink {
        let output = self.output.clone().unwrap_or_default();
        match output.mode.unwrap_or_default() {
            OutputMode::Terminal => FrameSink::Terminal,
            OutputMode::Pbm => FrameSink::Pbm(
                output.path.unwrap_or_else(|| PathBuf::from(DEFAULT_PBM_PATH)),
            ),
            OutputMode::None => FrameSink::Discard,
        }
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "bitclock", version, about = "Binary clock watch face", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(short = 'v', long, alias = "verbose", action = ArgAction::SetTrue)]
    pub debug: bool,
    #[arg(long, value_enum)]
    pub hour_format: Option<HourFormat>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub display_height: Option<u32>,
    #[arg(long)]
    pub circle_radius: Option<u32>,
    #[arg(long, action = ArgAction::Set)]
    pub invert: Option<bool>,
    #[arg(long, value_enum)]
    pub output: Option<OutputMode>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output_path: Option<PathBuf>,
    /// render a single frame and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub once: bool,
    /// freeze the clock at HH:MM[:SS]
    #[arg(long, value_parser = parse_hms)]
    pub at: Option<(u8, u8, u8)>,
    /// day of month for --at
    #[arg(long)]
    pub day: Option<u8>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Per-run switches that do not belong in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub once: bool,
    pub fixed_time: Option<TimeFields>,
    pub dump_config: bool,
}

fn parse_hms(s: &str) -> Result<(u8, u8, u8), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return Err(format!("expected HH:MM[:SS], got '{s}'"));
    }
    let mut v = [0u8; 3];
    for (slot, p) in v.iter_mut().zip(&parts) {
        *slot = p.parse().map_err(|_| format!("'{p}' is not a number"))?;
    }
    let [h, m, sec] = v;
    if h > 23 || m > 59 || sec > 59 {
        return Err(format!("time out of range: '{s}'"));
    }
    Ok((h, m, sec))
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Config, RunOptions), ConfigError> {
    load_from(Cli::parse())
}

/// Same as `load` for an already parsed command line.
pub fn load_from(cli: Cli) -> Result<(Config, RunOptions), ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;
    let run = run_options(&cli)?;

    Ok((cfg, run))
}

fn run_options(cli: &Cli) -> Result<RunOptions, ConfigError> {
    let fixed_time = match (cli.at, cli.day) {
        (Some((h, m, s)), day) => {
            let day = day.unwrap_or(1);
            if !(1..=31).contains(&day) {
                return Err(ConfigError::Validation("--day must be 1..=31".into()));
            }
            Some(TimeFields::new(day, h, m, s))
        }
        (None, Some(_)) => {
            return Err(ConfigError::Validation("--day needs --at".into()));
        }
        (None, None) => None,
    };
    Ok(RunOptions {
        once: cli.once,
        fixed_time,
        dump_config: cli.dump_config,
    })
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/bitclock/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/bitclock/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/bitclock.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["bitclock.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()   { dst.log_level = src.log_level; }
    if src.hour_format.is_some() { dst.hour_format = src.hour_format; }
    match (&mut dst.display, src.display) {
        (None, Some(c)) => dst.display = Some(c),
        (Some(d), Some(s)) => merge_display(d, s),
        _ => {}
    }
    match (&mut dst.output, src.output) {
        (None, Some(c)) => dst.output = Some(c),
        (Some(d), Some(s)) => {
            if s.mode.is_some() { d.mode = s.mode; }
            if s.path.is_some() { d.path = s.path; }
        }
        _ => {}
    }
}

fn merge_display(dst: &mut DisplayConfig, src: DisplayConfig) {
    if src.width.is_some()          { dst.width = src.width; }
    if src.height.is_some()         { dst.height = src.height; }
    if src.circle_radius.is_some()  { dst.circle_radius = src.circle_radius; }
    if src.circle_padding.is_some() { dst.circle_padding = src.circle_padding; }
    if src.line_thickness.is_some() { dst.line_thickness = src.line_thickness; }
    if src.invert.is_some()         { dst.invert = src.invert; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()   { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                 { cfg.log_level = Some("debug".into()); }
    if cli.hour_format.is_some() { cfg.hour_format = cli.hour_format; }

    let any_display = cli.display_width.is_some()
        || cli.display_height.is_some()
        || cli.circle_radius.is_some()
        || cli.invert.is_some();
    if any_display && cfg.display.is_none() {
        cfg.display = Some(DisplayConfig::default());
    }
    if let Some(display) = cfg.display.as_mut() {
        if cli.display_width.is_some()  { display.width = cli.display_width; }
        if cli.display_height.is_some() { display.height = cli.display_height; }
        if cli.circle_radius.is_some()  { display.circle_radius = cli.circle_radius; }
        if cli.invert.is_some()         { display.invert = cli.invert; }
    }

    if (cli.output.is_some() || cli.output_path.is_some()) && cfg.output.is_none() {
        cfg.output = Some(OutputConfig::default());
    }
    if let Some(output) = cfg.output.as_mut() {
        if cli.output.is_some()      { output.mode = cli.output; }
        if cli.output_path.is_some() { output.path = cli.output_path.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let g = cfg.geometry();
    if g.screen_width == 0 || g.screen_height == 0 {
        return Err(ConfigError::Validation("display width/height must be > 0".into()));
    }
    if g.circle_radius == 0 {
        return Err(ConfigError::Validation("display circle_radius must be > 0".into()));
    }
    if g.line_thickness == 0 || g.line_thickness >= g.circle_radius {
        return Err(ConfigError::Validation(
            "display line_thickness must be between 1 and circle_radius - 1".into(),
        ));
    }
    let Some(grid) = g.grid_size() else {
        return Err(ConfigError::Validation(format!(
            "display geometry out of range (radius {}, padding {}, {}x{})",
            g.circle_radius, g.circle_padding, g.screen_width, g.screen_height
        )));
    };
    if !g.fits_screen() {
        return Err(ConfigError::Validation(format!(
            "a {}x{} cell grid does not fit a {}x{} display",
            grid.width, grid.height, g.screen_width, g.screen_height
        )));
    }
    if let Some(OutputConfig { mode: Some(OutputMode::Pbm), path: Some(p) }) = cfg.output.as_ref() {
        if p.as_os_str().is_empty() {
            return Err(ConfigError::Validation("output path must not be empty".into()));
        }
    }
    Ok(())
}
