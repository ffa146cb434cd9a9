use std::path::PathBuf;
use std::str::FromStr;

use clap::{value_parser, Arg, ArgMatches, Command};
use log::LevelFilter;
use thiserror::Error;

use crate::core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTarget {
    Window,
    Terminal,
    /// Writes each presented frame to a PNG file
    Image,
    /// Presents nowhere
    Headless,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid clear color {value:?}: {reason}")]
    InvalidColor { value: String, reason: &'static str },

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub target: DisplayTarget,
    pub width: usize,
    pub height: usize,
    /// OBJ file to render instead of the built-in cube
    pub model: Option<PathBuf>,
    /// Destination for [`DisplayTarget::Image`]
    pub output: PathBuf,
    /// Stop after this many frames; `None` runs until the display is closed
    pub frames: Option<u64>,
    pub clear_color: Color,
    /// Seed for random vertex colors of loaded models
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: DisplayTarget::Window,
            width: 640,
            height: 480,
            model: None,
            output: PathBuf::from("frame.png"),
            frames: None,
            clear_color: Color::BLACK,
            seed: None,
            log_level: LevelFilter::Info,
        }
    }
}

pub fn create_clap_command() -> Command {
    Command::new("wireframe_renderer")
        .about("Software wireframe rasterizer")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(
            Command::new("render")
                .about("Render a spinning wireframe model")
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_name("MODE")
                        .help("Where frames are presented")
                        .value_parser([
                            "window", "terminal", "image", "headless", "w", "t", "i", "h",
                        ]),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_name("PIXELS")
                        .help("Pixel buffer width")
                        .value_parser(value_parser!(u32).range(1..=8192)),
                )
                .arg(
                    Arg::new("height")
                        .long("height")
                        .value_name("PIXELS")
                        .help("Pixel buffer height")
                        .value_parser(value_parser!(u32).range(1..=8192)),
                )
                .arg(
                    Arg::new("model")
                        .short('f')
                        .long("model")
                        .value_name("FILE")
                        .help("Path to an .obj model. If not supplied, a cube is used.")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("PNG written in image mode")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("frames")
                        .short('n')
                        .long("frames")
                        .value_name("COUNT")
                        .help("Number of frames to render before exiting")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("clear")
                        .long("clear")
                        .value_name("RRGGBB")
                        .help("Clear color as hex"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("SEED")
                        .help("Seed for random vertex colors of loaded models")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("log-level")
                        .long("log-level")
                        .value_name("LEVEL")
                        .help("off, error, warn, info, debug or trace"),
                ),
        )
}

pub fn handle_clap_matches(matches: &ArgMatches) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    let Some(("render", sub)) = matches.subcommand() else {
        return Ok(config);
    };

    if let Some(mode) = sub.get_one::<String>("mode") {
        config.target = match mode.as_str() {
            "terminal" | "t" => DisplayTarget::Terminal,
            "image" | "i" => DisplayTarget::Image,
            "headless" | "h" => DisplayTarget::Headless,
            _ => DisplayTarget::Window,
        };
    }
    if let Some(&w) = sub.get_one::<u32>("width") {
        config.width = w as usize;
    }
    if let Some(&h) = sub.get_one::<u32>("height") {
        config.height = h as usize;
    }
    config.model = sub.get_one::<PathBuf>("model").cloned();
    if let Some(output) = sub.get_one::<PathBuf>("output") {
        config.output = output.clone();
    }
    config.frames = sub.get_one::<u64>("frames").copied();
    if config.target == DisplayTarget::Image && config.frames.is_none() {
        config.frames = Some(1);
    }
    if let Some(hex) = sub.get_one::<String>("clear") {
        config.clear_color = Color::from_hex(hex).map_err(|reason| ConfigError::InvalidColor {
            value: hex.clone(),
            reason,
        })?;
    }
    config.seed = sub.get_one::<u64>("seed").copied();
    if let Some(level) = sub.get_one::<String>("log-level") {
        config.log_level =
            LevelFilter::from_str(level).map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;
    }

    Ok(config)
}
