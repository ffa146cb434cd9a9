use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::DisplayTarget;

/// Installs the global logger.
///
/// The terminal target draws on stdout, so its log goes to `log_file` instead
/// of the screen. Everything else logs to stderr.
pub fn init(level: LevelFilter, target: DisplayTarget, log_file: &Path) -> std::io::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Debug)
        .set_target_level(LevelFilter::Trace)
        .build();

    let logger: Box<dyn SharedLogger> = match target {
        DisplayTarget::Terminal => WriteLogger::new(level, config, File::create(log_file)?),
        _ => TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto),
    };

    CombinedLogger::init(vec![logger]).map_err(std::io::Error::other)
}
