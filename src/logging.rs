//! Logging setup: file log with timestamps plus terminal warnings.

use anyhow::{Result, anyhow};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub path: PathBuf,
    /// Minimum level written to the file.
    pub level: LevelFilter,
    /// File size in bytes that triggers rotation on startup (0 = never).
    pub max_size: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("superid.log"),
            level: LevelFilter::Info,
            max_size: 10 * 1024 * 1024,
        }
    }
}

impl LogConfig {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

/// Installs the global logger. Call once, before the runtime starts.
///
/// The file receives everything at `config.level` with RFC3339 timestamps
/// and source locations for debug output; the terminal only shows
/// warnings and errors, without timestamps.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    if needs_rotation(config) {
        rotate_log(&config.path)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .map_err(|e| anyhow!("Failed to open log file {}: {}", config.path.display(), e))?;

    let file_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Debug)
        .build();

    let term_config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> =
        vec![WriteLogger::new(config.level, file_config, log_file)];

    if std::env::var_os("TERM").is_some() {
        loggers.push(TermLogger::new(
            LevelFilter::Warn,
            term_config,
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers).map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    log::info!("Logging initialized at level {:?}", config.level);
    log::debug!("Log file: {}", config.path.display());
    Ok(())
}

fn needs_rotation(config: &LogConfig) -> bool {
    config.max_size > 0
        && std::fs::metadata(&config.path)
            .map(|m| m.len() > config.max_size)
            .unwrap_or(false)
}

/// Moves the current log aside with a timestamp suffix.
fn rotate_log(path: &Path) -> Result<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("superid.log");

    let rotated = path.with_file_name(format!("{}.{}", file_name, timestamp));
    std::fs::rename(path, &rotated)?;
    Ok(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new(PathBuf::from("/tmp/superid-test.log"))
            .with_level(LevelFilter::Trace)
            .with_max_size(1024);

        assert_eq!(config.path, PathBuf::from("/tmp/superid-test.log"));
        assert_eq!(config.level, LevelFilter::Trace);
        assert_eq!(config.max_size, 1024);
    }

    #[test]
    fn test_rotation_threshold() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("superid.log");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();

        let config = LogConfig::new(path.clone()).with_max_size(32);
        assert!(needs_rotation(&config));
        assert!(!needs_rotation(&config.clone().with_max_size(0)));
        assert!(!needs_rotation(&config.clone().with_max_size(128)));
    }

    #[test]
    fn test_rotate_moves_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("superid.log");
        std::fs::write(&path, "old entries").unwrap();

        let rotated = rotate_log(&path).unwrap();
        assert!(!path.exists());
        assert!(rotated.exists());
        assert!(
            rotated
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("superid.log.")
        );
    }
}
