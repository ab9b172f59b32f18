mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub songs_path: Option<PathBuf>,
    pub similarity_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub songs_path: PathBuf,
    pub similarity_path: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub content_cache_age_sec: usize,
    pub frontend_dir_path: Option<String>,
}

fn existing_file(path: PathBuf, what: &str) -> Result<PathBuf> {
    if !path.exists() {
        bail!("{} does not exist: {:?}", what, path);
    }
    if !path.is_file() {
        bail!("{} is not a file: {:?}", what, path);
    }
    Ok(path)
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let songs_path = file
            .songs_path
            .map(PathBuf::from)
            .or_else(|| cli.songs_path.clone())
            .ok_or_else(|| anyhow!("songs_path must be given on the command line or in config file"))?;
        let songs_path = existing_file(songs_path, "Songs snapshot")?;

        let similarity_path = file
            .similarity_path
            .map(PathBuf::from)
            .or_else(|| cli.similarity_path.clone())
            .ok_or_else(|| {
                anyhow!("similarity_path must be given on the command line or in config file")
            })?;
        let similarity_path = existing_file(similarity_path, "Similarity snapshot")?;

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = match file.logging_level {
            Some(s) => parse_logging_level(&s)
                .ok_or_else(|| anyhow!("Invalid logging_level in config file: {:?}", s))?,
            None => cli.logging_level.clone(),
        };

        let content_cache_age_sec = file
            .content_cache_age_sec
            .unwrap_or(cli.content_cache_age_sec);
        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());
        if let Some(dir) = &frontend_dir_path {
            if !Path::new(dir).is_dir() {
                bail!("Frontend directory does not exist: {:?}", dir);
            }
        }

        Ok(Self {
            songs_path,
            similarity_path,
            port,
            metrics_port,
            logging_level,
            content_cache_age_sec,
            frontend_dir_path,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            content_cache_age_sec: self.content_cache_age_sec,
            frontend_dir_path: self.frontend_dir_path.clone(),
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
