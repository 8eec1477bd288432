// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use eventdesk_app::Role;
use eventdesk_app::listing::PageSize;
use log::LevelFilter;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const APP_NAME: &str = "eventdesk";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_NOTIFICATION_SECS: i64 = 4;
const DEFAULT_LATENCY_MS: i64 = 400;
const MAX_LATENCY_MS: i64 = 60_000;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub export: Export,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            simulation: Simulation::default(),
            export: Export::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub role: Option<String>,
    pub page_size: Option<i64>,
    pub notification_secs: Option<i64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            role: Some(Role::Organizer.as_str().to_owned()),
            page_size: Some(PageSize::default().get() as i64),
            notification_secs: Some(DEFAULT_NOTIFICATION_SECS),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    pub latency_ms: Option<i64>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            latency_ms: Some(DEFAULT_LATENCY_MS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub path: Option<String>,
    pub level: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("EVENTDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!(
                "cannot resolve config directory; set EVENTDESK_CONFIG_PATH to the config file"
            )
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` at the top and keep values under [ui], [simulation], [export], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(role) = &self.ui.role
            && Role::parse(role).is_none()
        {
            bail!(
                "ui.role in {} must be one of {}, got {role:?}",
                path.display(),
                role_names()
            );
        }

        if let Some(page_size) = self.ui.page_size
            && page_size_from_config(page_size).is_none()
        {
            bail!(
                "ui.page_size in {} must be one of 5, 10, 25, 50, 100, got {page_size}",
                path.display()
            );
        }

        if let Some(secs) = self.ui.notification_secs
            && secs <= 0
        {
            bail!(
                "ui.notification_secs in {} must be positive, got {secs}",
                path.display()
            );
        }

        if let Some(latency) = self.simulation.latency_ms
            && !(0..=MAX_LATENCY_MS).contains(&latency)
        {
            bail!(
                "simulation.latency_ms in {} must be between 0 and {MAX_LATENCY_MS}, got {latency}",
                path.display()
            );
        }

        if let Some(dir) = &self.export.dir
            && dir.trim().is_empty()
        {
            bail!(
                "export.dir in {} is empty; remove it to use the default",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && LevelFilter::from_str(level).is_err()
        {
            bail!(
                "log.level in {} must be one of off, error, warn, info, debug, trace, got {level:?}",
                path.display()
            );
        }

        Ok(())
    }

    pub fn role(&self) -> Role {
        self.ui
            .role
            .as_deref()
            .and_then(Role::parse)
            .unwrap_or(Role::Organizer)
    }

    pub fn page_size(&self) -> PageSize {
        self.ui
            .page_size
            .and_then(page_size_from_config)
            .unwrap_or_default()
    }

    pub fn notification_ttl(&self) -> Duration {
        let secs = self
            .ui
            .notification_secs
            .unwrap_or(DEFAULT_NOTIFICATION_SECS)
            .max(1);
        Duration::from_secs(secs as u64)
    }

    pub fn latency(&self) -> Duration {
        let millis = self
            .simulation
            .latency_ms
            .unwrap_or(DEFAULT_LATENCY_MS)
            .clamp(0, MAX_LATENCY_MS);
        Duration::from_millis(millis as u64)
    }

    pub fn export_dir(&self) -> Result<PathBuf> {
        match &self.export.dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(data_dir()?.join("exports")),
        }
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join(format!("{APP_NAME}.log"))),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log
            .level
            .as_deref()
            .and_then(|level| LevelFilter::from_str(level).ok())
            .unwrap_or(LevelFilter::Info)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# eventdesk config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# One of: {}\nrole = \"organizer\"\n# One of: 5, 10, 25, 50, 100\npage_size = {}\nnotification_secs = {DEFAULT_NOTIFICATION_SECS}\n\n[simulation]\n# Delay before each backend operation applies\nlatency_ms = {DEFAULT_LATENCY_MS}\n\n[export]\n# Optional. Default is the platform data dir (for example ~/.local/share/eventdesk/exports)\n# dir = \"/absolute/path/to/exports\"\n\n[log]\n# path = \"/absolute/path/to/eventdesk.log\"\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n",
            path.display(),
            role_names(),
            PageSize::default().get(),
        )
    }
}

fn page_size_from_config(value: i64) -> Option<PageSize> {
    usize::try_from(value).ok().and_then(PageSize::from_len)
}

fn role_names() -> String {
    Role::ALL
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn data_dir() -> Result<PathBuf> {
    let root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [export].dir and [log].path in the config")
    })?;
    Ok(root.join(APP_NAME))
}
