use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::error::ConfigError;
use tracing::debug;

use crate::{
    autoplay::DEFAULT_AUTOPLAY_PERIOD,
    catalog::StepCatalog,
    controller::{PlaybackController, PlaybackOptions},
};

pub const SETTINGS_FILE: &str = "walkthrough.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub autoplay_period_ms: u64,
    pub catalog_path: Option<PathBuf>,
    pub image_path: PathBuf,
    pub start_playing: bool,
    pub show_details: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autoplay_period_ms: DEFAULT_AUTOPLAY_PERIOD.as_millis() as u64,
            catalog_path: None,
            image_path: PathBuf::from("assets/cat.jpg"),
            start_playing: false,
            show_details: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    autoplay_period_ms: Option<u64>,
    catalog: Option<PathBuf>,
    image: Option<PathBuf>,
    autoplay: Option<bool>,
    show_details: Option<bool>,
}

impl Settings {
    pub fn playback_options(&self) -> Result<PlaybackOptions, ConfigError> {
        PlaybackOptions::new(Duration::from_millis(self.autoplay_period_ms))
    }

    /// The configured catalog file, or the built-in walkthrough when none is set.
    pub fn catalog(&self) -> anyhow::Result<StepCatalog> {
        match &self.catalog_path {
            Some(path) => StepCatalog::load(path),
            None => Ok(StepCatalog::vision_transformer()),
        }
    }

    /// Puts a freshly built controller into the configured starting state.
    pub fn apply_initial_state(&self, controller: &mut PlaybackController) {
        if self.show_details && !controller.state().show_details {
            controller.toggle_details();
        }
        if self.start_playing && !controller.state().is_playing {
            controller.toggle_play();
        }
    }
}

/// Defaults, then `walkthrough.toml` in the working directory, then environment overrides.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_with(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file: SettingsFile = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            debug!(path = %path.display(), "loaded settings file");
            if let Some(v) = file.autoplay_period_ms {
                settings.autoplay_period_ms = v;
            }
            if let Some(v) = file.catalog {
                settings.catalog_path = Some(v);
            }
            if let Some(v) = file.image {
                settings.image_path = v;
            }
            if let Some(v) = file.autoplay {
                settings.start_playing = v;
            }
            if let Some(v) = file.show_details {
                settings.show_details = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    }

    if let Some(v) = env_override(
        &env,
        &["WALKTHROUGH_AUTOPLAY_PERIOD_MS", "APP__AUTOPLAY_PERIOD_MS"],
    ) {
        settings.autoplay_period_ms = v
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid_value("autoplay_period_ms", v.as_str()))?;
    }
    if let Some(v) = env_override(&env, &["WALKTHROUGH_CATALOG", "APP__CATALOG"]) {
        settings.catalog_path = Some(PathBuf::from(v));
    }
    if let Some(v) = env_override(&env, &["WALKTHROUGH_IMAGE", "APP__IMAGE"]) {
        settings.image_path = PathBuf::from(v);
    }
    if let Some(v) = env_override(&env, &["WALKTHROUGH_AUTOPLAY", "APP__AUTOPLAY"]) {
        settings.start_playing = parse_flag("autoplay", &v)?;
    }
    if let Some(v) = env_override(&env, &["WALKTHROUGH_SHOW_DETAILS", "APP__SHOW_DETAILS"]) {
        settings.show_details = parse_flag("show_details", &v)?;
    }

    settings.playback_options()?;
    Ok(settings)
}

/// Later names win, mirroring how `APP__*` overrides the plain variables.
fn env_override(env: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env(name))
        .filter(|value| !value.trim().is_empty())
        .last()
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid_value(key, raw)),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
