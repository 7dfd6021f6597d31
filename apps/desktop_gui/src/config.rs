use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use planner_client::{ClientConfig, DEFAULT_ENDPOINT};
use url::Url;

use crate::ui::form::DateBounds;

pub const SETTINGS_FILE: &str = "vacation_ai.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub request_timeout_secs: Option<u64>,
    pub restrict_to_past_dates: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            request_timeout_secs: None,
            // Future trips are allowed unless past-only mode is switched on.
            restrict_to_past_dates: false,
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<toml::Table>() {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg, path),
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
    }

    if let Some(v) = env("VACATION_AI_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = env("APP__ENDPOINT") {
        settings.endpoint = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__RESTRICT_TO_PAST_DATES") {
        match parse_flag(&v) {
            Some(parsed) => settings.restrict_to_past_dates = parsed,
            None => tracing::warn!(value = %v, "ignoring invalid APP__RESTRICT_TO_PAST_DATES"),
        }
    }

    settings
}

/// Each key is parsed on its own; a bad value only drops that key.
fn apply_file(settings: &mut Settings, file_cfg: &toml::Table, path: &Path) {
    if let Some(v) = file_value(file_cfg, "endpoint", path) {
        settings.endpoint = v;
    }

    if let Some(v) = file_value(file_cfg, "request_timeout_secs", path) {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => tracing::warn!(
                path = %path.display(),
                value = %v,
                "ignoring invalid request_timeout_secs"
            ),
        }
    }

    if let Some(v) = file_value(file_cfg, "restrict_to_past_dates", path) {
        match parse_flag(&v) {
            Some(parsed) => settings.restrict_to_past_dates = parsed,
            None => tracing::warn!(
                path = %path.display(),
                value = %v,
                "ignoring invalid restrict_to_past_dates"
            ),
        }
    }
}

fn file_value(file_cfg: &toml::Table, key: &str, path: &Path) -> Option<String> {
    match file_cfg.get(key)? {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        toml::Value::Boolean(v) => Some(v.to_string()),
        other => {
            tracing::warn!(path = %path.display(), key, "ignoring non-scalar setting: {other}");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    pub fn apply_overrides(
        &mut self,
        endpoint: Option<String>,
        request_timeout_secs: Option<u64>,
        restrict_to_past_dates: bool,
    ) {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = request_timeout_secs {
            self.request_timeout_secs = Some(secs);
        }
        if restrict_to_past_dates {
            self.restrict_to_past_dates = true;
        }
    }

    pub fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        let mut config = ClientConfig::new(endpoint);
        // Zero means "no timeout", same as leaving it unset.
        if let Some(secs) = self.request_timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn date_bounds(&self) -> DateBounds {
        if self.restrict_to_past_dates {
            DateBounds::past_only()
        } else {
            DateBounds::default()
        }
    }
}

fn parse_endpoint(raw: &str) -> anyhow::Result<Url> {
    let raw = raw.trim();
    let endpoint =
        Url::parse(raw).with_context(|| format!("invalid planning endpoint url '{raw}'"))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        bail!(
            "planning endpoint '{raw}' must use http or https, not '{}'",
            endpoint.scheme()
        );
    }
    Ok(endpoint)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
