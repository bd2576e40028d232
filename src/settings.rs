//! Page settings
//!
//! Read once at boot from the URL query string (`?seed=42&reduced_motion=1`),
//! decoded by the browser's `URLSearchParams`.
//! Nothing is written back; every reload starts from defaults plus the query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Boot-time settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; the clock is used when absent
    pub seed: Option<u64>,
    /// Skip the shake and catch flourish
    pub reduced_motion: bool,
    /// `log` level name (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            reduced_motion: false,
            log_level: "info".to_string(),
        }
    }
}

const KEYS: [&str; 3] = ["seed", "reduced_motion", "log_level"];

impl Settings {
    /// Build from decoded query values, `get` returning the value for a key.
    ///
    /// Unknown keys are ignored; a malformed value falls back to defaults
    /// for the whole set rather than failing the boot.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut map = Map::new();
        for key in KEYS {
            let Some(raw) = get(key) else {
                continue;
            };
            let raw = raw.trim();
            let value = match key {
                "seed" => match raw.parse::<u64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => continue,
                },
                "reduced_motion" => Value::Bool(matches!(raw, "" | "1" | "true" | "yes")),
                _ => Value::String(raw.to_ascii_lowercase()),
            };
            map.insert(key.to_string(), value);
        }

        match serde_json::from_value(Value::Object(map)) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring page settings: {e}");
                Self::default()
            }
        }
    }

    /// Configured level, `Info` when unrecognized
    pub fn level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }

    /// Load from the current page URL (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        match web_sys::UrlSearchParams::new_with_str(&search) {
            Ok(params) => Self::from_lookup(|key| params.get(key)),
            Err(e) => {
                log::warn!("Unreadable query {search:?}: {e:?}");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
