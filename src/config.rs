use std::path::PathBuf;
use std::time::Duration;

use crate::types::InstanceId;

/// Text shown when there is no session or a field is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub title: String,
    pub artist: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            title: "song title".to_string(),
            artist: "artist name".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub placeholders: Placeholders,
    /// Font used for the avatar initial. `None` tries the usual system locations.
    pub font_path: Option<PathBuf>,
    pub artwork_timeout: Duration,
    /// Where the demo host writes rendered widgets
    pub output_dir: PathBuf,
    /// Instance ids the demo host pretends are placed on the home screen
    pub instances: Vec<InstanceId>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            placeholders: Placeholders::default(),
            font_path: None,
            artwork_timeout: Duration::from_secs(10),
            output_dir: PathBuf::from("widget-out"),
            instances: vec![1],
        }
    }
}

impl WidgetConfig {
    /// Read overrides from `WIDGET_*` environment variables.
    /// Unparseable values are logged and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup("WIDGET_FONT_PATH") {
            log::info!("Using avatar font from {}", path);
            config.font_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup("WIDGET_ARTWORK_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.artwork_timeout = Duration::from_millis(ms),
                Err(e) => log::warn!("Ignoring WIDGET_ARTWORK_TIMEOUT_MS={}: {}", raw, e),
            }
        }

        if let Some(dir) = lookup("WIDGET_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("WIDGET_INSTANCES") {
            let parsed: Result<Vec<InstanceId>, _> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse)
                .collect();
            match parsed {
                Ok(ids) => config.instances = ids,
                Err(e) => log::warn!("Ignoring WIDGET_INSTANCES={}: {}", raw, e),
            }
        }

        if let Some(title) = lookup("WIDGET_TITLE_PLACEHOLDER") {
            config.placeholders.title = title;
        }
        if let Some(artist) = lookup("WIDGET_ARTIST_PLACEHOLDER") {
            config.placeholders.artist = artist;
        }

        config
    }
}
