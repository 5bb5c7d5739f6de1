use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "tui-sketch";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SketchConfig {
    /// Target frames per second of the draw loop.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    pub logging: LoggingConfig,
    pub arm: ArmConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level used when `RUST_LOG` is not set (e.g. "info").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Per-module overrides, e.g. `{"tui_sketch::sketch": "debug"}`.
    pub module_levels: HashMap<String, String>,
    /// Directory for the daily rotating log file. Defaults to "logs".
    pub log_directory: Option<String>,
}

/// Shape of the follow arm drawn by [`crate::app::App`].
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ArmConfig {
    #[serde(default = "default_segments")]
    pub segments: usize,
    #[serde(default = "default_segment_length")]
    pub segment_length: f32,
}

fn default_frame_rate() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_segments() -> usize {
    20
}

fn default_segment_length() -> f32 {
    18.0
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            logging: LoggingConfig::default(),
            arm: ArmConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: HashMap::new(),
            log_directory: None,
        }
    }
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            segment_length: default_segment_length(),
        }
    }
}

impl LoggingConfig {
    pub fn directory(&self) -> &str {
        self.log_directory.as_deref().unwrap_or("logs")
    }

    /// Filter directive string: base level followed by module overrides.
    pub fn filter_directives(&self) -> String {
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();

        let mut filter_str = self.level.clone();
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }

    /// Path of today's log file, matching tracing-appender's daily rotation
    /// (`<prefix>.YYYY-MM-DD`, UTC).
    pub fn current_log_file(&self) -> PathBuf {
        let date_str = jiff::Zoned::now()
            .with_time_zone(jiff::tz::TimeZone::UTC)
            .strftime("%Y-%m-%d")
            .to_string();
        Path::new(self.directory()).join(format!("{}.log.{}", APP_NAME, date_str))
    }
}

impl SketchConfig {
    /// Interval between frames; a zero frame rate is treated as 1 fps.
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }

    pub fn load() -> Self {
        let mut candidates = Vec::new();

        // 1. Current working directory
        candidates.push(PathBuf::from("config.ron"));

        // 2. Next to executable
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        // 3. User config directory
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join(APP_NAME).join("config.ron"));
        }

        for path in candidates {
            if let Some(config) = Self::load_from(&path) {
                return config;
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    /// Reads one candidate file. Missing or unparsable files yield `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read config at {}: {}", path.display(), e);
                return None;
            }
        };
        match ron::from_str::<SketchConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let pretty = ron::ser::PrettyConfig::default()
            .depth_limit(2)
            .separate_tuple_members(true);

        let content = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, content)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
