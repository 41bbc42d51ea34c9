use crate::logging::LoggingConfig;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TITLE: &str = "VBO demo | (L)ighting (T)exture (D)ynamicUpdate";

/// Knobs for the demo window.  Defaults live here; `VBO_DEMO_*` environment
/// variables override them.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub texture_path: PathBuf,
    /// `env_logger` filter; `None` means plain `info`
    pub log_filter: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: DEFAULT_TITLE.to_string(),
            texture_path: PathBuf::from("data/logo.png"),
            log_filter: None,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source.  Numbers that fail to parse keep their
    /// default and produce a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut rval = Self::default();

        if let Some(width) = parse_or_warn("VBO_DEMO_WIDTH", lookup("VBO_DEMO_WIDTH")) {
            rval.width = width;
        }
        if let Some(height) = parse_or_warn("VBO_DEMO_HEIGHT", lookup("VBO_DEMO_HEIGHT")) {
            rval.height = height;
        }
        if let Some(path) = lookup("VBO_DEMO_TEXTURE") {
            rval.texture_path = PathBuf::from(path);
        }
        rval.log_filter = lookup("VBO_DEMO_LOG").or_else(|| lookup("RUST_LOG"));

        rval
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log_filter.clone(),
            ..LoggingConfig::default()
        }
    }
}

fn parse_or_warn<T: FromStr>(key: &str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            // the logger may not be up yet, this mostly helps when it is
            log::warn!("ignoring {}={:?}, not a number", key, value);
            None
        }
    }
}
