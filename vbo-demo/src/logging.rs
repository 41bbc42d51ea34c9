use std::sync::Once;

/// Logger setup.  `env_filter` uses the `env_logger` filter syntax, e.g. "debug" or
/// "vbo_demo=debug,gl_thin=warn".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Install the global logger.  Only the first call does anything.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match &config.env_filter {
            Some(filter) => {
                builder.parse_filters(filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
