use std::collections::HashMap;
use std::fs;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/traintrack.db".into(),
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `traintrack.toml` next to the binary, then environment
/// variables. Later sources win.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("traintrack.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("TRAINTRACK_DB") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("TRAINTRACK_LOG") {
        settings.log_filter = v;
    }

    settings
}
