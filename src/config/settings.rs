use std::env;

#[derive(Debug)]
pub struct RegistrySettings {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 3600, // registry mutations can run long
        }
    }
}

#[derive(Debug)]
pub struct ReferenceSettings {
    pub snapshot_url: String,
    pub cache_dir: String,
}

impl Default for ReferenceSettings {
    fn default() -> Self {
        Self {
            snapshot_url: "http://localhost:8000/players/all".to_string(),
            cache_dir: "cache".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct PollingSettings {
    pub interval_ms: u64,
    /// Wall-clock limit on waiting for the registry to finish processing.
    /// `None` waits as long as the registry keeps answering.
    pub timeout_secs: Option<u64>,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_secs: None,
        }
    }
}

#[derive(Debug)]
pub struct AppConfig {
    pub registry: RegistrySettings,
    pub reference: ReferenceSettings,
    pub polling: PollingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        let mut config = Self {
            registry: RegistrySettings::default(),
            reference: ReferenceSettings::default(),
            polling: PollingSettings::default(),
        };
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("REGISTRY_URL") {
            self.registry.base_url = url;
        }
        if let Ok(url) = env::var("REFERENCE_DB_URL") {
            self.reference.snapshot_url = url;
        }
        if let Ok(secs) = env::var("PUBLISH_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.polling.timeout_secs = Some(secs);
            }
        }
    }
}
