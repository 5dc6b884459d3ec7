//! Configuration provider using Figment

use crate::defaults::ENV_PREFIX;
use crate::discovery::{ConfigFile, ConfigFormat, FileDiscovery};
use crate::types::ReorderSettings;
use crate::ConfigResult;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, info, trace};

/// Loads [`ReorderSettings`] from every configuration source.
///
/// No caching is performed; every call reads the sources again.
#[derive(Debug, Clone, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    /// Provider over the standard discovery locations
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider over a custom discovery
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the settings
    pub fn load(&self) -> ConfigResult<ReorderSettings> {
        let settings: ReorderSettings = self.build_figment().extract()?;
        settings.validate()?;

        info!(
            baseline = settings.baseline,
            gap = settings.gap,
            min_gap = settings.min_gap,
            persist_timeout_ms = settings.persist_timeout_ms,
            concurrency = ?settings.concurrency,
            "Loaded reorder settings"
        );
        Ok(settings)
    }

    /// Sources in precedence order, later ones override earlier ones:
    /// 1. Defaults
    /// 2. Discovered files (global, then project)
    /// 3. `TREEW_` environment variables
    fn build_figment(&self) -> Figment {
        debug!("Building figment configuration with precedence order");

        let mut figment = Figment::from(Serialized::defaults(ReorderSettings::default()));

        for config_file in self.discovery.discover_all() {
            trace!(
                "Loading config file: {} ({:?})",
                config_file.path.display(),
                config_file.format
            );
            figment = figment.merge(Self::file_provider(&config_file));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    fn file_provider(config_file: &ConfigFile) -> Figment {
        let path = &config_file.path;
        match config_file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        }
    }
}

/// Load settings from the standard locations
pub fn load_settings() -> ConfigResult<ReorderSettings> {
    ConfigProvider::new().load()
}
