//! Configuration file discovery
//!
//! Looks for `treew.{toml,yaml,yml,json}` in the global (`~/.treew/`) and
//! project (`./.treew/`) directories. Project files take precedence.

use crate::defaults::CONFIG_DIR_NAME;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const FILE_NAMES: [&str; 4] = ["treew.toml", "treew.yaml", "treew.yml", "treew.json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Full path to the configuration file
    pub path: PathBuf,
    /// Format detected from the extension
    pub format: ConfigFormat,
    /// Where the file was found
    pub scope: ConfigScope,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration scope indicating where the file was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    /// `~/.treew/`
    Global,
    /// `./.treew/`
    Project,
}

/// File discovery service for finding configuration files
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discover in the standard locations, resolved at discovery time
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover in explicit directories instead of the standard locations
    pub fn with_dirs(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            global_dir,
        }
    }

    /// Discover all configuration files, lowest precedence first so that
    /// figment merging lets later files override earlier ones.
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let project_dir = self.project_dir.clone().or_else(Self::resolve_project_dir);
        let global_dir = self.global_dir.clone().or_else(Self::resolve_global_dir);

        let mut files = Vec::new();
        if let Some(ref dir) = global_dir {
            files.extend(self.search_directory(dir, ConfigScope::Global));
        }
        if let Some(ref dir) = project_dir {
            files.extend(self.search_directory(dir, ConfigScope::Project));
        }
        files.sort_by_key(|f| f.scope);

        debug!("Discovered {} configuration files", files.len());
        files
    }

    fn search_directory(&self, dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        if !dir.is_dir() {
            warn!("Path exists but is not a directory: {}", dir.display());
            return Vec::new();
        }

        FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .filter_map(|candidate| {
                let format = ConfigFormat::from_extension(candidate.extension()?.to_str()?)?;
                trace!("Found config: {} ({:?})", candidate.display(), format);
                Some(ConfigFile {
                    path: candidate,
                    format,
                    scope,
                })
            })
            .collect()
    }

    fn resolve_project_dir() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(CONFIG_DIR_NAME))
    }

    fn resolve_global_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME))
    }
}
