use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storefront_common::{CommonResult, FileSystem};
use storefront_compiler_html::CompileOptions;
use storefront_workspace::ConflictPolicy;

pub const DEFAULT_CONFIG_NAME: &str = "storefront.config.json";

/// Storefront configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Root of the file-backed layout store
    pub store_dir: String,

    /// Tenant used when a command is not given one
    pub default_tenant: String,

    pub conflict_policy: ConflictPolicy,

    /// HTML output options
    pub html: CompileOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: "store".to_string(),
            default_tenant: "default".to_string(),
            conflict_policy: ConflictPolicy::default(),
            html: CompileOptions::default(),
        }
    }
}

impl Config {
    /// Load config from a directory; a missing file yields the defaults
    pub fn load(fs: &dyn FileSystem, cwd: &Path) -> CommonResult<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if fs.exists(&config_path) {
            let content = fs.read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config
                .html
                .validate()
                .map_err(|err| format!("{}: {err}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Absolute path to the store root
    pub fn store_root(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }

    pub fn tenant<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_tenant)
    }
}
