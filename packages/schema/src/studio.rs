use serde::{Deserialize, Serialize};

/// Persistence key of the studio config document
pub const STUDIO_CONFIG_KEY: &str = "store_studio_config";

/// Per-tenant switch for the composed storefront
///
/// When `enabled` is false the caller serves its hardcoded default page and
/// never consults the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    pub enabled: bool,

    /// Product ids in merchant-chosen order
    pub product_display_order: Vec<String>,
}

impl StudioConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            product_display_order: Vec::new(),
        }
    }
}
