//! Registry configuration (company defaults, salary bounds, notification
//! fallbacks, logger capacity).

pub mod types;

pub use types::*;
use once_cell::sync::Lazy;

/// Global registry configuration, read once from `ENTITY_REGISTRY_TOML`.
pub static GLOBAL_REGISTRY_CONFIG: Lazy<RegistryConfig> = Lazy::new(RegistryConfig::from_env_or_default);

/// Accessor for the global registry configuration.
#[inline]
pub fn get_registry_config() -> &'static RegistryConfig {
    &GLOBAL_REGISTRY_CONFIG
}
