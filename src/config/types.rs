use std::env;

use anyhow::Context;
use log::warn;
use serde::Deserialize;

/// Environment variable holding the TOML blob read by
/// [`RegistryConfig::from_env_or_default`].
pub const CONFIG_ENV_VAR: &str = "ENTITY_REGISTRY_TOML";

pub const DEFAULT_COMPANY_NAME: &str = "TechCorp";
pub const DEFAULT_MIN_SALARY: f64 = 20_000.0;
pub const DEFAULT_MAX_SALARY: f64 = 500_000.0;
pub const DEFAULT_EMAIL_FROM: &str = "noreply@example.com";
pub const DEFAULT_EMAIL_TO: &str = "user@example.com";
pub const DEFAULT_LOG_CAPACITY: usize = 256;

/// Employee registry settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeesConfig {
    /// Initial shared company name.
    pub company_name: Option<String>,
    /// Lower bound used by `is_valid_salary`.
    pub min_salary: Option<f64>,
    /// Upper bound used by `is_valid_salary`.
    pub max_salary: Option<f64>,
}

/// Fallback addresses for email notifications created without them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationsConfig {
    pub default_from: Option<String>,
    pub default_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggerConfig {
    /// How many recent lines the shared logger keeps.
    pub capacity: Option<usize>,
}

/// Registry configuration, shaped like:
///
/// [employees]
/// company_name = "TechCorp"
/// min_salary   = 20000
/// max_salary   = 500000
///
/// [notifications]
/// default_from = "noreply@example.com"
/// default_to   = "user@example.com"
///
/// [logger]
/// capacity = 256
///
/// Every table and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub employees: EmployeesConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl RegistryConfig {
    /// Parse a TOML blob.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: RegistryConfig = toml::from_str(raw).context("failed to parse registry config TOML")?;

        let (min, max) = cfg.salary_bounds();
        anyhow::ensure!(min <= max, "employees salary bounds are empty: min {} exceeds max {}", min, max);

        Ok(cfg)
    }

    /// Load from the `ENTITY_REGISTRY_TOML` env var, or return defaults when
    /// it is unset, blank, or fails to parse.
    pub fn from_env_or_default() -> Self {
        match env::var(CONFIG_ENV_VAR) {
            Ok(raw) if !raw.trim().is_empty() => match Self::from_toml_str(&raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Ignoring {}: {:#}", CONFIG_ENV_VAR, err);
                    RegistryConfig::default()
                }
            },
            _ => RegistryConfig::default(),
        }
    }

    #[inline]
    pub fn company_name(&self) -> &str {
        self.employees.company_name.as_deref().unwrap_or(DEFAULT_COMPANY_NAME)
    }

    /// Inclusive (min, max) salary bounds.
    #[inline]
    pub fn salary_bounds(&self) -> (f64, f64) {
        (
            self.employees.min_salary.unwrap_or(DEFAULT_MIN_SALARY),
            self.employees.max_salary.unwrap_or(DEFAULT_MAX_SALARY),
        )
    }

    #[inline]
    pub fn email_from(&self) -> &str {
        self.notifications.default_from.as_deref().unwrap_or(DEFAULT_EMAIL_FROM)
    }

    #[inline]
    pub fn email_to(&self) -> &str {
        self.notifications.default_to.as_deref().unwrap_or(DEFAULT_EMAIL_TO)
    }

    #[inline]
    pub fn log_capacity(&self) -> usize {
        match self.logger.capacity {
            Some(n) if n > 0 => n,
            _ => DEFAULT_LOG_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blob_yields_defaults() {
        let cfg = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.company_name(), DEFAULT_COMPANY_NAME);
        assert_eq!(cfg.salary_bounds(), (DEFAULT_MIN_SALARY, DEFAULT_MAX_SALARY));
        assert_eq!(cfg.email_from(), DEFAULT_EMAIL_FROM);
        assert_eq!(cfg.log_capacity(), DEFAULT_LOG_CAPACITY);
    }

    #[test]
    fn partial_tables_override_only_given_fields() {
        let raw = r#"
            [employees]
            company_name = "InnovateTech Solutions"
            max_salary = 250000.0

            [logger]
            capacity = 8
        "#;
        let cfg = RegistryConfig::from_toml_str(raw).unwrap();
        assert_eq!(cfg.company_name(), "InnovateTech Solutions");
        assert_eq!(cfg.salary_bounds(), (DEFAULT_MIN_SALARY, 250_000.0));
        assert_eq!(cfg.email_to(), DEFAULT_EMAIL_TO);
        assert_eq!(cfg.log_capacity(), 8);
    }

    #[test]
    fn inverted_salary_bounds_are_rejected() {
        let raw = "[employees]\nmin_salary = 10.0\nmax_salary = 5.0\n";
        assert!(RegistryConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn min_above_default_max_is_rejected() {
        let raw = "[employees]\nmin_salary = 600000.0\n";
        assert!(RegistryConfig::from_toml_str(raw).is_err());

        let raw = "[employees]\nmax_salary = 1000.0\n";
        assert!(RegistryConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn zero_capacity_falls_back_to_default() {
        let cfg = RegistryConfig::from_toml_str("[logger]\ncapacity = 0\n").unwrap();
        assert_eq!(cfg.log_capacity(), DEFAULT_LOG_CAPACITY);
    }
}
