//! # Mesa Configuration
//!
//! Restaurant, device and front-of-house settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MESA_TAX_RATE_BPS=825                                              │
//! │     MESA_DEVICE_CODE=T1                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos/mesa.toml (Linux)                                    │
//! │     ~/Library/Application Support/com.mesa.pos/mesa.toml (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [restaurant]
//! name = "Mesa Bistro"
//! currency_symbol = "$"
//! currency_decimals = 2
//! default_tax_rate_bps = 825
//!
//! [device]
//! id = "550e8400-e29b-41d4-a716-446655440000"
//! code = "T1"
//!
//! [reservations]
//! default_duration_minutes = 90
//! max_party_size = 20
//!
//! [register]
//! cash_tolerance_cents = 0
//!
//! [logging]
//! filter = "info,mesa=debug"
//! ```

use std::path::PathBuf;

use mesa_core::money::{Money, TaxRate};
use mesa_core::validation::{validate_device_code, validate_name, validate_tax_rate_bps};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Restaurant
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantConfig {
    /// Printed on receipts.
    #[serde(default = "default_restaurant_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Minor-unit digits. Amounts are held in cents, so this must be 2.
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    /// Default tax rate in basis points (825 = 8.25%).
    #[serde(default = "default_tax_rate_bps")]
    pub default_tax_rate_bps: u32,
}

fn default_restaurant_name() -> String {
    "Mesa Bistro".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

fn default_tax_rate_bps() -> u32 {
    825
}

impl Default for RestaurantConfig {
    fn default() -> Self {
        RestaurantConfig {
            name: default_restaurant_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            default_tax_rate_bps: default_tax_rate_bps(),
        }
    }
}

// =============================================================================
// Device
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Unique device identifier, generated on first run if missing.
    #[serde(default = "default_device_id")]
    pub id: String,

    /// Two-character code printed in receipt numbers.
    #[serde(default = "default_device_code")]
    pub code: String,
}

fn default_device_id() -> String {
    Uuid::new_v4().to_string()
}

fn default_device_code() -> String {
    "01".to_string()
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            id: default_device_id(),
            code: default_device_code(),
        }
    }
}

// =============================================================================
// Reservations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSettings {
    /// Used when a booking does not say how long it is.
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: i64,

    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

fn default_duration_minutes() -> i64 {
    90
}

fn default_max_party_size() -> u32 {
    20
}

impl Default for ReservationSettings {
    fn default() -> Self {
        ReservationSettings {
            default_duration_minutes: default_duration_minutes(),
            max_party_size: default_max_party_size(),
        }
    }
}

// =============================================================================
// Register
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterSettings {
    /// Drawer discrepancy, in cents, still counted as balanced.
    #[serde(default)]
    pub cash_tolerance_cents: i64,
}

// =============================================================================
// Logging
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

pub(crate) fn default_log_filter() -> String {
    "info,mesa=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MesaConfig {
    #[serde(default)]
    pub restaurant: RestaurantConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub reservations: ReservationSettings,

    #[serde(default)]
    pub register: RegisterSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl MesaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (mesa.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ServiceResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ServiceResult<()> {
        let invalid = |e: mesa_core::ValidationError| ServiceError::InvalidConfig(e.to_string());

        validate_name("restaurant.name", &self.restaurant.name).map_err(invalid)?;
        validate_tax_rate_bps(self.restaurant.default_tax_rate_bps).map_err(invalid)?;
        validate_device_code(&self.device.code).map_err(invalid)?;

        if self.device.id.trim().is_empty() {
            return Err(ServiceError::InvalidConfig("device.id is required".into()));
        }
        if self.restaurant.currency_decimals != 2 {
            return Err(ServiceError::InvalidConfig(format!(
                "restaurant.currency_decimals must be 2 (amounts are stored in cents), got {}",
                self.restaurant.currency_decimals
            )));
        }
        if self.reservations.default_duration_minutes <= 0 {
            return Err(ServiceError::InvalidConfig(
                "reservations.default_duration_minutes must be positive".into(),
            ));
        }
        if self.reservations.max_party_size == 0 {
            return Err(ServiceError::InvalidConfig(
                "reservations.max_party_size must be positive".into(),
            ));
        }
        if self.register.cash_tolerance_cents < 0 {
            return Err(ServiceError::InvalidConfig(
                "register.cash_tolerance_cents cannot be negative".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `MESA_*` overrides from any key lookup. Unparseable numbers are
    /// ignored with a warning.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("MESA_RESTAURANT_NAME") {
            self.restaurant.name = name;
        }

        if let Some(bps) = var("MESA_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => {
                    debug!(bps = b, "Overriding tax rate from environment");
                    self.restaurant.default_tax_rate_bps = b;
                }
                Err(_) => warn!(value = %bps, "Ignoring invalid MESA_TAX_RATE_BPS"),
            }
        }

        if let Some(id) = var("MESA_DEVICE_ID") {
            debug!(device_id = %id, "Overriding device ID from environment");
            self.device.id = id;
        }

        if let Some(code) = var("MESA_DEVICE_CODE") {
            self.device.code = code;
        }

        if let Some(minutes) = var("MESA_DEFAULT_DURATION_MINUTES") {
            match minutes.parse::<i64>() {
                Ok(m) => self.reservations.default_duration_minutes = m,
                Err(_) => warn!(value = %minutes, "Ignoring invalid MESA_DEFAULT_DURATION_MINUTES"),
            }
        }

        if let Some(size) = var("MESA_MAX_PARTY_SIZE") {
            match size.parse::<u32>() {
                Ok(s) => self.reservations.max_party_size = s,
                Err(_) => warn!(value = %size, "Ignoring invalid MESA_MAX_PARTY_SIZE"),
            }
        }

        if let Some(cents) = var("MESA_CASH_TOLERANCE_CENTS") {
            match cents.parse::<i64>() {
                Ok(c) => self.register.cash_tolerance_cents = c,
                Err(_) => warn!(value = %cents, "Ignoring invalid MESA_CASH_TOLERANCE_CENTS"),
            }
        }

        if let Some(filter) = var("MESA_LOG") {
            self.logging.filter = filter;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mesa", "pos")
            .map(|dirs| dirs.config_dir().join("mesa.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.restaurant.default_tax_rate_bps)
    }

    pub fn cash_tolerance(&self) -> Money {
        Money::from_cents(self.register.cash_tolerance_cents)
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.restaurant.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = MesaConfig::default();
        assert!(!config.device.id.is_empty());
        assert_eq!(config.restaurant.default_tax_rate_bps, 825);
        assert_eq!(config.reservations.default_duration_minutes, 90);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = MesaConfig::default();

        config.device.code = "ABC".into();
        assert!(config.validate().is_err());
        config.device.code = "T1".into();

        config.restaurant.default_tax_rate_bps = 10_001;
        assert!(config.validate().is_err());
        config.restaurant.default_tax_rate_bps = 0;
        assert!(config.validate().is_ok());

        config.restaurant.currency_decimals = 0;
        assert!(config.validate().is_err());
        config.restaurant.currency_decimals = 3;
        assert!(config.validate().is_err());
        config.restaurant.currency_decimals = 2;

        config.reservations.default_duration_minutes = 0;
        assert!(config.validate().is_err());
        config.reservations.default_duration_minutes = 60;

        config.register.cash_tolerance_cents = -1;
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_env_overrides() {
        let env = vars(&[
            ("MESA_TAX_RATE_BPS", "1000"),
            ("MESA_DEVICE_CODE", "B2"),
            ("MESA_MAX_PARTY_SIZE", "8"),
            ("MESA_CASH_TOLERANCE_CENTS", "not-a-number"),
        ]);
        let mut config = MesaConfig::default();
        config.apply_overrides(|k| env.get(k).cloned());

        assert_eq!(config.tax_rate(), TaxRate::from_bps(1000));
        assert_eq!(config.device.code, "B2");
        assert_eq!(config.reservations.max_party_size, 8);
        assert_eq!(config.register.cash_tolerance_cents, 0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: MesaConfig = toml::from_str(
            r#"
            [restaurant]
            name = "Corner Cafe"

            [device]
            id = "till-1"
            code = "C1"
            "#,
        )
        .unwrap();

        assert_eq!(config.restaurant.name, "Corner Cafe");
        assert_eq!(config.restaurant.currency_symbol, "$");
        assert_eq!(config.reservations.max_party_size, 20);
        assert_eq!(config.logging.filter, "info,mesa=debug");
    }

    #[test]
    fn test_device_id_generated_when_missing() {
        let config: MesaConfig = toml::from_str(
            r#"
            [device]
            code = "T2"
            "#,
        )
        .unwrap();

        assert_eq!(config.device.code, "T2");
        assert!(mesa_core::validation::validate_uuid(&config.device.id).is_ok());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("mesa-test-{}.toml", Uuid::new_v4()));
        let mut config = MesaConfig::default();
        config.restaurant.name = "Saved Bistro".into();
        config.device.code = "S9".into();
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[restaurant]"));

        let loaded: MesaConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_format_currency() {
        let config = MesaConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(config.format_currency(Money::from_cents(5)), "$0.05");

        let mut euro = MesaConfig::default();
        euro.restaurant.currency_symbol = "€".into();
        assert_eq!(euro.format_currency(Money::from_cents(1500)), "€15.00");
        assert_eq!(
            euro.format_currency(Money::from_cents(1500)),
            Money::from_cents(1500).to_string().replace('$', "€")
        );
    }
}
