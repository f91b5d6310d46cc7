use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{ClientError, Result};

/// default price ceiling of the simulator, Rp 1 quadrillion
pub const MAX_PROPERTY_PRICE: i64 = 1_000_000_000_000_000;

fn default_max_property_price() -> Money {
    Money::from_major(MAX_PROPERTY_PRICE)
}

/// client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub storage_keys: StorageKeys,
    #[serde(default)]
    pub session: SessionConfig,
}

/// bounds and defaults of the kpr simulator form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_max_property_price")]
    pub max_property_price: Money,
    pub min_term_years: u32,
    pub max_term_years: u32,
    pub max_rate_percent: Decimal,
    pub default_term_years: u32,
    pub default_rate_percent: Decimal,
}

/// storage keys for persisted client state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageKeys {
    pub auth: String,
    pub favorites: String,
}

/// login throttling and qr login settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub max_login_attempts: u32,
    pub lockout_secs: i64,
    /// key sent along with scanned qr codes
    pub app_key: Option<String>,
}

impl SimulatorConfig {
    /// 1-30 year tenor, rates up to 20%
    pub fn standard() -> Self {
        Self {
            max_property_price: default_max_property_price(),
            min_term_years: 1,
            max_term_years: 30,
            max_rate_percent: dec!(20),
            default_term_years: 10,
            default_rate_percent: dec!(5),
        }
    }

    /// tenor picker variant that reaches 80 years
    pub fn extended_tenor() -> Self {
        Self {
            max_term_years: 80,
            ..Self::standard()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_property_price.is_positive() {
            return Err(ClientError::InvalidConfiguration {
                message: format!("max property price {} must be positive", self.max_property_price),
            });
        }
        if self.min_term_years == 0 || self.min_term_years > self.max_term_years {
            return Err(ClientError::InvalidConfiguration {
                message: format!(
                    "term bounds [{}, {}] are not a valid range",
                    self.min_term_years, self.max_term_years
                ),
            });
        }
        if self.max_rate_percent < Decimal::ZERO {
            return Err(ClientError::InvalidConfiguration {
                message: format!("max rate {} is negative", self.max_rate_percent),
            });
        }
        if !(self.min_term_years..=self.max_term_years).contains(&self.default_term_years) {
            return Err(ClientError::InvalidConfiguration {
                message: format!("default term {} is out of bounds", self.default_term_years),
            });
        }
        if self.default_rate_percent < Decimal::ZERO
            || self.default_rate_percent > self.max_rate_percent
        {
            return Err(ClientError::InvalidConfiguration {
                message: format!("default rate {} is out of bounds", self.default_rate_percent),
            });
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            auth: "auth-storage".to_string(),
            favorites: "favorites-storage".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn lockout(&self) -> Duration {
        Duration::seconds(self.lockout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: 5,
            lockout_secs: 30,
            app_key: None,
        }
    }
}

impl ClientConfig {
    /// parse a json document; missing sections keep their defaults
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: ClientConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.simulator.validate()?;
        if self.storage_keys.auth.is_empty() || self.storage_keys.favorites.is_empty() {
            return Err(ClientError::InvalidConfiguration {
                message: "storage keys must not be empty".to_string(),
            });
        }
        if self.storage_keys.auth == self.storage_keys.favorites {
            return Err(ClientError::InvalidConfiguration {
                message: "auth and favorites must use distinct storage keys".to_string(),
            });
        }
        if self.session.max_login_attempts == 0 || self.session.lockout_secs < 0 {
            return Err(ClientError::InvalidConfiguration {
                message: "login throttling needs at least one attempt and a non-negative lockout"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.simulator.max_term_years, 30);
        assert_eq!(config.simulator.default_rate_percent, dec!(5));
        assert_eq!(config.storage_keys.auth, "auth-storage");
        assert_eq!(config.session.lockout(), Duration::seconds(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_overrides_sections() {
        let config = ClientConfig::from_json(
            r#"{
                "simulator": {
                    "min_term_years": 1,
                    "max_term_years": 80,
                    "max_rate_percent": "20",
                    "default_term_years": 10,
                    "default_rate_percent": "5"
                },
                "session": { "max_login_attempts": 3, "lockout_secs": 60, "app_key": "mobile" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.simulator.max_term_years, 80);
        assert_eq!(config.session.max_login_attempts, 3);
        assert_eq!(config.session.app_key.as_deref(), Some("mobile"));
        assert_eq!(config.storage_keys.favorites, "favorites-storage");
        assert_eq!(
            config.simulator.max_property_price,
            Money::from_major(MAX_PROPERTY_PRICE)
        );
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let mut simulator = SimulatorConfig::extended_tenor();
        simulator.default_term_years = 90;
        assert!(matches!(
            simulator.validate(),
            Err(ClientError::InvalidConfiguration { .. })
        ));

        let mut simulator = SimulatorConfig::standard();
        simulator.max_property_price = Money::ZERO;
        assert!(simulator.validate().is_err());

        let mut config = ClientConfig::default();
        config.storage_keys.favorites = config.storage_keys.auth.clone();
        assert!(config.validate().is_err());
    }
}
