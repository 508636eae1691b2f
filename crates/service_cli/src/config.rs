//! CLI configuration file handling.

use serde::Deserialize;

use crate::Result;

/// Market and instrument parameters for the `price` command.
///
/// Loaded from a TOML file when `--config` is given; every field has a
/// demo default so the command also runs standalone.
///
/// ```toml
/// rate = 0.02
/// hazard = 0.01
/// volatility = 0.3
/// correlation = 0.25
/// recovery = 0.4
/// spread = 0.01
/// coupon = 0.05
/// years = 5
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    /// Flat zero rate of the discount curve.
    pub rate: f64,
    /// Flat hazard rate of the reference entity.
    pub hazard: f64,
    /// Flat volatility of the systemic credit factor.
    pub volatility: f64,
    /// Asset correlation of the reference entity (loading = √correlation).
    pub correlation: f64,
    /// Recovery rate of the reference entity.
    pub recovery: f64,
    /// Annual premium of the linked CDS.
    pub spread: f64,
    /// Annual coupon of the note.
    pub coupon: f64,
    /// Note tenor in years.
    pub years: u32,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            rate: 0.02,
            hazard: 0.01,
            volatility: 0.3,
            correlation: 0.25,
            recovery: 0.4,
            spread: 0.01,
            coupon: 0.05,
            years: 5,
        }
    }
}

impl PriceConfig {
    /// Loads a configuration file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
