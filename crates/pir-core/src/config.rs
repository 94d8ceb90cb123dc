//! Protocol parameters
//!
//! A config file is either a JSON object or a list of `key = value` lines:
//!
//! ```text
//! num_bits = 64
//! n = 128
//! alpha = 3
//! beta = 1000
//! ```
//!
//! Blank lines, lines starting with `#` and lines without `=` are skipped.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{coords::cell_count, query::QueryParams, Error, Result, MAX_NUM_BITS};

/// Parameters shared by the data owner, the client and both servers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Record width in bits
    pub num_bits: u32,
    /// Database dimension; also the batch size
    pub n: usize,
    #[serde(with = "crate::decimal")]
    pub alpha: BigUint,
    #[serde(with = "crate::decimal")]
    pub beta: BigUint,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            num_bits: 32,
            n: 16,
            alpha: BigUint::from(3u32),
            beta: BigUint::from(1000u32),
        }
    }
}

impl ProtocolConfig {
    /// Load from a file, choosing the format by extension (`.json` or anything else)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        let config = if path.extension().is_some_and(|ext| ext == "json") {
            let config: Self = serde_json::from_str(&text)?;
            config.validate()?;
            config
        } else {
            Self::from_kv_str(&text)?
        };

        tracing::debug!(path = %path.display(), ?config, "Loaded protocol config");
        Ok(config)
    }

    /// Parse the `key = value` format
    pub fn from_kv_str(text: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            values.insert(key, value);
        }

        let config = Self {
            num_bits: field(&values, "num_bits")?,
            n: field(&values, "n")?,
            alpha: field(&values, "alpha")?,
            beta: field(&values, "beta")?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_bits == 0 || self.num_bits > MAX_NUM_BITS {
            return Err(Error::InvalidBitWidth(self.num_bits));
        }
        if self.n == 0 {
            return Err(Error::EmptyDatabase);
        }
        cell_count(self.n)?;
        if self.alpha.is_zero() {
            return Err(Error::InvalidParameter {
                name: "alpha",
                reason: "must be positive".to_string(),
            });
        }
        if self.beta.is_zero() {
            return Err(Error::InvalidParameter {
                name: "beta",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn query_params(&self) -> Result<QueryParams> {
        QueryParams::new(self.alpha.clone(), self.beta.clone())
    }
}

fn field<T>(values: &HashMap<&str, &str>, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = values
        .get(key)
        .ok_or_else(|| Error::Config(format!("missing key `{key}`")))?;
    raw.parse()
        .map_err(|e| Error::Config(format!("invalid value `{raw}` for `{key}`: {e}")))
}
