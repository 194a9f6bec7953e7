use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const ETHER_DECIMALS: usize = 18;

/// 10^18 wei.
pub fn wei_per_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u64)
}

/// An amount of ETH, held in wei.
///
/// Displays the way the marketplace UI always has: shortest decimal form with at least one
/// fractional digit (`1.0`, `0.5`, `0.001`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EtherAmount(U256);

impl EtherAmount {
    /// Smallest budget the contract accepts for a job: 0.001 ETH.
    pub fn min_job_budget() -> Self {
        Self(U256::from(1_000_000_000_000_000u64))
    }

    pub fn from_wei(wei: U256) -> Self {
        Self(wei)
    }

    pub fn zero() -> Self {
        Self(U256::ZERO)
    }

    pub fn wei(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Parses a decimal ETH string such as `"0.25"` or `"3"`.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("Amount is empty".to_string());
        }

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("Invalid amount: {trimmed}"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(format!("Invalid amount: {trimmed}"));
        }
        if fraction.len() > ETHER_DECIMALS {
            return Err(format!("Too many decimal places: {trimmed}"));
        }

        let whole = if whole.is_empty() { "0" } else { whole };
        let whole = U256::from_str_radix(whole, 10)
            .map_err(|err| format!("Invalid amount {trimmed}: {err}"))?;
        let padded = format!("{fraction:0<width$}", width = ETHER_DECIMALS);
        let fraction = U256::from_str_radix(&padded, 10)
            .map_err(|err| format!("Invalid amount {trimmed}: {err}"))?;

        whole
            .checked_mul(wei_per_ether())
            .and_then(|w| w.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| format!("Amount out of range: {trimmed}"))
    }
}

impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / wei_per_ether();
        let remainder = self.0 % wei_per_ether();
        let fraction = format!("{:0>width$}", remainder.to_string(), width = ETHER_DECIMALS);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            write!(f, "{whole}.0")
        } else {
            write!(f, "{whole}.{fraction}")
        }
    }
}

impl FromStr for EtherAmount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EtherAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EtherAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
