//! Quorum settings (`r`, `rw`, `dw`, `w`)
//!
//! A quorum is either a positive replica count or one of three symbolic
//! policies. Both forms travel over the REST interface as bare JSON values,
//! so the variant is decided by the JSON type.

use serde::Serialize;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Symbolic quorum policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuorumPolicy {
    /// Every replica must answer
    All,
    /// A majority of replicas must answer
    Quorum,
    /// A single replica is enough
    One,
}

impl QuorumPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuorumPolicy::All => "all",
            QuorumPolicy::Quorum => "quorum",
            QuorumPolicy::One => "one",
        }
    }
}

impl FromStr for QuorumPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(QuorumPolicy::All),
            "quorum" => Ok(QuorumPolicy::Quorum),
            "one" => Ok(QuorumPolicy::One),
            other => Err(Error::InvalidQuorum(format!(
                "unknown token {:?} (expected all, quorum or one)",
                other
            ))),
        }
    }
}

impl fmt::Display for QuorumPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quorum value: a replica count (>= 1) or a symbolic policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum QuorumValue {
    Numeric(NonZeroU32),
    Symbolic(QuorumPolicy),
}

impl QuorumValue {
    /// Build a numeric quorum; `0` is rejected.
    pub fn from_numeric(n: u32) -> Result<Self> {
        NonZeroU32::new(n)
            .map(QuorumValue::Numeric)
            .ok_or_else(|| Error::InvalidQuorum("numeric quorum must be at least 1".into()))
    }

    /// Build a symbolic quorum from its wire token (`all`, `quorum`, `one`).
    pub fn from_symbol(token: &str) -> Result<Self> {
        token.parse().map(QuorumValue::Symbolic)
    }

    pub fn as_numeric(&self) -> Option<u32> {
        match self {
            QuorumValue::Numeric(n) => Some(n.get()),
            QuorumValue::Symbolic(_) => None,
        }
    }

    pub fn as_symbolic(&self) -> Option<QuorumPolicy> {
        match self {
            QuorumValue::Numeric(_) => None,
            QuorumValue::Symbolic(policy) => Some(*policy),
        }
    }
}

impl fmt::Display for QuorumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuorumValue::Numeric(n) => write!(f, "{}", n),
            QuorumValue::Symbolic(policy) => write!(f, "{}", policy),
        }
    }
}

/// Accepts `"3"` as well as `"quorum"`
impl FromStr for QuorumValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.parse::<u32>() {
            Ok(n) => QuorumValue::from_numeric(n),
            Err(_) => QuorumValue::from_symbol(s),
        }
    }
}

impl TryFrom<u32> for QuorumValue {
    type Error = Error;

    fn try_from(n: u32) -> Result<Self> {
        QuorumValue::from_numeric(n)
    }
}

impl TryFrom<&str> for QuorumValue {
    type Error = Error;

    fn try_from(token: &str) -> Result<Self> {
        QuorumValue::from_symbol(token)
    }
}

impl TryFrom<String> for QuorumValue {
    type Error = Error;

    fn try_from(token: String) -> Result<Self> {
        QuorumValue::from_symbol(&token)
    }
}

impl From<NonZeroU32> for QuorumValue {
    fn from(n: NonZeroU32) -> Self {
        QuorumValue::Numeric(n)
    }
}

impl From<QuorumPolicy> for QuorumValue {
    fn from(policy: QuorumPolicy) -> Self {
        QuorumValue::Symbolic(policy)
    }
}
