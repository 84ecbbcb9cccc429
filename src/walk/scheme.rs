//! Metapath schemes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed node-type cycle each walk step follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Conference → author → conference.
    Cac,
    /// Conference → paper → author → paper → conference.
    Csasc,
}

impl Scheme {
    /// Labels appended per walk step.
    pub fn hops_per_step(self) -> usize {
        match self {
            Scheme::Cac => 2,
            Scheme::Csasc => 4,
        }
    }

    /// Tokens per output line: the seed label plus the hops of every step.
    pub fn tokens_per_walk(self, walklength: usize) -> usize {
        self.hops_per_step() * walklength + 1
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Cac => write!(f, "cac"),
            Scheme::Csasc => write!(f, "csasc"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown scheme {0:?}; expected \"cac\" or \"csasc\"")]
pub struct SchemeParseError(String);

impl FromStr for Scheme {
    type Err = SchemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cac" => Ok(Scheme::Cac),
            "csasc" => Ok(Scheme::Csasc),
            other => Err(SchemeParseError(other.to_string())),
        }
    }
}
