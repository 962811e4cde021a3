//! Attachment side of a node that a connection hangs off.
//!
//! Example JSON: "sourceHandle": "out"  =>  Handle::Out
//!
//! Stages take input on the left ("in") and emit on the right ("out"), so the
//! only well-formed connection runs from an `Out` handle to an `In` handle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    In,
    Out,
}

impl Handle {
    pub fn as_str(self) -> &'static str {
        match self {
            Handle::In => "in",
            Handle::Out => "out",
        }
    }

    pub(crate) fn default_source() -> Self {
        Handle::Out
    }

    pub(crate) fn default_target() -> Self {
        Handle::In
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "in" => Ok(Handle::In),
            "out" => Ok(Handle::Out),
            other => anyhow::bail!("unknown handle {:?} (expected \"in\" or \"out\")", other),
        }
    }
}
