//! Limit rules and their resolved form
//!
//! A [`LimitRule`] is one row of a policy's limit table: an enforcement
//! scope plus up to four maps from resource name to quantity string. The
//! engine's projector turns rules into [`ResolvedLimit`]s, where every
//! quantity has been parsed exactly.

use crate::quantity::Quantity;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Enforcement scope of a limit rule
///
/// Unknown scopes are carried through as [`LimitKind::Other`] so a policy
/// written against a newer schema round-trips instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LimitKind {
    Container,
    Pod,
    PersistentVolumeClaim,
    Other(String),
}

impl LimitKind {
    pub fn as_str(&self) -> &str {
        match self {
            LimitKind::Container => "Container",
            LimitKind::Pod => "Pod",
            LimitKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            LimitKind::Other(s) => s,
        }
    }
}

impl From<&str> for LimitKind {
    fn from(s: &str) -> Self {
        match s {
            "Container" => LimitKind::Container,
            "Pod" => LimitKind::Pod,
            "PersistentVolumeClaim" => LimitKind::PersistentVolumeClaim,
            other => LimitKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LimitKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LimitKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LimitKind::from(s.as_str()))
    }
}

/// One row of a policy's limit table, quantities still in string form
///
/// The four maps use `BTreeMap` so iteration order (and therefore the
/// projected output) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitRule {
    /// Enforcement scope this rule applies to
    #[serde(rename = "type")]
    pub kind: LimitKind,

    /// Default limit per resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default: BTreeMap<String, String>,

    /// Default request per resource name
    #[serde(
        rename = "defaultRequest",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub default_request: BTreeMap<String, String>,

    /// Maximum per resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max: BTreeMap<String, String>,

    /// Minimum per resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min: BTreeMap<String, String>,
}

impl LimitRule {
    /// A rule with the given scope and no entries
    pub fn new(kind: LimitKind) -> Self {
        Self {
            kind,
            default: BTreeMap::new(),
            default_request: BTreeMap::new(),
            max: BTreeMap::new(),
            min: BTreeMap::new(),
        }
    }
}

/// A limit rule with every quantity parsed exactly
///
/// This is the shape stored in enforcement objects. Two resolved limits
/// compare equal when their canonical quantity values match, regardless of
/// the textual form they were written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLimit {
    #[serde(rename = "type")]
    pub kind: LimitKind,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default: BTreeMap<String, Quantity>,

    #[serde(
        rename = "defaultRequest",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub default_request: BTreeMap<String, Quantity>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub max: BTreeMap<String, Quantity>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub min: BTreeMap<String, Quantity>,
}

impl ResolvedLimit {
    pub fn new(kind: LimitKind) -> Self {
        Self {
            kind,
            default: BTreeMap::new(),
            default_request: BTreeMap::new(),
            max: BTreeMap::new(),
            min: BTreeMap::new(),
        }
    }
}
