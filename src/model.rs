use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One user-defined function discovered by the inventory pass.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub path: PathBuf,
}

/// Classification buckets for every call site inside one function body.
/// Each call lands in exactly one bucket.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallBuckets {
    pub system: Vec<String>,
    pub user_defined: Vec<UserCall>,
    pub npm: Vec<String>,
    pub other: Vec<String>,
}

impl CallBuckets {
    pub fn is_empty(&self) -> bool {
        self.system.is_empty()
            && self.user_defined.is_empty()
            && self.npm.is_empty()
            && self.other.is_empty()
    }

    /// Total number of classified call sites, nested expansions excluded.
    pub fn len(&self) -> usize {
        self.system.len() + self.user_defined.len() + self.npm.len() + self.other.len()
    }

    /// Concatenate another body's buckets onto this one.
    pub fn extend(&mut self, other: CallBuckets) {
        self.system.extend(other.system);
        self.user_defined.extend(other.user_defined);
        self.npm.extend(other.npm);
        self.other.extend(other.other);
    }
}

/// A call resolved to a project file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserCall {
    pub name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Recursively resolved calls of the target, present only for
    /// cross-module resolutions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls: Option<CallBuckets>,
}

/// One resolved function in the aggregate artifact.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEntry {
    pub function_name: String,
    pub function_id: String,
    pub calls: CallBuckets,
}

/// The aggregate artifact: absolute file path -> resolved functions.
/// Serializes exactly as the emitted `result.json`.
pub type AnalysisResult = BTreeMap<String, Vec<FunctionEntry>>;

/// One ` --> ` line of a diagram.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
}
