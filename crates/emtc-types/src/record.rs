//! Record envelope and the per-kind field contract.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationError};

/// The three survey submission shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ts_rs::TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Household demographic particulars (DPR).
    Dpr,
    /// Monthly purchase return (MPR).
    Mpr,
    /// Centre forwarding summary (FP).
    Fp,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Dpr, RecordKind::Mpr, RecordKind::Fp];

    /// Path segment and table name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Dpr => "dpr",
            RecordKind::Mpr => "mpr",
            RecordKind::Fp => "fp",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dpr" => Ok(RecordKind::Dpr),
            "mpr" => Ok(RecordKind::Mpr),
            "fp" => Ok(RecordKind::Fp),
            other => Err(ValidationError::UnknownKind(other.to_string())),
        }
    }
}

/// A persisted submission.
///
/// `is_synced` and `version` are owned by the store: creates and updates
/// clear the flag and bump the version, only the sync coordinator sets the
/// flag back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: i64,
    #[serde(flatten)]
    pub fields: T,
    /// Unix epoch seconds.
    pub created_at: u64,
    /// Unix epoch seconds.
    pub updated_at: u64,
    pub is_synced: bool,
    pub version: u64,
}

/// Field set of one record kind.
///
/// `Update` is the loosely-shaped body accepted over the wire; `normalize`
/// turns it into the canonical `Patch` the store applies.
pub trait SurveyFields:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Validate + Send + Sync + 'static
{
    const KIND: RecordKind;

    type Update: DeserializeOwned + Send;
    type Patch: Validate + fmt::Debug + Send;

    fn normalize(update: Self::Update) -> Result<Self::Patch, ValidationError>;

    /// Overwrite the fields present in `patch`; absent fields stay as they are.
    fn apply(&mut self, patch: Self::Patch);

    /// Short human label for log lines.
    fn label(&self) -> String;
}
