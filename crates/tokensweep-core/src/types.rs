use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// PrimeStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimeStatus {
    #[serde(rename = "PENDING_TO_ACTIVATE")]
    PendingToActivate,
    #[serde(rename = "PENDING_TO_COLLECT")]
    PendingToCollect,
    #[serde(rename = "EXPIRED")]
    Expired,
    #[serde(rename = "DEACTIVATED")]
    Deactivated,
    #[serde(rename = "ACTIVATED")]
    Activated,
    #[default]
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl PrimeStatus {
    pub fn all() -> &'static [PrimeStatus] {
        &[
            PrimeStatus::PendingToActivate,
            PrimeStatus::PendingToCollect,
            PrimeStatus::Expired,
            PrimeStatus::Deactivated,
            PrimeStatus::Activated,
            PrimeStatus::NotApplicable,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimeStatus::PendingToActivate => "PENDING_TO_ACTIVATE",
            PrimeStatus::PendingToCollect => "PENDING_TO_COLLECT",
            PrimeStatus::Expired => "EXPIRED",
            PrimeStatus::Deactivated => "DEACTIVATED",
            PrimeStatus::Activated => "ACTIVATED",
            PrimeStatus::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for PrimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PrimeStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimeStatus::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CoreError::InvalidPrimeStatus(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Brand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Brand {
    #[default]
    Ed,
    Gv,
    Op,
    Tl,
}

impl Brand {
    pub fn all() -> &'static [Brand] {
        &[Brand::Ed, Brand::Gv, Brand::Op, Brand::Tl]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Brand::Ed => "ED",
            Brand::Gv => "GV",
            Brand::Op => "OP",
            Brand::Tl => "TL",
        }
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Brand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ED" => Ok(Brand::Ed),
            "GV" => Ok(Brand::Gv),
            "OP" => Ok(Brand::Op),
            "TL" => Ok(Brand::Tl),
            _ => Err(CoreError::InvalidBrand(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Outcome label assigned to one processed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "No Membership Found")]
    NoMembershipFound,
    #[serde(rename = "ALREADY DISABLED")]
    AlreadyDisabled,
    #[serde(rename = "Partial Success")]
    PartialSuccess,
    #[serde(rename = "DISABLED")]
    Disabled,
    #[serde(rename = "Error Disabling Payment Instrument Tokens")]
    ErrorDisabling,
    #[serde(rename = "Review Logs")]
    ReviewLogs,
    #[serde(rename = "Processing Error")]
    ProcessingError,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NoMembershipFound => "No Membership Found",
            TaskStatus::AlreadyDisabled => "ALREADY DISABLED",
            TaskStatus::PartialSuccess => "Partial Success",
            TaskStatus::Disabled => "DISABLED",
            TaskStatus::ErrorDisabling => "Error Disabling Payment Instrument Tokens",
            TaskStatus::ReviewLogs => "Review Logs",
            TaskStatus::ProcessingError => "Processing Error",
        }
    }

    /// True for outcomes that need the operator's attention.
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            TaskStatus::ErrorDisabling
                | TaskStatus::PartialSuccess
                | TaskStatus::ReviewLogs
                | TaskStatus::ProcessingError
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RowData
// ---------------------------------------------------------------------------

/// The operator's original row, in column order.
///
/// Serialized as a JSON object; key order is preserved in both directions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowData(Vec<(String, String)>);

impl RowData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for RowData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut row = RowData::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for RowData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RowData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = RowData;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to cell value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RowData, A::Error> {
                let mut row = RowData::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    row.insert(k, v);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

// ---------------------------------------------------------------------------
// ProcessRequest / ProcessedItem
// ---------------------------------------------------------------------------

/// One row of operator input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub email: String,
    #[serde(default)]
    pub prime_status: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub original_row_data: RowData,
}

impl ProcessRequest {
    pub fn new(
        email: impl Into<String>,
        prime_status: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            prime_status: prime_status.into(),
            brand: brand.into(),
            original_row_data: RowData::new(),
        }
    }

    pub fn with_row_data(mut self, row: RowData) -> Self {
        self.original_row_data = row;
        self
    }
}

/// Result row: the request plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedItem {
    #[serde(flatten)]
    pub request: ProcessRequest,
    pub task_status: TaskStatus,
    pub processed_message: String,
}
