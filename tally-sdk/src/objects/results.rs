//! Read-side objects returned by `GET /resultados`.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The running aggregates of one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(rename = "ID")]
    pub id: CompactString,
    #[serde(rename = "ResultadoSoma")]
    pub sum_result: f64,
    #[serde(rename = "ResultadoSubtracao")]
    pub diff_result: f64,
}

/// Every key's aggregates at the moment the snapshot was taken.
///
/// Each entry is internally consistent; entries for different keys may have
/// been read at slightly different instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResponse {
    /// Unix timestamp (seconds) of the snapshot.
    pub taken_at: i64,
    /// Results ordered by `ID`.
    pub results: Vec<CalculationResult>,
}
