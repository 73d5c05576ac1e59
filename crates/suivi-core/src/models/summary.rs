//! Record summary types and functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Summary information about a record with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Record ID
    pub id: u64,
    /// Name of the workshop the run took place in
    pub workshop: String,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Total number of dynamic steps
    pub total_steps: u32,
    /// Number of steps marked conforming
    pub conforming_steps: u32,
    /// Whether both the operator and the controller signed the record
    pub signed: bool,
}
