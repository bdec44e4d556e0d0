use serde::Deserialize;

use crate::error::SnapshotError;

/// Visitor counts as produced by the telemetry source.
///
/// `history` is ordered oldest to newest. Live events may omit it, in which
/// case it deserializes as empty and the rolling buffer falls back to
/// appending `total`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VisitorSnapshot {
    pub total: u64,
    #[serde(default)]
    pub history: Vec<u64>,
}

impl VisitorSnapshot {
    /// The zero-filled snapshot used when the initial payload is unusable.
    pub fn zeroed(capacity: usize) -> Self {
        Self {
            total: 0,
            history: vec![0; capacity],
        }
    }

    pub fn is_active(&self) -> bool {
        self.total > 0
    }
}

/// Decode one snapshot-shaped JSON payload.
pub fn parse(payload: &str) -> Result<VisitorSnapshot, SnapshotError> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(SnapshotError::Empty);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Decode the initial payload handed over by the host.
///
/// Absent or malformed payloads are logged and replaced by
/// [`VisitorSnapshot::zeroed`].
pub fn parse_initial(payload: Option<&str>, capacity: usize) -> VisitorSnapshot {
    let Some(payload) = payload else {
        tracing::debug!("no initial snapshot, starting from zero");
        return VisitorSnapshot::zeroed(capacity);
    };
    match parse(payload) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("initial snapshot rejected: {e}");
            VisitorSnapshot::zeroed(capacity)
        }
    }
}
