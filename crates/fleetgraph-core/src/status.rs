use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase reported by a resource's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum StatusPhase {
    #[default]
    Unknown,
    Pending,
    Creating,
    Updating,
    Progressing,
    Running,
    Ready,
    Terminating,
    Error,
    Failed,
}

impl StatusPhase {
    /// Lenient parse. Missing or unrecognized values map to `Unknown`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return StatusPhase::Unknown;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => StatusPhase::Pending,
            "creating" => StatusPhase::Creating,
            "updating" => StatusPhase::Updating,
            "progressing" => StatusPhase::Progressing,
            "running" => StatusPhase::Running,
            "ready" => StatusPhase::Ready,
            "terminating" => StatusPhase::Terminating,
            "error" => StatusPhase::Error,
            "failed" => StatusPhase::Failed,
            _ => StatusPhase::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusPhase::Unknown => "Unknown",
            StatusPhase::Pending => "Pending",
            StatusPhase::Creating => "Creating",
            StatusPhase::Updating => "Updating",
            StatusPhase::Progressing => "Progressing",
            StatusPhase::Running => "Running",
            StatusPhase::Ready => "Ready",
            StatusPhase::Terminating => "Terminating",
            StatusPhase::Error => "Error",
            StatusPhase::Failed => "Failed",
        }
    }

    /// Collapses transitional phases into the coarse filter buckets.
    pub fn bucket(self) -> StatusBucket {
        match self {
            StatusPhase::Unknown => StatusBucket::Unknown,
            StatusPhase::Pending
            | StatusPhase::Creating
            | StatusPhase::Updating
            | StatusPhase::Progressing
            | StatusPhase::Terminating => StatusBucket::Pending,
            StatusPhase::Running | StatusPhase::Ready => StatusBucket::Ready,
            StatusPhase::Error | StatusPhase::Failed => StatusBucket::Error,
        }
    }
}

impl fmt::Display for StatusPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse status groups offered by the status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    Unknown,
    Pending,
    Ready,
    Error,
}

impl StatusBucket {
    pub const ALL: [StatusBucket; 4] = [
        StatusBucket::Unknown,
        StatusBucket::Pending,
        StatusBucket::Ready,
        StatusBucket::Error,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusBucket::Unknown => "unknown",
            StatusBucket::Pending => "pending",
            StatusBucket::Ready => "ready",
            StatusBucket::Error => "error",
        }
    }
}
