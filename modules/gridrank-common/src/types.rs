use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Scoping ---

/// The business entity a set of tracked keywords belongs to. The backend
/// exposes parallel listing- and project-scoped endpoints with identical
/// shapes; callers carry the distinction in this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Listing(i64),
    Project(i64),
}

impl Target {
    pub fn id(&self) -> i64 {
        match self {
            Self::Listing(id) | Self::Project(id) => *id,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing(id) => write!(f, "listing:{id}"),
            Self::Project(id) => write!(f, "project:{id}"),
        }
    }
}

// --- Jobs ---

/// Lifecycle of one backend-side ranking computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Done,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One in-flight ranking check, identified by the keyword id the backend
/// hands back at submit time. Held in memory only; discarded once its
/// terminal state has been consumed.
#[derive(Debug, Clone)]
pub struct RankJob {
    pub id: i64,
    pub target: Target,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
}

impl RankJob {
    pub fn new(id: i64, target: Target) -> Self {
        Self {
            id,
            target,
            status: JobStatus::Queued,
            submitted_at: Utc::now(),
        }
    }
}

// --- Keywords ---

/// Read-only view of one tracked keyword as the backend reports it.
/// Never mutated client-side; the whole list is replaced on re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRecord {
    pub id: i64,
    pub keyword: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// One selectable report snapshot for a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDate {
    pub id: i64,
    #[serde(default)]
    pub date: Option<String>,
}

/// A keyword the backend reports as still computing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingKeyword {
    pub keyword: String,
}

// --- Geo Types ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Sampling grid for a rank check: an odd NxN dimension and the spacing
/// between neighboring sample points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub size: u32,
    pub distance_km: f64,
}

// --- Scheduling ---

/// Check cadence requested at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Once,
    Weekly,
    Monthly,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Once => write!(f, "once"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}
