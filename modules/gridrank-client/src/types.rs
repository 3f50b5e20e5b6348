use gridrank_common::{
    GridPoint, GridSpec, KeywordRecord, ProcessingKeyword, ReportDate, Schedule, Target,
};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Every backend response wraps its payload in this envelope.
/// `code == 200` is the only success signal; HTTP status alone is not enough.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Scope fields shared by every request payload. Exactly one of the two ids
/// is serialized, depending on the target kind.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TargetParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    listing_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<i64>,
}

impl From<Target> for TargetParams {
    fn from(target: Target) -> Self {
        match target {
            Target::Listing(id) => Self {
                listing_id: Some(id),
                project_id: None,
            },
            Target::Project(id) => Self {
                listing_id: None,
                project_id: Some(id),
            },
        }
    }
}

/// Parameters for starting a ranking check. `coordinates` stays optional so
/// callers can validate "no coordinates resolved" before anything is sent.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RankCheckRequest {
    pub target: Target,
    pub keywords: Vec<String>,
    pub grid: GridSpec,
    #[builder(default)]
    pub coordinates: Option<GridPoint>,
    #[builder(default = "en".to_string())]
    pub language: String,
    #[builder(default)]
    pub schedule: Option<Schedule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KeywordActionPayload {
    #[serde(flatten)]
    pub target: TargetParams,
    pub keyword_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddKeywordsPayload {
    #[serde(flatten)]
    pub target: TargetParams,
    pub keywords: Vec<String>,
    pub grid_size: u32,
    pub distance: f64,
    pub lat: f64,
    pub lng: f64,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
}

/// Keyword list plus remaining check credits for the target.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordList {
    #[serde(default)]
    pub keywords: Vec<KeywordRecord>,
    #[serde(default)]
    pub credits: i64,
}

/// A single sampled grid point with the rank observed there.
/// `rank` is absent when the listing did not appear at that point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RankPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankStats {
    #[serde(default)]
    pub average_rank: Option<f64>,
    #[serde(default)]
    pub best_rank: Option<u32>,
    #[serde(default)]
    pub worst_rank: Option<u32>,
    #[serde(default)]
    pub visibility_pct: Option<f64>,
}

/// Grid points where the listing ranks worse than the report threshold.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnderperformingArea {
    pub lat: f64,
    pub lng: f64,
    pub rank: u32,
}

/// Full detail payload for one keyword. An empty `dates` list means the
/// backend has not finished computing any report yet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDetails {
    #[serde(default)]
    pub dates: Vec<ReportDate>,
    #[serde(default)]
    pub rank_points: Vec<RankPoint>,
    #[serde(default)]
    pub stats: Option<RankStats>,
    #[serde(default)]
    pub underperforming_areas: Vec<UnderperformingArea>,
}

/// Competitor detail at a single grid point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDetails {
    #[serde(default)]
    pub competitors: Vec<CompetitorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorEntry {
    pub name: String,
    pub rank: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Response to a submit: a present `keyword_id` means a job was started and
/// can be polled; an absent one means the check was already queued.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    #[serde(default)]
    pub keyword_id: Option<i64>,
}

/// Payload of the status-check endpoints. An empty `keywords` list is the
/// universal "nothing processing" sentinel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub keywords: Vec<ProcessingKeyword>,
}
