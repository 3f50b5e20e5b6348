use chrono::NaiveDate;

use gridrank_client::{KeywordDetails, KeywordList, RankApiClient, Result};
use gridrank_common::{ReportDate, Target};

/// The published view of a finished check: the report scoped to the freshest
/// date, plus the wholesale-refreshed keyword list.
#[derive(Debug, Clone)]
pub struct MaterializedReport {
    pub keyword_id: i64,
    pub selected_date: Option<ReportDate>,
    pub details: KeywordDetails,
    pub keywords: KeywordList,
}

/// Pick the most recent report date: parse each date field, sort descending,
/// take the first with a non-empty date. Undated or unparseable entries never
/// win; if nothing is dated, nothing is selected.
pub fn select_latest_date(dates: &[ReportDate]) -> Option<&ReportDate> {
    dates
        .iter()
        .filter_map(|entry| {
            let raw = entry.date.as_deref()?;
            parse_report_date(raw).map(|parsed| (parsed, entry))
        })
        .max_by_key(|(parsed, _)| *parsed)
        .map(|(_, entry)| entry)
}

fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    // Backend sends plain dates; tolerate a trailing time component.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

/// Publish a completed job: scope the detail payload to the freshest date,
/// refresh the keyword list wholesale, and hand both back to the caller.
pub async fn materialize(
    client: &RankApiClient,
    target: Target,
    keyword_id: i64,
    details: KeywordDetails,
) -> Result<MaterializedReport> {
    let selected_date = select_latest_date(&details.dates).cloned();

    let details = match &selected_date {
        Some(date) => client.get_keyword_details(keyword_id, Some(date.id)).await?,
        None => details,
    };

    let keywords = client.get_keywords(target).await?;
    tracing::info!(
        keyword_id,
        date_id = ?selected_date.as_ref().map(|d| d.id),
        keywords = keywords.keywords.len(),
        "Materialized ranking report"
    );

    Ok(MaterializedReport {
        keyword_id,
        selected_date,
        details,
        keywords,
    })
}
