/// Dashboard summary figures
///
/// Project totals come from exact counts (no rows transferred); hours are summed locally
/// from the `hours` column of every time entry.

use crate::db::{DataClient, DbResult, Filters, Query};
use crate::project::storage::PROJECTS;
use crate::records::{total_hours, TimeEntry, TIME_ENTRIES};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_projects: u64,
    pub active_projects: u64,
    pub total_hours: f64,
    /// Not tracked yet, always 0
    pub properties: u64,
}

/// Gather the three figures concurrently
pub async fn collect_metrics(client: &DataClient) -> DbResult<DashboardMetrics> {
    let all = Filters::new();
    let active = Filters::new().eq("status", "active");
    let hours_query = Query::new("hours");

    let (total_projects, active_projects, entries) = tokio::try_join!(
        client.count(PROJECTS, &all),
        client.count(PROJECTS, &active),
        client.select_query::<TimeEntry>(TIME_ENTRIES, &hours_query),
    )?;

    Ok(DashboardMetrics {
        total_projects,
        active_projects,
        total_hours: total_hours(&entries),
        properties: 0,
    })
}
