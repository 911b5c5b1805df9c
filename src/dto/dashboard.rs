use serde::Serialize;

use crate::domain::activity::ActivityEntry;
use crate::domain::inspect::ServerMetrics;

/// One entry in the dashboard status panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SystemAlert {
    /// Bootstrap-style alert level: "success", "info", "warning" or "danger".
    pub level: &'static str,
    pub title: String,
    pub message: String,
}

/// Data required to render the dashboard template.
pub struct DashboardPageData {
    pub metrics: ServerMetrics,
    pub alerts: Vec<SystemAlert>,
    /// Most recent audit entries, newest first.
    pub recent_activity: Vec<ActivityEntry>,
    pub backend_name: &'static str,
    pub live: bool,
}
