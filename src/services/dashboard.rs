//! Dashboard page service: metrics, threshold alerts, recent activity.

use crate::domain::inspect::ServerMetrics;
use crate::dto::dashboard::{DashboardPageData, SystemAlert};
use crate::inspector::{DatabaseInspector, InspectorError};
use crate::models::auth::{ACCESS_ROLE, AuthenticatedUser};
use crate::models::config::MonitoringConfig;
use crate::repository::ActivityReader;
use crate::services::{ServiceResult, ensure_role};

/// Loads everything the dashboard template renders.
///
/// A backend that cannot report metrics degrades to an empty metric set
/// instead of failing the page.
pub async fn load_dashboard<R>(
    repo: &R,
    inspector: &dyn DatabaseInspector,
    monitoring: &MonitoringConfig,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardPageData>
where
    R: ActivityReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let metrics = match inspector.server_metrics().await {
        Ok(metrics) => metrics,
        Err(InspectorError::Unsupported(backend)) => {
            log::debug!("Backend {backend} reports no server metrics");
            ServerMetrics::default()
        }
        Err(e) => {
            log::warn!("Failed to collect server metrics: {e}");
            ServerMetrics::default()
        }
    };

    let alerts = build_alerts(&metrics, monitoring, inspector.is_live());

    let recent_activity = repo.list_activity(10).map_err(|err| {
        log::error!("Failed to load recent activity: {err}");
        err
    })?;

    Ok(DashboardPageData {
        metrics,
        alerts,
        recent_activity,
        backend_name: inspector.backend_name(),
        live: inspector.is_live(),
    })
}

fn build_alerts(
    metrics: &ServerMetrics,
    monitoring: &MonitoringConfig,
    live: bool,
) -> Vec<SystemAlert> {
    let mut alerts = Vec::new();

    if !live {
        alerts.push(SystemAlert {
            level: "info",
            title: "Demo mode".to_string(),
            message: "No live database backend is configured; showing sample data.".to_string(),
        });
    }

    if let Some(cpu) = metrics.cpu_usage {
        if cpu > monitoring.cpu_threshold {
            alerts.push(SystemAlert {
                level: "warning",
                title: "High CPU usage".to_string(),
                message: format!("CPU at {cpu:.0}%. Check the running queries."),
            });
        } else {
            alerts.push(SystemAlert {
                level: "success",
                title: "CPU normal".to_string(),
                message: format!("CPU at {cpu:.0}%."),
            });
        }
    }

    if let Some(memory) = metrics.memory_usage {
        if memory > monitoring.memory_threshold {
            alerts.push(SystemAlert {
                level: "warning",
                title: "High memory usage".to_string(),
                message: format!("Memory at {memory:.0}%. Check caches and connections."),
            });
        } else {
            alerts.push(SystemAlert {
                level: "success",
                title: "Memory OK".to_string(),
                message: format!("Memory at {memory:.0}%."),
            });
        }
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitoring() -> MonitoringConfig {
        MonitoringConfig::default()
    }

    #[test]
    fn demo_mode_gets_an_info_alert() {
        let alerts = build_alerts(&ServerMetrics::default(), &monitoring(), false);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, "info");
    }

    #[test]
    fn thresholds_drive_alert_levels() {
        let metrics = ServerMetrics {
            cpu_usage: Some(95.0),
            memory_usage: Some(40.0),
            ..Default::default()
        };
        let alerts = build_alerts(&metrics, &monitoring(), true);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].level, "warning");
        assert_eq!(alerts[1].level, "success");
    }

    #[test]
    fn missing_host_metrics_produce_no_alerts() {
        let alerts = build_alerts(&ServerMetrics::default(), &monitoring(), true);
        assert!(alerts.is_empty());
    }
}
