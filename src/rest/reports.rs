use crate::error::CoinbaseError;
use crate::model::{ApiObject, Notification, ObjectKind, Report};
use crate::rest::endpoints::{V2, path};
use crate::rest::params::{ListParams, ReportRequest, Validate};
use crate::rest::CoinbaseClient;

impl CoinbaseClient {
    // ========== Reports ==========

    pub async fn get_reports(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::REPORTS], params, ObjectKind::Report, None)
            .await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<Report, CoinbaseError> {
        self.get_as(&[V2, path::REPORTS, report_id], None).await
    }

    /// Request a CSV report. The file is produced asynchronously and mailed
    /// or posted to the callback URL.
    pub async fn create_report(&self, request: &ReportRequest) -> Result<Report, CoinbaseError> {
        request.validate()?;
        self.post_as(&[V2, path::REPORTS], request, None).await
    }

    // ========== Notifications ==========

    pub async fn get_notifications(&self, params: Option<&ListParams>) -> Result<ApiObject, CoinbaseError> {
        self.get_with_params(&[V2, path::NOTIFICATIONS], params, ObjectKind::Notification, None)
            .await
    }

    pub async fn get_notification(&self, notification_id: &str) -> Result<Notification, CoinbaseError> {
        self.get_as(&[V2, path::NOTIFICATIONS, notification_id], None)
            .await
    }
}
