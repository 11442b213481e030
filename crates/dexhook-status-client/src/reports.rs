//! Stage reports: `POST /api/report/json/uploadId/{upload_id}?destinationId&eventType&stageName`
//! with an arbitrary JSON body.

use serde::Serialize;

use crate::error::StatusApiError;
use crate::transport::Transport;

/// Client for `/api/report`.
#[derive(Debug, Clone)]
pub struct ReportClient {
    transport: Transport,
}

impl ReportClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Attach a JSON report to an upload's stage.
    pub async fn create_report<T>(
        &self,
        upload_id: &str,
        destination_id: &str,
        event_type: &str,
        stage_name: &str,
        report: &T,
    ) -> Result<(), StatusApiError>
    where
        T: Serialize + ?Sized,
    {
        let endpoint = "POST /api/report/json/uploadId";
        let url = self.transport.url(
            endpoint,
            &["api", "report", "json", "uploadId", upload_id],
            &[
                ("destinationId", destination_id),
                ("eventType", event_type),
                ("stageName", stage_name),
            ],
        )?;

        self.transport
            .send(endpoint, |http| http.post(url.clone()).json(report))
            .await?;
        tracing::info!(upload_id, stage_name, "submitted report");
        Ok(())
    }
}
