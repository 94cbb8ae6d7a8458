//! Smart alert endpoints.

use deal_core::entities::Alert;
use deal_core::requests::AlertFilter;
use deal_core::responses::Ack;

use crate::envelope::{ALERT_FIELDS, Observed};
use crate::{CallTimeout, ContractError, CrmClient, Method, with_query};

impl CrmClient {
    /// `GET /alerts/smart[?priority=&type=&agent=]`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn list_alerts(&self, filter: &AlertFilter) -> Result<Observed<Vec<Alert>>, ContractError> {
        let path = with_query("/alerts/smart", &filter.query_pairs());
        self.send(Method::GET, &path, None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .list("alerts", ALERT_FIELDS)
    }

    /// `POST /alerts/generate`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or an unacknowledged call.
    pub async fn generate_alerts(&self) -> Result<Ack, ContractError> {
        Ok(self
            .send(Method::POST, "/alerts/generate", None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .whole(&["success"])?
            .value)
    }

    /// `POST /alerts/dismiss/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or an unacknowledged call.
    pub async fn dismiss_alert(&self, alert_id: &str) -> Result<Ack, ContractError> {
        let path = format!("/alerts/dismiss/{}", urlencoding::encode(alert_id));
        Ok(self
            .send(Method::POST, &path, None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .whole(&["success"])?
            .value)
    }
}
