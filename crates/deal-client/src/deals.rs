//! Deal summaries.

use deal_core::entities::DealSummary;

use crate::envelope::{DEAL_SUMMARY_FIELDS, Observed};
use crate::{CallTimeout, ContractError, CrmClient, Method};

impl CrmClient {
    /// `GET /deals/summary/:id`, on the AI timeout budget.
    ///
    /// The summary is the envelope itself, so `raw` is the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn deal_summary(&self, transaction_id: &str) -> Result<Observed<DealSummary>, ContractError> {
        let path = format!("/deals/summary/{}", urlencoding::encode(transaction_id));
        self.send(Method::GET, &path, None, CallTimeout::Ai)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .whole(DEAL_SUMMARY_FIELDS)
    }
}
