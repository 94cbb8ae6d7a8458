//! Checklist item endpoints.

use deal_core::enums::Stage;
use deal_core::entities::ChecklistItem;
use deal_core::requests::{ChecklistUpdate, NewChecklistItem};
use deal_core::responses::Ack;

use crate::envelope::{CHECKLIST_ITEM_FIELDS, Observed};
use crate::{CallTimeout, ContractError, CrmClient, Method, with_query};

impl CrmClient {
    /// `GET /transactions/:id/checklist[?stage=]`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn list_checklist(
        &self,
        transaction_id: &str,
        stage: Option<Stage>,
    ) -> Result<Observed<Vec<ChecklistItem>>, ContractError> {
        let base = format!("/transactions/{}/checklist", urlencoding::encode(transaction_id));
        let pairs: Vec<(&str, String)> = stage
            .map(|stage| ("stage", stage.as_str().to_string()))
            .into_iter()
            .collect();
        self.send(Method::GET, &with_query(&base, &pairs), None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .list("checklist_items", CHECKLIST_ITEM_FIELDS)
    }

    /// `POST /transactions/:id/checklist`; the CRM answers `201`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn create_checklist_item(
        &self,
        transaction_id: &str,
        item: &NewChecklistItem,
    ) -> Result<Observed<ChecklistItem>, ContractError> {
        let path = format!("/transactions/{}/checklist", urlencoding::encode(transaction_id));
        self.send_json(Method::POST, &path, item, CallTimeout::Standard)
            .await?
            .expect_status(&[201])?
            .require_success()?
            .entity("checklist_item", CHECKLIST_ITEM_FIELDS)
    }

    /// `PUT /checklist/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn update_checklist_item(
        &self,
        item_id: &str,
        update: &ChecklistUpdate,
    ) -> Result<Observed<ChecklistItem>, ContractError> {
        let path = format!("/checklist/{}", urlencoding::encode(item_id));
        self.send_json(Method::PUT, &path, update, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .entity("checklist_item", CHECKLIST_ITEM_FIELDS)
    }

    /// `DELETE /checklist/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or when the CRM does
    /// not acknowledge the delete.
    pub async fn delete_checklist_item(&self, item_id: &str) -> Result<Ack, ContractError> {
        let path = format!("/checklist/{}", urlencoding::encode(item_id));
        Ok(self
            .send(Method::DELETE, &path, None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .whole(&["success"])?
            .value)
    }
}
