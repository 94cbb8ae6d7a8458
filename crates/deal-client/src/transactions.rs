//! `/transactions` endpoints, including stage transitions.

use deal_core::entities::{StageRejection, Transaction, ValidationResult};
use deal_core::requests::{NewTransaction, StageTransitionRequest, TransactionUpdate};

use crate::envelope::{Observed, TRANSACTION_FIELDS};
use crate::{CallTimeout, ContractError, CrmClient, Method};

/// Outcome of one stage-transition call. Both branches are valid CRM behaviour.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// `200`: the stage moved.
    Accepted {
        transaction: Observed<Transaction>,
        validation: Option<ValidationResult>,
    },
    /// `422`: validation blocked the move; a forced retry may override it.
    Rejected(StageRejection),
}

impl CrmClient {
    /// `GET /transactions`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn list_transactions(&self) -> Result<Observed<Vec<Transaction>>, ContractError> {
        self.send(Method::GET, "/transactions", None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .list("transactions", TRANSACTION_FIELDS)
    }

    /// `POST /transactions`; the CRM answers `201`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn create_transaction(
        &self,
        payload: &NewTransaction,
    ) -> Result<Observed<Transaction>, ContractError> {
        self.send_json(Method::POST, "/transactions", payload, CallTimeout::Standard)
            .await?
            .expect_status(&[201])?
            .require_success()?
            .entity("transaction", TRANSACTION_FIELDS)
    }

    /// `GET /transactions/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn get_transaction(&self, id: &str) -> Result<Observed<Transaction>, ContractError> {
        let path = format!("/transactions/{}", urlencoding::encode(id));
        self.send(Method::GET, &path, None, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .entity("transaction", TRANSACTION_FIELDS)
    }

    /// `PUT /transactions/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure or a broken envelope.
    pub async fn update_transaction(
        &self,
        id: &str,
        update: &TransactionUpdate,
    ) -> Result<Observed<Transaction>, ContractError> {
        let path = format!("/transactions/{}", urlencoding::encode(id));
        self.send_json(Method::PUT, &path, update, CallTimeout::Standard)
            .await?
            .expect_status(&[200])?
            .require_success()?
            .entity("transaction", TRANSACTION_FIELDS)
    }

    /// `POST /transactions/:id/stage-transition`, on the AI timeout budget.
    ///
    /// A `422` decodes into [`TransitionOutcome::Rejected`]; any other
    /// non-`200` status is a contract failure.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] on transport failure, an unexpected status,
    /// or a body that does not match either branch.
    pub async fn transition_stage(
        &self,
        id: &str,
        request: StageTransitionRequest,
    ) -> Result<TransitionOutcome, ContractError> {
        let path = format!("/transactions/{}/stage-transition", urlencoding::encode(id));
        tracing::debug!(
            transaction = id,
            target = %request.target_stage,
            force = request.force,
            "requesting stage transition"
        );
        let envelope = self
            .send_json(Method::POST, &path, &request, CallTimeout::Ai)
            .await?
            .expect_status(&[200, 422])?;

        if envelope.status == 422 {
            return Ok(TransitionOutcome::Rejected(envelope.whole(&[])?.value));
        }

        let envelope = envelope.require_success()?;
        let transaction = envelope.entity("transaction", TRANSACTION_FIELDS)?;
        let validation = match envelope.body.get("validation_result") {
            Some(raw) if !raw.is_null() => {
                Some(envelope.entity::<ValidationResult>("validation_result", &[])?.value)
            }
            _ => None,
        };
        Ok(TransitionOutcome::Accepted {
            transaction,
            validation,
        })
    }
}
