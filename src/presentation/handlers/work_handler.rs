use super::{resolve_account, resolve_local_account};
use crate::{
    application::services::{ChainReader, LocalSideStore, MutationService},
    domain::entities::{FeedbackRecord, SubmittedWork},
    presentation::dto::{
        job_dto::TransactionResponse,
        work_dto::{FeedbackRequest, SubmitWorkRequest, SubmittedWorkRequest},
        Validate,
    },
    shared::error::AppError,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWorkResponse {
    pub work: SubmittedWork,
    pub transaction: Option<TransactionResponse>,
}

pub struct WorkHandler {
    reader: Arc<ChainReader>,
    side_store: Arc<LocalSideStore>,
    mutation: Arc<MutationService>,
}

impl WorkHandler {
    pub fn new(
        reader: Arc<ChainReader>,
        side_store: Arc<LocalSideStore>,
        mutation: Arc<MutationService>,
    ) -> Self {
        Self {
            reader,
            side_store,
            mutation,
        }
    }

    /// Records the link locally. With `on_chain` the contract's `submitWork` runs first and
    /// the link is only recorded once that transaction is confirmed.
    pub async fn submit_work(
        &self,
        account: Option<&str>,
        request: SubmitWorkRequest,
    ) -> Result<SubmitWorkResponse, AppError> {
        let transaction = if request.on_chain {
            let account = resolve_account(&self.reader, account).await?;
            request.validate().map_err(AppError::ValidationError)?;
            Some(
                self.mutation
                    .submit_work_on_chain(account, request.job_id, &request.work_url)
                    .await?
                    .into(),
            )
        } else {
            None
        };

        let account = resolve_local_account(&self.reader, account).await?;
        let work = self
            .mutation
            .submit_work(account, request.job_id, &request.work_url)
            .await?;
        Ok(SubmitWorkResponse { work, transaction })
    }

    pub async fn submitted_work(
        &self,
        request: SubmittedWorkRequest,
    ) -> Result<Option<String>, AppError> {
        let applicant = resolve_local_account(&self.reader, request.applicant.as_deref()).await?;
        self.side_store
            .submitted_work(request.job_id, &applicant)
            .await
    }

    pub async fn submit_feedback(
        &self,
        account: Option<&str>,
        request: FeedbackRequest,
    ) -> Result<FeedbackRecord, AppError> {
        let poster = resolve_account(&self.reader, account).await?;
        request.validate().map_err(AppError::ValidationError)?;

        let job = self
            .reader
            .job(request.job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        let application = self
            .reader
            .applications(request.job_id)
            .await?
            .into_iter()
            .find(|app| app.index == request.application_index)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        self.mutation
            .submit_feedback(poster, &job, &application, &request.draft())
            .await
    }

    pub async fn feedback(
        &self,
        job_id: u64,
        applicant: Option<&str>,
    ) -> Result<Option<FeedbackRecord>, AppError> {
        let applicant = resolve_local_account(&self.reader, applicant).await?;
        self.side_store.feedback(job_id, &applicant).await
    }
}
