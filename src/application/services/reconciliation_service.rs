use super::chain_reader::{AppliedJob, ChainReader};
use super::side_store::LocalSideStore;
use crate::domain::entities::{
    first_accepted, has_work_submitted, Application, ApplicationStatus, Job, Profile,
};
use crate::domain::value_objects::{ApplicationFilter, StatusBadge};
use crate::shared::AppError;
use alloy_primitives::Address;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A poster's job with the hired freelancer, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientJobView {
    pub job: Job,
    pub application_count: usize,
    pub accepted_application: Option<Application>,
    pub freelancer_profile: Option<Profile>,
    pub submitted_work_url: Option<String>,
    pub has_work_submitted: bool,
    pub badge: Option<StatusBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailView {
    pub job: Job,
    pub is_poster: bool,
    pub own_application: Option<Application>,
    pub can_apply: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub application: Application,
    pub profile: Option<Profile>,
    pub submitted_work_url: Option<String>,
    pub has_work_submitted: bool,
    pub badge: StatusBadge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedJobView {
    pub job: Job,
    pub status: ApplicationStatus,
    pub submitted_work_url: Option<String>,
    pub has_work_submitted: bool,
    pub badge: StatusBadge,
}

/// Joins contract reads with side-store data into the shapes views render.
pub struct ReconciliationService {
    reader: Arc<ChainReader>,
    side_store: Arc<LocalSideStore>,
}

impl ReconciliationService {
    pub fn new(reader: Arc<ChainReader>, side_store: Arc<LocalSideStore>) -> Self {
        Self { reader, side_store }
    }

    /// Open jobs not posted by `account`, in contract order.
    pub async fn explore_jobs(
        &self,
        account: Option<Address>,
        limit: Option<usize>,
    ) -> Result<Vec<Job>, AppError> {
        let jobs = self.reader.jobs().await?;
        let open = jobs
            .into_iter()
            .filter(|job| job.is_open())
            .filter(|job| account.map_or(true, |acc| !job.is_posted_by(&acc)));
        Ok(match limit {
            Some(limit) => open.take(limit).collect(),
            None => open.collect(),
        })
    }

    pub async fn client_jobs(&self, account: Address) -> Result<Vec<ClientJobView>, AppError> {
        let own: Vec<Job> = self
            .reader
            .jobs()
            .await?
            .into_iter()
            .filter(|job| job.is_posted_by(&account))
            .collect();
        debug!(%account, count = own.len(), "Reconciling client jobs");

        let applications = join_all(own.iter().map(|job| self.reader.applications(job.job_id)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let mut views = Vec::with_capacity(own.len());
        for (job, applications) in own.into_iter().zip(applications) {
            let accepted = first_accepted(&applications).cloned();
            let (freelancer_profile, submitted_work_url) = match &accepted {
                Some(app) => (
                    self.side_store.find_profile(&app.applicant).await?,
                    self.side_store
                        .submitted_work(job.job_id, &app.applicant)
                        .await?,
                ),
                None => (None, None),
            };
            let submitted = has_work_submitted(submitted_work_url.as_deref());
            let badge = accepted
                .as_ref()
                .map(|app| StatusBadge::derive(app.is_accepted, app.is_reviewed, submitted));
            views.push(ClientJobView {
                application_count: applications.len(),
                job,
                accepted_application: accepted,
                freelancer_profile,
                submitted_work_url,
                has_work_submitted: submitted,
                badge,
            });
        }
        Ok(views)
    }

    pub async fn job_detail(
        &self,
        job_id: u64,
        account: Option<Address>,
    ) -> Result<Option<JobDetailView>, AppError> {
        let Some(job) = self.reader.job(job_id).await? else {
            return Ok(None);
        };
        let own_application = match account {
            Some(acc) => self
                .reader
                .applications(job_id)
                .await?
                .into_iter()
                .find(|app| app.is_from(&acc)),
            None => None,
        };
        let is_poster = account.is_some_and(|acc| job.is_posted_by(&acc));
        let can_apply = account.is_some() && !is_poster && own_application.is_none() && job.is_open();
        Ok(Some(JobDetailView {
            job,
            is_poster,
            own_application,
            can_apply,
        }))
    }

    /// Applications keep their on-chain index whatever the filter.
    pub async fn review_applications(
        &self,
        job_id: u64,
        filter: ApplicationFilter,
    ) -> Result<Vec<ApplicationView>, AppError> {
        let applications = self.reader.applications(job_id).await?;
        let mut views = Vec::new();
        for application in applications
            .into_iter()
            .filter(|app| filter.matches(app.is_reviewed, app.is_accepted))
        {
            let profile = self.side_store.find_profile(&application.applicant).await?;
            let submitted_work_url = self
                .side_store
                .submitted_work(job_id, &application.applicant)
                .await?;
            let submitted = has_work_submitted(submitted_work_url.as_deref());
            views.push(ApplicationView {
                badge: StatusBadge::derive(
                    application.is_accepted,
                    application.is_reviewed,
                    submitted,
                ),
                application,
                profile,
                submitted_work_url,
                has_work_submitted: submitted,
            });
        }
        Ok(views)
    }

    pub async fn applied_jobs(&self, account: Address) -> Result<Vec<AppliedJobView>, AppError> {
        let applied = self.reader.applied_jobs_with_status(account).await?;
        let mut views = Vec::with_capacity(applied.len());
        for AppliedJob { job, status } in applied {
            let submitted_work_url = self.side_store.submitted_work(job.job_id, &account).await?;
            let submitted = has_work_submitted(submitted_work_url.as_deref());
            views.push(AppliedJobView {
                badge: StatusBadge::derive(status.is_accepted, status.is_reviewed, submitted),
                job,
                status,
                submitted_work_url,
                has_work_submitted: submitted,
            });
        }
        Ok(views)
    }

    pub async fn accepted_jobs(&self, account: Address) -> Result<Vec<AppliedJobView>, AppError> {
        Ok(self
            .applied_jobs(account)
            .await?
            .into_iter()
            .filter(|view| view.status.is_accepted)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::ChainAccess;
    use crate::application::shared::tests::fixtures::*;
    use crate::application::shared::tests::mocks::FakeChain;
    use crate::infrastructure::storage::MemoryKeyValueStore;
    use crate::application::ports::key_value_store::KeyValueStore;
    use crate::domain::value_objects::store_key::checksum_address;

    struct Harness {
        chain: Arc<FakeChain>,
        store: Arc<MemoryKeyValueStore>,
        service: ReconciliationService,
    }

    fn harness() -> Harness {
        let chain = Arc::new(FakeChain::new(contract_address()));
        let store = Arc::new(MemoryKeyValueStore::new());
        let access = ChainAccess::Ready {
            wallet: chain.clone(),
            contract: chain.clone(),
        };
        let reader = Arc::new(ChainReader::new(access, None));
        let side_store = Arc::new(LocalSideStore::new(store.clone()));
        Harness {
            chain,
            store,
            service: ReconciliationService::new(reader, side_store),
        }
    }

    #[tokio::test]
    async fn explore_hides_closed_and_own_jobs() {
        let h = harness();
        h.chain.with(|s| {
            let mut completed = sample_job(0, poster());
            completed.is_completed = true;
            let mut approved = sample_job(1, poster());
            approved.is_approved = true;
            s.jobs = vec![
                completed,
                approved,
                sample_job(2, poster()),
                sample_job(3, freelancer()),
                sample_job(4, poster()),
            ];
        });

        let jobs = h.service.explore_jobs(Some(freelancer()), None).await.unwrap();
        let ids: Vec<u64> = jobs.iter().map(|j| j.job_id).collect();
        assert_eq!(ids, vec![2, 4]);

        let limited = h.service.explore_jobs(None, Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].job_id, 2);
    }

    #[tokio::test]
    async fn client_jobs_join_accepted_application_and_side_store() {
        let h = harness();
        h.chain.with(|s| {
            s.jobs = vec![
                sample_job(0, poster()),
                sample_job(1, poster()),
                sample_job(2, poster()),
                sample_job(3, freelancer()),
            ];
            s.applications.insert(
                0,
                vec![
                    sample_application(0, other_freelancer(), true, false),
                    sample_application(1, freelancer(), true, true),
                ],
            );
            s.applications
                .insert(1, vec![sample_application(0, freelancer(), true, true)]);
            s.applications
                .insert(2, vec![sample_application(0, freelancer(), false, false)]);
        });
        h.store
            .set(
                &format!("submittedWork_0_{}", checksum_address(&freelancer())),
                "https://work.dev/0",
            )
            .await
            .unwrap();
        h.store
            .set(
                &format!("profile_{}", checksum_address(&freelancer())),
                r#"{"name":"Grace"}"#,
            )
            .await
            .unwrap();

        let views = h.service.client_jobs(poster()).await.unwrap();
        assert_eq!(views.len(), 3);

        let first = &views[0];
        assert_eq!(first.application_count, 2);
        assert_eq!(first.accepted_application.as_ref().unwrap().index, 1);
        assert_eq!(first.freelancer_profile.as_ref().unwrap().name, "Grace");
        assert_eq!(first.submitted_work_url.as_deref(), Some("https://work.dev/0"));
        assert_eq!(first.badge, Some(StatusBadge::CompletedAndPaid));

        assert_eq!(views[1].badge, Some(StatusBadge::AcceptedSubmitWork));
        assert!(!views[1].has_work_submitted);
        assert_eq!(views[2].badge, None);
        assert!(views[2].accepted_application.is_none());
    }

    #[tokio::test]
    async fn review_filter_keeps_chain_index() {
        let h = harness();
        h.chain.with(|s| {
            s.jobs = vec![sample_job(0, poster())];
            s.applications.insert(
                0,
                vec![
                    sample_application(0, freelancer(), false, false),
                    sample_application(1, other_freelancer(), true, false),
                    sample_application(2, Address::repeat_byte(0x44), true, true),
                ],
            );
        });

        let denied = h
            .service
            .review_applications(0, ApplicationFilter::Denied)
            .await
            .unwrap();
        assert_eq!(denied.len(), 1);
        assert_eq!(denied[0].application.index, 1);
        assert_eq!(denied[0].badge, StatusBadge::NotAccepted);

        let accepted = h
            .service
            .review_applications(0, ApplicationFilter::Accepted)
            .await
            .unwrap();
        assert_eq!(accepted[0].application.index, 2);

        let all = h
            .service
            .review_applications(0, ApplicationFilter::All)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].badge, StatusBadge::PendingReview);
    }

    #[tokio::test]
    async fn applied_jobs_badges_follow_decision_table() {
        let h = harness();
        h.chain.with(|s| {
            s.jobs = vec![sample_job(0, poster()), sample_job(1, poster())];
            s.applications
                .insert(0, vec![sample_application(0, freelancer(), false, true)]);
            s.applications
                .insert(1, vec![sample_application(0, freelancer(), false, false)]);
        });
        h.store
            .set(
                &format!("submittedWork_0_{}", checksum_address(&freelancer()).to_lowercase()),
                "https://work.dev",
            )
            .await
            .unwrap();

        let views = h.service.applied_jobs(freelancer()).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].badge, StatusBadge::WorkSubmittedAwaitingReview);
        assert_eq!(views[1].badge, StatusBadge::PendingReview);

        let accepted = h.service.accepted_jobs(freelancer()).await.unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].job.job_id, 0);
    }

    #[tokio::test]
    async fn applied_jobs_fall_back_without_status_helper() {
        let h = harness();
        h.chain.with(|s| {
            s.status_helper_missing = true;
            s.jobs = vec![sample_job(0, poster()), sample_job(1, poster())];
            s.applications
                .insert(1, vec![sample_application(0, freelancer(), true, true)]);
        });

        let views = h.service.applied_jobs(freelancer()).await.unwrap();
        assert_eq!(views.len(), 1);
        // the fallback has neither statuses nor ids
        assert_eq!(views[0].job.job_id, 0);
        assert_eq!(views[0].status, ApplicationStatus::default());
        assert_eq!(views[0].badge, StatusBadge::PendingReview);
    }

    #[tokio::test]
    async fn job_detail_reports_own_application() {
        let h = harness();
        h.chain.with(|s| {
            s.jobs = vec![sample_job(0, poster())];
            s.applications
                .insert(0, vec![sample_application(0, freelancer(), true, false)]);
        });

        let detail = h
            .service
            .job_detail(0, Some(freelancer()))
            .await
            .unwrap()
            .unwrap();
        assert!(!detail.is_poster);
        assert!(!detail.can_apply);
        assert!(detail.own_application.unwrap().is_reviewed);

        let fresh = h
            .service
            .job_detail(0, Some(other_freelancer()))
            .await
            .unwrap()
            .unwrap();
        assert!(fresh.can_apply);

        assert!(h.service.job_detail(9, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn provider_failure_reads_as_empty() {
        let h = harness();
        h.chain.with(|s| {
            s.jobs = vec![sample_job(0, poster())];
            s.reads_fail = true;
        });
        assert!(h.service.explore_jobs(None, None).await.unwrap().is_empty());
        assert!(h.service.client_jobs(poster()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn not_configured_is_an_error() {
        let reader = Arc::new(ChainReader::new(ChainAccess::NotConfigured, None));
        let side_store = Arc::new(LocalSideStore::new(Arc::new(MemoryKeyValueStore::new())));
        let service = ReconciliationService::new(reader, side_store);
        let err = service.explore_jobs(None, None).await.unwrap_err();
        assert!(err.is_not_configured());
    }
}
