use crate::domain::value_objects::store_key::{
    FEEDBACK_PREFIX, PROFILE_PREFIX, SUBMITTED_WORK_PREFIX,
};
use crate::domain::value_objects::Operation;
use alloy_primitives::{Address, B256};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

/// Change notifications passed between views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BusEvent {
    #[serde(rename_all = "camelCase")]
    WorkSubmitted {
        job_id: u64,
        applicant: Address,
        work_url: String,
    },
    #[serde(rename_all = "camelCase")]
    FeedbackSubmitted {
        applicant: Address,
        applicant_lower: String,
        job_id: u64,
    },
    #[serde(rename_all = "camelCase")]
    ProfileUpdated { account: Address },
    /// A side-store key changed, possibly by another instance.
    #[serde(rename_all = "camelCase")]
    StorageChanged { key: String },
    #[serde(rename_all = "camelCase")]
    ChainUpdated {
        operation: Operation,
        transaction_hash: B256,
    },
}

impl BusEvent {
    pub fn touches_submitted_work(&self) -> bool {
        match self {
            BusEvent::WorkSubmitted { .. } | BusEvent::ChainUpdated { .. } => true,
            BusEvent::StorageChanged { key } => key.starts_with(SUBMITTED_WORK_PREFIX),
            _ => false,
        }
    }

    pub fn touches_profiles(&self) -> bool {
        match self {
            BusEvent::ProfileUpdated { .. } | BusEvent::FeedbackSubmitted { .. } => true,
            BusEvent::StorageChanged { key } => {
                key.starts_with(PROFILE_PREFIX) || key.starts_with(FEEDBACK_PREFIX)
            }
            _ => false,
        }
    }
}

/// In-process fan-out. Publishing without subscribers is not an error.
pub struct NotificationBus {
    sender: broadcast::Sender<BusEvent>,
}

impl NotificationBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: BusEvent) -> usize {
        trace!(?event, "bus publish");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(256)
    }
}
