use crate::shared::error::{ProviderError, INTERNAL_RPC_CODE};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// State-changing operation a failure belongs to. Each one has its own translation order,
/// which is kept as-is so users see the same explanations as before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PostJob,
    EditJob,
    ApplyForJob,
    ApproveApplication,
    DenyApplication,
    SubmitWork,
}

impl Operation {
    fn prefix(&self) -> &'static str {
        match self {
            Operation::PostJob => "Failed to post job. ",
            Operation::EditJob => "Failed to edit job. ",
            Operation::ApplyForJob => "Failed to submit application. ",
            Operation::ApproveApplication => "Failed to approve and send payment.\n\n",
            Operation::DenyApplication => "Failed to deny application. ",
            Operation::SubmitWork => "Failed to submit work. ",
        }
    }

    fn known_reverts(&self) -> &'static [KnownRevert] {
        match self {
            Operation::EditJob => &[
                KnownRevert::OnlyPosterCanEdit,
                KnownRevert::CannotEditCompleted,
                KnownRevert::BudgetTooLow,
                KnownRevert::DeadlineNotInFuture,
            ],
            Operation::ApproveApplication => &[
                KnownRevert::ApplicationAlreadyReviewed,
                KnownRevert::OnlyPosterCanReview,
                KnownRevert::InvalidJobId,
                KnownRevert::InvalidApplicationIndex,
                KnownRevert::PaymentFailed,
            ],
            Operation::DenyApplication => &[KnownRevert::ApplicationAlreadyReviewed],
            _ => &[],
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::PostJob => "postJob",
            Operation::EditJob => "editJob",
            Operation::ApplyForJob => "applyForJob",
            Operation::ApproveApplication => "reviewWork(approve)",
            Operation::DenyApplication => "reviewWork(deny)",
            Operation::SubmitWork => "submitWork",
        };
        f.write_str(name)
    }
}

/// Revert reasons the contract is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownRevert {
    OnlyPosterCanEdit,
    CannotEditCompleted,
    BudgetTooLow,
    DeadlineNotInFuture,
    ApplicationAlreadyReviewed,
    OnlyPosterCanReview,
    InvalidJobId,
    InvalidApplicationIndex,
    PaymentFailed,
}

impl KnownRevert {
    /// Substring searched for in the provider message.
    pub fn needle(&self) -> &'static str {
        match self {
            KnownRevert::OnlyPosterCanEdit => "Only job poster can edit",
            KnownRevert::CannotEditCompleted => "Cannot edit completed",
            KnownRevert::BudgetTooLow => "Budget must be at least",
            KnownRevert::DeadlineNotInFuture => "Deadline must be in the future",
            KnownRevert::ApplicationAlreadyReviewed => "Application already reviewed",
            KnownRevert::OnlyPosterCanReview => "Only job poster can review",
            KnownRevert::InvalidJobId => "Invalid job ID",
            KnownRevert::InvalidApplicationIndex => "Invalid application index",
            KnownRevert::PaymentFailed => "Payment failed",
        }
    }

    fn explanation(&self) -> &'static str {
        match self {
            KnownRevert::OnlyPosterCanEdit => "Only the job poster can edit this job.",
            KnownRevert::CannotEditCompleted => "Cannot edit completed or approved jobs.",
            KnownRevert::BudgetTooLow => "Budget must be at least 0.001 ETH.",
            KnownRevert::DeadlineNotInFuture => "Deadline must be in the future.",
            KnownRevert::ApplicationAlreadyReviewed => "This application has already been reviewed.",
            KnownRevert::OnlyPosterCanReview => {
                "You are not the job poster for this job. Switch to the account that posted the job and try again."
            }
            KnownRevert::InvalidJobId => {
                "The job ID is invalid on-chain. This can happen if the contract was redeployed and the client is using an old job index."
            }
            KnownRevert::InvalidApplicationIndex => {
                "The selected application index does not exist for this job."
            }
            KnownRevert::PaymentFailed => {
                "The contract could not transfer payment to the freelancer (payment failed). Make sure the contract has enough balance and try again."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    UserRejected,
    InsufficientFunds,
    KnownRevert(KnownRevert),
    Reverted,
    InternalRpc,
    Other(String),
    Unknown,
}

/// A failed state-changing call, translated into the fixed user-facing taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{operation}: {reason:?}")]
pub struct TransactionFailure {
    pub operation: Operation,
    pub reason: FailureReason,
}

impl TransactionFailure {
    pub fn new(operation: Operation, reason: FailureReason) -> Self {
        Self { operation, reason }
    }

    pub fn classify(operation: Operation, err: &ProviderError) -> Self {
        Self::new(operation, classify_reason(operation, err))
    }

    pub fn user_message(&self) -> String {
        let op = self.operation;
        if self.reason == FailureReason::UserRejected {
            return match op {
                Operation::ApproveApplication | Operation::DenyApplication => {
                    "You cancelled the transaction in your wallet.\n\nThe application was not changed."
                        .to_string()
                }
                _ => format!("{}Transaction was rejected by user.", op.prefix()),
            };
        }

        let detail = match &self.reason {
            FailureReason::UserRejected => "Transaction was rejected by user.".to_string(),
            FailureReason::KnownRevert(revert) => revert.explanation().to_string(),
            FailureReason::InternalRpc => {
                "Internal JSON-RPC error. Check if you have enough ETH for gas fees.".to_string()
            }
            FailureReason::InsufficientFunds => match op {
                Operation::ApproveApplication => {
                    "Your account does not have enough ETH to cover payment + gas.".to_string()
                }
                _ => "Insufficient funds for gas fees.".to_string(),
            },
            FailureReason::Reverted => match op {
                Operation::PostJob => "Transaction reverted. Check your inputs (budget must be >= 0.001 ETH, deadline must be in future).".to_string(),
                Operation::EditJob => "Transaction reverted. Check your inputs.".to_string(),
                Operation::ApproveApplication => "The transaction was reverted by the contract. Check that you are the job poster, the application is still pending review, and the contract is correctly funded.".to_string(),
                Operation::DenyApplication => "The transaction was reverted by the contract. Double-check that you are the job poster and that this application can still be updated.".to_string(),
                _ => "The transaction was reverted by the contract.".to_string(),
            },
            FailureReason::Other(raw) => raw.clone(),
            FailureReason::Unknown => match op {
                Operation::PostJob | Operation::EditJob => {
                    "Please check the logs for details.".to_string()
                }
                _ => "Unknown error occurred. Check the logs for details.".to_string(),
            },
        };
        format!("{}{}", op.prefix(), detail)
    }
}

fn find_known(operation: Operation, text: &str) -> Option<KnownRevert> {
    operation
        .known_reverts()
        .iter()
        .copied()
        .find(|revert| text.contains(revert.needle()))
}

fn classify_reason(operation: Operation, err: &ProviderError) -> FailureReason {
    if err.is_user_rejection() {
        return FailureReason::UserRejected;
    }

    let message = err.message.as_str();
    let raw = err.raw_message();

    match operation {
        Operation::PostJob | Operation::EditJob => {
            if err.code == Some(INTERNAL_RPC_CODE) {
                FailureReason::InternalRpc
            } else if message.contains("insufficient funds") {
                FailureReason::InsufficientFunds
            } else if message.contains("revert") {
                find_known(operation, raw)
                    .map(FailureReason::KnownRevert)
                    .unwrap_or(FailureReason::Reverted)
            } else if !message.is_empty() {
                FailureReason::Other(message.to_string())
            } else {
                FailureReason::Unknown
            }
        }
        Operation::ApproveApplication => {
            if let Some(revert) = find_known(operation, raw) {
                FailureReason::KnownRevert(revert)
            } else if raw.contains("insufficient funds") {
                FailureReason::InsufficientFunds
            } else if raw.contains("revert") {
                FailureReason::Reverted
            } else if !raw.is_empty() {
                FailureReason::Other(raw.to_string())
            } else {
                FailureReason::Unknown
            }
        }
        Operation::DenyApplication => {
            if message.contains("already reviewed") {
                FailureReason::KnownRevert(KnownRevert::ApplicationAlreadyReviewed)
            } else if message.contains("revert") {
                FailureReason::Reverted
            } else if !message.is_empty() {
                FailureReason::Other(message.to_string())
            } else {
                FailureReason::Unknown
            }
        }
        Operation::ApplyForJob | Operation::SubmitWork => {
            if raw.contains("insufficient funds") {
                FailureReason::InsufficientFunds
            } else if raw.contains("revert") {
                FailureReason::Reverted
            } else if !raw.is_empty() {
                FailureReason::Other(raw.to_string())
            } else {
                FailureReason::Unknown
            }
        }
    }
}
