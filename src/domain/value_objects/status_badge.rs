use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status shown on an application / accepted-job card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    AcceptedSubmitWork,
    WorkSubmittedAwaitingReview,
    CompletedAndPaid,
    NotAccepted,
    PendingReview,
}

impl StatusBadge {
    /// Fixed decision table over the on-chain flags and the locally recorded submission.
    ///
    /// | accepted | reviewed | work submitted | badge                            |
    /// |----------|----------|----------------|----------------------------------|
    /// | true     | any      | false          | Accepted – submit work           |
    /// | true     | false    | true           | Work submitted – awaiting review |
    /// | true     | true     | true           | Completed & paid                 |
    /// | false    | true     | any            | Not accepted                     |
    /// | false    | false    | any            | Pending review                   |
    pub fn derive(is_accepted: bool, is_reviewed: bool, has_work_submitted: bool) -> Self {
        match (is_accepted, is_reviewed, has_work_submitted) {
            (true, _, false) => StatusBadge::AcceptedSubmitWork,
            (true, false, true) => StatusBadge::WorkSubmittedAwaitingReview,
            (true, true, true) => StatusBadge::CompletedAndPaid,
            (false, true, _) => StatusBadge::NotAccepted,
            (false, false, _) => StatusBadge::PendingReview,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::AcceptedSubmitWork => "Accepted – submit work",
            StatusBadge::WorkSubmittedAwaitingReview => "Work submitted – awaiting review",
            StatusBadge::CompletedAndPaid => "Completed & paid",
            StatusBadge::NotAccepted => "Not accepted",
            StatusBadge::PendingReview => "Pending review",
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter for the application review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationFilter {
    #[default]
    All,
    Pending,
    Accepted,
    Denied,
}

impl ApplicationFilter {
    pub fn matches(&self, is_reviewed: bool, is_accepted: bool) -> bool {
        match self {
            ApplicationFilter::All => true,
            ApplicationFilter::Pending => !is_reviewed,
            ApplicationFilter::Accepted => is_accepted,
            ApplicationFilter::Denied => is_reviewed && !is_accepted,
        }
    }
}

impl FromStr for ApplicationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(ApplicationFilter::All),
            "pending" => Ok(ApplicationFilter::Pending),
            "accepted" => Ok(ApplicationFilter::Accepted),
            "denied" => Ok(ApplicationFilter::Denied),
            other => Err(format!("Unknown application filter: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_combination_maps_to_one_badge() {
        let expected = [
            ((true, false, false), StatusBadge::AcceptedSubmitWork),
            ((true, true, false), StatusBadge::AcceptedSubmitWork),
            ((true, false, true), StatusBadge::WorkSubmittedAwaitingReview),
            ((true, true, true), StatusBadge::CompletedAndPaid),
            ((false, true, false), StatusBadge::NotAccepted),
            ((false, true, true), StatusBadge::NotAccepted),
            ((false, false, false), StatusBadge::PendingReview),
            ((false, false, true), StatusBadge::PendingReview),
        ];
        for ((accepted, reviewed, submitted), badge) in expected {
            assert_eq!(
                StatusBadge::derive(accepted, reviewed, submitted),
                badge,
                "accepted={accepted} reviewed={reviewed} submitted={submitted}"
            );
        }
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(StatusBadge::CompletedAndPaid.label(), "Completed & paid");
        assert_eq!(StatusBadge::PendingReview.to_string(), "Pending review");
    }

    #[test]
    fn filter_semantics() {
        assert!(ApplicationFilter::Pending.matches(false, false));
        assert!(!ApplicationFilter::Pending.matches(true, true));
        assert!(ApplicationFilter::Accepted.matches(true, true));
        assert!(ApplicationFilter::Denied.matches(true, false));
        assert!(!ApplicationFilter::Denied.matches(false, false));
        assert_eq!("DENIED".parse::<ApplicationFilter>(), Ok(ApplicationFilter::Denied));
        assert!("rejected".parse::<ApplicationFilter>().is_err());
    }
}
