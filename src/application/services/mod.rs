pub mod chain_access;
pub mod chain_reader;
pub mod live_view;
pub mod mutation_service;
pub mod notification_bus;
pub mod reconciliation_service;
pub mod side_store;

pub use chain_access::ChainAccess;
pub use chain_reader::{AppliedJob, ChainReader};
pub use live_view::LiveView;
pub use mutation_service::{MutationService, MutationSettings, TransactionOutcome};
pub use notification_bus::{BusEvent, NotificationBus};
pub use reconciliation_service::{
    AppliedJobView, ApplicationView, ClientJobView, JobDetailView, ReconciliationService,
};
pub use side_store::LocalSideStore;
