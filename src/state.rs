use crate::application::ports::key_value_store::ChangeFeed;
use crate::application::ports::marketplace_gateway::MarketplaceGateway;
use crate::application::ports::wallet_provider::WalletProvider;
use crate::application::services::{
    ChainAccess, ChainReader, LocalSideStore, MutationService, MutationSettings,
    NotificationBus, ReconciliationService,
};
use crate::infrastructure::chain::{ContractGateway, JsonRpcClient, JsonRpcWallet};
use crate::infrastructure::notification::{StorageWatcher, StorageWatcherHandle};
use crate::infrastructure::storage::SqliteKeyValueStore;
use crate::presentation::handlers::{JobHandler, ProfileHandler, WorkHandler};
use crate::shared::AppConfig;
use alloy_primitives::Address;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a front end needs, wired from one configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SqliteKeyValueStore>,
    pub bus: Arc<NotificationBus>,
    pub reader: Arc<ChainReader>,
    pub side_store: Arc<LocalSideStore>,
    pub reconciliation: Arc<ReconciliationService>,
    pub mutation: Arc<MutationService>,
    pub job_handler: Arc<JobHandler>,
    pub work_handler: Arc<WorkHandler>,
    pub profile_handler: Arc<ProfileHandler>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        let store = Arc::new(
            SqliteKeyValueStore::connect(
                &config.storage.database_url,
                config.storage.max_connections,
                config.storage.cache_size,
            )
            .await?,
        );
        let wallet = build_wallet(&config)?;
        let access = ChainAccess::resolve(&config.chain.contract_address, wallet, |address, wallet| {
            Arc::new(ContractGateway::new(address, wallet)) as Arc<dyn MarketplaceGateway>
        });
        match &access {
            ChainAccess::Ready { .. } => {
                info!(contract = %config.chain.contract_address, "Chain access ready")
            }
            other => warn!(access = ?other, "Chain access unavailable; chain operations will fail"),
        }

        Ok(Self::from_parts(config, store, access))
    }

    /// Wires services around an already opened store and resolved chain access.
    pub fn from_parts(config: AppConfig, store: Arc<SqliteKeyValueStore>, access: ChainAccess) -> Self {
        let preferred_account = config
            .chain
            .account
            .as_deref()
            .and_then(|raw| match raw.trim().parse::<Address>() {
                Ok(address) => Some(address),
                Err(_) => {
                    warn!(account = raw, "Ignoring malformed CHAINWORK_ACCOUNT");
                    None
                }
            });

        let bus = Arc::new(NotificationBus::new(config.sync.bus_capacity));
        let side_store = Arc::new(LocalSideStore::new(store.clone()));
        let reader = Arc::new(ChainReader::new(access.clone(), preferred_account));
        let reconciliation = Arc::new(ReconciliationService::new(
            Arc::clone(&reader),
            Arc::clone(&side_store),
        ));
        let mutation = Arc::new(MutationService::new(
            access,
            Arc::clone(&side_store),
            Arc::clone(&bus),
            MutationSettings::from(&config.chain),
        ));

        let job_handler = Arc::new(JobHandler::new(
            Arc::clone(&reader),
            Arc::clone(&reconciliation),
            Arc::clone(&mutation),
        ));
        let work_handler = Arc::new(WorkHandler::new(
            Arc::clone(&reader),
            Arc::clone(&side_store),
            Arc::clone(&mutation),
        ));
        let profile_handler = Arc::new(ProfileHandler::new(
            Arc::clone(&reader),
            Arc::clone(&side_store),
            Arc::clone(&mutation),
        ));

        Self {
            config,
            store,
            bus,
            reader,
            side_store,
            reconciliation,
            mutation,
            job_handler,
            work_handler,
            profile_handler,
        }
    }

    /// Starts publishing writes made by other processes sharing the database.
    pub async fn start_storage_watcher(&self) -> anyhow::Result<StorageWatcherHandle> {
        let feed: Arc<dyn ChangeFeed> = self.store.clone();
        let watcher = StorageWatcher::new(
            feed,
            Arc::clone(&self.bus),
            Duration::from_millis(self.config.sync.storage_watch_ms),
        );
        Ok(watcher.spawn().await?)
    }

    pub fn work_poll_interval(&self) -> Option<Duration> {
        poll_interval(self.config.sync.work_poll_secs)
    }

    pub fn profile_poll_interval(&self) -> Option<Duration> {
        poll_interval(self.config.sync.profile_poll_secs)
    }
}

fn build_wallet(config: &AppConfig) -> anyhow::Result<Option<Arc<dyn WalletProvider>>> {
    let Some(raw) = config.chain.rpc_url.as_deref() else {
        return Ok(None);
    };
    let url = url::Url::parse(raw)?;
    let client = JsonRpcClient::new(url, Duration::from_secs(config.chain.request_timeout_secs))
        .map_err(|e| anyhow::anyhow!("Failed to create RPC client: {e}"))?;
    Ok(Some(Arc::new(JsonRpcWallet::new(client))))
}

// 0 はポーリング無効
fn poll_interval(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
