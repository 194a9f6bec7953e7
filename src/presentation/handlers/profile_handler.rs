use super::{optional_account, resolve_account, resolve_local_account};
use crate::{
    application::services::{ChainReader, LocalSideStore, MutationService},
    domain::value_objects::store_key::checksum_address,
    presentation::dto::{
        profile_dto::{AccountResponse, GetProfileRequest, ProfileResponse, UpdateProfileRequest},
        Validate,
    },
    shared::error::AppError,
};
use std::sync::Arc;

pub struct ProfileHandler {
    reader: Arc<ChainReader>,
    side_store: Arc<LocalSideStore>,
    mutation: Arc<MutationService>,
}

impl ProfileHandler {
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

    pub async fn get_profile(&self, request: GetProfileRequest) -> Result<ProfileResponse, AppError> {
        request.validate().map_err(AppError::ValidationError)?;
        let address = resolve_local_account(&self.reader, request.address.as_deref()).await?;
        let stored = self.side_store.find_profile(&address).await?;

        Ok(ProfileResponse {
            address: checksum_address(&address),
            exists: stored.is_some(),
            profile: stored.unwrap_or_default(),
        })
    }

    pub async fn update_profile(
        &self,
        account: Option<&str>,
        request: UpdateProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let address = resolve_local_account(&self.reader, account).await?;
        request.validate().map_err(AppError::ValidationError)?;

        let current = self.side_store.load_profile(&address).await?;
        let edited = request
            .apply_to(current)
            .map_err(AppError::ValidationError)?;
        let saved = self.mutation.save_profile(address, &edited).await?;

        Ok(ProfileResponse {
            address: checksum_address(&address),
            exists: true,
            profile: saved,
        })
    }

    pub async fn account(&self, account: Option<&str>) -> Result<AccountResponse, AppError> {
        let address = match optional_account(&self.reader, account).await? {
            Some(address) => address,
            None => resolve_account(&self.reader, None).await?,
        };
        let balance = self.reader.balance(address).await?;
        let chain_id = self.reader.chain_id().await?;

        Ok(AccountResponse {
            address: checksum_address(&address),
            balance_eth: balance.map(|b| b.to_string()),
            chain_id,
        })
    }
}
