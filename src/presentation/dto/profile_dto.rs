use super::{parse_address, Validate};
use crate::domain::entities::Profile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetProfileRequest {
    pub address: Option<String>,
}

impl Validate for GetProfileRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(address) = &self.address {
            parse_address("address", address)?;
        }
        Ok(())
    }
}

/// Field edits applied on top of the stored profile, as `(field, value)` pairs using the
/// stored JSON names.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub fields: Vec<(String, String)>,
}

impl UpdateProfileRequest {
    pub fn apply_to(&self, mut profile: Profile) -> Result<Profile, String> {
        for (field, value) in &self.fields {
            profile
                .set_field(field, value)
                .map_err(|e| e.user_message())?;
        }
        Ok(profile)
    }
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("No profile fields given".to_string());
        }
        self.apply_to(Profile::default()).map(|_| ())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub address: String,
    pub exists: bool,
    pub profile: Profile,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub address: String,
    pub balance_eth: Option<String>,
    pub chain_id: Option<u64>,
}
