use crate::application::ports::key_value_store::KeyValueStore;
use crate::domain::entities::{FeedbackEntry, FeedbackRecord, Profile, SubmittedWork};
use crate::domain::value_objects::store_key::{checksum_address, ParsedKey, StoreKeyKind};
use crate::domain::value_objects::StoreKey;
use crate::shared::AppError;
use alloy_primitives::Address;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Profiles, submitted work and feedback kept next to the chain.
///
/// Writes always use the lowercase key. Reads also accept keys written with the
/// checksummed address or any other casing, so data from older clients is still found.
pub struct LocalSideStore {
    store: Arc<dyn KeyValueStore>,
}

impl LocalSideStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Key the profile of `address` is stored under, if any.
    pub async fn find_profile_key(&self, address: &Address) -> Result<Option<String>, AppError> {
        let candidates = [
            StoreKey::profile(address),
            StoreKey::profile_raw(&checksum_address(address)),
        ];
        for key in candidates {
            if self.store.get(key.as_str()).await?.is_some() {
                return Ok(Some(key.as_str().to_string()));
            }
        }

        let target = *address;
        let keys = self
            .store
            .enumerate_keys(&move |key: &str| {
                ParsedKey::parse(key).is_some_and(|parsed| {
                    parsed.kind == StoreKeyKind::Profile && parsed.is_for_address(&target)
                })
            })
            .await?;
        Ok(keys.into_iter().next())
    }

    /// Stored profile, or `None` when there is none or it cannot be parsed.
    pub async fn find_profile(&self, address: &Address) -> Result<Option<Profile>, AppError> {
        let Some(key) = self.find_profile_key(address).await? else {
            return Ok(None);
        };
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<Profile>(&raw) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                warn!(key = %key, error = %err, "Ignoring malformed profile");
                Ok(None)
            }
        }
    }

    pub async fn load_profile(&self, address: &Address) -> Result<Profile, AppError> {
        Ok(self.find_profile(address).await?.unwrap_or_default())
    }

    /// Writes `profile` under the lowercase key. Keys of the stored document that
    /// `Profile` does not know about are kept.
    pub async fn save_profile(&self, address: &Address, profile: &Profile) -> Result<(), AppError> {
        let key = StoreKey::profile(address);
        let mut document = match self.stored_document(address).await? {
            Some((found, raw)) => parse_document(&found, &raw).unwrap_or_else(|err| {
                warn!(key = %found, error = %err, "Replacing unreadable profile");
                Map::new()
            }),
            None => Map::new(),
        };
        if let Value::Object(fields) = serde_json::to_value(profile)? {
            document.extend(fields);
        }
        let raw = serde_json::to_string(&Value::Object(document))?;
        self.store.set(key.as_str(), &raw).await?;
        debug!(key = %key, "Saved profile");
        Ok(())
    }

    /// Feedback text currently stored on the profile of `address`.
    /// Fails when the profile exists but its feedback cannot be read.
    pub async fn stored_feedback(&self, address: &Address) -> Result<String, AppError> {
        match self.stored_document(address).await? {
            Some((key, raw)) => feedback_text(&key, &parse_document(&key, &raw)?),
            None => Ok(String::new()),
        }
    }

    /// Appends a feedback block to the freelancer's profile, creating the profile if needed.
    /// Only the `feedback` field is touched, every other stored field is written back as is.
    /// The profile is written back under the key it was found at. Returns that key.
    pub async fn append_profile_feedback(
        &self,
        address: &Address,
        entry: &FeedbackEntry,
    ) -> Result<String, AppError> {
        let (key, mut document) = match self.stored_document(address).await? {
            Some((key, raw)) => {
                let document = parse_document(&key, &raw)?;
                (key, document)
            }
            None => {
                let fresh = match serde_json::to_value(Profile::default())? {
                    Value::Object(fields) => fields,
                    _ => Map::new(),
                };
                (StoreKey::profile(address).as_str().to_string(), fresh)
            }
        };
        let feedback = entry.append_to(&feedback_text(&key, &document)?);
        document.insert("feedback".to_string(), Value::String(feedback));
        self.store
            .set(&key, &serde_json::to_string(&Value::Object(document))?)
            .await?;
        Ok(key)
    }

    async fn stored_document(
        &self,
        address: &Address,
    ) -> Result<Option<(String, String)>, AppError> {
        let Some(key) = self.find_profile_key(address).await? else {
            return Ok(None);
        };
        Ok(self.store.get(&key).await?.map(|raw| (key, raw)))
    }

    /// Trimmed work URL recorded for `(job_id, applicant)`.
    pub async fn submitted_work(
        &self,
        job_id: u64,
        applicant: &Address,
    ) -> Result<Option<String>, AppError> {
        let candidates = [
            StoreKey::submitted_work(job_id, applicant),
            StoreKey::submitted_work_raw(job_id, &checksum_address(applicant)),
        ];
        for key in candidates {
            if let Some(url) = non_blank(self.store.get(key.as_str()).await?) {
                return Ok(Some(url));
            }
        }

        let target = *applicant;
        let keys = self
            .store
            .enumerate_keys(&move |key: &str| {
                ParsedKey::parse(key).is_some_and(|parsed| {
                    parsed.kind == StoreKeyKind::SubmittedWork
                        && parsed.is_for_job(job_id)
                        && parsed.is_for_address(&target)
                })
            })
            .await?;
        for key in keys {
            if let Some(url) = non_blank(self.store.get(&key).await?) {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }

    pub async fn record_submitted_work(&self, work: &SubmittedWork) -> Result<StoreKey, AppError> {
        let key = StoreKey::submitted_work(work.job_id, &work.applicant);
        self.store.set(key.as_str(), work.work_url.trim()).await?;
        Ok(key)
    }

    pub async fn record_feedback(&self, record: &FeedbackRecord) -> Result<StoreKey, AppError> {
        let key = StoreKey::feedback(record.job_id, &record.applicant);
        self.store
            .set(key.as_str(), &serde_json::to_string(record)?)
            .await?;
        Ok(key)
    }

    pub async fn feedback(
        &self,
        job_id: u64,
        applicant: &Address,
    ) -> Result<Option<FeedbackRecord>, AppError> {
        let key = StoreKey::feedback(job_id, applicant);
        let Some(raw) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(key = %key, error = %err, "Ignoring malformed feedback record");
                Ok(None)
            }
        }
    }
}

fn parse_document(key: &str, raw: &str) -> Result<Map<String, Value>, AppError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(AppError::DeserializationError(format!(
            "Profile at {key} is not a JSON object"
        ))),
        Err(err) => Err(AppError::DeserializationError(format!(
            "Profile at {key} is malformed: {err}"
        ))),
    }
}

fn feedback_text(key: &str, document: &Map<String, Value>) -> Result<String, AppError> {
    match document.get("feedback") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(AppError::DeserializationError(format!(
            "Feedback of profile at {key} is not text"
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
