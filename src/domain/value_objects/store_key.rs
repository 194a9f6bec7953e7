use alloy_primitives::Address;
use std::fmt;

pub const PROFILE_PREFIX: &str = "profile_";
pub const SUBMITTED_WORK_PREFIX: &str = "submittedWork_";
pub const FEEDBACK_PREFIX: &str = "feedback_";

/// Lowercase `0x…` form used when writing keys.
pub fn canonical_address(address: &Address) -> String {
    address.to_checksum(None).to_lowercase()
}

/// EIP-55 form, as contract reads hand addresses back.
pub fn checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKeyKind {
    Profile,
    SubmittedWork,
    Feedback,
}

/// Key into the local side store.
///
/// Layout is shared with stores written by earlier clients and must not change:
/// `profile_<address>`, `submittedWork_<jobId>_<address>`, `feedback_<jobId>_<address>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn profile(address: &Address) -> Self {
        Self::profile_raw(&canonical_address(address))
    }

    pub fn submitted_work(job_id: u64, address: &Address) -> Self {
        Self::submitted_work_raw(job_id, &canonical_address(address))
    }

    pub fn feedback(job_id: u64, address: &Address) -> Self {
        Self(format!("{FEEDBACK_PREFIX}{job_id}_{}", canonical_address(address)))
    }

    /// Key built from an address string exactly as given, whatever its casing.
    pub fn profile_raw(address: &str) -> Self {
        Self(format!("{PROFILE_PREFIX}{address}"))
    }

    pub fn submitted_work_raw(job_id: u64, address: &str) -> Self {
        Self(format!("{SUBMITTED_WORK_PREFIX}{job_id}_{address}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Segments of a stored key. `job_id` is kept as the raw segment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKey<'a> {
    pub kind: StoreKeyKind,
    pub job_id: Option<&'a str>,
    pub address: &'a str,
}

impl<'a> ParsedKey<'a> {
    pub fn parse(key: &'a str) -> Option<Self> {
        if let Some(address) = key.strip_prefix(PROFILE_PREFIX) {
            return Some(Self {
                kind: StoreKeyKind::Profile,
                job_id: None,
                address,
            });
        }
        let (kind, rest) = if let Some(rest) = key.strip_prefix(SUBMITTED_WORK_PREFIX) {
            (StoreKeyKind::SubmittedWork, rest)
        } else if let Some(rest) = key.strip_prefix(FEEDBACK_PREFIX) {
            (StoreKeyKind::Feedback, rest)
        } else {
            return None;
        };
        let (job_id, address) = rest.split_once('_')?;
        Some(Self {
            kind,
            job_id: Some(job_id),
            address,
        })
    }

    pub fn is_for_address(&self, address: &Address) -> bool {
        same_address(self.address, &canonical_address(address))
    }

    pub fn is_for_job(&self, job_id: u64) -> bool {
        self.job_id == Some(job_id.to_string().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn keys_use_lowercase_address() {
        let address = Address::from_str(ADDR).unwrap();
        assert_eq!(
            StoreKey::profile(&address).as_str(),
            "profile_0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(
            StoreKey::submitted_work(7, &address).as_str(),
            "submittedWork_7_0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(
            StoreKey::feedback(0, &address).as_str(),
            "feedback_0_0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
        );
        assert_eq!(checksum_address(&address), ADDR);
    }

    #[test]
    fn parses_each_layout() {
        let key = format!("submittedWork_12_{ADDR}");
        let parsed = ParsedKey::parse(&key).unwrap();
        assert_eq!(parsed.kind, StoreKeyKind::SubmittedWork);
        assert_eq!(parsed.job_id, Some("12"));
        assert_eq!(parsed.address, ADDR);
        assert!(parsed.is_for_job(12));
        assert!(parsed.is_for_address(&Address::from_str(ADDR).unwrap()));

        let parsed = ParsedKey::parse("profile_0xabc").unwrap();
        assert_eq!(parsed.kind, StoreKeyKind::Profile);
        assert_eq!(parsed.job_id, None);

        assert!(ParsedKey::parse("theme").is_none());
        assert!(ParsedKey::parse("feedback_nounderscore").is_none());
    }
}
