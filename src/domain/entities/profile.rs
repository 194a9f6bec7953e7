use crate::shared::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileRole {
    #[default]
    Freelancer,
    ClientPoster,
}

impl ProfileRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Freelancer => "Freelancer",
            ProfileRole::ClientPoster => "Client Poster",
        }
    }
}

impl From<String> for ProfileRole {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "client poster" | "client" | "clientposter" | "client_poster" => ProfileRole::ClientPoster,
            _ => ProfileRole::Freelancer,
        }
    }
}

impl From<ProfileRole> for String {
    fn from(role: ProfileRole) -> Self {
        role.as_str().to_string()
    }
}

impl Serialize for ProfileRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProfileRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(String::deserialize(deserializer)?.into())
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form profile blob kept in the side store under `profile_<address>`.
///
/// Field names match the stored JSON. Missing fields fall back to defaults, so partially
/// written records from older clients still load. Saving overwrites the known fields and keeps
/// any other keys of the stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub role: ProfileRole,
    pub bio: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    pub hourly_rate: String,
    pub experience_level: String,
    pub skills: String,
    pub portfolio_url: String,
    pub projects: String,
    pub company_name: String,
    pub company_website: String,
    pub company_description: String,
    /// Appended to by job posters; not editable by the owner.
    pub feedback: String,
    pub linkedin_url: String,
    pub github_url: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: ProfileRole::Freelancer,
            bio: String::new(),
            location: String::new(),
            email: String::new(),
            phone: String::new(),
            hourly_rate: String::new(),
            experience_level: "Beginner".to_string(),
            skills: String::new(),
            portfolio_url: String::new(),
            projects: String::new(),
            company_name: String::new(),
            company_website: String::new(),
            company_description: String::new(),
            feedback: String::new(),
            linkedin_url: String::new(),
            github_url: String::new(),
        }
    }
}

pub const EXPERIENCE_LEVELS: [&str; 4] = ["Beginner", "Intermediate", "Advanced", "Expert"];

impl Profile {
    /// Sets one user-editable field by its stored (camelCase) name.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), AppError> {
        let value = value.to_string();
        match field {
            "name" => self.name = value,
            "role" => self.role = ProfileRole::from(value),
            "bio" => self.bio = value,
            "location" => self.location = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "hourlyRate" => self.hourly_rate = value,
            "experienceLevel" => {
                if !EXPERIENCE_LEVELS.contains(&value.as_str()) {
                    return Err(AppError::ValidationError(format!(
                        "experienceLevel must be one of {}",
                        EXPERIENCE_LEVELS.join(", ")
                    )));
                }
                self.experience_level = value;
            }
            "skills" => self.skills = value,
            "portfolioUrl" => self.portfolio_url = value,
            "projects" => self.projects = value,
            "companyName" => self.company_name = value,
            "companyWebsite" => self.company_website = value,
            "companyDescription" => self.company_description = value,
            "linkedinUrl" => self.linkedin_url = value,
            "githubUrl" => self.github_url = value,
            "feedback" => {
                return Err(AppError::ValidationError(
                    "feedback is written by clients and cannot be edited".to_string(),
                ));
            }
            other => {
                return Err(AppError::ValidationError(format!(
                    "Unknown profile field: {other}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Profile::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"name":"Ada","role":"Client Poster","unknown":1}"#).unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.role, ProfileRole::ClientPoster);
        assert_eq!(profile.experience_level, "Beginner");
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let mut profile = Profile::default();
        profile.hourly_rate = "40".into();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["hourlyRate"], "40");
        assert_eq!(json["role"], "Freelancer");
        assert!(json.get("linkedinUrl").is_some());
    }

    #[test]
    fn feedback_is_not_user_editable() {
        let mut profile = Profile::default();
        assert!(profile.set_field("feedback", "great").is_err());
        assert!(profile.set_field("experienceLevel", "Guru").is_err());
        profile.set_field("githubUrl", "https://github.com/ada").unwrap();
        assert_eq!(profile.github_url, "https://github.com/ada");
    }
}
