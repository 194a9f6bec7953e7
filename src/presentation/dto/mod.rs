pub mod job_dto;
pub mod profile_dto;
pub mod work_dto;

use crate::shared::AppError;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub error_code: Option<String>,
    pub error_details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
            error_details: None,
        }
    }

    pub fn from_app_error(error: AppError) -> Self {
        let error_details = match &error {
            AppError::Transaction(failure) => serde_json::to_value(failure).ok(),
            AppError::Provider(err) => Some(json!({ "code": err.code, "message": err.raw_message() })),
            _ => None,
        };

        Self {
            success: false,
            data: None,
            error: Some(error.user_message()),
            error_code: Some(error.code().to_string()),
            error_details,
        }
    }

    pub fn from_result(result: crate::shared::Result<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_app_error(err),
        }
    }
}

// バリデーショントレイト
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, String> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| format!("{field} is not a valid address: {value}"))
}
