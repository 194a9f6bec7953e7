use crate::shared::ProviderError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;
use url::Url;

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl From<RpcErrorObject> for ProviderError {
    fn from(err: RpcErrorObject) -> Self {
        let mut provider = ProviderError::rpc(err.code, err.message);
        let Some(data) = err.data else {
            return provider;
        };
        match &data {
            Value::String(s) if !s.starts_with("0x") => {
                provider = provider.with_data_message(s.clone());
            }
            Value::Object(map) => {
                if let Some(message) = map.get("message").and_then(Value::as_str) {
                    provider = provider.with_data_message(message);
                }
                if let Some(reason) = find_reason(&data) {
                    provider = provider.with_reason(reason);
                }
            }
            _ => {}
        }
        provider
    }
}

/// Ganache nests the revert reason one level down, keyed by transaction hash.
fn find_reason(data: &Value) -> Option<String> {
    let map = data.as_object()?;
    if let Some(reason) = map.get("reason").and_then(Value::as_str) {
        return Some(reason.to_string());
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|inner| inner.get("reason").and_then(Value::as_str))
        .map(str::to_string)
}

/// Minimal JSON-RPC 2.0 client over HTTP.
pub struct JsonRpcClient {
    http: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProviderError::new(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, ProviderError>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        trace!(id, method, "rpc request");
        let response = self
            .http
            .post(self.url.clone())
            .json(&RpcRequest {
                jsonrpc: "2.0",
                id,
                method,
                params,
            })
            .send()
            .await
            .map_err(|err| ProviderError::new(format!("{method} request failed: {err}")))?;

        let status = response.status();
        let body: RpcResponse = response.json().await.map_err(|err| {
            ProviderError::new(format!("{method} returned an invalid response ({status}): {err}"))
        })?;
        decode_response(method, body)
    }
}

fn decode_response<R: DeserializeOwned>(method: &str, body: RpcResponse) -> Result<R, ProviderError> {
    if let Some(error) = body.error {
        return Err(error.into());
    }
    serde_json::from_value(body.result.unwrap_or(Value::Null))
        .map_err(|err| ProviderError::new(format!("{method} result could not be decoded: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::{INTERNAL_RPC_CODE, METHOD_NOT_FOUND_CODE};
    use serde_json::json;

    fn response(value: Value) -> RpcResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn result_is_decoded() {
        let body = response(json!({"jsonrpc": "2.0", "id": 1, "result": "0x539"}));
        let value: String = decode_response("eth_chainId", body).unwrap();
        assert_eq!(value, "0x539");

        let body = response(json!({"jsonrpc": "2.0", "id": 1, "result": null}));
        let value: Option<String> = decode_response("eth_getTransactionReceipt", body).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn ganache_revert_reason_is_extracted() {
        let body = response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": INTERNAL_RPC_CODE,
                "message": "VM Exception while processing transaction: revert",
                "data": {
                    "0xabc": {"error": "revert", "reason": "Only job poster can review"},
                    "message": "VM Exception while processing transaction: revert Only job poster can review"
                }
            }
        }));
        let err = decode_response::<String>("eth_sendTransaction", body).unwrap_err();
        assert_eq!(err.code, Some(INTERNAL_RPC_CODE));
        assert_eq!(err.reason.as_deref(), Some("Only job poster can review"));
        assert!(err.raw_message().contains("Only job poster can review"));
    }

    #[test]
    fn method_not_found_is_recognised() {
        let body = response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": METHOD_NOT_FOUND_CODE, "message": "Method eth_requestAccounts not supported."}
        }));
        let err = decode_response::<Vec<String>>("eth_requestAccounts", body).unwrap_err();
        assert!(err.is_method_not_found());
    }
}
