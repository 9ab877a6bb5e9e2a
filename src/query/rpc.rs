// src/query/rpc.rs
use crate::error::{TrustError, TrustResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// On-chain bytecode lookup. An empty result (`"0x"`) means the address is an
/// externally-owned account; anything else means a contract.
#[async_trait]
pub trait CodeProvider: Send + Sync {
    async fn get_code(&self, rpc_url: &str, address: &str) -> TrustResult<String>;

    async fn is_contract(&self, rpc_url: &str, address: &str) -> TrustResult<bool> {
        let code = self.get_code(rpc_url, address).await?;
        Ok(!matches!(code.as_str(), "" | "0x"))
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// `eth_getCode` over plain JSON-RPC.
#[derive(Clone)]
pub struct JsonRpcCodeProvider {
    client: Client,
}

impl JsonRpcCodeProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for JsonRpcCodeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CodeProvider for JsonRpcCodeProvider {
    async fn get_code(&self, rpc_url: &str, address: &str) -> TrustResult<String> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_getCode",
            "params": [address, "latest"],
        });

        let response = self
            .client
            .post(rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TrustError::RpcFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrustError::RpcFailure(format!("HTTP {}", status)));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| TrustError::RpcFailure(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(TrustError::RpcFailure(format!(
                "eth_getCode error {}: {}",
                error.code, error.message
            )));
        }

        parsed
            .result
            .ok_or_else(|| TrustError::RpcFailure("eth_getCode returned no result".to_string()))
    }
}
