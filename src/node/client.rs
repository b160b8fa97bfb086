//! Chain node client with timeout and error handling.
//!
//! # Responsibilities
//! - Talk to the Tendermint RPC endpoint (status, broadcast, tx lookup)
//! - Talk to the Cosmos REST endpoint (accounts, balances, contract queries)
//! - Bound every request with the configured timeout
//! - Translate transport failures into `NodeError`

use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::timeout;
use url::Url;

use crate::chain::types::{ChainConfig, Coin};
use crate::config::schema::NodeConfig;
use crate::node::types::{
    BaseAccount, BroadcastResponse, NodeError, NodeResult, NodeStatus, StatusResult, TxResponse,
};

/// Parse an endpoint, dialling `tcp://` RPC addresses over HTTP.
pub fn normalize_endpoint(endpoint: &str) -> NodeResult<Url> {
    let endpoint = endpoint.trim();
    let rewritten = match endpoint.strip_prefix("tcp://") {
        Some(rest) => format!("http://{}", rest),
        None => endpoint.to_string(),
    };
    let url = Url::parse(&rewritten).map_err(|_| NodeError::InvalidEndpoint(endpoint.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(NodeError::InvalidEndpoint(endpoint.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<String>,
}

impl RpcErrorBody {
    fn is_not_found(&self) -> bool {
        self.message.contains("not found")
            || self.data.as_deref().is_some_and(|d| d.contains("not found"))
    }

    fn into_error(self) -> NodeError {
        let message = match self.data {
            Some(data) if !data.is_empty() => format!("{} ({})", self.message, data),
            _ => self.message,
        };
        NodeError::Rpc {
            code: self.code,
            message,
        }
    }
}

/// HTTP client for one chain node (RPC + REST).
#[derive(Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    rpc_url: Url,
    rest_url: Url,
    chain_id: String,
    timeout_duration: Duration,
}

impl NodeClient {
    /// Create a new node client. No I/O happens here.
    pub fn new(chain: &ChainConfig, node: &NodeConfig) -> NodeResult<Self> {
        let timeout_duration = Duration::from_secs(node.rpc_timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout_duration)
            .build()
            .map_err(|e| NodeError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            rpc_url: normalize_endpoint(&chain.rpc_endpoint)?,
            rest_url: normalize_endpoint(&chain.rest_endpoint)?,
            chain_id: chain.chain_id.clone(),
            timeout_duration,
        })
    }

    /// Chain ID this client expects the node to serve.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_duration.as_secs()
    }

    /// Get the node status.
    pub async fn status(&self) -> NodeResult<NodeStatus> {
        let url = endpoint(&self.rpc_url, &["status"])?;
        let result: StatusResult = self
            .rpc_get(url)
            .await?
            .ok_or_else(|| NodeError::Decode("status result missing".to_string()))?;
        Ok(result.into())
    }

    /// Verify the node serves the configured chain.
    pub async fn verify_chain_id(&self) -> NodeResult<NodeStatus> {
        let status = self.status().await?;
        if status.network != self.chain_id {
            return Err(NodeError::ChainMismatch {
                expected: self.chain_id.clone(),
                actual: status.network,
            });
        }
        Ok(status)
    }

    /// Get account number and sequence. `None` if the chain has never seen
    /// the address.
    pub async fn account(&self, address: &str) -> NodeResult<Option<BaseAccount>> {
        let url = endpoint(&self.rest_url, &["cosmos", "auth", "v1beta1", "accounts", address])?;
        let Some(body) = self.rest_get::<Value>(url).await? else {
            return Ok(None);
        };

        let account = body
            .get("account")
            .and_then(find_base_account)
            .ok_or_else(|| NodeError::Decode("account record missing account_number".to_string()))?;

        serde_json::from_value(account.clone())
            .map(Some)
            .map_err(|e| NodeError::Decode(e.to_string()))
    }

    /// Get the balance of one denomination. Unknown accounts hold zero.
    pub async fn balance(&self, address: &str, denom: &str) -> NodeResult<Coin> {
        #[derive(Deserialize)]
        struct BalanceBody {
            balance: Option<Coin>,
        }

        let mut url = endpoint(
            &self.rest_url,
            &["cosmos", "bank", "v1beta1", "balances", address, "by_denom"],
        )?;
        url.query_pairs_mut().append_pair("denom", denom);

        let balance = self
            .rest_get::<BalanceBody>(url)
            .await?
            .and_then(|b| b.balance)
            .unwrap_or_else(|| Coin::new(denom, 0));
        Ok(balance)
    }

    /// Run a CosmWasm smart query against a contract.
    pub async fn smart_query(&self, contract: &str, query: &Value) -> NodeResult<Value> {
        #[derive(Deserialize)]
        struct SmartBody {
            data: Value,
        }

        let encoded = STANDARD.encode(serde_json::to_vec(query).map_err(|e| NodeError::Decode(e.to_string()))?);
        let url = endpoint(
            &self.rest_url,
            &["cosmwasm", "wasm", "v1", "contract", contract, "smart", &encoded],
        )?;

        self.rest_get::<SmartBody>(url)
            .await?
            .map(|b| b.data)
            .ok_or_else(|| NodeError::Status {
                status: 404,
                body: format!("contract {} not found", contract),
            })
    }

    /// Submit signed transaction bytes and wait for mempool admission only.
    pub async fn broadcast_tx_sync(&self, tx_bytes: &[u8]) -> NodeResult<BroadcastResponse> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": uuid::Uuid::new_v4().to_string(),
            "method": "broadcast_tx_sync",
            "params": { "tx": STANDARD.encode(tx_bytes) },
        });

        let envelope: RpcEnvelope<BroadcastResponse> = self
            .bounded(async {
                let response = self.http.post(self.rpc_url.clone()).json(&request).send().await?;
                decode_rpc_response(response).await
            })
            .await?;

        match (envelope.result, envelope.error) {
            (Some(result), _) => Ok(result),
            (None, Some(error)) => Err(error.into_error()),
            (None, None) => Err(NodeError::Decode("broadcast result missing".to_string())),
        }
    }

    /// Look up an included transaction by hash. `None` while it is not in a
    /// block yet.
    pub async fn tx(&self, hash: &str) -> NodeResult<Option<TxResponse>> {
        let mut url = endpoint(&self.rpc_url, &["tx"])?;
        let hash = hash.trim_start_matches("0x");
        url.query_pairs_mut().append_pair("hash", &format!("0x{}", hash));

        match self.rpc_get::<TxResponse>(url).await {
            Ok(found) => Ok(found),
            Err(NodeError::Rpc { message, .. }) if message.contains("not found") => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn bounded<T, F>(&self, fut: F) -> NodeResult<T>
    where
        F: Future<Output = NodeResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(result) => result,
            Err(_) => Err(NodeError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    async fn rpc_get<T: DeserializeOwned>(&self, url: Url) -> NodeResult<Option<T>> {
        let envelope: RpcEnvelope<T> = self
            .bounded(async {
                let response = self.http.get(url).send().await?;
                decode_rpc_response(response).await
            })
            .await?;

        match (envelope.result, envelope.error) {
            (Some(result), _) => Ok(Some(result)),
            (None, Some(error)) if error.is_not_found() => Err(NodeError::Rpc {
                code: error.code,
                message: "not found".to_string(),
            }),
            (None, Some(error)) => Err(error.into_error()),
            (None, None) => Ok(None),
        }
    }

    async fn rest_get<T: DeserializeOwned>(&self, url: Url) -> NodeResult<Option<T>> {
        self.bounded(async {
            let response = self.http.get(url).send().await?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // gRPC gateway reports NotFound (code 5) with other HTTP statuses on some versions
                if serde_json::from_str::<Value>(&body)
                    .ok()
                    .and_then(|v| v.get("code").and_then(Value::as_i64))
                    == Some(5)
                {
                    return Ok(None);
                }
                return Err(NodeError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(Some(response.json::<T>().await?))
        })
        .await
    }
}

impl std::fmt::Debug for NodeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("rest_url", &self.rest_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// JSON-RPC errors arrive with HTTP 500 on some Tendermint versions, so the
/// body is decoded whenever it parses.
async fn decode_rpc_response<T: DeserializeOwned>(response: reqwest::Response) -> NodeResult<RpcEnvelope<T>> {
    let status = response.status();
    let body = response.text().await?;
    match serde_json::from_str::<RpcEnvelope<T>>(&body) {
        Ok(envelope) if envelope.result.is_some() || envelope.error.is_some() => Ok(envelope),
        _ if !status.is_success() => Err(NodeError::Status {
            status: status.as_u16(),
            body,
        }),
        Ok(envelope) => Ok(envelope),
        Err(e) => Err(NodeError::Decode(e.to_string())),
    }
}

fn endpoint(base: &Url, segments: &[&str]) -> NodeResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| NodeError::InvalidEndpoint(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Vesting and module accounts nest the base account; find the object that
/// carries `account_number`.
fn find_base_account(value: &Value) -> Option<&Value> {
    let object = value.as_object()?;
    if object.contains_key("account_number") {
        return Some(value);
    }
    object.values().find_map(find_base_account)
}
