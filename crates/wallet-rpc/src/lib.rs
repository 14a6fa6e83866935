//! wallet-rpc
//!
//! Minimal, blocking JSON-RPC client for `monero-wallet-rpc`.
//! Methods used:
//! - get_height
//! - get_transfers
//! - incoming_transfers
//! - get_payments
//! - get_transfer_by_txid
//!
//! Each method returns wire DTOs with the wallet-rpc field names; the
//! `convert` module turns individual entries into partial `wallet-model`
//! records so aggregation can fold overlapping views through the merge
//! engine. Absent wire fields stay absent (`Option` + defaults), never
//! zero, so the model can tell "unknown" from "present and zero".

use base64::{engine::general_purpose, Engine as _};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub mod convert;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url parse: {0}")]
    Url(#[from] url::ParseError),
    #[error("rpc returned error: {0}")]
    Node(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("wallet rpc error (method {method}) code={code} message={message}")]
    Wallet {
        method: String,
        code: i64,
        message: String,
    },
    #[error("wallet rpc missing result for method {0}")]
    ResultMissing(String),
}

#[derive(Clone)]
pub struct WalletRpc {
    base: Url,
    client: Client,
    auth_header: Option<HeaderValue>,
}

impl WalletRpc {
    /// Create a new wallet client. `base` like "http://127.0.0.1:18083".
    /// Optional basic auth via (user, pass). If None, no Authorization header is sent.
    pub fn new(base: &str, auth: Option<(String, String)>) -> Result<Self, RpcError> {
        let base = Url::parse(base)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()?;

        let auth_header = match auth {
            Some((user, pass)) => {
                let token = format!("{user}:{pass}");
                let enc = general_purpose::STANDARD.encode(token);
                let header_value = HeaderValue::from_str(&format!("Basic {}", enc))
                    .map_err(|e| RpcError::Decode(format!("auth header encode: {e}")))?;
                Some(header_value)
            }
            None => None,
        };

        Ok(Self {
            base,
            client,
            auth_header,
        })
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(a) = &self.auth_header {
            h.insert(AUTHORIZATION, a.clone());
        }
        h
    }

    fn call<P, R>(&self, method: &str, params: &P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        #[derive(Serialize)]
        struct Request<'a, T> {
            jsonrpc: &'a str,
            id: &'a str,
            method: &'a str,
            params: &'a T,
        }

        #[derive(Deserialize)]
        struct Envelope {
            result: Option<Value>,
            error: Option<WalletError>,
        }

        #[derive(Deserialize)]
        struct WalletError {
            code: i64,
            message: String,
        }

        let url = self.base.join("/json_rpc")?;
        let req = Request {
            jsonrpc: "2.0",
            id: "0",
            method,
            params,
        };
        let resp = self
            .client
            .post(url)
            .headers(self.auth_headers())
            .json(&req)
            .send()?;
        if !resp.status().is_success() {
            return Err(RpcError::Node(format!("wallet rpc HTTP {}", resp.status())));
        }
        let envelope: Envelope = resp.json()?;
        if let Some(err) = envelope.error {
            return Err(RpcError::Wallet {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }
        let result = envelope
            .result
            .ok_or_else(|| RpcError::ResultMissing(method.to_string()))?;
        serde_json::from_value::<R>(result)
            .map_err(|e| RpcError::Decode(format!("{method} decode: {e}")))
    }

    /// JSON-RPC `get_height` (wallet's synced height).
    pub fn get_height(&self) -> Result<u64, RpcError> {
        #[derive(Deserialize)]
        struct R {
            height: u64,
        }
        let r: R = self.call("get_height", &serde_json::json!({}))?;
        Ok(r.height)
    }

    /// JSON-RPC `get_transfers`.
    pub fn get_transfers(&self, params: &GetTransfersParams) -> Result<GetTransfersResult, RpcError> {
        self.call("get_transfers", params)
    }

    /// JSON-RPC `incoming_transfers`.
    pub fn incoming_transfers(
        &self,
        params: &IncomingTransfersParams,
    ) -> Result<IncomingTransfersResult, RpcError> {
        self.call("incoming_transfers", params)
    }

    /// JSON-RPC `get_payments` for one payment id.
    pub fn get_payments(&self, payment_id: &str) -> Result<GetPaymentsResult, RpcError> {
        #[derive(Serialize)]
        struct Params<'a> {
            payment_id: &'a str,
        }
        self.call("get_payments", &Params { payment_id })
    }

    /// JSON-RPC `get_transfer_by_txid`.
    pub fn get_transfer_by_txid(
        &self,
        txid: &str,
        account_index: Option<u32>,
    ) -> Result<GetTransferByTxidResult, RpcError> {
        #[derive(Serialize)]
        struct Params<'a> {
            txid: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            account_index: Option<u32>,
        }
        self.call(
            "get_transfer_by_txid",
            &Params {
                txid,
                account_index,
            },
        )
    }
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct GetTransfersParams {
    #[serde(rename = "in")]
    pub in_: bool,
    pub out: bool,
    pub pending: bool,
    pub failed: bool,
    pub pool: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaddr_indices: Option<Vec<u32>>,
}

impl GetTransfersParams {
    /// Everything the wallet reports, confirmed and pool alike.
    pub fn all(account_index: Option<u32>) -> Self {
        GetTransfersParams {
            in_: true,
            out: true,
            pending: true,
            failed: false,
            pool: true,
            account_index,
            subaddr_indices: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GetTransfersResult {
    #[serde(rename = "in")]
    pub in_: Vec<TransferEntry>,
    pub out: Vec<TransferEntry>,
    pub pending: Vec<TransferEntry>,
    pub failed: Vec<TransferEntry>,
    pub pool: Vec<TransferEntry>,
}

impl GetTransfersResult {
    /// All entries across the per-direction buckets, in bucket order.
    pub fn entries(&self) -> impl Iterator<Item = &TransferEntry> {
        self.in_
            .iter()
            .chain(self.out.iter())
            .chain(self.pending.iter())
            .chain(self.failed.iter())
            .chain(self.pool.iter())
    }
}

/// One `get_transfers` / `get_transfer_by_txid` entry.
///
/// Numeric fields use `Option`, not `#[serde(default)]` zeros: a missing
/// amount must stay "unknown" for field reconciliation.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TransferEntry {
    pub txid: Option<String>,
    pub address: Option<String>,
    pub amount: Option<u64>,
    pub fee: Option<u64>,
    pub height: Option<u64>,
    pub timestamp: Option<u64>,
    pub payment_id: Option<String>,
    pub note: Option<String>,
    #[serde(rename = "type")]
    pub transfer_type: Option<String>,
    pub subaddr_index: Option<SubaddrIndex>,
    pub confirmations: Option<u64>,
    pub unlock_time: Option<u64>,
    pub double_spend_seen: Option<bool>,
    pub destinations: Option<Vec<Destination>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
pub struct SubaddrIndex {
    pub major: u32,
    pub minor: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Destination {
    pub address: Option<String>,
    pub amount: Option<u64>,
}

#[derive(Debug, Serialize, Clone)]
pub struct IncomingTransfersParams {
    /// "all" | "available" | "unavailable"
    pub transfer_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subaddr_indices: Option<Vec<u32>>,
}

impl IncomingTransfersParams {
    pub fn all(account_index: Option<u32>) -> Self {
        IncomingTransfersParams {
            transfer_type: "all".to_string(),
            account_index,
            subaddr_indices: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct IncomingTransfersResult {
    pub transfers: Vec<IncomingTransferEntry>,
}

/// One `incoming_transfers` entry; the only view that carries key images.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct IncomingTransferEntry {
    pub tx_hash: Option<String>,
    pub amount: Option<u64>,
    pub global_index: Option<u64>,
    pub key_image: Option<String>,
    pub pubkey: Option<String>,
    pub spent: Option<bool>,
    pub block_height: Option<u64>,
    pub subaddr_index: Option<SubaddrIndex>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GetPaymentsResult {
    pub payments: Vec<PaymentEntry>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PaymentEntry {
    pub payment_id: Option<String>,
    pub tx_hash: Option<String>,
    pub address: Option<String>,
    pub amount: Option<u64>,
    pub block_height: Option<u64>,
    pub unlock_time: Option<u64>,
    pub subaddr_index: Option<SubaddrIndex>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct GetTransferByTxidResult {
    pub transfer: Option<TransferEntry>,
    pub transfers: Vec<TransferEntry>,
}
