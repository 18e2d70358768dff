//! cashu-mint-rpc
//!
//! Minimal, blocking HTTP client for the public Cashu mint REST API.
//! Endpoints used:
//! - GET  /v1/info
//! - GET  /v1/keys        (active keysets with their amount -> pubkey maps)
//! - POST /v1/swap        (exchange input proofs for blinded signatures)
//! - POST /v1/checkstate  (spent/pending/unspent state of proof Y points)
//!
//! IMPORTANT: this crate performs no cryptography. Blinded messages (`B_`),
//! signatures (`C_`/`C`) and Y points travel as the hex strings the caller
//! produced; we serialize them verbatim (no re-encoding).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("url parse: {0}")]
    Url(#[from] url::ParseError),
    #[error("mint returned error: {0}")]
    Mint(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Proof as it travels to the mint inside a swap request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofWire {
    pub amount: u64,
    /// Keyset id the proof was signed under.
    pub id: String,
    pub secret: String,
    /// Unblinded mint signature, hex-encoded compressed point.
    #[serde(rename = "C")]
    pub c: String,
}

/// Blinded message submitted as a swap output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlindedMessageWire {
    pub amount: u64,
    pub id: String,
    /// Blinded point `B_`, hex-encoded compressed point.
    #[serde(rename = "B_")]
    pub b: String,
}

/// Blinded signature returned for a swap output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlindSignatureWire {
    pub amount: u64,
    pub id: String,
    /// Blinded signature `C_`, hex-encoded compressed point.
    #[serde(rename = "C_")]
    pub c: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapRequest {
    pub inputs: Vec<ProofWire>,
    pub outputs: Vec<BlindedMessageWire>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwapResponse {
    pub signatures: Vec<BlindSignatureWire>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckStateRequest {
    #[serde(rename = "Ys")]
    pub ys: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofStateEntry {
    #[serde(rename = "Y")]
    pub y: String,
    /// "UNSPENT" | "PENDING" | "SPENT"
    pub state: String,
    #[serde(default)]
    pub witness: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckStateResponse {
    pub states: Vec<ProofStateEntry>,
}

/// One keyset: amount denomination -> compressed mint pubkey (hex).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeysetWire {
    pub id: String,
    pub unit: String,
    pub keys: std::collections::BTreeMap<u64, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeysResponse {
    pub keysets: Vec<KeysetWire>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MintInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Error body the mint sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct MintErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

#[derive(Clone)]
pub struct MintRpc {
    base: Url,
    client: Client,
}

impl MintRpc {
    /// Create a new client. `base` like "https://mint.example.com".
    pub fn new(base: &str) -> Result<Self, RpcError> {
        let base = Url::parse(base)?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .default_headers(headers)
            .build()?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    pub fn get_info(&self) -> Result<MintInfo, RpcError> {
        self.get_json("/v1/info")
    }

    pub fn get_keys(&self) -> Result<KeysResponse, RpcError> {
        self.get_json("/v1/keys")
    }

    pub fn swap(&self, request: &SwapRequest) -> Result<SwapResponse, RpcError> {
        self.post_json("/v1/swap", request)
    }

    pub fn check_state(&self, ys: Vec<String>) -> Result<CheckStateResponse, RpcError> {
        self.post_json("/v1/checkstate", &CheckStateRequest { ys })
    }

    fn get_json<R>(&self, path: &str) -> Result<R, RpcError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let url = self.base.join(path)?;
        let resp = self.client.get(url).send()?;
        Self::decode_response(path, resp)
    }

    fn post_json<P, R>(&self, path: &str, payload: &P) -> Result<R, RpcError>
    where
        P: Serialize,
        R: for<'de> Deserialize<'de>,
    {
        let url = self.base.join(path)?;
        let resp = self.client.post(url).json(payload).send()?;
        Self::decode_response(path, resp)
    }

    fn decode_response<R>(path: &str, resp: reqwest::blocking::Response) -> Result<R, RpcError>
    where
        R: for<'de> Deserialize<'de>,
    {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            if let Ok(err) = serde_json::from_str::<MintErrorBody>(&body) {
                if let Some(detail) = err.detail {
                    return Err(RpcError::Mint(format!(
                        "{path} code={} detail={detail}",
                        err.code.unwrap_or_default()
                    )));
                }
            }
            return Err(RpcError::Mint(format!("{path} HTTP {status}")));
        }
        let body = resp.text()?;
        serde_json::from_str(&body).map_err(|e| RpcError::Decode(format!("{path}: {e}")))
    }
}
