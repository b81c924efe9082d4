use ahash::AHashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::GatewayError;
use crate::model::{Value, VerifyMethod};

/// An assembled verification request, ready for a transport.
///
/// The protocol only specifies this shape and the response contract; the
/// transport behind [`HttpGateway`] is the system boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayRequest {
    pub method: VerifyMethod,
    pub endpoint: String,
    pub headers: AHashMap<String, String>,
    pub params: AHashMap<String, Value>,
}

impl GatewayRequest {
    /// The request URL. For `GET` the parameters are encoded as query
    /// parameters; for `POST` the endpoint is returned untouched.
    pub fn url(&self) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| GatewayError::Transport(format!("invalid endpoint: {}", e)))?;
        if self.method == VerifyMethod::Get {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, &value.coerce_string());
            }
        }
        Ok(url)
    }

    /// The JSON body. `GET` requests carry their parameters in the URL and
    /// have no body.
    pub fn body(&self) -> Option<serde_json::Value> {
        match self.method {
            VerifyMethod::Get => None,
            VerifyMethod::Post => serde_json::to_value(&self.params).ok(),
        }
    }
}

/// What the gateway hands back for a request that reached the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl GatewayResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Transport collaborator dispatching verification requests.
///
/// Implementations translate non-2xx statuses into [`GatewayError::Http`]
/// (keeping any response payload) and connection-level failures into
/// [`GatewayError::Transport`].
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn dispatch(&self, request: GatewayRequest) -> Result<GatewayResponse, GatewayError>;
}
