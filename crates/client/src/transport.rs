use async_trait::async_trait;
use claims_core::recovery::{ForgotPasswordRequest, ResetPasswordRequest};
use claims_core::stats::{AdminStats, ProviderStats};
use claims_core::{
    BeneficiaryLookup, BulkReceipt, CanonicalClaim, ClaimsApi, ClaimsConfig, ClaimsError,
    ClaimsResult, SubmitReceipt,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Claims backend reached over HTTP.
#[derive(Clone, Debug)]
pub struct HttpClaimsApi {
    http: Client,
    base_url: String,
    auth_token: Option<String>,
}

#[derive(Serialize)]
struct BulkBody<'a> {
    items: &'a [CanonicalClaim],
}

impl HttpClaimsApi {
    /// Build a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::Transport` if the HTTP client cannot be constructed.
    pub fn new(cfg: &ClaimsConfig) -> ClaimsResult<Self> {
        let http = Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| ClaimsError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url().to_string(),
            auth_token: cfg.auth_token().map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /claims/provider-stats`
    pub async fn provider_stats(&self) -> ClaimsResult<ProviderStats> {
        let body = self.send(self.request(Method::GET, "/claims/provider-stats")).await?;
        decode(body)
    }

    /// `GET /claims/admin-stats`
    pub async fn admin_stats(&self) -> ClaimsResult<AdminStats> {
        let body = self.send(self.request(Method::GET, "/claims/admin-stats")).await?;
        decode(body)
    }

    /// `POST /auth/forgot-password`
    pub async fn forgot_password(&self, req: &ForgotPasswordRequest) -> ClaimsResult<()> {
        self.send(self.request(Method::POST, "/auth/forgot-password").json(req))
            .await?;
        Ok(())
    }

    /// `POST /auth/reset-password`
    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> ClaimsResult<()> {
        self.send(self.request(Method::POST, "/auth/reset-password").json(req))
            .await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_url(method, format!("{}{}", self.base_url, path))
    }

    fn request_url(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn beneficiary_url(&self, bene_id: &str) -> ClaimsResult<Url> {
        let mut url = Url::parse(&format!("{}/beneficiary", self.base_url))
            .map_err(|e| ClaimsError::InvalidInput(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClaimsError::InvalidInput("base URL cannot carry a path".into()))?
            .push(bene_id);
        Ok(url)
    }

    /// Send a request and return the JSON body (`Null` when empty).
    async fn send(&self, builder: RequestBuilder) -> ClaimsResult<Value> {
        let (status, body) = self.send_raw(builder).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(ClaimsError::Transport(error_message(status, &body)))
        }
    }

    async fn send_raw(&self, builder: RequestBuilder) -> ClaimsResult<(StatusCode, Value)> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url());

        let bytes = response.bytes().await.map_err(transport_error)?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                // Non-JSON error pages fall back to the generic status message.
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => {
                    tracing::warn!("ignoring non-JSON body of {} response: {}", status.as_u16(), e);
                    Value::Null
                }
            }
        };
        Ok((status, body))
    }
}

#[async_trait]
impl ClaimsApi for HttpClaimsApi {
    async fn submit_claim(&self, claim: &CanonicalClaim) -> ClaimsResult<SubmitReceipt> {
        let body = self
            .send(self.request(Method::POST, "/claims/submit").json(claim))
            .await?;
        Ok(decode_receipt(body))
    }

    async fn submit_bulk(&self, items: &[CanonicalClaim]) -> ClaimsResult<BulkReceipt> {
        let body = self
            .send(
                self.request(Method::POST, "/claims/submit-bulk")
                    .json(&BulkBody { items }),
            )
            .await?;
        Ok(decode_receipt(body))
    }

    async fn lookup_beneficiary(&self, bene_id: &str) -> ClaimsResult<BeneficiaryLookup> {
        let url = self.beneficiary_url(bene_id)?;
        let (status, body) = self.send_raw(self.request_url(Method::GET, url)).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(BeneficiaryLookup::NotFound);
        }
        if !status.is_success() {
            return Err(ClaimsError::Transport(error_message(status, &body)));
        }
        Ok(BeneficiaryLookup::from_json(&body))
    }
}

/// `null` bodies decode as the type's empty form, e.g. a receipt with no count.
fn decode<T: DeserializeOwned>(body: Value) -> ClaimsResult<T> {
    let body = if body.is_null() {
        Value::Object(Default::default())
    } else {
        body
    };
    serde_json::from_value(body)
        .map_err(|e| ClaimsError::Transport(format!("invalid response body: {e}")))
}

/// Receipts only carry optional details. A 2xx response means the write happened,
/// so a body that does not match decodes as the empty receipt.
fn decode_receipt<T: DeserializeOwned + Default>(body: Value) -> T {
    decode(body).unwrap_or_else(|err| {
        tracing::warn!("ignoring unexpected receipt body: {}", err);
        T::default()
    })
}

fn error_message(status: StatusCode, body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
        Some(other) if !other.is_null() => other.to_string(),
        _ => format!("Request failed with status code {}", status.as_u16()),
    }
}

fn transport_error(err: reqwest::Error) -> ClaimsError {
    tracing::warn!("request failed: {}", err);
    if err.is_timeout() {
        ClaimsError::Transport("Request timed out".into())
    } else {
        ClaimsError::Transport(format!("Network Error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_prefers_server_error() {
        let body = json!({ "error": "ClaimID already exists" });
        assert_eq!(error_message(StatusCode::CONFLICT, &body), "ClaimID already exists");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, &Value::Null),
            "Request failed with status code 500"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, &json!({ "error": "" })),
            "Request failed with status code 400"
        );
    }

    #[test]
    fn beneficiary_url_escapes_segment() {
        let api = HttpClaimsApi::new(&ClaimsConfig::new("http://localhost:3000/api").unwrap())
            .unwrap();
        assert_eq!(
            api.beneficiary_url("BENE11001").unwrap().as_str(),
            "http://localhost:3000/api/beneficiary/BENE11001"
        );
        assert_eq!(
            api.beneficiary_url("a/b").unwrap().as_str(),
            "http://localhost:3000/api/beneficiary/a%2Fb"
        );
    }

    #[test]
    fn null_body_decodes_to_empty_receipt() {
        let receipt: BulkReceipt = decode(Value::Null).unwrap();
        assert_eq!(receipt.inserted_count(), 0);
    }

    #[test]
    fn mismatched_receipt_bodies_decode_as_empty() {
        let bulk: BulkReceipt = decode_receipt(json!({ "inserted": "1" }));
        assert_eq!(bulk, BulkReceipt::default());

        let single: SubmitReceipt = decode_receipt(json!({ "ClaimID": 42 }));
        assert_eq!(single, SubmitReceipt::default());
    }
}
