use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::PortalError;
use crate::models::authentication::{LoginRequest, RegistrationRequest, TokenData};
use crate::models::dashboard::{BalanceData, Banner, Service};
use crate::models::profile::{ImageUpload, UpdateProfileRequest, UserProfile};
use crate::models::transaction::{HistoryPage, PaymentRequest, TopUpRequest};
use crate::models::ApiResponse;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::PortalGateway;

/// HTTP adapter for the PPOB API. Attaches the persisted bearer token to every
/// outbound request and normalizes the `{status, message, data}` envelope into
/// [`PortalError`] on the failure path.
#[derive(Clone)]
pub struct ApiRepository {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenRepository,
}

impl ApiRepository {
    pub fn new(base_url: String, tokens: TokenRepository) -> Self {
        let client = reqwest::Client::new();
        Self {
            client,
            base_url,
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and unwrap the envelope. The envelope is decoded
    /// regardless of the HTTP status code; the API reports failures through
    /// its own `status` field even on 4xx responses.
    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<T>, PortalError> {
        let response = self.authorize(builder).send().await.map_err(|e| {
            warn!("request to {} failed: {}", path, e);
            PortalError::Connection(e.to_string())
        })?;
        debug!("{} responded with http {}", path, response.status());

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            warn!("undecodable response from {}: {}", path, e);
            PortalError::Connection(format!("invalid response body: {}", e))
        })?;

        if envelope.status != 0 {
            return Err(PortalError::Api {
                status: envelope.status,
                message: envelope.message,
            });
        }
        Ok(envelope)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, PortalError> {
        let envelope = self.execute::<T>(path, builder).await?;
        envelope.data.ok_or_else(|| PortalError::Api {
            status: 0,
            message: format!("{} returned no data", path),
        })
    }

    /// Variant for endpoints whose success envelope carries no payload.
    async fn request_no_content(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> Result<(), PortalError> {
        self.execute::<serde_json::Value>(path, builder).await?;
        Ok(())
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PortalError> {
        self.request(path, self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PortalError> {
        let builder = self
            .client
            .post(self.url(path))
            .headers(Self::json_headers())
            .json(body);
        self.request(path, builder).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PortalError> {
        let builder = self
            .client
            .put(self.url(path))
            .headers(Self::json_headers())
            .json(body);
        self.request(path, builder).await
    }

    /// Binary upload variant: multipart form content, no forced JSON content
    /// type. reqwest sets the multipart boundary header itself.
    async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: ImageUpload,
    ) -> Result<T, PortalError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| PortalError::Connection(format!("invalid upload content type: {}", e)))?;
        let form = Form::new().part("file", part);
        let builder = self.client.put(self.url(path)).multipart(form);
        self.request(path, builder).await
    }
}

#[async_trait]
impl PortalGateway for ApiRepository {
    async fn login(&self, request: LoginRequest) -> Result<TokenData, PortalError> {
        self.post("/login", &request).await
    }

    async fn register(&self, request: RegistrationRequest) -> Result<(), PortalError> {
        let builder = self
            .client
            .post(self.url("/registration"))
            .headers(Self::json_headers())
            .json(&request);
        self.request_no_content("/registration", builder).await
    }

    async fn profile(&self) -> Result<UserProfile, PortalError> {
        self.get("/profile").await
    }

    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, PortalError> {
        self.put("/profile/update", &request).await
    }

    async fn update_profile_image(&self, upload: ImageUpload) -> Result<UserProfile, PortalError> {
        self.put_multipart("/profile/image", upload).await
    }

    async fn balance(&self) -> Result<BalanceData, PortalError> {
        self.get("/balance").await
    }

    async fn services(&self) -> Result<Vec<Service>, PortalError> {
        self.get("/services").await
    }

    async fn banners(&self) -> Result<Vec<Banner>, PortalError> {
        self.get("/banner").await
    }

    async fn top_up(&self, request: TopUpRequest) -> Result<BalanceData, PortalError> {
        self.post("/topup", &request).await
    }

    async fn pay(&self, request: PaymentRequest) -> Result<BalanceData, PortalError> {
        self.post("/transaction", &request).await
    }

    async fn transaction_history(
        &self,
        offset: i64,
        limit: i64,
        month: Option<u32>,
    ) -> Result<HistoryPage, PortalError> {
        let mut query: Vec<(&str, String)> = vec![
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(month) = month {
            query.push(("month", month.to_string()));
        }
        let builder = self
            .client
            .get(self.url("/transaction/history"))
            .query(&query);
        self.request("/transaction/history", builder).await
    }
}
