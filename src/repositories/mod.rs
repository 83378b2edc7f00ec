use async_trait::async_trait;

use crate::errors::PortalError;
use crate::models::authentication::{LoginRequest, RegistrationRequest, TokenData};
use crate::models::dashboard::{BalanceData, Banner, Service};
use crate::models::profile::{ImageUpload, UpdateProfileRequest, UserProfile};
use crate::models::transaction::{HistoryPage, PaymentRequest, TopUpRequest};

pub mod api_repository;
pub mod token_repository;

#[cfg(test)]
pub mod mock_gateway;

/// Seam between the slices and the remote API. The production implementation
/// is [`api_repository::ApiRepository`]; tests drive the slices through a mock
/// with programmable responses and call counters.
#[async_trait]
pub trait PortalGateway: Send + Sync {
    async fn login(&self, request: LoginRequest) -> Result<TokenData, PortalError>;
    async fn register(&self, request: RegistrationRequest) -> Result<(), PortalError>;
    async fn profile(&self) -> Result<UserProfile, PortalError>;
    async fn update_profile(
        &self,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, PortalError>;
    async fn update_profile_image(&self, upload: ImageUpload) -> Result<UserProfile, PortalError>;
    async fn balance(&self) -> Result<BalanceData, PortalError>;
    async fn services(&self) -> Result<Vec<Service>, PortalError>;
    async fn banners(&self) -> Result<Vec<Banner>, PortalError>;
    async fn top_up(&self, request: TopUpRequest) -> Result<BalanceData, PortalError>;
    async fn pay(&self, request: PaymentRequest) -> Result<BalanceData, PortalError>;
    async fn transaction_history(
        &self,
        offset: i64,
        limit: i64,
        month: Option<u32>,
    ) -> Result<HistoryPage, PortalError>;
}
