use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::PortalError;
use crate::models::dashboard::{Banner, CachedBalance, Service};
use crate::models::profile::UserProfile;
use crate::models::transaction::TopUpRequest;
use crate::repositories::PortalGateway;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardLoading {
    pub profile: bool,
    pub balance: bool,
    pub services: bool,
    pub banners: bool,
    pub topup: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardErrors {
    pub profile: Option<String>,
    pub balance: Option<String>,
    pub services: Option<String>,
    pub banners: Option<String>,
    pub topup: Option<String>,
}

/// Dashboard slice: four remote-mirrored resources plus the top-up operation.
/// A rejected read fetch invalidates its cached value rather than keeping
/// stale data; errors stay set until the next attempt clears them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub user_profile: Option<UserProfile>,
    pub balance: Option<CachedBalance>,
    pub services: Vec<Service>,
    pub banners: Vec<Banner>,
    pub loading: DashboardLoading,
    pub errors: DashboardErrors,
}

impl DashboardState {
    fn profile_pending(&mut self) {
        self.loading.profile = true;
        self.errors.profile = None;
    }

    fn profile_fulfilled(&mut self, profile: UserProfile) {
        self.loading.profile = false;
        self.user_profile = Some(profile);
    }

    fn profile_rejected(&mut self, message: String) {
        self.loading.profile = false;
        self.errors.profile = Some(message);
        self.user_profile = None;
    }

    fn balance_pending(&mut self) {
        self.loading.balance = true;
        self.errors.balance = None;
    }

    fn balance_fulfilled(&mut self, amount: i64) {
        self.loading.balance = false;
        self.balance = Some(CachedBalance::Confirmed(amount));
    }

    fn balance_rejected(&mut self, message: String) {
        self.loading.balance = false;
        self.errors.balance = Some(message);
        self.balance = None;
    }

    fn services_pending(&mut self) {
        self.loading.services = true;
        self.errors.services = None;
    }

    fn services_fulfilled(&mut self, services: Vec<Service>) {
        self.loading.services = false;
        self.services = services;
    }

    fn services_rejected(&mut self, message: String) {
        self.loading.services = false;
        self.errors.services = Some(message);
        self.services = Vec::new();
    }

    fn banners_pending(&mut self) {
        self.loading.banners = true;
        self.errors.banners = None;
    }

    fn banners_fulfilled(&mut self, banners: Vec<Banner>) {
        self.loading.banners = false;
        self.banners = banners;
    }

    fn banners_rejected(&mut self, message: String) {
        self.loading.banners = false;
        self.errors.banners = Some(message);
        self.banners = Vec::new();
    }

    fn topup_pending(&mut self) {
        self.loading.topup = true;
        self.errors.topup = None;
    }

    /// Top-up success pushes the returned balance straight into the cache as
    /// provisional; the next authoritative fetch confirms it.
    fn topup_fulfilled(&mut self, new_balance: i64) {
        self.loading.topup = false;
        self.errors.topup = None;
        self.balance = Some(CachedBalance::Provisional(new_balance));
    }

    fn topup_rejected(&mut self, message: String) {
        self.loading.topup = false;
        self.errors.topup = Some(message);
        // balance stays untouched, the mutation never happened server-side
    }

    pub fn needs_profile(&self) -> bool {
        self.user_profile.is_none() && !self.loading.profile && self.errors.profile.is_none()
    }

    pub fn needs_balance(&self) -> bool {
        self.balance.is_none() && !self.loading.balance && self.errors.balance.is_none()
    }

    pub fn needs_services(&self) -> bool {
        self.services.is_empty() && !self.loading.services && self.errors.services.is_none()
    }

    pub fn needs_banners(&self) -> bool {
        self.banners.is_empty() && !self.loading.banners && self.errors.banners.is_none()
    }
}

pub struct DashboardService {
    gateway: Arc<dyn PortalGateway>,
    state: DashboardState,
}

impl DashboardService {
    pub fn new(gateway: Arc<dyn PortalGateway>) -> Self {
        Self {
            gateway,
            state: DashboardState::default(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = DashboardState::default();
    }

    pub async fn fetch_profile(&mut self) {
        if self.state.loading.profile {
            return;
        }
        self.state.profile_pending();
        match self.gateway.profile().await {
            Ok(profile) => self.state.profile_fulfilled(profile),
            Err(e) => {
                warn!("profile fetch failed: {}", e);
                self.state.profile_rejected(e.to_string());
            }
        }
    }

    pub async fn fetch_balance(&mut self) {
        if self.state.loading.balance {
            return;
        }
        self.state.balance_pending();
        match self.gateway.balance().await {
            Ok(data) => self.state.balance_fulfilled(data.balance),
            Err(e) => {
                warn!("balance fetch failed: {}", e);
                self.state.balance_rejected(e.to_string());
            }
        }
    }

    pub async fn fetch_services(&mut self) {
        if self.state.loading.services {
            return;
        }
        self.state.services_pending();
        match self.gateway.services().await {
            Ok(services) => self.state.services_fulfilled(services),
            Err(e) => {
                warn!("service list fetch failed: {}", e);
                self.state.services_rejected(e.to_string());
            }
        }
    }

    pub async fn fetch_banners(&mut self) {
        if self.state.loading.banners {
            return;
        }
        self.state.banners_pending();
        match self.gateway.banners().await {
            Ok(banners) => self.state.banners_fulfilled(banners),
            Err(e) => {
                warn!("banner fetch failed: {}", e);
                self.state.banners_rejected(e.to_string());
            }
        }
    }

    /// Issues the top-up. Amount validation is a caller precondition, the
    /// slice submits whatever it is given.
    pub async fn perform_top_up(&mut self, amount: i64) -> Result<i64, PortalError> {
        self.state.topup_pending();
        let request = TopUpRequest {
            top_up_amount: amount,
        };
        match self.gateway.top_up(request).await {
            Ok(data) => {
                info!("top-up of {} accepted, balance now {}", amount, data.balance);
                self.state.topup_fulfilled(data.balance);
                Ok(data.balance)
            }
            Err(e) => {
                warn!("top-up failed: {}", e);
                self.state.topup_rejected(e.to_string());
                Err(e)
            }
        }
    }
}
