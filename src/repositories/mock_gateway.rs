//! Scripted [`PortalGateway`] used by slice and orchestrator tests. Each
//! endpoint pops from its own response queue and bumps a call counter, so
//! tests can assert both outcomes and how many requests actually went out.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::PortalError;
use crate::models::authentication::{LoginRequest, RegistrationRequest, TokenData};
use crate::models::dashboard::{BalanceData, Banner, Service};
use crate::models::profile::{ImageUpload, UpdateProfileRequest, UserProfile};
use crate::models::transaction::{HistoryPage, PaymentRequest, TopUpRequest};
use crate::repositories::PortalGateway;

#[derive(Default)]
pub struct CallCounts {
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub profile: AtomicUsize,
    pub update_profile: AtomicUsize,
    pub update_profile_image: AtomicUsize,
    pub balance: AtomicUsize,
    pub services: AtomicUsize,
    pub banners: AtomicUsize,
    pub top_up: AtomicUsize,
    pub pay: AtomicUsize,
    pub history: AtomicUsize,
}

#[derive(Default)]
struct Responses {
    login: VecDeque<Result<TokenData, PortalError>>,
    register: VecDeque<Result<(), PortalError>>,
    profile: VecDeque<Result<UserProfile, PortalError>>,
    update_profile: VecDeque<Result<UserProfile, PortalError>>,
    update_profile_image: VecDeque<Result<UserProfile, PortalError>>,
    balance: VecDeque<Result<BalanceData, PortalError>>,
    services: VecDeque<Result<Vec<Service>, PortalError>>,
    banners: VecDeque<Result<Vec<Banner>, PortalError>>,
    top_up: VecDeque<Result<BalanceData, PortalError>>,
    pay: VecDeque<Result<BalanceData, PortalError>>,
    history: VecDeque<Result<HistoryPage, PortalError>>,
}

#[derive(Default)]
pub struct MockGateway {
    pub calls: CallCounts,
    responses: Mutex<Responses>,
}

fn unscripted<T>() -> Result<T, PortalError> {
    Err(PortalError::Connection("no scripted response".to_string()))
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, response: Result<TokenData, PortalError>) {
        self.responses.lock().unwrap().login.push_back(response);
    }

    pub fn push_register(&self, response: Result<(), PortalError>) {
        self.responses.lock().unwrap().register.push_back(response);
    }

    pub fn push_profile(&self, response: Result<UserProfile, PortalError>) {
        self.responses.lock().unwrap().profile.push_back(response);
    }

    pub fn push_update_profile(&self, response: Result<UserProfile, PortalError>) {
        self.responses
            .lock()
            .unwrap()
            .update_profile
            .push_back(response);
    }

    pub fn push_update_profile_image(&self, response: Result<UserProfile, PortalError>) {
        self.responses
            .lock()
            .unwrap()
            .update_profile_image
            .push_back(response);
    }

    pub fn push_balance(&self, response: Result<BalanceData, PortalError>) {
        self.responses.lock().unwrap().balance.push_back(response);
    }

    pub fn push_services(&self, response: Result<Vec<Service>, PortalError>) {
        self.responses.lock().unwrap().services.push_back(response);
    }

    pub fn push_banners(&self, response: Result<Vec<Banner>, PortalError>) {
        self.responses.lock().unwrap().banners.push_back(response);
    }

    pub fn push_top_up(&self, response: Result<BalanceData, PortalError>) {
        self.responses.lock().unwrap().top_up.push_back(response);
    }

    pub fn push_pay(&self, response: Result<BalanceData, PortalError>) {
        self.responses.lock().unwrap().pay.push_back(response);
    }

    pub fn push_history(&self, response: Result<HistoryPage, PortalError>) {
        self.responses.lock().unwrap().history.push_back(response);
    }
}

#[async_trait]
impl PortalGateway for MockGateway {
    async fn login(&self, _request: LoginRequest) -> Result<TokenData, PortalError> {
        self.calls.login.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .login
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn register(&self, _request: RegistrationRequest) -> Result<(), PortalError> {
        self.calls.register.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .register
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn profile(&self) -> Result<UserProfile, PortalError> {
        self.calls.profile.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .profile
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn update_profile(
        &self,
        _request: UpdateProfileRequest,
    ) -> Result<UserProfile, PortalError> {
        self.calls.update_profile.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .update_profile
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn update_profile_image(&self, _upload: ImageUpload) -> Result<UserProfile, PortalError> {
        self.calls
            .update_profile_image
            .fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .update_profile_image
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn balance(&self) -> Result<BalanceData, PortalError> {
        self.calls.balance.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .balance
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn services(&self) -> Result<Vec<Service>, PortalError> {
        self.calls.services.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .services
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn banners(&self) -> Result<Vec<Banner>, PortalError> {
        self.calls.banners.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .banners
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn top_up(&self, _request: TopUpRequest) -> Result<BalanceData, PortalError> {
        self.calls.top_up.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .top_up
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn pay(&self, _request: PaymentRequest) -> Result<BalanceData, PortalError> {
        self.calls.pay.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pay
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn transaction_history(
        &self,
        _offset: i64,
        _limit: i64,
        _month: Option<u32>,
    ) -> Result<HistoryPage, PortalError> {
        self.calls.history.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .history
            .pop_front()
            .unwrap_or_else(unscripted)
    }
}
