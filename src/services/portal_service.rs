use std::sync::Arc;

use tracing::info;

use crate::errors::{PortalError, TOKEN_INVALID_MESSAGE};
use crate::models::profile::ImageUpload;
use crate::repositories::token_repository::TokenRepository;
use crate::repositories::PortalGateway;
use crate::services::dashboard_service::DashboardService;
use crate::services::history_service::HistoryService;
use crate::services::payment_service::PaymentService;
use crate::services::profile_service::ProfileService;
use crate::services::session_service::SessionService;

pub const MIN_TOP_UP_AMOUNT: i64 = 10_000;
pub const MAX_TOP_UP_AMOUNT: i64 = 1_000_000;
pub const MAX_IMAGE_BYTES: usize = 100 * 1024;
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

/// Edge-triggered watch over the token-invalid condition. Fires once per
/// rising edge and rearms when the condition clears, so a lingering error
/// cannot retrigger a logout on every poll.
#[derive(Debug, Default)]
struct ExpiryWatch {
    active: bool,
}

impl ExpiryWatch {
    fn observe(&mut self, expired_now: bool) -> bool {
        let rising = expired_now && !self.active;
        self.active = expired_now;
        rising
    }
}

/// Synchronization orchestrator: owns every slice, decides when a fetch must
/// actually be issued, and enforces the caller-side preconditions the slices
/// themselves leave to their callers.
pub struct PortalService {
    pub session: SessionService,
    pub dashboard: DashboardService,
    pub profile: ProfileService,
    pub payment: PaymentService,
    pub history: HistoryService,
    history_month: Option<u32>,
    expiry_watch: ExpiryWatch,
}

impl PortalService {
    pub fn new(gateway: Arc<dyn PortalGateway>, tokens: TokenRepository) -> Self {
        Self {
            session: SessionService::new(gateway.clone(), tokens),
            dashboard: DashboardService::new(gateway.clone()),
            profile: ProfileService::new(gateway.clone()),
            payment: PaymentService::new(gateway.clone()),
            history: HistoryService::new(gateway),
            history_month: None,
            expiry_watch: ExpiryWatch::default(),
        }
    }

    fn require_session(&self) -> Result<(), PortalError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(PortalError::validation("no active session, log in first"))
        }
    }

    /// Fetch-if-missing for the dashboard resources: a fetch is dispatched
    /// only when the resource is empty, not already loading, and carries no
    /// sticky error from a previous attempt.
    pub async fn ensure_dashboard(&mut self) -> Result<(), PortalError> {
        self.require_session()?;
        if self.dashboard.state().needs_profile() {
            self.dashboard.fetch_profile().await;
        }
        if self.dashboard.state().needs_balance() {
            self.dashboard.fetch_balance().await;
        }
        if self.dashboard.state().needs_services() {
            self.dashboard.fetch_services().await;
        }
        if self.dashboard.state().needs_banners() {
            self.dashboard.fetch_banners().await;
        }
        Ok(())
    }

    pub async fn ensure_profile(&mut self) -> Result<(), PortalError> {
        self.require_session()?;
        if self.profile.state().needs_profile() {
            self.profile.fetch_profile().await;
        }
        Ok(())
    }

    pub async fn ensure_payment_catalogue(&mut self) -> Result<(), PortalError> {
        self.require_session()?;
        if self.payment.state().needs_services() {
            self.payment.fetch_services().await;
        }
        Ok(())
    }

    /// Changing the month filter resets the cursor before the first filtered
    /// fetch; pages from different filters are never mixed.
    pub async fn change_history_month(&mut self, month: Option<u32>) -> Result<(), PortalError> {
        self.require_session()?;
        self.history_month = month;
        self.history.reset();
        self.history.fetch_page(month).await;
        Ok(())
    }

    pub async fn load_more_history(&mut self) -> Result<(), PortalError> {
        self.require_session()?;
        if !self.history.state().has_more || self.history.state().is_loading {
            return Ok(());
        }
        self.history.fetch_page(self.history_month).await;
        Ok(())
    }

    pub fn validate_top_up_amount(input: &str) -> Result<i64, PortalError> {
        let amount: i64 = input
            .trim()
            .parse()
            .map_err(|_| PortalError::validation("top-up amount must be a whole number"))?;
        Self::check_top_up_bounds(amount)?;
        Ok(amount)
    }

    fn check_top_up_bounds(amount: i64) -> Result<(), PortalError> {
        if amount < MIN_TOP_UP_AMOUNT {
            return Err(PortalError::validation(format!(
                "minimum top-up amount is {}",
                MIN_TOP_UP_AMOUNT
            )));
        }
        if amount > MAX_TOP_UP_AMOUNT {
            return Err(PortalError::validation(format!(
                "maximum top-up amount is {}",
                MAX_TOP_UP_AMOUNT
            )));
        }
        Ok(())
    }

    /// Top-up with the caller-side amount bounds applied before anything goes
    /// out on the wire.
    pub async fn top_up(&mut self, amount: i64) -> Result<i64, PortalError> {
        self.require_session()?;
        Self::check_top_up_bounds(amount)?;
        self.dashboard.perform_top_up(amount).await
    }

    /// Pays the currently selected service at its tariff. The sufficiency
    /// check against the cached balance is advisory, the server stays the
    /// source of truth. On success the selection is cleared and the balance
    /// re-fetched for reconciliation.
    pub async fn pay_selected_service(&mut self) -> Result<(), PortalError> {
        self.require_session()?;
        let service = self
            .payment
            .state()
            .selected_service
            .clone()
            .ok_or_else(|| PortalError::validation("no service selected"))?;
        if let Some(balance) = self.dashboard.state().balance {
            if service.service_tariff > balance.amount() {
                return Err(PortalError::validation(
                    "insufficient balance for this payment",
                ));
            }
        }
        self.payment
            .perform_payment(&service.service_code, service.service_tariff)
            .await?;
        self.payment.clear_selection();
        self.dashboard.fetch_balance().await;
        Ok(())
    }

    /// File preconditions for the profile image upload; the slice itself
    /// submits whatever it is handed.
    pub async fn upload_profile_image(&mut self, upload: ImageUpload) -> Result<(), PortalError> {
        self.require_session()?;
        if upload.bytes.len() > MAX_IMAGE_BYTES {
            return Err(PortalError::validation("image must be 100 KiB or smaller"));
        }
        if !ACCEPTED_IMAGE_TYPES.contains(&upload.content_type.as_str()) {
            return Err(PortalError::validation(
                "only JPEG, JPG or PNG images are accepted",
            ));
        }
        self.profile.update_profile_image(upload).await
    }

    fn token_invalid_reported(&self) -> bool {
        let dashboard = &self.dashboard.state().errors;
        let profile = &self.profile.state().errors;
        let payment = &self.payment.state().errors;
        [
            dashboard.profile.as_deref(),
            dashboard.balance.as_deref(),
            dashboard.services.as_deref(),
            dashboard.banners.as_deref(),
            dashboard.topup.as_deref(),
            profile.profile.as_deref(),
            profile.update_profile.as_deref(),
            profile.update_image.as_deref(),
            payment.fetch_services.as_deref(),
            payment.perform_payment.as_deref(),
            self.history.state().error.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|message| message.contains(TOKEN_INVALID_MESSAGE))
    }

    /// Polls the slices for the server's token-invalid message. Returns true
    /// exactly once per occurrence, performing the forced logout on that
    /// edge.
    pub fn check_session_expiry(&mut self) -> bool {
        let expired = self.token_invalid_reported();
        if self.expiry_watch.observe(expired) {
            info!("session expired, forcing logout");
            self.logout();
            true
        } else {
            false
        }
    }

    /// Full teardown: durable token gone, every slice back to its initial
    /// state.
    pub fn logout(&mut self) {
        self.session.logout();
        self.dashboard.reset();
        self.profile.reset();
        self.payment.reset();
        self.history.reset();
        self.history_month = None;
    }
}
