use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::PortalError;
use crate::models::dashboard::Service;
use crate::models::transaction::PaymentRequest;
use crate::repositories::PortalGateway;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentLoading {
    pub fetch_services: bool,
    pub perform_payment: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentErrors {
    pub fetch_services: Option<String>,
    pub perform_payment: Option<String>,
}

/// Payment slice: its own copy of the service catalogue, the current
/// selection, and the debit operation. The selection is always either empty
/// or a member of the loaded catalogue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentState {
    pub services: Vec<Service>,
    pub selected_service: Option<Service>,
    pub loading: PaymentLoading,
    pub errors: PaymentErrors,
}

impl PaymentState {
    fn services_pending(&mut self) {
        self.loading.fetch_services = true;
        self.errors.fetch_services = None;
    }

    fn services_fulfilled(&mut self, services: Vec<Service>) {
        self.loading.fetch_services = false;
        self.services = services;
    }

    fn services_rejected(&mut self, message: String) {
        self.loading.fetch_services = false;
        self.errors.fetch_services = Some(message);
        self.services = Vec::new();
    }

    fn payment_pending(&mut self) {
        self.loading.perform_payment = true;
        self.errors.perform_payment = None;
    }

    fn payment_fulfilled(&mut self) {
        self.loading.perform_payment = false;
        self.errors.perform_payment = None;
        // the selection stays; the caller clears it explicitly
    }

    fn payment_rejected(&mut self, message: String) {
        self.loading.perform_payment = false;
        self.errors.perform_payment = Some(message);
    }

    pub fn needs_services(&self) -> bool {
        self.services.is_empty()
            && !self.loading.fetch_services
            && self.errors.fetch_services.is_none()
    }
}

pub struct PaymentService {
    gateway: Arc<dyn PortalGateway>,
    state: PaymentState,
}

impl PaymentService {
    pub fn new(gateway: Arc<dyn PortalGateway>) -> Self {
        Self {
            gateway,
            state: PaymentState::default(),
        }
    }

    pub fn state(&self) -> &PaymentState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = PaymentState::default();
    }

    pub async fn fetch_services(&mut self) {
        if self.state.loading.fetch_services {
            return;
        }
        self.state.services_pending();
        match self.gateway.services().await {
            Ok(services) => self.state.services_fulfilled(services),
            Err(e) => {
                warn!("payment catalogue fetch failed: {}", e);
                self.state.services_rejected(e.to_string());
            }
        }
    }

    /// Selects a service by case-insensitive code match within the loaded
    /// catalogue. No match clears the selection.
    pub fn select_service(&mut self, code: &str) {
        self.state.selected_service = self
            .state
            .services
            .iter()
            .find(|s| s.service_code.eq_ignore_ascii_case(code))
            .cloned();
    }

    pub fn clear_selection(&mut self) {
        self.state.selected_service = None;
    }

    pub async fn perform_payment(&mut self, code: &str, amount: i64) -> Result<(), PortalError> {
        self.state.payment_pending();
        let request = PaymentRequest {
            service_code: code.to_string(),
            service_amount: amount,
        };
        match self.gateway.pay(request).await {
            Ok(data) => {
                info!("payment of {} for {} accepted, balance now {}", amount, code, data.balance);
                self.state.payment_fulfilled();
                Ok(())
            }
            Err(e) => {
                warn!("payment failed: {}", e);
                self.state.payment_rejected(e.to_string());
                Err(e)
            }
        }
    }
}
