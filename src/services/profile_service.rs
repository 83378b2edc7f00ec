use std::sync::Arc;

use tracing::warn;

use crate::errors::PortalError;
use crate::models::profile::{ImageUpload, UpdateProfileRequest, UserProfile};
use crate::repositories::PortalGateway;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileLoading {
    pub profile: bool,
    pub update_profile: bool,
    pub update_image: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileErrors {
    pub profile: Option<String>,
    pub update_profile: Option<String>,
    pub update_image: Option<String>,
}

/// Profile slice. The read fetch invalidates on failure like every other
/// read; the two mutations do not — a failed update must not destroy the
/// already-known-good profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileState {
    pub user_profile: Option<UserProfile>,
    pub loading: ProfileLoading,
    pub errors: ProfileErrors,
}

impl ProfileState {
    fn fetch_pending(&mut self) {
        self.loading.profile = true;
        self.errors.profile = None;
    }

    fn fetch_fulfilled(&mut self, profile: UserProfile) {
        self.loading.profile = false;
        self.user_profile = Some(profile);
    }

    fn fetch_rejected(&mut self, message: String) {
        self.loading.profile = false;
        self.errors.profile = Some(message);
        self.user_profile = None;
    }

    fn update_pending(&mut self) {
        self.loading.update_profile = true;
        self.errors.update_profile = None;
    }

    fn update_fulfilled(&mut self, profile: UserProfile) {
        self.loading.update_profile = false;
        self.errors.update_profile = None;
        self.user_profile = Some(profile);
    }

    fn update_rejected(&mut self, message: String) {
        self.loading.update_profile = false;
        self.errors.update_profile = Some(message);
    }

    fn image_pending(&mut self) {
        self.loading.update_image = true;
        self.errors.update_image = None;
    }

    fn image_fulfilled(&mut self, profile: UserProfile) {
        self.loading.update_image = false;
        self.user_profile = Some(profile);
    }

    fn image_rejected(&mut self, message: String) {
        self.loading.update_image = false;
        self.errors.update_image = Some(message);
    }

    pub fn needs_profile(&self) -> bool {
        self.user_profile.is_none() && !self.loading.profile && self.errors.profile.is_none()
    }
}

pub struct ProfileService {
    gateway: Arc<dyn PortalGateway>,
    state: ProfileState,
}

impl ProfileService {
    pub fn new(gateway: Arc<dyn PortalGateway>) -> Self {
        Self {
            gateway,
            state: ProfileState::default(),
        }
    }

    pub fn state(&self) -> &ProfileState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = ProfileState::default();
    }

    pub async fn fetch_profile(&mut self) {
        if self.state.loading.profile {
            return;
        }
        self.state.fetch_pending();
        match self.gateway.profile().await {
            Ok(profile) => self.state.fetch_fulfilled(profile),
            Err(e) => {
                warn!("profile fetch failed: {}", e);
                self.state.fetch_rejected(e.to_string());
            }
        }
    }

    /// Replaces the cached profile wholesale with the server response.
    pub async fn update_profile(
        &mut self,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), PortalError> {
        self.state.update_pending();
        let request = UpdateProfileRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        match self.gateway.update_profile(request).await {
            Ok(profile) => {
                self.state.update_fulfilled(profile);
                Ok(())
            }
            Err(e) => {
                warn!("profile update failed: {}", e);
                self.state.update_rejected(e.to_string());
                Err(e)
            }
        }
    }

    /// Binary multipart upload. Size and MIME validation is a caller
    /// precondition.
    pub async fn update_profile_image(&mut self, upload: ImageUpload) -> Result<(), PortalError> {
        self.state.image_pending();
        match self.gateway.update_profile_image(upload).await {
            Ok(profile) => {
                self.state.image_fulfilled(profile);
                Ok(())
            }
            Err(e) => {
                warn!("profile image upload failed: {}", e);
                self.state.image_rejected(e.to_string());
                Err(e)
            }
        }
    }
}
