pub mod dashboard_service;
pub mod history_service;
pub mod payment_service;
pub mod portal_service;
pub mod profile_service;
pub mod session_service;
