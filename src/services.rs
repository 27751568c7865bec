pub mod auth;
pub mod demand_service;
pub mod event_service;
pub mod guest_service;
pub mod payment_service;
