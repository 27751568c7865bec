pub mod auth;
pub mod demand;
pub mod event;
pub mod payment;
