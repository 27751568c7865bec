pub mod auth;
pub mod demands;
pub mod events;
pub mod files;
pub mod guests;
pub mod payments;
pub mod users;
