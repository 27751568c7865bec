pub mod demand_repo;
pub use demand_repo::DemandRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
pub mod guest_repo;
pub use guest_repo::GuestRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
