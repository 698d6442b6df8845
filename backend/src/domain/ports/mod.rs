//! Port abstractions decoupling the domain from persistence adapters.
//!
//! Repositories are injected as `Arc<dyn …Repository>` handles rather
//! than reached through ambient globals, so tests can swap in the
//! in-memory adapters.

mod account_repository;
mod registration_repository;
mod store;
mod vehicle_repository;

pub use account_repository::AccountRepository;
pub use registration_repository::RegistrationRepository;
pub use store::StoreError;
pub use vehicle_repository::VehicleRepository;
