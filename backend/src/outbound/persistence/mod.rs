//! Persistence adapters implementing the domain repository ports.

pub mod document_store;
pub mod memory;
mod sled_account_repository;
mod sled_registration_repository;
mod sled_vehicle_repository;

pub use document_store::{Collection, Document, DocumentStore};
pub use memory::InMemoryStore;
pub use sled_account_repository::SledAccountRepository;
pub use sled_registration_repository::SledRegistrationRepository;
pub use sled_vehicle_repository::SledVehicleRepository;
