//! Inbound HTTP adapter: handlers, extractors, and error mapping.

pub mod error;
pub mod health;
pub mod identity;
pub mod registrations;
pub mod state;
pub mod users;
pub mod vehicles;

#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
pub use state::HttpState;
