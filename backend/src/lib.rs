//! Vehicle registry backend library.
//!
//! A REST backend tracking vehicles, registrations, and user accounts
//! behind bearer-token authentication, laid out hexagonally: `domain`
//! holds the entities and ports, `inbound` and `outbound` the
//! adapters, `server` the wiring.

pub mod auth;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
