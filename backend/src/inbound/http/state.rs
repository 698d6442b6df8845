//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they
//! depend only on the domain ports and the token codec and remain
//! testable without real storage.

use std::sync::Arc;

use crate::auth::TokenCodec;
use crate::domain::{AccountRepository, RegistrationRepository, VehicleRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Vehicle collection access.
    pub vehicles: Arc<dyn VehicleRepository>,
    /// Registration collection access.
    pub registrations: Arc<dyn RegistrationRepository>,
    /// User account collection access.
    pub accounts: Arc<dyn AccountRepository>,
    /// Access token issue and verification.
    pub tokens: TokenCodec,
    /// When set, read endpoints accept requests without a bearer token.
    pub open_reads: bool,
}
