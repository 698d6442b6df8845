//! Shared fixtures for HTTP handler tests.

use std::sync::Arc;

use actix_web::web;

use crate::auth::TokenCodec;
use crate::domain::{Registration, UserAccount, Vehicle};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::InMemoryStore;

pub const TEST_SECRET: &[u8] = b"handler-test-secret";

/// In-memory state with reads requiring authentication.
pub fn test_state() -> web::Data<HttpState> {
    build_state(false)
}

/// In-memory state with anonymous reads admitted.
pub fn test_state_with_open_reads() -> web::Data<HttpState> {
    build_state(true)
}

fn build_state(open_reads: bool) -> web::Data<HttpState> {
    web::Data::new(HttpState {
        vehicles: Arc::new(InMemoryStore::<Vehicle>::new()),
        registrations: Arc::new(InMemoryStore::<Registration>::new()),
        accounts: Arc::new(InMemoryStore::<UserAccount>::new()),
        tokens: TokenCodec::with_default_ttl(TEST_SECRET),
        open_reads,
    })
}
