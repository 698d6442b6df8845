//! Bearer-token authentication extractors.
//!
//! [`Identity`] requires a valid token and exposes the subject email.
//! [`ReadAccess`] guards read endpoints: it behaves like [`Identity`]
//! unless the server is configured with open reads, in which case
//! anonymous requests pass through.
//!
//! Every failure path returns the same message, so callers cannot
//! distinguish a missing header from a bad signature or an expired
//! token.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use crate::domain::Error;
use crate::inbound::http::state::HttpState;

const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing bearer token";

/// Authenticated caller identity, extracted from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
}

impl Identity {
    /// Email address the verified token was issued for.
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }
}

fn state(req: &HttpRequest) -> Result<&web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authenticate(req: &HttpRequest) -> Result<Identity, Error> {
    let state = state(req)?;
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))?;
    let claims = state
        .tokens
        .verify(token)
        .ok_or_else(|| Error::unauthorized(UNAUTHORIZED_MESSAGE))?;
    Ok(Identity {
        subject: claims.sub,
    })
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Guard for read endpoints.
///
/// With `open_reads` disabled this is equivalent to [`Identity`]; with
/// it enabled, requests without a valid token are admitted anonymously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadAccess {
    subject: Option<String>,
}

impl ReadAccess {
    /// Caller identity when one was presented and verified.
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

fn read_access(req: &HttpRequest) -> Result<ReadAccess, Error> {
    if state(req)?.open_reads {
        let subject = authenticate(req).ok().map(|identity| identity.subject);
        return Ok(ReadAccess { subject });
    }
    authenticate(req).map(|identity| ReadAccess {
        subject: Some(identity.subject),
    })
}

impl FromRequest for ReadAccess {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(read_access(req))
    }
}
