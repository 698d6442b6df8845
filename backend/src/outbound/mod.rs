//! Outbound adapters: implementations of domain ports against
//! concrete infrastructure.

pub mod persistence;
