// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Relay (Responder)
// Licensed under the MIT License

//! Relay (server) side of the Shade OPAQUE protocol.
//!
//! The relay owns two per-account mappings: password files for registered
//! accounts and pending registrations awaiting finalization. Registration
//! must run over a mutually authenticated confidential channel supplied by
//! the caller; login runs over any channel. The relay keeps no per-login
//! state: each [`Responder::login_begin`] call is self-contained and hands
//! the derived session key back to the caller.

/// Login handling for the responder.
mod authentication;
/// Registration handling for the responder.
mod registration;
/// Responder handle and per-account records.
mod state;
/// Storage abstraction for password files and pending registrations.
mod store;

pub use state::{PasswordFile, PendingRegistration, Responder};
pub use store::{FileStore, MemoryStore};

pub use shade_core::protocol::RegistrationKeys;
