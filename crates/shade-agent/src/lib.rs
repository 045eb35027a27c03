// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Agent (Initiator)
// Licensed under the MIT License

//! Agent (client) side of the Shade OPAQUE protocol.
//!
//! An [`Initiator`] is bound to one account identifier and carries at most
//! one session at a time through the phases `Fresh -> AwaitingSession ->
//! Authenticated | Failed` for login, or `Fresh -> AwaitingRegistration` for
//! registration. Every client-side verification failure during login
//! collapses into [`shade_core::types::OpaqueError::AuthenticationFailed`];
//! the caller learns nothing about which check failed, and neither does a
//! network observer.

/// Login flow for the initiator.
mod authentication;
/// Registration flow for the initiator.
mod registration;
/// Initiator session state.
mod state;

pub use state::{Initiator, InitiatorPhase};

pub use shade_core::protocol::{
    ClientConfirmation, RegistrationKeys, RegistrationRequest, ServerSession, UserSession,
};
