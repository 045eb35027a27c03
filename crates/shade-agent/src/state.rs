// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Agent (Initiator)
// Licensed under the MIT License

use shade_core::crypto;
use shade_core::types::{
    OpaqueError, OpaqueResult, MAX_ACCOUNT_ID_LENGTH, PRIVATE_KEY_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Tracks which protocol phase the initiator is in.
///
/// Enforces that protocol functions are called in the correct order; a
/// session that reached `Authenticated` or `Failed` must be reset with
/// [`Initiator::abort`] before starting over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitiatorPhase {
    /// No registration or login is in flight.
    Fresh,
    /// A registration request has been emitted.
    AwaitingRegistration,
    /// `login_start` has completed; awaiting the relay's response.
    AwaitingSession,
    /// `login_finish` verified the relay and produced a session key.
    Authenticated,
    /// `login_finish` rejected the relay's response.
    Failed,
}

/// Client session state. Holds the account identifier plus, between
/// `login_start` and `login_finish`, the ephemeral key and the OPRF blinding
/// scalar. Both secrets are zeroized when the session completes, aborts, or
/// drops.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Initiator {
    #[zeroize(skip)]
    pub(crate) account_id: String,
    #[zeroize(skip)]
    pub(crate) phase: InitiatorPhase,
    /// Ephemeral DH scalar x_u for the session in flight.
    pub(crate) ephemeral_private_key: [u8; PRIVATE_KEY_LENGTH],
    /// OPRF blinding scalar r for the session in flight.
    pub(crate) blind_scalar: [u8; PRIVATE_KEY_LENGTH],
}

impl Initiator {
    /// Creates an initiator for the given account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if `account_id` is empty or too
    /// long.
    pub fn new(account_id: &str) -> OpaqueResult<Self> {
        if account_id.is_empty() || account_id.len() > MAX_ACCOUNT_ID_LENGTH {
            return Err(OpaqueError::InvalidInput);
        }
        crypto::init();
        Ok(Self {
            account_id: account_id.to_string(),
            phase: InitiatorPhase::Fresh,
            ephemeral_private_key: [0u8; PRIVATE_KEY_LENGTH],
            blind_scalar: [0u8; PRIVATE_KEY_LENGTH],
        })
    }

    /// Returns the account identifier this initiator is bound to.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Returns the current protocol phase.
    pub fn phase(&self) -> InitiatorPhase {
        self.phase
    }

    /// Discards the session in flight, zeroizing the ephemeral key and
    /// blinding scalar, and returns to [`InitiatorPhase::Fresh`].
    pub fn abort(&mut self) {
        self.ephemeral_private_key.zeroize();
        self.blind_scalar.zeroize();
        self.phase = InitiatorPhase::Fresh;
    }
}
