// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

//! Triple Diffie-Hellman key exchange.
//!
//! Each side contributes one static and one ephemeral key pair. The raw
//! shared secret hashes the three DH products in the fixed wire order
//! `(P_u·X_s) ‖ (X_u·P_s) ‖ (X_u·X_s)`; the session key and the two
//! confirmation tags are then split off with the keyed PRF.

use crate::crypto;
use crate::types::{
    labels, OpaqueResult, CONFIRMATION_LENGTH, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
    SESSION_KEY_LENGTH, SHARED_SECRET_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Keys derived from one completed exchange.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKeys {
    /// Shared session key handed to the caller.
    pub session_key: [u8; SESSION_KEY_LENGTH],
    /// Relay-to-client confirmation tag (f1).
    pub responder_confirmation: [u8; CONFIRMATION_LENGTH],
    /// Client-to-relay confirmation tag (f2).
    pub initiator_confirmation: [u8; CONFIRMATION_LENGTH],
}

/// Computes the raw shared secret on the client side:
/// `H(X_s^{p_u} ‖ P_s^{x_u} ‖ X_s^{x_u})`.
///
/// # Errors
///
/// Returns [`crate::types::OpaqueError::CryptoError`] if any DH product is
/// invalid (degenerate peer key).
pub fn initiator_shared_secret(
    static_private_key: &[u8; PRIVATE_KEY_LENGTH],
    ephemeral_private_key: &[u8; PRIVATE_KEY_LENGTH],
    responder_static_public_key: &[u8; PUBLIC_KEY_LENGTH],
    responder_ephemeral_public_key: &[u8; PUBLIC_KEY_LENGTH],
    secret_out: &mut [u8; SHARED_SECRET_LENGTH],
) -> OpaqueResult<()> {
    let mut dh1 = [0u8; PUBLIC_KEY_LENGTH];
    let mut dh2 = [0u8; PUBLIC_KEY_LENGTH];
    let mut dh3 = [0u8; PUBLIC_KEY_LENGTH];

    let result = crypto::scalar_mult(static_private_key, responder_ephemeral_public_key, &mut dh1)
        .and_then(|_| {
            crypto::scalar_mult(ephemeral_private_key, responder_static_public_key, &mut dh2)
        })
        .and_then(|_| {
            crypto::scalar_mult(ephemeral_private_key, responder_ephemeral_public_key, &mut dh3)
        });

    if result.is_ok() {
        crypto::sha3_256_multi(&[&dh1, &dh2, &dh3], secret_out);
    }
    dh1.zeroize();
    dh2.zeroize();
    dh3.zeroize();
    result
}

/// Computes the raw shared secret on the relay side:
/// `H(P_u^{x_s} ‖ X_u^{p_s} ‖ X_u^{x_s})`. Equal to the client's view for
/// honestly generated keys.
///
/// # Errors
///
/// Returns [`crate::types::OpaqueError::CryptoError`] if any DH product is
/// invalid (degenerate peer key).
pub fn responder_shared_secret(
    static_private_key: &[u8; PRIVATE_KEY_LENGTH],
    ephemeral_private_key: &[u8; PRIVATE_KEY_LENGTH],
    initiator_static_public_key: &[u8; PUBLIC_KEY_LENGTH],
    initiator_ephemeral_public_key: &[u8; PUBLIC_KEY_LENGTH],
    secret_out: &mut [u8; SHARED_SECRET_LENGTH],
) -> OpaqueResult<()> {
    let mut dh1 = [0u8; PUBLIC_KEY_LENGTH];
    let mut dh2 = [0u8; PUBLIC_KEY_LENGTH];
    let mut dh3 = [0u8; PUBLIC_KEY_LENGTH];

    let result = crypto::scalar_mult(ephemeral_private_key, initiator_static_public_key, &mut dh1)
        .and_then(|_| {
            crypto::scalar_mult(static_private_key, initiator_ephemeral_public_key, &mut dh2)
        })
        .and_then(|_| {
            crypto::scalar_mult(ephemeral_private_key, initiator_ephemeral_public_key, &mut dh3)
        });

    if result.is_ok() {
        crypto::sha3_256_multi(&[&dh1, &dh2, &dh3], secret_out);
    }
    dh1.zeroize();
    dh2.zeroize();
    dh3.zeroize();
    result
}

/// Splits the raw shared secret into the session key and the two
/// confirmation tags.
///
/// # Errors
///
/// Returns [`crate::types::OpaqueError::CryptoError`] if the PRF rejects the
/// key.
pub fn derive_session_keys(shared_secret: &[u8; SHARED_SECRET_LENGTH]) -> OpaqueResult<SessionKeys> {
    let mut keys = SessionKeys {
        session_key: [0u8; SESSION_KEY_LENGTH],
        responder_confirmation: [0u8; CONFIRMATION_LENGTH],
        initiator_confirmation: [0u8; CONFIRMATION_LENGTH],
    };
    crypto::prf(shared_secret, labels::SESSION_KEY, &mut keys.session_key)?;
    crypto::prf(
        shared_secret,
        labels::RESPONDER_CONFIRMATION,
        &mut keys.responder_confirmation,
    )?;
    crypto::prf(
        shared_secret,
        labels::INITIATOR_CONFIRMATION,
        &mut keys.initiator_confirmation,
    )?;
    Ok(keys)
}
