// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

//! Credential envelope: key-committing authenticated encryption of the
//! client's static key pair together with the relay's static public key.
//!
//! Binding the relay key into the plaintext stops a malicious relay from
//! swapping its identity between registration and login; the envelope simply
//! fails to open against a substituted file.

use crate::crypto;
use crate::types::{
    constant_time_eq, Envelope, OpaqueError, OpaqueResult, ENVELOPE_PLAINTEXT_LENGTH,
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, RANDOMIZED_PWD_LENGTH, SYMMETRIC_KEY_LENGTH,
};
use zeroize::Zeroize;

/// Seals the client key material under the randomized password.
///
/// The plaintext layout is fixed: static private scalar, static public
/// element, relay static public element, 32 bytes each.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if key derivation or encryption fails.
pub fn seal(
    randomized_pwd: &[u8; RANDOMIZED_PWD_LENGTH],
    initiator_private_key: &[u8; PRIVATE_KEY_LENGTH],
    initiator_public_key: &[u8; PUBLIC_KEY_LENGTH],
    responder_public_key: &[u8; PUBLIC_KEY_LENGTH],
    envelope: &mut Envelope,
) -> OpaqueResult<()> {
    let mut cipher_key = [0u8; SYMMETRIC_KEY_LENGTH];
    let mut auth_key = [0u8; SYMMETRIC_KEY_LENGTH];
    crypto::envelope_keys(randomized_pwd, &mut cipher_key, &mut auth_key)?;

    let mut plaintext = [0u8; ENVELOPE_PLAINTEXT_LENGTH];
    plaintext[..PRIVATE_KEY_LENGTH].copy_from_slice(initiator_private_key);
    plaintext[PRIVATE_KEY_LENGTH..PRIVATE_KEY_LENGTH + PUBLIC_KEY_LENGTH]
        .copy_from_slice(initiator_public_key);
    plaintext[PRIVATE_KEY_LENGTH + PUBLIC_KEY_LENGTH..].copy_from_slice(responder_public_key);

    envelope.ciphertext.resize(ENVELOPE_PLAINTEXT_LENGTH, 0);
    let result = crypto::encrypt_envelope(
        &cipher_key,
        &auth_key,
        &plaintext,
        &mut envelope.ciphertext,
        &mut envelope.tag,
    );

    cipher_key.zeroize();
    auth_key.zeroize();
    plaintext.zeroize();
    result
}

/// Opens an envelope, recovering the client key pair and the relay static
/// public key.
///
/// The tag is verified in constant time before decryption. The recovered
/// scalar must be canonical, both elements must be valid, and the recovered
/// public key must equal the base-point multiple of the recovered private
/// key.
///
/// # Errors
///
/// Returns [`OpaqueError::AuthenticationFailed`] for every failure mode: a
/// wrong randomized password, a forged or malformed envelope, and an
/// inconsistent plaintext are indistinguishable to the caller.
pub fn open(
    envelope: &Envelope,
    randomized_pwd: &[u8; RANDOMIZED_PWD_LENGTH],
    initiator_private_key: &mut [u8; PRIVATE_KEY_LENGTH],
    initiator_public_key: &mut [u8; PUBLIC_KEY_LENGTH],
    responder_public_key: &mut [u8; PUBLIC_KEY_LENGTH],
) -> OpaqueResult<()> {
    if envelope.ciphertext.len() != ENVELOPE_PLAINTEXT_LENGTH {
        return Err(OpaqueError::AuthenticationFailed);
    }

    let mut cipher_key = [0u8; SYMMETRIC_KEY_LENGTH];
    let mut auth_key = [0u8; SYMMETRIC_KEY_LENGTH];
    crypto::envelope_keys(randomized_pwd, &mut cipher_key, &mut auth_key)
        .map_err(|_| OpaqueError::AuthenticationFailed)?;

    let mut plaintext = [0u8; ENVELOPE_PLAINTEXT_LENGTH];
    let result = crypto::decrypt_envelope(
        &cipher_key,
        &auth_key,
        &envelope.ciphertext,
        &envelope.tag,
        &mut plaintext,
    );
    cipher_key.zeroize();
    auth_key.zeroize();
    if result.is_err() {
        plaintext.zeroize();
        return Err(OpaqueError::AuthenticationFailed);
    }

    initiator_private_key.copy_from_slice(&plaintext[..PRIVATE_KEY_LENGTH]);
    initiator_public_key
        .copy_from_slice(&plaintext[PRIVATE_KEY_LENGTH..PRIVATE_KEY_LENGTH + PUBLIC_KEY_LENGTH]);
    responder_public_key
        .copy_from_slice(&plaintext[PRIVATE_KEY_LENGTH + PUBLIC_KEY_LENGTH..]);
    plaintext.zeroize();

    if crypto::validate_scalar(initiator_private_key).is_err()
        || crypto::validate_element(initiator_public_key).is_err()
        || crypto::validate_element(responder_public_key).is_err()
    {
        initiator_private_key.zeroize();
        initiator_public_key.zeroize();
        responder_public_key.zeroize();
        return Err(OpaqueError::AuthenticationFailed);
    }

    let derived = match crypto::scalarmult_base(initiator_private_key) {
        Ok(point) => point,
        Err(_) => {
            initiator_private_key.zeroize();
            initiator_public_key.zeroize();
            responder_public_key.zeroize();
            return Err(OpaqueError::AuthenticationFailed);
        }
    };
    if !constant_time_eq(initiator_public_key, &derived) {
        initiator_private_key.zeroize();
        initiator_public_key.zeroize();
        responder_public_key.zeroize();
        return Err(OpaqueError::AuthenticationFailed);
    }

    Ok(())
}
