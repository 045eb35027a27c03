// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

//! 2HashDH oblivious pseudo-random function over Ristretto255.
//!
//! The relay holds a per-account scalar key `k`; the client holds the
//! password. `finalize(blind(pw)) ∘ evaluate` computes the same hardened
//! output as [`evaluate_direct`] without the relay ever seeing the password.
//! The hardened output is the randomized password under which the credential
//! envelope is sealed.

use crate::crypto;
use crate::types::{
    OpaqueError, OpaqueResult, HASH_LENGTH, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH,
    RANDOMIZED_PWD_LENGTH,
};
use zeroize::Zeroize;

/// Blinds `password` for transmission: computes `H'(pw)^r` for a fresh random
/// scalar `r`, where `H'` is the hash-to-group map over SHA3-512.
///
/// The blinding scalar is written to `blind_scalar`; it must stay on the
/// client and be zeroized after [`finalize`].
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `password` is empty.
pub fn blind(
    password: &[u8],
    blinded_element: &mut [u8; PUBLIC_KEY_LENGTH],
    blind_scalar: &mut [u8; PRIVATE_KEY_LENGTH],
) -> OpaqueResult<()> {
    if password.is_empty() {
        return Err(OpaqueError::InvalidInput);
    }

    *blind_scalar = crypto::random_scalar();

    let mut element = [0u8; PUBLIC_KEY_LENGTH];
    crypto::hash_to_group(password, &mut element)?;

    crypto::scalar_mult(blind_scalar, &element, blinded_element)
}

/// Evaluates the OPRF on a blinded element: `β = α^k`.
pub fn evaluate(
    blinded_element: &[u8; PUBLIC_KEY_LENGTH],
    oprf_key: &[u8; PRIVATE_KEY_LENGTH],
    evaluated_element: &mut [u8; PUBLIC_KEY_LENGTH],
) -> OpaqueResult<()> {
    crypto::scalar_mult(oprf_key, blinded_element, evaluated_element)
}

/// Unblinds the evaluated element and hardens the result into the randomized
/// password: `rw = KDF(H(pw) ‖ encode(β^{1/r}))`.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `password` is empty.
/// Returns [`OpaqueError::CryptoError`] if the blinding scalar cannot be
/// inverted or a group operation fails.
pub fn finalize(
    password: &[u8],
    blind_scalar: &[u8; PRIVATE_KEY_LENGTH],
    evaluated_element: &[u8; PUBLIC_KEY_LENGTH],
    output: &mut [u8; RANDOMIZED_PWD_LENGTH],
) -> OpaqueResult<()> {
    if password.is_empty() {
        return Err(OpaqueError::InvalidInput);
    }

    let mut scalar_inv = [0u8; PRIVATE_KEY_LENGTH];
    crypto::scalar_invert(blind_scalar, &mut scalar_inv)?;

    let mut unblinded = [0u8; PUBLIC_KEY_LENGTH];
    let result = crypto::scalar_mult(&scalar_inv, evaluated_element, &mut unblinded);
    scalar_inv.zeroize();
    result?;

    let mut password_hash = [0u8; HASH_LENGTH];
    crypto::sha3_512_multi(&[password], &mut password_hash);

    let result = crypto::kdf_password(&[&password_hash, &unblinded], output);
    password_hash.zeroize();
    unblinded.zeroize();
    result
}

/// Registration-time OPRF evaluation with both inputs in hand.
///
/// During registration the relay's per-account key travels to the client over
/// the caller's pre-authenticated confidential channel, so the blinding round
/// trip is skipped and the randomized password is computed in one step.
/// Agrees bit-for-bit with `finalize ∘ evaluate ∘ blind`.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `password` is empty.
/// Returns [`OpaqueError::CryptoError`] if a group operation fails.
pub fn evaluate_direct(
    password: &[u8],
    oprf_key: &[u8; PRIVATE_KEY_LENGTH],
    output: &mut [u8; RANDOMIZED_PWD_LENGTH],
) -> OpaqueResult<()> {
    if password.is_empty() {
        return Err(OpaqueError::InvalidInput);
    }

    let mut element = [0u8; PUBLIC_KEY_LENGTH];
    crypto::hash_to_group(password, &mut element)?;

    let mut evaluated = [0u8; PUBLIC_KEY_LENGTH];
    crypto::scalar_mult(oprf_key, &element, &mut evaluated)?;

    let mut password_hash = [0u8; HASH_LENGTH];
    crypto::sha3_512_multi(&[password], &mut password_hash);

    let result = crypto::kdf_password(&[&password_hash, &evaluated], output);
    password_hash.zeroize();
    evaluated.zeroize();
    result
}
