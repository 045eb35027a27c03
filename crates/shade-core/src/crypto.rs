// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

use std::sync::Once;

use argon2::{Algorithm, Argon2, Params, Version};
use blake2::digest::consts::U32;
use blake2::Blake2bMac;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha3::{Digest, Sha3_256, Sha3_512};
use zeroize::Zeroize;

use crate::types::{
    constant_time_eq, is_all_zero, labels, OpaqueError, OpaqueResult, HASH_LENGTH,
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, RANDOMIZED_PWD_LENGTH, SCALAR_UNIFORM_LENGTH,
    SESSION_KEY_LENGTH, SHARED_SECRET_LENGTH, SYMMETRIC_KEY_LENGTH, TAG_LENGTH,
};

/// Argon2id pass count for password hardening.
const KSF_TIME_COST: u32 = 3;
/// Argon2id memory cost in KiB.
const KSF_MEMORY_KIB: u32 = 100_000;
/// Argon2id lane count.
const KSF_PARALLELISM: u32 = 4;
/// Length of the derived Argon2id salt.
const KSF_SALT_LENGTH: usize = 16;
/// AES block length, used as the CTR IV width.
const AES_IV_LENGTH: usize = 16;

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;
type HmacSha3 = Hmac<Sha3_256>;
type Blake2bPrf = Blake2bMac<U32>;

static SODIUM_INIT: Once = Once::new();

/// Initializes libsodium. Called once per process; every entry point that
/// consumes entropy calls this, and the agent and relay constructors call it
/// eagerly.
pub fn init() {
    SODIUM_INIT.call_once(|| {
        // SAFETY: sodium_init is idempotent; a negative return means the
        // library is unusable and nothing cryptographic may proceed.
        let rc = unsafe { libsodium_sys::sodium_init() };
        assert!(rc >= 0, "libsodium initialization failed");
    });
}

/// Fills `buf` with cryptographically secure random bytes.
///
/// An exhausted or broken entropy source aborts the process inside libsodium;
/// there is no recovery path by design of the protocol.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `buf` is empty.
pub fn random_bytes(buf: &mut [u8]) -> OpaqueResult<()> {
    if buf.is_empty() {
        return Err(OpaqueError::InvalidInput);
    }
    init();
    // SAFETY: buf is a valid mutable slice; length matches buf.len().
    unsafe {
        libsodium_sys::randombytes_buf(buf.as_mut_ptr() as *mut _, buf.len());
    }
    Ok(())
}

/// Samples a uniformly random, non-zero Ristretto255 scalar by reducing 64
/// uniform bytes modulo the group order.
pub fn random_scalar() -> [u8; PRIVATE_KEY_LENGTH] {
    init();
    loop {
        let mut wide = [0u8; SCALAR_UNIFORM_LENGTH];
        // SAFETY: wide is a valid 64-byte buffer. randombytes_buf aborts the
        // process when the entropy source fails.
        unsafe {
            libsodium_sys::randombytes_buf(wide.as_mut_ptr() as *mut _, wide.len());
        }
        let mut scalar = [0u8; PRIVATE_KEY_LENGTH];
        // SAFETY: wide is 64 bytes, scalar is 32 bytes, as the reduction requires.
        unsafe {
            libsodium_sys::crypto_core_ristretto255_scalar_reduce(
                scalar.as_mut_ptr(),
                wide.as_ptr(),
            );
        }
        wide.zeroize();
        if !is_all_zero(&scalar) {
            return scalar;
        }
    }
}

/// Performs Ristretto255 scalar multiplication: `result = scalar * point`.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the point is not canonical or the
/// product is the identity.
pub fn scalar_mult(
    scalar: &[u8; PRIVATE_KEY_LENGTH],
    point: &[u8; PUBLIC_KEY_LENGTH],
    result: &mut [u8; PUBLIC_KEY_LENGTH],
) -> OpaqueResult<()> {
    // SAFETY: All arrays are 32 bytes as required. Return code is checked.
    unsafe {
        if libsodium_sys::crypto_scalarmult_ristretto255(
            result.as_mut_ptr(),
            scalar.as_ptr(),
            point.as_ptr(),
        ) != 0
        {
            return Err(OpaqueError::CryptoError);
        }
    }
    Ok(())
}

/// Computes the Ristretto255 base-point multiplication: `result = scalar * G`.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the scalar is zero.
pub fn scalarmult_base(scalar: &[u8; PRIVATE_KEY_LENGTH]) -> OpaqueResult<[u8; PUBLIC_KEY_LENGTH]> {
    let mut result = [0u8; PUBLIC_KEY_LENGTH];
    // SAFETY: Both arrays are 32 bytes as required. Return code is checked.
    unsafe {
        if libsodium_sys::crypto_scalarmult_ristretto255_base(
            result.as_mut_ptr(),
            scalar.as_ptr(),
        ) != 0
        {
            return Err(OpaqueError::CryptoError);
        }
    }
    Ok(result)
}

/// Computes the modular inverse of a Ristretto255 scalar.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the scalar is zero.
pub fn scalar_invert(
    scalar: &[u8; PRIVATE_KEY_LENGTH],
    result: &mut [u8; PRIVATE_KEY_LENGTH],
) -> OpaqueResult<()> {
    // SAFETY: Both arrays are 32 bytes. Return code is checked.
    unsafe {
        if libsodium_sys::crypto_core_ristretto255_scalar_invert(
            result.as_mut_ptr(),
            scalar.as_ptr(),
        ) != 0
        {
            return Err(OpaqueError::CryptoError);
        }
    }
    Ok(())
}

/// Validates that `point` is a canonical, non-identity Ristretto255 element
/// encoding.
///
/// # Errors
///
/// Returns [`OpaqueError::DecodeError`] if `point` has the wrong length, is
/// the identity encoding, or is not a valid canonical encoding.
pub fn validate_element(point: &[u8]) -> OpaqueResult<()> {
    if point.len() != PUBLIC_KEY_LENGTH {
        return Err(OpaqueError::DecodeError);
    }
    if is_all_zero(point) {
        return Err(OpaqueError::DecodeError);
    }
    // SAFETY: Pointer comes from a valid slice of PUBLIC_KEY_LENGTH bytes.
    unsafe {
        if libsodium_sys::crypto_core_ristretto255_is_valid_point(point.as_ptr()) != 1 {
            return Err(OpaqueError::DecodeError);
        }
    }
    Ok(())
}

/// Validates that `scalar` is a canonical (fully reduced) Ristretto255 scalar
/// encoding. The check pads the candidate to 64 bytes, reduces, and compares
/// in constant time.
///
/// # Errors
///
/// Returns [`OpaqueError::DecodeError`] if `scalar` has the wrong length or
/// is not in reduced form.
pub fn validate_scalar(scalar: &[u8]) -> OpaqueResult<()> {
    if scalar.len() != PRIVATE_KEY_LENGTH {
        return Err(OpaqueError::DecodeError);
    }
    let mut wide = [0u8; SCALAR_UNIFORM_LENGTH];
    wide[..PRIVATE_KEY_LENGTH].copy_from_slice(scalar);
    let mut reduced = [0u8; PRIVATE_KEY_LENGTH];
    // SAFETY: wide is 64 bytes, reduced is 32 bytes, as the reduction requires.
    unsafe {
        libsodium_sys::crypto_core_ristretto255_scalar_reduce(
            reduced.as_mut_ptr(),
            wide.as_ptr(),
        );
    }
    let canonical = constant_time_eq(&reduced, scalar);
    wide.zeroize();
    reduced.zeroize();
    if canonical {
        Ok(())
    } else {
        Err(OpaqueError::DecodeError)
    }
}

/// Computes the SHA3-512 digest of the concatenation of all `parts`.
pub fn sha3_512_multi(parts: &[&[u8]], out: &mut [u8; HASH_LENGTH]) {
    let mut hasher = Sha3_512::new();
    for part in parts {
        hasher.update(part);
    }
    out.copy_from_slice(&hasher.finalize());
}

/// Computes the SHA3-256 digest of the concatenation of all `parts`.
pub fn sha3_256_multi(parts: &[&[u8]], out: &mut [u8; SHARED_SECRET_LENGTH]) {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    out.copy_from_slice(&hasher.finalize());
}

/// Hashes arbitrary input to a Ristretto255 group element: SHA3-512 followed
/// by the group's uniform-bytes-to-element map. Indifferentiable from a
/// random oracle into the group.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `input` is empty.
/// Returns [`OpaqueError::CryptoError`] if the element construction fails.
pub fn hash_to_group(input: &[u8], point_out: &mut [u8; PUBLIC_KEY_LENGTH]) -> OpaqueResult<()> {
    if input.is_empty() {
        return Err(OpaqueError::InvalidInput);
    }
    let mut hash = [0u8; HASH_LENGTH];
    sha3_512_multi(&[input], &mut hash);
    // SAFETY: hash is 64 bytes, point_out is 32 bytes. Return code is checked.
    unsafe {
        if libsodium_sys::crypto_core_ristretto255_from_hash(
            point_out.as_mut_ptr(),
            hash.as_ptr(),
        ) != 0
        {
            hash.zeroize();
            return Err(OpaqueError::CryptoError);
        }
    }
    hash.zeroize();
    Ok(())
}

/// Hardens a secret seed into the 32-byte randomized password with Argon2id.
///
/// The seed parts are absorbed into a single SHA3-512 digest; the salt is
/// derived from that digest under a fixed label, so the whole derivation is a
/// deterministic function of the seed.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `seed_parts` is empty or contains
/// an empty part.
/// Returns [`OpaqueError::CryptoError`] if Argon2id fails (e.g., the memory
/// cost cannot be satisfied).
pub fn kdf_password(
    seed_parts: &[&[u8]],
    out: &mut [u8; RANDOMIZED_PWD_LENGTH],
) -> OpaqueResult<()> {
    if seed_parts.is_empty() || seed_parts.iter().any(|p| p.is_empty()) {
        return Err(OpaqueError::InvalidInput);
    }

    let mut digest = [0u8; HASH_LENGTH];
    sha3_512_multi(seed_parts, &mut digest);

    let mut salt_full = [0u8; HASH_LENGTH];
    sha3_512_multi(&[labels::KSF_SALT, &digest], &mut salt_full);
    let mut salt = [0u8; KSF_SALT_LENGTH];
    salt.copy_from_slice(&salt_full[..KSF_SALT_LENGTH]);

    let params = Params::new(
        KSF_MEMORY_KIB,
        KSF_TIME_COST,
        KSF_PARALLELISM,
        Some(RANDOMIZED_PWD_LENGTH),
    )
    .map_err(|_| OpaqueError::CryptoError)?;
    let ksf = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let result = ksf
        .hash_password_into(&digest, &salt, out)
        .map_err(|_| OpaqueError::CryptoError);

    digest.zeroize();
    salt_full.zeroize();
    salt.zeroize();
    result
}

/// Derives the envelope cipher and authentication keys from the randomized
/// password via HKDF-SHA3-512 with empty salt and empty info.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the HKDF expansion fails.
pub fn envelope_keys(
    randomized_pwd: &[u8; RANDOMIZED_PWD_LENGTH],
    cipher_key: &mut [u8; SYMMETRIC_KEY_LENGTH],
    auth_key: &mut [u8; SYMMETRIC_KEY_LENGTH],
) -> OpaqueResult<()> {
    let hk = Hkdf::<Sha3_512>::new(None, randomized_pwd);
    let mut okm = [0u8; 2 * SYMMETRIC_KEY_LENGTH];
    hk.expand(&[], &mut okm)
        .map_err(|_| OpaqueError::CryptoError)?;
    cipher_key.copy_from_slice(&okm[..SYMMETRIC_KEY_LENGTH]);
    auth_key.copy_from_slice(&okm[SYMMETRIC_KEY_LENGTH..]);
    okm.zeroize();
    Ok(())
}

/// Encrypts `plaintext` with AES-256-CTR and authenticates the ciphertext
/// with HMAC-SHA3-256 under an independent key.
///
/// The IV is all zeros; the cipher key must be single-use, which the
/// per-envelope derivation from the randomized password guarantees. The tag
/// is computed under a key independent of the cipher key and commits to both
/// that key and the ciphertext.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `plaintext` is empty or
/// `ciphertext` has a different length than `plaintext`.
/// Returns [`OpaqueError::CryptoError`] if a primitive rejects its key.
pub fn encrypt_envelope(
    cipher_key: &[u8; SYMMETRIC_KEY_LENGTH],
    auth_key: &[u8; SYMMETRIC_KEY_LENGTH],
    plaintext: &[u8],
    ciphertext: &mut [u8],
    tag: &mut [u8; TAG_LENGTH],
) -> OpaqueResult<()> {
    if plaintext.is_empty() || ciphertext.len() != plaintext.len() {
        return Err(OpaqueError::InvalidInput);
    }

    ciphertext.copy_from_slice(plaintext);
    let iv = [0u8; AES_IV_LENGTH];
    let mut cipher = Aes256Ctr::new(cipher_key.into(), (&iv).into());
    cipher.apply_keystream(ciphertext);

    mac_tag(auth_key, ciphertext, tag)
}

/// Verifies the HMAC-SHA3-256 tag in constant time, then decrypts
/// `ciphertext` with AES-256-CTR.
///
/// # Errors
///
/// Returns [`OpaqueError::InvalidInput`] if `ciphertext` is empty or
/// `plaintext` has a different length than `ciphertext`.
/// Returns [`OpaqueError::AuthenticationFailed`] if the tag does not verify.
pub fn decrypt_envelope(
    cipher_key: &[u8; SYMMETRIC_KEY_LENGTH],
    auth_key: &[u8; SYMMETRIC_KEY_LENGTH],
    ciphertext: &[u8],
    tag: &[u8; TAG_LENGTH],
    plaintext: &mut [u8],
) -> OpaqueResult<()> {
    if ciphertext.is_empty() || plaintext.len() != ciphertext.len() {
        return Err(OpaqueError::InvalidInput);
    }

    let mut expected = [0u8; TAG_LENGTH];
    mac_tag(auth_key, ciphertext, &mut expected)?;
    let valid = constant_time_eq(&expected, tag);
    expected.zeroize();
    if !valid {
        return Err(OpaqueError::AuthenticationFailed);
    }

    plaintext.copy_from_slice(ciphertext);
    let iv = [0u8; AES_IV_LENGTH];
    let mut cipher = Aes256Ctr::new(cipher_key.into(), (&iv).into());
    cipher.apply_keystream(plaintext);
    Ok(())
}

/// Computes the HMAC-SHA3-256 tag over `data`.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the MAC rejects the key.
pub fn mac_tag(
    auth_key: &[u8; SYMMETRIC_KEY_LENGTH],
    data: &[u8],
    tag_out: &mut [u8; TAG_LENGTH],
) -> OpaqueResult<()> {
    let mut mac = <HmacSha3 as Mac>::new_from_slice(auth_key)
        .map_err(|_| OpaqueError::CryptoError)?;
    mac.update(data);
    tag_out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(())
}

/// Keyed-BLAKE2b-256 PRF over a single label byte. Splits the raw
/// key-exchange output into the session key and the two confirmation tags.
///
/// # Errors
///
/// Returns [`OpaqueError::CryptoError`] if the MAC rejects the key.
pub fn prf(
    key: &[u8; SHARED_SECRET_LENGTH],
    label: u8,
    out: &mut [u8; SESSION_KEY_LENGTH],
) -> OpaqueResult<()> {
    let mut mac =
        <Blake2bPrf as Mac>::new_from_slice(key).map_err(|_| OpaqueError::CryptoError)?;
    mac.update(&[label]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(())
}
