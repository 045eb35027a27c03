// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a canonical Ristretto255 scalar encoding.
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// Length of a canonical Ristretto255 element encoding.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a SHA3-512 digest.
pub const HASH_LENGTH: usize = 64;
/// Length of the uniform byte string reduced into a scalar.
pub const SCALAR_UNIFORM_LENGTH: usize = 64;
/// Length of the Argon2id-hardened randomized password.
pub const RANDOMIZED_PWD_LENGTH: usize = 32;
/// Length of the envelope cipher and authentication keys.
pub const SYMMETRIC_KEY_LENGTH: usize = 32;
/// Length of the HMAC-SHA3-256 envelope tag.
pub const TAG_LENGTH: usize = 32;
/// Length of the raw triple-DH shared secret.
pub const SHARED_SECRET_LENGTH: usize = 32;
/// Length of the derived session key.
pub const SESSION_KEY_LENGTH: usize = 32;
/// Length of a confirmation tag.
pub const CONFIRMATION_LENGTH: usize = 32;
/// Length of the serialized envelope plaintext (p_u, P_u, P_s).
pub const ENVELOPE_PLAINTEXT_LENGTH: usize = 3 * PUBLIC_KEY_LENGTH;

pub const MAX_PASSWORD_LENGTH: usize = 4096;
pub const MAX_ACCOUNT_ID_LENGTH: usize = 1024;

const _: () = assert!(PRIVATE_KEY_LENGTH == PUBLIC_KEY_LENGTH);
const _: () = assert!(SCALAR_UNIFORM_LENGTH == 2 * PRIVATE_KEY_LENGTH);
const _: () = assert!(ENVELOPE_PLAINTEXT_LENGTH == 96);
const _: () = assert!(SESSION_KEY_LENGTH == CONFIRMATION_LENGTH);

/// Derivation labels fed to the keyed PRF when splitting the raw key-exchange
/// output. The byte values are part of the wire contract.
pub mod labels {
    /// Session key.
    pub const SESSION_KEY: u8 = 0;
    /// Relay-to-client confirmation tag.
    pub const RESPONDER_CONFIRMATION: u8 = 1;
    /// Client-to-relay confirmation tag.
    pub const INITIATOR_CONFIRMATION: u8 = 2;

    /// Domain label for the password-hardening salt derivation.
    pub const KSF_SALT: &[u8] = b"ECLIPTIX-SHADE-v1/KSF-Salt";
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueError {
    #[error("invalid input")]
    InvalidInput,
    #[error("operation not permitted in the current protocol state")]
    InvalidState,
    /// Malformed wire encoding, including non-canonical scalars and elements.
    #[error("malformed protocol message")]
    DecodeError,
    #[error("cryptographic operation failed")]
    CryptoError,
    /// The single client-side failure. Envelope tag mismatch, envelope parse
    /// failure, and confirmation-tag mismatch all collapse into this variant
    /// and are indistinguishable to the caller.
    #[error("authentication failed")]
    AuthenticationFailed,
    /// No password file exists for the requested account. Surfaced to the
    /// relay caller only; on the wire it must not be distinguishable from
    /// `AuthenticationFailed`.
    #[error("unknown account")]
    UnknownUser,
    #[error("account is already registered")]
    DuplicateRegistration,
    #[error("no pending registration for this account")]
    NoPendingRegistration,
}

pub type OpaqueResult<T> = Result<T, OpaqueError>;

/// Key-committing authenticated ciphertext holding the client's sealed key
/// material. The tag commits to both the authentication key and the
/// ciphertext, so two distinct randomized passwords cannot open the same
/// envelope.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Envelope {
    pub tag: [u8; TAG_LENGTH],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            tag: [0u8; TAG_LENGTH],
            ciphertext: Vec::new(),
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Envelope({} byte ciphertext)", self.ciphertext.len())
    }
}

/// Compares two byte slices in constant time. Slices of unequal length
/// compare unequal without inspecting their contents.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    // SAFETY: Both pointers come from valid slices of equal length.
    unsafe {
        libsodium_sys::sodium_memcmp(
            a.as_ptr() as *const _,
            b.as_ptr() as *const _,
            a.len(),
        ) == 0
    }
}

pub fn is_all_zero(data: &[u8]) -> bool {
    // SAFETY: Pointer and length come from a valid slice.
    unsafe { libsodium_sys::sodium_is_zero(data.as_ptr(), data.len()) == 1 }
}
