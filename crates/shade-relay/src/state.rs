// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Relay (Responder)
// Licensed under the MIT License

use shade_core::crypto;
use shade_core::types::{Envelope, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::store::MemoryStore;

/// Transient per-account state between a registration begin and its
/// finalization. Removed on finalize regardless of outcome; callers may
/// garbage-collect stale entries through
/// [`Responder::pending_account_ids`](crate::Responder::pending_account_ids).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PendingRegistration {
    /// Per-account OPRF key k_s.
    pub oprf_key: [u8; PRIVATE_KEY_LENGTH],
    /// Per-account static private key p_s.
    pub responder_private_key: [u8; PRIVATE_KEY_LENGTH],
    /// Per-account static public key P_s = g^{p_s}.
    pub responder_public_key: [u8; PUBLIC_KEY_LENGTH],
}

/// Per-account record authenticating future logins. Holds the same secrets a
/// password hash would: anyone with this file can run an offline dictionary
/// attack against the password, which the Argon2id hardening in the OPRF
/// output makes costly. Never expose it beyond the relay.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PasswordFile {
    /// Per-account OPRF key k_s.
    pub oprf_key: [u8; PRIVATE_KEY_LENGTH],
    /// Per-account static private key p_s.
    pub responder_private_key: [u8; PRIVATE_KEY_LENGTH],
    /// Per-account static public key P_s.
    pub responder_public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Client static public key P_u.
    pub initiator_public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Client credential envelope, returned verbatim on every login.
    pub envelope: Envelope,
}

/// The relay in the OPAQUE protocol, generic over the backing store so a
/// deployment may substitute a durable one. Cheap to share behind an `Arc`;
/// all methods take `&self` and the store serializes access internally.
pub struct Responder<S = MemoryStore> {
    pub(crate) store: S,
}

impl Responder<MemoryStore> {
    /// Creates a relay backed by in-memory mappings.
    pub fn new() -> Self {
        crypto::init();
        Self {
            store: MemoryStore::new(),
        }
    }
}

impl Default for Responder<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Responder<S> {
    /// Creates a relay over a caller-provided store.
    pub fn with_store(store: S) -> Self {
        crypto::init();
        Self { store }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}
