// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

//! Core library for the Shade OPAQUE protocol.
//!
//! Implements an asymmetric PAKE (aPAKE) in which a client holding only a
//! password and a relay holding a per-account password file derive a shared
//! high-entropy session key, without the relay ever learning the password and
//! without a network observer gaining an offline dictionary-attack advantage.
//! All group operations run over Ristretto255, a safe prime-order group with a
//! canonical 32-byte element encoding and constant-time arithmetic.
//!
//! # Crate layout
//!
//! * [`types`] -- shared constants, error types, and the credential envelope container.
//! * [`crypto`] -- low-level primitives: Ristretto255 via libsodium, SHA-3, HKDF,
//!   Argon2id, the keyed-BLAKE2b PRF, and the key-committing envelope cipher.
//! * [`oprf`] -- oblivious pseudo-random function (2HashDH) over Ristretto255.
//! * [`envelope`] -- credential envelope seal/open under the randomized password.
//! * [`key_exchange`] -- triple Diffie-Hellman and session-key derivation.
//! * [`protocol`] -- wire-format serialization and parsing for protocol messages.

/// Low-level cryptographic primitives.
pub mod crypto;
/// Credential envelope seal and open operations.
pub mod envelope;
/// Triple Diffie-Hellman key exchange and session-key derivation.
pub mod key_exchange;
/// Oblivious pseudo-random function (OPRF) over Ristretto255.
pub mod oprf;
/// Wire-format serialization and parsing for protocol messages.
pub mod protocol;
/// Shared constants, error types, and the envelope container.
pub mod types;
