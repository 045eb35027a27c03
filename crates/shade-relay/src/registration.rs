// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Relay (Responder)
// Licensed under the MIT License

use shade_core::crypto;
use shade_core::protocol::{RegistrationKeys, RegistrationRequest};
use shade_core::types::{
    OpaqueError, OpaqueResult, ENVELOPE_PLAINTEXT_LENGTH, MAX_ACCOUNT_ID_LENGTH,
};

use crate::state::{PasswordFile, PendingRegistration, Responder};
use crate::store::FileStore;

impl<S: FileStore> Responder<S> {
    /// Opens a registration for an account: allocates the per-account OPRF
    /// key and static key pair, parks them as a pending registration, and
    /// returns the client's share.
    ///
    /// The returned [`RegistrationKeys`] contain the OPRF key and MUST only
    /// travel to the client over a mutually authenticated confidential
    /// channel. Re-beginning an unfinished registration replaces the pending
    /// entry.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if `account_id` is empty or too
    /// long.
    /// Returns [`OpaqueError::DuplicateRegistration`] if the account already
    /// has a password file.
    pub fn begin_registration(&self, account_id: &str) -> OpaqueResult<RegistrationKeys> {
        if account_id.is_empty() || account_id.len() > MAX_ACCOUNT_ID_LENGTH {
            return Err(OpaqueError::InvalidInput);
        }
        if self.store.contains_file(account_id) {
            return Err(OpaqueError::DuplicateRegistration);
        }

        let oprf_key = crypto::random_scalar();
        let responder_private_key = crypto::random_scalar();
        let responder_public_key = crypto::scalarmult_base(&responder_private_key)?;

        self.store.store_pending(
            account_id,
            PendingRegistration {
                oprf_key,
                responder_private_key,
                responder_public_key,
            },
        );

        Ok(RegistrationKeys {
            oprf_key,
            responder_public_key,
        })
    }

    /// Finalizes a registration from the client's upload, constructing and
    /// storing the account's password file.
    ///
    /// The pending entry is consumed whether or not finalization succeeds, so
    /// a failed upload requires a fresh [`begin_registration`](Self::begin_registration).
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DuplicateRegistration`] if the account already
    /// has a password file.
    /// Returns [`OpaqueError::NoPendingRegistration`] if no begin matches the
    /// account.
    /// Returns [`OpaqueError::DecodeError`] if the uploaded public key or
    /// envelope is malformed.
    pub fn finalize_registration(&self, request: &RegistrationRequest) -> OpaqueResult<()> {
        let pending = self.store.take_pending(&request.account_id);
        if self.store.contains_file(&request.account_id) {
            return Err(OpaqueError::DuplicateRegistration);
        }
        let pending = pending.ok_or(OpaqueError::NoPendingRegistration)?;

        crypto::validate_element(&request.initiator_public_key)?;
        if request.envelope.ciphertext.len() != ENVELOPE_PLAINTEXT_LENGTH {
            return Err(OpaqueError::DecodeError);
        }

        let file = PasswordFile {
            oprf_key: pending.oprf_key,
            responder_private_key: pending.responder_private_key,
            responder_public_key: pending.responder_public_key,
            initiator_public_key: request.initiator_public_key,
            envelope: request.envelope.clone(),
        };

        self.store.store_file(&request.account_id, file)
    }

    /// Lists accounts with a pending registration. The core sets no timer;
    /// garbage collection is the caller's policy.
    pub fn pending_account_ids(&self) -> Vec<String> {
        self.store.pending_account_ids()
    }

    /// Discards the pending registration for an account, reporting whether
    /// one existed.
    pub fn remove_pending(&self, account_id: &str) -> bool {
        self.store.remove_pending(account_id)
    }

    /// Reports whether an account has completed registration.
    pub fn is_registered(&self, account_id: &str) -> bool {
        self.store.contains_file(account_id)
    }
}
