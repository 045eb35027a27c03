// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Agent (Initiator)
// Licensed under the MIT License

use shade_core::protocol::{RegistrationKeys, RegistrationRequest};
use shade_core::types::{
    Envelope, OpaqueError, OpaqueResult, MAX_PASSWORD_LENGTH, RANDOMIZED_PWD_LENGTH,
};
use shade_core::{crypto, envelope, oprf};
use zeroize::Zeroize;

use crate::state::{Initiator, InitiatorPhase};

impl Initiator {
    /// Registers this account with a relay: generates the long-term key
    /// pair, derives the randomized password from the relay-provided OPRF
    /// key, and seals the envelope.
    ///
    /// `registration_keys` arrive from the relay over the caller's mutually
    /// authenticated confidential channel; the relay sees the password's OPRF
    /// image but never the long-term private key, which exists only inside
    /// the envelope from here on. The private key is not retained: every
    /// login recovers it by opening the envelope.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidState`] if a registration or login is
    /// already in flight.
    /// Returns [`OpaqueError::InvalidInput`] if `password` is empty or too
    /// long.
    /// Returns [`OpaqueError::DecodeError`] if the relay public key is not a
    /// canonical group element.
    pub fn begin_registration(
        &mut self,
        registration_keys: &RegistrationKeys,
        password: &[u8],
    ) -> OpaqueResult<RegistrationRequest> {
        if self.phase != InitiatorPhase::Fresh {
            return Err(OpaqueError::InvalidState);
        }
        if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
            return Err(OpaqueError::InvalidInput);
        }
        crypto::validate_element(&registration_keys.responder_public_key)?;

        let mut static_private_key = crypto::random_scalar();
        let static_public_key = crypto::scalarmult_base(&static_private_key)?;

        let mut randomized_pwd = [0u8; RANDOMIZED_PWD_LENGTH];
        if let Err(err) = oprf::evaluate_direct(
            password,
            &registration_keys.oprf_key,
            &mut randomized_pwd,
        ) {
            static_private_key.zeroize();
            return Err(err);
        }

        let mut env = Envelope::new();
        let sealed = envelope::seal(
            &randomized_pwd,
            &static_private_key,
            &static_public_key,
            &registration_keys.responder_public_key,
            &mut env,
        );
        randomized_pwd.zeroize();
        static_private_key.zeroize();
        sealed?;

        self.phase = InitiatorPhase::AwaitingRegistration;
        Ok(RegistrationRequest {
            account_id: self.account_id.clone(),
            envelope: env,
            initiator_public_key: static_public_key,
        })
    }
}
