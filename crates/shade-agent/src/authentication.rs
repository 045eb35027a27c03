// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Agent (Initiator)
// Licensed under the MIT License

use shade_core::protocol::{ClientConfirmation, ServerSession, UserSession};
use shade_core::types::{
    constant_time_eq, OpaqueError, OpaqueResult, MAX_PASSWORD_LENGTH, PRIVATE_KEY_LENGTH,
    PUBLIC_KEY_LENGTH, RANDOMIZED_PWD_LENGTH, SESSION_KEY_LENGTH, SHARED_SECRET_LENGTH,
};
use shade_core::{crypto, envelope, key_exchange, oprf};
use zeroize::Zeroize;

use crate::state::{Initiator, InitiatorPhase};

impl Initiator {
    /// Starts a login: samples the ephemeral key and the OPRF blinding
    /// scalar, and emits the first protocol message.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidState`] if a session is already in
    /// flight; call [`Initiator::abort`] first to discard it.
    /// Returns [`OpaqueError::InvalidInput`] if `password` is empty or too
    /// long.
    pub fn login_start(&mut self, password: &[u8]) -> OpaqueResult<UserSession> {
        if self.phase != InitiatorPhase::Fresh {
            return Err(OpaqueError::InvalidState);
        }
        if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
            return Err(OpaqueError::InvalidInput);
        }

        self.ephemeral_private_key = crypto::random_scalar();
        let ephemeral_public_key = crypto::scalarmult_base(&self.ephemeral_private_key)?;

        let mut blinded_element = [0u8; PUBLIC_KEY_LENGTH];
        oprf::blind(password, &mut blinded_element, &mut self.blind_scalar)?;

        self.phase = InitiatorPhase::AwaitingSession;
        Ok(UserSession {
            blinded_element,
            initiator_ephemeral_public_key: ephemeral_public_key,
            account_id: self.account_id.clone(),
        })
    }

    /// Completes a login: unblinds the OPRF output, hardens it into the
    /// randomized password, opens the envelope, runs the triple-DH exchange,
    /// and verifies the relay's confirmation tag in constant time.
    ///
    /// On success the session key and the client confirmation message are
    /// returned and the phase moves to [`InitiatorPhase::Authenticated`]. On
    /// any failure the phase moves to [`InitiatorPhase::Failed`] and the one
    /// opaque [`OpaqueError::AuthenticationFailed`] is returned: a wrong
    /// password, a forged envelope, and a tampered or substituted relay
    /// response are indistinguishable in both error value and timing. The
    /// ephemeral key and blinding scalar are consumed either way.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidState`] if no session is awaiting a
    /// relay response.
    /// Returns [`OpaqueError::AuthenticationFailed`] for every verification
    /// failure.
    pub fn login_finish(
        &mut self,
        server_session: &ServerSession,
        password: &[u8],
    ) -> OpaqueResult<([u8; SESSION_KEY_LENGTH], ClientConfirmation)> {
        if self.phase != InitiatorPhase::AwaitingSession {
            return Err(OpaqueError::InvalidState);
        }

        let result = self.finish_session(server_session, password);
        self.ephemeral_private_key.zeroize();
        self.blind_scalar.zeroize();

        match result {
            Ok(output) => {
                self.phase = InitiatorPhase::Authenticated;
                Ok(output)
            }
            Err(_) => {
                self.phase = InitiatorPhase::Failed;
                Err(OpaqueError::AuthenticationFailed)
            }
        }
    }

    fn finish_session(
        &mut self,
        server_session: &ServerSession,
        password: &[u8],
    ) -> OpaqueResult<([u8; SESSION_KEY_LENGTH], ClientConfirmation)> {
        if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
            return Err(OpaqueError::InvalidInput);
        }
        crypto::validate_element(&server_session.evaluated_element)?;
        crypto::validate_element(&server_session.responder_ephemeral_public_key)?;

        let mut randomized_pwd = [0u8; RANDOMIZED_PWD_LENGTH];
        oprf::finalize(
            password,
            &self.blind_scalar,
            &server_session.evaluated_element,
            &mut randomized_pwd,
        )?;

        let mut static_private_key = [0u8; PRIVATE_KEY_LENGTH];
        let mut static_public_key = [0u8; PUBLIC_KEY_LENGTH];
        let mut responder_public_key = [0u8; PUBLIC_KEY_LENGTH];
        let opened = envelope::open(
            &server_session.envelope,
            &randomized_pwd,
            &mut static_private_key,
            &mut static_public_key,
            &mut responder_public_key,
        );
        randomized_pwd.zeroize();
        opened?;

        let mut shared_secret = [0u8; SHARED_SECRET_LENGTH];
        let exchanged = key_exchange::initiator_shared_secret(
            &static_private_key,
            &self.ephemeral_private_key,
            &responder_public_key,
            &server_session.responder_ephemeral_public_key,
            &mut shared_secret,
        );
        static_private_key.zeroize();
        exchanged?;

        let keys = key_exchange::derive_session_keys(&shared_secret)?;
        shared_secret.zeroize();

        if !constant_time_eq(
            &keys.responder_confirmation,
            &server_session.responder_confirmation,
        ) {
            return Err(OpaqueError::AuthenticationFailed);
        }

        Ok((
            keys.session_key,
            ClientConfirmation {
                account_id: self.account_id.clone(),
                confirmation: keys.initiator_confirmation,
            },
        ))
    }
}
