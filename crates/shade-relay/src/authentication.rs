// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Relay (Responder)
// Licensed under the MIT License

use shade_core::protocol::{ServerSession, UserSession};
use shade_core::types::{
    OpaqueError, OpaqueResult, PUBLIC_KEY_LENGTH, SESSION_KEY_LENGTH, SHARED_SECRET_LENGTH,
};
use shade_core::{crypto, key_exchange, oprf};
use zeroize::Zeroize;

use crate::state::Responder;
use crate::store::FileStore;

impl<S: FileStore> Responder<S> {
    /// Handles a login attempt: evaluates the OPRF on the blinded element,
    /// samples a fresh ephemeral key, completes the triple-DH exchange
    /// against the stored file, and returns the response message together
    /// with the derived session key.
    ///
    /// The session key belongs to whoever holds the account's password; the
    /// relay cannot tell an honest client from an online guesser at this
    /// point, which is inherent to the protocol. Callers requiring explicit
    /// client confirmation must compare the client's tag out of band.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::UnknownUser`] if the account has no password
    /// file; transports MUST NOT surface this to the network differently
    /// from an authentication failure.
    /// Returns [`OpaqueError::DecodeError`] if a received element is not
    /// canonical.
    pub fn login_begin(
        &self,
        session: &UserSession,
    ) -> OpaqueResult<(ServerSession, [u8; SESSION_KEY_LENGTH])> {
        let file = self
            .store
            .lookup_file(&session.account_id)
            .ok_or(OpaqueError::UnknownUser)?;

        crypto::validate_element(&session.blinded_element)?;
        crypto::validate_element(&session.initiator_ephemeral_public_key)?;

        let mut ephemeral_private_key = crypto::random_scalar();
        let ephemeral_public_key = crypto::scalarmult_base(&ephemeral_private_key)?;

        let mut evaluated_element = [0u8; PUBLIC_KEY_LENGTH];
        oprf::evaluate(&session.blinded_element, &file.oprf_key, &mut evaluated_element)?;

        let mut shared_secret = [0u8; SHARED_SECRET_LENGTH];
        let result = key_exchange::responder_shared_secret(
            &file.responder_private_key,
            &ephemeral_private_key,
            &file.initiator_public_key,
            &session.initiator_ephemeral_public_key,
            &mut shared_secret,
        );
        ephemeral_private_key.zeroize();
        result?;

        let keys = key_exchange::derive_session_keys(&shared_secret)?;
        shared_secret.zeroize();

        let server_session = ServerSession {
            evaluated_element,
            responder_ephemeral_public_key: ephemeral_public_key,
            responder_confirmation: keys.responder_confirmation,
            envelope: file.envelope.clone(),
        };

        Ok((server_session, keys.session_key))
    }
}
