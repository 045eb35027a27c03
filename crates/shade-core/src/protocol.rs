// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — Shade OPAQUE Protocol
// Licensed under the MIT License

//! Wire-format serialization and parsing for protocol messages.
//!
//! Encodings are deterministic: fixed-width fields are written raw in a fixed
//! order, variable-width fields (the account identifier and the envelope
//! ciphertext) carry a little-endian u16 length prefix. Parsing rejects
//! truncated input, trailing bytes, invalid UTF-8, and non-canonical group
//! elements with [`OpaqueError::DecodeError`].

use crate::crypto;
use crate::types::{
    Envelope, OpaqueError, OpaqueResult, CONFIRMATION_LENGTH, MAX_ACCOUNT_ID_LENGTH,
    PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, TAG_LENGTH,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Per-account key material handed from relay to client when a registration
/// begins. This record crosses the caller's pre-authenticated confidential
/// channel and is never serialized by this crate.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RegistrationKeys {
    /// The relay's OPRF key for this account.
    pub oprf_key: [u8; PRIVATE_KEY_LENGTH],
    /// The relay's static public key for this account.
    pub responder_public_key: [u8; PUBLIC_KEY_LENGTH],
}

impl std::fmt::Debug for RegistrationKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegistrationKeys([REDACTED])")
    }
}

/// Registration upload: the sealed envelope and the client static public key.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct RegistrationRequest {
    pub account_id: String,
    pub envelope: Envelope,
    pub initiator_public_key: [u8; PUBLIC_KEY_LENGTH],
}

/// First login message, client to relay.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct UserSession {
    /// Blinded OPRF element α.
    pub blinded_element: [u8; PUBLIC_KEY_LENGTH],
    /// Client ephemeral public key X_u.
    pub initiator_ephemeral_public_key: [u8; PUBLIC_KEY_LENGTH],
    pub account_id: String,
}

/// Second login message, relay to client.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct ServerSession {
    /// Evaluated OPRF element β.
    pub evaluated_element: [u8; PUBLIC_KEY_LENGTH],
    /// Relay ephemeral public key X_s.
    pub responder_ephemeral_public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Relay confirmation tag f1.
    pub responder_confirmation: [u8; CONFIRMATION_LENGTH],
    pub envelope: Envelope,
}

/// Final login message, client to relay.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct ClientConfirmation {
    pub account_id: String,
    /// Client confirmation tag f2.
    pub confirmation: [u8; CONFIRMATION_LENGTH],
}

impl RegistrationRequest {
    /// Serializes the message: sid ‖ envelope ‖ P_u.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if a variable field exceeds its
    /// length prefix.
    pub fn to_bytes(&self) -> OpaqueResult<Vec<u8>> {
        let mut out = Vec::with_capacity(
            2 + self.account_id.len() + envelope_wire_len(&self.envelope) + PUBLIC_KEY_LENGTH,
        );
        write_account_id(&mut out, &self.account_id)?;
        write_envelope(&mut out, &self.envelope)?;
        out.extend_from_slice(&self.initiator_public_key);
        Ok(out)
    }

    /// Parses and validates a serialized registration request.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DecodeError`] on any malformed encoding,
    /// including a non-canonical public key.
    pub fn from_bytes(data: &[u8]) -> OpaqueResult<Self> {
        let mut reader = Reader::new(data);
        let account_id = read_account_id(&mut reader)?;
        let envelope = read_envelope(&mut reader)?;
        let initiator_public_key = reader.take_array::<PUBLIC_KEY_LENGTH>()?;
        reader.finish()?;
        crypto::validate_element(&initiator_public_key)?;
        Ok(Self {
            account_id,
            envelope,
            initiator_public_key,
        })
    }
}

impl UserSession {
    /// Serializes the message: α ‖ X_u ‖ sid.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if the account identifier
    /// exceeds its length prefix.
    pub fn to_bytes(&self) -> OpaqueResult<Vec<u8>> {
        let mut out = Vec::with_capacity(2 * PUBLIC_KEY_LENGTH + 2 + self.account_id.len());
        out.extend_from_slice(&self.blinded_element);
        out.extend_from_slice(&self.initiator_ephemeral_public_key);
        write_account_id(&mut out, &self.account_id)?;
        Ok(out)
    }

    /// Parses and validates a serialized user session.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DecodeError`] on any malformed encoding,
    /// including non-canonical elements.
    pub fn from_bytes(data: &[u8]) -> OpaqueResult<Self> {
        let mut reader = Reader::new(data);
        let blinded_element = reader.take_array::<PUBLIC_KEY_LENGTH>()?;
        let initiator_ephemeral_public_key = reader.take_array::<PUBLIC_KEY_LENGTH>()?;
        let account_id = read_account_id(&mut reader)?;
        reader.finish()?;
        crypto::validate_element(&blinded_element)?;
        crypto::validate_element(&initiator_ephemeral_public_key)?;
        Ok(Self {
            blinded_element,
            initiator_ephemeral_public_key,
            account_id,
        })
    }
}

impl ServerSession {
    /// Serializes the message: β ‖ X_s ‖ f1 ‖ envelope.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if the envelope ciphertext
    /// exceeds its length prefix.
    pub fn to_bytes(&self) -> OpaqueResult<Vec<u8>> {
        let mut out = Vec::with_capacity(
            2 * PUBLIC_KEY_LENGTH + CONFIRMATION_LENGTH + envelope_wire_len(&self.envelope),
        );
        out.extend_from_slice(&self.evaluated_element);
        out.extend_from_slice(&self.responder_ephemeral_public_key);
        out.extend_from_slice(&self.responder_confirmation);
        write_envelope(&mut out, &self.envelope)?;
        Ok(out)
    }

    /// Parses and validates a serialized server session.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DecodeError`] on any malformed encoding,
    /// including non-canonical elements.
    pub fn from_bytes(data: &[u8]) -> OpaqueResult<Self> {
        let mut reader = Reader::new(data);
        let evaluated_element = reader.take_array::<PUBLIC_KEY_LENGTH>()?;
        let responder_ephemeral_public_key = reader.take_array::<PUBLIC_KEY_LENGTH>()?;
        let responder_confirmation = reader.take_array::<CONFIRMATION_LENGTH>()?;
        let envelope = read_envelope(&mut reader)?;
        reader.finish()?;
        crypto::validate_element(&evaluated_element)?;
        crypto::validate_element(&responder_ephemeral_public_key)?;
        Ok(Self {
            evaluated_element,
            responder_ephemeral_public_key,
            responder_confirmation,
            envelope,
        })
    }
}

impl ClientConfirmation {
    /// Serializes the message: sid ‖ f2.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::InvalidInput`] if the account identifier
    /// exceeds its length prefix.
    pub fn to_bytes(&self) -> OpaqueResult<Vec<u8>> {
        let mut out = Vec::with_capacity(2 + self.account_id.len() + CONFIRMATION_LENGTH);
        write_account_id(&mut out, &self.account_id)?;
        out.extend_from_slice(&self.confirmation);
        Ok(out)
    }

    /// Parses a serialized client confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`OpaqueError::DecodeError`] on any malformed encoding.
    pub fn from_bytes(data: &[u8]) -> OpaqueResult<Self> {
        let mut reader = Reader::new(data);
        let account_id = read_account_id(&mut reader)?;
        let confirmation = reader.take_array::<CONFIRMATION_LENGTH>()?;
        reader.finish()?;
        Ok(Self {
            account_id,
            confirmation,
        })
    }
}

fn envelope_wire_len(envelope: &Envelope) -> usize {
    TAG_LENGTH + 2 + envelope.ciphertext.len()
}

fn write_u16(out: &mut Vec<u8>, value: usize) -> OpaqueResult<()> {
    let value = u16::try_from(value).map_err(|_| OpaqueError::InvalidInput)?;
    out.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

fn write_account_id(out: &mut Vec<u8>, account_id: &str) -> OpaqueResult<()> {
    if account_id.is_empty() || account_id.len() > MAX_ACCOUNT_ID_LENGTH {
        return Err(OpaqueError::InvalidInput);
    }
    write_u16(out, account_id.len())?;
    out.extend_from_slice(account_id.as_bytes());
    Ok(())
}

fn write_envelope(out: &mut Vec<u8>, envelope: &Envelope) -> OpaqueResult<()> {
    out.extend_from_slice(&envelope.tag);
    write_u16(out, envelope.ciphertext.len())?;
    out.extend_from_slice(&envelope.ciphertext);
    Ok(())
}

fn read_account_id(reader: &mut Reader<'_>) -> OpaqueResult<String> {
    let len = reader.take_u16()?;
    if len == 0 || len > MAX_ACCOUNT_ID_LENGTH {
        return Err(OpaqueError::DecodeError);
    }
    let bytes = reader.take(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| OpaqueError::DecodeError)
}

fn read_envelope(reader: &mut Reader<'_>) -> OpaqueResult<Envelope> {
    let tag = reader.take_array::<TAG_LENGTH>()?;
    let len = reader.take_u16()?;
    let ciphertext = reader.take(len)?.to_vec();
    Ok(Envelope { tag, ciphertext })
}

/// Bounds-checked cursor over a received message.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, len: usize) -> OpaqueResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(OpaqueError::DecodeError)?;
        if end > self.data.len() {
            return Err(OpaqueError::DecodeError);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> OpaqueResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn take_u16(&mut self) -> OpaqueResult<usize> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]) as usize)
    }

    fn finish(self) -> OpaqueResult<()> {
        if self.pos != self.data.len() {
            return Err(OpaqueError::DecodeError);
        }
        Ok(())
    }
}
