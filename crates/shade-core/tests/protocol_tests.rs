use shade_core::crypto;
use shade_core::protocol::{
    ClientConfirmation, RegistrationRequest, ServerSession, UserSession,
};
use shade_core::types::*;

fn element() -> [u8; PUBLIC_KEY_LENGTH] {
    crypto::scalarmult_base(&crypto::random_scalar()).unwrap()
}

fn envelope() -> Envelope {
    let mut env = Envelope::new();
    crypto::random_bytes(&mut env.tag).unwrap();
    env.ciphertext = vec![0xABu8; ENVELOPE_PLAINTEXT_LENGTH];
    env
}

#[test]
fn registration_request_roundtrip() {
    let msg = RegistrationRequest {
        account_id: "alice".to_string(),
        envelope: envelope(),
        initiator_public_key: element(),
    };
    let bytes = msg.to_bytes().unwrap();
    let parsed = RegistrationRequest::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.account_id, msg.account_id);
    assert_eq!(parsed.envelope.tag, msg.envelope.tag);
    assert_eq!(parsed.envelope.ciphertext, msg.envelope.ciphertext);
    assert_eq!(parsed.initiator_public_key, msg.initiator_public_key);
}

#[test]
fn user_session_roundtrip() {
    let msg = UserSession {
        blinded_element: element(),
        initiator_ephemeral_public_key: element(),
        account_id: "alice".to_string(),
    };
    let bytes = msg.to_bytes().unwrap();
    let parsed = UserSession::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.blinded_element, msg.blinded_element);
    assert_eq!(
        parsed.initiator_ephemeral_public_key,
        msg.initiator_ephemeral_public_key
    );
    assert_eq!(parsed.account_id, msg.account_id);
}

#[test]
fn server_session_roundtrip() {
    let msg = ServerSession {
        evaluated_element: element(),
        responder_ephemeral_public_key: element(),
        responder_confirmation: [0x77u8; CONFIRMATION_LENGTH],
        envelope: envelope(),
    };
    let bytes = msg.to_bytes().unwrap();
    let parsed = ServerSession::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.evaluated_element, msg.evaluated_element);
    assert_eq!(
        parsed.responder_ephemeral_public_key,
        msg.responder_ephemeral_public_key
    );
    assert_eq!(parsed.responder_confirmation, msg.responder_confirmation);
    assert_eq!(parsed.envelope.ciphertext, msg.envelope.ciphertext);
}

#[test]
fn client_confirmation_roundtrip() {
    let msg = ClientConfirmation {
        account_id: "alice".to_string(),
        confirmation: [0x11u8; CONFIRMATION_LENGTH],
    };
    let bytes = msg.to_bytes().unwrap();
    let parsed = ClientConfirmation::from_bytes(&bytes).unwrap();
    assert_eq!(parsed.account_id, msg.account_id);
    assert_eq!(parsed.confirmation, msg.confirmation);
}

#[test]
fn serialization_is_deterministic() {
    let msg = UserSession {
        blinded_element: element(),
        initiator_ephemeral_public_key: element(),
        account_id: "alice".to_string(),
    };
    assert_eq!(msg.to_bytes().unwrap(), msg.to_bytes().unwrap());
}

#[test]
fn parse_rejects_truncated_input() {
    let msg = UserSession {
        blinded_element: element(),
        initiator_ephemeral_public_key: element(),
        account_id: "alice".to_string(),
    };
    let bytes = msg.to_bytes().unwrap();
    assert!(UserSession::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn parse_rejects_trailing_bytes() {
    let msg = ClientConfirmation {
        account_id: "alice".to_string(),
        confirmation: [0u8; CONFIRMATION_LENGTH],
    };
    let mut bytes = msg.to_bytes().unwrap();
    bytes.push(0x00);
    assert!(ClientConfirmation::from_bytes(&bytes).is_err());
}

#[test]
fn parse_rejects_non_canonical_element() {
    let mut msg = UserSession {
        blinded_element: element(),
        initiator_ephemeral_public_key: element(),
        account_id: "alice".to_string(),
    };
    msg.blinded_element = [0xFFu8; PUBLIC_KEY_LENGTH];
    let bytes = msg.to_bytes().unwrap();
    assert!(UserSession::from_bytes(&bytes).is_err());
}

#[test]
fn parse_rejects_identity_element() {
    let mut msg = ServerSession {
        evaluated_element: element(),
        responder_ephemeral_public_key: element(),
        responder_confirmation: [0u8; CONFIRMATION_LENGTH],
        envelope: envelope(),
    };
    msg.evaluated_element = [0u8; PUBLIC_KEY_LENGTH];
    let bytes = msg.to_bytes().unwrap();
    assert!(ServerSession::from_bytes(&bytes).is_err());
}

#[test]
fn parse_rejects_invalid_utf8_account_id() {
    let msg = ClientConfirmation {
        account_id: "alice".to_string(),
        confirmation: [0u8; CONFIRMATION_LENGTH],
    };
    let mut bytes = msg.to_bytes().unwrap();
    // Corrupt the first identifier byte into an invalid UTF-8 sequence.
    bytes[2] = 0xFF;
    assert!(ClientConfirmation::from_bytes(&bytes).is_err());
}

#[test]
fn serialize_rejects_empty_account_id() {
    let msg = ClientConfirmation {
        account_id: String::new(),
        confirmation: [0u8; CONFIRMATION_LENGTH],
    };
    assert!(msg.to_bytes().is_err());
}

#[test]
fn serialize_rejects_oversized_account_id() {
    let msg = ClientConfirmation {
        account_id: "x".repeat(MAX_ACCOUNT_ID_LENGTH + 1),
        confirmation: [0u8; CONFIRMATION_LENGTH],
    };
    assert!(msg.to_bytes().is_err());
}
