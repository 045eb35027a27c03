use std::sync::Arc;
use std::thread;

use shade_core::protocol::{RegistrationKeys, RegistrationRequest, UserSession};
use shade_core::types::*;
use shade_core::{crypto, envelope, oprf};
use shade_relay::*;

const ACCOUNT_ID: &str = "alice";
const PASSWORD: &[u8] = b"correct horse battery staple";

// Builds the client half of a registration without the agent crate.
fn registration_request(keys: &RegistrationKeys, account_id: &str) -> RegistrationRequest {
    let initiator_private_key = crypto::random_scalar();
    let initiator_public_key = crypto::scalarmult_base(&initiator_private_key).unwrap();

    let mut randomized_pwd = [0u8; RANDOMIZED_PWD_LENGTH];
    oprf::evaluate_direct(PASSWORD, &keys.oprf_key, &mut randomized_pwd).unwrap();

    let mut env = Envelope::new();
    envelope::seal(
        &randomized_pwd,
        &initiator_private_key,
        &initiator_public_key,
        &keys.responder_public_key,
        &mut env,
    )
    .unwrap();

    RegistrationRequest {
        account_id: account_id.to_string(),
        envelope: env,
        initiator_public_key,
    }
}

fn user_session(account_id: &str) -> UserSession {
    let ephemeral_private_key = crypto::random_scalar();
    let mut blinded = [0u8; PUBLIC_KEY_LENGTH];
    let mut blind_scalar = [0u8; PRIVATE_KEY_LENGTH];
    oprf::blind(PASSWORD, &mut blinded, &mut blind_scalar).unwrap();
    UserSession {
        blinded_element: blinded,
        initiator_ephemeral_public_key: crypto::scalarmult_base(&ephemeral_private_key).unwrap(),
        account_id: account_id.to_string(),
    }
}

#[test]
fn begin_registration_returns_valid_keys() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    crypto::validate_element(&keys.responder_public_key).unwrap();
    crypto::validate_scalar(&keys.oprf_key).unwrap();
    assert!(!keys.oprf_key.iter().all(|&b| b == 0));
    assert_eq!(responder.pending_account_ids(), vec![ACCOUNT_ID.to_string()]);
}

#[test]
fn begin_registration_empty_account_fails() {
    let responder = Responder::new();
    assert_eq!(
        responder.begin_registration("").unwrap_err(),
        OpaqueError::InvalidInput
    );
}

#[test]
fn registration_roundtrip_stores_file() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    let request = registration_request(&keys, ACCOUNT_ID);
    responder.finalize_registration(&request).unwrap();

    assert!(responder.is_registered(ACCOUNT_ID));
    assert!(responder.pending_account_ids().is_empty());
}

#[test]
fn second_finalize_reports_duplicate() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    let request = registration_request(&keys, ACCOUNT_ID);
    responder.finalize_registration(&request).unwrap();

    assert_eq!(
        responder.finalize_registration(&request).unwrap_err(),
        OpaqueError::DuplicateRegistration
    );
}

#[test]
fn finalize_without_begin_reports_no_pending() {
    let responder = Responder::new();
    let other = Responder::new();
    let keys = other.begin_registration(ACCOUNT_ID).unwrap();
    let request = registration_request(&keys, ACCOUNT_ID);

    assert_eq!(
        responder.finalize_registration(&request).unwrap_err(),
        OpaqueError::NoPendingRegistration
    );
}

#[test]
fn begin_after_registration_reports_duplicate() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    let request = registration_request(&keys, ACCOUNT_ID);
    responder.finalize_registration(&request).unwrap();

    assert_eq!(
        responder.begin_registration(ACCOUNT_ID).unwrap_err(),
        OpaqueError::DuplicateRegistration
    );
}

#[test]
fn rebegin_replaces_pending_entry() {
    let responder = Responder::new();
    let first = responder.begin_registration(ACCOUNT_ID).unwrap();
    let second = responder.begin_registration(ACCOUNT_ID).unwrap();
    assert_ne!(first.oprf_key, second.oprf_key);
    assert_eq!(responder.pending_account_ids().len(), 1);

    let request = registration_request(&second, ACCOUNT_ID);
    responder.finalize_registration(&request).unwrap();
}

#[test]
fn remove_pending_discards_state() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    assert!(responder.remove_pending(ACCOUNT_ID));
    assert!(!responder.remove_pending(ACCOUNT_ID));

    let request = registration_request(&keys, ACCOUNT_ID);
    assert_eq!(
        responder.finalize_registration(&request).unwrap_err(),
        OpaqueError::NoPendingRegistration
    );
}

#[test]
fn login_begin_unknown_account_fails() {
    let responder = Responder::new();
    assert_eq!(
        responder.login_begin(&user_session("bob")).unwrap_err(),
        OpaqueError::UnknownUser
    );
}

#[test]
fn login_begin_returns_fresh_keys_per_session() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    responder
        .finalize_registration(&registration_request(&keys, ACCOUNT_ID))
        .unwrap();

    let session = user_session(ACCOUNT_ID);
    let (reply1, sk1) = responder.login_begin(&session).unwrap();
    let (reply2, sk2) = responder.login_begin(&session).unwrap();

    // A replayed first message yields a fresh ephemeral and a fresh key.
    assert_ne!(
        reply1.responder_ephemeral_public_key,
        reply2.responder_ephemeral_public_key
    );
    assert_ne!(sk1, sk2);
    assert_eq!(sk1.len(), SESSION_KEY_LENGTH);

    // The OPRF evaluation itself is deterministic for a fixed blind.
    assert_eq!(reply1.evaluated_element, reply2.evaluated_element);
}

#[test]
fn login_begin_rejects_non_canonical_elements() {
    let responder = Responder::new();
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    responder
        .finalize_registration(&registration_request(&keys, ACCOUNT_ID))
        .unwrap();

    let mut session = user_session(ACCOUNT_ID);
    session.blinded_element = [0u8; PUBLIC_KEY_LENGTH];
    assert_eq!(
        responder.login_begin(&session).unwrap_err(),
        OpaqueError::DecodeError
    );
}

#[test]
fn concurrent_finalize_admits_one_winner() {
    let responder = Arc::new(Responder::new());
    let keys = responder.begin_registration(ACCOUNT_ID).unwrap();
    let request = Arc::new(registration_request(&keys, ACCOUNT_ID));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let responder = Arc::clone(&responder);
        let request = Arc::clone(&request);
        handles.push(thread::spawn(move || {
            responder.finalize_registration(&request).is_ok()
        }));
    }

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&won| won)
        .count();
    assert_eq!(winners, 1);
    assert!(responder.is_registered(ACCOUNT_ID));
}
