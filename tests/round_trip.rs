use securevault_core::{decrypt, derive_user_key, encrypt, MasterKey, VaultError, NONCE_LEN, TAG_LEN};

#[test]
fn test_encrypt_decrypt_round_trip() {
    // For all users U and plaintexts P:
    // decrypt(derive(M, U), encrypt(derive(M, U), P)) == P
    let master = MasterKey::from_bytes([5u8; 32]);

    for user_id in ["alice", "bob", "user-with-a-long-identifier-0001"] {
        for plaintext in [
            b"".as_slice(),
            b"x".as_slice(),
            b"a moderately sized secret payload".as_slice(),
            &[0u8; 4096],
        ] {
            let key = derive_user_key(&master, user_id).unwrap();
            let sealed = encrypt(&key, plaintext).unwrap();
            let opened = decrypt(&key, &sealed).unwrap();
            assert_eq!(opened, plaintext);
        }
    }
}

#[test]
fn test_cross_user_key_isolation() {
    // Threat model: blast radius from a single-user compromise.
    // Keys derived for user B must never decrypt user A's ciphertext.
    let master = MasterKey::from_bytes([5u8; 32]);

    let key_a = derive_user_key(&master, "userA").unwrap();
    let key_b = derive_user_key(&master, "userB").unwrap();

    let sealed = encrypt(&key_a, b"sensitive data").unwrap();
    let result = decrypt(&key_b, &sealed);

    assert!(
        matches!(result, Err(VaultError::AuthenticationFailure)),
        "user B's key decrypted user A's data"
    );
}

#[test]
fn test_concrete_hunter2_scenario() {
    // Fixed all-zero master key, userId "abc", plaintext "hunter2":
    // 12-byte nonce, 23-byte ciphertext (7 bytes + 16-byte tag).
    let master = MasterKey::from_bytes([0u8; 32]);
    let key = derive_user_key(&master, "abc").unwrap();

    let sealed = encrypt(&key, b"hunter2").unwrap();
    assert_eq!(sealed.nonce.len(), NONCE_LEN);
    assert_eq!(sealed.ciphertext.len(), 7 + TAG_LEN);

    let opened = decrypt(&key, &sealed).unwrap();
    assert_eq!(opened, b"hunter2");

    let wrong_user_key = derive_user_key(&master, "xyz").unwrap();
    assert!(matches!(
        decrypt(&wrong_user_key, &sealed),
        Err(VaultError::AuthenticationFailure)
    ));
}

#[test]
fn test_derivation_survives_key_drop() {
    // Derived keys are recomputed on demand; dropping one loses nothing.
    let master = MasterKey::from_bytes([5u8; 32]);

    let sealed = {
        let key = derive_user_key(&master, "alice").unwrap();
        encrypt(&key, b"still readable later").unwrap()
    };

    let key_again = derive_user_key(&master, "alice").unwrap();
    assert_eq!(decrypt(&key_again, &sealed).unwrap(), b"still readable later");
}
