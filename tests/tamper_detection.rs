use securevault_core::{decrypt, derive_user_key, encrypt, MasterKey, VaultError};

#[test]
fn test_every_ciphertext_bit_flip_is_detected() {
    // Threat model: attacker with write access to storage.
    // Flipping any single bit of the ciphertext (payload or tag) must make
    // decryption fail — never return altered plaintext.
    let master = MasterKey::from_bytes([11u8; 32]);
    let key = derive_user_key(&master, "tamper-victim").unwrap();
    let sealed = encrypt(&key, b"integrity matters").unwrap();

    for byte_idx in 0..sealed.ciphertext.len() {
        for bit in 0..8 {
            let mut tampered = sealed.clone();
            tampered.ciphertext[byte_idx] ^= 1 << bit;

            let result = decrypt(&key, &tampered);
            assert!(
                matches!(result, Err(VaultError::AuthenticationFailure)),
                "bit {} of ciphertext byte {} flipped undetected",
                bit,
                byte_idx
            );
        }
    }
}

#[test]
fn test_every_nonce_bit_flip_is_detected() {
    // The nonce is stored next to the ciphertext, so it is just as exposed.
    let master = MasterKey::from_bytes([11u8; 32]);
    let key = derive_user_key(&master, "tamper-victim").unwrap();
    let sealed = encrypt(&key, b"integrity matters").unwrap();

    for byte_idx in 0..sealed.nonce.len() {
        for bit in 0..8 {
            let mut tampered = sealed.clone();
            tampered.nonce[byte_idx] ^= 1 << bit;

            let result = decrypt(&key, &tampered);
            assert!(
                matches!(result, Err(VaultError::AuthenticationFailure)),
                "bit {} of nonce byte {} flipped undetected",
                bit,
                byte_idx
            );
        }
    }
}

#[test]
fn test_ciphertext_swap_between_users_is_detected() {
    // Swapping two users' stored rows must not let either decrypt the
    // other's payload.
    let master = MasterKey::from_bytes([11u8; 32]);
    let key_a = derive_user_key(&master, "a").unwrap();
    let key_b = derive_user_key(&master, "b").unwrap();

    let sealed_a = encrypt(&key_a, b"belongs to a").unwrap();
    let sealed_b = encrypt(&key_b, b"belongs to b").unwrap();

    assert!(decrypt(&key_a, &sealed_b).is_err());
    assert!(decrypt(&key_b, &sealed_a).is_err());
}
