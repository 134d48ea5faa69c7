use std::sync::LazyLock;

use past::{
    AuthenticationKey, EncryptionKey, Key, KeyKind, Malformed, PastError, ProtocolVersion,
    Purpose, SecretKey, Token,
};

static V1_SECRET: LazyLock<Key> =
    LazyLock::new(|| SecretKey::random(ProtocolVersion::V1).unwrap().into());

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn auth_key() -> Key {
    let bytes = hex::decode("707172737475767778797a7b7c7d7e7f808182838485868788898a8b8c8d8e8f")
        .unwrap();
    AuthenticationKey::decode(&bytes).unwrap().into()
}

fn enc_key() -> Key {
    let bytes = hex::decode("101112131415161718191a1b1c1d1e1f202122232425262728292a2b2c2d2e2f")
        .unwrap();
    EncryptionKey::decode(&bytes).unwrap().into()
}

fn v2_secret() -> Key {
    let bytes = hex::decode(concat!(
        "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a",
    ))
    .unwrap();
    Key::from_bytes(KeyKind::AsymmetricSecret, ProtocolVersion::V2, &bytes).unwrap()
}

/// Every version and purpose, with the key that seals and the key that unseals.
fn suites() -> Vec<(ProtocolVersion, Purpose, Key, Key)> {
    let mut suites = vec![];
    for version in ProtocolVersion::ALL {
        suites.push((version, Purpose::Auth, auth_key(), auth_key()));
        suites.push((version, Purpose::Enc, enc_key(), enc_key()));
    }
    for secret in [V1_SECRET.clone(), v2_secret()] {
        let public = secret.public_key().unwrap();
        let version = secret.version().unwrap();
        suites.push((version, Purpose::Sign, secret, public));
    }
    suites
}

fn flip_bit(token: &str, segment: usize, bit: usize) -> Token {
    let token: Token = token.parse().unwrap();
    let (header, mut payload, mut footer) = token.into_parts();
    let bytes = match segment {
        2 => &mut payload,
        3 => &mut footer,
        _ => unreachable!(),
    };
    bytes[bit / 8] ^= 1 << (bit % 8);
    Token::new(header, payload, footer)
}

#[test]
fn round_trip() {
    init_tracing();

    for (version, purpose, sealing, unsealing) in suites() {
        for footer in [b"".as_slice(), b"kid:1".as_slice()] {
            let payload = br#"{"data":"this is a signed message","exp":"2039-01-01T00:00:00+00:00"}"#;
            let token = past::issue(version, purpose, payload, &sealing, footer).unwrap();
            assert!(token.starts_with(&format!("{version}.{purpose}.")));
            assert_eq!(token.split('.').count(), if footer.is_empty() { 3 } else { 4 });

            assert_eq!(past::open(&token, &unsealing, footer).unwrap(), payload);
        }
    }
}

#[test]
fn empty_payload() {
    for (version, purpose, sealing, unsealing) in suites() {
        let token = past::issue(version, purpose, b"", &sealing, b"").unwrap();
        assert_eq!(past::open(&token, &unsealing, b"").unwrap(), b"");
    }
}

#[test]
fn tamper_sensitivity() {
    init_tracing();

    for (version, purpose, sealing, unsealing) in suites() {
        let token = past::issue(version, purpose, b"hello", &sealing, b"kid:1").unwrap();
        let parsed: Token = token.parse().unwrap();

        for bit in [0, 7, parsed.payload().len() * 8 - 1] {
            let tampered = flip_bit(&token, 2, bit).to_string();
            assert!(
                matches!(
                    past::open(&tampered, &unsealing, b"kid:1"),
                    Err(PastError::AuthenticationFailure)
                ),
                "{version}.{purpose} payload bit {bit}"
            );
        }

        // pin the tampered footer, so only the cryptographic check can catch it
        let tampered = flip_bit(&token, 3, 0);
        assert_eq!(tampered.unverified_footer(), b"jid:1");
        assert!(
            matches!(
                past::open(&tampered.to_string(), &unsealing, tampered.unverified_footer()),
                Err(PastError::AuthenticationFailure)
            ),
            "{version}.{purpose} footer"
        );
    }
}

#[test]
fn header_is_authenticated() {
    // the same payload and tag under another header must not verify
    let payload = b"a message long enough to fill a v1 tag";
    let token = past::authenticate(ProtocolVersion::V2, payload, &auth_key(), b"").unwrap();
    let moved = token.replacen("v2.", "v1.", 1);
    assert!(matches!(
        past::verify_authentication(&moved, &auth_key(), b""),
        Err(PastError::AuthenticationFailure)
    ));
}

#[test]
fn footer_pinning() {
    for (version, purpose, sealing, unsealing) in suites() {
        let token = past::issue(version, purpose, b"hello", &sealing, b"f1").unwrap();
        assert!(matches!(
            past::open(&token, &unsealing, b"f2"),
            Err(PastError::FooterMismatch)
        ));
        assert!(matches!(
            past::open(&token, &unsealing, b""),
            Err(PastError::FooterMismatch)
        ));

        let token = past::issue(version, purpose, b"hello", &sealing, b"").unwrap();
        assert!(matches!(
            past::open(&token, &unsealing, b"f1"),
            Err(PastError::FooterMismatch)
        ));
    }
}

#[test]
fn key_binding() {
    init_tracing();

    assert!(matches!(
        past::sign(ProtocolVersion::V2, b"hello", &enc_key(), b""),
        Err(PastError::KeyPurposeMismatch {
            key: KeyKind::SymmetricEncryption,
            purpose: Purpose::Sign,
        })
    ));
    assert!(matches!(
        past::encrypt(ProtocolVersion::V2, b"hello", &v2_secret(), b""),
        Err(PastError::KeyPurposeMismatch {
            key: KeyKind::AsymmetricSecret,
            purpose: Purpose::Enc,
        })
    ));
    assert!(matches!(
        past::authenticate(ProtocolVersion::V1, b"hello", &enc_key(), b""),
        Err(PastError::KeyPurposeMismatch {
            key: KeyKind::SymmetricEncryption,
            purpose: Purpose::Auth,
        })
    ));

    let public = v2_secret().public_key().unwrap();
    assert!(matches!(
        past::sign(ProtocolVersion::V2, b"hello", &public, b""),
        Err(PastError::KeyPurposeMismatch {
            key: KeyKind::AsymmetricPublic,
            purpose: Purpose::Sign,
        })
    ));

    // an encryption key cannot open an auth token, even though both are symmetric
    let token = past::authenticate(ProtocolVersion::V2, b"hello", &auth_key(), b"").unwrap();
    assert!(matches!(
        past::open(&token, &enc_key(), b""),
        Err(PastError::KeyPurposeMismatch { .. })
    ));
}

#[test]
fn version_binding() {
    let v2_token = past::sign(ProtocolVersion::V2, b"hello", &v2_secret(), b"").unwrap();
    let v1_public = V1_SECRET.public_key().unwrap();
    assert!(matches!(
        past::verify_signature(&v2_token, &v1_public, b""),
        Err(PastError::KeyVersionMismatch {
            key: ProtocolVersion::V1,
            token: ProtocolVersion::V2,
        })
    ));

    assert!(matches!(
        past::sign(ProtocolVersion::V1, b"hello", &v2_secret(), b""),
        Err(PastError::KeyVersionMismatch {
            key: ProtocolVersion::V2,
            token: ProtocolVersion::V1,
        })
    ));
}

#[test]
fn secret_keys_verify_their_own_tokens() {
    let token = past::sign(ProtocolVersion::V2, b"hello", &v2_secret(), b"").unwrap();
    assert_eq!(
        past::verify_signature(&token, &v2_secret(), b"").unwrap(),
        b"hello"
    );
}

#[test]
fn entry_points_check_the_purpose() {
    let token = past::authenticate(ProtocolVersion::V2, b"hello", &auth_key(), b"").unwrap();
    let err = past::decrypt(&token, &enc_key(), b"").unwrap_err();
    let PastError::MalformedToken(Malformed::UnexpectedHeader { expected, found }) = err else {
        panic!("unexpected error {err}");
    };
    assert_eq!(expected.purpose, Purpose::Enc);
    assert_eq!(found.purpose, Purpose::Auth);
}

#[test]
fn malformed_tokens() {
    for token in [
        "",
        "v2.enc",
        "v2.enc.AAAA.AAAA.AAAA",
        "v9.enc.AAAA",
        "v2.local.AAAA",
        "v2.enc.AA==",
        "v2.enc.AAAA.",
    ] {
        assert!(
            matches!(
                past::decrypt(token, &enc_key(), b""),
                Err(PastError::MalformedToken(_))
            ),
            "{token:?}"
        );
    }

    assert!(matches!(
        past::decrypt("v2.enc.AAAA", &enc_key(), b""),
        Err(PastError::MalformedToken(Malformed::TooShort))
    ));
}

#[test]
fn alice() {
    let key = enc_key();
    let claims = br#"{"sub":"alice"}"#;

    let token = past::encrypt(ProtocolVersion::V2, claims, &key, b"kid:1").unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments[..2], ["v2", "enc"]);
    assert_eq!(segments.len(), 4);
    assert_eq!(segments[3], "a2lkOjE");

    assert_eq!(past::decrypt(&token, &key, b"kid:1").unwrap(), claims);
    assert!(matches!(
        past::decrypt(&token, &key, b"kid:2"),
        Err(PastError::FooterMismatch)
    ));
}

#[test]
fn wire_characters_are_checked() {
    for (version, purpose, sealing, unsealing) in suites() {
        let token = past::issue(version, purpose, b"hello", &sealing, b"kid:1").unwrap();
        let payload_start = format!("{version}.{purpose}.").len();
        let footer_start = token.rfind('.').unwrap() + 1;

        for i in [payload_start, payload_start + 5, footer_start] {
            let mut tampered = token.clone().into_bytes();
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(tampered).unwrap();

            let result = past::open(&tampered, &unsealing, b"kid:1");
            assert!(
                matches!(
                    result,
                    Err(PastError::MalformedToken(_)
                        | PastError::AuthenticationFailure
                        | PastError::FooterMismatch)
                ),
                "{version}.{purpose} character {i}: {result:?}"
            );
        }
    }
}
