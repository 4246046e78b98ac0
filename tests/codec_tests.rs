//! Codec Tests
//!
//! Command decoding under whole and fragmented input, response encoding.

use meshkv::protocol::{Command, Decoder, Response};
use meshkv::MeshError;

/// Feed everything at once and expect exactly one command
fn decode_one(input: &[u8]) -> Command {
    let mut decoder = Decoder::new();
    decoder.feed(input);
    let command = decoder.try_decode().unwrap().expect("expected a command");
    assert_eq!(decoder.try_decode().unwrap(), None);
    command
}

// =============================================================================
// Whole-Command Decoding
// =============================================================================

#[test]
fn test_decode_get() {
    assert_eq!(
        decode_one(b"get alpha\r\n"),
        Command::Get {
            key: "alpha".to_string()
        }
    );
}

#[test]
fn test_decode_getm() {
    assert_eq!(
        decode_one(b"getm gamma\r\n"),
        Command::GetMeta {
            key: "gamma".to_string()
        }
    );
}

#[test]
fn test_decode_delete() {
    assert_eq!(
        decode_one(b"delete beta\r\n"),
        Command::Delete {
            key: "beta".to_string()
        }
    );
}

#[test]
fn test_decode_set() {
    assert_eq!(
        decode_one(b"set alpha 0 10\r\nI am ALPHA\r\n"),
        Command::Set {
            key: "alpha".to_string(),
            ttl_secs: 0,
            value: b"I am ALPHA".to_vec(),
            noreply: false,
        }
    );
}

#[test]
fn test_decode_set_noreply() {
    assert_eq!(
        decode_one(b"set theta 10 10 noreply\r\nI am THETA\r\n"),
        Command::Set {
            key: "theta".to_string(),
            ttl_secs: 10,
            value: b"I am THETA".to_vec(),
            noreply: true,
        }
    );
}

#[test]
fn test_decode_cas() {
    assert_eq!(
        decode_one(b"cas gamma 0 5 13\r\nI am BETA now\r\n"),
        Command::Cas {
            key: "gamma".to_string(),
            ttl_secs: 0,
            expected_version: 5,
            value: b"I am BETA now".to_vec(),
        }
    );
}

#[test]
fn test_payload_may_contain_crlf() {
    // the payload is framed by its declared length, not by line endings
    assert_eq!(
        decode_one(b"set bin 0 6\r\na\r\nb\r\r\n"),
        Command::Set {
            key: "bin".to_string(),
            ttl_secs: 0,
            value: b"a\r\nb\r".to_vec(),
            noreply: false,
        }
    );
}

// =============================================================================
// Fragmented Delivery
// =============================================================================

#[test]
fn test_header_split_mid_token() {
    let mut decoder = Decoder::new();

    decoder.feed(b"ge");
    assert_eq!(decoder.try_decode().unwrap(), None);

    decoder.feed(b"t al");
    assert_eq!(decoder.try_decode().unwrap(), None);

    decoder.feed(b"pha\r\n");
    assert_eq!(
        decoder.try_decode().unwrap(),
        Some(Command::Get {
            key: "alpha".to_string()
        })
    );
    assert_eq!(decoder.try_decode().unwrap(), None);
}

#[test]
fn test_payload_split_across_reads() {
    let mut decoder = Decoder::new();

    decoder.feed(b"set alpha 0 10\r\nI am ");
    assert_eq!(decoder.try_decode().unwrap(), None);

    decoder.feed(b"ALPHA\r");
    assert_eq!(decoder.try_decode().unwrap(), None);

    decoder.feed(b"\n");
    assert_eq!(
        decoder.try_decode().unwrap(),
        Some(Command::Set {
            key: "alpha".to_string(),
            ttl_secs: 0,
            value: b"I am ALPHA".to_vec(),
            noreply: false,
        })
    );
}

#[test]
fn test_byte_at_a_time_equals_single_read() {
    let input: &[u8] = b"cas gamma 0 5 13\r\nI am BETA now\r\n";
    let expected = decode_one(input);

    let mut decoder = Decoder::new();
    let mut decoded = None;
    for byte in input {
        decoder.feed(std::slice::from_ref(byte));
        if let Some(command) = decoder.try_decode().unwrap() {
            assert!(decoded.is_none(), "decoded more than one command");
            decoded = Some(command);
        }
    }

    assert_eq!(decoded, Some(expected));
}

#[test]
fn test_pipelined_commands_drain_in_order() {
    let mut decoder = Decoder::new();
    decoder.feed(b"set a 0 1\r\nx\r\nget a\r\ndelete a\r\n");

    assert!(matches!(
        decoder.try_decode().unwrap(),
        Some(Command::Set { .. })
    ));
    assert!(matches!(
        decoder.try_decode().unwrap(),
        Some(Command::Get { .. })
    ));
    assert!(matches!(
        decoder.try_decode().unwrap(),
        Some(Command::Delete { .. })
    ));
    assert_eq!(decoder.try_decode().unwrap(), None);
}

// =============================================================================
// Malformed Input
// =============================================================================

#[test]
fn test_unknown_verb_is_protocol_error() {
    let mut decoder = Decoder::new();
    decoder.feed(b"frobnicate alpha\r\n");
    assert!(matches!(
        decoder.try_decode(),
        Err(MeshError::Protocol(_))
    ));
}

#[test]
fn test_non_numeric_ttl_is_protocol_error() {
    let mut decoder = Decoder::new();
    decoder.feed(b"set alpha never 10\r\n");
    assert!(matches!(
        decoder.try_decode(),
        Err(MeshError::Protocol(_))
    ));
}

#[test]
fn test_missing_payload_terminator_is_protocol_error() {
    let mut decoder = Decoder::new();
    // declares 4 bytes but the terminator position holds payload bytes
    decoder.feed(b"set alpha 0 4\r\ntoolong\r\n");
    assert!(matches!(
        decoder.try_decode(),
        Err(MeshError::Protocol(_))
    ));
}

#[test]
fn test_oversized_payload_declaration_is_rejected() {
    let mut decoder = Decoder::new();
    decoder.feed(b"set alpha 0 99999999999\r\n");
    assert!(matches!(
        decoder.try_decode(),
        Err(MeshError::Protocol(_))
    ));
}

#[test]
fn test_wrong_token_count_is_protocol_error() {
    let mut decoder = Decoder::new();
    decoder.feed(b"get alpha beta\r\n");
    assert!(matches!(
        decoder.try_decode(),
        Err(MeshError::Protocol(_))
    ));
}

// =============================================================================
// Response Encoding
// =============================================================================

#[test]
fn test_response_wire_literals() {
    assert_eq!(Response::Ok { version: 6 }.to_bytes(), b"OK 6\r\n");
    assert_eq!(
        Response::Value {
            payload: b"I am ALPHA".to_vec()
        }
        .to_bytes(),
        b"VALUE 10\r\nI am ALPHA\r\n"
    );
    assert_eq!(Response::Version { version: 6 }.to_bytes(), b"VALUE 6\r\n");
    assert_eq!(Response::Deleted.to_bytes(), b"DELETED\r\n");
    assert_eq!(Response::NotFound.to_bytes(), b"ERR_NOT_FOUND\r\n");
    assert_eq!(
        Response::VersionMismatch.to_bytes(),
        b"ERR_VERSION_MISMATCH\r\n"
    );
    assert_eq!(
        Response::Redirect {
            host: "127.0.0.1".to_string(),
            port: 9002
        }
        .to_bytes(),
        b"ERR_REDIRECT 127.0.0.1 9002\r\n"
    );
    assert_eq!(Response::CmdError.to_bytes(), b"ERR_CMD_ERR\r\n");
}
