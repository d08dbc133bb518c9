//! Text codecs: hexadecimal, base64, URL form encoding and JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CoreError, Result};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

// ============================================================================
// Hex
// ============================================================================

/// Encodes bytes as lower-case hexadecimal.
///
/// ```
/// use latalisa_core::codec;
///
/// assert_eq!(codec::encode_hex(b"\x01\xab"), "01ab");
/// ```
pub fn encode_hex(value: impl AsRef<[u8]>) -> String {
    let value = value.as_ref();
    let mut out = String::with_capacity(value.len() * 2);
    for byte in value {
        out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}

/// Decodes hexadecimal text; upper- and lower-case digits are accepted.
pub fn decode_hex(value: &str) -> Result<Vec<u8>> {
    let bytes = value.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err(CoreError::Hex(format!(
            "odd number of digits ({})",
            bytes.len()
        )));
    }
    bytes
        .chunks_exact(2)
        .map(|pair| Ok((nibble(pair[0])? << 4) | nibble(pair[1])?))
        .collect()
}

fn nibble(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        other => Err(CoreError::Hex(format!(
            "unexpected character '{}'",
            char::from(other)
        ))),
    }
}

// ============================================================================
// Base64
// ============================================================================

/// Encodes bytes with the standard base64 alphabet and padding.
pub fn encode_base64(value: impl AsRef<[u8]>) -> String {
    STANDARD.encode(value)
}

/// Decodes standard base64 text.
pub fn decode_base64(value: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(value)?)
}

/// Decodes standard base64 text into a UTF-8 string.
pub fn string_from_base64(value: &str) -> Result<String> {
    Ok(String::from_utf8(decode_base64(value)?)?)
}

// ============================================================================
// URL form encoding
// ============================================================================

/// Encodes text for `application/x-www-form-urlencoded` (space becomes `+`).
///
/// ```
/// use latalisa_core::codec;
///
/// assert_eq!(codec::encode_url("a b&c=ç"), "a+b%26c%3D%C3%A7");
/// ```
pub fn encode_url(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Decodes form-encoded text (`+` becomes a space).
pub fn decode_url(value: &str) -> Result<String> {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| CoreError::parse(value, e.to_string()))
}

// ============================================================================
// JSON
// ============================================================================

/// Serializes a value to JSON, pretty-printed when `pretty` is `true`.
pub fn encode_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Deserializes a JSON document.
pub fn decode_json<T: DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_str(value)?)
}

/// Deserializes a JSON array into a vector.
pub fn decode_json_array<T: DeserializeOwned>(value: &str) -> Result<Vec<T>> {
    decode_json(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn hex_round_trip() {
        let encoded = encode_hex("Teste HEX");
        assert_eq!(encoded, "546573746520484558");
        assert_eq!(decode_hex(&encoded).unwrap(), b"Teste HEX");
        assert_eq!(decode_hex("ABCD").unwrap(), vec![0xab, 0xcd]);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(matches!(decode_hex("abc"), Err(CoreError::Hex(_))));
        assert!(matches!(decode_hex("zz"), Err(CoreError::Hex(_))));
    }

    #[test]
    fn base64_round_trip() {
        let encoded = encode_base64("Teste Base 64");
        assert_eq!(encoded, "VGVzdGUgQmFzZSA2NA==");
        assert_eq!(string_from_base64(&encoded).unwrap(), "Teste Base 64");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn url_round_trip() {
        let encoded = encode_url("José da Silva & filhos");
        assert_eq!(encoded, "Jos%C3%A9+da+Silva+%26+filhos");
        assert_eq!(decode_url(&encoded).unwrap(), "José da Silva & filhos");
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        nome: String,
        idade: u32,
    }

    #[test]
    fn json_round_trip() {
        let person = Person {
            nome: "Teste JSON".into(),
            idade: 31,
        };
        let compact = encode_json(&person, false).unwrap();
        assert_eq!(compact, r#"{"nome":"Teste JSON","idade":31}"#);
        assert!(encode_json(&person, true).unwrap().contains('\n'));
        assert_eq!(decode_json::<Person>(&compact).unwrap(), person);

        let list: Vec<Person> = decode_json_array(&format!("[{compact}]")).unwrap();
        assert_eq!(list, vec![person]);
    }
}
