//! Property tests for header handling, token extraction and gzip.

use latalisa_web::{bearer_token, GzipReader, GzipWriter, Headers, Response};
use proptest::prelude::*;

proptest! {
    #[test]
    fn header_lookup_ignores_case(name in "[A-Za-z][A-Za-z-]{0,15}", value in "[ -~]{0,20}") {
        let headers = Headers::new().with(&name, value.clone());
        prop_assert_eq!(headers.get(&name.to_uppercase()), Some(value.as_str()));
        prop_assert_eq!(headers.get(&name.to_lowercase()), Some(value.as_str()));
    }

    #[test]
    fn bearer_token_is_trimmed(token in "[A-Za-z0-9._-]{1,40}", left in " {0,3}", right in " {0,3}") {
        let header = format!("{left}Bearer {token}{right}");
        prop_assert_eq!(bearer_token(&header), Ok(token.as_str()));
    }

    #[test]
    fn gzip_restores_any_body(body in proptest::collection::vec(any::<u8>(), 0..2048), level in 0u32..10) {
        let mut response = Response::new();
        let compressed = GzipWriter::with_level(level).write_body(&mut response, &body).unwrap();
        prop_assert_eq!(GzipReader.read_body(&compressed).unwrap(), body);
    }
}
