//! Gzip content negotiation and body compression.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::Rejection;
use crate::http::{HttpRequest, HttpResponse, Headers, ACCEPT_ENCODING, CONTENT_ENCODING};

pub const GZIP: &str = "gzip";

fn mentions_gzip(request: &impl HttpRequest, header: &str) -> bool {
    let found = request
        .headers()
        .get_string(header)
        .is_some_and(|value| value.contains(GZIP));
    if !found {
        debug!(header, "gzip not negotiated");
    }
    found
}

/// Rejects requests whose body is not declared as gzip.
pub fn require_gzip_content(request: &impl HttpRequest) -> Result<(), Rejection> {
    if mentions_gzip(request, CONTENT_ENCODING) {
        Ok(())
    } else {
        Err(Rejection::bad_request("request content must be gzip-compressed"))
    }
}

/// Rejects requests whose client does not accept gzip responses.
pub fn require_gzip_accept(request: &impl HttpRequest) -> Result<(), Rejection> {
    if mentions_gzip(request, ACCEPT_ENCODING) {
        Ok(())
    } else {
        Err(Rejection::bad_request("client must accept gzip-compressed responses"))
    }
}

/// Decompresses request bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipReader;

impl GzipReader {
    /// Wraps a body stream so reads yield decompressed bytes.
    pub fn wrap<R: Read>(&self, input: R) -> GzDecoder<R> {
        GzDecoder::new(input)
    }

    pub fn read_body(&self, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut decoded = Vec::new();
        self.wrap(body).read_to_end(&mut decoded)?;
        Ok(decoded)
    }
}

/// Compresses response bodies and marks them with `Content-Encoding: gzip`.
#[derive(Debug, Clone, Copy)]
pub struct GzipWriter {
    level: Compression,
}

impl Default for GzipWriter {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl GzipWriter {
    pub fn with_level(level: u32) -> Self {
        Self {
            level: Compression::new(level),
        }
    }

    /// Sets the encoding header and wraps the output stream.
    ///
    /// Call `finish` on the returned encoder to write the gzip trailer.
    pub fn wrap<W: Write>(&self, headers: &mut Headers, output: W) -> GzEncoder<W> {
        headers.put_single(CONTENT_ENCODING, GZIP);
        GzEncoder::new(output, self.level)
    }

    /// Compresses `body` into the response.
    pub fn write_body(&self, response: &mut impl HttpResponse, body: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = self.wrap(response.headers_mut(), Vec::new());
        encoder.write_all(body)?;
        encoder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response, Status};

    #[test]
    fn negotiation() {
        let plain = Request::new();
        let gzipped = Request::new()
            .header(CONTENT_ENCODING, "gzip")
            .header(ACCEPT_ENCODING, "br, gzip");

        assert_eq!(require_gzip_content(&plain).unwrap_err().status, Status::BadRequest);
        assert_eq!(require_gzip_accept(&plain).unwrap_err().status, Status::BadRequest);
        assert!(require_gzip_content(&gzipped).is_ok());
        assert!(require_gzip_accept(&gzipped).is_ok());
    }

    #[test]
    fn writer_marks_and_reader_restores() {
        let mut response = Response::new();
        let body = b"hello hello hello hello".repeat(10);
        let compressed = GzipWriter::default().write_body(&mut response, &body).unwrap();

        assert_eq!(response.headers.get(CONTENT_ENCODING), Some(GZIP));
        assert!(compressed.len() < body.len());
        assert_eq!(GzipReader.read_body(&compressed).unwrap(), body);
    }

    #[test]
    fn reader_rejects_plain_bytes() {
        assert!(GzipReader.read_body(b"not gzip").is_err());
    }
}
