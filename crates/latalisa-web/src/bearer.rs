//! Bearer token authentication (RFC 6750).

use tracing::debug;

use crate::error::Rejection;
use crate::http::{HttpRequest, AUTHORIZATION};

pub const BEARER: &str = "Bearer";

/// Decides whether a bearer token grants access.
pub trait TokenVerifier {
    fn verify(&self, request: &dyn HttpRequest, token: &str) -> Result<(), Rejection>;
}

impl<F> TokenVerifier for F
where
    F: Fn(&dyn HttpRequest, &str) -> Result<(), Rejection>,
{
    fn verify(&self, request: &dyn HttpRequest, token: &str) -> Result<(), Rejection> {
        self(request, token)
    }
}

/// Extracts the token from an `Authorization` value.
///
/// The value must start with `Bearer` and carry a non-empty token after it.
pub fn bearer_token(authorization: &str) -> Result<&str, Rejection> {
    let token = authorization
        .trim()
        .strip_prefix(BEARER)
        .ok_or_else(Rejection::forbidden)?
        .trim();
    if token.is_empty() {
        return Err(Rejection::forbidden());
    }
    Ok(token)
}

/// Rejects requests without a usable bearer token and hands the token to a
/// [`TokenVerifier`] otherwise.
///
/// A missing `Authorization` header is `401`; a malformed one is `403`.
#[derive(Debug, Clone)]
pub struct BearerFilter<V> {
    verifier: V,
}

impl<V: TokenVerifier> BearerFilter<V> {
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    pub fn filter<R: HttpRequest>(&self, request: &R) -> Result<(), Rejection> {
        let authorization = request
            .headers()
            .get_string(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("authorization header missing");
                Rejection::unauthorized()
            })?;
        let token = bearer_token(&authorization).inspect_err(|_| {
            debug!("malformed authorization header");
        })?;
        self.verifier.verify(request, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Status};

    fn filter() -> BearerFilter<impl TokenVerifier> {
        BearerFilter::new(|_: &dyn HttpRequest, token: &str| {
            if token == "secret" {
                Ok(())
            } else {
                Err(Rejection::forbidden())
            }
        })
    }

    fn status(request: Request) -> Option<Status> {
        filter().filter(&request).err().map(|r| r.status)
    }

    #[test]
    fn missing_header_is_unauthorized() {
        assert_eq!(status(Request::new()), Some(Status::Unauthorized));
    }

    #[test]
    fn malformed_header_is_forbidden() {
        assert_eq!(status(Request::new().header(AUTHORIZATION, "Basic abc")), Some(Status::Forbidden));
        assert_eq!(status(Request::new().header(AUTHORIZATION, "  Bearer   ")), Some(Status::Forbidden));
    }

    #[test]
    fn token_goes_to_verifier() {
        assert_eq!(status(Request::new().header("authorization", " Bearer secret ")), None);
        assert_eq!(status(Request::new().header(AUTHORIZATION, "Bearer other")), Some(Status::Forbidden));
    }

    #[test]
    fn extracts_token() {
        assert_eq!(bearer_token("Bearer  abc.def "), Ok("abc.def"));
        assert!(bearer_token("bearer abc").is_err());
    }
}
