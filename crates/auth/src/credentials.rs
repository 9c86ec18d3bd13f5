//! Credential extraction from request headers.
//!
//! Every step fails closed: a malformed header, bad Base64, or a missing
//! delimiter yields `None` rather than an error. The caller only ever sees
//! a [`Credential`].

use {
    base64::Engine,
    http::{HeaderMap, header},
};

/// A credential presented by one request. Produced here, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Decoded HTTP Basic credentials.
    Basic { username: String, password: String },
    /// An opaque session token taken from the session cookie.
    Session(String),
    /// A credential was presented but could not be parsed (wrong scheme,
    /// bad Base64, missing delimiter). Never resolves to an identity, but
    /// counts as "presented" so the caller answers 403 rather than 401.
    Malformed,
    /// The request presented nothing at all.
    None,
}

impl Credential {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Credential::None)
    }
}

/// The raw `Authorization` header value, verbatim.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Strip the `Basic ` scheme prefix (case-sensitive, single space).
pub fn strip_basic(value: &str) -> Option<&str> {
    value.strip_prefix("Basic ")
}

/// Decode a Base64 Basic payload to UTF-8 text.
pub fn decode_basic(encoded: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    String::from_utf8(bytes).ok()
}

/// Split decoded credentials on the first `:` only, so passwords may
/// themselves contain colons.
pub fn split_credentials(decoded: &str) -> Option<(&str, &str)> {
    decoded.split_once(':')
}

/// Parse a specific cookie value from a Cookie header string.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name)
            && let Some(value) = value.strip_prefix('=')
        {
            return Some(value);
        }
    }
    None
}

/// The named session cookie from the request headers.
pub fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok())?;
    parse_cookie(cookie_header, name)
}

/// Run the full Basic pipeline: header, scheme, Base64, first-colon split.
///
/// No header at all is [`Credential::None`]; a header that fails any later
/// stage is [`Credential::Malformed`].
pub fn basic_credential(headers: &HeaderMap) -> Credential {
    let Some(value) = authorization_header(headers) else {
        return Credential::None;
    };
    let Some(encoded) = strip_basic(value) else {
        return Credential::Malformed;
    };
    let Some(decoded) = decode_basic(encoded) else {
        return Credential::Malformed;
    };
    match split_credentials(&decoded) {
        Some((username, password)) => Credential::Basic {
            username: username.to_string(),
            password: password.to_string(),
        },
        None => Credential::Malformed,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(name, value.parse().unwrap());
        h
    }

    #[test]
    fn test_authorization_header() {
        let h = headers_with(header::AUTHORIZATION, "Basic abc");
        assert_eq!(authorization_header(&h), Some("Basic abc"));
        assert_eq!(authorization_header(&HeaderMap::new()), None);
    }

    #[test]
    fn test_strip_basic() {
        assert_eq!(strip_basic("Basic abc123"), Some("abc123"));
        assert_eq!(strip_basic("basic abc123"), None);
        assert_eq!(strip_basic("Bearer abc123"), None);
        assert_eq!(strip_basic("Basic"), None);
    }

    #[test]
    fn test_decode_basic() {
        // "user:pass"
        assert_eq!(decode_basic("dXNlcjpwYXNz"), Some("user:pass".to_string()));
        assert_eq!(decode_basic("not-base64!!!"), None);
        // Valid Base64 but not UTF-8.
        assert_eq!(decode_basic("/////w=="), None);
    }

    #[test]
    fn test_split_credentials_first_colon_only() {
        assert_eq!(split_credentials("a:b"), Some(("a", "b")));
        assert_eq!(split_credentials("a:b:c"), Some(("a", "b:c")));
        assert_eq!(split_credentials("nocolon"), None);
        assert_eq!(split_credentials(":pass"), Some(("", "pass")));
    }

    #[test]
    fn test_basic_round_trip() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("user:pass");
        let decoded = decode_basic(&encoded).unwrap();
        assert_eq!(split_credentials(&decoded), Some(("user", "pass")));
    }

    #[test]
    fn test_parse_cookie() {
        assert_eq!(
            parse_cookie("session_id=abc123; other=def", "session_id"),
            Some("abc123")
        );
        assert_eq!(
            parse_cookie("other=def; session_id=xyz", "session_id"),
            Some("xyz")
        );
        assert_eq!(parse_cookie("other=def", "session_id"), None);
        assert_eq!(parse_cookie("", "session_id"), None);
    }

    #[test]
    fn test_session_cookie() {
        let h = headers_with(header::COOKIE, "session_id=tok; theme=dark");
        assert_eq!(session_cookie(&h, "session_id"), Some("tok"));
        assert_eq!(session_cookie(&h, "missing"), None);
        assert_eq!(session_cookie(&HeaderMap::new(), "session_id"), None);
    }

    #[test]
    fn test_basic_credential_pipeline() {
        // "user@example.com:pass"
        let h = headers_with(
            header::AUTHORIZATION,
            "Basic dXNlckBleGFtcGxlLmNvbTpwYXNz",
        );
        assert_eq!(
            basic_credential(&h),
            Credential::Basic {
                username: "user@example.com".to_string(),
                password: "pass".to_string(),
            }
        );
    }

    #[test]
    fn test_basic_credential_fails_closed() {
        assert!(basic_credential(&HeaderMap::new()).is_none());

        let h = headers_with(header::AUTHORIZATION, "Bearer tok");
        assert_eq!(basic_credential(&h), Credential::Malformed);

        let h = headers_with(header::AUTHORIZATION, "Basic %%%");
        assert_eq!(basic_credential(&h), Credential::Malformed);

        // Decodes fine but has no colon.
        let encoded = base64::engine::general_purpose::STANDARD.encode("nocolon");
        let h = headers_with(header::AUTHORIZATION, &format!("Basic {encoded}"));
        assert_eq!(basic_credential(&h), Credential::Malformed);
    }
}
