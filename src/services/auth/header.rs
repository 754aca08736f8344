//! `Authorization` header parsing.
//!
//! Grammar (RFC 7235):
//!
//! ```text
//! credentials = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
//! ```
//!
//! The extractor is a pure function of the header map. A missing header is
//! `Ok(None)`; anything present but unparseable is a `HeaderParseError`.

use std::sync::Arc;

use axum::http::{HeaderMap, header};

/// Scheme accepted by the bearer provider. Compared exactly.
pub const BEARER_SCHEME: &str = "Bearer";

/// Single-blob credential: `<scheme> <token68>`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub scheme: String,
    pub blob: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("Credential")
            .field("scheme", &self.scheme)
            .field("blob", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeader {
    Single(Credential),
    Parameterized {
        scheme: String,
        params: Vec<(String, String)>,
    },
}

impl AuthHeader {
    pub fn scheme(&self) -> &str {
        match self {
            Self::Single(credential) => &credential.scheme,
            Self::Parameterized { scheme, .. } => scheme,
        }
    }

    /// The opaque token, only for `Bearer <token68>`.
    pub fn bearer_blob(&self) -> Option<&str> {
        match self {
            Self::Single(credential) if credential.scheme == BEARER_SCHEME => {
                Some(credential.blob.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderParseError {
    #[error("authorization header is not visible ASCII")]
    NotAscii,
    #[error("authorization header is empty")]
    Empty,
    #[error("invalid auth scheme")]
    InvalidScheme,
    #[error("invalid auth parameters")]
    InvalidParameters,
}

/// Per-provider override point for credential extraction.
pub type HeaderExtractor =
    Arc<dyn Fn(&HeaderMap) -> Result<Option<AuthHeader>, HeaderParseError> + Send + Sync>;

pub fn default_header_extractor() -> HeaderExtractor {
    Arc::new(parse_authorization_header)
}

pub fn parse_authorization_header(
    headers: &HeaderMap,
) -> Result<Option<AuthHeader>, HeaderParseError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| HeaderParseError::NotAscii)?;

    parse_auth_header_value(value).map(Some)
}

pub fn parse_auth_header_value(value: &str) -> Result<AuthHeader, HeaderParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HeaderParseError::Empty);
    }

    let (scheme, rest) = match value.split_once(' ') {
        Some((scheme, rest)) => (scheme, rest.trim_start()),
        None => (value, ""),
    };

    if !is_token(scheme) {
        return Err(HeaderParseError::InvalidScheme);
    }

    if rest.is_empty() {
        return Ok(AuthHeader::Parameterized {
            scheme: scheme.to_string(),
            params: Vec::new(),
        });
    }

    if is_token68(rest) {
        return Ok(AuthHeader::Single(Credential {
            scheme: scheme.to_string(),
            blob: rest.to_string(),
        }));
    }

    let params = parse_auth_params(rest)?;
    Ok(AuthHeader::Parameterized {
        scheme: scheme.to_string(),
        params,
    })
}

fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_tchar)
}

// token68 = 1*( ALPHA / DIGIT / "-" / "." / "_" / "~" / "+" / "/" ) *"="
fn is_token68(s: &str) -> bool {
    let body = s.trim_end_matches('=');
    !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-._~+/".contains(c))
}

fn parse_auth_params(input: &str) -> Result<Vec<(String, String)>, HeaderParseError> {
    let mut params = Vec::new();
    let mut rest = input;

    loop {
        rest = rest.trim_start();

        let eq = rest.find('=').ok_or(HeaderParseError::InvalidParameters)?;
        let name = rest[..eq].trim_end();
        if !is_token(name) {
            return Err(HeaderParseError::InvalidParameters);
        }
        rest = rest[eq + 1..].trim_start();

        let value;
        if let Some(quoted) = rest.strip_prefix('"') {
            let (unquoted, consumed) = read_quoted_string(quoted)?;
            value = unquoted;
            rest = &quoted[consumed..];
        } else {
            let end = rest.find([',', ' ', '\t']).unwrap_or(rest.len());
            let token = &rest[..end];
            if !is_token(token) {
                return Err(HeaderParseError::InvalidParameters);
            }
            value = token.to_string();
            rest = &rest[end..];
        }
        params.push((name.to_string(), value));

        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(params);
        }
        rest = rest
            .strip_prefix(',')
            .ok_or(HeaderParseError::InvalidParameters)?;
    }
}

// Returns the unescaped value and the number of bytes consumed, closing quote included.
fn read_quoted_string(input: &str) -> Result<(String, usize), HeaderParseError> {
    let mut value = String::new();
    let mut chars = input.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((value, idx + 1)),
            '\\' => {
                let (_, escaped) = chars.next().ok_or(HeaderParseError::InvalidParameters)?;
                value.push(escaped);
            }
            _ => value.push(c),
        }
    }

    Err(HeaderParseError::InvalidParameters)
}

/// Render a quoted-string, escaping `"` and `\`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
