//! OAuth 1.0a (RFC 5849) request signing, HMAC-SHA1, one-legged with a fixed
//! access token pair.
//!
//! Only the `oauth_*` parameters and the query string take part in the
//! signature. JSON request bodies are never signed.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha1::Sha1;

use crate::error::SigningError;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Consumer key pair plus access token pair.
#[derive(Clone)]
pub struct OAuthCredentials {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuthCredentials {
    /// Every part is required; an empty value is rejected so that nothing
    /// unsigned or half-signed is ever sent.
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Result<Self, SigningError> {
        let creds = Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        };

        for (name, value) in [
            ("consumer_key", &creds.consumer_key),
            ("consumer_secret", &creds.consumer_secret),
            ("token", &creds.token),
            ("token_secret", &creds.token_secret),
        ] {
            if value.trim().is_empty() {
                return Err(SigningError::MissingCredential(name));
            }
        }

        Ok(creds)
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Produces `Authorization: OAuth ...` header values.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: OAuthCredentials,
}

impl OAuth1Signer {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// Sign a request with a fresh nonce and the current timestamp.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        query: &[(String, String)],
    ) -> Result<String, SigningError> {
        let nonce = hex::encode(rand::random::<[u8; 16]>());
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_at(method, url, query, &nonce, &timestamp)
    }

    /// Deterministic form of [`authorization_header`](Self::authorization_header).
    ///
    /// A query string embedded in `url` is split off and signed together
    /// with `query`.
    pub fn authorization_header_at(
        &self,
        method: &str,
        url: &str,
        query: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, SigningError> {
        let (base_url, embedded) = split_url(url)?;

        let mut oauth = vec![
            ("oauth_consumer_key".to_string(), self.credentials.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.credentials.token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let mut params = oauth.clone();
        params.extend(embedded);
        params.extend(query.iter().cloned());

        let base_string = signature_base_string(method, &base_url, &params);
        let key = signing_key(&self.credentials.consumer_secret, &self.credentials.token_secret);
        oauth.push(("oauth_signature".to_string(), sign(&key, &base_string)?));

        let header = oauth
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {header}"))
    }
}

/// RFC 3986 percent-encoding: `A-Za-z0-9-._~` pass through, every other
/// byte of the UTF-8 encoding becomes `%XX` with upper-case hex.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// `METHOD&enc(base_url)&enc(k1=v1&k2=v2...)`, parameters sorted by key then value.
pub fn signature_base_string(method: &str, base_url: &str, params: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()).then(a.1.as_bytes().cmp(b.1.as_bytes())));

    let normalized = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(base_url),
        percent_encode(&normalized)
    )
}

pub fn signing_key(consumer_secret: &str, token_secret: &str) -> String {
    format!("{}&{}", percent_encode(consumer_secret), percent_encode(token_secret))
}

fn sign(key: &str, base_string: &str) -> Result<String, SigningError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SigningError::Key(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Split a URL into its base string URI and decoded query pairs.
fn split_url(url: &str) -> Result<(String, Vec<(String, String)>), SigningError> {
    let mut parsed = Url::parse(url).map_err(|e| SigningError::InvalidUrl(format!("{url}: {e}")))?;

    let pairs = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed.set_query(None);
    parsed.set_fragment(None);

    Ok((parsed.to_string(), pairs))
}
