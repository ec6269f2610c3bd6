//! OAuth 1.0a signing against the RFC 5849 / Hueniverse reference request.

use mcp_servers::error::SigningError;
use mcp_servers::oauth::{percent_encode, signature_base_string, signing_key, OAuth1Signer, OAuthCredentials};

const CONSUMER_KEY: &str = "dpf43f3p2l4k3l03";
const CONSUMER_SECRET: &str = "kd94hf93k423kf44";
const TOKEN: &str = "nnch734d00sl2jdk";
const TOKEN_SECRET: &str = "pfkkdhi9sl3r4s00";
const NONCE: &str = "kllo9940pd9333jh";
const TIMESTAMP: &str = "1191242096";
const PHOTOS_URL: &str = "http://photos.example.net/photos";

fn reference_signer() -> OAuth1Signer {
    OAuth1Signer::new(OAuthCredentials::new(CONSUMER_KEY, CONSUMER_SECRET, TOKEN, TOKEN_SECRET).unwrap())
}

fn photo_query() -> Vec<(String, String)> {
    vec![
        ("file".to_string(), "vacation.jpg".to_string()),
        ("size".to_string(), "original".to_string()),
    ]
}

/// Pull `key="value"` out of an `OAuth ...` header.
fn header_param<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    header
        .strip_prefix("OAuth ")?
        .split(", ")
        .find_map(|part| part.strip_prefix(&format!("{key}=\""))?.strip_suffix('"'))
}

#[test]
fn reference_vector_signature() {
    let header = reference_signer()
        .authorization_header_at("GET", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();

    // tR3+Ty81lMeYAr/Fid0kMTYa/WM=, percent-encoded inside the header
    assert_eq!(
        header_param(&header, "oauth_signature"),
        Some("tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D")
    );
}

#[test]
fn reference_vector_full_header() {
    let header = reference_signer()
        .authorization_header_at("GET", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();

    assert_eq!(
        header,
        "OAuth oauth_consumer_key=\"dpf43f3p2l4k3l03\", \
         oauth_nonce=\"kllo9940pd9333jh\", \
         oauth_signature_method=\"HMAC-SHA1\", \
         oauth_timestamp=\"1191242096\", \
         oauth_token=\"nnch734d00sl2jdk\", \
         oauth_version=\"1.0\", \
         oauth_signature=\"tR3%2BTy81lMeYAr%2FFid0kMTYa%2FWM%3D\""
    );
}

#[test]
fn reference_vector_base_string() {
    let mut params = photo_query();
    params.extend([
        ("oauth_consumer_key".to_string(), CONSUMER_KEY.to_string()),
        ("oauth_token".to_string(), TOKEN.to_string()),
        ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
        ("oauth_timestamp".to_string(), TIMESTAMP.to_string()),
        ("oauth_nonce".to_string(), NONCE.to_string()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ]);

    assert_eq!(
        signature_base_string("get", PHOTOS_URL, &params),
        "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26\
         oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26\
         oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26\
         oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
    );
}

#[test]
fn query_string_in_url_is_signed_like_separate_params() {
    let signer = reference_signer();
    let separate = signer
        .authorization_header_at("GET", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();
    let embedded = signer
        .authorization_header_at(
            "GET",
            "http://photos.example.net/photos?file=vacation.jpg&size=original",
            &[],
            NONCE,
            TIMESTAMP,
        )
        .unwrap();

    assert_eq!(separate, embedded);
}

#[test]
fn method_case_does_not_matter() {
    let signer = reference_signer();
    let upper = signer
        .authorization_header_at("GET", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();
    let lower = signer
        .authorization_header_at("get", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();
    assert_eq!(upper, lower);
}

#[test]
fn query_params_change_the_signature() {
    let signer = reference_signer();
    let with_query = signer
        .authorization_header_at("GET", PHOTOS_URL, &photo_query(), NONCE, TIMESTAMP)
        .unwrap();
    let without = signer
        .authorization_header_at("GET", PHOTOS_URL, &[], NONCE, TIMESTAMP)
        .unwrap();

    assert_ne!(
        header_param(&with_query, "oauth_signature"),
        header_param(&without, "oauth_signature")
    );
}

#[test]
fn every_call_gets_a_fresh_nonce() {
    let signer = reference_signer();
    let first = signer.authorization_header("POST", "https://api.twitter.com/2/tweets", &[]).unwrap();
    let second = signer.authorization_header("POST", "https://api.twitter.com/2/tweets", &[]).unwrap();

    let nonce_a = header_param(&first, "oauth_nonce").unwrap();
    let nonce_b = header_param(&second, "oauth_nonce").unwrap();
    assert_ne!(nonce_a, nonce_b);
    assert_eq!(nonce_a.len(), 32);
    assert!(nonce_a.chars().all(|c| c.is_ascii_hexdigit()));

    let timestamp: i64 = header_param(&first, "oauth_timestamp").unwrap().parse().unwrap();
    let now = chrono::Utc::now().timestamp();
    assert!((now - timestamp).abs() <= 5);

    for key in [
        "oauth_consumer_key",
        "oauth_signature_method",
        "oauth_token",
        "oauth_version",
        "oauth_signature",
    ] {
        assert!(header_param(&first, key).is_some(), "missing {key}");
    }
}

#[test]
fn percent_encoding_follows_rfc3986() {
    assert_eq!(percent_encode("abcXYZ019-._~"), "abcXYZ019-._~");
    assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
    assert_eq!(percent_encode("a=b&c~d.e_f-g"), "a%3Db%26c~d.e_f-g");
    assert_eq!(percent_encode("An encoded string!"), "An%20encoded%20string%21");
    assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
    assert_eq!(percent_encode("☃"), "%E2%98%83");
    assert_eq!(percent_encode("*"), "%2A");
}

#[test]
fn signing_key_encodes_both_secrets() {
    assert_eq!(signing_key(CONSUMER_SECRET, TOKEN_SECRET), "kd94hf93k423kf44&pfkkdhi9sl3r4s00");
    assert_eq!(signing_key("a&b", "c d"), "a%26b&c%20d");
}

#[test]
fn duplicate_keys_sort_by_value() {
    let params = vec![
        ("a".to_string(), "2".to_string()),
        ("a".to_string(), "1".to_string()),
        ("B".to_string(), "x".to_string()),
    ];
    // "B" sorts before "a" byte-wise
    assert_eq!(
        signature_base_string("POST", "https://example.com/", &params),
        "POST&https%3A%2F%2Fexample.com%2F&B%3Dx%26a%3D1%26a%3D2"
    );
}

#[test]
fn missing_credentials_fail_fast() {
    let err = OAuthCredentials::new("", CONSUMER_SECRET, TOKEN, TOKEN_SECRET).unwrap_err();
    assert!(matches!(err, SigningError::MissingCredential("consumer_key")));

    let err = OAuthCredentials::new(CONSUMER_KEY, CONSUMER_SECRET, TOKEN, "  ").unwrap_err();
    assert!(matches!(err, SigningError::MissingCredential("token_secret")));
}

#[test]
fn unparseable_url_is_rejected() {
    let err = reference_signer()
        .authorization_header_at("GET", "not a url", &[], NONCE, TIMESTAMP)
        .unwrap_err();
    assert!(matches!(err, SigningError::InvalidUrl(_)));
}
