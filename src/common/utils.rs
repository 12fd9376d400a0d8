//! Utility functions for bucketprops

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Percent-encoding set for bucket names (includes /, %, and control chars)
const BUCKET_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b'/')
    .add(b'%')
    .add(b' ')
    .add(b'?')
    .add(b'#')
    .add(b'&')
    .add(b'+');

/// Encode a bucket name for use as a URL path segment
pub fn encode_bucket(bucket: &str) -> String {
    utf8_percent_encode(bucket, BUCKET_ENCODE_SET).to_string()
}

/// Build the REST path for a bucket, e.g. `/riak/users`
pub fn bucket_path(bucket: &str) -> String {
    format!("/riak/{}", encode_bucket(bucket))
}

/// Media type essence: `Application/JSON; charset=UTF-8` -> `application/json`
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bucket() {
        assert_eq!(encode_bucket("users"), "users");
        assert_eq!(encode_bucket("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_bucket("50%+1"), "50%25%2B1");
    }

    #[test]
    fn test_bucket_path() {
        assert_eq!(bucket_path("photos"), "/riak/photos");
        assert_eq!(bucket_path("my bucket"), "/riak/my%20bucket");
    }

    #[test]
    fn test_media_type_essence() {
        assert_eq!(media_type_essence("application/json"), "application/json");
        assert_eq!(
            media_type_essence("Application/JSON; charset=UTF-8"),
            "application/json"
        );
        assert_eq!(media_type_essence(""), "");
    }
}
