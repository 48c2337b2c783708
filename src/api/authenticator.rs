use reqwest::RequestBuilder;

use crate::auth::SessionRecord;

/// Pre-send hook attaching the stored bearer token to outbound requests.
///
/// Call sites never handle credentials themselves: the client routes every
/// outgoing request through `decorate` with the current session record.
/// A record without a token passes the request through unmodified; whether
/// an unauthenticated request succeeds is the server's call, not ours.
pub struct RequestAuthenticator;

impl RequestAuthenticator {
    /// Pure function of its inputs: never mutates the record, never fails.
    /// Construction errors inside the builder stay attached to it and
    /// surface when the request is sent.
    pub fn decorate(builder: RequestBuilder, record: &SessionRecord) -> RequestBuilder {
        match record.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserInfo;
    use reqwest::header::AUTHORIZATION;
    use reqwest::Client;

    fn record_with_token(token: &str) -> SessionRecord {
        SessionRecord {
            user_info: Some(UserInfo {
                token: token.to_string(),
                claims: serde_json::Map::new(),
            }),
            login_time: Some(0),
        }
    }

    #[test]
    fn test_attaches_bearer_token() {
        let builder = Client::new().get("https://example.invalid/api/query");
        let request = RequestAuthenticator::decorate(builder, &record_with_token("abc"))
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn test_passes_through_without_record() {
        let builder = Client::new().get("https://example.invalid/api/query");
        let request = RequestAuthenticator::decorate(builder, &SessionRecord::default())
            .build()
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_leaves_existing_headers_intact() {
        let builder = Client::new()
            .post("https://example.invalid/api/query")
            .header("Content-Type", "application/json");
        let request = RequestAuthenticator::decorate(builder, &record_with_token("abc"))
            .build()
            .unwrap();
        assert_eq!(request.headers().get("Content-Type").unwrap(), "application/json");
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer abc");
    }
}
