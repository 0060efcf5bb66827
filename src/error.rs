use thiserror::Error;

/// Failure of a single catalog request.
///
/// Everything except [`ApiError::NotFound`] and [`ApiError::Parse`] means the
/// request itself failed; controllers treat those as network errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("invalid or missing API key")]
    Unauthorized,
    #[error("rate limited by the catalog provider")]
    RateLimit,
    #[error("entity not found")]
    NotFound,
    #[error("failed to decode response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Status(_) | ApiError::Unauthorized | ApiError::RateLimit
        )
    }

    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ApiError::Unauthorized),
            404 => Some(ApiError::NotFound),
            429 => Some(ApiError::RateLimit),
            s if s >= 400 => Some(ApiError::Status(s)),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Parse(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert_eq!(ApiError::from_status(200), None);
        assert_eq!(ApiError::from_status(304), None);
        assert_eq!(ApiError::from_status(401), Some(ApiError::Unauthorized));
        assert_eq!(ApiError::from_status(404), Some(ApiError::NotFound));
        assert_eq!(ApiError::from_status(429), Some(ApiError::RateLimit));
        assert_eq!(ApiError::from_status(503), Some(ApiError::Status(503)));
    }

    #[test]
    fn not_found_and_parse_are_not_network_failures() {
        assert!(ApiError::Network(String::from("reset")).is_network());
        assert!(ApiError::Status(500).is_network());
        assert!(ApiError::RateLimit.is_network());
        assert!(!ApiError::NotFound.is_network());
        assert!(!ApiError::Parse(String::from("eof")).is_network());
    }

    #[tokio::test]
    async fn request_failures_convert_to_network_errors() {
        let error = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .expect_err("malformed url");
        let converted = ApiError::from(error);
        assert!(matches!(converted, ApiError::Network(_)));
        assert!(converted.is_network());
    }
}
