/// Weather lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse {what} response: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("Weather provider returned status {code}: {message}")]
    Status { code: String, message: String },
}

/// Location lookup failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Location service returned an out-of-range position")]
    InvalidPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_message_is_user_facing() {
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Permission to access location was denied"
        );
    }

    #[test]
    fn status_error_keeps_provider_detail() {
        let err = WeatherError::Status { code: "401".into(), message: "Invalid API key".into() };
        assert_eq!(err.to_string(), "Weather provider returned status 401: Invalid API key");
    }
}
