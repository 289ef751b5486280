use crate::awards::AwardServiceError;
use crate::client::ApiError;
use crate::competitions::CompetitionServiceError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Competition(CompetitionServiceError),
    Award(AwardServiceError),
    AdminApi(ApiError),
    Export(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Competition(err) => write!(f, "competition error: {}", err),
            AppError::Award(err) => write!(f, "award error: {}", err),
            AppError::AdminApi(err) => write!(f, "admin api error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Competition(err) => Some(err),
            AppError::Award(err) => Some(err),
            AppError::AdminApi(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Competition(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Award(err) if err.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AdminApi(ApiError::MissingToken) => StatusCode::UNAUTHORIZED,
            AppError::AdminApi(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CompetitionServiceError> for AppError {
    fn from(value: CompetitionServiceError) -> Self {
        Self::Competition(value)
    }
}

impl From<AwardServiceError> for AppError {
    fn from(value: AwardServiceError) -> Self {
        Self::Award(value)
    }
}

impl From<ApiError> for AppError {
    fn from(value: ApiError) -> Self {
        Self::AdminApi(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitions::CompetitionViolation;

    #[test]
    fn validation_failures_map_to_unprocessable() {
        let error = AppError::from(CompetitionServiceError::from(CompetitionViolation::NoJudges));
        assert_eq!(error.to_string(), "competition error: select at least one judge");
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn missing_token_maps_to_unauthorized() {
        let response = AppError::from(ApiError::MissingToken).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
