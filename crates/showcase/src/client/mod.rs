//! Client for the external admin REST API that owns the application catalogue and user accounts.
//!
//! Every call reads the bearer token from a [`TokenStore`] first; without a token the call fails
//! with [`ApiError::MissingToken`] and nothing is sent. Calls are awaited one at a time, so a
//! caller issuing several listings in a row sees them complete in issue order.

pub mod apps;
pub mod auth;
pub mod categories;
pub mod users;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use apps::{App, AppPage, AppQuery, AppStats, AppStatus, AppUpdate, NewApp, Pagination};
pub use auth::{FileTokenStore, StaticTokenStore, TokenStore};
pub use users::{
    NewUser, User, UserActivity, UserPage, UserQuery, UserStats, UserStatus, UserUpdate,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not signed in: no API token is stored")]
    MissingToken,
    #[error("invalid admin API base URL {0}")]
    BaseUrl(String),
    #[error("failed to read API token: {0}")]
    TokenStore(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusBody<S> {
    status: S,
}

pub struct AdminApiClient {
    base_url: Url,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl AdminApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim())
            .map_err(|err| ApiError::BaseUrl(format!("{raw:?} ({err})")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::BaseUrl(format!("{raw:?} (not a base URL)")));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub async fn list_apps(&self, query: &AppQuery) -> Result<AppPage, ApiError> {
        let request = self.authorized(Method::GET, &["api", "apps"])?.query(query);
        self.send_json(request).await
    }

    pub async fn create_app(&self, app: &NewApp) -> Result<App, ApiError> {
        let request = self.authorized(Method::POST, &["api", "apps"])?.json(app);
        self.send_json(request).await
    }

    pub async fn update_app(&self, id: &str, update: &AppUpdate) -> Result<App, ApiError> {
        let request = self
            .authorized(Method::PUT, &["api", "apps", id])?
            .json(update);
        self.send_json(request).await
    }

    pub async fn update_app_status(&self, id: &str, status: AppStatus) -> Result<App, ApiError> {
        let request = self
            .authorized(Method::PUT, &["api", "apps", id])?
            .json(&StatusBody { status });
        self.send_json(request).await
    }

    pub async fn list_users(&self, query: &UserQuery) -> Result<UserPage, ApiError> {
        let request = self.authorized(Method::GET, &["api", "users"])?.query(query);
        self.send_json(request).await
    }

    pub async fn get_user(&self, id: &str) -> Result<User, ApiError> {
        let request = self.authorized(Method::GET, &["api", "users", id])?;
        self.send_json(request).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User, ApiError> {
        let request = self.authorized(Method::POST, &["api", "users"])?.json(user);
        self.send_json(request).await
    }

    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        let request = self
            .authorized(Method::PUT, &["api", "users", id])?
            .json(update);
        self.send_json(request).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, &["api", "users", id])?;
        self.send(request).await.map(|_| ())
    }

    pub async fn set_user_status(&self, id: &str, status: UserStatus) -> Result<User, ApiError> {
        let request = self
            .authorized(Method::PUT, &["api", "users", id, "status"])?
            .json(&StatusBody { status });
        self.send_json(request).await
    }

    pub async fn user_activity(&self, id: &str) -> Result<Vec<UserActivity>, ApiError> {
        let request = self.authorized(Method::GET, &["api", "users", id, "activity"])?;
        self.send_json(request).await
    }

    pub async fn user_stats(&self) -> Result<UserStats, ApiError> {
        let request = self.authorized(Method::GET, &["api", "users", "stats"])?;
        self.send_json(request).await
    }

    /// Resolve path segments under the base URL. Each segment is percent-encoded on its own, so
    /// an identifier can never add or escape a path level.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.token()?.ok_or(ApiError::MissingToken)?;
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "admin api request");
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        warn!(status = status.as_u16(), %message, "admin api rejected request");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}
