//! HTTP implementation of the recipe, auth, ingredient and tag contracts.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::api::{AuthApi, IngredientApi, RecipeApi, TagApi};
use crate::dto::{
    AuthResponseDto, IngredientDto, IngredientRequestDto, MessageDto, RecipeDto,
    RecipeEnvelopeDto, RefreshTokenDto, TagDto, TagRequestDto, UserDto, ValidationErrorDto,
};
use crate::error::{ApiError, TransportError};
use crate::mapping::try_map_all;
use crate::model::{
    AuthResponse, Ingredient, LoginRequest, Recipe, RecipeFilter, RegisterRequest, Tag, User,
};

use super::rate_limiter::RateLimiter;
use super::transport::{Method, RawResponse, ReqwestTransport, Request, Transport};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Configuration for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
    rate_limit_ms: u64,
    token: Option<String>,
    user_agent: String,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Environment variables:
    /// - `RECIPEAPP_API_URL`: server base URL (default `http://localhost:8080`)
    /// - `RECIPEAPP_HTTP_TIMEOUT_SECS`: per-request timeout (default 30)
    /// - `RECIPEAPP_MAX_RETRIES`: extra attempts for GET requests (default 2)
    /// - `RECIPEAPP_RATE_LIMIT_MS`: minimum gap between requests (default 0, off)
    /// - `RECIPEAPP_TOKEN`: bearer token to start the session with
    pub fn new() -> Self {
        let base_url =
            std::env::var("RECIPEAPP_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_secs: u64 = env_number("RECIPEAPP_HTTP_TIMEOUT_SECS").unwrap_or(30);
        let max_retries: u32 = env_number("RECIPEAPP_MAX_RETRIES").unwrap_or(2);
        let rate_limit_ms: u64 = env_number("RECIPEAPP_RATE_LIMIT_MS").unwrap_or(0);

        let token = std::env::var("RECIPEAPP_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            max_retries,
            retry_backoff: Duration::from_millis(250),
            rate_limit_ms,
            token,
            user_agent: format!("recipeapp/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set the server base URL, e.g. `https://recipes.example.com`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts for GET requests. Mutating requests are never retried.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base delay between retries; attempt `n` waits `n * backoff`.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Minimum delay between requests in milliseconds. 0 disables pacing.
    pub fn rate_limit_ms(mut self, ms: u64) -> Self {
        self.rate_limit_ms = ms;
        self
    }

    /// Start the session with an existing bearer token.
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Build a client that talks HTTP through reqwest.
    pub fn build(self) -> Result<ApiClient<ReqwestTransport>, ApiError> {
        let transport = ReqwestTransport::new(self.timeout, &self.user_agent)?;
        self.build_with_transport(transport)
    }

    /// Build a client over any transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<ApiClient<T>, ApiError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| TransportError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(ApiClient {
            transport,
            base_url,
            session: RwLock::new(Session {
                token: self.token,
                user: None,
            }),
            rate_limiter: RateLimiter::new(Duration::from_millis(self.rate_limit_ms)),
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
        })
    }
}

/// Read a numeric setting. Unparsable or out-of-range values are ignored.
fn env_number<N>(name: &str) -> Option<N>
where
    N: FromStr,
    N::Err: fmt::Display,
{
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(name, value = %raw, error = %e, "ignoring invalid numeric setting");
            None
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    token: Option<String>,
    user: Option<User>,
}

/// Client for the recipe server.
///
/// Implements every capability trait in [`crate::api`]. Holds the bearer
/// token and the last authenticated user in memory.
pub struct ApiClient<T: Transport = ReqwestTransport> {
    transport: T,
    base_url: String,
    session: RwLock<Session>,
    rate_limiter: RateLimiter,
    max_retries: u32,
    retry_backoff: Duration,
}

impl ApiClient<ReqwestTransport> {
    /// Create a client with default configuration.
    pub fn new() -> Result<Self, ApiError> {
        ApiClientBuilder::new().build()
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::new()
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    /// The user from the last login, register or refresh.
    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn store_session(&self, token: String, user: Option<User>) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);
        session.token = Some(token);
        if user.is_some() {
            session.user = user;
        }
    }

    fn clear_session(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Session::default();
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{raw}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Send a request, retrying idempotent GETs on transient failures.
    async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<RawResponse, ApiError> {
        let request = Request {
            method,
            url,
            bearer_token: self.token(),
            body,
            request_id: Uuid::new_v4(),
        };
        let max_attempts = if method == Method::Get {
            self.max_retries.saturating_add(1)
        } else {
            1
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            if let Some(host) = request.url.host_str() {
                self.rate_limiter.wait(host).await;
            }

            tracing::debug!(
                method = %method,
                path = request.url.path(),
                request_id = %request.request_id,
                attempt,
                "api: sending request"
            );
            let outcome = self.transport.send(&request).await;

            let transient = match &outcome {
                Ok(response) => matches!(response.status, 502..=504),
                Err(_) => true,
            };
            if transient && attempt < max_attempts {
                match &outcome {
                    Ok(response) => tracing::warn!(
                        request_id = %request.request_id,
                        status = response.status,
                        attempt,
                        "api: transient status, retrying"
                    ),
                    Err(e) => tracing::warn!(
                        request_id = %request.request_id,
                        error = %e,
                        attempt,
                        "api: transport error, retrying"
                    ),
                }
                tokio::time::sleep(self.retry_backoff.saturating_mul(attempt)).await;
                continue;
            }

            let response = outcome?;
            tracing::debug!(
                request_id = %request.request_id,
                status = response.status,
                "api: response received"
            );
            return check_status(response);
        }
    }

    async fn get<D: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<D, ApiError> {
        let url = self.endpoint(path, query)?;
        decode(self.execute(Method::Get, url, None).await?)
    }

    /// GET a collection. The server encodes an empty result as `null`.
    async fn get_list<D: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<D>, ApiError> {
        let items: Option<Vec<D>> = self.get(path, query).await?;
        Ok(items.unwrap_or_default())
    }

    async fn send_json<B: Serialize + ?Sized, D: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<D, ApiError> {
        let url = self.endpoint(path, &[])?;
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        decode(self.execute(method, url, Some(body)).await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let response = self.execute(Method::Delete, url, None).await?;
        if let Ok(MessageDto { message }) = serde_json::from_str(&response.body) {
            tracing::debug!(path, message = %message, "api: deleted");
        }
        Ok(())
    }
}

/// Map non-2xx statuses to [`ApiError`].
fn check_status(response: RawResponse) -> Result<RawResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    let body = response.body.trim().to_string();
    match response.status {
        400 => match serde_json::from_str::<ValidationErrorDto>(&body) {
            Ok(validation) => Err(ApiError::Validation {
                message: validation.message,
                errors: validation.errors,
            }),
            Err(_) => Err(ApiError::Status { status: 400, body }),
        },
        401 => Err(ApiError::Unauthorized(body)),
        404 => Err(ApiError::NotFound(body)),
        status => Err(ApiError::Status { status, body }),
    }
}

fn decode<D: DeserializeOwned>(response: RawResponse) -> Result<D, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl<T: Transport> RecipeApi for ApiClient<T> {
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, ApiError> {
        let dtos: Vec<RecipeDto> = self.get_list("/api/recipes", &filter.to_query()).await?;
        Ok(try_map_all(dtos)?)
    }

    async fn get_recipe(&self, id: i64) -> Result<Recipe, ApiError> {
        let dto: RecipeDto = self.get(&format!("/api/recipes/{id}"), &[]).await?;
        Ok(Recipe::try_from(dto)?)
    }

    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let envelope: RecipeEnvelopeDto = self
            .send_json(Method::Post, "/api/recipes", &RecipeDto::from(recipe))
            .await?;
        Ok(Recipe::try_from(envelope.recipe)?)
    }

    async fn update_recipe(&self, id: i64, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let envelope: RecipeEnvelopeDto = self
            .send_json(
                Method::Put,
                &format!("/api/recipes/{id}"),
                &RecipeDto::from(recipe),
            )
            .await?;
        Ok(Recipe::try_from(envelope.recipe)?)
    }

    async fn delete_recipe(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/recipes/{id}")).await
    }
}

#[async_trait]
impl<T: Transport> AuthApi for ApiClient<T> {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let dto: AuthResponseDto = self
            .send_json(Method::Post, "/api/auth/login", request)
            .await?;
        let auth = AuthResponse::try_from(dto)?;
        self.store_session(auth.token.clone(), Some(auth.user.clone()));
        tracing::debug!(user_id = auth.user.id, "api: logged in");
        Ok(auth)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let dto: AuthResponseDto = self
            .send_json(Method::Post, "/api/auth/register", request)
            .await?;
        let auth = AuthResponse::try_from(dto)?;
        self.store_session(auth.token.clone(), Some(auth.user.clone()));
        tracing::debug!(user_id = auth.user.id, "api: registered");
        Ok(auth)
    }

    async fn refresh_token(&self) -> Result<AuthResponse, ApiError> {
        if self.token().is_none() {
            return Err(ApiError::NotAuthenticated);
        }

        let url = self.endpoint("/api/auth/refresh", &[])?;
        let refreshed: RefreshTokenDto = decode(self.execute(Method::Post, url, None).await?)?;
        self.store_session(refreshed.token.clone(), None);

        // The refresh route returns no user; sessions started from a bare
        // token learn theirs from the profile route.
        let user = match self.current_user() {
            Some(user) => user,
            None => {
                let dto: UserDto = self.get("/api/users/profile", &[]).await?;
                let user = User::try_from(dto)?;
                self.store_session(refreshed.token.clone(), Some(user.clone()));
                user
            }
        };

        Ok(AuthResponse {
            token: refreshed.token,
            user,
            expires_in: refreshed.expires_in,
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        // No server route: the token is simply forgotten.
        self.clear_session();
        tracing::debug!("api: logged out");
        Ok(())
    }
}

#[async_trait]
impl<T: Transport> IngredientApi for ApiClient<T> {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError> {
        let dtos: Vec<IngredientDto> = self.get_list("/api/ingredients", &[]).await?;
        Ok(try_map_all(dtos)?)
    }

    async fn get_ingredient(&self, id: i64) -> Result<Ingredient, ApiError> {
        let dto: IngredientDto = self.get(&format!("/api/ingredients/{id}"), &[]).await?;
        Ok(Ingredient::try_from(dto)?)
    }

    async fn create_ingredient(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Ingredient, ApiError> {
        let dto: IngredientDto = self
            .send_json(
                Method::Post,
                "/api/ingredients",
                &IngredientRequestDto { name, category },
            )
            .await?;
        Ok(Ingredient::try_from(dto)?)
    }

    async fn update_ingredient(
        &self,
        id: i64,
        name: &str,
        category: Option<&str>,
    ) -> Result<Ingredient, ApiError> {
        let dto: IngredientDto = self
            .send_json(
                Method::Put,
                &format!("/api/ingredients/{id}"),
                &IngredientRequestDto { name, category },
            )
            .await?;
        Ok(Ingredient::try_from(dto)?)
    }

    async fn delete_ingredient(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/ingredients/{id}")).await
    }

    async fn search_ingredients(&self, query: &str) -> Result<Vec<Ingredient>, ApiError> {
        let dtos: Vec<IngredientDto> = self
            .get_list("/api/ingredients", &[("search", query.to_string())])
            .await?;
        Ok(try_map_all(dtos)?)
    }
}

#[async_trait]
impl<T: Transport> TagApi for ApiClient<T> {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let dtos: Vec<TagDto> = self.get_list("/api/tags", &[]).await?;
        Ok(try_map_all(dtos)?)
    }

    async fn get_tag(&self, id: i64) -> Result<Tag, ApiError> {
        let dto: TagDto = self.get(&format!("/api/tags/{id}"), &[]).await?;
        Ok(Tag::try_from(dto)?)
    }

    async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag, ApiError> {
        let dto: TagDto = self
            .send_json(Method::Post, "/api/tags", &TagRequestDto { name, color })
            .await?;
        Ok(Tag::try_from(dto)?)
    }

    async fn update_tag(&self, id: i64, name: &str, color: Option<&str>) -> Result<Tag, ApiError> {
        let dto: TagDto = self
            .send_json(
                Method::Put,
                &format!("/api/tags/{id}"),
                &TagRequestDto { name, color },
            )
            .await?;
        Ok(Tag::try_from(dto)?)
    }

    async fn delete_tag(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/tags/{id}")).await
    }
}
