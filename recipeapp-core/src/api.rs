//! Capability contracts for the recipe server.
//!
//! One trait per capability group. Every operation crosses a network
//! boundary, so each one suspends and may fail with [`ApiError`]. Nothing here
//! knows about transport, retries or sessions; see [`crate::http::ApiClient`]
//! for the HTTP adapter.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{
    AuthResponse, Ingredient, LoginRequest, Recipe, RecipeFilter, RegisterRequest, Tag,
};

#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn list_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, ApiError>;

    async fn get_recipe(&self, id: i64) -> Result<Recipe, ApiError>;

    async fn create_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError>;

    async fn update_recipe(&self, id: i64, recipe: &Recipe) -> Result<Recipe, ApiError>;

    async fn delete_recipe(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    /// Exchange the current token for a fresh one. Caller-driven: nothing
    /// calls this automatically.
    async fn refresh_token(&self) -> Result<AuthResponse, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

#[async_trait]
pub trait IngredientApi: Send + Sync {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, ApiError>;

    async fn get_ingredient(&self, id: i64) -> Result<Ingredient, ApiError>;

    async fn create_ingredient(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Ingredient, ApiError>;

    async fn update_ingredient(
        &self,
        id: i64,
        name: &str,
        category: Option<&str>,
    ) -> Result<Ingredient, ApiError>;

    async fn delete_ingredient(&self, id: i64) -> Result<(), ApiError>;

    async fn search_ingredients(&self, query: &str) -> Result<Vec<Ingredient>, ApiError>;
}

#[async_trait]
pub trait TagApi: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, ApiError>;

    async fn get_tag(&self, id: i64) -> Result<Tag, ApiError>;

    async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag, ApiError>;

    async fn update_tag(&self, id: i64, name: &str, color: Option<&str>) -> Result<Tag, ApiError>;

    async fn delete_tag(&self, id: i64) -> Result<(), ApiError>;
}
