//! Wire DTOs: the exact JSON shapes exchanged with the recipe server.
//!
//! Field names are the server's snake_case keys. Timestamps and difficulty
//! stay raw text here; they are validated when mapped into [`crate::model`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: i32,
    pub difficulty: String,
    pub image_url: Option<String>,
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredientDto>,
    #[serde(default)]
    pub tags: Vec<TagDto>,
    #[serde(default)]
    pub categories: Vec<CategoryDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredientDto {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<IngredientDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientDto {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDto {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: UserDto,
    pub expires_in: i64,
}

/// Body of `POST /api/auth/refresh`. The server does not echo the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RefreshTokenDto {
    pub token: String,
    pub expires_in: i64,
}

/// Create/update responses wrap the recipe with a status message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeEnvelopeDto {
    #[serde(default)]
    pub message: Option<String>,
    pub recipe: RecipeDto,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientRequestDto<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagRequestDto<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'a str>,
}

/// Returned with HTTP 400 when server-side validation rejects a body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationErrorDto {
    pub message: String,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponseDto<T> {
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponseDto<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}
