//! Conversions between wire DTOs and domain values.
//!
//! DTO → domain is fallible: difficulty text and timestamps are validated
//! here and rejected with a [`MappingError`], never defaulted.
//! Domain → DTO is total.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::dto::{
    ApiResponseDto, AuthResponseDto, CategoryDto, IngredientDto, PaginatedResponseDto, RecipeDto,
    RecipeIngredientDto, TagDto, UserDto,
};
use crate::error::MappingError;
use crate::model::{
    ApiResponse, AuthResponse, Category, Difficulty, Ingredient, PaginatedResponse, Recipe,
    RecipeIngredient, Tag, User,
};

/// Offset-less forms accepted as UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a wire timestamp.
///
/// Accepts RFC 3339 with any offset (normalized to UTC) and ISO-8601 local
/// date-times without an offset, which are taken as UTC.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, MappingError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MappingError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Format a timestamp the way the server writes it: RFC 3339 with a `Z`
/// suffix and the fractional second trimmed of trailing zeros.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    let formatted = value.to_rfc3339_opts(SecondsFormat::Nanos, true);
    match formatted.split_once('.') {
        Some((seconds, fraction)) => {
            let digits = fraction.trim_end_matches('Z').trim_end_matches('0');
            if digits.is_empty() {
                format!("{seconds}Z")
            } else {
                format!("{seconds}.{digits}Z")
            }
        }
        None => formatted,
    }
}

impl TryFrom<RecipeDto> for Recipe {
    type Error = MappingError;

    fn try_from(dto: RecipeDto) -> Result<Self, Self::Error> {
        Ok(Recipe {
            id: dto.id,
            user_id: dto.user_id,
            title: dto.title,
            description: dto.description,
            instructions: dto.instructions,
            prep_time: dto.prep_time,
            cook_time: dto.cook_time,
            servings: dto.servings,
            difficulty: dto.difficulty.parse::<Difficulty>()?,
            image_url: dto.image_url,
            is_public: dto.is_public,
            created_at: parse_timestamp("created_at", &dto.created_at)?,
            updated_at: parse_timestamp("updated_at", &dto.updated_at)?,
            ingredients: try_map_all(dto.ingredients)?,
            tags: try_map_all(dto.tags)?,
            categories: try_map_all(dto.categories)?,
            user: dto.user.map(User::try_from).transpose()?,
        })
    }
}

impl From<&Recipe> for RecipeDto {
    fn from(recipe: &Recipe) -> Self {
        RecipeDto {
            id: recipe.id,
            user_id: recipe.user_id,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            instructions: recipe.instructions.clone(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.as_str().to_string(),
            image_url: recipe.image_url.clone(),
            is_public: recipe.is_public,
            created_at: format_timestamp(&recipe.created_at),
            updated_at: format_timestamp(&recipe.updated_at),
            ingredients: recipe.ingredients.iter().map(Into::into).collect(),
            tags: recipe.tags.iter().map(Into::into).collect(),
            categories: recipe.categories.iter().map(Into::into).collect(),
            user: recipe.user.as_ref().map(Into::into),
        }
    }
}

impl TryFrom<RecipeIngredientDto> for RecipeIngredient {
    type Error = MappingError;

    fn try_from(dto: RecipeIngredientDto) -> Result<Self, Self::Error> {
        Ok(RecipeIngredient {
            id: dto.id,
            recipe_id: dto.recipe_id,
            ingredient_id: dto.ingredient_id,
            quantity: dto.quantity,
            unit: dto.unit,
            notes: dto.notes,
            ingredient: dto.ingredient.map(Ingredient::try_from).transpose()?,
        })
    }
}

impl From<&RecipeIngredient> for RecipeIngredientDto {
    fn from(item: &RecipeIngredient) -> Self {
        RecipeIngredientDto {
            id: item.id,
            recipe_id: item.recipe_id,
            ingredient_id: item.ingredient_id,
            quantity: item.quantity,
            unit: item.unit.clone(),
            notes: item.notes.clone(),
            ingredient: item.ingredient.as_ref().map(Into::into),
        }
    }
}

impl TryFrom<IngredientDto> for Ingredient {
    type Error = MappingError;

    fn try_from(dto: IngredientDto) -> Result<Self, Self::Error> {
        Ok(Ingredient {
            id: dto.id,
            name: dto.name,
            category: dto.category,
            created_at: parse_timestamp("created_at", &dto.created_at)?,
        })
    }
}

impl From<&Ingredient> for IngredientDto {
    fn from(ingredient: &Ingredient) -> Self {
        IngredientDto {
            id: ingredient.id,
            name: ingredient.name.clone(),
            category: ingredient.category.clone(),
            created_at: format_timestamp(&ingredient.created_at),
        }
    }
}

impl TryFrom<TagDto> for Tag {
    type Error = MappingError;

    fn try_from(dto: TagDto) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: dto.id,
            name: dto.name,
            color: dto.color,
            created_at: parse_timestamp("created_at", &dto.created_at)?,
        })
    }
}

impl From<&Tag> for TagDto {
    fn from(tag: &Tag) -> Self {
        TagDto {
            id: tag.id,
            name: tag.name.clone(),
            color: tag.color.clone(),
            created_at: format_timestamp(&tag.created_at),
        }
    }
}

impl TryFrom<CategoryDto> for Category {
    type Error = MappingError;

    fn try_from(dto: CategoryDto) -> Result<Self, Self::Error> {
        Ok(Category {
            id: dto.id,
            user_id: dto.user_id,
            name: dto.name,
            parent_id: dto.parent_id,
            created_at: parse_timestamp("created_at", &dto.created_at)?,
        })
    }
}

impl From<&Category> for CategoryDto {
    fn from(category: &Category) -> Self {
        CategoryDto {
            id: category.id,
            user_id: category.user_id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            created_at: format_timestamp(&category.created_at),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = MappingError;

    fn try_from(dto: UserDto) -> Result<Self, Self::Error> {
        Ok(User {
            id: dto.id,
            email: dto.email,
            name: dto.name,
            is_admin: dto.is_admin,
            created_at: parse_timestamp("created_at", &dto.created_at)?,
            updated_at: parse_timestamp("updated_at", &dto.updated_at)?,
        })
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        UserDto {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            created_at: format_timestamp(&user.created_at),
            updated_at: format_timestamp(&user.updated_at),
        }
    }
}

impl TryFrom<AuthResponseDto> for AuthResponse {
    type Error = MappingError;

    fn try_from(dto: AuthResponseDto) -> Result<Self, Self::Error> {
        Ok(AuthResponse {
            token: dto.token,
            user: User::try_from(dto.user)?,
            expires_in: dto.expires_in,
        })
    }
}

impl From<&AuthResponse> for AuthResponseDto {
    fn from(auth: &AuthResponse) -> Self {
        AuthResponseDto {
            token: auth.token.clone(),
            user: (&auth.user).into(),
            expires_in: auth.expires_in,
        }
    }
}

impl<D> ApiResponseDto<D> {
    /// Map the payload, keeping message and error as-is.
    pub fn try_map<T, E>(self, f: impl FnOnce(D) -> Result<T, E>) -> Result<ApiResponse<T>, E> {
        Ok(ApiResponse {
            message: self.message,
            data: self.data.map(f).transpose()?,
            error: self.error,
        })
    }
}

impl<D> PaginatedResponseDto<D> {
    /// Map every item, failing on the first one that does not convert.
    pub fn try_map<T, E>(
        self,
        f: impl FnMut(D) -> Result<T, E>,
    ) -> Result<PaginatedResponse<T>, E> {
        Ok(PaginatedResponse {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            total_count: self.total_count,
            current_page: self.current_page,
            page_size: self.page_size,
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
        })
    }
}

/// Convert a list of DTOs, failing on the first bad entry.
pub fn try_map_all<D, T>(items: Vec<D>) -> Result<Vec<T>, MappingError>
where
    T: TryFrom<D, Error = MappingError>,
{
    items.into_iter().map(T::try_from).collect()
}
