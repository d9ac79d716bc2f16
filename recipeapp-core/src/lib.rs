pub mod api;
pub mod dto;
pub mod error;
pub mod http;
pub mod mapping;
pub mod model;

pub use api::{AuthApi, IngredientApi, RecipeApi, TagApi};
pub use error::{ApiError, MappingError, TransportError};
pub use http::{
    ApiClient, ApiClientBuilder, Method, MockResponse, MockTransport, RateLimiter, RawResponse,
    ReqwestTransport, Request, Transport,
};
pub use mapping::{format_timestamp, parse_timestamp};
pub use model::{
    ApiResponse, AuthResponse, Category, Difficulty, Ingredient, LoginRequest, PaginatedResponse,
    Recipe, RecipeFilter, RecipeIngredient, RegisterRequest, SortOrder, Tag, User,
};
