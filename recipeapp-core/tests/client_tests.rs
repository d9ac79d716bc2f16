//! ApiClient behaviour against a MockTransport.

use recipeapp_core::{
    ApiClient, ApiClientBuilder, ApiError, AuthApi, Difficulty, IngredientApi, LoginRequest,
    Method, MockResponse, MockTransport, Recipe, RecipeApi, RecipeFilter, TagApi,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

fn fixture(name: &str) -> Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn client(mock: MockTransport) -> ApiClient<MockTransport> {
    ApiClientBuilder::new()
        .base_url("http://recipes.test")
        .token(None)
        .max_retries(2)
        .retry_backoff(Duration::from_millis(10))
        .rate_limit_ms(0)
        .build_with_transport(mock)
        .unwrap()
}

fn tag_json(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "color": "#3B82F6", "created_at": "2024-01-15T10:30:00Z"})
}

fn ingredient_json(id: i64, name: &str) -> Value {
    json!({"id": id, "name": name, "category": null, "created_at": "2024-01-15T10:30:00Z"})
}

#[tokio::test]
async fn list_recipes_sends_filter_as_query() {
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/recipes",
        200,
        json!([fixture("recipe_full.json"), fixture("recipe_minimal.json")]),
    );
    let client = client(mock);

    let filter = RecipeFilter::new()
        .with_title("pasta")
        .with_difficulty(Difficulty::Medium)
        .with_page(20, 40);
    let recipes = client.list_recipes(&filter).await.unwrap();

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].title, "Classic Spaghetti Carbonara");

    let sent = client.transport().requests();
    assert_eq!(sent.len(), 1);
    let query: Vec<(String, String)> = sent[0].url.query_pairs().into_owned().collect();
    assert!(query.contains(&("title".into(), "pasta".into())));
    assert!(query.contains(&("difficulty".into(), "MEDIUM".into())));
    assert!(query.contains(&("limit".into(), "20".into())));
    assert!(query.contains(&("offset".into(), "40".into())));
    assert!(query.contains(&("sort_by".into(), "created_at".into())));
    assert!(query.contains(&("sort_order".into(), "DESC".into())));
}

#[tokio::test]
async fn list_recipes_fails_on_unmappable_item() {
    let mut bad = fixture("recipe_minimal.json");
    bad["difficulty"] = json!("IMPOSSIBLE");
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/recipes",
        200,
        json!([fixture("recipe_full.json"), bad]),
    );

    let err = client(mock)
        .list_recipes(&RecipeFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Mapping(_)));
}

#[tokio::test]
async fn get_missing_recipe_is_not_found() {
    let mock = MockTransport::new().with_response(
        Method::Get,
        "/api/recipes/99",
        MockResponse::Text(404, "Recipe not found\n".into()),
    );

    let err = client(mock).get_recipe(99).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Recipe not found"));
}

#[tokio::test]
async fn create_recipe_posts_wire_shape_and_unwraps_envelope() {
    let created = fixture("recipe_minimal.json");
    let mock = MockTransport::new().with_json(
        Method::Post,
        "/api/recipes",
        201,
        json!({"message": "Recipe created successfully", "recipe": created}),
    );
    let client = client(mock);

    let draft = Recipe::try_from(
        serde_json::from_value::<recipeapp_core::dto::RecipeDto>(fixture("recipe_minimal.json"))
            .unwrap(),
    )
    .unwrap();
    let saved = client.create_recipe(&draft).await.unwrap();
    assert_eq!(saved, draft);

    let sent = client.transport().requests();
    let body = sent[0].body.as_ref().unwrap();
    assert_eq!(body["user_id"], 7);
    assert_eq!(body["difficulty"], "EASY");
    assert_eq!(body["is_public"], false);
    assert!(body.get("userId").is_none());
}

#[tokio::test]
async fn update_recipe_validation_error_is_surfaced() {
    let mock = MockTransport::new().with_json(
        Method::Put,
        "/api/recipes/9",
        400,
        json!({"message": "Validation failed", "errors": {"servings": "Servings must be between 1 and 50"}}),
    );
    let client = client(mock);
    let recipe = Recipe::try_from(
        serde_json::from_value::<recipeapp_core::dto::RecipeDto>(fixture("recipe_minimal.json"))
            .unwrap(),
    )
    .unwrap();

    match client.update_recipe(9, &recipe).await {
        Err(ApiError::Validation { errors, .. }) => {
            assert!(errors.contains_key("servings"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn get_is_retried_after_transient_failure() {
    let mock = MockTransport::new()
        .with_response(Method::Get, "/api/tags", MockResponse::Text(503, "busy".into()))
        .with_json(Method::Get, "/api/tags", 200, json!([tag_json(1, "quick")]));
    let client = client(mock);

    let tags = client.list_tags().await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(client.transport().requests().len(), 2);
}

#[tokio::test]
async fn get_gives_up_after_max_retries() {
    let mock = MockTransport::new().with_response(
        Method::Get,
        "/api/tags/1",
        MockResponse::Unavailable("connection refused".into()),
    );
    let client = client(mock);

    let err = client.get_tag(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_retryable());
    assert_eq!(client.transport().requests().len(), 3);
}

#[tokio::test]
async fn unbounded_retry_setting_does_not_overflow() {
    let mock = MockTransport::new()
        .with_response(Method::Get, "/api/tags", MockResponse::Text(503, "busy".into()))
        .with_json(Method::Get, "/api/tags", 200, json!([tag_json(1, "quick")]));
    let client = ApiClientBuilder::new()
        .base_url("http://recipes.test")
        .token(None)
        .max_retries(u32::MAX)
        .retry_backoff(Duration::from_millis(1))
        .rate_limit_ms(0)
        .build_with_transport(mock)
        .unwrap();

    let tags = client.list_tags().await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(client.transport().requests().len(), 2);
}

#[tokio::test]
async fn post_is_never_retried() {
    let mock = MockTransport::new()
        .with_response(Method::Post, "/api/tags", MockResponse::Text(503, "busy".into()))
        .with_json(Method::Post, "/api/tags", 201, tag_json(2, "spicy"));
    let client = client(mock);

    let err = client.create_tag("spicy", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn create_tag_omits_missing_color() {
    let mock = MockTransport::new().with_json(Method::Post, "/api/tags", 201, tag_json(2, "spicy"));
    let client = client(mock);

    let tag = client.create_tag("spicy", None).await.unwrap();
    assert_eq!(tag.name, "spicy");

    let sent = client.transport().requests();
    assert_eq!(sent[0].body, Some(json!({"name": "spicy"})));
}

#[tokio::test]
async fn update_and_delete_tag() {
    let mock = MockTransport::new()
        .with_json(Method::Put, "/api/tags/2", 200, tag_json(2, "hot"))
        .with_json(
            Method::Delete,
            "/api/tags/2",
            200,
            json!({"message": "Tag deleted successfully"}),
        );
    let client = client(mock);

    let tag = client.update_tag(2, "hot", Some("#FF0000")).await.unwrap();
    assert_eq!(tag.name, "hot");
    client.delete_tag(2).await.unwrap();

    let sent = client.transport().requests();
    assert_eq!(sent[0].body, Some(json!({"name": "hot", "color": "#FF0000"})));
    assert_eq!(sent[1].method, Method::Delete);
}

#[tokio::test]
async fn search_ingredients_uses_search_param() {
    let mock = MockTransport::new().with_json(
        Method::Get,
        "/api/ingredients",
        200,
        json!([ingredient_json(1, "sea salt")]),
    );
    let client = client(mock);

    let found = client.search_ingredients("salt").await.unwrap();
    assert_eq!(found[0].name, "sea salt");

    let sent = client.transport().requests();
    assert_eq!(sent[0].url.query(), Some("search=salt"));
}

#[tokio::test]
async fn empty_listings_encoded_as_null_are_empty() {
    let mock = MockTransport::new()
        .with_json(Method::Get, "/api/recipes", 200, Value::Null)
        .with_json(Method::Get, "/api/ingredients", 200, Value::Null)
        .with_json(Method::Get, "/api/tags", 200, Value::Null);
    let client = client(mock);

    assert!(client.list_recipes(&RecipeFilter::default()).await.unwrap().is_empty());
    assert!(client.list_ingredients().await.unwrap().is_empty());
    assert!(client.search_ingredients("zzz").await.unwrap().is_empty());
    assert!(client.list_tags().await.unwrap().is_empty());
    assert_eq!(client.transport().requests().len(), 4);
}

#[tokio::test]
async fn ingredient_crud() {
    let mock = MockTransport::new()
        .with_json(Method::Get, "/api/ingredients", 200, json!([ingredient_json(1, "flour")]))
        .with_json(Method::Get, "/api/ingredients/1", 200, ingredient_json(1, "flour"))
        .with_json(Method::Post, "/api/ingredients", 201, ingredient_json(2, "sugar"))
        .with_json(Method::Put, "/api/ingredients/2", 200, ingredient_json(2, "cane sugar"))
        .with_json(
            Method::Delete,
            "/api/ingredients/2",
            200,
            json!({"message": "Ingredient deleted successfully"}),
        );
    let client = client(mock);

    assert_eq!(client.list_ingredients().await.unwrap().len(), 1);
    assert_eq!(client.get_ingredient(1).await.unwrap().name, "flour");
    assert_eq!(
        client.create_ingredient("sugar", Some("baking")).await.unwrap().id,
        2
    );
    assert_eq!(
        client.update_ingredient(2, "cane sugar", None).await.unwrap().name,
        "cane sugar"
    );
    client.delete_ingredient(2).await.unwrap();

    let sent = client.transport().requests();
    assert_eq!(sent[2].body, Some(json!({"name": "sugar", "category": "baking"})));
    assert_eq!(sent[3].body, Some(json!({"name": "cane sugar"})));
}

#[tokio::test]
async fn login_stores_session_and_sends_bearer() {
    let mock = MockTransport::new()
        .with_json(Method::Post, "/api/auth/login", 200, fixture("auth_response.json"))
        .with_json(Method::Get, "/api/tags", 200, json!([]));
    let client = client(mock);

    let auth = client
        .login(&LoginRequest {
            email: "cook@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();
    assert_eq!(auth.user.name, "Home Cook");
    assert!(client.is_authenticated());
    assert_eq!(client.current_user().map(|u| u.id), Some(7));

    client.list_tags().await.unwrap();

    let sent = client.transport().requests();
    assert_eq!(
        sent[0].body,
        Some(json!({"email": "cook@example.com", "password": "hunter22"}))
    );
    assert_eq!(sent[0].bearer_token, None);
    assert_eq!(
        sent[1].bearer_token.as_deref(),
        Some("eyJhbGciOiJIUzI1NiJ9.test.signature")
    );
}

#[tokio::test]
async fn refresh_without_session_sends_nothing() {
    let client = client(MockTransport::new());

    let err = client.refresh_token().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn refresh_replaces_token_and_keeps_user() {
    let mock = MockTransport::new()
        .with_json(Method::Post, "/api/auth/login", 200, fixture("auth_response.json"))
        .with_json(
            Method::Post,
            "/api/auth/refresh",
            200,
            json!({"token": "fresh-token", "expires_in": 86400}),
        );
    let client = client(mock);
    client
        .login(&LoginRequest {
            email: "cook@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    let refreshed = client.refresh_token().await.unwrap();
    assert_eq!(refreshed.token, "fresh-token");
    assert_eq!(refreshed.user.email, "cook@example.com");
    assert_eq!(client.token().as_deref(), Some("fresh-token"));

    let sent = client.transport().requests();
    assert_eq!(
        sent[1].bearer_token.as_deref(),
        Some("eyJhbGciOiJIUzI1NiJ9.test.signature")
    );
}

#[tokio::test]
async fn refresh_with_bare_token_loads_profile() {
    let mock = MockTransport::new()
        .with_json(
            Method::Post,
            "/api/auth/refresh",
            200,
            json!({"token": "fresh-token", "expires_in": 3600}),
        )
        .with_json(
            Method::Get,
            "/api/users/profile",
            200,
            fixture("auth_response.json")["user"].clone(),
        );
    let client = ApiClientBuilder::new()
        .base_url("http://recipes.test")
        .token(Some("existing".into()))
        .rate_limit_ms(0)
        .build_with_transport(mock)
        .unwrap();
    assert!(client.current_user().is_none());

    let refreshed = client.refresh_token().await.unwrap();
    assert_eq!(refreshed.token, "fresh-token");
    assert_eq!(refreshed.expires_in, 3600);
    assert_eq!(refreshed.user.id, 7);
    assert_eq!(client.current_user().map(|u| u.email).as_deref(), Some("cook@example.com"));

    let sent = client.transport().requests();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].bearer_token.as_deref(), Some("existing"));
    assert_eq!(sent[1].url.path(), "/api/users/profile");
    assert_eq!(sent[1].bearer_token.as_deref(), Some("fresh-token"));

    // The user is now cached, so a second refresh skips the profile lookup.
    client.refresh_token().await.unwrap();
    assert_eq!(client.transport().requests().len(), 3);
}

#[tokio::test]
async fn logout_clears_session_without_network() {
    let mock = MockTransport::new().with_json(
        Method::Post,
        "/api/auth/login",
        200,
        fixture("auth_response.json"),
    );
    let client = client(mock);
    client
        .login(&LoginRequest {
            email: "cook@example.com".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
    assert_eq!(client.current_user(), None);
    assert_eq!(client.transport().requests().len(), 1);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let mock = MockTransport::new().with_response(
        Method::Post,
        "/api/auth/login",
        MockResponse::Text(401, "Invalid credentials\n".into()),
    );
    let client = client(mock);

    let err = client
        .login(&LoginRequest {
            email: "cook@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let mock = MockTransport::new().with_response(
        Method::Get,
        "/api/tags",
        MockResponse::Text(200, "<html>oops</html>".into()),
    );

    let err = client(mock).list_tags().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}
