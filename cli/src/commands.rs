use crate::{IngredientCommands, RecipeCommands, TagCommands};
use anyhow::{Context, Result};
use recipeapp_core::{
    ApiClient, AuthApi, Difficulty, IngredientApi, LoginRequest, RecipeApi, RecipeFilter,
    RegisterRequest, TagApi,
};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", out);
    Ok(())
}

pub async fn ping(client: &ApiClient) -> Result<()> {
    // The recipe listing is the one route open to anonymous callers.
    let filter = RecipeFilter::new().with_page(1, 0);
    client
        .list_recipes(&filter)
        .await
        .with_context(|| format!("Server at {} did not answer", client.base_url()))?;
    println!("ok");
    Ok(())
}

pub async fn recipes(client: &ApiClient, command: RecipeCommands) -> Result<()> {
    match command {
        RecipeCommands::List {
            title,
            difficulty,
            tags,
            limit,
            offset,
        } => {
            let mut filter = RecipeFilter::new().with_page(limit, offset);
            if let Some(title) = title {
                filter = filter.with_title(title);
            }
            if let Some(difficulty) = difficulty {
                let difficulty: Difficulty = difficulty.parse()?;
                filter = filter.with_difficulty(difficulty);
            }
            for tag in tags {
                filter = filter.with_tag(tag);
            }

            let recipes = client.list_recipes(&filter).await?;
            print_json(&recipes)
        }
        RecipeCommands::Get { id } => {
            let recipe = client
                .get_recipe(id)
                .await
                .with_context(|| format!("Failed to fetch recipe {}", id))?;
            print_json(&recipe)
        }
        RecipeCommands::Delete { id } => {
            client
                .delete_recipe(id)
                .await
                .with_context(|| format!("Failed to delete recipe {}", id))?;
            println!("Deleted recipe {}", id);
            Ok(())
        }
    }
}

pub async fn login(client: &ApiClient, email: String, password: String) -> Result<()> {
    let auth = client
        .login(&LoginRequest { email, password })
        .await
        .context("Login failed")?;
    print_json(&auth)
}

pub async fn register(
    client: &ApiClient,
    email: String,
    password: String,
    name: String,
) -> Result<()> {
    let auth = client
        .register(&RegisterRequest {
            email,
            password,
            name,
        })
        .await
        .context("Registration failed")?;
    print_json(&auth)
}

pub async fn ingredients(client: &ApiClient, command: IngredientCommands) -> Result<()> {
    let ingredients = match command {
        IngredientCommands::List => client.list_ingredients().await?,
        IngredientCommands::Search { query } => client.search_ingredients(&query).await?,
    };
    print_json(&ingredients)
}

pub async fn tags(client: &ApiClient, command: TagCommands) -> Result<()> {
    match command {
        TagCommands::List => print_json(&client.list_tags().await?),
        TagCommands::Create { name, color } => {
            let tag = client
                .create_tag(&name, color.as_deref())
                .await
                .with_context(|| format!("Failed to create tag {:?}", name))?;
            print_json(&tag)
        }
    }
}
