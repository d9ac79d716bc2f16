mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use recipeapp_core::{ApiClient, ApiClientBuilder};

#[derive(Parser)]
#[command(name = "recipeapp")]
#[command(about = "Recipe app client", long_about = None)]
struct Cli {
    /// Server URL (default: $RECIPEAPP_API_URL or http://localhost:8080)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Bearer token (default: $RECIPEAPP_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server answers (unauthenticated)
    Ping,
    /// Browse and manage recipes
    Recipes {
        #[command(subcommand)]
        command: RecipeCommands,
    },
    /// Log in and print the issued token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and print the issued token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Browse ingredients
    Ingredients {
        #[command(subcommand)]
        command: IngredientCommands,
    },
    /// Browse and create tags
    Tags {
        #[command(subcommand)]
        command: TagCommands,
    },
}

#[derive(Subcommand)]
pub enum RecipeCommands {
    /// List recipes, newest first
    List {
        /// Title substring
        #[arg(long)]
        title: Option<String>,
        /// EASY, MEDIUM or HARD
        #[arg(long)]
        difficulty: Option<String>,
        /// Tag name (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    Get {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum IngredientCommands {
    List,
    Search { query: String },
}

#[derive(Subcommand)]
pub enum TagCommands {
    List,
    Create {
        name: String,
        /// Hex color such as #3B82F6 (server default when omitted)
        #[arg(long)]
        color: Option<String>,
    },
}

fn init_telemetry() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn build_client(server: Option<String>, token: Option<String>) -> Result<ApiClient> {
    let mut builder = ApiClientBuilder::new();
    if let Some(server) = server {
        builder = builder.base_url(server);
    }
    if token.is_some() {
        builder = builder.token(token);
    }
    builder.build().context("Failed to configure API client")
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry();

    let cli = Cli::parse();
    let client = build_client(cli.server, cli.token)?;
    tracing::debug!(base_url = client.base_url(), "client ready");

    match cli.command {
        Commands::Ping => commands::ping(&client).await?,
        Commands::Recipes { command } => commands::recipes(&client, command).await?,
        Commands::Login { email, password } => commands::login(&client, email, password).await?,
        Commands::Register {
            email,
            password,
            name,
        } => commands::register(&client, email, password, name).await?,
        Commands::Ingredients { command } => commands::ingredients(&client, command).await?,
        Commands::Tags { command } => commands::tags(&client, command).await?,
    }

    Ok(())
}
