use anyhow::Context;
use axum::{Json, Router, routing::get};
use storage::Database;
use storage::services::feed::LeaderboardFeed;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;

mod config;
mod error;
mod features;
mod middleware;
mod state;

use config::Config;
use features::institutions::InstitutionDirectory;
use middleware::auth::IdentityTokens;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::lifts::handlers::submit_lift,
        features::lifts::handlers::list_own_lifts,
        features::lifts::handlers::update_lift,
        features::lifts::handlers::delete_lift,
        features::users::handlers::get_me,
        features::users::handlers::put_me,
        features::users::handlers::search_users,
        features::users::handlers::lifts_by_display_name,
        features::leaderboard::handlers::global_leaderboard,
        features::leaderboard::handlers::institution_leaderboard,
        features::leaderboard::handlers::global_leaderboard_stream,
        features::leaderboard::handlers::institution_leaderboard_stream,
        features::institutions::handlers::list_institutions,
    ),
    components(
        schemas(
            storage::dto::lift::SubmitLiftRequest,
            storage::dto::lift::UpdateLiftRequest,
            storage::dto::lift::LiftResponse,
            storage::dto::user::UpsertUserRequest,
            storage::dto::user::UserResponse,
            storage::dto::user::UserStatsResponse,
            storage::dto::user::UserSummary,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::models::Gender,
            storage::models::WeightUnit,
        )
    ),
    tags(
        (name = "lifts", description = "Authenticated lift submissions"),
        (name = "users", description = "Profiles and people search"),
        (name = "leaderboard", description = "Ranked leaderboard views"),
        (name = "institutions", description = "Institution directory lookups"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("Identity token")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting leaderboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState {
        feed: LeaderboardFeed::new(db.clone()),
        identities: IdentityTokens::from_comma_separated(&config.identity_tokens),
        institutions: InstitutionDirectory::new(&config.institution_api_url),
        db,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    let app = Router::new()
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .nest("/api/lifts", features::lifts::routes())
        .nest("/api/users", features::users::routes())
        .nest("/api/leaderboard", features::leaderboard::routes())
        .nest("/api/institutions", features::institutions::routes())
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
