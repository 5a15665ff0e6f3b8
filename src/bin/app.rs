use std::net::{Ipv4Addr, SocketAddr};

use adapter::{database::connect_database_with, memory::InMemoryStore};
use anyhow::{Context, Result};
use api::route::v2;
use axum::Router;
use kernel::model::user::event::CreateUser;
use registry::AppRegistry;
use shared::config::{AppConfig, StoreBackend};
use shared::env::{which, Environment};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

async fn build_registry(app_config: &AppConfig) -> Result<AppRegistry> {
    match app_config.store {
        StoreBackend::Postgres => {
            let pool = connect_database_with(&app_config.database);
            Ok(AppRegistry::new(pool))
        }
        StoreBackend::Memory => {
            let registry = AppRegistry::in_memory(InMemoryStore::new());
            // サインアップは扱わないので、起動時に指定されたユーザーを登録しておく
            for email in &app_config.seed.user_emails {
                let user = registry
                    .user_repository()
                    .create(CreateUser::new(email.clone()))
                    .await
                    .with_context(|| format!("failed to seed user {email}"))?;
                tracing::info!(user_id = %user.user_id, email = %user.email, "seeded user");
            }
            Ok(registry)
        }
    }
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    let registry = build_registry(&app_config).await?;

    let app = Router::new()
        .merge(v2::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), app_config.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(store = ?app_config.store, "Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,error.message = %e, "Unexpected error"
            )
        })
}
