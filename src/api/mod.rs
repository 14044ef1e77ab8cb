//! homedash REST API
//!
//! HTTP API layer over the [`Dashboard`](crate::dashboard::Dashboard), built with Axum.
//! Callers identify themselves with the `x-user-id` and `x-user-email` headers.
//!
//! # Endpoints
//!
//! ## Users & Chat
//! - `GET /api/v1/users` - Everyone except the caller (`?q=` searches by email)
//! - `GET /api/v1/chat/:other` - Conversation with another user
//! - `POST /api/v1/chat/:other` - Send a message
//!
//! ## Photos
//! - `GET /api/v1/photos` - List photos
//! - `POST /api/v1/photos` - Add photo metadata
//! - `DELETE /api/v1/photos/:id` - Delete a photo
//!
//! ## Shopping
//! - `GET /api/v1/shopping` - Items in priority order
//! - `POST /api/v1/shopping` - Add an item
//! - `DELETE /api/v1/shopping/:id` - Remove an item
//! - `POST /api/v1/shopping/:id/up` - Raise priority
//! - `POST /api/v1/shopping/:id/down` - Lower priority
//!
//! ## Mood
//! - `GET /api/v1/mood` - History and statistics
//! - `GET /api/v1/mood/catalog` - Moods and suggestions
//! - `POST /api/v1/mood` - Record a mood
//!
//! ## Net Worth
//! - `GET /api/v1/networth` - Summary
//! - `POST /api/v1/networth/assets` - Buy an asset
//! - `DELETE /api/v1/networth/assets/:id` - Sell an asset
//! - `POST /api/v1/networth/transactions` - Record a transaction
//!
//! ## Simulations
//! - `GET /api/v1/employees` - Roster and statistics
//! - `POST /api/v1/employees/:id/tasks` - Submit a task
//! - `GET /api/v1/clone` - Clone task board
//! - `POST /api/v1/clone/:id` - Activate a clone task
//!
//! ## Movies
//! - `GET /api/v1/movies` - Favorites
//! - `POST /api/v1/movies` - Add a favorite
//! - `DELETE /api/v1/movies/:id` - Remove a favorite
//! - `PUT /api/v1/movies/:id/rating` - Rate a favorite
//!
//! ## Messaging
//! - `GET /api/v1/sms/carriers` - Carriers and quick templates
//! - `GET /api/v1/sms/history` - Composed gateway messages
//! - `POST /api/v1/sms` - Compose a gateway message
//! - `DELETE /api/v1/sms/history` - Clear composed messages
//! - `GET /api/v1/sms-api/contacts` - Provider contacts
//! - `GET /api/v1/sms-api/threads/:phone` - Provider thread
//! - `POST /api/v1/sms-api/send` - Send through the provider
//! - `POST /api/v1/sms-api/threads/:phone/incoming` - Record a reply
//! - `POST /api/v1/sms-api/contacts/:phone/read` - Mark a thread read
//! - `POST /api/v1/email` - Send an email
//!
//! ## Settings & Data
//! - `GET /api/v1/preferences` - Display preferences
//! - `PUT /api/v1/preferences` - Replace display preferences
//! - `DELETE /api/v1/data` - Clear all stored data
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use homedash::api::{serve, AppState};
//! use homedash::config::ApiConfig;
//! use homedash::dashboard::{Dashboard, DashboardSettings};
//! use homedash::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Arc::new(Dashboard::mount(
//!         Arc::new(MemoryStore::new()),
//!         DashboardSettings::default(),
//!     ));
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(dashboard, config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod identity;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use identity::CurrentUser;
pub use state::AppState;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ApiConfig;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Users & chat
        .route("/users", get(routes::users::list_users))
        .route("/chat/:other", get(routes::chat::get_conversation))
        .route("/chat/:other", post(routes::chat::send_message))
        // Photos
        .route("/photos", get(routes::photos::list_photos))
        .route("/photos", post(routes::photos::add_photo))
        .route("/photos/:id", delete(routes::photos::delete_photo))
        // Shopping
        .route("/shopping", get(routes::shopping::list_items))
        .route("/shopping", post(routes::shopping::add_item))
        .route("/shopping/:id", delete(routes::shopping::remove_item))
        .route("/shopping/:id/up", post(routes::shopping::move_up))
        .route("/shopping/:id/down", post(routes::shopping::move_down))
        // Mood
        .route("/mood", get(routes::mood::get_history))
        .route("/mood", post(routes::mood::record_mood))
        .route("/mood/catalog", get(routes::mood::get_catalog))
        // Net worth
        .route("/networth", get(routes::networth::get_networth))
        .route("/networth/assets", post(routes::networth::add_asset))
        .route("/networth/assets/:id", delete(routes::networth::remove_asset))
        .route("/networth/transactions", post(routes::networth::add_transaction))
        // Simulations
        .route("/employees", get(routes::employees::list_employees))
        .route("/employees/:id/tasks", post(routes::employees::submit_task))
        .route("/clone", get(routes::clone::get_board))
        .route("/clone/:id", post(routes::clone::activate_task))
        // Movies
        .route("/movies", get(routes::movies::list_movies))
        .route("/movies", post(routes::movies::add_movie))
        .route("/movies/:id", delete(routes::movies::remove_movie))
        .route("/movies/:id/rating", put(routes::movies::rate_movie))
        // Carrier gateway SMS
        .route("/sms", post(routes::sms::compose))
        .route("/sms/carriers", get(routes::sms::list_carriers))
        .route("/sms/history", get(routes::sms::get_history))
        .route("/sms/history", delete(routes::sms::clear_history))
        // Provider SMS
        .route("/sms-api/contacts", get(routes::sms_api::list_contacts))
        .route("/sms-api/contacts/:phone/read", post(routes::sms_api::mark_read))
        .route("/sms-api/threads/:phone", get(routes::sms_api::get_thread))
        .route(
            "/sms-api/threads/:phone/incoming",
            post(routes::sms_api::record_incoming),
        )
        .route("/sms-api/send", post(routes::sms_api::send))
        // Email
        .route("/email", post(routes::email::send_email))
        // Settings & data
        .route("/preferences", get(routes::preferences::get_preferences))
        .route("/preferences", put(routes::preferences::put_preferences))
        .route("/data", delete(routes::data::clear_all));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let timeout = state.config.request_timeout();
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("homedash API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("homedash API shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
