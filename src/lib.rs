pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod service;
pub mod settings;
pub mod store;
pub mod validation;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use handlers::{
    book_class, bookings_by_email, create_class, health_check, list_all_classes,
    list_upcoming_classes,
};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::service::BookingService;
use crate::settings::Settings;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub(crate) settings: Settings,
    pub(crate) service: BookingService,
}

impl AppState {
    pub fn new(settings: Settings, store: Store) -> Self {
        Self {
            settings,
            service: BookingService::new(store),
        }
    }

    pub fn store(&self) -> &Store {
        self.service.store()
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = Store::connect(&settings.database_url, settings.max_connections).await?;
    info!("Connected to {}", settings.database_url);

    let state = AppState::new(settings.clone(), store.clone());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("Starting fitness booking API on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    info!("Database pool closed");
    served?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/healthy", get(health_check))
        .route("/classesall", get(list_all_classes))
        .route("/classes", get(list_upcoming_classes).post(create_class))
        .route("/classes/", post(create_class))
        .route("/book", post(book_class))
        .route("/bookings", get(bookings_by_email))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(trace_layer)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
