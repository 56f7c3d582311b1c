//! leadchat - lead-capture chat assistant backend
//!
//! Serves the chat widget: captures visitor contact details, answers with a
//! Gemini model backed by keyword rules, renders replies to safe HTML and
//! forwards qualified leads to sales.

mod api;
mod config;
mod conversation;
mod llm;
mod notify;
mod profile;
mod render;
mod responder;
mod store;

use api::{create_router, AppState};
use axum::http::{header, Method};
use config::{AppConfig, NotifierConfig};
use llm::{GeminiService, LlmService, LoggingService};
use notify::{LeadNotifier, NoopNotifier, SmtpNotifier, Web3FormsNotifier};
use render::Renderer;
use responder::Responder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use store::{MemorySessionStore, SessionStore, SqliteSessionStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadchat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    let profile = config.profile;
    tracing::info!(profile = profile.key, business = profile.business_name, "Profile loaded");

    // Session store
    let store: Arc<dyn SessionStore> = if config.uses_memory_store() {
        tracing::warn!("Using in-memory session store; sessions are lost on restart");
        Arc::new(MemorySessionStore::new())
    } else {
        tracing::info!(path = %config.db_path.display(), "Opening session store");
        Arc::new(SqliteSessionStore::open(&config.db_path)?)
    };

    // Model
    let llm: Option<Arc<dyn LlmService>> = match &config.gemini {
        Some(gemini) => {
            let service =
                GeminiService::new(gemini.api_key.clone(), &gemini.model, gemini.gateway.as_deref())?;
            tracing::info!(
                model = %gemini.model,
                gateway = gemini.gateway.is_some(),
                "Gemini model configured"
            );
            Some(Arc::new(LoggingService::new(Arc::new(service))))
        }
        None => {
            tracing::warn!("No GEMINI_API_KEY or LLM_GATEWAY set; answering from rules only");
            None
        }
    };

    // Lead notifier
    let notifier: Arc<dyn LeadNotifier> = match config.notifier.clone() {
        NotifierConfig::Smtp(smtp) => Arc::new(SmtpNotifier::new(smtp, profile)),
        NotifierConfig::Web3Forms { access_key } => {
            Arc::new(Web3FormsNotifier::new(access_key, profile)?)
        }
        NotifierConfig::None => {
            tracing::warn!("No SMTP or Web3Forms settings; lead summaries will only be logged");
            Arc::new(NoopNotifier)
        }
    };
    tracing::info!(notifier = notifier.name(), "Lead notifier ready");

    let responder = Responder::new(profile, llm)?;
    tracing::info!(
        model_backed = responder.has_model(),
        rules_first = profile.rules_first,
        "Responder ready"
    );

    // Create application state
    let state = AppState::new(
        store,
        responder,
        Renderer::new(&profile.render_config())?,
        notifier,
        profile,
        config.summary_delay,
    );

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("leadchat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
