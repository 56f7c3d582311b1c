//! HTTP request handlers

use super::types::{
    Candidate, ChatRequest, ChatResponse, ChatbotRequest, ChatbotResponse, ErrorResponse,
    LeadRequest, RenderRequest, RenderResponse, SessionResponse, SuccessResponse, TurnView,
};
use super::AppState;
use crate::conversation::{
    is_high_intent, ChatTurn, ConversationSummary, LeadData, LeadError, LeadSummary, Role,
    SessionState,
};
use crate::notify::{self, NotifyError};
use crate::store::StoreError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Lead capture and session rehydration
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        // Stored-session chat turn
        .route("/api/sessions/:id/chat", post(send_chat))
        // Stateless Gemini-compatible chat
        .route("/api/chatbot", post(chatbot))
        .route("/api/render", post(render))
        // Sales notification
        .route("/api/lead", post(submit_lead))
        .route("/api/notify/test", post(notify_test))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<LeadData>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let Json(lead) = payload?;
    let lead = lead.validated()?;

    let id = uuid::Uuid::new_v4().to_string();
    let mut session = SessionState::new(id, lead, Utc::now());
    session.push_model(state.profile.greeting);
    state.store.save(&session)?;

    tracing::info!(session = %session.id, lead = %session.lead.email, "Session created");
    Ok((StatusCode::CREATED, Json(session_view(&state, &session))))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = load_session(&state, &id)?;
    Ok(Json(session_view(&state, &session)))
}

async fn send_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(req) = payload?;
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Message text is required".to_string()));
    }

    // Held until the turn is persisted
    let _guard = state
        .busy
        .try_acquire(&id)
        .ok_or_else(|| AppError::Conflict("Session is busy with a previous message".to_string()))?;

    let mut session = load_session(&state, &id)?;

    session.push_user(text);
    let reply = state
        .responder
        .respond(&session.turns, Some(&session.lead))
        .await;
    session.push_model(reply.text.clone());

    let high_intent = is_high_intent(text, state.profile.high_intent_keywords);
    let dispatch = session.should_send_summary(state.profile.summary_triggers)
        && session.summary.claim(Utc::now());

    // The claimed latch is stored before any send is scheduled
    state.store.save(&session)?;

    if dispatch {
        tracing::info!(session = %session.id, "Summary conditions met, scheduling lead summary");
        let summary = LeadSummary::from_session(&session, Utc::now());
        notify::dispatch_summary(state.notifier.clone(), summary, state.summary_delay);
    }

    tracing::debug!(
        session = %session.id,
        source = ?reply.source,
        high_intent,
        "Chat turn complete"
    );

    Ok(Json(ChatResponse {
        html: state.renderer.render(&reply.text),
        reply: reply.text,
        source: reply.source,
        high_intent,
        summary_sent: session.summary.is_sent(),
    }))
}

fn load_session(state: &AppState, id: &str) -> Result<SessionState, AppError> {
    state
        .store
        .load(id)?
        .ok_or_else(|| AppError::NotFound(format!("Session not found: {id}")))
}

fn session_view(state: &AppState, session: &SessionState) -> SessionResponse {
    let turns = session
        .turns
        .iter()
        .map(|turn| TurnView {
            role: turn.role,
            text: turn.text.clone(),
            html: (turn.role == Role::Model).then(|| state.renderer.render(&turn.text)),
        })
        .collect();
    SessionResponse {
        id: session.id.clone(),
        lead: session.lead.clone(),
        turns,
        chat_active: session.chat_active,
        summary_sent: session.summary.is_sent(),
    }
}

// ============================================================
// Stateless chat and rendering
// ============================================================

async fn chatbot(
    State(state): State<AppState>,
    payload: Result<Json<ChatbotRequest>, JsonRejection>,
) -> Result<Json<ChatbotResponse>, AppError> {
    let invalid = || AppError::BadRequest("Datos inválidos".to_string());
    let Json(req) = payload.map_err(|_| invalid())?;
    let history = req.history.ok_or_else(invalid)?;

    let reply = state.responder.respond(&history, req.lead.as_ref()).await;

    let last_user = history
        .iter()
        .rev()
        .find(|t| t.role == Role::User)
        .map_or("", |t| t.text.as_str());

    Ok(Json(ChatbotResponse {
        candidates: vec![Candidate {
            content: ChatTurn::model(reply.text),
        }],
        high_intent: is_high_intent(last_user, state.profile.high_intent_keywords),
    }))
}

async fn render(
    State(state): State<AppState>,
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<RenderResponse>, AppError> {
    let Json(req) = payload?;
    Ok(Json(RenderResponse {
        html: state.renderer.render(&req.text),
    }))
}

// ============================================================
// Notification
// ============================================================

async fn submit_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(req) = payload?;
    let now = Utc::now();
    let summary = LeadSummary {
        lead: req.lead.validated()?,
        conversation: ConversationSummary::empty(now),
        note: req
            .conversation_summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    tracing::info!(lead = %summary.lead.email, notifier = state.notifier.name(), "Direct lead submission");
    state.notifier.notify(&summary).await?;

    Ok(Json(SuccessResponse {
        success: true,
        notifier: state.notifier.name(),
    }))
}

async fn notify_test(State(state): State<AppState>) -> Result<Json<SuccessResponse>, AppError> {
    notify::test_email(state.notifier.as_ref()).await?;
    Ok(Json(SuccessResponse {
        success: true,
        notifier: state.notifier.name(),
    }))
}

// ============================================================
// Version
// ============================================================

async fn get_version() -> &'static str {
    concat!("leadchat ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<LeadError> for AppError {
    fn from(e: LeadError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Session store failure");
        AppError::Internal(e.to_string())
    }
}

impl From<NotifyError> for AppError {
    fn from(e: NotifyError) -> Self {
        tracing::error!(error = %e, "Notification failure");
        AppError::Internal(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
