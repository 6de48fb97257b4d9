//! HTTP request handlers

use super::menu::{
    client_listing, MenuCommand, HELP, NOTHING_TO_CANCEL, NO_CLIENTS_TO_SELECT, WELCOME,
};
use super::types::{
    ClientListResponse, ClientResponse, ErrorResponse, MessageRequest, ReplyResponse,
    ReservationListResponse, SuccessResponse,
};
use super::AppState;
use crate::db::{ClientId, ReservationId};
use crate::engine::StartError;
use crate::flow::FlowKind;
use crate::state_machine::Event;
use crate::store::{RecordStore, StoreError};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Conversation
        .route("/api/chats/:chat_id/messages", post(post_message))
        .route("/api/chats/:chat_id/cancel", post(cancel_chat))
        // Records
        .route("/api/clients", get(list_clients))
        .route("/api/clients/:id", get(get_client).delete(delete_client))
        .route("/api/clients/:id/reservations", get(list_reservations))
        .route("/api/reservations/:id", delete(delete_reservation))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

type Reply = (StatusCode, Json<ReplyResponse>);

/// HTTP status for a reply kind
fn status_for(kind: &str) -> StatusCode {
    match kind {
        "validation" | "protocol_mismatch" => StatusCode::UNPROCESSABLE_ENTITY,
        "no_entity" => StatusCode::CONFLICT,
        "store_failure" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

fn reply(response: ReplyResponse) -> Reply {
    (status_for(response.kind), Json(response))
}

// ============================================================
// Conversation
// ============================================================

async fn post_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Reply, AppError> {
    let event = match (req.text, req.button) {
        (Some(text), None) => Event::Text(text),
        (None, Some(button)) => Event::button(button),
        _ => {
            return Err(AppError::BadRequest(
                "exactly one of text or button is required".to_string(),
            ))
        }
    };

    // Menu entries restart or cancel whatever flow is running
    if let Event::Text(text) = &event {
        if let Some(command) = MenuCommand::parse(text) {
            tracing::debug!(%chat_id, ?command, "Menu command");
            return run_command(&state, &chat_id, command).await.map(reply);
        }
    }

    match state.sessions.submit(&chat_id, event).await {
        Some(outcome) => Ok(reply(ReplyResponse::from_outcome(outcome))),
        None => Ok(reply(ReplyResponse::menu("menu", WELCOME))),
    }
}

async fn run_command(
    state: &AppState,
    chat_id: &str,
    command: MenuCommand,
) -> Result<ReplyResponse, AppError> {
    match command {
        MenuCommand::Start => {
            // Back to the main menu ends whatever flow was running
            if state.sessions.cancel(chat_id).await.is_some() {
                tracing::info!(chat_id, "Flow abandoned for main menu");
            }
            Ok(ReplyResponse::menu("menu", WELCOME))
        }
        MenuCommand::Help => Ok(ReplyResponse::menu("info", HELP)),
        MenuCommand::ListClients => {
            let clients = state.store().list_clients().await?;
            Ok(ReplyResponse::menu("info", client_listing(&clients)))
        }
        MenuCommand::AddClient => start_flow(state, chat_id, FlowKind::ClientIntake).await,
        MenuCommand::Reserve => start_flow(state, chat_id, FlowKind::Reservation).await,
        MenuCommand::DeleteClient => start_flow(state, chat_id, FlowKind::ClientRemoval).await,
        MenuCommand::Cancel => Ok(cancel_session(state, chat_id).await),
    }
}

async fn start_flow(
    state: &AppState,
    chat_id: &str,
    flow: FlowKind,
) -> Result<ReplyResponse, AppError> {
    match state.sessions.start(chat_id, flow).await {
        Ok(prompt) => Ok(ReplyResponse::prompt(prompt)),
        Err(StartError::NoEntityAvailable { .. }) => {
            Ok(ReplyResponse::menu("no_entity", NO_CLIENTS_TO_SELECT))
        }
        Err(StartError::Store(e)) => Err(e.into()),
    }
}

async fn cancel_session(state: &AppState, chat_id: &str) -> ReplyResponse {
    match state.sessions.cancel(chat_id).await {
        Some(outcome) => ReplyResponse::from_outcome(outcome),
        None => ReplyResponse::menu("info", NOTHING_TO_CANCEL),
    }
}

async fn cancel_chat(State(state): State<AppState>, Path(chat_id): Path<String>) -> Reply {
    reply(cancel_session(&state, &chat_id).await)
}

// ============================================================
// Records
// ============================================================

async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<ClientListResponse>, AppError> {
    let clients = state.store().list_clients().await?;
    Ok(Json(ClientListResponse { clients }))
}

async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ClientResponse>, AppError> {
    let client = state.store().get_client(ClientId(id)).await?;
    Ok(Json(ClientResponse { client }))
}

async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store().delete_client(ClientId(id)).await?;
    tracing::info!(client_id = id, "Client deleted");
    Ok(Json(SuccessResponse { success: true }))
}

async fn list_reservations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ReservationListResponse>, AppError> {
    let client_id = ClientId(id);
    // Unknown client is a 404, not an empty list
    state.store().get_client(client_id).await?;
    let reservations = state.store().list_reservations_for_client(client_id).await?;
    Ok(Json(ReservationListResponse { reservations }))
}

async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store().delete_reservation(ReservationId(id)).await?;
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(Json(SuccessResponse { success: true }))
}

async fn get_version() -> &'static str {
    concat!("concierge ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Backend(_) => {
                tracing::error!(error = %err, "Store request failed");
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
