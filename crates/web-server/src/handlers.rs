use crate::{AppState, error::AppError};
use analytics::AnalyticsReport;
use axum::{
    Json,
    extract::{
        Path, Query, Request, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_types::{AccountTier, UserProfile, UserTransaction};
use events::{TransactionNotice, WsMessage};
use profile_service::{ProfileDraft, TransactionDraft, TransactionOutcome, UpdateOutcome};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceRangeQuery {
    pub min_balance: Decimal,
    pub max_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AddTransactionResponse {
    pub message: String,
    pub transaction: UserTransaction,
}

/// Middleware guarding the transaction and analytics routes: extracts and
/// validates the bearer token before the handler runs.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.validate_token(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// # POST /api/auth/login
/// Checks the submitted credentials against the configured pair and issues
/// a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let credentials = &state.credentials;
    if request.username != credentials.admin_username
        || request.password != credentials.admin_password
    {
        return Err(AppError::BadRequest("Invalid credentials".to_string()));
    }

    let token = state.tokens.generate_token("1", &request.username)?;
    Ok(Json(LoginResponse {
        token,
        username: request.username,
    }))
}

/// # GET /api/users
pub async fn get_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(state.service.get_all().await?))
}

/// # GET /api/users/:id
pub async fn get_user_by_id(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserProfile>, AppError> {
    let user = state
        .service
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// # POST /api/users
/// Creates a profile and broadcasts `UserCreated` to subscribers.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProfileDraft>,
) -> Result<(StatusCode, Json<UserProfile>), AppError> {
    let created = state.service.add_user(draft).await?;
    let _ = state.events.send(WsMessage::UserCreated(created.clone()));
    Ok((StatusCode::CREATED, Json(created)))
}

/// # PUT /api/users/:id
pub async fn update_user(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProfileDraft>,
) -> Result<Json<UserProfile>, AppError> {
    match state.service.update_user(id, draft).await? {
        UpdateOutcome::Updated(updated) => {
            let _ = state.events.send(WsMessage::UserUpdated(updated.clone()));
            Ok(Json(updated))
        }
        UpdateOutcome::NotFound => Err(AppError::NotFound("User not found".to_string())),
    }
}

/// # DELETE /api/users/:id
pub async fn delete_user(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    if state.service.get_user_by_id(id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    state.service.delete_user(id).await?;
    let _ = state.events.send(WsMessage::UserDeleted(id));
    Ok(StatusCode::NO_CONTENT)
}

/// # GET /api/users/search?name=
pub async fn search_by_name(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    if query.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Search name cannot be empty".to_string(),
        ));
    }
    Ok(Json(state.service.search_by_name(&query.name).await?))
}

/// # GET /api/users/by-tier/:tier
pub async fn get_by_tier(
    Path(tier): Path<AccountTier>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    Ok(Json(state.service.get_by_tier(tier).await?))
}

/// # GET /api/users/by-balance-range?min_balance=&max_balance=
pub async fn get_by_balance_range(
    State(state): State<Arc<AppState>>,
    Query(range): Query<BalanceRangeQuery>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    if range.min_balance < Decimal::ZERO || range.max_balance < range.min_balance {
        return Err(AppError::BadRequest("Invalid balance range".to_string()));
    }
    Ok(Json(
        state
            .service
            .get_by_balance_range(range.min_balance, range.max_balance)
            .await?,
    ))
}

/// # POST /api/transactions/:user_id/add
/// Records a transaction and broadcasts `TransactionAdded` to subscribers.
pub async fn add_transaction(
    Path(user_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TransactionDraft>,
) -> Result<Json<AddTransactionResponse>, AppError> {
    match state.service.add_transaction(user_id, draft).await? {
        TransactionOutcome::Added { user, transaction } => {
            let _ = state
                .events
                .send(WsMessage::TransactionAdded(TransactionNotice {
                    user_name: user.name.clone(),
                    transaction: transaction.clone(),
                }));
            Ok(Json(AddTransactionResponse {
                message: "Transaction added successfully".to_string(),
                transaction,
            }))
        }
        TransactionOutcome::UserNotFound => {
            Err(AppError::NotFound("User not found".to_string()))
        }
    }
}

/// # GET /api/transactions/:user_id
pub async fn get_user_transactions(
    Path(user_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserTransaction>>, AppError> {
    if state.service.get_user_by_id(user_id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(state.service.get_user_transactions(user_id).await?))
}

/// # GET /api/analytics/summary
pub async fn get_analytics_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyticsReport>, AppError> {
    Ok(Json(state.service.get_analytics().await?))
}

/// # GET /ws
/// The WebSocket endpoint. Each client gets its own subscription to the
/// change-event channel.
pub async fn websocket_handler(
    State(state): State<Arc<AppState>>, // State must come before WebSocketUpgrade
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    tracing::info!("[WS] New client connected.");
    let mut events = state.events.subscribe();

    let Ok(connected) = serde_json::to_string(&WsMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(connected)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(message) => {
                    let Ok(payload) = serde_json::to_string(&message) else { continue };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("[WS] Client lagged behind; skipped {} events.", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("[WS] Client disconnected.");
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "[WS] Error.");
                    break;
                }
                // Inbound text/binary/ping frames carry no commands today.
                _ => {}
            },
        }
    }
    tracing::info!("[WS] Connection closed.");
}
