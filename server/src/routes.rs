use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    catalog::{Cake, CakePayload},
    error::AppError,
    matcher::find_best,
    state::AppState,
};

#[derive(Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub source: &'static str,
    pub reply: String,
}

#[derive(Serialize)]
pub struct Confirmation {
    pub message: String,
}

pub async fn list_cakes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Cake>>, AppError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_cake(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Cake>, AppError> {
    Ok(Json(state.store.get(id).await?))
}

pub async fn create_cake(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CakePayload>,
) -> Result<(StatusCode, Json<Cake>), AppError> {
    validate(&payload)?;

    let cake = state.store.create(payload).await?;

    Ok((StatusCode::CREATED, Json(cake)))
}

pub async fn update_cake(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(payload): Json<CakePayload>,
) -> Result<Json<Cake>, AppError> {
    validate(&payload)?;

    Ok(Json(state.store.update(id, payload).await?))
}

pub async fn delete_cake(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Confirmation>, AppError> {
    state.store.delete(id).await?;

    Ok(Json(Confirmation {
        message: format!("Торт {id} удалён"),
    }))
}

fn validate(payload: &CakePayload) -> Result<(), AppError> {
    if payload.name.trim().is_empty() || payload.price < Decimal::ZERO {
        return Err(AppError::InvalidCake);
    }

    Ok(())
}

/// Catalog first, Gemini second. The response says which one answered.
pub async fn chatbot_handler(
    State(state): State<Arc<AppState>>,
    Json(msg): Json<ChatMessage>,
) -> Result<Json<ChatReply>, AppError> {
    let message = msg.message.trim();
    if message.is_empty() {
        return Err(AppError::EmptyMessage);
    }

    let cakes = state.store.list().await?;
    if let Some((cake, score)) = find_best(message, &cakes, state.config.match_strategy) {
        info!(cake = %cake.name, score, "chat query answered from the catalog");

        let description = cake.description.as_deref().unwrap_or("");
        return Ok(Json(ChatReply {
            source: "local",
            reply: format!(
                "Да, есть {}. {}. Цена: {}₸. В наличии: {} шт.",
                cake.name, description, cake.price, cake.stock
            ),
        }));
    }

    let reply = state.ai.ask_short(message, 2).await;

    Ok(Json(ChatReply {
        source: "ai",
        reply,
    }))
}

const INDEX_FALLBACK: &str = "<h3>API работает. Добавьте static/index.html для фронтенда.</h3>";

pub async fn index_handler() -> Html<String> {
    match tokio::fs::read_to_string("static/index.html").await {
        Ok(page) => Html(page),
        Err(_) => Html(INDEX_FALLBACK.to_string()),
    }
}
