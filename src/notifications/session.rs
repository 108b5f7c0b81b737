use actix_web::{HttpRequest, HttpResponse, web};
use actix_ws::Message;
use futures_util::StreamExt;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::jwks::JwksCache;
use crate::auth::jwt;
use crate::db::users::find_or_create_from_claims;
use crate::error::ApiError;
use crate::notifications::events::Notification;
use crate::notifications::hub::NotificationHub;

/// Query params for the WebSocket handshake endpoint.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    pub token: String,
}

/// GET /api/notifications/ws?token=<jwt>
///
/// Upgrades the HTTP connection to a WebSocket and subscribes the caller to
/// their own notification stream. Authenticates via query param token
/// (browsers can't send Authorization headers during the handshake).
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<WsQuery>,
    db: web::Data<DatabaseConnection>,
    jwks_cache: web::Data<Arc<JwksCache>>,
    hub: web::Data<Arc<NotificationHub>>,
) -> Result<HttpResponse, actix_web::Error> {
    // 1. Validate the JWT and resolve the local user.
    let claims = jwt::validate_token(&query.token, jwks_cache.get_ref())
        .await
        .map_err(|e| ApiError::Unauthenticated(format!("Invalid token: {e}")))?;

    let external_id = claims.external_id().map_err(ApiError::Unauthenticated)?;
    let email = claims
        .user_email()
        .ok_or_else(|| ApiError::Unauthenticated("No email in token claims".into()))?;

    let user = find_or_create_from_claims(db.get_ref(), external_id, &claims, email)
        .await
        .map_err(ApiError::Database)?;

    // 2. Upgrade to WebSocket.
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    // 3. Subscribe and spawn the session task.
    let (connection_id, rx) = hub.subscribe(user.id).await;
    tracing::debug!(user_id = %user.id, %connection_id, "notification channel opened");

    let hub_clone = hub.get_ref().clone();
    actix_web::rt::spawn(handle_ws_session(
        session,
        msg_stream,
        rx,
        user.id,
        connection_id,
        hub_clone,
    ));

    Ok(response)
}

/// Drives the WebSocket session: forwards notifications from the hub to the
/// client, answers pings, and unsubscribes on disconnect. The channel is
/// push-only — client text frames are ignored.
async fn handle_ws_session(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    mut rx: mpsc::UnboundedReceiver<Notification>,
    user_id: Uuid,
    connection_id: Uuid,
    hub: Arc<NotificationHub>,
) {
    loop {
        tokio::select! {
            Some(msg) = msg_stream.next() => {
                match msg {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Err(_) => {
                        break;
                    }
                    _ => {}
                }
            }
            Some(notification) = rx.recv() => {
                let json = match serde_json::to_string(&notification) {
                    Ok(j) => j,
                    Err(_) => continue,
                };
                if session.text(json).await.is_err() {
                    break;
                }
            }
            // Both channels closed — exit.
            else => break,
        }
    }

    hub.unsubscribe(user_id, connection_id).await;
    tracing::debug!(%user_id, %connection_id, "notification channel closed");
    let _ = session.close(None).await;
}
