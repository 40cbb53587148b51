use actix_web::{web, HttpResponse, Responder};

use crate::models::{ConversationQuery, SendMessageRequest, UserQuery};
use crate::routes::{engine_error_response, error_body, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/chats/list", web::get().to(list_chats))
        .route("/chats/messages", web::get().to(get_messages))
        .route("/chats/send", web::post().to(send_message));
}

/// Profiles of every mutual match
///
/// GET /api/v1/chats/list?user_id={user_id}
async fn list_chats(state: web::Data<AppState>, query: web::Query<UserQuery>) -> impl Responder {
    match state.engine.list_match_peers(&query.user_id).await {
        Ok(peers) => HttpResponse::Ok().json(peers),
        Err(e) => engine_error_response(&e),
    }
}

/// Conversation history, oldest first
///
/// GET /api/v1/chats/messages?user_id={user_id}&peer_id={peer_id}&limit={limit}
async fn get_messages(
    state: web::Data<AppState>,
    query: web::Query<ConversationQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(state.chat.default_message_limit);

    match state
        .engine
        .get_conversation(&query.user_id, &query.peer_id, limit)
        .await
    {
        Ok(messages) => HttpResponse::Ok().json(messages),
        Err(e) => engine_error_response(&e),
    }
}

/// POST /api/v1/chats/send
async fn send_message(
    state: web::Data<AppState>,
    req: web::Json<SendMessageRequest>,
) -> impl Responder {
    if state.chat.require_match_to_send {
        match state.engine.is_match(&req.user_id, &req.peer_id).await {
            Ok(true) => {}
            Ok(false) => {
                return HttpResponse::Forbidden().json(error_body(
                    403,
                    "Not matched",
                    "Messages can only be sent to matched users",
                ));
            }
            Err(e) => return engine_error_response(&e),
        }
    }

    match state
        .engine
        .send_message(&req.user_id, &req.peer_id, &req.text)
        .await
    {
        Ok(message) => HttpResponse::Ok().json(message),
        Err(e) => engine_error_response(&e),
    }
}
