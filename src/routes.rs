use crate::{
    message::{
        self,
        message_dto::{
            AckResponse, ConversationRow, SendMessageRequest, SendMessageResponse,
            UnreadCountResponse,
        },
        message_models::{Message, ThreadMessage},
    },
    middleware::auth_middleware,
    state::AppState,
};
use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        message::message_handlers::send_message,
        message::message_handlers::get_thread,
        message::message_handlers::get_conversations,
        message::message_handlers::get_unread_count,
        message::message_handlers::delete_message,
    ),
    components(
        schemas(
            SendMessageRequest,
            SendMessageResponse,
            Message,
            ThreadMessage,
            ConversationRow,
            UnreadCountResponse,
            AckResponse,
        )
    ),
    tags(
        (name = "messages", description = "Direct messages between buyers and sellers")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Protected routes (auth required)
    let message_routes = Router::new()
        .route("/", axum::routing::post(message::send_message))
        .route("/conversations", get(message::get_conversations))
        .route("/unread", get(message::get_unread_count))
        .route(
            "/:id",
            get(message::get_thread).delete(message::delete_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new().nest("/messages", message_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
