use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use giftcode_core::health::{healthz, readyz};
use giftcode_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{ban_code, generate_codes, list_codes, purge_banned, search_codes},
    chat::{list_messages, post_message, subscribe},
    code::{activate_code, link_code, ship_code, update_memos},
    recipient::{complete_code, submit_shipping, verify_code},
    shop::{
        create_product, create_shop, delete_product, get_my_shops, list_shop_codes, stop_product,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Admin
        .route("/admin/codes", post(generate_codes))
        .route("/admin/codes", get(list_codes))
        .route("/admin/codes/search", get(search_codes))
        .route("/admin/codes/{id}/ban", post(ban_code))
        .route("/admin/codes/banned", delete(purge_banned))
        // Shops & products
        .route("/shops", post(create_shop))
        .route("/shops/@me", get(get_my_shops))
        .route("/shops/{shop_id}/products", post(create_product))
        .route("/products/{id}/stop", post(stop_product))
        .route("/products/{id}", delete(delete_product))
        .route("/shops/{shop_id}/codes", get(list_shop_codes))
        // Shop-side code lifecycle
        .route("/codes/{id}/link", post(link_code))
        .route("/codes/{id}/activate", post(activate_code))
        .route("/codes/{id}/memos", patch(update_memos))
        .route("/codes/{id}/ship", post(ship_code))
        // Recipient
        .route("/codes/{id}/verify", post(verify_code))
        .route("/codes/{id}/shipping", post(submit_shipping))
        .route("/codes/{id}/complete", post(complete_code))
        // Chat
        .route("/codes/{id}/messages/list", post(list_messages))
        .route("/codes/{id}/messages", post(post_message))
        .route("/codes/{id}/subscriptions", post(subscribe))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
