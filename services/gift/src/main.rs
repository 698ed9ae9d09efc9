use sea_orm::Database;
use tracing::info;

use giftcode_gift::config::GiftConfig;
use giftcode_gift::infra::mailer::HttpMailer;
use giftcode_gift::router::build_router;
use giftcode_gift::state::AppState;

#[tokio::main]
async fn main() {
    giftcode_core::tracing::init_tracing();

    let config = GiftConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        mailer: HttpMailer::new(config.mailer_url),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.gift_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("gift service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
