pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
}

pub fn create_app(state: AppState) -> Router {
    // /account/all sits behind the server-side role gate; everything else
    // keeps the original open, path-parameter contract.
    let listing = Router::new()
        .route("/account/all", get(handlers::accounts::all_accounts))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::listing_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/account/create/:username/:email/:password/:role/:deposit",
            get(handlers::accounts::create),
        )
        .route(
            "/account/delete/:username/:email/:password",
            get(handlers::accounts::delete),
        )
        .route("/account/login/:email/:password", get(handlers::accounts::login))
        .route("/account/deposit/:email/:amount", get(handlers::accounts::deposit))
        .route("/account/withdraw/:email/:amount", get(handlers::accounts::withdraw))
        .route(
            "/account/sendMoney/:email/:amount/:receiver",
            get(handlers::accounts::send_money),
        )
        .route("/account/balance/:email", get(handlers::accounts::balance))
        .route(
            "/account/transactions/:email",
            get(handlers::accounts::transactions),
        )
        .merge(listing)
        .layer(axum_middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
