use serde::Deserialize;
use std::sync::Arc;
use warp::Filter;

use crate::session::SessionSettings;
use game_core::PreferenceStore;

pub mod config;
pub mod session;
pub mod websocket;

#[derive(Debug, Default, Deserialize)]
struct ConnectQuery {
    prefers_light: Option<bool>,
}

pub fn create_routes(
    settings: Arc<SessionSettings>,
    store: Arc<dyn PreferenceStore>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let settings_filter = warp::any().map({
        let settings = settings.clone();
        move || settings.clone()
    });

    let store_filter = warp::any().map({
        let store = store.clone();
        move || store.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(warp::query::<ConnectQuery>())
        .and(settings_filter)
        .and(store_filter)
        .map(
            |ws: warp::ws::Ws,
             query: ConnectQuery,
             settings: Arc<SessionSettings>,
             store: Arc<dyn PreferenceStore>| {
                ws.on_upgrade(move |socket| {
                    websocket::handle_connection(socket, settings, store, query.prefers_light)
                })
            },
        );

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .with(cors)
        .with(warp::log("rps_arena"))
}
