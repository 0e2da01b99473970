mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod structs;
mod utils;

use crate::state::app_state::AppState;
use actix_cors::Cors;
use actix_web::{App, HttpServer, http, middleware::Logger, web};
use dotenv::dotenv;
use env_logger::Env;
use models::consent::ConsentStore;
use routes::init_routes;
use services::guard::OpGate;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    let port_string = env::var("PORT").expect("PORT not set.");
    let port = port_string.parse::<u16>().unwrap();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    // Outbound client for the reachability probe
    let probe_client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error building the probe client: {}", e);
            std::process::exit(1);
        }
    };

    // The consent flag is the only durable state; read it once at startup
    let consent_path = env::var("CONSENT_FILE").unwrap_or_else(|_| String::from("consent.flag"));

    // Create shared state
    let app_state = web::Data::new(AppState {
        consent: ConsentStore::open(consent_path),
        probe_client,
        encode_gate: OpGate::new("encode"),
        scan_gate: OpGate::new("scan"),
    });

    // Start the Actix Web server
    HttpServer::new(move || {
        // Create a logger with a custom format instead
        let logger = Logger::new("%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %D ms");
        // Enable CORS for all origins
        let cors = Cors::default()
            .allowed_origin("http://localhost:5173") // Default Bun dev server port
            .allowed_origin("http://localhost:4173")
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![http::header::ACCEPT])
            .allowed_header(http::header::CONTENT_TYPE)
            .max_age(3600);
        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(init_routes)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
