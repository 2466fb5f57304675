use std::sync::Mutex;

use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use pushkind_categories::models::config::ServerConfig;
use pushkind_categories::repository::HttpRepository;
use pushkind_categories::routes::configure;
use pushkind_categories::state::page::CategoryPage;

const CONFIG_PATH_VAR: &str = "CATEGORIES_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/default.yaml";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config_path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let server_config = match ServerConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration from {config_path}: {e}");
            std::process::exit(1);
        }
    };

    let repo = match HttpRepository::new(
        server_config.backend_url.clone(),
        server_config.request_timeout(),
    ) {
        Ok(repo) => repo,
        Err(e) => {
            log::error!("Failed to build backend client: {e}");
            std::process::exit(1);
        }
    };

    let tera = match Tera::new(&server_config.templates_dir) {
        Ok(tera) => tera,
        Err(e) => {
            log::error!("Failed to parse templates: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &server_config.secret_key {
        Some(secret) => Key::from(secret.as_bytes()),
        None => {
            log::warn!("No secret_key configured, sessions will not survive a restart");
            Key::generate()
        }
    };

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let identity = web::Data::new(server_config.identity());
    let page = web::Data::new(Mutex::new(CategoryPage::new()));
    let repo = web::Data::new(repo);
    let tera = web::Data::new(tera);
    let assets_dir = server_config.assets_dir.clone();
    let bind_address = (server_config.bind_address.clone(), server_config.port);

    log::info!(
        "Starting categories service on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", &assets_dir))
            .configure(configure)
            .app_data(identity.clone())
            .app_data(page.clone())
            .app_data(repo.clone())
            .app_data(tera.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
