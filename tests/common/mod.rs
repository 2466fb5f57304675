//! Helpers for integration tests.
#![allow(dead_code, unused_macros)]

use std::net::SocketAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use pushkind_categories::domain::identity::ClientIdentity;
use pushkind_categories::domain::types::{BackendUrl, DeviceType, UserName};
use pushkind_categories::repository::HttpRepository;
use serde::Deserialize;
use serde_json::{Value, json};
use tera::Tera;

#[derive(Deserialize)]
struct RunQuery {
    run: String,
}

/// State of the fake category endpoint.
#[derive(Default)]
pub struct BackendState {
    rows: Mutex<Vec<Value>>,
    calls: Mutex<Vec<(String, Value)>>,
    fail: AtomicBool,
    next_id: AtomicU64,
}

impl BackendState {
    fn record(&self, run: &str, body: &Value) {
        self.calls
            .lock()
            .unwrap()
            .push((run.to_string(), body.clone()));
    }

    fn respond(&self, run: &str, body: &Value) -> HttpResponse {
        if self.fail.load(Ordering::SeqCst) {
            return match run {
                "get_all_main_cat" => HttpResponse::InternalServerError().body("boom"),
                _ => HttpResponse::Ok().json(json!({"success": false})),
            };
        }

        match run {
            "get_all_main_cat" => {
                let rows = self.rows.lock().unwrap().clone();
                HttpResponse::Ok().json(json!({"message": rows}))
            }
            "insert_main_catagory" => {
                let id = 100 + self.next_id.fetch_add(1, Ordering::SeqCst);
                self.rows.lock().unwrap().insert(
                    0,
                    json!({
                        "MAIN_CAT_ID": id,
                        "MAIN_CAT_NAME": body["cat_name"],
                        "CREATED_USER": body["username"],
                    }),
                );
                HttpResponse::Ok().json(json!({"success": true, "newCategoryId": id}))
            }
            "update_main_catagory" => {
                let id = body["main_cat_id"].as_str().unwrap_or_default().to_string();
                let mut rows = self.rows.lock().unwrap();
                if body["deleted_flg"] == "D" {
                    rows.retain(|row| row_id(row) != id);
                } else if let Some(row) = rows.iter_mut().find(|row| row_id(row) == id) {
                    row["MAIN_CAT_NAME"] = body["cat_name"].clone();
                    row["LAST_UPD_USER"] = body["username"].clone();
                }
                HttpResponse::Ok().json(json!({"success": true}))
            }
            _ => HttpResponse::BadRequest().finish(),
        }
    }
}

fn row_id(row: &Value) -> String {
    match &row["MAIN_CAT_ID"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn handle(
    query: web::Query<RunQuery>,
    body: web::Json<Value>,
    state: web::Data<BackendState>,
) -> HttpResponse {
    state.record(&query.run, &body);
    state.respond(&query.run, &body)
}

/// Category endpoint served on an ephemeral local port.
pub struct FakeBackend {
    state: web::Data<BackendState>,
    addr: SocketAddr,
}

impl FakeBackend {
    /// Start the endpoint seeded with `rows`. Must run inside an actix system.
    pub fn start(rows: Vec<Value>) -> Self {
        let state = web::Data::new(BackendState {
            rows: Mutex::new(rows),
            ..Default::default()
        });

        let data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/catagory.php", web::post().to(handle))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind fake backend");
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        Self { state, addr }
    }

    pub fn url(&self) -> BackendUrl {
        BackendUrl::new(format!("http://{}/catagory.php", self.addr)).expect("valid url")
    }

    pub fn repository(&self) -> HttpRepository {
        HttpRepository::new(self.url(), Duration::from_secs(5)).expect("client")
    }

    pub fn set_failing(&self, fail: bool) {
        self.state.fail.store(fail, Ordering::SeqCst);
    }

    /// `(run, body)` of every request received so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn runs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(run, _)| run).collect()
    }
}

pub fn row(id: u64, name: &str) -> Value {
    json!({
        "MAIN_CAT_ID": id,
        "MAIN_CAT_NAME": name,
        "CREATED_USER": "anvar",
        "CREATED_TIME": "2024-03-01 10:00:00",
    })
}

pub fn identity() -> ClientIdentity {
    ClientIdentity::new(
        DeviceType::new("web").unwrap(),
        UserName::new("anvar").unwrap(),
    )
}

pub fn tera() -> Tera {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap()
}

/// Full application wired against a [`FakeBackend`], with a fresh page state.
macro_rules! init_app {
    ($backend:expr) => {{
        let key = actix_web::cookie::Key::generate();
        let message_store =
            actix_web_flash_messages::storage::CookieMessageStore::builder(key.clone()).build();
        let message_framework =
            actix_web_flash_messages::FlashMessagesFramework::builder(message_store).build();

        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(message_framework)
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        key,
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .configure(pushkind_categories::routes::configure)
                .app_data(actix_web::web::Data::new($crate::common::identity()))
                .app_data(actix_web::web::Data::new(std::sync::Mutex::new(
                    pushkind_categories::state::page::CategoryPage::new(),
                )))
                .app_data(actix_web::web::Data::new($backend.repository()))
                .app_data(actix_web::web::Data::new($crate::common::tera())),
        )
        .await
    }};
}
