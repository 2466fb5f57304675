use actix_session::Session;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::state::form::FormController;

pub mod categories;
pub mod main;

/// Session key holding the serialized [`FormController`].
pub const FORM_SESSION_KEY: &str = "category_form";

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::index)
        .service(categories::show_categories)
        .service(categories::add_category)
        .service(categories::select_category)
        .service(categories::update_category)
        .service(categories::confirm_delete_category)
        .service(categories::delete_category);
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn alert_level_to_str(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Form state of the current browser session; a fresh one when absent or
/// unreadable.
pub fn load_form(session: &Session) -> FormController {
    match session.get::<FormController>(FORM_SESSION_KEY) {
        Ok(form) => form.unwrap_or_default(),
        Err(e) => {
            log::warn!("Discarding unreadable form state: {e}");
            FormController::default()
        }
    }
}

pub fn store_form(session: &Session, form: &FormController) {
    if let Err(e) = session.insert(FORM_SESSION_KEY, form) {
        log::error!("Failed to store form state: {e}");
    }
}
