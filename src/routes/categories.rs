use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::identity::ClientIdentity;
use crate::dto::categories::{CategoriesView, FormDto};
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, DeleteCategoryForm, DeleteCategoryFormError,
    UpdateCategoryForm,
};
use crate::repository::HttpRepository;
use crate::routes::{base_context, load_form, redirect, render_template, store_form};
use crate::services::ServiceError;
use crate::services::categories::{
    add_category as add_category_service, category_for_delete as category_for_delete_service,
    delete_category as delete_category_service, select_category as select_category_service,
    show_categories as show_categories_service, update_category as update_category_service,
};
use crate::state::form::FormTarget;
use crate::state::page::SharedPage;

const CATEGORIES_URL: &str = "/categories";
const NOT_FOUND_MESSAGE: &str = "Category not found.";

#[get("/categories")]
pub async fn show_categories(
    session: Session,
    flash_messages: IncomingFlashMessages,
    identity: web::Data<ClientIdentity>,
    page: web::Data<SharedPage>,
    repo: web::Data<HttpRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut form = load_form(&session);
    let result =
        show_categories_service(identity.get_ref(), page.get_ref(), &mut form, repo.get_ref())
            .await;
    store_form(&session, &form);

    let mut context = base_context(&flash_messages, "categories");
    match result {
        Ok(CategoriesView::Ready(categories)) => {
            context.insert("categories", &categories);
            context.insert("form", &FormDto::from(&form));
            render_template(&tera, "categories/index.html", &context)
        }
        Ok(CategoriesView::Loading) => render_template(&tera, "categories/loading.html", &context),
        Ok(CategoriesView::Failed(message)) => {
            context.insert("error", &message);
            render_template(&tera, "categories/error.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render categories page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categories")]
pub async fn add_category(
    session: Session,
    identity: web::Data<ClientIdentity>,
    page: web::Data<SharedPage>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let mut state = load_form(&session);
    state.set_new_name(form.name.clone());

    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            state.fail(FormTarget::Create, e.to_string());
            store_form(&session, &state);
            return redirect(CATEGORIES_URL);
        }
    };

    match add_category_service(
        payload,
        identity.get_ref(),
        page.get_ref(),
        &mut state,
        repo.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Category added.").send(),
        Ok(false) => {}
        Err(err) => {
            log::error!("Failed to add category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    store_form(&session, &state);
    redirect(CATEGORIES_URL)
}

#[get("/categories/{category_id}/edit")]
pub async fn select_category(
    category_id: web::Path<String>,
    session: Session,
    page: web::Data<SharedPage>,
) -> impl Responder {
    let mut state = load_form(&session);

    match select_category_service(category_id.into_inner(), page.get_ref(), &mut state) {
        Ok(()) => {}
        Err(ServiceError::NotFound | ServiceError::Form(_)) => {
            FlashMessage::error(NOT_FOUND_MESSAGE).send()
        }
        Err(err) => {
            log::error!("Failed to select category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    store_form(&session, &state);
    redirect(CATEGORIES_URL)
}

#[post("/categories/update")]
pub async fn update_category(
    session: Session,
    identity: web::Data<ClientIdentity>,
    page: web::Data<SharedPage>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<UpdateCategoryForm>,
) -> impl Responder {
    let mut state = load_form(&session);
    state.set_draft(form.name.clone());

    let payload = match form.into_payload(state.selected_id()) {
        Ok(payload) => payload,
        Err(e) => {
            // Without a selection the edit form is hidden, so surface the
            // message beneath the create form instead.
            let target = if state.selected_id().is_some() {
                FormTarget::Edit
            } else {
                FormTarget::Create
            };
            state.fail(target, e.to_string());
            store_form(&session, &state);
            return redirect(CATEGORIES_URL);
        }
    };

    match update_category_service(
        payload,
        identity.get_ref(),
        page.get_ref(),
        &mut state,
        repo.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Category updated.").send(),
        Ok(false) => {}
        Err(ServiceError::NotFound) => FlashMessage::error(NOT_FOUND_MESSAGE).send(),
        Err(err) => {
            log::error!("Failed to update category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    store_form(&session, &state);
    redirect(CATEGORIES_URL)
}

/// Blocking confirmation step; declining simply navigates back.
#[get("/categories/{category_id}/delete")]
pub async fn confirm_delete_category(
    category_id: web::Path<String>,
    flash_messages: IncomingFlashMessages,
    page: web::Data<SharedPage>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match category_for_delete_service(category_id.into_inner(), page.get_ref()) {
        Ok(category) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("category", &category);
            render_template(&tera, "categories/confirm_delete.html", &context)
        }
        Err(ServiceError::NotFound | ServiceError::Form(_)) => {
            FlashMessage::error(NOT_FOUND_MESSAGE).send();
            redirect(CATEGORIES_URL)
        }
        Err(err) => {
            log::error!("Failed to render delete confirmation: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<String>,
    session: Session,
    identity: web::Data<ClientIdentity>,
    page: web::Data<SharedPage>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<DeleteCategoryForm>,
) -> impl Responder {
    let payload = match form.into_payload(category_id.into_inner()) {
        Ok(payload) => payload,
        Err(DeleteCategoryFormError::NotConfirmed) => return redirect(CATEGORIES_URL),
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect(CATEGORIES_URL);
        }
    };

    let mut state = load_form(&session);
    match delete_category_service(
        payload,
        identity.get_ref(),
        page.get_ref(),
        &mut state,
        repo.get_ref(),
    )
    .await
    {
        Ok(true) => FlashMessage::success("Category deleted.").send(),
        Ok(false) => {}
        Err(ServiceError::NotFound) => FlashMessage::error(NOT_FOUND_MESSAGE).send(),
        Err(err) => {
            log::error!("Failed to delete category: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }

    store_form(&session, &state);
    redirect(CATEGORIES_URL)
}
