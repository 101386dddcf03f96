use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;
use validator::Validate;

use crate::forms::client::{
    ArchiveClientForm, AssignProductForm, SetProductStageForm, SetStageForm,
};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, client as client_service, pipeline};

fn client_url(client_id: i32) -> String {
    format!("/client/{client_id}")
}

#[get("/client/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_service::load_client_page(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "index",
                &server_config.auth_service_url,
            );
            context.insert("client", &data.client);
            context.insert("stages", &data.stages);
            context.insert("products", &data.products);
            context.insert("available_products", &data.available_products);
            context.insert("signals", &data.signals);
            context.insert("needs_attention", &data.signals.needs_attention());
            context.insert("events", &data.events);
            context.insert("total_events", &data.total_events);

            render_template(&tera, "client/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to render client page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/client/stage")]
pub async fn set_client_stage(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SetStageForm>,
) -> impl Responder {
    let back = client_url(form.client_id);

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        FlashMessage::error("Choose a stage.").send();
        return redirect(&back);
    }

    match pipeline::set_return_stage(repo.get_ref(), &user, form.client_id, &form.stage) {
        Ok(client) => {
            FlashMessage::success(format!("Moved to {}.", client.current_stage().label())).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(ServiceError::InvalidStage(stage)) => {
            FlashMessage::error(format!("Unknown stage `{stage}`.")).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to set client stage: {err}");
            FlashMessage::error("Failed to update the stage.").send();
            redirect(&back)
        }
    }
}

#[post("/client/archive")]
pub async fn archive_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ArchiveClientForm>,
) -> impl Responder {
    let back = client_url(form.client_id);

    match client_service::archive_client(repo.get_ref(), &user, form) {
        Ok(client) if client.archived => {
            FlashMessage::success("Client archived.").send();
            redirect(&back)
        }
        Ok(_) => {
            FlashMessage::success("Client restored.").send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to archive client: {err}");
            FlashMessage::error("Failed to update the client.").send();
            redirect(&back)
        }
    }
}

#[post("/client/product")]
pub async fn assign_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AssignProductForm>,
) -> impl Responder {
    let back = client_url(form.client_id);

    match client_service::assign_product(repo.get_ref(), &user, form) {
        Ok(item) => {
            FlashMessage::success(format!("{} assigned.", item.name)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Client or product not found.").send();
            redirect(&back)
        }
        Err(ServiceError::Form(message)) | Err(ServiceError::TypeConstraint(message)) => {
            FlashMessage::error(message).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to assign product: {err}");
            FlashMessage::error("Failed to assign the product.").send();
            redirect(&back)
        }
    }
}

#[post("/client-product/stage")]
pub async fn set_client_product_stage(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SetProductStageForm>,
) -> impl Responder {
    let back = client_url(form.client_id);

    match pipeline::set_product_stage(
        repo.get_ref(),
        &user,
        form.client_product_id,
        form.stage_id,
    ) {
        Ok(item) => {
            FlashMessage::success(format!("{} updated.", item.name)).send();
            redirect(&back)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect(&back)
        }
        Err(ServiceError::InvalidStage(_)) => {
            FlashMessage::error("That stage does not belong to this product.").send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to set client product stage: {err}");
            FlashMessage::error("Failed to update the stage.").send();
            redirect(&back)
        }
    }
}
