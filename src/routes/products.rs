use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::products::{AddProductForm, ProductActiveForm};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, products as products_service};

#[get("/products")]
pub async fn show_products(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_products_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("products", &data.products);

            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match products_service::add_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Product {} added.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to add product: {err}");
            FlashMessage::error("Failed to add the product.").send();
            redirect("/products")
        }
    }
}

#[post("/products/active")]
pub async fn set_product_active(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductActiveForm>,
) -> impl Responder {
    match products_service::set_product_active(repo.get_ref(), &user, form) {
        Ok(product) if product.is_active => {
            FlashMessage::success(format!("{} enabled.", product.name)).send();
            redirect("/products")
        }
        Ok(product) => {
            FlashMessage::success(format!("{} disabled.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to update product: {err}");
            FlashMessage::error("Failed to update the product.").send();
            redirect("/products")
        }
    }
}
