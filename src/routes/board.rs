use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::domain::board::PointerRelease;
use crate::dto::api::BoardQuery;
use crate::forms::board::MoveCardForm;
use crate::repository::DieselRepository;
use crate::services::board::{DropOutcome, board_scope, drop_card, load_board};
use crate::services::{ServiceError, products as products_service};

fn board_url(product: Option<i32>) -> String {
    match product {
        Some(product_id) => format!("/board?product={product_id}"),
        None => "/board".to_string(),
    }
}

#[get("/board")]
pub async fn show_board(
    params: web::Query<BoardQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let result = board_scope(params.product)
        .and_then(|scope| load_board(repo.get_ref(), &user, scope))
        .and_then(|board| {
            products_service::load_products_page(repo.get_ref(), &user)
                .map(|data| (board, data.products))
        });

    match result {
        Ok((board, products)) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "board",
                &server_config.auth_service_url,
            );
            context.insert("board", &board);
            context.insert("products", &products);
            context.insert("selected_product", &params.product);

            render_template(&tera, "board/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) | Err(ServiceError::TypeConstraint(_)) => {
            FlashMessage::error("Product not found.").send();
            redirect("/board")
        }
        Err(err) => {
            log::error!("Failed to load board: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/board/move")]
pub async fn move_card(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<MoveCardForm>,
) -> impl Responder {
    let back = board_url(form.product);
    let release = PointerRelease::from(&form);

    let result = board_scope(form.product)
        .and_then(|scope| load_board(repo.get_ref(), &user, scope))
        .and_then(|mut board| drop_card(repo.get_ref(), &user, &mut board, &release));

    match result {
        Ok(DropOutcome::Moved(_)) => {
            FlashMessage::success("Card moved.").send();
            redirect(&back)
        }
        Ok(DropOutcome::Unchanged) | Ok(DropOutcome::Cancelled) => redirect(&back),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::InvalidStage(stage)) => {
            FlashMessage::error(format!("Unknown stage `{stage}`.")).send();
            redirect(&back)
        }
        Err(err) => {
            log::error!("Failed to move card {}: {err}", form.card_id);
            FlashMessage::error("Failed to move the card.").send();
            redirect(&back)
        }
    }
}
