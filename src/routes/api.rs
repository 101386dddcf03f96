//! JSON API used by the board front end and sibling services.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, patch, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::board::PointerRelease;
use crate::dto::api::{
    BoardQuery, ClientsQuery, DropRequest, DropResponse, ErrorResponse, ProductStageUpdate,
    ReturnStageUpdate,
};
use crate::repository::DieselRepository;
use crate::services::board::{DropOutcome, board_scope, drop_card, load_board};
use crate::services::{ServiceError, api as api_service, pipeline};

fn status_of(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::InvalidStage(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
        ServiceError::Persistence(err) if err.is_transient() => StatusCode::SERVICE_UNAVAILABLE,
        ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ServiceError) -> HttpResponse {
    let status = status_of(&err);
    if status.is_server_error() {
        log::error!("API request failed: {err}");
    }
    HttpResponse::build(status).json(ErrorResponse::new(err.to_string()))
}

#[get("/v1/clients")]
pub async fn api_v1_clients(
    params: web::Query<ClientsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::list_clients(repo.get_ref(), &user, params.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => error_response(err),
    }
}

#[get("/v1/board")]
pub async fn api_v1_board(
    params: web::Query<BoardQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match board_scope(params.product).and_then(|scope| load_board(repo.get_ref(), &user, scope)) {
        Ok(board) => HttpResponse::Ok().json(board),
        Err(err) => error_response(err),
    }
}

#[get("/v1/products/{product_id}/stages")]
pub async fn api_v1_product_stages(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match pipeline::list_product_stages(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(stages) => HttpResponse::Ok().json(stages),
        Err(err) => error_response(err),
    }
}

#[patch("/v1/clients/{client_id}/stage")]
pub async fn api_v1_set_return_stage(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<ReturnStageUpdate>,
) -> impl Responder {
    match pipeline::set_return_stage(repo.get_ref(), &user, client_id.into_inner(), &body.stage) {
        Ok(client) => HttpResponse::Ok().json(client),
        Err(err) => error_response(err),
    }
}

#[patch("/v1/client-products/{client_product_id}/stage")]
pub async fn api_v1_set_product_stage(
    client_product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<ProductStageUpdate>,
) -> impl Responder {
    match pipeline::set_product_stage(
        repo.get_ref(),
        &user,
        client_product_id.into_inner(),
        body.stage_id,
    ) {
        Ok(item) => HttpResponse::Ok().json(item),
        Err(err) => error_response(err),
    }
}

/// Applies a drop and answers with the board the client should render:
/// the moved board on success, the re-fetched one on failure.
#[post("/v1/board/drop")]
pub async fn api_v1_board_drop(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(body): web::Json<DropRequest>,
) -> impl Responder {
    let mut board = match board_scope(body.product)
        .and_then(|scope| load_board(repo.get_ref(), &user, scope))
    {
        Ok(board) => board,
        Err(err) => return error_response(err),
    };
    let release = PointerRelease {
        card_id: body.card_id,
        over: body.over,
    };

    match drop_card(repo.get_ref(), &user, &mut board, &release) {
        Ok(outcome) => HttpResponse::Ok().json(DropResponse {
            moved: matches!(outcome, DropOutcome::Moved(_)),
            board,
        }),
        Err(err) => {
            let status = status_of(&err);
            if status.is_server_error() {
                log::error!("Failed to apply drop of card {}: {err}", release.card_id);
            }
            HttpResponse::build(status).json(ErrorResponse {
                error: err.to_string(),
                board: Some(board),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::errors::RepositoryError;

    #[test]
    fn service_errors_map_to_status_codes() {
        assert_eq!(status_of(&ServiceError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(&ServiceError::InvalidStage("bogus".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(&ServiceError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(&ServiceError::Persistence(RepositoryError::Busy(
                "database is locked".into()
            ))),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(&ServiceError::Persistence(RepositoryError::InvalidRow(
                "unknown stage".into()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
