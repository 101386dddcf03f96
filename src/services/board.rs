//! Kanban board loading and drag-and-drop orchestration.

use pushkind_common::domain::auth::AuthenticatedUser;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::board::{Board, BoardScope, PendingMove, PointerRelease, resolve_drop_target};
use crate::domain::types::ProductId;
use crate::repository::{
    AdminWriter, ClientEventWriter, ClientListQuery, ClientProductReader, ClientProductWriter,
    ClientReader, ClientWriter, ProductReader,
};
use crate::services::pipeline::{set_product_stage, set_return_stage};
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};

/// Result of a drop that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released outside any card or column.
    Cancelled,
    /// Dropped onto the card's own stage; nothing was sent.
    Unchanged,
    /// The server confirmed the move.
    Moved(PendingMove),
}

/// Scope selected by an optional `product` query parameter.
pub fn board_scope(product: Option<i32>) -> ServiceResult<BoardScope> {
    match product {
        Some(product_id) => Ok(BoardScope::Product(ProductId::new(product_id)?)),
        None => Ok(BoardScope::Returns),
    }
}

/// Authoritative board for `scope`. Archived clients are not shown.
pub fn load_board<R>(repo: &R, user: &AuthenticatedUser, scope: BoardScope) -> ServiceResult<Board>
where
    R: ClientReader + ProductReader + ClientProductReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    match scope {
        BoardScope::Returns => {
            let (_total, clients) =
                repo.list_clients(ClientListQuery::new(hub_id).archived(false))?;
            Ok(Board::for_returns(&clients))
        }
        BoardScope::Product(product_id) => {
            let product = repo
                .get_product_by_id(product_id, hub_id)?
                .ok_or(ServiceError::NotFound)?;
            let items = repo.list_product_cards(product_id, hub_id)?;
            Ok(Board::for_product(&product, &items))
        }
    }
}

/// Applies a drag-and-drop gesture to `board`.
///
/// The card moves in `board` before the transition call is issued, so the
/// caller sees the optimistic state. Exactly one transition call is made for
/// a real move. When that call fails, `board` is replaced by a freshly loaded
/// authoritative board and the error is returned. Failed moves are not
/// retried.
pub fn drop_card<R>(
    repo: &R,
    user: &AuthenticatedUser,
    board: &mut Board,
    release: &PointerRelease,
) -> ServiceResult<DropOutcome>
where
    R: ClientReader
        + ClientWriter
        + ProductReader
        + ClientProductReader
        + ClientProductWriter
        + AdminWriter
        + ClientEventWriter
        + ?Sized,
{
    let Some(target) = resolve_drop_target(board, &release.over) else {
        return Ok(DropOutcome::Cancelled);
    };
    let Some(pending) = board.move_card(release.card_id, &target) else {
        return Ok(DropOutcome::Unchanged);
    };

    let confirmed = match board.scope {
        BoardScope::Returns => {
            set_return_stage(repo, user, pending.card_id, &pending.to).map(|_| ())
        }
        BoardScope::Product(_) => pending
            .to
            .parse::<i32>()
            .map_err(|_| ServiceError::InvalidStage(pending.to.clone()))
            .and_then(|stage_id| set_product_stage(repo, user, pending.card_id, stage_id))
            .map(|_| ()),
    };

    match confirmed {
        Ok(()) => Ok(DropOutcome::Moved(pending)),
        Err(err) => {
            log::warn!(
                "Reverting card {} from {} back to {}: {err}",
                pending.card_id,
                pending.to,
                pending.from
            );
            match load_board(repo, user, board.scope) {
                Ok(fresh) => *board = fresh,
                Err(reload) => log::error!("Failed to reload board after a failed move: {reload}"),
            }
            Err(err)
        }
    }
}
