//! "Needs attention" triage, aggregated at read time.

use pushkind_common::domain::auth::AuthenticatedUser;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::progress::AttentionSignals;
use crate::domain::types::ClientId;
use crate::dto::attention::{AttentionPageData, AttentionRow};
use crate::repository::AttentionReader;
use crate::services::{ServiceResult, ensure_role, user_hub};

/// Signals of one client pulled from the three sibling subsystems.
pub fn client_signals<R>(repo: &R, client_id: ClientId) -> ServiceResult<AttentionSignals>
where
    R: AttentionReader + ?Sized,
{
    Ok(AttentionSignals::new(
        repo.unread_message_count(client_id)?,
        repo.pending_document_count(client_id)?,
        repo.pending_signature_count(client_id)?,
    ))
}

/// Active clients with at least one raised signal.
pub fn load_attention_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<AttentionPageData>
where
    R: AttentionReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let rows = repo
        .list_attention_signals(hub_id)?
        .into_iter()
        .filter(|(_, signals)| signals.needs_attention())
        .map(|(client, signals)| AttentionRow {
            client: client.into(),
            signals,
        })
        .collect();

    Ok(AttentionPageData { rows })
}
