//! Client directory page and onboarding.

use pushkind_common::domain::auth::AuthenticatedUser;
use validator::Validate;

use crate::domain::client::Client;
use crate::dto::main::{ClientRow, IndexPageData, IndexQuery};
use crate::forms::main::{AddClientForm, AddClientPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

/// Loads one page of the client directory.
pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: IndexQuery,
) -> ServiceResult<IndexPageData>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    let hub_id = user_hub(user)?;

    let page = query.page.unwrap_or(1);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let mut list_query = ClientListQuery::new(hub_id)
        .archived(query.archived)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = &search_query {
        list_query = list_query.search(term.clone());
    }

    let (total, clients) = repo.list_clients(list_query).map_err(|err| {
        log::error!("Failed to list clients: {err}");
        ServiceError::from(err)
    })?;

    let rows = clients.into_iter().map(ClientRow::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(IndexPageData {
        clients: Paginated::new(rows, page, total_pages),
        search_query,
        show_archived: query.archived,
    })
}

/// Onboards a client. The legacy stage starts unrecorded.
pub fn add_client<R>(repo: &R, user: &AuthenticatedUser, form: AddClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    if let Err(err) = form.validate() {
        log::error!("Failed to validate form: {err}");
        return Err(ServiceError::Form("Invalid client form".to_string()));
    }

    let hub_id = user_hub(user)?;
    let new_client = AddClientPayload::try_from(form)?.into_domain(hub_id);

    repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to add a client: {err}");
        ServiceError::from(err)
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin_user, client, viewer_user};

    #[test]
    fn index_lists_active_clients_with_progress() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| {
                query.hub_id.get() == HUB
                    && query.archived == Some(false)
                    && query.search.as_deref() == Some("ali")
            })
            .times(1)
            .returning(|_| {
                Ok((
                    1,
                    vec![client(
                        1,
                        "Alice",
                        Some(crate::domain::stage::ReturnStage::ReturnPreparation),
                    )],
                ))
            });

        let query = IndexQuery {
            search: Some("  ali ".to_string()),
            page: None,
            archived: false,
        };
        let data = load_index_page(&repo, &viewer_user(), query).expect("page");

        assert_eq!(data.search_query.as_deref(), Some("ali"));
        assert_eq!(data.clients.items[0].progress, 44);
        assert_eq!(data.clients.items[0].stage_label, "Preparing Return");
    }

    #[test]
    fn add_client_requires_admin() {
        let mut repo = MockRepository::new();
        repo.expect_create_client().times(0);
        let form = AddClientForm {
            name: "Jane".to_string(),
            email: String::new(),
        };

        let result = add_client(&repo, &viewer_user(), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn add_client_starts_without_stage() {
        let mut repo = MockRepository::new();
        repo.expect_create_client()
            .withf(|new_client| new_client.name.as_str() == "Jane" && new_client.email.is_none())
            .times(1)
            .returning(|_| Ok(client(5, "Jane", None)));
        let form = AddClientForm {
            name: "Jane".to_string(),
            email: String::new(),
        };

        let created = add_client(&repo, &admin_user(), form).expect("created");
        assert_eq!(created.return_stage, None);
        assert_eq!(created.progress_percent(), 0);
    }
}
