use pushkind_common::domain::auth::AuthenticatedUser;

use crate::SERVICE_ACCESS_ROLE;
use crate::dto::api::{ClientsQuery, ClientsResponse};
use crate::dto::main::ClientRow;
use crate::pagination::DEFAULT_ITEMS_PER_PAGE;
use crate::repository::{ClientListQuery, ClientReader};
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};

/// Returns the filtered list of clients visible to the authenticated user,
/// each with its legacy stage and progress.
pub fn list_clients<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: ClientsQuery,
) -> ServiceResult<ClientsResponse>
where
    R: ClientReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let mut query = ClientListQuery::new(user_hub(user)?);

    if let Some(page) = params.page {
        query = query.paginate(page, DEFAULT_ITEMS_PER_PAGE);
    }

    if let Some(archived) = params.archived {
        query = query.archived(archived);
    }

    if let Some(term) = params
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        query = query.search(term);
    }

    let (total, clients) = repo.list_clients(query).map_err(ServiceError::from)?;

    Ok(ClientsResponse {
        total,
        clients: clients.into_iter().map(ClientRow::from).collect(),
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::stage::ReturnStage;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{client, user_with_roles, viewer_user};

    #[test]
    fn lists_every_client_without_filters() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| {
                query.archived.is_none() && query.search.is_none() && query.pagination.is_none()
            })
            .returning(|_| {
                Ok((
                    2,
                    vec![
                        client(1, "Alice", None),
                        client(2, "Bob", Some(ReturnStage::Filed)),
                    ],
                ))
            });

        let response =
            list_clients(&repo, &viewer_user(), ClientsQuery::default()).expect("clients");

        assert_eq!(response.total, 2);
        assert_eq!(response.clients[0].stage, ReturnStage::NotStarted);
        assert!(response.clients[1].complete);
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| query.search.is_none() && query.archived == Some(true))
            .returning(|_| Ok((0, Vec::new())));

        let params = ClientsQuery {
            search: Some("   ".to_string()),
            page: None,
            archived: Some(true),
        };
        assert!(list_clients(&repo, &viewer_user(), params).is_ok());
    }

    #[test]
    fn requires_portal_role() {
        let repo = MockRepository::new();
        let result = list_clients(&repo, &user_with_roles(&["billing"]), ClientsQuery::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
