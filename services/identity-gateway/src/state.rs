//! Shared application state handed to every handler (spec §6 surface).

use authz_facade::AuthorizationFacade;
use policy_engine::PolicyPublisher;
use scim_service::{GroupService, UserService};
use token_service::TokenIssuer;

pub struct AppState {
    pub user_service: UserService,
    pub group_service: GroupService,
    pub token_issuer: TokenIssuer,
    pub facade: AuthorizationFacade,
    pub policies: PolicyPublisher,
    pub policies_path: String,
}
