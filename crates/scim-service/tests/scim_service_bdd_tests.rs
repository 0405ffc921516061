//! BDD tests for SCIM user provisioning.

use cucumber::{given, then, when, World};
use identity_core::error::IdentityError;
use record_store::UserStore;
use scim_service::{CreateUserRequest, UserService};
use std::sync::Arc;

fn create_request(user_name: &str) -> CreateUserRequest {
    CreateUserRequest {
        user_name: user_name.to_string(),
        given_name: None,
        family_name: None,
        formatted_name: None,
        active: true,
        emails: vec![],
        department: None,
        risk_score: 0,
        password: None,
    }
}

#[derive(World)]
#[world(init = Self::new)]
struct ScimWorld {
    service: UserService,
    last_error: Option<IdentityError>,
}

impl std::fmt::Debug for ScimWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScimWorld").finish()
    }
}

impl ScimWorld {
    fn new() -> Self {
        Self {
            service: UserService::new(Arc::new(UserStore::new())),
            last_error: None,
        }
    }
}

#[given(regex = r#"^a user "(.*)" has been created$"#)]
async fn given_user_created(world: &mut ScimWorld, user_name: String) {
    world.service.create(create_request(&user_name)).expect("first create should succeed");
}

#[when(regex = r#"^another user "(.*)" is created$"#)]
async fn when_duplicate_created(world: &mut ScimWorld, user_name: String) {
    match world.service.create(create_request(&user_name)) {
        Ok(_) => world.last_error = None,
        Err(err) => world.last_error = Some(err),
    }
}

#[then("the creation should fail with a conflict")]
async fn then_conflict(world: &mut ScimWorld) {
    assert!(matches!(world.last_error, Some(IdentityError::Conflict { .. })));
}

#[then("listing users should report exactly one result")]
async fn then_one_result(world: &mut ScimWorld) {
    assert_eq!(world.service.list(None).unwrap().total_results, 1);
}

#[tokio::main]
async fn main() {
    ScimWorld::run("tests/features").await;
}
