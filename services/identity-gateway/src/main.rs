use identity_core::config::Config;
use identity_core::BUILD_INFO;
use identity_gateway::state::AppState;
use identity_gateway::router;
use policy_engine::{policy, PolicyPublisher, RuleEngine};
use record_store::RecordStore;
use scim_service::{GroupService, UserService};
use std::path::Path;
use std::sync::Arc;
use token_service::{ClientRegistry, TokenIssuer};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    info!("Starting {}", BUILD_INFO);

    let store = RecordStore::new();
    let users = Arc::new(store.users);
    let groups = Arc::new(store.groups);

    let initial_policies = policy::load_from_path(Path::new(&config.policies_path))?;
    let publisher = PolicyPublisher::new(initial_policies);
    let engine = RuleEngine::new(publisher.clone());
    let facade = authz_facade::AuthorizationFacade::new(engine, Arc::new(authz_facade::TracingAuditSink));

    // No client self-registration endpoint exists yet (spec §4.5 "pre-
    // configured map"); operators seed client credentials out of band.
    let clients = ClientRegistry::new();
    let token_issuer = TokenIssuer::new(&config, users.clone(), clients)?;

    let app_state = Arc::new(AppState {
        user_service: UserService::new(users.clone()),
        group_service: GroupService::new(groups, users),
        token_issuer,
        facade,
        policies: publisher,
        policies_path: config.policies_path.clone(),
    });

    let app = router::build(app_state);

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    info!("identity-gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
