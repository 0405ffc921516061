use clap::Parser;
use identity_cli::cli::{AuthzAction, Cli, Commands, GroupAction, TokenAction, UserAction};
use serde_json::{json, Value};

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn print_response(response: reqwest::Response) -> anyhow::Result<()> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(json!({}));
    println!("{status}: {}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let http = client();

    match cli.command {
        Commands::Token { action } => match action {
            TokenAction::Issue { username, password } => {
                let response = http
                    .post(format!("{}/auth/token", cli.base_url))
                    .json(&json!({"grant_type": "password", "username": username, "password": password}))
                    .send()
                    .await?;
                print_response(response).await?;
            }
            TokenAction::Whoami { token } => {
                let response = http
                    .get(format!("{}/auth/me", cli.base_url))
                    .bearer_auth(token)
                    .send()
                    .await?;
                print_response(response).await?;
            }
        },
        Commands::User { action } => match action {
            UserAction::Create { user_name, password } => {
                let response = http
                    .post(format!("{}/scim/v2/Users", cli.base_url))
                    .json(&json!({"user_name": user_name, "password": password}))
                    .send()
                    .await?;
                print_response(response).await?;
            }
            UserAction::Get { id } => {
                let response = http.get(format!("{}/scim/v2/Users/{id}", cli.base_url)).send().await?;
                print_response(response).await?;
            }
            UserAction::List { filter } => {
                let mut request = http.get(format!("{}/scim/v2/Users", cli.base_url));
                if let Some(filter) = filter {
                    request = request.query(&[("filter", filter)]);
                }
                print_response(request.send().await?).await?;
            }
        },
        Commands::Group { action } => match action {
            GroupAction::Create { display_name } => {
                let response = http
                    .post(format!("{}/scim/v2/Groups", cli.base_url))
                    .json(&json!({"display_name": display_name}))
                    .send()
                    .await?;
                print_response(response).await?;
            }
            GroupAction::AddMember { group_id, user_id } => {
                let response = http
                    .post(format!("{}/scim/v2/Groups/{group_id}/members", cli.base_url))
                    .json(&json!({"member": user_id}))
                    .send()
                    .await?;
                print_response(response).await?;
            }
        },
        Commands::Authz { action } => match action {
            AuthzAction::Evaluate {
                token,
                subject_json,
                resource_json,
            } => {
                let subject: Value = serde_json::from_str(&subject_json)?;
                let resource: Value = serde_json::from_str(&resource_json)?;
                let response = http
                    .post(format!("{}/authz/evaluate", cli.base_url))
                    .bearer_auth(token)
                    .json(&json!({"subject": subject, "resource": resource, "context": {}}))
                    .send()
                    .await?;
                print_response(response).await?;
            }
            AuthzAction::Reload { token } => {
                let response = http
                    .post(format!("{}/authz/policies/reload", cli.base_url))
                    .bearer_auth(token)
                    .send()
                    .await?;
                print_response(response).await?;
            }
        },
    }

    Ok(())
}
