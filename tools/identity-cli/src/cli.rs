use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "identity")]
#[command(about = "Identity and access gateway client")]
#[command(version = identity_core::VERSION)]
pub struct Cli {
    /// Base URL of the identity-gateway instance.
    #[arg(long, global = true, default_value = "http://localhost:8000")]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Token issuance and inspection
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// SCIM user management
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// SCIM group management
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
    /// Authorization evaluation
    Authz {
        #[command(subcommand)]
        action: AuthzAction,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Issue a token for a username/password
    Issue { username: String, password: String },
    /// Decode the claims of a bearer token via /auth/me
    Whoami { token: String },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Create {
        user_name: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Fetch a user by id
    Get { id: String },
    /// List users, optionally filtered
    List {
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GroupAction {
    /// Create a group
    Create { display_name: String },
    /// Add a member to a group
    AddMember { group_id: String, user_id: String },
}

#[derive(Subcommand)]
pub enum AuthzAction {
    /// Evaluate an access request (subject/resource/context as raw JSON)
    Evaluate {
        token: String,
        subject_json: String,
        resource_json: String,
    },
    /// Trigger a policy reload
    Reload { token: String },
}
