//! BDD tests for CLI argument parsing.

use clap::Parser;
use cucumber::{given, then, when, World};
use identity_cli::Cli;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct CliWorld {
    args: Vec<String>,
    parsed_ok: Option<bool>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            parsed_ok: None,
        }
    }
}

#[given(regex = r#"^the CLI arguments "(.*)"$"#)]
async fn given_arguments(world: &mut CliWorld, raw: String) {
    world.args = raw.split_whitespace().map(str::to_string).collect();
}

#[when("the arguments are parsed")]
async fn when_parsed(world: &mut CliWorld) {
    world.parsed_ok = Some(Cli::try_parse_from(&world.args).is_ok());
}

#[then("parsing should succeed")]
async fn then_succeed(world: &mut CliWorld) {
    assert_eq!(world.parsed_ok, Some(true));
}

#[then("parsing should fail")]
async fn then_fail(world: &mut CliWorld) {
    assert_eq!(world.parsed_ok, Some(false));
}

#[tokio::main]
async fn main() {
    CliWorld::run("tests/features").await;
}
