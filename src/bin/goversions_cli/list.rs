use std::sync::Arc;

use async_trait::async_trait;
use goversions::{release, HttpClient};

use super::Settings;

pub const CMD: &str = "list";

/// Options for `list`, taken from the command line.
pub struct ListOptions {
    pub include_all: bool,
}

impl ListOptions {
    pub fn from_args(args: &clap::ArgMatches) -> Self {
        ListOptions {
            include_all: args.get_flag("all"),
        }
    }
}

pub fn new_subcommand() -> super::AppSubcommand {
    let cmd = clap::Command::new(CMD)
        .visible_alias("l")
        .about("List Go releases")
        .arg(
            clap::Arg::new("all")
                .long("all")
                .action(clap::ArgAction::SetTrue)
                .help("Get all releases, including archived and unstable ones"),
        );
    super::AppSubcommand {
        cmd,
        run_command: Box::new(RunList),
    }
}

struct RunList;

#[async_trait]
impl super::RunSubcommand for RunList {
    async fn run(
        &self,
        settings: Settings,
        client: Arc<HttpClient>,
        args: &clap::ArgMatches,
    ) -> anyhow::Result<()> {
        run(&client, &settings.dl_url, ListOptions::from_args(args)).await
    }
}

pub async fn run(client: &HttpClient, dl_url: &str, options: ListOptions) -> anyhow::Result<()> {
    for version in release::list_versions(client, dl_url, options.include_all).await? {
        println!("{}", version);
    }
    Ok(())
}
