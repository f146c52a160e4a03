use std::sync::Arc;

use async_trait::async_trait;
use goversions::{release, HttpClient};

use super::Settings;

pub const CMD: &str = "next";

pub fn new_subcommand() -> super::AppSubcommand {
    let cmd = clap::Command::new(CMD)
        .visible_alias("n")
        .about("Get next release (beta, rc)");
    super::AppSubcommand {
        cmd,
        run_command: Box::new(RunNext),
    }
}

struct RunNext;

#[async_trait]
impl super::RunSubcommand for RunNext {
    async fn run(
        &self,
        settings: Settings,
        client: Arc<HttpClient>,
        _args: &clap::ArgMatches,
    ) -> anyhow::Result<()> {
        let newest = release::next_pre_release(&client, &settings.dl_url).await?;
        if newest == goversions::GoVersion::default() {
            log::debug!("No pre-release found");
        }
        println!("{}", newest);
        Ok(())
    }
}
