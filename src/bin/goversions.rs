mod goversions_cli;

use anyhow::Context;
use goversions::HttpClient;
use goversions_cli::{list, load_config, next, GoVersionsApp, LoadedConfig};
use log::LevelFilter;
use std::sync::Arc;

fn main() {
    stderrlog::new()
        .verbosity(LevelFilter::Trace)
        .init()
        .expect("Failed to initialize logger");

    let r = (|| -> anyhow::Result<()> {
        let LoadedConfig { mirror, settings } = load_config()?;
        ctrlc::set_handler(goversions::set_cancelled).context("Error setting Ctrl-C handler")?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build async runtime")?;

        let http_client = Arc::new(HttpClient::new(mirror));
        runtime
            .block_on(goversions::CancellableFuture::new(
                GoVersionsApp::new()
                    .add_subcommand(list::new_subcommand())
                    .add_subcommand(next::new_subcommand())
                    .run(settings, http_client),
            ))
            .unwrap_or(Ok(()))
    })();

    if let Err(e) = r {
        log::error!("{e:?}");
        std::process::exit(1);
    }
}
