pub mod list;
pub mod next;

use anyhow::Context;
use async_trait::async_trait;
use directories::ProjectDirs;
use fxhash::FxHashMap;
use goversions::{HttpClient, UrlMirror};
use log::LevelFilter;
use smol_str::SmolStr;
use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

pub const CONFIG_PATH_ENV: &str = "GOVERSIONS_CONFIG_PATH";

pub struct AppSubcommand {
    cmd: clap::Command,
    run_command: Box<dyn RunSubcommand>,
}

// Cannot use `Fn` trait due to lifetime issues.
#[async_trait]
trait RunSubcommand: Send + Sync {
    async fn run(
        &self,
        settings: Settings,
        client: Arc<HttpClient>,
        args: &clap::ArgMatches,
    ) -> anyhow::Result<()>;
}

struct RunConfigPathSubcommand;

#[async_trait]
impl RunSubcommand for RunConfigPathSubcommand {
    async fn run(
        &self,
        settings: Settings,
        _client: Arc<HttpClient>,
        _args: &clap::ArgMatches,
    ) -> anyhow::Result<()> {
        println!("{}", settings.config_file.display());
        Ok(())
    }
}

pub struct GoVersionsApp {
    cmd: clap::Command,
    run_commands: FxHashMap<SmolStr, Box<dyn RunSubcommand>>,
}

pub struct LoadedConfig {
    pub mirror: UrlMirror,
    pub settings: Settings,
}

pub struct Settings {
    pub config_file: PathBuf,
    pub dl_url: String,
}

impl GoVersionsApp {
    pub const CONFIG_PATH_CMD: &str = "config-path";

    pub fn new() -> Self {
        let mut run_commands: FxHashMap<SmolStr, Box<dyn RunSubcommand>> = FxHashMap::default();
        run_commands.insert(
            Self::CONFIG_PATH_CMD.into(),
            Box::new(RunConfigPathSubcommand),
        );
        Self {
            cmd: clap::Command::new("goversions")
                .about("Get information about Go releases")
                .version(env!("CARGO_PKG_VERSION"))
                .subcommand_required(true)
                .arg_required_else_help(true)
                .arg(
                    clap::Arg::new("debug")
                        .long("debug")
                        .global(true)
                        .action(clap::ArgAction::SetTrue)
                        .help("Print debug logs"),
                )
                .subcommand(
                    clap::Command::new(Self::CONFIG_PATH_CMD)
                        .about("Get the path of the config file"),
                ),
            run_commands,
        }
    }

    pub fn add_subcommand(self, subcmd: AppSubcommand) -> Self {
        let Self {
            mut cmd,
            mut run_commands,
        } = self;
        let name = subcmd.cmd.get_name().into();
        cmd = cmd.subcommand(subcmd.cmd);
        run_commands.insert(name, subcmd.run_command);
        Self { cmd, run_commands }
    }

    pub async fn run(self, settings: Settings, client: Arc<HttpClient>) -> anyhow::Result<()> {
        let matches = self.cmd.get_matches();
        if !matches.get_flag("debug") {
            log::set_max_level(LevelFilter::Info);
        }

        let Some((subcmd, args)) = matches.subcommand() else {
            anyhow::bail!("Subcommand is required");
        };
        let run_command = self
            .run_commands
            .get(subcmd)
            .ok_or_else(|| anyhow::anyhow!("Unknown subcommand {}", subcmd))?;
        run_command.run(settings, client, args).await
    }
}

impl Default for GoVersionsApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_config() -> anyhow::Result<LoadedConfig> {
    let config_path = config_path(std::env::var_os(CONFIG_PATH_ENV))?;
    load_config_from(config_path)
}

fn config_path(env_override: Option<OsString>) -> anyhow::Result<PathBuf> {
    match env_override {
        Some(path) => Ok(path.into()),
        None => Ok(ProjectDirs::from("", "", "goversions")
            .ok_or_else(|| anyhow::anyhow!("No home directory"))?
            .config_dir()
            .join("config.yaml")),
    }
}

fn load_config_from(config_path: PathBuf) -> anyhow::Result<LoadedConfig> {
    let config: goversions::Config = match File::open(&config_path) {
        Ok(file) => serde_yaml_ng::from_reader(file)
            .with_context(|| format!("Failed to parse config {}", config_path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Use default config when file is not found
            goversions::Config::default()
        }
        Err(e) => return Err(e.into()),
    };
    log::debug!("Loaded config from {}", config_path.display());

    Ok(LoadedConfig {
        mirror: config.mirror.unwrap_or_default(),
        settings: Settings {
            config_file: config_path,
            dl_url: config
                .dl_url
                .unwrap_or_else(|| goversions::DEFAULT_DL_URL.to_string()),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GoVersionsApp {
        GoVersionsApp::new()
            .add_subcommand(list::new_subcommand())
            .add_subcommand(next::new_subcommand())
    }

    #[test]
    fn test_command_tree_is_valid() {
        app().cmd.debug_assert();
    }

    #[test]
    fn test_every_subcommand_has_runner() {
        let app = app();
        for subcmd in app.cmd.get_subcommands() {
            assert!(app.run_commands.contains_key(subcmd.get_name()));
        }
    }

    #[test]
    fn test_list_alias_and_all_flag() {
        let matches = app()
            .cmd
            .try_get_matches_from(["goversions", "l", "--all"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, list::CMD);
        assert!(list::ListOptions::from_args(args).include_all);
    }

    #[test]
    fn test_list_defaults_to_current_releases() {
        let matches = app()
            .cmd
            .try_get_matches_from(["goversions", "list", "--debug"])
            .unwrap();
        assert!(matches.get_flag("debug"));
        let (_, args) = matches.subcommand().unwrap();
        assert!(!list::ListOptions::from_args(args).include_all);
    }

    #[test]
    fn test_next_alias() {
        let matches = app()
            .cmd
            .try_get_matches_from(["goversions", "n"])
            .unwrap();
        assert_eq!(matches.subcommand_name(), Some(next::CMD));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(app().cmd.try_get_matches_from(["goversions"]).is_err());
    }

    #[test]
    fn test_config_path_env_override() {
        let path = config_path(Some(OsString::from("/tmp/goversions/custom.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/goversions/custom.yaml"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let LoadedConfig { mirror, settings } = load_config_from(path.clone()).unwrap();
        assert_eq!(settings.config_file, path);
        assert_eq!(settings.dl_url, goversions::DEFAULT_DL_URL);

        let request = HttpClient::new(mirror)
            .get(goversions::DEFAULT_DL_URL)
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), goversions::DEFAULT_DL_URL);
    }

    #[test]
    fn test_config_file_values_reach_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "dl_url: https://go.dev/dl/\nmirror:\n  - from: https://go.dev/\n    to: https://mirror.test/go/\n",
        )
        .unwrap();

        let LoadedConfig { mirror, settings } = load_config_from(path).unwrap();
        assert_eq!(settings.dl_url, "https://go.dev/dl/");

        let request = HttpClient::new(mirror)
            .get(&settings.dl_url)
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://mirror.test/go/dl/");
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "mirror: [unclosed").unwrap();

        assert!(load_config_from(path).is_err());
    }
}
