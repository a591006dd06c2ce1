use anyhow::Context;
use clap::{Parser, Subcommand};
use mapmeasure::Config;
use mapmeasure::coord::CoordinateForm;
use mapmeasure::replay::{self, Script};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mapmeasure")]
#[command(version, about = "Provider-agnostic map measurement core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scripted pointer session and print the resulting measurements as JSON
    Replay {
        /// TOML script to replay
        script: PathBuf,

        /// Coordinate form of the output (canonical, cartesian or radians)
        #[arg(long, short = 'f', value_name = "FORM", default_value = "canonical")]
        form: CoordinateForm,

        /// Config file to use instead of ~/.config/mapmeasure/config.toml
        #[arg(long, short = 'c', value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Print the JSON schema of the config file
    Schema,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            form,
            config,
        } => {
            let config = match config {
                Some(path) => Config::load_from(&path)?,
                None => Config::load()?,
            };
            let script = Script::load(&script)?;
            log::info!(
                "Replaying {} steps on {}",
                script.steps.len(),
                script.provider
            );

            let records = replay::run(&script, &config, form)?;
            let json =
                serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
            println!("{json}");
        }
        Command::Schema => {
            let schema = Config::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
