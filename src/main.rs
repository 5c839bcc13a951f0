//! `boxmark-replay`: run a scripted editing session and print the result.
//!
//! ```text
//! boxmark-replay <script.json> [--config <config.json>] [--json]
//! ```
//!
//! Without `--config` the user's config file is used if present. Output is
//! YOLO lines, or the annotation list as JSON with `--json`. `RUST_LOG`
//! overrides the configured log level.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use boxmark::config::EditorConfig;
    use boxmark::replay::{ReplayError, ReplayScript, run_script};

    #[derive(Debug, Parser)]
    #[command(
        name = "boxmark-replay",
        about = "Replay a scripted editing session and print the resulting annotations",
        version
    )]
    struct Args {
        /// Replay script (JSON)
        script: PathBuf,

        /// Editor config file; defaults to the user's config if present
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the annotation list as JSON instead of YOLO lines
        #[arg(long)]
        json: bool,
    }

    fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig, ReplayError> {
        match path {
            Some(path) => Ok(EditorConfig::load(path)?),
            None => Ok(EditorConfig::load_from_default_path().unwrap_or_default()),
        }
    }

    fn run(args: &Args) -> Result<(), ReplayError> {
        let config = load_config(args.config.as_ref())?;

        let level = config.preferences.log_level.to_level_filter().to_string();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

        let script = ReplayScript::load(&args.script)?;
        let outcome = run_script(&script, &config)?;
        log::info!(
            "Replay produced {} annotations ({} set changes)",
            outcome.annotations.len(),
            outcome.set_changes
        );

        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome.annotations)?);
        } else {
            let text = outcome.to_yolo();
            if !text.is_empty() {
                println!("{text}");
            }
        }
        Ok(())
    }

    pub fn main() -> ExitCode {
        let args = Args::parse();

        match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn parses_script_and_flags() {
            let args = Args::try_parse_from([
                "boxmark-replay",
                "session.json",
                "--config",
                "editor.json",
                "--json",
            ])
            .unwrap();
            assert_eq!(args.script, PathBuf::from("session.json"));
            assert_eq!(args.config, Some(PathBuf::from("editor.json")));
            assert!(args.json);
        }

        #[test]
        fn script_path_is_required() {
            assert!(Args::try_parse_from(["boxmark-replay", "--json"]).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    cli::main()
}

// The replay tool is native-only
#[cfg(target_arch = "wasm32")]
fn main() {}
