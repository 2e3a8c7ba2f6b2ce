//! Learning-exercise runner CLI.
//!
//! Reads `workshop.toml` and `<exercise_dir>/menu.json` from the application
//! root, keeps progress under `$HOME/.config/<name>`, and runs one verb per
//! invocation before exiting with a code from [`workshop::exit_codes`].

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use workshop::core::types::Mode;
use workshop::error::WorkshopError;
use workshop::exercise::ExerciseRegistry;
use workshop::exit_codes;
use workshop::io::catalog_store::load_catalog;
use workshop::io::config::load_config;
use workshop::io::paths::WorkshopPaths;
use workshop::io::progress_store::JsonFileStore;
use workshop::io::text::render_file;
use workshop::logging;
use workshop::present::{AppInfo, TerminalPresenter};
use workshop::workshop::Workshop;

#[derive(Parser)]
#[command(
    name = "workshop",
    version,
    about = "Interactive learning-exercise runner",
    disable_help_subcommand = true
)]
struct Cli {
    /// Application root holding `workshop.toml` and the exercise directory.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Directory for progress documents (default: `$HOME/.config/<name>`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Without a command, the menu is shown.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Select an exercise and print its instructions.
    Select {
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Print the instructions of the named (default: current) exercise.
    Print { name: Vec<String> },
    /// Run a program against the current exercise without grading it.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Verify a program against the current exercise.
    Verify {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Print the name of the current exercise.
    Current,
    /// List exercise names in menu order.
    List,
    /// Show usage and the workshop's help file.
    Help,
    /// Show the workshop's credits.
    Credits,
    /// Show set up/installation prerequisites.
    Prerequisites,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = cli.root.as_path();
    let cfg = load_config(&WorkshopPaths::config_path(root)).map_err(WorkshopError::config)?;
    let paths = WorkshopPaths::resolve(root, &cfg, cli.data_dir.as_deref())
        .map_err(WorkshopError::config)?;
    let app = AppInfo {
        name: cfg.name.clone(),
        title: cfg.title.clone(),
        subtitle: cfg.subtitle.clone(),
        width: cfg.width,
        root: paths.root.clone(),
        has_help: file_exists(paths.help_path.as_deref()),
        has_credits: file_exists(paths.credits_path.as_deref()),
        has_prerequisites: file_exists(paths.prerequisites_path.as_deref()),
    };
    let mut presenter = TerminalPresenter::new(app.clone(), io::stdout())?;

    let command = match cli.command {
        Some(Command::Help) => {
            presenter.usage()?;
            if let Some(path) = existing(paths.help_path.as_deref()) {
                presenter.document(&render_file(path, &app.text_vars())?)?;
            }
            return Ok(exit_codes::OK);
        }
        Some(Command::Credits) => {
            if let Some(path) = existing(paths.credits_path.as_deref()) {
                presenter.document(&render_file(path, &app.text_vars())?)?;
            }
            return Ok(exit_codes::OK);
        }
        Some(Command::Prerequisites) => {
            if let Some(path) = existing(paths.prerequisites_path.as_deref()) {
                presenter.document(&render_file(path, &app.text_vars())?)?;
            }
            return Ok(exit_codes::OK);
        }
        other => other,
    };

    let catalog =
        load_catalog(&paths.menu_path, &paths.exercise_dir).map_err(WorkshopError::config)?;
    let mut workshop = Workshop::new(
        app,
        catalog,
        ExerciseRegistry::builtin(),
        JsonFileStore::new(&paths.data_dir),
        presenter,
    );

    match command {
        None => workshop.menu()?,
        Some(Command::List) => {
            for name in workshop.catalog().names() {
                println!("{name}");
            }
        }
        Some(Command::Current) => {
            if let Some(current) = workshop.current() {
                println!("{current}");
            }
        }
        Some(Command::Select { name }) => workshop.select(&name.join(" "))?,
        Some(Command::Print { name }) => {
            let name = (!name.is_empty()).then(|| name.join(" "));
            workshop.print(name.as_deref())?;
        }
        Some(Command::Run { args }) => {
            return Ok(exit_codes::for_outcome(workshop.execute(Mode::Run, &args)?));
        }
        Some(Command::Verify { args }) => {
            return Ok(exit_codes::for_outcome(
                workshop.execute(Mode::Verify, &args)?,
            ));
        }
        Some(Command::Help | Command::Credits | Command::Prerequisites) => {}
    }
    Ok(exit_codes::OK)
}

fn existing(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| path.is_file())
}

fn file_exists(path: Option<&Path>) -> bool {
    existing(path).is_some()
}
