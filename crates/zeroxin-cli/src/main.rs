use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use zeroxin_core::{can_submit_prompt, Controller, ImagePayload, Step, Workflow};
use zeroxin_gemini::GeminiStylist;

mod config;
mod input;
mod output;
mod session;
mod view;

use config::Config;
use input::{parse_input, Input};
use session::{spawn_session, SessionHandle, UserAction};

#[derive(Parser)]
#[command(name = "zeroxin", about = "Zeroxin AI hairstyle consultation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze face shape and suggest hairstyles
    Analyze {
        /// Portrait photo (JPEG or PNG, up to 5MB)
        photo: PathBuf,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze a portrait, then render it with a different hairstyle
    Transform {
        /// Portrait photo (JPEG or PNG, up to 5MB)
        photo: PathBuf,
        /// Hairstyle to apply (e.g., "Short textured crop with fade")
        #[arg(short, long)]
        style: String,
        /// Output file (default: <output_dir>/zeroxin-new-look.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Interactive session: upload, suggestions, transformation, result
    Session {
        /// Portrait to start with
        photo: Option<PathBuf>,
        /// Directory `save` writes to
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { photo, json } => {
            let stylist = connect(&config)?;
            let image = read_photo(&photo).await?;
            let mut controller = Controller::new(stylist);
            controller.select_image(image).await?;

            let workflow = controller.workflow();
            let Some(analysis) = workflow.analysis() else {
                bail!("{}", workflow.error_message().unwrap_or("analysis failed"));
            };
            if json {
                println!("{}", serde_json::to_string_pretty(analysis)?);
            } else {
                print!("{}", view::render(workflow));
            }
        }
        Commands::Transform {
            photo,
            style,
            output,
        } => {
            if !can_submit_prompt(&style) {
                bail!("style must not be empty");
            }
            let stylist = connect(&config)?;
            let image = read_photo(&photo).await?;
            // Styles are only applied to an analyzed portrait.
            let mut controller = Controller::new(stylist);
            controller.select_image(image).await?;
            controller.submit_custom_prompt(&style).await?;

            let workflow = controller.workflow();
            let Some(result) = workflow.result_image() else {
                bail!("{}", workflow.error_message().unwrap_or("transformation failed"));
            };
            let path = match output {
                Some(path) => {
                    output::write_image(result, &path)?;
                    path
                }
                None => output::save_download(result, &config.output_dir)?,
            };
            println!("{}", path.display());
        }
        Commands::Session { photo, output_dir } => {
            let stylist = connect(&config)?;
            let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
            run_session(spawn_session(stylist), photo, &output_dir).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            println!(
                "api key: {}",
                if config.api_key.is_some() { "set" } else { "not set" }
            );
        }
    }

    Ok(())
}

fn connect(config: &Config) -> Result<GeminiStylist> {
    Ok(GeminiStylist::new(config.gemini()?)?)
}

async fn read_photo(path: &Path) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    ImagePayload::from_upload(&bytes).with_context(|| format!("loading {}", path.display()))
}

async fn run_session(
    session: SessionHandle,
    photo: Option<PathBuf>,
    output_dir: &Path,
) -> Result<()> {
    let mut workflow = match photo {
        Some(path) => open_photo(&session, &path).await?,
        None => session.dispatch(UserAction::Refresh).await?,
    };
    print!("{}", view::render(&workflow));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let action = match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => {
                print!("{}", view::render(&workflow));
                continue;
            }
            Input::Save => {
                match workflow.result_image() {
                    Some(image) => {
                        let path = output::save_download(image, output_dir)?;
                        println!("saved {}", path.display());
                    }
                    None => println!("nothing to save yet"),
                }
                continue;
            }
            Input::Unknown(text) => {
                println!("unrecognized: {text} (type `help`)");
                continue;
            }
            Input::Open(path) => {
                workflow = report(open_photo(&session, &path).await, workflow);
                print!("{}", view::render(&workflow));
                continue;
            }
            Input::Another(path) => {
                workflow = report(session.dispatch(UserAction::TryAnotherPhoto).await, workflow);
                if let (Some(path), Step::Upload) = (path, workflow.step()) {
                    workflow = report(open_photo(&session, &path).await, workflow);
                }
                print!("{}", view::render(&workflow));
                continue;
            }
            Input::Custom(text) if !can_submit_prompt(&text) => {
                println!("describe a style after `custom`");
                continue;
            }
            Input::Custom(text) => UserAction::CustomPrompt(text),
            Input::Pick(index) => UserAction::ChooseSuggestion(index),
            Input::Change => UserAction::ChangeStyle,
            Input::Dismiss => UserAction::DismissError,
        };

        if matches!(action, UserAction::CustomPrompt(_) | UserAction::ChooseSuggestion(_)) {
            println!("Visualizing Your New Look...");
        }
        workflow = report(session.dispatch(action).await, workflow);
        print!("{}", view::render(&workflow));
    }

    Ok(())
}

async fn open_photo(session: &SessionHandle, path: &Path) -> Result<Workflow> {
    let image = read_photo(path).await?;
    println!("Analyzing Facial Geometry...");
    Ok(session.dispatch(UserAction::SelectImage(image)).await?)
}

/// Keep the previous state when an action is rejected, printing why.
fn report<E: Into<anyhow::Error>>(result: Result<Workflow, E>, previous: Workflow) -> Workflow {
    match result {
        Ok(workflow) => workflow,
        Err(err) => {
            println!("{:#}", err.into());
            previous
        }
    }
}

