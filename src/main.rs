//! slidegen - outline text and render decks from the command line.

use std::fs;
use std::path::Path;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use slidegen::cli::{Cli, Command, ProviderArgs};
use slidegen::config::Config;
use slidegen::deck::Assembler;
use slidegen::intake::check_template;
use slidegen::outline::{Credential, Outline, OutlineRequest, provider_for, resolve_outline};

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(command = ?cli.command, "main: dispatching command");

    match cli.command {
        Command::Outline { text, request } => cmd_outline(&config, &text, &request).await,
        Command::Generate {
            text,
            template,
            output,
            outline,
            request,
        } => {
            let outline = match (outline, text) {
                (Some(path), _) => load_outline(&path)?,
                (None, Some(text)) => outline_for(&config, &text, &request).await?,
                (None, None) => return Err(eyre!("either --text or --outline is required")),
            };
            cmd_generate(&config, &template, &output, &outline)
        },
    }
}

async fn cmd_outline(config: &Config, text: &Path, request: &ProviderArgs) -> Result<()> {
    let outline = outline_for(config, text, request).await?;
    let json = outline.to_json_pretty().context("Failed to serialize outline")?;
    println!("{}", json);
    Ok(())
}

fn cmd_generate(config: &Config, template: &Path, output: &Path, outline: &Outline) -> Result<()> {
    let size = fs::metadata(template)
        .with_context(|| format!("Failed to read template {}", template.display()))?
        .len();
    check_template(&template.to_string_lossy(), size, &config.limits)?;
    let template_bytes = fs::read(template)
        .with_context(|| format!("Failed to read template {}", template.display()))?;

    let deck = Assembler::new(config.render.clone())
        .assemble(&template_bytes, outline)
        .with_context(|| format!("Failed to render onto {}", template.display()))?;

    for outcome in &deck.outcomes {
        let steps: Vec<String> = outcome
            .steps()
            .iter()
            .map(|(name, step)| format!("{}={}", name, step))
            .collect();
        if outcome.has_failures() {
            warn!(slide = outcome.index, steps = %steps.join(" "), "slide rendered with failures");
        } else {
            info!(slide = outcome.index, steps = %steps.join(" "), "slide rendered");
        }
    }

    fs::write(output, &deck.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        output = %output.display(),
        slides = deck.outcomes.len(),
        "deck written"
    );
    Ok(())
}

fn load_outline(path: &Path) -> Result<Outline> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline {}", path.display()))?;
    Outline::from_json(&json).with_context(|| format!("Invalid outline JSON in {}", path.display()))
}

/// Outline `text` with the configured provider, falling back to the
/// heuristic when there is no provider or no API key.
async fn outline_for(config: &Config, text: &Path, args: &ProviderArgs) -> Result<Outline> {
    let text = fs::read_to_string(text)
        .with_context(|| format!("Failed to read text {}", text.display()))?;

    let credential = args
        .api_key
        .clone()
        .or_else(|| std::env::var(&config.provider.api_key_env).ok())
        .and_then(Credential::non_empty);

    let provider_id = args.provider.as_deref().unwrap_or(&config.provider.name);
    let provider = if credential.is_some() {
        provider_for(provider_id, &config.provider)
    } else {
        warn!(
            env = %config.provider.api_key_env,
            "no API key given, using the heuristic outline"
        );
        None
    };

    let request = OutlineRequest::new(text)
        .with_guidance(args.guidance.clone())
        .with_credential(credential);
    Ok(resolve_outline(provider.as_deref(), &request).await)
}
