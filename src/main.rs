use chronosnap::{cli, config, error, transport, upload};
use chronosnap_common::{AnalysisResult, GeminiClient, Instruction, TransformResult, ERAS};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{ChronoSnapError, Result};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use transport::ReqwestTransport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Eras => {
            for era in ERAS {
                println!("{:<10} {} {:<18} {}", era.id, era.icon, era.name, era.description);
            }
        }

        Commands::Edit { image, era, prompt, output } => {
            let source = upload::load_image(&image)?;
            let instruction = choose_instruction(era, prompt)?;
            let client = build_client(&config)?;

            println!("🕰  {} -> {}", image.display(), instruction.label());
            let spinner = spinner("Manipulating timeline...");
            let outcome = client.edit(&source, instruction.text()).await;
            spinner.finish_and_clear();

            let result = TransformResult {
                image: outcome?,
                instruction,
            };
            let download = result.download();
            let output = output.unwrap_or_else(|| PathBuf::from(download.file_name));
            upload::save_download(&download, &output)?;
            println!("✔ Saved: {}", output.display());
        }

        Commands::Analyze { image, prompt } => {
            let source = upload::load_image(&image)?;
            let client = build_client(&config)?;

            let spinner = spinner("Analyzing...");
            let outcome = client.analyze(&source, prompt.as_deref()).await;
            spinner.finish_and_clear();

            let result = AnalysisResult {
                text: outcome?,
                created_at_ms: chrono::Utc::now().timestamp_millis().max(0) as u64,
            };
            print_analysis(&image, &result);
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ API key saved to {}", Config::config_path()?.display());
            }

            if show {
                println!("Settings:");
                println!("  Edit model:     {}", config.edit_model);
                println!("  Analysis model: {}", config.analysis_model);
                println!("  API base:       {}", config.api_base);
                println!("  Timeout:        {}s", config.timeout_seconds);
                println!(
                    "  API key:        {}",
                    match config.get_api_key() {
                        Ok(_) => "set",
                        Err(_) => "not set",
                    }
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_client(config: &Config) -> Result<GeminiClient<ReqwestTransport>> {
    let api_key = config.get_api_key()?;
    let transport = ReqwestTransport::new(config.timeout_seconds)?;
    Ok(GeminiClient::new(transport, api_key)
        .with_api_base(config.api_base.clone())
        .with_models(config.edit_model.clone(), config.analysis_model.clone()))
}

fn choose_instruction(era: Option<String>, prompt: Option<String>) -> Result<Instruction> {
    match (era, prompt) {
        (Some(_), Some(_)) => Err(ChronoSnapError::ConflictingInstruction),
        (Some(id), None) => Ok(Instruction::era(&id)?),
        (None, Some(text)) => Ok(Instruction::custom(text)),
        (None, None) => {
            let labels: Vec<String> = ERAS
                .iter()
                .map(|era| format!("{} {} - {}", era.icon, era.name, era.description))
                .collect();
            let index = dialoguer::Select::new()
                .with_prompt("Choose a destination")
                .items(&labels)
                .default(0)
                .interact()
                .map_err(|e| ChronoSnapError::Prompt(e.to_string()))?;
            Ok(Instruction::Era(&ERAS[index]))
        }
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_analysis(image: &std::path::Path, result: &AnalysisResult) {
    let when = chrono::DateTime::from_timestamp_millis(result.created_at_ms as i64)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    println!("🔍 Analysis report: {} ({})\n", image.display(), when);
    println!("{}", result.text);
}
