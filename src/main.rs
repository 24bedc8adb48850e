use clap::Parser;
use colored::*;
use std::process;
use std::sync::Arc;
use tracing::{debug, warn};

use pa_agent::agent::prompt::{dated, DEFAULT_CHAT_PROMPT, PERSONAL_ASSISTANT_PROMPT};
use pa_agent::agent::Agent;
use pa_agent::api::{ChatTransport, CompletionOptions, OpenRouterClient};
use pa_agent::cli::{Args, FewShotExample, Mode};
use pa_agent::config::{Config, FileConfig, ProcessEnv};
use pa_agent::error::Result;
use pa_agent::logging;
use pa_agent::repl::{self, ReplOptions};
use pa_agent::tools::{ToolRegistry, WebhookClient};
use pa_agent::ui::{self, ReplyLabel};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let (file_config, file_error) = match FileConfig::load() {
        Ok(file_config) => (file_config, None),
        Err(e) => (FileConfig::default(), Some(e)),
    };

    let config = match Config::from_sources(&args, &ProcessEnv, file_config) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&e);
            process::exit(1);
        }
    };

    // Verbosity may come from the environment or the config file.
    logging::init(config.verbose);
    if let Some(e) = file_error {
        warn!("ignoring config file: {:#}", e);
    }

    if let Err(e) = run(&args.mode, &config).await {
        ui::display_error(&e);
        process::exit(1);
    }
}

async fn run(mode: &Mode, config: &Config) -> Result<()> {
    debug!(model = %config.model, endpoint = %config.api_endpoint, "resolved configuration");

    let transport: Arc<dyn ChatTransport> = Arc::new(OpenRouterClient::new(
        &config.api_key,
        config.api_endpoint.clone(),
        config.stream_timeout,
    )?);
    let options =
        CompletionOptions::new(config.model.clone()).with_temperature(config.temperature);

    match mode {
        Mode::Ask { prompt, examples } => {
            let mut agent = chat_agent(transport, options, config, examples);
            let outcome = agent.respond(&prompt.join(" ")).await?;
            println!("{}", outcome.reply);
            ui::display_turn_summary(&outcome);
        }
        Mode::Compare {
            prompt,
            temperatures,
            examples,
        } => {
            let prompt = prompt.join(" ");
            for temperature in temperatures {
                let options = options.clone().with_temperature(Some(
                    pa_agent::config::validate_temperature(*temperature)?,
                ));
                let mut agent = chat_agent(transport.clone(), options, config, examples);
                let outcome = agent.respond(&prompt).await?;
                println!("{}", format!("--- temperature {} ---", temperature).cyan().bold());
                println!("{}", outcome.reply);
                println!();
            }
        }
        Mode::Chat { stream } => {
            let mut agent = chat_agent(transport, options, config, &[]);
            repl::run(
                &mut agent,
                ReplOptions {
                    stream: *stream,
                    label: ReplyLabel::Bot,
                },
            )
            .await?;
        }
        Mode::Agent { .. } => {
            let webhook =
                WebhookClient::new(config.require_webhook_url()?, config.webhook_timeout)?;
            let registry = ToolRegistry::personal_assistant(webhook)?;
            let system_prompt = config
                .system_prompt
                .clone()
                .unwrap_or_else(|| PERSONAL_ASSISTANT_PROMPT.to_string());

            let mut agent = Agent::new(transport, options)
                .with_system_prompt(dated(&system_prompt))
                .with_tools(registry)
                .with_max_iterations(config.max_iterations)
                .with_observer(ui::display_turn_event);

            println!(
                "{}",
                "Personal assistant ready. I can book meetings and send emails.".green()
            );
            repl::run(
                &mut agent,
                ReplOptions {
                    stream: false,
                    label: ReplyLabel::Assistant,
                },
            )
            .await?;
        }
    }

    Ok(())
}

fn chat_agent(
    transport: Arc<dyn ChatTransport>,
    options: CompletionOptions,
    config: &Config,
    examples: &[FewShotExample],
) -> Agent {
    let system_prompt = config.system_prompt.as_deref().unwrap_or(DEFAULT_CHAT_PROMPT);
    examples.iter().fold(
        Agent::new(transport, options).with_system_prompt(system_prompt),
        |agent, example| agent.with_example(&example.question, &example.answer),
    )
}
