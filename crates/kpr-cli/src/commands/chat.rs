use clap::Args;
use colored::Colorize;
use std::io::{self, BufRead, Write};

use kpr_core::advisory::{build_banker_context, compliance_notice, AdvisorSettings, Conversation};
use kpr_core::affordability::evaluate;

use crate::advisor::GeminiClient;
use crate::commands::affordability::{snapshot_value, ProfileArgs};
use crate::config::AdvisorConfig;

/// Arguments for the advisory chat
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Gemini API key (defaults to GOOGLE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model name, e.g. gemini-2.5-flash
    #[arg(long)]
    pub model: Option<String>,

    /// Sampling temperature between 0 and 1
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Extra instructions appended after the banker context
    #[arg(long)]
    pub system_prompt: Option<String>,
}

/// Flags win over the environment.
fn resolve_settings(args: &ChatArgs, config: &AdvisorConfig) -> AdvisorSettings {
    let mut settings = config.settings.clone();
    if let Some(model) = args.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        settings.model = model.to_string();
    }
    if let Some(temperature) = args.temperature {
        settings.temperature = temperature;
    }
    if let Some(prompt) = &args.system_prompt {
        settings.extra_system_prompt = prompt.clone();
    }
    settings
}

fn resolve_api_key(args: &ChatArgs, config: &AdvisorConfig) -> Result<String, String> {
    args.api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .or_else(|| config.api_key.clone())
        .ok_or_else(|| {
            "no API key: set GOOGLE_API_KEY in the environment or a .env file, or pass --api-key"
                .to_string()
        })
}

pub fn run_chat(args: ChatArgs, config: &AdvisorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.profile.resolve_without_stdin()?;
    request.validate()?;
    let result = evaluate(&request.profile, &request.thresholds);

    print_snapshot(&snapshot_value(&request));
    if let Some(notice) = compliance_notice(&result) {
        println!("\n{}", notice.yellow());
    }

    let settings = resolve_settings(&args, config);
    if !settings.is_known_model() {
        tracing::warn!(model = %settings.model, "model is not in the known list");
    }
    let api_key = resolve_api_key(&args, config)?;
    let client = GeminiClient::new(api_key, settings, config.timeout_seconds)?;

    let context = build_banker_context(&request, &result);
    let extra = client.settings().extra_system_prompt.clone();
    let mut conversation = Conversation::new(&context, &extra);

    println!(
        "\n{} ({}). Ketik /reset untuk mengulang, /quit untuk keluar.",
        "Konsultasi KPR".bold(),
        client.settings().model
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n{} ", "Anda>".cyan().bold());
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let question = line?;
        let question = question.trim();
        match question {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                conversation.reset(&context, &extra);
                println!("Percakapan diulang.");
                continue;
            }
            _ => {}
        }

        match conversation.ask(&client, question) {
            Ok(answer) => println!("\n{} {}", "Bankir>".green().bold(), answer),
            Err(e) => eprintln!("{}: {}", "error".red().bold(), e),
        }
    }

    tracing::debug!(messages = conversation.messages().len(), "chat session ended");
    Ok(())
}

fn print_snapshot(snapshot: &serde_json::Value) {
    println!(
        "{} {}",
        "Ringkasan Simulasi untuk".bold(),
        snapshot["borrower"].as_str().unwrap_or_default()
    );
    if let Some(rows) = snapshot["result"]["rows"].as_array() {
        for row in rows {
            println!(
                "  {:<34} {}",
                row["label"].as_str().unwrap_or_default(),
                row["value"].as_str().unwrap_or_default()
            );
        }
    }
}
