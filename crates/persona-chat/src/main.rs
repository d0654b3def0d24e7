//! A terminal chatbot built on `persona-chat`.

#[macro_use]
extern crate tracing;

mod secret;

use std::io::Write as _;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use persona_chat::commands::{Command, HELP, Input, parse_input};
use persona_chat::core::conversation::Role;
use persona_chat::core::{Credential, Error};
use persona_chat::{DEFAULT_MODEL, DEFAULT_PERSONA, Session, SessionBuilder};
use persona_chat_openai_model::OpenAIConfigBuilder;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

const BAR_CHAR: &str = "▎";
const KEYS_URL: &str = "https://console.groq.com/keys";

/// Chat with a friendly persona from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API key for the completion service. Prompted for when absent.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier.
    #[arg(
        short,
        long,
        env = "PERSONA_CHAT_MODEL",
        default_value = DEFAULT_MODEL
    )]
    model: String,

    /// Base URL of an OpenAI-compatible API.
    #[arg(long, env = "PERSONA_CHAT_BASE_URL")]
    base_url: Option<String>,

    /// Persona instruction sent ahead of the conversation.
    #[arg(
        long,
        env = "PERSONA_CHAT_PERSONA",
        default_value = DEFAULT_PERSONA
    )]
    persona: String,

    /// Chat without a persona instruction, even if one is configured.
    #[arg(long, overrides_with = "persona")]
    no_persona: bool,

    /// Sampling temperature.
    #[arg(long)]
    temperature: Option<f32>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
}

type StdinLines = Lines<BufReader<Stdin>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = OpenAIConfigBuilder::new();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(temperature) = args.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(Duration::from_secs(timeout));
    }

    let mut builder = SessionBuilder::with_openai_config(config.build());
    builder = if args.no_persona {
        builder.without_persona()
    } else {
        builder.with_persona(&args.persona)
    };
    let mut session = builder.build().context("failed to create a session")?;

    let mut lines = BufReader::new(io::stdin()).lines();

    let mut model = args.model.trim().to_owned();
    anyhow::ensure!(
        !model.is_empty(),
        "the model identifier must not be empty"
    );

    println!("{}", "💬 Maddy's Chatbot".bold());
    let preset = args.api_key.map(Credential::new);
    let Some(mut credential) =
        acquire_credential(&mut session, preset, &model, &mut lines).await
    else {
        return Ok(());
    };
    println!(
        "{} {}",
        "A blazing fast chatbot for friendly chat purposes.".dimmed(),
        "Type /help for commands.".dimmed()
    );

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .context("invalid progress template")?
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        let Some(input) = parse_input(&line) else {
            continue;
        };

        match input {
            Input::Message(text) => {
                let progress_bar = ProgressBar::new_spinner();
                progress_bar.set_style(progress_style.clone());
                progress_bar.set_message("I am thinking...");
                progress_bar.enable_steady_tick(Duration::from_millis(100));

                let result = session.send_message(text).await;

                // Finish the progress bar before printing anything else.
                progress_bar.finish_and_clear();
                match result {
                    Ok(reply) => print_assistant(&reply),
                    Err(err) => print_error(&err),
                }
            }
            Input::Command(Command::Clear) => {
                session.clear();
                println!("{}", "Conversation cleared.".dimmed());
            }
            Input::Command(Command::History) => print_history(&session),
            Input::Command(Command::Export) => {
                println!("{}", session.export_transcript()?);
            }
            Input::Command(Command::Model(None)) => {
                println!("Current model: {}", session.model().unwrap_or("-"));
            }
            Input::Command(Command::Model(Some(new_model))) => {
                match session.configure(credential.clone(), new_model) {
                    Ok(()) => {
                        model = new_model.to_owned();
                        let notice = format!("Switched to {model}.");
                        println!("{}", notice.dimmed());
                    }
                    Err(err) => print_error(&err),
                }
            }
            Input::Command(Command::Key) => {
                let Some(new_credential) = prompt_api_key(&mut lines).await
                else {
                    break;
                };
                match session.configure(new_credential.clone(), &*model) {
                    Ok(()) => credential = new_credential,
                    Err(err) => print_error(&err),
                }
            }
            Input::Command(Command::Help) => println!("{HELP}"),
            Input::Command(Command::Quit) => break,
            Input::Command(Command::Unknown(name)) => {
                println!("Unknown command /{name}, type /help for the list.");
            }
        }
    }

    Ok(())
}

/// Configures the session with the preset credential, or with one the
/// user enters. Returns `None` when the input ends first.
async fn acquire_credential(
    session: &mut Session,
    preset: Option<Credential>,
    model: &str,
    lines: &mut StdinLines,
) -> Option<Credential> {
    let mut candidate = preset.filter(|c| !c.is_empty());
    loop {
        let credential = match candidate.take() {
            Some(credential) => credential,
            None => prompt_api_key(lines).await?,
        };
        match session.configure(credential.clone(), model) {
            Ok(()) => return Some(credential),
            Err(err) => print_error(&err),
        }
    }
}

/// Asks for an API key until a non-blank one is entered. Returns `None`
/// when the input ends.
async fn prompt_api_key(lines: &mut StdinLines) -> Option<Credential> {
    println!("Enter your Groq API key (get one at {KEYS_URL})");
    loop {
        print!("API key: ");
        std::io::stdout().flush().ok();

        let line = if secret::is_interactive() {
            let line = read_hidden_line().await;
            // Enter is not echoed in raw mode.
            println!();
            line?
        } else {
            read_line(lines).await?
        };
        let credential = Credential::new(line);
        if !credential.is_empty() {
            return Some(credential);
        }
        println!("{}", "Please enter a valid API key.".red());
    }
}

async fn read_hidden_line() -> Option<String> {
    match tokio::task::spawn_blocking(secret::read_hidden_line).await {
        Ok(Ok(line)) => line,
        Ok(Err(err)) => {
            error!("error reading the API key: {}", err);
            None
        }
        Err(err) => {
            error!("key reader panicked: {}", err);
            None
        }
    }
}

async fn read_line(lines: &mut StdinLines) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

fn print_assistant(text: &str) {
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), text.bright_white());
}

fn print_error(err: &Error) {
    println!(
        "{}🚨 {}",
        BAR_CHAR.bright_red(),
        format!("An error occurred: {err}").red()
    );
}

fn print_history(session: &Session) {
    for msg in session.conversation().visible_messages() {
        match msg.role {
            Role::User => {
                println!("{}🙂 {}", BAR_CHAR.bright_green(), msg.content);
            }
            _ => print_assistant(&msg.content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_persona_overrides_persona() {
        let args = Args::try_parse_from([
            "persona-chat",
            "--persona",
            "Be terse.",
            "--no-persona",
        ])
        .unwrap();
        assert!(args.no_persona);

        let args =
            Args::try_parse_from(["persona-chat", "--persona", "Be terse."])
                .unwrap();
        assert!(!args.no_persona);
        assert_eq!(args.persona, "Be terse.");
    }
}
