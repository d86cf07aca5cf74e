use chat_stream::{Client, Message, Role, Session, Transcript};
use config_file::FromConfigFile;
use std::io::{BufRead, IsTerminal, Write};

pub use crate::args::Args;
pub use crate::config::{Config, DEFAULT_ENDPOINT};
pub use crate::error::Error;
use crate::printer::{print_label, print_message, TailPrinter};

pub type Result<T> = std::result::Result<T, Error>;

const EXIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Reads the configuration file. If it or the config directory doesn't exist, they'll be created.
pub fn build_config(mut args: Args) -> Result<(Args, Config)> {
    let home = std::env::var("HOME")?;
    args.config_dir = args.config_dir.replace('~', &home);

    if !std::path::Path::new(&args.config_dir).exists() {
        std::fs::create_dir_all(&args.config_dir)?;
    }

    let config_file = match args.config_file.take() {
        Some(config_file) => config_file.replace('~', &home),
        None => args.config_dir.clone() + "/config.toml",
    };

    log::info!("config_dir: {}", &args.config_dir);
    log::info!("config_file: {}", &config_file);

    let config = if !std::path::Path::new(&config_file).exists() {
        let config = Config::new();
        let config_toml = toml::to_string(&config)?;
        std::fs::write(&config_file, config_toml)?;

        config
    } else {
        Config::from_config_file(&config_file)?
    };

    args.config_file = Some(config_file);

    Ok((args, config))
}

/// Builds the arguments struct based on a combination of the following inputs, in this order.
///
/// 1. CLI options/Environment variables.
/// 2. Config file options.
/// 3. Built-in defaults.
pub fn merge_args_and_config(mut args: Args, config: Config) -> Args {
    if args.endpoint.is_none() {
        args.endpoint = config.endpoint;
    }
    if args.greeting.is_none() {
        args.greeting = config.greeting;
    }
    if args.quiet.is_none() {
        args.quiet = config.quiet;
    }

    args
}

/// Runs a single turn when a prompt was given, or an interactive session reading from `stdin`.
pub async fn run(args: Args) -> Result<()> {
    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let transcript = match args.greeting.clone() {
        Some(greeting) => Transcript::new(greeting),
        None => Transcript::default(),
    };

    log::info!("endpoint: {}", endpoint);

    if args.dry_run {
        let prompt = args.prompt.clone().unwrap_or_default();
        println!("{}", request_body(&transcript, &prompt)?);
        return Ok(());
    }

    let mut session = Session::new(Client::new(endpoint), transcript);

    for message in session.transcript().snapshot() {
        print_message(message);
    }

    if let Some(prompt) = args.prompt.clone() {
        print_message(&Message::user(prompt.clone()));
        turn(&mut session, &prompt, &args).await?;
    } else {
        interactive(&mut session, &args).await?;
    }

    if args.print_transcript {
        println!("{}", serde_json::to_string_pretty(session.transcript())?);
    }

    Ok(())
}

/// Reads one message per line until `stdin` closes or an exit command is entered. A failed turn
/// is reported and the session moves on to the next message.
async fn interactive(session: &mut Session<Client>, args: &Args) -> Result<()> {
    let stdin = std::io::stdin();
    let is_terminal = stdin.is_terminal();

    loop {
        if is_terminal {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&text) {
            break;
        }

        if !is_terminal {
            print_message(&Message::user(text));
        }

        if let Err(e) = turn(session, text, args).await {
            log::error!("turn failed: {}", e);
            eprintln!("Error: {e}");
        }
    }

    Ok(())
}

/// Submits `text` and renders the assistant reply as it streams.
async fn turn(session: &mut Session<Client>, text: &str, args: &Args) -> Result<()> {
    print_label(Role::Assistant);

    let mut printer = TailPrinter::new(args.quiet.unwrap_or(false));
    let mut render_error = None;

    let result = session
        .submit(text, |transcript| {
            if let Some(tail) = transcript.tail() {
                if let Err(e) = printer.update(&tail.content) {
                    if render_error.is_none() {
                        render_error = Some(e);
                    }
                }
            }
        })
        .await;

    let content = session
        .transcript()
        .tail()
        .map(|m| m.content.clone())
        .unwrap_or_default();
    printer.finish(&content)?;

    if let Some(e) = render_error {
        return Err(e);
    }

    let completion = result?;
    if let Some(artifact) = completion.artifact {
        log::warn!("reply ended with {} undecodable bytes", artifact.discarded);
    }

    Ok(())
}

/// The JSON body a turn for `prompt` would send.
pub fn request_body(transcript: &Transcript, prompt: &str) -> Result<String> {
    let mut history = transcript.snapshot().to_vec();
    history.push(Message::user(prompt));

    Ok(serde_json::to_string_pretty(&history)?)
}
