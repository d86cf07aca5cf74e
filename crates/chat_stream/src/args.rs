use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, Parser, PartialEq, Serialize, Deserialize)]
#[command(name = "chat-stream", version = "0.1.0")]
#[command(about = "Chat with a streaming assistant from the terminal")]
#[command(
    long_about = "Sends your messages, together with the whole conversation so far, to an
assistant endpoint and renders the reply as it streams in.

Without a prompt argument the CLI starts an interactive session that reads one message per
line from stdin. Replies are laid out as they arrive: numbered lists start on their own line
and sentences are separated by a blank line.

The endpoint and the greeting can be set through command line arguments, environment
variables or the configuration file."
)]
pub struct Args {
    /// Send a single message and exit instead of starting an interactive session.
    #[serde(skip_serializing)]
    pub prompt: Option<String>,

    /// The chat endpoint that receives the conversation.
    #[clap(long, env = "CHAT_STREAM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// The assistant greeting that opens the conversation.
    #[clap(long)]
    pub greeting: Option<String>,

    /// Don't run the spinner
    #[clap(long)]
    #[serde(skip_serializing)]
    pub quiet: Option<bool>,

    /// Config dir where the configuration will be stored.
    #[clap(long, default_value = "~/.config/chat-stream")]
    #[serde(skip_serializing)]
    pub config_dir: String,

    /// Config file. If undefined, it will be set as `config_dir/config.toml`.
    #[clap(long)]
    #[serde(skip_serializing)]
    pub config_file: Option<String>,

    /// Prints the whole transcript as JSON before exiting.
    #[clap(long, default_value = "false")]
    #[serde(skip_serializing, default)]
    pub print_transcript: bool,

    /// Prints the request body of the first message instead of sending it.
    #[clap(long, default_value = "false")]
    #[serde(skip_serializing, default)]
    pub dry_run: bool,
}
