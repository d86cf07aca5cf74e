use anyhow::Result;
use chat_stream::{Client, Session, Transcript};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let client = Client::new("http://localhost:3000/api/chat");
    let mut session = Session::new(client, Transcript::default());

    let completion = session
        .submit("What is CS101?", |transcript| {
            if let Some(tail) = transcript.tail() {
                print!(".");
                let _ = std::io::stdout().flush();
                log::debug!("tail: {:?}", tail.content);
            }
        })
        .await?;

    println!();
    for message in session.transcript().snapshot() {
        println!("[{}]\n{}\n", message.role, message.content);
    }

    if let Some(artifact) = completion.artifact {
        eprintln!("dropped {} trailing bytes", artifact.discarded);
    }

    Ok(())
}
