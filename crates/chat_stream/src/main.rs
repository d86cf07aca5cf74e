mod args;
mod config;
mod error;
mod prelude;
mod printer;

use clap::Parser;

use crate::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let (args, config) = build_config(args)?;
    let args = merge_args_and_config(args, config);

    run(args).await
}
