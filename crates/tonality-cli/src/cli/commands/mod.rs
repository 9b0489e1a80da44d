use super::args::*;

pub mod analyze;
pub mod validate;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Analyze(args) => analyze::run(args).await,
        Command::Validate(args) => validate::run(args).await,
    }
}
