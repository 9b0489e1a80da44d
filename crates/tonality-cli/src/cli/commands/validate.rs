//! The `validate` command: load a config, report what it resolves to.

use crate::cli::args::ValidateArgs;
use crate::exit_codes;
use tonality_core::config::load_config;

pub async fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    match load_config(&args.config) {
        Ok(config) => {
            let deadline = config
                .deadline_ms
                .map(|ms| format!("{ms}ms"))
                .unwrap_or_else(|| "off".to_string());
            println!(
                "ok: max_concurrency={} failure_policy={} deadline={}",
                config.max_concurrency,
                config.failure_policy.as_str(),
                deadline
            );
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(exit_codes::CONFIG_ERROR)
        }
    }
}
