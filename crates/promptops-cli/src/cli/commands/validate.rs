use crate::cli::args::ValidateArgs;
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use promptops_core::config::load_config;

pub(crate) fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    match load_config(&args.config) {
        Ok(cfg) => {
            eprintln!(
                "{}: suite '{}' with {} test(s), model {}",
                args.config.display(),
                cfg.suite,
                cfg.tests.len(),
                cfg.model
            );
            Ok(SUCCESS)
        }
        Err(e) => {
            eprintln!("{}: {}", args.config.display(), e);
            Ok(CONFIG_ERROR)
        }
    }
}
