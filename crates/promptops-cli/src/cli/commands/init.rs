use crate::cli::args::InitArgs;
use crate::exit_codes::{CONFIG_ERROR, SUCCESS};
use promptops_core::config::write_sample_config;

pub(crate) fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.path.exists() && !args.force {
        eprintln!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        );
        return Ok(CONFIG_ERROR);
    }
    write_sample_config(&args.path)?;
    eprintln!("Wrote sample suite to {}", args.path.display());
    Ok(SUCCESS)
}
