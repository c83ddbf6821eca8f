use super::runner_builder::build_runner;
use crate::cli::args::RunArgs;
use crate::exit_codes::{self, CONFIG_ERROR};
use promptops_core::config::load_config;
use promptops_core::report::console::print_summary;
use promptops_core::report::json::write_json;
use promptops_core::report::junit::write_junit;
use promptops_core::report::progress::default_progress_sink;
use tracing::info;

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(CONFIG_ERROR);
        }
    };

    let runner = match build_runner(&args, &cfg) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(CONFIG_ERROR);
        }
    };

    let seed = cfg.effective_seed(args.seed);
    let cases = cfg.build_cases(seed)?;
    info!(
        suite = %cfg.suite,
        cases = cases.len(),
        model = %runner.model,
        provider = runner.provider.provider_name(),
        scorer = %runner.scorer.name(),
        "starting suite"
    );

    let progress = if args.quiet {
        None
    } else {
        default_progress_sink(cases.len())
    };
    let report = runner.run_suite(&cfg.suite, cases, Some(seed), progress).await;

    print_summary(&report);
    if let Some(path) = &args.output {
        write_json(&report, path)?;
        eprintln!("Wrote JSON report to {}", path.display());
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if let Some(path) = &args.junit {
        write_junit(&report, path)?;
    }

    Ok(exit_codes::for_counts(report.failed(), report.errored()))
}
