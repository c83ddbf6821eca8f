use crate::model::TestSummary;
use crate::report::{SuiteReport, Tally, UNTAGGED};

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |s| format!("{:.3}", s))
}

/// One line per case, e.g. `FAIL  typo-cat  0.812 -> 0.790 (decrease)`.
#[must_use]
pub fn format_case_line(s: &TestSummary) -> String {
    let status = if s.fail {
        "FAIL"
    } else if s.is_judged() {
        "PASS"
    } else {
        "SKIP"
    };
    format!(
        "{:<5} {}  {} -> {} ({})",
        status,
        s.name,
        fmt_score(s.score_original),
        fmt_score(s.score_perturb),
        s.pass_condition
    )
}

fn format_tally(capability: &str, t: &Tally) -> String {
    format!(
        "{}: pass={} fail={} skip={}",
        capability, t.passed, t.failed, t.skipped
    )
}

pub fn print_summary(report: &SuiteReport) {
    for s in &report.summaries {
        eprintln!("{}", format_case_line(s));
    }
    for e in &report.errors {
        eprintln!("ERROR {}  {}", e.name, e.message);
    }
    let capabilities = report.by_capability();
    if capabilities.keys().any(|k| k != UNTAGGED) {
        for (capability, tally) in &capabilities {
            eprintln!("  {}", format_tally(capability, tally));
        }
    }
    let t = report.tally();
    eprintln!(
        "Results: pass={} fail={} skip={} error={} (suite={}, model={})",
        t.passed,
        t.failed,
        t.skipped,
        report.errored(),
        report.suite,
        report.model_name
    );
    if let Some(seed) = report.seed {
        eprintln!("Seed: {}", seed);
    }
}
