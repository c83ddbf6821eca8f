use crate::report::SuiteReport;
use std::path::Path;

pub fn render_junit(report: &SuiteReport) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<testsuite name="{}" tests="{}" failures="{}" errors="{}">"#,
        escape(&report.suite),
        report.total(),
        report.failed(),
        report.errored()
    ));
    xml.push('\n');

    for s in &report.summaries {
        let classname = s.capability.as_deref().unwrap_or("promptops");
        xml.push_str(&format!(
            r#"  <testcase name="{}" classname="{}">"#,
            escape(&s.name),
            escape(classname)
        ));
        if s.fail {
            let msg = format!(
                "pass_condition={} score_original={} score_perturb={}",
                s.pass_condition,
                fmt_score(s.score_original),
                fmt_score(s.score_perturb)
            );
            xml.push_str(&format!(r#"<failure message="{}"/>"#, escape(&msg)));
        } else if !s.is_judged() {
            xml.push_str(r#"<skipped message="missing score; not judged"/>"#);
        }
        xml.push_str("</testcase>\n");
    }
    for e in &report.errors {
        xml.push_str(&format!(
            r#"  <testcase name="{}" classname="promptops"><error message="{}"/></testcase>"#,
            escape(&e.name),
            escape(&e.message)
        ));
        xml.push('\n');
    }

    xml.push_str("</testsuite>\n");
    xml
}

pub fn write_junit(report: &SuiteReport, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, render_junit(report))?;
    Ok(())
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "null".to_string(), |s| format!("{:.4}", s))
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
