use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;
use crate::util::report_timestamp;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Storefront Session Results".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Storefront Session Results\n")?;
    writeln!(out, "_Generated {}_\n", report_timestamp())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "### {} {} (seed {})\n",
            status, result.scenario_name, result.seed
        )?;
        writeln!(
            out,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "- **Average time**: {:?}", result.average_duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, passed: bool, micros: u64) -> ScenarioResult {
        ScenarioResult {
            scenario_name: name.to_string(),
            seed: 1337,
            passed,
            iterations_run: 2,
            successful_iterations: if passed { 2 } else { 1 },
            failures: if passed {
                Vec::new()
            } else {
                vec![String::from("Iteration 2 (seed 1338): window ended at 3 of 5 categories")]
            },
            average_duration: Duration::from_micros(micros),
            performance_data: vec![Duration::from_micros(micros)],
        }
    }

    #[test]
    fn markdown_lists_failures() {
        let mut out = Vec::new();
        generate_markdown_report(
            &mut out,
            &[result("Scroll To End", true, 10), result("Slow Media", false, 20)],
        )
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("# Storefront Session Results"));
        assert!(text.contains("- **Failed**: 1"));
        assert!(text.contains("- **Success rate**: 50.0%"));
        assert!(text.contains("window ended at 3 of 5"));
    }

    #[test]
    fn json_is_an_array_of_results() {
        let mut out = Vec::new();
        generate_json_report(&mut out, &[result("Cart Totals", true, 5)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["scenario_name"], "Cart Totals");
        assert_eq!(value[0]["seed"], 1337);
    }

    #[test]
    fn console_handles_empty_results() {
        let mut out = Vec::new();
        generate_console_report(&mut out, &[], Duration::ZERO).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total runs: 0"));
        assert!(!text.contains("Performance Summary"));
    }
}
