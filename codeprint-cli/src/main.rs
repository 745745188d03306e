//! codeprint - Arrange source files for printing with little wasted paper.
//!
//! Concatenates source files under banners, in the order that keeps files
//! from straddling page breaks, and optionally prints them with enscript.

mod cli;

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process;

use crate::cli::Cli;
use codeprint::align::{LayoutPlan, Termination};
use codeprint::arrange::{ArrangeResult, ArrangeStatistics, Arranger};
use codeprint::config::{Config, OverwriteMode};
use codeprint::error::CodePrintError;
use codeprint::output::{
    OutputFormatter, display_arrange_statistics, display_plan, display_validation_summary,
};
use codeprint::sink::Sink;
use codeprint::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(mut cli: Cli) -> Result<(), CodePrintError> {
    cli.validate()?;

    // Globs and the input list resolve before the config is built
    cli.inputs = cli.get_all_inputs().await?;
    let config = cli.to_config()?;

    // JSON goes to stdout alone
    let formatter = if config.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", codeprint::NAME, codeprint::VERSION));
        formatter.blank_line();
    }

    formatter.info("Validating input files...");
    let validator = Validator::from_config(&config);
    let validation_summary = validator.validate_config(&config).await?;

    if formatter.should_print() {
        display_validation_summary(&formatter, &validation_summary);
    }

    if !config.dry_run {
        handle_output_overwrite(&config, &formatter).await?;
    }

    formatter.info("Arranging documents...");
    let result = Arranger::from_config(&config).arrange(&config).await?;

    for skipped in &result.skipped {
        formatter.warning(&format!(
            "Skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        ));
    }

    if result.statistics.termination == Termination::BudgetExhausted {
        formatter.warning(&format!(
            "Search budget exhausted after {} ordering(s); using the best layout found",
            result.statistics.permutations_examined
        ));
    }

    if config.dry_run {
        return finish_dry_run(&config, &formatter, &result);
    }

    if formatter.is_verbose() {
        display_plan(&formatter, &result.plan);
        display_arrange_statistics(&formatter, &result.statistics);
    }

    let sink = Sink::from_config(&config);
    formatter.info(&format!("Writing to: {}", sink.output().display()));

    let report = sink.deliver(&result.text).await?;

    if formatter.should_print() {
        formatter.blank_line();
        formatter.success(&format!(
            "Arranged {} file(s) on {} page(s), {} wasted line(s): {} ({})",
            result.statistics.files_arranged,
            result.statistics.page_count,
            result.statistics.whitespace_cost,
            report.output.display(),
            report.write.format_file_size()
        ));

        if let Some(run) = &report.formatter {
            formatter.success(&format!(
                "Printed with `{}` in {:.2}s",
                run.command_line,
                run.duration.as_secs_f64()
            ));
        }
    }

    Ok(())
}

/// What `--json` prints.
#[derive(Serialize)]
struct DryRunReport<'a> {
    plan: &'a LayoutPlan,
    statistics: &'a ArrangeStatistics,
    files: Vec<PathBuf>,
}

/// Show the layout without writing anything.
fn finish_dry_run(
    config: &Config,
    formatter: &OutputFormatter,
    result: &ArrangeResult,
) -> Result<(), CodePrintError> {
    if config.json {
        let report = DryRunReport {
            plan: &result.plan,
            statistics: &result.statistics,
            files: result.arranged_files(),
        };
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CodePrintError::other(format!("Failed to serialize plan: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    display_plan(formatter, &result.plan);
    display_arrange_statistics(formatter, &result.statistics);

    formatter.blank_line();
    formatter.success("Dry run completed successfully");
    formatter.info(&format!("  Output would be: {}", config.output.display()));
    if config.prints() {
        formatter.info(&format!(
            "  Then printed with: {}",
            codeprint::sink::EnscriptCommand::from_config(config).command_line()
        ));
    }
    formatter.info("  Run without --dry-run to write the output");

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), CodePrintError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(CodePrintError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // In quiet mode, treat as no-clobber
            if formatter.is_quiet() {
                return Err(CodePrintError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| CodePrintError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(CodePrintError::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn create_test_config() -> Config {
        Config {
            inputs: vec![PathBuf::from("main.c")],
            output: PathBuf::from("/nonexistent/printfile"),
            overwrite_mode: OverwriteMode::Force,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_force() {
        let mut config = create_test_config();
        let temp_file = NamedTempFile::new().unwrap();
        config.output = temp_file.path().to_path_buf();

        let result = handle_output_overwrite(&config, &OutputFormatter::quiet()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_no_clobber() {
        let mut config = create_test_config();
        config.overwrite_mode = OverwriteMode::NoClobber;

        let temp_file = NamedTempFile::new().unwrap();
        config.output = temp_file.path().to_path_buf();

        let result = handle_output_overwrite(&config, &OutputFormatter::quiet()).await;
        assert!(matches!(result, Err(CodePrintError::OutputExists { .. })));
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_quiet_prompt() {
        let mut config = create_test_config();
        config.overwrite_mode = OverwriteMode::Prompt;

        let temp_file = NamedTempFile::new().unwrap();
        config.output = temp_file.path().to_path_buf();

        let result = handle_output_overwrite(&config, &OutputFormatter::quiet()).await;
        assert!(matches!(result, Err(CodePrintError::OutputExists { .. })));
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_nonexistent() {
        let mut config = create_test_config();
        config.overwrite_mode = OverwriteMode::Prompt;

        let result = handle_output_overwrite(&config, &OutputFormatter::default()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_run_stores_arranged_text() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("main.c");
        std::fs::write(&input, "int main(void) { return 0; }\n").unwrap();
        let output = temp_dir.path().join("printfile");

        let cli: Cli = format!("-q -f -o {} {}", output.display(), input.display())
            .parse()
            .unwrap();
        run(cli).await.unwrap();

        let stored = std::fs::read_to_string(&output).unwrap();
        assert!(stored.contains("int main(void)"));
        assert!(stored.contains("* FILE:  "));
    }

    #[tokio::test]
    async fn test_run_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("main.c");
        std::fs::write(&input, "int x;\n").unwrap();
        let output = temp_dir.path().join("printfile");

        let cli: Cli = format!("--json -o {} {}", output.display(), input.display())
            .parse()
            .unwrap();
        run(cli).await.unwrap();

        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_run_missing_input_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("printfile");

        let cli: Cli = format!("-q -f -o {} /nonexistent/main.c", output.display())
            .parse()
            .unwrap();
        let err = run(cli).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
