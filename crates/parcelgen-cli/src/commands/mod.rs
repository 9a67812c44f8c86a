//! Subcommand implementations and the pieces they share

pub mod check;
pub mod inspect;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::Context;
use parcelgen_model::{ModelLoader, TypeModel};
use parcelgen_processor::{
    CollectingMessager, Diagnostic, JsonDiagnostic, OutputSink, ParcelProcessor, ProcessorConfig,
    RoundEnv, RoundReport,
};
use serde::Serialize;
use termcolor::ColorChoice;

use crate::output::StyledOutput;

/// Name of the configuration file looked up from the working directory
pub const CONFIG_FILE: &str = "parcelgen.toml";

/// Load the model document at `path`
pub fn load_model(path: &Path) -> anyhow::Result<TypeModel> {
    ModelLoader::from_path(path)
        .with_context(|| format!("Failed to load model from {}", path.display()))
}

/// Explicit config, else the nearest `parcelgen.toml`, else the defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ProcessorConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config() {
            Some(path) => path,
            None => {
                tracing::debug!("no {CONFIG_FILE} found, using defaults");
                return Ok(ProcessorConfig::default());
            }
        },
    };
    tracing::debug!(path = %path.display(), "loading config");
    ProcessorConfig::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Walk up from CWD to find `parcelgen.toml`.
fn find_config() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Run one round over every annotated element of the model
pub fn run_round(
    model: &TypeModel,
    config: ProcessorConfig,
    sink: &mut dyn OutputSink,
) -> (RoundReport, CollectingMessager) {
    let processor = ParcelProcessor::new(config);
    let round = RoundEnv::new(model, processor.config());
    let mut messager = CollectingMessager::new();
    let report = processor.process_round(&round, &mut messager, sink);
    (report, messager)
}

#[derive(Serialize)]
struct JsonRound<'a> {
    report: &'a RoundReport,
    diagnostics: Vec<JsonDiagnostic>,
}

/// Print a round's diagnostics in the requested format
///
/// Pretty output renders errors on stderr and logs notes; JSON output prints
/// every diagnostic and the report as one document on stdout.
pub fn emit_diagnostics(
    format: &str,
    choice: ColorChoice,
    report: &RoundReport,
    diagnostics: &[Diagnostic],
) -> anyhow::Result<()> {
    match format {
        "json" => {
            let document = JsonRound {
                report,
                diagnostics: diagnostics.iter().map(JsonDiagnostic::from_diagnostic).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        _ => {
            for diagnostic in diagnostics {
                if diagnostic.is_error() {
                    diagnostic
                        .emit(choice)
                        .context("Failed to render diagnostic")?;
                } else {
                    tracing::info!("{}", diagnostic.message());
                }
            }
        }
    }
    Ok(())
}

/// "N thing" / "N things"
pub fn plural(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, if count == 1 { "" } else { "s" })
}

/// Element counts line shared by `process` and `check`
pub fn print_element_summary(out: &mut StyledOutput, report: &RoundReport) {
    out.plain(&format!("Processed {}: ", plural(report.elements, "element")));
    out.success(&format!("{} accepted", report.accepted));
    if report.rejected > 0 {
        out.plain(", ");
        out.error(&format!("{} rejected", report.rejected));
    }
    if report.failed > 0 {
        out.plain(", ");
        out.error(&format!("{} failed", report.failed));
    }
    out.plain(".");
    out.newline();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "unit"), "1 unit");
        assert_eq!(plural(0, "unit"), "0 units");
        assert_eq!(plural(3, "element"), "3 elements");
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[processor]\ninjector-suffix = \"_Injector\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.injector_suffix, "_Injector");
    }

    #[test]
    fn test_load_config_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
