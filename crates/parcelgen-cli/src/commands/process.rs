//! `parcelgen process` — run one round and write the generated sources.

use std::path::PathBuf;

use parcelgen_processor::{DirectorySink, RoundReport};

use super::{emit_diagnostics, load_config, load_model, plural, print_element_summary, run_round};
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(
    model_path: PathBuf,
    out_dir: PathBuf,
    config: Option<PathBuf>,
    format: String,
    color: Option<String>,
) -> anyhow::Result<RoundReport> {
    let choice = resolve_color_choice(color.as_deref());

    // 1. Inputs
    let config = load_config(config.as_deref())?;
    let model = load_model(&model_path)?;

    // 2. Round
    let mut sink = DirectorySink::new(&out_dir);
    let (report, messager) = run_round(&model, config, &mut sink);

    // 3. Diagnostics
    emit_diagnostics(&format, choice, &report, &messager.into_diagnostics())?;

    // 4. Summary
    if format != "json" {
        let mut out = StyledOutput::new(choice);
        print_element_summary(&mut out, &report);
        out.plain(&format!("Generated {} in ", plural(report.emitted, "unit")));
        out.info(&sink.root().display().to_string());
        if report.emission_failures > 0 {
            out.plain(", ");
            out.error(&format!("{} failed", report.emission_failures));
        }
        out.plain(".");
        out.newline();
        for path in sink.written() {
            out.dim(&format!("  {}", path.display()));
            out.newline();
        }
    }

    Ok(report)
}
