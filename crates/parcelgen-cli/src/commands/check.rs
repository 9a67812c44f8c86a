//! `parcelgen check` — validate and classify without writing anything.

use std::path::PathBuf;

use parcelgen_processor::{MemorySink, RoundReport};

use super::{emit_diagnostics, load_config, load_model, plural, print_element_summary, run_round};
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(
    model_path: PathBuf,
    config: Option<PathBuf>,
    format: String,
    color: Option<String>,
) -> anyhow::Result<RoundReport> {
    let choice = resolve_color_choice(color.as_deref());
    let config = load_config(config.as_deref())?;
    let model = load_model(&model_path)?;

    // Units are generated in memory and dropped
    let mut sink = MemorySink::new();
    let (report, messager) = run_round(&model, config, &mut sink);

    emit_diagnostics(&format, choice, &report, &messager.into_diagnostics())?;

    if format != "json" {
        let mut out = StyledOutput::new(choice);
        print_element_summary(&mut out, &report);
        out.plain(&format!("{} would be generated", plural(report.emitted, "unit")));
        out.plain(if report.emitted == 0 { "." } else { ":" });
        out.newline();
        for unit in sink.into_units() {
            out.plain("  ");
            out.bold(&unit.name);
            out.newline();
        }
    }

    Ok(report)
}
