// src/cli/export.rs — Export a saved result as text or Markdown

use std::path::Path;

use crate::core::results::{self, ExportFormat};

pub fn run_export(input: &str, format: &str, output: Option<&str>) -> anyhow::Result<()> {
    let format = ExportFormat::parse(format)
        .ok_or_else(|| anyhow::anyhow!("Unknown format '{format}' (expected text or markdown)"))?;

    let text = results::read_result(Path::new(input))?;
    let rendered = format.render(&text);

    match output {
        Some(path) => {
            results::write_result(Path::new(path), &rendered)?;
            eprintln!("Exported to {path}");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
