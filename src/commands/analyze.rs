use crate::analyzers::PythonExtractor;
use crate::cli::OutputFormat;
use crate::hierarchy::{ClassModel, ModelBuilder};
use crate::io::output::create_writer;
use crate::metrics;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let model = load_model(&config.path)?;
    log::info!(
        "analyzing {} classes from {}",
        model.len(),
        config.path.display()
    );

    let report = metrics::analyze(&model)?;

    let destination: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut writer = create_writer(config.format.into(), destination);
    writer.write_report(&report)
}

/// A `.json` path is a pre-derived class model; anything else is handed to
/// the Python extractor.
fn load_model(path: &Path) -> Result<ClassModel> {
    if path.extension().is_some_and(|ext| ext == "json") {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let builder = ModelBuilder::from_json_str(&content)
            .with_context(|| format!("invalid class model in {}", path.display()))?;
        Ok(builder.build())
    } else {
        PythonExtractor::new().extract_path(path)
    }
}
