//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fiscal_domain::traits::LlmProvider;
use fiscal_extractor::{
    BatchReport, BatchRunner, ExtractorConfig, JsonSink, RecordExtractor, SinkOutcome,
};
use fiscal_llm::{GeminiConfig, GeminiProvider};
use std::path::{Path, PathBuf};

/// Settings for one extraction run, after applying flags over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractSettings {
    /// Directory scanned for documents
    pub input_dir: PathBuf,
    /// JSON result file
    pub output_file: PathBuf,
    /// Model connection
    pub gemini: GeminiConfig,
    /// Retry and timeout settings
    pub extractor: ExtractorConfig,
    /// API key, if one was given
    pub api_key: Option<String>,
}

impl ExtractSettings {
    /// Merge command-line flags over the loaded configuration.
    pub fn resolve(args: ExtractArgs, config: &Config) -> Result<Self> {
        let mut gemini = config.gemini.clone();
        if let Some(model) = args.model {
            gemini.model = model;
        }

        let mut extractor = config.extractor.clone();
        if let Some(max_retries) = args.max_retries {
            extractor.max_retries = max_retries;
        }
        if let Some(timeout) = args.timeout {
            extractor.call_timeout_secs = timeout;
        }
        extractor.validate().map_err(CliError::InvalidInput)?;

        Ok(Self {
            input_dir: args.input_dir.unwrap_or_else(|| config.paths.input_dir.clone()),
            output_file: args
                .output
                .unwrap_or_else(|| config.paths.output_file.clone()),
            gemini,
            extractor,
            api_key: args.api_key,
        })
    }
}

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<BatchReport> {
    let settings = ExtractSettings::resolve(args, config)?;
    let api_key = settings.api_key.ok_or(CliError::MissingApiKey)?;

    let provider = GeminiProvider::new(api_key, settings.gemini)?;
    println!(
        "{}",
        formatter.info(&format!("Using model {}", provider.model_name()))
    );

    let runner = BatchRunner::new(RecordExtractor::new(provider, settings.extractor)?);
    extract_with(&runner, &settings.input_dir, &settings.output_file, formatter).await
}

/// Run a batch and write its records, reporting progress on the console.
///
/// A missing input directory or an empty batch is reported, not returned as
/// an error; only failing to write the result file is.
pub async fn extract_with<L>(
    runner: &BatchRunner<L>,
    input_dir: &Path,
    output_file: &Path,
    formatter: &Formatter,
) -> Result<BatchReport>
where
    L: LlmProvider,
{
    println!(
        "{}",
        formatter.info(&format!("Scanning {}", input_dir.display()))
    );

    let report = runner.run(input_dir).await;

    if let Some(reason) = &report.directory_error {
        println!(
            "{}",
            formatter.error(&format!("Input directory not available: {}", reason))
        );
        return Ok(report);
    }

    if !report.skipped.is_empty() {
        println!("{}", formatter.skipped_files(&report.skipped));
    }
    println!("{}", formatter.format_records(&report.records)?);

    match JsonSink::new(output_file).write(&report.records)? {
        SinkOutcome::Written(count) => println!(
            "{}",
            formatter.success(&format!(
                "Saved {} of {} file(s) to {}",
                count,
                report.files_seen,
                output_file.display()
            ))
        ),
        SinkOutcome::SkippedEmpty => println!(
            "{}",
            formatter.warning(&format!(
                "No records extracted, {} not written",
                output_file.display()
            ))
        ),
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use fiscal_llm::MockProvider;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"{"nombre_cliente":"Acme","monto":150.5,"fecha":"2024-03-01","tipo_solicitud":"Factura"}"#;

    fn args() -> ExtractArgs {
        ExtractArgs {
            input_dir: None,
            output: None,
            api_key: None,
            model: None,
            max_retries: None,
            timeout: None,
        }
    }

    fn runner(llm: MockProvider) -> BatchRunner<MockProvider> {
        BatchRunner::new(RecordExtractor::new(llm, ExtractorConfig::default()).unwrap())
    }

    #[test]
    fn test_resolve_uses_config_defaults() {
        let config = Config::default();
        let settings = ExtractSettings::resolve(args(), &config).unwrap();

        assert_eq!(settings.input_dir, config.paths.input_dir);
        assert_eq!(settings.output_file, config.paths.output_file);
        assert_eq!(settings.extractor, config.extractor);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_resolve_flags_override() {
        let settings = ExtractSettings::resolve(
            ExtractArgs {
                input_dir: Some(PathBuf::from("docs")),
                model: Some("gemini-2.5-pro".to_string()),
                max_retries: Some(1),
                timeout: Some(30),
                ..args()
            },
            &Config::default(),
        )
        .unwrap();

        assert_eq!(settings.input_dir, PathBuf::from("docs"));
        assert_eq!(settings.gemini.model, "gemini-2.5-pro");
        assert_eq!(settings.extractor.max_retries, 1);
        assert_eq!(settings.extractor.call_timeout_secs, 30);
    }

    #[test]
    fn test_resolve_rejects_zero_retries() {
        let result = ExtractSettings::resolve(
            ExtractArgs {
                max_retries: Some(0),
                ..args()
            },
            &Config::default(),
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_extract(args(), &Config::default(), &formatter).await;
        assert!(matches!(result, Err(CliError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_extract_writes_result_file() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "Factura de Acme").unwrap();
        let output_file = output.path().join("resultado_final.json");

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let report = extract_with(
            &runner(MockProvider::new(VALID)),
            input.path(),
            &output_file,
            &formatter,
        )
        .await
        .unwrap();

        assert_eq!(report.records.len(), 1);
        assert!(fs::read_to_string(&output_file).unwrap().contains("\"a.txt\""));
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_an_error() {
        let output = TempDir::new().unwrap();
        let output_file = output.path().join("resultado_final.json");

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let report = extract_with(
            &runner(MockProvider::new(VALID)),
            &output.path().join("missing"),
            &output_file,
            &formatter,
        )
        .await
        .unwrap();

        assert!(report.directory_error.is_some());
        assert!(!output_file.exists());
    }
}
