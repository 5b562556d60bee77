//! Compile command implementation.

use crate::cli::CompileArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::render::render_markdown;
use dossier_domain::{OutputDocument, Template};
use dossier_extractor::prompt::SYSTEM_PROMPT;
use dossier_extractor::{Compiler, ExtractorConfig, Granularity, LlmCollaborator};
use dossier_gatekeeper::Gatekeeper;
use dossier_janitor::Janitor;
use dossier_llm::openai::DEFAULT_MODEL;
use dossier_llm::OpenAiProvider;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Execute the compile command.
pub async fn execute_compile(args: CompileArgs, config: Config, formatter: &Formatter) -> Result<()> {
    // Configuration-level failures abort before any document is read.
    let template = Template::from_path(&args.template)?;
    let api_key = api_key_from_env()?;
    let extractor_config = effective_extractor_config(config.extractor.clone(), &args);
    extractor_config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let model = args
        .model
        .clone()
        .or_else(|| config.openai.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let mut provider = OpenAiProvider::new(api_key, &model)?.with_system_prompt(SYSTEM_PROMPT);
    if let Some(base_url) = args.base_url.clone().or_else(|| config.openai.base_url.clone()) {
        provider = provider.with_base_url(base_url);
    }
    if let Some(secs) = config.openai.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs))?;
    }
    if let Some(max_retries) = config.openai.max_retries {
        provider = provider.with_max_retries(max_retries);
    }

    println!(
        "{}",
        formatter.info(&format!(
            "Compiling {} with {} ({} granularity, {} fields)",
            args.docs.display(),
            provider.model(),
            extractor_config.granularity,
            template.catalog().len()
        ))
    );

    let compiler = Compiler::new(LlmCollaborator::new(provider), extractor_config)
        .with_gatekeeper(Gatekeeper::new(config.validation))
        .with_janitor(Janitor::new(config.janitor));

    let result = compiler.compile_dir(&template, &args.docs).await?;

    write_json(&args.out_json, &result.document)?;
    println!("{}", formatter.success(&format!("Wrote JSON: {}", args.out_json.display())));

    if !args.no_md {
        write_text(&args.out_md, &render_markdown(&result.document))?;
        println!("{}", formatter.success(&format!("Wrote Markdown: {}", args.out_md.display())));
    }

    println!("\n{}", formatter.compile_summary(&result.report));
    Ok(())
}

/// Apply command-line overrides to the configured extractor settings.
pub fn effective_extractor_config(base: ExtractorConfig, args: &CompileArgs) -> ExtractorConfig {
    ExtractorConfig {
        max_chunk_chars: args.max_chunk_chars.unwrap_or(base.max_chunk_chars),
        granularity: args
            .granularity
            .map(Granularity::from)
            .unwrap_or(base.granularity),
        max_concurrency: args.concurrency.unwrap_or(base.max_concurrency),
        ..base
    }
}

fn api_key_from_env() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingCredential("OPENAI_API_KEY"))
}

/// Write the document as pretty JSON, creating parent directories.
pub fn write_json(path: &Path, document: &OutputDocument) -> Result<()> {
    let json = serde_json::to_string_pretty(&document.to_value())?;
    write_text(path, &json)
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
