use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use audio_remediation::{
    cli::{handle_commands, CliArgs, OutputFormat},
    config::Config,
    probe::{parse_probe_output, ProbedFile, Prober},
    utils::{find_media_files, setup_logging, Error, Result},
    RemediationDecision, RemediationEngine,
};

enum Source {
    Media(PathBuf),
    ProbeJson(PathBuf),
}

impl Source {
    fn path(&self) -> &Path {
        match self {
            Self::Media(path) | Self::ProbeJson(path) => path,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    if !args.is_info_command() && !args.has_inputs() {
        use clap::CommandFactory;
        CliArgs::command().print_help()?;
        println!();
        return Ok(());
    }

    args.validate()?;

    let mut config = Config::load_with_fallback(&args.config)?;
    args.apply_overrides(&mut config.remediation);
    config.validate()?;

    setup_logging(
        args.get_log_level(&config.logging.level),
        config.logging.show_timestamps,
        config.logging.colored_output && args.should_use_color(),
    )?;

    if handle_commands(&args, &config).await? {
        return Ok(());
    }

    let prober = Prober::new(config.tools.ffprobe.clone());
    if !args.input.is_empty() {
        prober.check_availability().await?;
    }

    let mut sources = Vec::new();
    for input in &args.input {
        sources.extend(find_media_files(input)?.into_iter().map(Source::Media));
    }
    sources.extend(args.probe_json.iter().cloned().map(Source::ProbeJson));

    info!("Found {} file(s) to inspect", sources.len());

    let engine = RemediationEngine::new(config.remediation.clone());
    if engine.options().is_unconfigured() {
        warn!("No remediation option is set (aac_stereo, downmix, rename); every file will be skipped");
    }

    let mut decisions = Vec::new();
    let mut failed_files = Vec::new();

    for (index, source) in sources.iter().enumerate() {
        info!(
            "Processing file {}/{}: {}",
            index + 1,
            sources.len(),
            source.path().display()
        );

        match load_source(&prober, source).await {
            Ok(file) => {
                let file = match args.medium {
                    Some(medium) => file.with_medium(medium),
                    None => file,
                };
                debug!("File medium: {}", file.file_medium.as_str());
                let decision = engine.evaluate(&file);
                decision.events.replay();
                decisions.push((source.path().to_path_buf(), decision));
            }
            Err(e) => {
                let error_msg = format!("Failed to inspect {}: {}", source.path().display(), e);
                error!("{}", error_msg);
                failed_files.push((source.path().to_path_buf(), error_msg));
            }
        }
    }

    print_decisions(&decisions, args.format)?;

    if !failed_files.is_empty() {
        warn!(
            "Inspection complete: {} succeeded, {} failed",
            decisions.len(),
            failed_files.len()
        );
    }

    if decisions.is_empty() && !failed_files.is_empty() {
        return Err(Error::validation("All files failed to inspect"));
    }

    Ok(())
}

async fn load_source(prober: &Prober, source: &Source) -> Result<ProbedFile> {
    match source {
        Source::Media(path) => prober.probe(path).await,
        Source::ProbeJson(path) => {
            let json = tokio::fs::read_to_string(path).await?;
            parse_probe_output(&json, None)
        }
    }
}

fn print_decisions(decisions: &[(PathBuf, RemediationDecision)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = decisions
                .iter()
                .map(|(path, decision)| {
                    serde_json::json!({
                        "path": path.display().to_string(),
                        "decision": decision,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            for (path, decision) in decisions {
                println!("{}", path.display());
                for line in decision.info_log.lines() {
                    println!("  {}", line);
                }
                if let Some(preset) = &decision.preset {
                    let added = decision.actions.iter().filter(|a| a.is_synthetic()).count();
                    println!("  container: {}", decision.container);
                    println!("  new audio tracks: {}", added);
                    println!("  preset: {}", preset);
                }
            }
        }
    }

    Ok(())
}
