//! Command implementations

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::app::AppContainer;
use crate::cli::args::{FinishArgs, MergeArgs, TrimArgs};
use crate::cli::prompt::prompt_millis;
use crate::cli::ReportFormat;
use crate::domain::model::{
    CleanReport, LanguageTags, MergeReport, TimingParams, TrimReport, CANONICAL_NAME,
};

/// Timing from the arguments, asking on the console for anything missing
///
/// Prompts go to stderr; stdout carries only the report.
pub fn timing_from_args(args: &TrimArgs) -> Result<TimingParams> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();

    let ad_length_ms = match args.ad_length {
        Some(ms) => ms,
        None => prompt_millis(&mut input, &mut output, "Advertisement length (ms): ")
            .context("Failed to read the advertisement length")?,
    };
    let estimated_key_frame_ms = match args.key_frame {
        Some(ms) => ms,
        None => prompt_millis(&mut input, &mut output, "Estimated keyframe (ms): ")
            .context("Failed to read the keyframe estimate")?,
    };

    Ok(TimingParams::new(ad_length_ms, estimated_key_frame_ms)?)
}

/// Execute the trim command
pub async fn trim(
    container: &dyn AppContainer,
    workdir: &Path,
    args: &TrimArgs,
    format: ReportFormat,
) -> Result<TrimReport> {
    let report = run_trim(container, workdir, args).await?;
    emit(format, &report, trim_summary(&report))?;
    Ok(report)
}

/// Execute the merge command
pub async fn merge(
    container: &dyn AppContainer,
    workdir: &Path,
    args: &MergeArgs,
    format: ReportFormat,
) -> Result<MergeReport> {
    let report = run_merge(container, workdir, args).await?;
    emit(format, &report, merge_summary(&report))?;
    Ok(report)
}

/// Execute the clean command
pub async fn clean(
    container: &dyn AppContainer,
    workdir: &Path,
    format: ReportFormat,
) -> Result<CleanReport> {
    let report = run_clean(container, workdir).await?;
    emit(format, &report, format!("Optimized {}", CANONICAL_NAME))?;
    Ok(report)
}

/// Report of the whole finish run
#[derive(Debug, Serialize)]
pub struct FinishReport {
    pub trim: TrimReport,
    pub merge: MergeReport,
    pub clean: CleanReport,
}

/// Execute trim, merge and clean in order
pub async fn finish(
    container: &dyn AppContainer,
    workdir: &Path,
    args: &FinishArgs,
    format: ReportFormat,
) -> Result<FinishReport> {
    let trim = run_trim(container, workdir, &args.trim).await?;
    let merge = run_merge(container, workdir, &args.merge).await?;
    let clean = run_clean(container, workdir).await?;
    info!("Episode finished: {}", workdir.join(CANONICAL_NAME).display());

    let summary = format!(
        "{}\n{}\nOptimized {}",
        trim_summary(&trim),
        merge_summary(&merge),
        CANONICAL_NAME
    );
    let report = FinishReport { trim, merge, clean };
    emit(format, &report, summary)?;
    Ok(report)
}

/// Execute the config command
pub fn show_config(config: &AppConfig) -> Result<()> {
    print!("{}", TomlConfigAdapter::render(config)?);
    Ok(())
}

async fn run_trim(
    container: &dyn AppContainer,
    workdir: &Path,
    args: &TrimArgs,
) -> Result<TrimReport> {
    let timing = timing_from_args(args)?;
    container
        .trim_interactor()
        .execute(workdir, timing)
        .await
        .context("Trim pipeline failed")
}

async fn run_merge(
    container: &dyn AppContainer,
    workdir: &Path,
    args: &MergeArgs,
) -> Result<MergeReport> {
    let languages = LanguageTags::new(args.audio_lang.clone(), args.subtitle_lang.clone());
    container
        .merge_interactor()
        .execute(workdir, languages)
        .await
        .context("Subtitle merge failed")
}

async fn run_clean(container: &dyn AppContainer, workdir: &Path) -> Result<CleanReport> {
    container
        .clean_interactor()
        .execute(workdir)
        .await
        .context("Container optimization failed")
}

fn trim_summary(report: &TrimReport) -> String {
    format!(
        "Trimmed {} ms advertisement (keyframe gap {} ms at {} fps)",
        report.timing.ad_length_ms,
        report.key_frame_gap_ms,
        report.frame_rate.to_arg()
    )
}

fn merge_summary(report: &MergeReport) -> String {
    if report.subtitles_merged {
        format!(
            "Merged {} subtitles, audio tagged {}",
            report.languages.subtitle, report.languages.audio
        )
    } else {
        format!("Audio tagged {}", report.languages.audio)
    }
}

fn emit<T: Serialize>(format: ReportFormat, report: &T, summary: String) -> Result<()> {
    match format {
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            println!("{}", json);
        }
        ReportFormat::Text => println!("{}", summary),
    }
    Ok(())
}
