//! 命令列介面

mod args;
mod progress;

pub use args::{ArgsError, CliArgs};
pub use progress::ProgressObserver;

use crate::component::preview_generator::{
    LogObserver, ObserverFanout, PipelineObserver, PipelineOptions, PreviewJob, PreviewPipeline,
};
use crate::config::Config;
use crate::signal::setup_shutdown_signal;
use crate::tools::SystemProcessRunner;
use anyhow::Result;
use console::style;
use log::info;
use rust_i18n::t;
use std::process::ExitCode;
use std::sync::Arc;

/// 執行命令列；參數錯誤只印出訊息，不視為失敗
pub fn run(raw_args: &[String]) -> Result<ExitCode> {
    let config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok();
    let args = match CliArgs::parse(raw_args, home.as_deref()) {
        Ok(args) => args,
        Err(e) => {
            print_args_error(&e);
            return Ok(ExitCode::SUCCESS);
        }
    };

    let settings = &config.settings;
    let job = PreviewJob::new(
        &args.video_path,
        args.output_dir.clone(),
        args.interval_secs.unwrap_or(settings.thumb_interval_secs),
        args.thumb_width.unwrap_or(settings.thumb_width),
    )?;

    let observer: Arc<dyn PipelineObserver> = Arc::new(ObserverFanout::new(vec![
        Arc::new(LogObserver),
        Arc::new(ProgressObserver::new()),
    ]));
    let runner = Arc::new(SystemProcessRunner::new(Arc::clone(&observer)));
    let pipeline = PreviewPipeline::new(runner, PipelineOptions::from(settings))
        .with_observer(observer)
        .with_shutdown_signal(setup_shutdown_signal()?);

    match pipeline.run(&job) {
        Ok(artifact) => {
            let (width, height) = artifact.layout.sprite_size();
            info!(
                "{} 張縮圖，網格 {}x{}，預覽圖 {width}x{height}",
                artifact.thumbnail_count, artifact.layout.columns, artifact.layout.rows
            );
            println!(
                "{}",
                style(t!(
                    "cli.done",
                    path = artifact.output_dir.display().to_string()
                ))
                .green()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!(
                "{} {}",
                style(t!("cli.failed", stage = e.stage.to_string())).red().bold(),
                e.source
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_args_error(error: &ArgsError) {
    let message = match error {
        ArgsError::MissingVideo => t!("cli.usage").to_string(),
        ArgsError::VideoNotFound(path) => {
            t!("cli.video_missing", path = path.display().to_string()).to_string()
        }
        ArgsError::InvalidNumber { name, value } => {
            t!("cli.invalid_number", name = *name, value = value.as_str()).to_string()
        }
    };
    println!("{} {}", style(t!("cli.error_prefix")).red().bold(), message);
    if !matches!(error, ArgsError::MissingVideo) {
        println!("{}", style(t!("cli.usage")).dim());
    }
}
