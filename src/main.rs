use anyhow::Result;
use std::process::ExitCode;
use vtt_video_previews::{cli, init};

fn main() -> Result<ExitCode> {
    init::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::run(&args)
}
