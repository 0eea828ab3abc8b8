use anyhow::{Context, Result};
use pingback_pcap::{PcapDumpSink, PcapInjectSink, PcapSource};
use pingback_runtime::{FrameSink, Log, Stack};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Input, ReplyTarget};

mod config;

fn open_source(input: &Input) -> Result<PcapSource> {
    match input {
        Input::File(path) => PcapSource::open_file(path)
            .with_context(|| format!("failed to open capture file {}", path.display())),
        Input::Device(device) => PcapSource::open_device(device)
            .with_context(|| format!("failed to capture on device {}", device)),
    }
}

fn open_sink(target: &ReplyTarget) -> Result<Box<dyn FrameSink>> {
    let sink: Box<dyn FrameSink> = match target {
        ReplyTarget::Savefile(path) => Box::new(
            PcapDumpSink::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        ReplyTarget::Device(device) => Box::new(
            PcapInjectSink::open(device)
                .with_context(|| format!("failed to open device {} for injection", device))?,
        ),
    };
    Ok(sink)
}

fn run(config: Config) -> Result<()> {
    let mut source = open_source(&config.input)?;

    let mut builder = Stack::builder()
        .identity(config.identity)
        .log(Arc::new(Log::stdout(config.format)));
    match &config.replies {
        Some(target) => {
            builder = builder.sink(open_sink(target)?);
            info!(identity = %config.identity, ?target, "responding");
        }
        None => {
            if let Some(path) = &config.output {
                // the savefile is still created and is left with only its header
                PcapDumpSink::create(path)
                    .with_context(|| format!("failed to create output file {}", path.display()))?;
            }
            info!(identity = %config.identity, "monitoring only");
        }
    }
    let stack = builder.build();

    let mut frames = 0usize;
    while let Some(frame) = source.next_frame().context("failed to read frame")? {
        stack
            .handle_frame(&frame)
            .context("failed to send reply")?;
        frames += 1;
    }
    info!(frames, "capture finished");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::from_args(std::env::args_os()).unwrap_or_else(|err| err.exit());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    run(config)
}
