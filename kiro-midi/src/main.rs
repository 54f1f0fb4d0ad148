use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ringbuf::Consumer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kiro_midi::{
  Clock, FrameRate, Generator, MonotonicClock, MtcConfig, Receiver, ReceiverEvent, Timecode,
  TransportError,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Loops MIDI Time Code from a generator into a receiver", long_about = None)]
struct Args {
  /// Start position, hh:mm:ss:ff
  #[arg(short, long, default_value = "00:59:58:00")]
  start: String,

  /// Frame rate (24, 25, 29.97df, 30)
  #[arg(short, long, default_value = "30")]
  rate: FrameRate,

  /// Seconds to run the generator for
  #[arg(short, long, default_value_t = 4)]
  duration: u64,

  /// Log level (error, warn, info, debug, trace)
  #[arg(short, long, default_value = "info")]
  log_level: String,
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(&args.log_level)?;

  let start = Timecode::parse(&args.start, args.rate).context("Invalid start position")?;
  let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());
  let config = MtcConfig::default();

  let (receiver, mut reports) = Receiver::with_ring_buffer(clock.clone(), config.receiver.clone());
  let receiver = Arc::new(receiver);
  receiver.start()?;

  let input = receiver.clone();
  let transport = move |bytes: &[u8]| -> Result<(), TransportError> {
    input
      .midi_in(bytes)
      .map_err(|err| TransportError::Failed(err.to_string()))
  };
  let generator = Generator::with_config(transport, clock.clone(), config.generator.clone());

  info!(%start, rate = %args.rate, seconds = args.duration, "Running MTC loopback");
  generator.locate(start)?;
  generator.start(start, args.rate)?;

  let until = clock.now() + Duration::from_secs(args.duration);
  while clock.now() < until {
    thread::sleep(Duration::from_millis(10));
    log_reports(&mut reports);
  }

  generator.stop();
  let stats = generator.stats();
  info!(
    sent = stats.sent,
    failed = stats.failed,
    skipped = stats.skipped,
    timecode = ?generator.timecode(),
    "Generator stopped"
  );

  thread::sleep(config.receiver.dropout_threshold * 2);
  log_reports(&mut reports);
  receiver.stop();

  Ok(())
}

fn log_reports(reports: &mut Consumer<ReceiverEvent>) {
  while let Some(report) = reports.pop() {
    match report {
      ReceiverEvent::Timecode {
        timecode,
        direction,
      } => info!(%timecode, ?direction, "Timecode"),
      ReceiverEvent::FullFrame(timecode) => info!(%timecode, "Full frame"),
      ReceiverEvent::StateChanged(state) => info!(?state, "Receiver state"),
      ReceiverEvent::Dropout => info!("Dropout"),
    }
  }
}

fn init_logging(level: &str) -> Result<()> {
  let filter = tracing_subscriber::EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer().with_thread_names(true))
    .init();

  Ok(())
}
