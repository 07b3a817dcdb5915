use anyhow::Context;
use clap::Parser;
use portero_emulator::{Args, Emulator, FileEeprom, pump, spawn_stdin_reader};
use portero_hardware::mock::MockSerial;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs on stderr; stdout carries only the serial report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = args.load_config().context("loading configuration")?;
    let storage = FileEeprom::open(&args.eeprom)
        .with_context(|| format!("opening EEPROM image {}", args.eeprom.display()))?;
    let emulator = Emulator::new(config, args.time_scale)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupted, shutting down"),
            Err(e) => warn!("Cannot listen for ctrl-c: {}", e),
        }
        signal.store(true, Ordering::Release);
    });

    #[cfg(feature = "hardware-serial")]
    if let Some(port) = &args.port {
        let link = portero_hardware::port::PortSerial::open_with_baud(port, args.baud)
            .with_context(|| format!("opening serial port {port}"))?;
        info!("Using serial port {} at {} baud", port, args.baud);
        emulator.run(link.into(), storage, shutdown).await?;
        return Ok(());
    }

    info!("Reading scanner codes from stdin");
    let (link, handle) = MockSerial::with_name("stdio".to_string());
    let io = tokio::spawn(pump(handle, spawn_stdin_reader(), tokio::io::stdout()));

    emulator.run(link.into(), storage, shutdown).await?;
    io.await??;
    Ok(())
}
