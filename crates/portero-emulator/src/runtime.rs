//! Host runtime for the firmware.
//!
//! The firmware expects a timer interrupt preempting a busy polling loop. On
//! the host that becomes two concurrent activities:
//!
//! - a tokio interval task playing the timer ISR; its body runs through
//!   [`MockInterrupts::interrupt`], so it is held off while the dispatcher
//!   is inside a critical section
//! - a blocking thread running [`Dispatcher::step`] until shutdown
//!
//! With the stdio link a third task shuttles scanner input from stdin into
//! the link and report bytes from the link to stdout.

use crate::host::{HostDelay, HostIndicators};
use crate::{EmulatorError, Result};
use portero_core::constants::TICK_PERIOD_MICROS;
use portero_firmware::{Clock, Dispatcher, FirmwareConfig, Peripherals};
use portero_hardware::mock::{MockInterrupts, MockSerialHandle};
use portero_hardware::{AnySerialLink, NonVolatileMemory};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Dispatcher back-off when a pass found nothing to do.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Shortest tick period the ticker will schedule.
const MIN_TICK_PERIOD: Duration = Duration::from_micros(1);

pub struct Emulator {
    config: FirmwareConfig,
    time_scale: f64,
}

impl Emulator {
    /// # Errors
    ///
    /// Returns `EmulatorError::InvalidTimeScale` unless `time_scale` is
    /// positive and finite, or `EmulatorError::Firmware` if `config` does not
    /// validate.
    pub fn new(config: FirmwareConfig, time_scale: f64) -> Result<Self> {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            return Err(EmulatorError::InvalidTimeScale(time_scale));
        }
        config.validate()?;
        Ok(Self { config, time_scale })
    }

    /// Wall-clock period of one timer tick.
    pub fn tick_period(&self) -> Duration {
        let nanos = (TICK_PERIOD_MICROS * 1000) as f64 / self.time_scale;
        Duration::from_nanos(nanos as u64).max(MIN_TICK_PERIOD)
    }

    /// Run the firmware on `link` and `storage` until `shutdown` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if provisioning fails or the dispatcher thread
    /// panics. Step errors are logged and do not stop the loop.
    pub async fn run<S>(
        self,
        link: AnySerialLink,
        storage: S,
        shutdown: Arc<AtomicBool>,
    ) -> Result<()>
    where
        S: NonVolatileMemory + Send + 'static,
    {
        let clock = Arc::new(Clock::new(self.config.ticks_per_second));
        let interrupts = MockInterrupts::new();
        let ticker = spawn_ticker(
            Arc::clone(&clock),
            interrupts.clone(),
            self.tick_period(),
            Arc::clone(&shutdown),
        );

        let peripherals = Peripherals {
            link,
            storage,
            indicators: HostIndicators::new(),
            delay: HostDelay::new(self.time_scale),
            interrupts,
        };
        let config = self.config;
        let worker_shutdown = Arc::clone(&shutdown);
        let worker = tokio::task::spawn_blocking(move || {
            run_dispatcher(&clock, peripherals, &config, &worker_shutdown)
        });

        let outcome = worker.await;
        shutdown.store(true, Ordering::Release);
        ticker.await?;
        outcome??;
        Ok(())
    }
}

fn run_dispatcher<S>(
    clock: &Clock,
    peripherals: Peripherals<AnySerialLink, S, HostIndicators, HostDelay, MockInterrupts>,
    config: &FirmwareConfig,
    shutdown: &AtomicBool,
) -> Result<()>
where
    S: NonVolatileMemory,
{
    let mut dispatcher = Dispatcher::new(clock, peripherals, config)?;
    let provisioning = dispatcher.start()?;
    info!("Firmware running ({:?})", provisioning);

    while !shutdown.load(Ordering::Acquire) {
        match dispatcher.step() {
            Ok(step) => {
                if step.attempt.is_none() && dispatcher.reader().is_empty() {
                    thread::sleep(IDLE_POLL_INTERVAL);
                }
            }
            Err(e) => {
                warn!("Dispatcher step failed: {}", e);
                thread::sleep(IDLE_POLL_INTERVAL);
            }
        }
    }

    info!("Firmware stopped");
    Ok(())
}

/// Spawn the timer ISR: one [`Clock::on_tick`] per `period`.
///
/// Late ticks are delivered in a burst so the seconds count stays true to
/// wall-clock time.
pub fn spawn_ticker(
    clock: Arc<Clock>,
    interrupts: MockInterrupts,
    period: Duration,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        debug!("Ticker started with period {:?}", period);

        while !shutdown.load(Ordering::Acquire) {
            interval.tick().await;
            interrupts.interrupt(|| clock.on_tick());
        }
        debug!("Ticker stopped");
    })
}

/// Read stdin on a plain thread and forward each chunk.
///
/// The thread is detached; a blocked read never holds up runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        let mut stdin = std::io::stdin().lock();
        let mut buf = [0u8; 256];
        loop {
            match stdin.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.blocking_send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {}", e);
                    break;
                }
            }
        }
        debug!("stdin closed");
    });
    rx
}

/// Move scanner input into the link and report bytes out of it.
///
/// Returns once the firmware side of the link has been dropped and every
/// transmitted byte has been written.
///
/// # Errors
///
/// Returns an error if `output` cannot be written.
pub async fn pump<W>(
    mut handle: MockSerialHandle,
    mut input: mpsc::Receiver<Vec<u8>>,
    mut output: W,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut input_open = true;
    loop {
        tokio::select! {
            chunk = input.recv(), if input_open => match chunk {
                Some(bytes) => {
                    if let Err(e) = handle.send(&bytes) {
                        debug!("Dropping scanner input: {}", e);
                    }
                }
                None => input_open = false,
            },
            byte = handle.recv_byte() => match byte {
                Some(byte) => {
                    output.write_all(&[byte]).await?;
                    if byte == b'\n' {
                        output.flush().await?;
                    }
                }
                None => break,
            },
        }
    }
    output.flush().await?;
    Ok(())
}
