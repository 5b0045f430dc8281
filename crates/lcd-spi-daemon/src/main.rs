use std::{fs::OpenOptions, path::PathBuf, time::Duration};

use anyhow::{Context as _, Result};
use clap::Parser;
use lcd_spi_common::{Color, DEFAULT_SOCKET_PATH};
use lcd_spi_daemon::{
    Daemon,
    device::spi::{
        DEFAULT_LCD_DEVICE, DEFAULT_MAX_TRANSFER, DEFAULT_TOUCH_DEVICE, MIN_MAX_TRANSFER, SpiLcd,
        SpiTouch,
    },
    draw::Lcd,
    ipc::listener,
};
use log::{info, warn};

/// lcd-spi-daemon: owner of the SPI panel and touchscreen.
///
/// Serves drawing and touchscreen requests from local clients over a Unix
/// stream socket, one request per connection, one connection at a time.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// Path of the listening socket.
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    /// LCD transfer device.
    #[arg(long, default_value = DEFAULT_LCD_DEVICE)]
    lcd_device: PathBuf,

    /// Touchscreen transfer device, optional at runtime.
    #[arg(long, default_value = DEFAULT_TOUCH_DEVICE)]
    touch_device: PathBuf,

    /// Give up on a client that sends nothing for this long.
    #[arg(long, default_value_t = 5000)]
    read_timeout_ms: u64,

    /// Largest single transfer the LCD device accepts, in bytes.
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_TRANSFER,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
            .range(MIN_MAX_TRANSFER as u64..),
    )]
    max_transfer: usize,

    /// Fill the panel with this colour after initialisation.
    #[arg(long)]
    clear: Option<Color>,

    /// Append log lines to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts = Opts::parse();
    init_logging(opts.log_file.as_ref())?;
    info!("lcd-spi-daemon starting...");

    let device = SpiLcd::open(&opts.lcd_device, opts.max_transfer)
        .with_context(|| format!("opening LCD device {}", opts.lcd_device.display()))?;
    let touch = match SpiTouch::open(&opts.touch_device) {
        Ok(touch) => Some(touch),
        Err(e) => {
            warn!(
                "Touchscreen {} unavailable: {}",
                opts.touch_device.display(),
                e
            );
            None
        }
    };

    let mut lcd = Lcd::new(device);
    lcd.init(std::thread::sleep).context("initialising panel")?;
    if let Some(color) = opts.clear {
        lcd.clear(color).context("clearing panel")?;
    }
    let mut daemon = Daemon::new(lcd, touch);

    let socket = listener::bind(&opts.socket, listener::BACKLOG)
        .with_context(|| format!("binding socket {}", opts.socket.display()))?;
    info!("Listening on {}", opts.socket.display());

    let read_timeout = Duration::from_millis(opts.read_timeout_ms);
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    };
    listener::serve(&socket, &mut daemon, read_timeout, ctrl_c).await;

    drop(socket);
    if let Err(e) = std::fs::remove_file(&opts.socket) {
        warn!("Failed to remove socket {}: {}", opts.socket.display(), e);
    }
    info!("lcd-spi-daemon shutting down.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_transfer_lower_bound() {
        let parse = |value| Opts::try_parse_from(["lcd-spi-daemon", "--max-transfer", value]);
        assert!(parse("0").is_err());
        assert!(parse("4").is_err());
        assert_eq!(parse("5").unwrap().max_transfer, MIN_MAX_TRANSFER);
        assert_eq!(parse("4096").unwrap().max_transfer, 4096);
    }

    #[test]
    fn test_defaults() {
        let opts = Opts::try_parse_from(["lcd-spi-daemon"]).unwrap();
        assert_eq!(opts.max_transfer, DEFAULT_MAX_TRANSFER);
        assert_eq!(opts.read_timeout_ms, 5000);
        assert_eq!(opts.clear, None);
    }
}
