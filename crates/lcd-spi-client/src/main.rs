use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use lcd_spi_common::{
    Color, DEFAULT_SOCKET_PATH, PANEL_HEIGHT, PANEL_WIDTH, TEXT_COLUMNS, TouchSample,
};
use log::info;

mod client;

use client::{Client, pixel};

/// Row the watch mode echoes touch samples on
const WATCH_ROW: u16 = 21;

/// lcd-spi: draw on the SPI panel and read its touchscreen through
/// lcd-spi-daemon.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Opts {
    /// Path of the daemon socket.
    #[arg(long, default_value = DEFAULT_SOCKET_PATH)]
    socket: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write text starting at a character cell.
    Text {
        text: String,
        #[arg(long, default_value_t = 40)]
        col: u16,
        #[arg(long, default_value_t = 39)]
        row: u16,
        #[arg(long, default_value_t = Color::White)]
        fg: Color,
        #[arg(long, default_value_t = Color::Black)]
        bg: Color,
    },
    /// Fill a region with a single 5-6-5 colour, sent as a bitmap.
    Bitmap {
        red: u8,
        green: u8,
        blue: u8,
        #[arg(long, default_value_t = 0)]
        x: u16,
        #[arg(long, default_value_t = 0)]
        y: u16,
        #[arg(long, default_value_t = PANEL_WIDTH)]
        dx: u16,
        #[arg(long, default_value_t = PANEL_HEIGHT)]
        dy: u16,
    },
    /// Fill a region with a palette colour.
    Rectangle {
        color: Color,
        x: u16,
        y: u16,
        dx: u16,
        dy: u16,
    },
    /// Read the touchscreen.
    Touch {
        /// Keep sampling and echo each sample on the panel.
        #[arg(long)]
        watch: bool,
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

fn format_sample(sample: &TouchSample) -> String {
    format!(
        "x = {:03}, y = {:03}, z = {:03}",
        sample.x, sample.y, sample.z
    )
}

/// First column that centres `len` characters on a text row.
fn centred_column(len: usize) -> u16 {
    (TEXT_COLUMNS as usize).saturating_sub(len) as u16 / 2
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts = Opts::parse();
    env_logger::init();
    let client = Client::new(opts.socket);

    match opts.command {
        Command::Text {
            text,
            col,
            row,
            fg,
            bg,
        } => client.write_text(&text, col, row, fg, bg).await?,
        Command::Bitmap {
            red,
            green,
            blue,
            x,
            y,
            dx,
            dy,
        } => {
            let pixels = pixel(red, green, blue)?.repeat(dx as usize * dy as usize);
            client.write_bitmap(x, y, dx, dy, &pixels).await?
        }
        Command::Rectangle {
            color,
            x,
            y,
            dx,
            dy,
        } => client.write_rectangle(color, x, y, dx, dy).await?,
        Command::Touch { watch, interval_ms } => {
            if !watch {
                println!("{}", format_sample(&client.read_touchscreen().await?));
                return Ok(());
            }
            info!("Watching touchscreen on {}", client.socket().display());
            let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
            loop {
                interval.tick().await;
                let line = format_sample(&client.read_touchscreen().await?);
                println!("{}", line);
                client
                    .write_text(
                        &line,
                        centred_column(line.len()),
                        WATCH_ROW,
                        Color::White,
                        Color::Black,
                    )
                    .await?;
            }
        }
    }
    Ok(())
}
