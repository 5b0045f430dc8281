//! Client side of the daemon socket: one connection per request.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow, bail, ensure};
use lcd_spi_common::{
    Color, CommandTag, G_MAX, Header, Pixel, RB_MAX, Status, TouchSample, channels_in_range,
    pack_rgb565,
};
use log::{debug, trace};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
};

/// Pack a 5-6-5 colour into the two bytes the panel expects.
pub fn pixel(red: u8, green: u8, blue: u8) -> Result<Pixel> {
    ensure!(
        channels_in_range(red, green, blue),
        "colour ({}, {}, {}) out of range, channels are at most ({}, {}, {})",
        red,
        green,
        blue,
        RB_MAX,
        G_MAX,
        RB_MAX
    );
    Ok(pack_rgb565(red, green, blue))
}

/// Daemon socket handle.
#[derive(Clone, Debug)]
pub struct Client {
    socket: PathBuf,
}

impl Client {
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Client {
            socket: socket.into(),
        }
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    async fn connect(&self) -> Result<UnixStream> {
        UnixStream::connect(&self.socket)
            .await
            .with_context(|| format!("connecting to {}", self.socket.display()))
    }

    /// Send a drawing command and wait for its status.
    async fn draw(&self, tag: CommandTag, header: Header, payload: &[u8]) -> Result<()> {
        let mut stream = self.connect().await?;
        let mut request = Vec::with_capacity(CommandTag::SIZE + Header::SIZE + payload.len());
        request.extend_from_slice(&tag.to_bytes());
        request.extend_from_slice(&header.to_bytes());
        request.extend_from_slice(payload);
        trace!("Sending {} request of {} bytes", tag, request.len());
        stream.write_all(&request).await.context("sending request")?;

        let mut reply = [0u8; Status::SIZE];
        stream
            .read_exact(&mut reply)
            .await
            .with_context(|| format!("daemon closed the connection without answering {}", tag))?;
        let status =
            Status::from_bytes(&reply).map_err(|raw| anyhow!("unknown status code {}", raw))?;
        debug!("{} answered with {}", tag, status);
        if !status.is_ok() {
            bail!("{} request failed: {}", tag, status);
        }
        Ok(())
    }

    pub async fn write_text(
        &self,
        text: &str,
        col: u16,
        row: u16,
        fg: Color,
        bg: Color,
    ) -> Result<()> {
        let len = u16::try_from(text.len()).context("text too long")?;
        let header = Header::text(col, row, len, fg.index(), bg.index());
        self.draw(CommandTag::WriteText, header, text.as_bytes()).await
    }

    pub async fn write_bitmap(
        &self,
        x: u16,
        y: u16,
        dx: u16,
        dy: u16,
        pixels: &[u8],
    ) -> Result<()> {
        self.draw(CommandTag::WriteBitmap, Header::new(x, y, dx, dy), pixels).await
    }

    pub async fn write_rectangle(
        &self,
        color: Color,
        x: u16,
        y: u16,
        dx: u16,
        dy: u16,
    ) -> Result<()> {
        self.draw(
            CommandTag::WriteRectangle,
            Header::new(x, y, dx, dy),
            &[color.index()],
        )
        .await
    }

    pub async fn read_touchscreen(&self) -> Result<TouchSample> {
        let mut stream = self.connect().await?;
        stream
            .write_all(&CommandTag::ReadTouchscreen.to_bytes())
            .await
            .context("sending request")?;
        let mut reply = [0u8; TouchSample::SIZE];
        stream
            .read_exact(&mut reply)
            .await
            .context("daemon could not read the touchscreen")?;
        Ok(TouchSample::from_bytes(&reply))
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use tokio::net::UnixListener;

    use super::*;

    fn socket_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        std::env::temp_dir().join(format!("lcd-spi-client-{}-{}.sock", name, nanos))
    }

    /// Accept one connection, read `expected` bytes and answer with `reply`.
    async fn serve_once(listener: UnixListener, expected: usize, reply: Vec<u8>) -> Vec<u8> {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; expected];
        stream.read_exact(&mut request).await.unwrap();
        stream.write_all(&reply).await.unwrap();
        request
    }

    #[test]
    fn test_pixel_checks_channels() {
        assert_eq!(pixel(31, 0, 0).unwrap(), [0xF8, 0x00]);
        assert_eq!(pixel(RB_MAX, G_MAX, RB_MAX).unwrap(), [0xFF, 0xFF]);
        assert!(pixel(32, 0, 0).is_err());
        assert!(pixel(0, 64, 0).is_err());
        assert!(pixel(0, 0, 255).is_err());
    }

    #[tokio::test]
    async fn test_rectangle_request_bytes() {
        let path = socket_path("rect");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(serve_once(listener, 13, Status::Ok.to_bytes().to_vec()));

        let client = Client::new(&path);
        client
            .write_rectangle(Color::Green, 1, 2, 3, 4)
            .await
            .unwrap();
        let request = server.await.unwrap();
        assert_eq!(
            request,
            vec![3, 0, 0, 0, 1, 0, 2, 0, 3, 0, 4, 0, Color::Green.index()]
        );
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_error_status() {
        let path = socket_path("status");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(serve_once(
            listener,
            14,
            Status::InvalidCharacter.to_bytes().to_vec(),
        ));

        let client = Client::new(&path);
        let result = client
            .write_text("hi", 0, 0, Color::White, Color::Black)
            .await;
        assert!(result.is_err());
        let request = server.await.unwrap();
        assert_eq!(&request[4..12], &[0, 0, 0, 0, 2, 0, 0, 1]);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_touch_sample() {
        let path = socket_path("touch");
        let listener = UnixListener::bind(&path).unwrap();
        let reply = TouchSample::new(100, 200, 300).to_bytes().to_vec();
        let server = tokio::spawn(serve_once(listener, 4, reply));

        let sample = Client::new(&path).read_touchscreen().await.unwrap();
        assert_eq!(sample, TouchSample::new(100, 200, 300));
        assert_eq!(server.await.unwrap(), vec![4, 0, 0, 0]);
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_closed_without_answer() {
        let path = socket_path("closed");
        let listener = UnixListener::bind(&path).unwrap();
        let server = tokio::spawn(serve_once(listener, 4, Vec::new()));

        assert!(Client::new(&path).read_touchscreen().await.is_err());
        server.await.unwrap();
        std::fs::remove_file(&path).unwrap();
    }
}
