//! Request dispatch: resolves colours, runs the drawing operation and builds
//! the response.

use lcd_spi_common::{Color, Status};
use log::{debug, warn};

use crate::{
    color::color_from_index,
    device::{TouchSensor, TransferDevice},
    draw::Lcd,
    error::DrawError,
    ipc::{Request, Response},
};

/// The panel and touchscreen as seen by the socket side.
///
/// Requests are handled one at a time, so the devices never see two
/// interleaved command sequences.
pub struct Daemon<D: TransferDevice, T: TouchSensor> {
    lcd: Lcd<D>,
    touch: T,
}

impl<D: TransferDevice, T: TouchSensor> Daemon<D, T> {
    pub fn new(lcd: Lcd<D>, touch: T) -> Self {
        Daemon { lcd, touch }
    }

    /// Execute `request` and return what should be sent back.
    ///
    /// `None` means the connection is closed without a reply, which only
    /// happens when the touchscreen cannot be read.
    pub fn handle(&mut self, request: Request) -> Option<Response> {
        let tag = request.tag();
        debug!("Handling {} request", tag);
        match request {
            Request::ReadTouchscreen => match self.touch.read_touch() {
                Ok(sample) => {
                    debug!("Touch sample x={} y={} z={}", sample.x, sample.y, sample.z);
                    Some(Response::Touch(sample))
                }
                Err(err) => {
                    warn!("Touchscreen read failed: {}", err);
                    None
                }
            },
            request => {
                let status = match self.draw(request) {
                    Ok(()) => Status::Ok,
                    Err(err) => {
                        warn!("{} request failed: {}", tag, err);
                        err.status()
                    }
                };
                Some(Response::Status(status))
            }
        }
    }

    fn draw(&mut self, request: Request) -> Result<(), DrawError> {
        match request {
            Request::WriteText {
                col,
                row,
                fg,
                bg,
                text,
            } => {
                let (fg, bg) = (color_from_index(fg)?, color_from_index(bg)?);
                self.lcd.draw_text(&text, fg, bg, col, row)
            }
            Request::WriteBitmap { region, pixels } => self.lcd.draw_bitmap(region, &pixels),
            Request::WriteRectangle { region, color } => {
                let color: Color = color_from_index(color)?;
                self.lcd.draw_rectangle(region, color)
            }
            Request::ReadTouchscreen => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use lcd_spi_common::{PANEL_BYTES, TouchSample};

    use super::*;
    use crate::{
        controller,
        device::test_spy::{Sent, TestSpyDevice, TestTouch},
        region::Region,
    };

    fn daemon(touch: Option<TouchSample>) -> (Daemon<TestSpyDevice, TestTouch>, TestSpyDevice) {
        let spy = TestSpyDevice::new(PANEL_BYTES);
        let daemon = Daemon::new(Lcd::new(spy.split()), TestTouch::new(touch));
        (daemon, spy)
    }

    #[test]
    fn test_rectangle_ok() {
        let (mut daemon, spy) = daemon(None);
        let response = daemon.handle(Request::WriteRectangle {
            region: Region::new(0, 0, 2, 1),
            color: 2,
        });
        assert_eq!(response, Some(Response::Status(Status::Ok)));
        assert_eq!(
            spy.sent().last(),
            Some(&Sent::Data(vec![0xF8, 0x00, 0xF8, 0x00]))
        );
    }

    #[test]
    fn test_invalid_color_index() {
        let (mut daemon, spy) = daemon(None);
        let response = daemon.handle(Request::WriteRectangle {
            region: Region::new(0, 0, 2, 1),
            color: 8,
        });
        assert_eq!(response, Some(Response::Status(Status::InvalidColor)));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_text_invalid_background_index() {
        let (mut daemon, spy) = daemon(None);
        let response = daemon.handle(Request::WriteText {
            col: 0,
            row: 0,
            fg: 1,
            bg: 200,
            text: b"hi".to_vec(),
        });
        assert_eq!(response, Some(Response::Status(Status::InvalidColor)));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_text_invalid_character() {
        let (mut daemon, _spy) = daemon(None);
        let response = daemon.handle(Request::WriteText {
            col: 0,
            row: 0,
            fg: 1,
            bg: 0,
            text: vec![b'a', 0x07],
        });
        assert_eq!(response, Some(Response::Status(Status::InvalidCharacter)));
    }

    #[test]
    fn test_bitmap_out_of_bounds() {
        let (mut daemon, spy) = daemon(None);
        let response = daemon.handle(Request::WriteBitmap {
            region: Region::new(239, 0, 2, 1),
            pixels: vec![0; 4],
        });
        assert_eq!(response, Some(Response::Status(Status::OutOfBounds)));
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_device_error_status() {
        let (mut daemon, spy) = daemon(None);
        spy.fail_at(2);
        let response = daemon.handle(Request::WriteBitmap {
            region: Region::new(0, 0, 1, 1),
            pixels: vec![0xFF, 0xFF],
        });
        assert_eq!(response, Some(Response::Status(Status::DeviceError)));
        assert_eq!(spy.sent().len(), 2);
        assert!(matches!(spy.sent()[1], Sent::CmdData(controller::PASET, _)));
    }

    #[test]
    fn test_touch_sample() {
        let sample = TouchSample::new(1500, 2200, 340);
        let (mut daemon, spy) = daemon(Some(sample));
        assert_eq!(
            daemon.handle(Request::ReadTouchscreen),
            Some(Response::Touch(sample))
        );
        assert!(spy.sent().is_empty());
    }

    #[test]
    fn test_touch_failure_has_no_response() {
        let (mut daemon, _spy) = daemon(None);
        assert_eq!(daemon.handle(Request::ReadTouchscreen), None);
    }

    #[test]
    fn test_missing_touch_device() {
        let spy = TestSpyDevice::new(PANEL_BYTES);
        let mut daemon = Daemon::new(Lcd::new(spy.split()), None::<TestTouch>);
        assert_eq!(daemon.handle(Request::ReadTouchscreen), None);
    }
}
