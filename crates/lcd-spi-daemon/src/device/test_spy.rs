//! Transfer and touch devices for unit tests that record whatever was sent
//! to them.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use lcd_spi_common::TouchSample;

use super::{READ_OVERHEAD, TouchSensor, TransferDevice};
use crate::error::DeviceError;

/// One recorded device call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Cmd(u8),
    CmdData(u8, Vec<u8>),
    Data(Vec<u8>),
    Read(u8, usize),
    Reset,
}

#[derive(Default)]
struct SpyState {
    sent: Vec<Sent>,
    reads: VecDeque<Vec<u8>>,
    fail_at: Option<usize>,
}

/// Spy transfer device.
///
/// Clones share the same record, so a test can keep one handle while the
/// engine owns the other (see [TestSpyDevice::split]).
#[derive(Clone)]
pub struct TestSpyDevice {
    state: Rc<RefCell<SpyState>>,
    max_transfer: usize,
}

impl TestSpyDevice {
    pub fn new(max_transfer: usize) -> Self {
        TestSpyDevice {
            state: Rc::new(RefCell::new(SpyState::default())),
            max_transfer,
        }
    }

    /// Another handle to the same record.
    pub fn split(&self) -> Self {
        self.clone()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.borrow().sent.clone()
    }

    /// Queue the bytes returned by the next `read` call, as they are, even
    /// when shorter than asked for.
    ///
    /// Reads without a queued answer return zeroes.
    pub fn queue_read(&self, data: Vec<u8>) {
        self.state.borrow_mut().reads.push_back(data);
    }

    /// Make the call with the given (0-based) index fail.
    pub fn fail_at(&self, call: usize) {
        self.state.borrow_mut().fail_at = Some(call);
    }

    fn record(&self, sent: Sent) -> Result<(), DeviceError> {
        let mut state = self.state.borrow_mut();
        if state.fail_at == Some(state.sent.len()) {
            return Err(DeviceError::Io(std::io::Error::other("injected failure")));
        }
        state.sent.push(sent);
        Ok(())
    }

    fn check_len(&self, len: usize) -> Result<(), DeviceError> {
        assert!(
            len <= self.max_transfer,
            "transfer of {} bytes exceeds the {} byte limit",
            len,
            self.max_transfer
        );
        Ok(())
    }
}

impl TransferDevice for TestSpyDevice {
    fn write_command(&mut self, cmd: u8) -> Result<(), DeviceError> {
        self.record(Sent::Cmd(cmd))
    }

    fn write_command_with_data(&mut self, cmd: u8, data: &[u8]) -> Result<(), DeviceError> {
        self.check_len(data.len() + 1)?;
        self.record(Sent::CmdData(cmd, data.to_vec()))
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), DeviceError> {
        self.check_len(data.len())?;
        self.record(Sent::Data(data.to_vec()))
    }

    fn read(&mut self, cmd: u8, len: usize) -> Result<Vec<u8>, DeviceError> {
        self.check_len(len + READ_OVERHEAD)?;
        self.record(Sent::Read(cmd, len))?;
        let queued = self.state.borrow_mut().reads.pop_front();
        Ok(queued.unwrap_or_else(|| vec![0; len]))
    }

    fn reset(&mut self) -> Result<(), DeviceError> {
        self.record(Sent::Reset)
    }

    fn max_transfer(&self) -> usize {
        self.max_transfer
    }
}

/// Touch sensor returning a fixed sample, or failing when built with `None`.
pub struct TestTouch {
    sample: Option<TouchSample>,
}

impl TestTouch {
    pub fn new(sample: Option<TouchSample>) -> Self {
        TestTouch { sample }
    }
}

impl TouchSensor for TestTouch {
    fn read_touch(&mut self) -> Result<TouchSample, DeviceError> {
        self.sample.ok_or(DeviceError::ShortTransfer {
            expected: 3,
            actual: 0,
        })
    }
}
