//! Scripted transport mock
//!
//! Implements the transport traits over shared in-memory state so the
//! scenario tests can script bus contents (which identities are present,
//! after how many polls) and device behavior (control responses, forced
//! transfer failures, kernel-driver state), then inspect every operation
//! the code under test issued.

use crate::usb::transport::{UsbHandle, UsbHost};
use common::{Error, Result};
use protocol::{ControlRequest, DeviceIdentity};
use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

/// A recorded host-to-device control transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlWrite {
    pub request: ControlRequest,
    pub data: Vec<u8>,
}

/// A recorded bulk OUT transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkWrite {
    pub endpoint: u8,
    pub data: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MockState {
    pub control_reads: Vec<ControlRequest>,
    pub control_writes: Vec<ControlWrite>,
    pub bulk_writes: Vec<BulkWrite>,
    pub detach_calls: u32,
    pub attach_calls: u32,
    driver_attached: bool,
    detach_inert: bool,
    control_read_response: Vec<u8>,
    fail_bulk: Option<String>,
    fail_control_write: Option<String>,
}

/// Scripted bus: identities appear after a configured number of polls.
pub struct MockHost {
    state: Rc<RefCell<MockState>>,
    appear_after: RefCell<HashMap<DeviceIdentity, usize>>,
    attempts: RefCell<HashMap<DeviceIdentity, usize>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::default())),
            appear_after: RefCell::new(HashMap::new()),
            attempts: RefCell::new(HashMap::new()),
        }
    }

    /// Identity is on the bus from the first poll.
    pub fn device_present(&self, identity: DeviceIdentity) {
        self.device_appears_after(identity, 0);
    }

    /// Identity resolves only after `polls` failed attempts.
    pub fn device_appears_after(&self, identity: DeviceIdentity, polls: usize) {
        self.appear_after.borrow_mut().insert(identity, polls);
    }

    /// How many times the bus was scanned for `identity`.
    pub fn attempts(&self, identity: DeviceIdentity) -> usize {
        self.attempts.borrow().get(&identity).copied().unwrap_or(0)
    }

    pub fn state(&self) -> Ref<'_, MockState> {
        self.state.borrow()
    }

    pub fn kernel_driver_attached(&self, attached: bool) {
        self.state.borrow_mut().driver_attached = attached;
    }

    /// Detach requests succeed but leave the driver attached.
    pub fn detach_has_no_effect(&self) {
        self.state.borrow_mut().detach_inert = true;
    }

    /// Script the payload every control IN transfer answers with.
    pub fn answer_control_reads(&self, response: Vec<u8>) {
        self.state.borrow_mut().control_read_response = response;
    }

    pub fn fail_bulk_writes(&self, message: &str) {
        self.state.borrow_mut().fail_bulk = Some(message.to_string());
    }

    pub fn fail_control_writes(&self, message: &str) {
        self.state.borrow_mut().fail_control_write = Some(message.to_string());
    }
}

impl UsbHost for MockHost {
    type Handle = MockHandle;

    fn open_device(&self, identity: DeviceIdentity) -> Result<Option<Self::Handle>> {
        let mut attempts = self.attempts.borrow_mut();
        let count = attempts.entry(identity).or_insert(0);
        *count += 1;

        match self.appear_after.borrow().get(&identity) {
            Some(&after) if *count > after => Ok(Some(MockHandle {
                state: Rc::clone(&self.state),
            })),
            _ => Ok(None),
        }
    }
}

/// Handle over the shared scripted state.
#[derive(Debug)]
pub struct MockHandle {
    state: Rc<RefCell<MockState>>,
}

impl UsbHandle for MockHandle {
    fn read_control(&mut self, request: &ControlRequest, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        state.control_reads.push(*request);

        let response = state.control_read_response.clone();
        let len = response.len().min(buf.len());
        buf[..len].copy_from_slice(&response[..len]);
        Ok(len)
    }

    fn write_control(&mut self, request: &ControlRequest, data: &[u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.fail_control_write {
            return Err(Error::Usb(message.clone()));
        }

        state.control_writes.push(ControlWrite {
            request: *request,
            data: data.to_vec(),
        });
        Ok(data.len())
    }

    fn write_bulk(&mut self, endpoint: u8, data: &[u8], _timeout: Duration) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        if let Some(message) = &state.fail_bulk {
            return Err(Error::Usb(message.clone()));
        }

        state.bulk_writes.push(BulkWrite {
            endpoint,
            data: data.to_vec(),
        });
        Ok(data.len())
    }

    fn kernel_driver_active(&mut self, _interface: u8) -> Result<bool> {
        Ok(self.state.borrow().driver_attached)
    }

    fn detach_kernel_driver(&mut self, _interface: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.detach_calls += 1;
        if !state.detach_inert {
            state.driver_attached = false;
        }
        Ok(())
    }

    fn attach_kernel_driver(&mut self, _interface: u8) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.attach_calls += 1;
        state.driver_attached = true;
        Ok(())
    }

    fn bus_number(&self) -> u8 {
        1
    }

    fn address(&self) -> u8 {
        5
    }
}
