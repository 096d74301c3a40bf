// src/common/test_support.rs

use super::hal_traits::{Delay, SerialLink};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

// --- Mock Link ---
#[derive(Debug, Default)]
pub struct MockState {
    pub open: bool,
    pub fail_open: bool,
    pub fail_io: bool,
    pub open_calls: u32,
    pub close_calls: u32,
    pub clear_calls: u32,
    /// Canned replies keyed by the exact wire text (terminator included).
    pub responses: HashMap<String, Vec<u8>>,
    pub inbound: VecDeque<u8>,
    pub writes: Vec<String>,
}

/// Scripted `SerialLink`. Clones share state so a test can keep a handle
/// after moving the link into a channel or session.
#[derive(Debug, Clone)]
pub struct MockLink {
    port_name: String,
    baud_rate: u32,
    state: Rc<RefCell<MockState>>,
}

impl MockLink {
    pub fn new() -> Self {
        MockLink {
            port_name: "/dev/ttyMOCK0".into(),
            baud_rate: 9600,
            state: Rc::new(RefCell::new(MockState::default())),
        }
    }

    /// Queue `reply` to be received whenever `wire` is written.
    pub fn respond(&self, wire: &str, reply: &[u8]) -> &Self {
        self.state
            .borrow_mut()
            .responses
            .insert(wire.to_string(), reply.to_vec());
        self
    }

    /// Bytes arriving on their own, e.g. streamed frames.
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.state.borrow_mut().inbound.extend(bytes.iter().copied());
    }

    pub fn set_fail_open(&self, fail: bool) {
        self.state.borrow_mut().fail_open = fail;
    }

    pub fn set_fail_io(&self, fail: bool) {
        self.state.borrow_mut().fail_io = fail;
    }

    pub fn writes(&self) -> Vec<String> {
        self.state.borrow().writes.clone()
    }

    pub fn count_writes(&self, wire: &str) -> usize {
        self.state.borrow().writes.iter().filter(|w| *w == wire).count()
    }

    pub fn inbound_len(&self) -> usize {
        self.state.borrow().inbound.len()
    }

    pub fn state(&self) -> std::cell::Ref<'_, MockState> {
        self.state.borrow()
    }
}

impl SerialLink for MockLink {
    type Error = MockCommError;

    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn open(&mut self) -> Result<(), MockCommError> {
        let mut s = self.state.borrow_mut();
        s.open_calls += 1;
        if s.fail_open {
            return Err(MockCommError);
        }
        s.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), MockCommError> {
        let mut s = self.state.borrow_mut();
        s.close_calls += 1;
        s.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    fn clear_buffers(&mut self) -> Result<(), MockCommError> {
        let mut s = self.state.borrow_mut();
        s.clear_calls += 1;
        s.inbound.clear();
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), MockCommError> {
        let mut s = self.state.borrow_mut();
        if !s.open || s.fail_io {
            return Err(MockCommError);
        }
        let wire = String::from_utf8_lossy(bytes).into_owned();
        if let Some(reply) = s.responses.get(&wire).cloned() {
            s.inbound.extend(reply);
        }
        s.writes.push(wire);
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, MockCommError> {
        let s = self.state.borrow();
        if !s.open || s.fail_io {
            return Err(MockCommError);
        }
        Ok(s.inbound.len())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), MockCommError> {
        let mut s = self.state.borrow_mut();
        // A real port would block here; the mock has nothing more coming.
        if !s.open || s.fail_io || s.inbound.len() < buf.len() {
            return Err(MockCommError);
        }
        for slot in buf.iter_mut() {
            *slot = s.inbound.pop_front().unwrap_or(0);
        }
        Ok(())
    }
}

// --- Mock Delay ---
/// Records requested delays instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Delay for MockDelay {
    fn delay(&mut self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

/// Link answering the three identity queries with the given raw replies.
/// An empty reply leaves that query unanswered.
pub fn scripted_link(model: &[u8], id: &[u8], units: &[u8]) -> MockLink {
    let link = MockLink::new();
    for (wire, reply) in [("MODEL\r", model), ("SS1\r", id), ("UNITS\r", units)] {
        if !reply.is_empty() {
            link.respond(wire, reply);
        }
    }
    link
}
