//! Simulated GPIO board.
//!
//! [`SimBoard`] is the shared pin state of one imaginary board; every
//! [`SimHal`] handed out by [`SimBoard::hal`] claims pins on it the way a
//! process claims pins on real hardware.  The board records every HAL call
//! and can be told to fail claims or writes on chosen pins.
//!
//! Used by the test suites and by the binaries when built without the
//! `rpi` feature.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use log::trace;

use crate::app::ports::{HalError, OutputHal};
use crate::channel::{ChannelMode, DutyCycle, Level};

/// Highest BCM GPIO the simulated header exposes.
const MAX_PIN: u8 = 27;

/// One recorded HAL call.
#[derive(Debug, Clone, PartialEq)]
pub enum HalCall {
    Configure(u8, ChannelMode),
    WriteDigital(u8, Level),
    StartPwm(u8, u32),
    WriteDuty(u8, f32),
    StopPwm(u8),
    ReleaseAll,
}

#[derive(Debug, Clone, Copy)]
struct SimPin {
    claimed: bool,
    level: Level,
    duty: DutyCycle,
    pwm_hz: Option<u32>,
}

impl Default for SimPin {
    fn default() -> Self {
        Self {
            claimed: false,
            level: Level::Low,
            duty: DutyCycle::ZERO,
            pwm_hz: None,
        }
    }
}

#[derive(Default)]
struct BoardState {
    pins: BTreeMap<u8, SimPin>,
    calls: Vec<HalCall>,
    fail_claim: BTreeSet<u8>,
    fail_writes: BTreeSet<u8>,
    releases: usize,
}

impl BoardState {
    fn writable(&mut self, id: u8) -> Result<&mut SimPin, HalError> {
        if self.fail_writes.contains(&id) {
            return Err(HalError::Io(format!("injected write fault on GPIO {id}")));
        }
        match self.pins.get_mut(&id) {
            Some(pin) if pin.claimed => Ok(pin),
            _ => Err(HalError::Io(format!("GPIO {id} not configured"))),
        }
    }
}

/// Shared handle to a simulated board.
#[derive(Clone, Default)]
pub struct SimBoard {
    state: Rc<RefCell<BoardState>>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh HAL handle with no pins claimed.
    pub fn hal(&self) -> SimHal {
        SimHal {
            board: self.clone(),
            claimed: Vec::new(),
        }
    }

    // ── Fault injection ───────────────────────────────────────

    /// Make every future claim of `id` fail as busy.
    pub fn fail_claim(&self, id: u8) {
        self.state.borrow_mut().fail_claim.insert(id);
    }

    /// Make every future digital or duty write to `id` fail.
    pub fn fail_writes(&self, id: u8) {
        self.state.borrow_mut().fail_writes.insert(id);
    }

    pub fn clear_faults(&self) {
        let mut st = self.state.borrow_mut();
        st.fail_claim.clear();
        st.fail_writes.clear();
    }

    // ── Observation ───────────────────────────────────────────

    pub fn level(&self, id: u8) -> Level {
        self.pin(id).level
    }

    pub fn duty(&self, id: u8) -> DutyCycle {
        self.pin(id).duty
    }

    pub fn pwm_running(&self, id: u8) -> bool {
        self.pin(id).pwm_hz.is_some()
    }

    pub fn pwm_frequency(&self, id: u8) -> Option<u32> {
        self.pin(id).pwm_hz
    }

    pub fn is_claimed(&self, id: u8) -> bool {
        self.pin(id).claimed
    }

    /// Levels of `ids`, in order.
    pub fn levels(&self, ids: &[u8]) -> Vec<Level> {
        ids.iter().map(|&id| self.level(id)).collect()
    }

    /// True when `id` is low with no PWM output.
    pub fn is_safe(&self, id: u8) -> bool {
        let pin = self.pin(id);
        pin.level == Level::Low && pin.duty.is_zero() && pin.pwm_hz.is_none()
    }

    pub fn calls(&self) -> Vec<HalCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of `release_all` calls seen across all handles.
    pub fn release_count(&self) -> usize {
        self.state.borrow().releases
    }

    fn pin(&self, id: u8) -> SimPin {
        self.state.borrow().pins.get(&id).copied().unwrap_or_default()
    }
}

/// HAL handle onto a [`SimBoard`].
pub struct SimHal {
    board: SimBoard,
    claimed: Vec<u8>,
}

impl SimHal {
    fn record(&self, call: HalCall) {
        trace!("sim: {:?}", call);
        self.board.state.borrow_mut().calls.push(call);
    }
}

impl OutputHal for SimHal {
    fn configure_output(&mut self, id: u8, mode: ChannelMode) -> Result<(), HalError> {
        self.record(HalCall::Configure(id, mode));
        let mut st = self.board.state.borrow_mut();
        if id > MAX_PIN {
            return Err(HalError::Unavailable);
        }
        if st.fail_claim.contains(&id) {
            return Err(HalError::Busy);
        }
        let pin = st.pins.entry(id).or_default();
        if pin.claimed {
            return Err(HalError::Busy);
        }
        pin.claimed = true;
        self.claimed.push(id);
        Ok(())
    }

    fn write_digital(&mut self, id: u8, level: Level) -> Result<(), HalError> {
        self.record(HalCall::WriteDigital(id, level));
        let mut st = self.board.state.borrow_mut();
        st.writable(id)?.level = level;
        Ok(())
    }

    fn start_pwm(&mut self, id: u8, frequency_hz: u32) -> Result<(), HalError> {
        self.record(HalCall::StartPwm(id, frequency_hz));
        let mut st = self.board.state.borrow_mut();
        let pin = st.writable(id)?;
        pin.pwm_hz = Some(frequency_hz);
        pin.duty = DutyCycle::ZERO;
        Ok(())
    }

    fn write_duty(&mut self, id: u8, duty: DutyCycle) -> Result<(), HalError> {
        self.record(HalCall::WriteDuty(id, duty.percent()));
        let mut st = self.board.state.borrow_mut();
        let pin = st.writable(id)?;
        if pin.pwm_hz.is_none() {
            return Err(HalError::Io(format!("PWM not running on GPIO {id}")));
        }
        pin.duty = duty;
        Ok(())
    }

    fn stop_pwm(&mut self, id: u8) -> Result<(), HalError> {
        self.record(HalCall::StopPwm(id));
        let mut st = self.board.state.borrow_mut();
        match st.pins.get_mut(&id) {
            Some(pin) if pin.claimed => {
                pin.pwm_hz = None;
                pin.duty = DutyCycle::ZERO;
                pin.level = Level::Low;
                Ok(())
            }
            _ => Err(HalError::Io(format!("GPIO {id} not configured"))),
        }
    }

    fn release_all(&mut self) -> Result<(), HalError> {
        self.record(HalCall::ReleaseAll);
        let mut st = self.board.state.borrow_mut();
        for id in self.claimed.drain(..) {
            if let Some(pin) = st.pins.get_mut(&id) {
                pin.claimed = false;
            }
        }
        st.releases += 1;
        Ok(())
    }
}
