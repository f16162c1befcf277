//! Scoped, fail-safe ownership of a set of output channels.
//!
//! ```text
//!   open() ──▶ Open ──close()/Drop──▶ Closed (terminal)
//! ```
//!
//! A [`HardwareOutputSession`] is the single owner of its pins for its
//! whole lifetime.  However the owning scope ends, including an
//! [`Error::Interrupted`] coming out of a timed wait, every channel is
//! driven low (PWM at 0 % and stopped) before the HAL handle is released,
//! exactly once.
//!
//! ## Failure semantics
//!
//! - A claim failure at [`open`](HardwareOutputSession::open) is fatal: no
//!   session is returned and no pin is ever written.
//! - A write failure on an open channel is returned to the caller and the
//!   session stays open; the owning scope still closes it.
//! - Failures during close are logged and the first one is returned, but
//!   the remaining safe-state writes and the release always happen.

use log::{debug, info, warn};

use crate::app::ports::{HalError, OutputHal};
use crate::channel::{Channel, ChannelMode, DutyCycle, Level};
use crate::error::{Error, InitFailure, ModeViolation, Result};

/// BCM GPIO 0–27 on the 40-pin header.
pub const MAX_CHANNELS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

/// Last value the session wrote to a channel.
#[derive(Debug, Clone, Copy)]
struct Slot {
    channel: Channel,
    level: Level,
    /// `Some` while PWM is running.
    duty: Option<DutyCycle>,
}

type Slots = heapless::Vec<Slot, MAX_CHANNELS>;

pub struct HardwareOutputSession<H: OutputHal> {
    hal: H,
    slots: Slots,
    state: SessionState,
}

impl<H: OutputHal> HardwareOutputSession<H> {
    /// Claim every channel, configure it as an output and drive it to its
    /// safe state.
    pub fn open(mut hal: H, channels: &[Channel]) -> Result<Self> {
        let slots = Self::plan(channels)?;

        for slot in &slots {
            let ch = slot.channel;
            if let Err(cause) = hal.configure_output(ch.id(), ch.mode()) {
                warn!("session: claim of GPIO {} failed: {}", ch.id(), cause);
                if let Err(e) = hal.release_all() {
                    warn!("session: release after failed open: {}", e);
                }
                return Err(Error::HardwareInit {
                    channel: Some(ch.id()),
                    cause: InitFailure::Hal(cause),
                });
            }
        }

        let mut session = Self {
            hal,
            slots,
            state: SessionState::Open,
        };

        for i in 0..session.slots.len() {
            let id = session.slots[i].channel.id();
            if let Err(cause) = session.hal.write_digital(id, Level::Low) {
                // Drop closes the partially initialised session.
                return Err(Error::HardwareInit {
                    channel: Some(id),
                    cause: InitFailure::Hal(cause),
                });
            }
        }

        info!(
            "session: opened {} channel(s) {:?}",
            session.slots.len(),
            session.slots.iter().map(|s| s.channel.id()).collect::<Vec<_>>()
        );
        Ok(session)
    }

    /// Open a session, run `body`, and close the session on every path.
    ///
    /// The body's error wins over a close error; the latter is logged.
    pub fn scoped<T>(
        hal: H,
        channels: &[Channel],
        body: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let mut session = Self::open(hal, channels)?;
        let outcome = body(&mut session);
        let closed = session.close();
        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("session: close after failure also failed: {}", close_err);
                Err(e)
            }
        }
    }

    fn plan(channels: &[Channel]) -> Result<Slots> {
        let mut slots = Slots::new();
        for &channel in channels {
            if slots.iter().any(|s| s.channel.id() == channel.id()) {
                return Err(Error::HardwareInit {
                    channel: Some(channel.id()),
                    cause: InitFailure::DuplicateChannel,
                });
            }
            if channel.pwm_frequency_hz() == Some(0) {
                return Err(Error::InvalidFrequency);
            }
            let slot = Slot {
                channel,
                level: Level::Low,
                duty: None,
            };
            if slots.push(slot).is_err() {
                return Err(Error::HardwareInit {
                    channel: Some(channel.id()),
                    cause: InitFailure::TooManyChannels,
                });
            }
        }
        Ok(slots)
    }

    // ── Writes ────────────────────────────────────────────────

    pub fn set_digital(&mut self, id: u8, level: Level) -> Result<()> {
        let idx = self.writable(id)?;
        if self.slots[idx].channel.is_pwm() {
            return Err(Error::ChannelMode {
                channel: id,
                violation: ModeViolation::NotDigital,
            });
        }
        self.hal
            .write_digital(id, level)
            .map_err(|cause| write_error(id, cause))?;
        self.slots[idx].level = level;
        Ok(())
    }

    /// Set the duty of a running PWM channel, in percent.
    pub fn set_duty(&mut self, id: u8, percent: f32) -> Result<()> {
        let duty = DutyCycle::new(percent)?;
        let idx = self.pwm_slot(id)?;
        if self.slots[idx].duty.is_none() {
            return Err(Error::ChannelMode {
                channel: id,
                violation: ModeViolation::PwmNotRunning,
            });
        }
        self.hal
            .write_duty(id, duty)
            .map_err(|cause| write_error(id, cause))?;
        self.slots[idx].duty = Some(duty);
        Ok(())
    }

    /// Start PWM at 0 % duty.  `frequency_hz` must match the frequency the
    /// channel was opened with.
    pub fn start_pwm(&mut self, id: u8, frequency_hz: u32) -> Result<()> {
        let idx = self.pwm_slot(id)?;
        if frequency_hz == 0 {
            return Err(Error::InvalidFrequency);
        }
        let configured = self.slots[idx].channel.pwm_frequency_hz();
        if let Some(configured) = configured.filter(|&hz| hz != frequency_hz) {
            return Err(Error::ChannelMode {
                channel: id,
                violation: ModeViolation::FrequencyMismatch {
                    configured,
                    requested: frequency_hz,
                },
            });
        }
        if self.slots[idx].duty.is_some() {
            return Err(Error::ChannelMode {
                channel: id,
                violation: ModeViolation::PwmAlreadyRunning,
            });
        }
        self.hal
            .start_pwm(id, frequency_hz)
            .map_err(|cause| write_error(id, cause))?;
        self.slots[idx].duty = Some(DutyCycle::ZERO);
        debug!("session: PWM started on GPIO {} at {} Hz", id, frequency_hz);
        Ok(())
    }

    /// Stop PWM on `id`.  A channel whose PWM is not running is left alone.
    pub fn stop_pwm(&mut self, id: u8) -> Result<()> {
        let idx = self.pwm_slot(id)?;
        if self.slots[idx].duty.is_none() {
            return Ok(());
        }
        self.hal.stop_pwm(id).map_err(|cause| write_error(id, cause))?;
        self.slots[idx].duty = None;
        self.slots[idx].level = Level::Low;
        debug!("session: PWM stopped on GPIO {}", id);
        Ok(())
    }

    // ── Close ─────────────────────────────────────────────────

    /// Drive every channel safe and release the HAL.  Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closed;

        let mut first: Option<Error> = None;
        let mut note = |e: Error| {
            warn!("session: close: {}", e);
            first.get_or_insert(e);
        };

        for slot in &mut self.slots {
            let id = slot.channel.id();
            if slot.duty.is_some() {
                if let Err(cause) = self.hal.write_duty(id, DutyCycle::ZERO) {
                    note(write_error(id, cause));
                }
                if let Err(cause) = self.hal.stop_pwm(id) {
                    note(write_error(id, cause));
                }
                slot.duty = None;
            }
            if let Err(cause) = self.hal.write_digital(id, Level::Low) {
                note(write_error(id, cause));
            }
            slot.level = Level::Low;
        }

        if let Err(cause) = self.hal.release_all() {
            note(Error::HardwareWrite {
                channel: None,
                cause,
            });
        }

        info!("session: closed, {} channel(s) released", self.slots.len());
        first.map_or(Ok(()), Err)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Owned channels, in the order given to `open`.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.slots.iter().map(|s| s.channel)
    }

    /// Last level written to a digital channel (PWM channels report low
    /// unless their PWM is running at a non-zero duty).
    pub fn level(&self, id: u8) -> Result<Level> {
        let slot = &self.slots[self.index(id)?];
        Ok(match slot.duty {
            Some(d) if !d.is_zero() => Level::High,
            Some(_) => Level::Low,
            None => slot.level,
        })
    }

    /// Current duty of a channel; 0 % when PWM is not running.
    pub fn duty(&self, id: u8) -> Result<DutyCycle> {
        let slot = &self.slots[self.index(id)?];
        Ok(slot.duty.unwrap_or(DutyCycle::ZERO))
    }

    pub fn is_pwm_running(&self, id: u8) -> Result<bool> {
        Ok(self.slots[self.index(id)?].duty.is_some())
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }

    // ── Internal ──────────────────────────────────────────────

    fn index(&self, id: u8) -> Result<usize> {
        self.slots
            .iter()
            .position(|s| s.channel.id() == id)
            .ok_or(Error::UnknownChannel(id))
    }

    fn writable(&self, id: u8) -> Result<usize> {
        if self.state == SessionState::Closed {
            return Err(Error::SessionClosed);
        }
        self.index(id)
    }

    fn pwm_slot(&self, id: u8) -> Result<usize> {
        let idx = self.writable(id)?;
        match self.slots[idx].channel.mode() {
            ChannelMode::PwmOut { .. } => Ok(idx),
            ChannelMode::DigitalOut => Err(Error::ChannelMode {
                channel: id,
                violation: ModeViolation::NotPwm,
            }),
        }
    }
}

impl<H: OutputHal> Drop for HardwareOutputSession<H> {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            if let Err(e) = self.close() {
                warn!("session: close on drop failed: {}", e);
            }
        }
    }
}

fn write_error(id: u8, cause: HalError) -> Error {
    Error::HardwareWrite {
        channel: Some(id),
        cause,
    }
}
