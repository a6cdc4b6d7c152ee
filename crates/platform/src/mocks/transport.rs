//! Mock I²S transport.
//!
//! Transmit: every accepted byte is appended to a capture buffer.
//! Receive: bytes become available in real time at `rate * 4` bytes per
//! second from the moment the receive path is enabled, like a DMA ring.
//! At most [`MockTransport::RX_RING_BYTES`] are buffered; anything older
//! is dropped, as an overrun would on hardware.
//!
//! Both directions share one bit clock, as on a full-duplex port: a clock
//! change through either direction moves both.

use std::sync::{Arc, Mutex};

use embassy_time::{Instant, Timer};

use super::{lock, MockError};
use crate::audio_config::I2sAudioConfig;
use crate::transport::{AudioTransport, Direction, TransportClock};

/// A call observed by [`MockTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCall {
    /// `open` at the given rate (Hz)
    Open(u32),
    /// `close`
    Close,
    /// `enable`
    Enable(Direction),
    /// `disable`
    Disable(Direction),
    /// `reconfigure_clock` to the given rate (Hz)
    Reconfigure(Direction, u32),
    /// `write` that accepted this many bytes
    Write(usize),
    /// `read` that returned this many bytes
    Read(usize),
}

/// Fault injected into [`MockTransport`]. Faults persist until cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFault {
    /// `open` fails
    Open,
    /// `enable` fails for this direction
    Enable(Direction),
    /// `reconfigure_clock` fails
    Reconfigure,
    /// `write` fails
    Write,
    /// `write` never completes
    StallWrite,
    /// `read` fails
    Read,
}

#[derive(Default)]
struct State {
    calls: Vec<TransportCall>,
    written: Vec<u8>,
    open: bool,
    tx_enabled: bool,
    rx_enabled: bool,
    tx_clock: Option<TransportClock>,
    rx_clock: Option<TransportClock>,
    faults: Vec<TransportFault>,
    rx_anchor: Option<Instant>,
    rx_consumed: u64,
}

impl State {
    fn faulted(&self, fault: TransportFault) -> bool {
        self.faults.contains(&fault)
    }

    fn restart_rx_clock(&mut self) {
        self.rx_anchor = None;
        self.rx_consumed = 0;
    }

    /// Hand out paced receive data, or `None` if nothing is buffered yet.
    fn take_rx(&mut self, buf: &mut [u8]) -> Option<usize> {
        let byte_rate = u64::from(self.rx_clock?.sample_rate.stereo16_byte_rate());
        let now = Instant::now();
        let anchor = *self.rx_anchor.get_or_insert(now);
        let elapsed_us = now.saturating_duration_since(anchor).as_micros();
        let produced = (elapsed_us.saturating_mul(byte_rate) / 1_000_000) & !3;

        let ring = MockTransport::RX_RING_BYTES as u64;
        if produced.saturating_sub(self.rx_consumed) > ring {
            self.rx_consumed = produced.saturating_sub(ring);
        }
        let pending = produced.saturating_sub(self.rx_consumed);
        let capacity = (buf.len() & !3) as u64;
        let n = usize::try_from(pending.min(capacity)).ok()?;
        if n == 0 {
            return None;
        }
        for (i, b) in buf.iter_mut().take(n).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let v = self.rx_consumed.wrapping_add(i as u64) as u8;
            *b = v;
        }
        self.rx_consumed = self.rx_consumed.saturating_add(n as u64);
        Some(n)
    }
}

/// Mock duplex I²S transport.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    /// Receive-side buffering, in bytes.
    pub const RX_RING_BYTES: usize = 512;

    /// Create a closed transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject a fault.
    pub fn fail(&self, fault: TransportFault) {
        lock(&self.state).faults.push(fault);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        lock(&self.state).faults.clear();
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        lock(&self.state).calls.clone()
    }

    /// Forget recorded calls and transmitted bytes.
    pub fn clear_log(&self) {
        let mut s = lock(&self.state);
        s.calls.clear();
        s.written.clear();
    }

    /// All bytes accepted by `write`.
    pub fn written(&self) -> Vec<u8> {
        lock(&self.state).written.clone()
    }

    /// Number of successful `write` calls.
    pub fn write_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Write(_)))
            .count()
    }

    /// Number of `reconfigure_clock` calls.
    pub fn reconfigure_count(&self) -> usize {
        lock(&self.state)
            .calls
            .iter()
            .filter(|c| matches!(c, TransportCall::Reconfigure(..)))
            .count()
    }

    /// Whether the transport is open.
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Whether `direction` is currently enabled.
    pub fn is_enabled(&self, direction: Direction) -> bool {
        let s = lock(&self.state);
        match direction {
            Direction::Tx => s.tx_enabled,
            Direction::Rx => s.rx_enabled,
        }
    }

    /// Current clock of `direction`, if open.
    pub fn clock(&self, direction: Direction) -> Option<TransportClock> {
        let s = lock(&self.state);
        match direction {
            Direction::Tx => s.tx_clock,
            Direction::Rx => s.rx_clock,
        }
    }
}

impl AudioTransport for MockTransport {
    type Error = MockError;

    async fn open(&mut self, config: I2sAudioConfig) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        if s.faulted(TransportFault::Open) {
            return Err(MockError::Injected);
        }
        s.calls.push(TransportCall::Open(config.sample_rate.get()));
        s.open = true;
        s.tx_clock = Some(config.clock());
        s.rx_clock = Some(config.clock());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        s.calls.push(TransportCall::Close);
        s.open = false;
        s.tx_enabled = false;
        s.rx_enabled = false;
        Ok(())
    }

    async fn enable(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        if !s.open {
            return Err(MockError::NotEnabled);
        }
        if s.faulted(TransportFault::Enable(direction)) {
            return Err(MockError::Injected);
        }
        s.calls.push(TransportCall::Enable(direction));
        match direction {
            Direction::Tx => s.tx_enabled = true,
            Direction::Rx => {
                s.rx_enabled = true;
                s.restart_rx_clock();
            }
        }
        Ok(())
    }

    async fn disable(&mut self, direction: Direction) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        s.calls.push(TransportCall::Disable(direction));
        match direction {
            Direction::Tx => s.tx_enabled = false,
            Direction::Rx => s.rx_enabled = false,
        }
        Ok(())
    }

    async fn reconfigure_clock(
        &mut self,
        direction: Direction,
        clock: TransportClock,
    ) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        s.calls
            .push(TransportCall::Reconfigure(direction, clock.sample_rate.get()));
        if s.faulted(TransportFault::Reconfigure) {
            return Err(MockError::Injected);
        }
        s.tx_clock = Some(clock);
        s.rx_clock = Some(clock);
        s.restart_rx_clock();
        Ok(())
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let stall = {
            let mut s = lock(&self.state);
            if !s.tx_enabled {
                return Err(MockError::NotEnabled);
            }
            if s.faulted(TransportFault::Write) {
                return Err(MockError::Injected);
            }
            let stall = s.faulted(TransportFault::StallWrite);
            if !stall {
                s.written.extend_from_slice(bytes);
                s.calls.push(TransportCall::Write(bytes.len()));
            }
            stall
        };
        if stall {
            core::future::pending::<()>().await;
        }
        Ok(bytes.len())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            let taken = {
                let mut s = lock(&self.state);
                if !s.rx_enabled {
                    return Err(MockError::NotEnabled);
                }
                if s.faulted(TransportFault::Read) {
                    return Err(MockError::Injected);
                }
                let taken = s.take_rx(buf);
                if let Some(n) = taken {
                    s.calls.push(TransportCall::Read(n));
                }
                taken
            };
            if let Some(n) = taken {
                return Ok(n);
            }
            Timer::after_millis(1).await;
        }
    }
}
