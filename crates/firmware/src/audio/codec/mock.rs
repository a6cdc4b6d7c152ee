//! Mock codec for host-side testing
//!
//! Implements [`CodecDriver`] and [`platform::AudioCodec`] without any
//! hardware dependency. Clones share state, so a test keeps one handle for
//! assertions and gives the other to the code under test. Models the one
//! chip behaviour the subsystem depends on: a full `init` resets volume and
//! mute.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use platform::{AudioCodec, CodecClockConfig, MicGain, MicInput, VolumePercent};

use super::CodecDriver;

/// A call observed by [`MockCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCall {
    /// `probe()`
    Probe,
    /// `init()` at this rate
    Init(u32),
    /// `set_volume()`
    SetVolume(u8),
    /// `set_mute()`
    SetMute(bool),
    /// `configure_microphone()`
    ConfigureMicrophone(MicInput),
    /// `set_mic_gain()`
    SetMicGain(MicGain),
    /// `power_down()`
    PowerDown,
}

/// Operation to fail on every call until cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFault {
    /// `probe()` reports a missing chip
    Probe,
    /// `init()`
    Init,
    /// `set_volume()`
    SetVolume,
    /// `set_mute()`
    SetMute,
    /// `configure_microphone()`
    ConfigureMicrophone,
    /// `set_mic_gain()`
    SetMicGain,
}

/// Error returned by [`MockCodec`] for an injected fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCodecError;

#[derive(Default)]
struct State {
    calls: Vec<CodecCall>,
    faults: Vec<CodecFault>,
    clock: Option<CodecClockConfig>,
    volume: u8,
    muted: bool,
    mic: Option<MicInput>,
    mic_gain: Option<MicGain>,
    powered: bool,
}

/// Mock codec - records all calls for test assertions.
#[derive(Clone, Default)]
pub struct MockCodec {
    state: Rc<RefCell<State>>,
}

impl MockCodec {
    /// Create an unpowered mock codec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail `fault` until [`clear_faults`](Self::clear_faults).
    pub fn fail(&self, fault: CodecFault) {
        self.state.borrow_mut().faults.push(fault);
    }

    /// Remove all injected faults.
    pub fn clear_faults(&self) {
        self.state.borrow_mut().faults.clear();
    }

    /// Every call observed so far, in order.
    pub fn calls(&self) -> Vec<CodecCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_log(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Number of `init` calls.
    pub fn init_count(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, CodecCall::Init(_)))
            .count()
    }

    /// Clock from the last successful `init`.
    pub fn clock(&self) -> Option<CodecClockConfig> {
        self.state.borrow().clock
    }

    /// Current volume (0 after every `init`).
    pub fn volume(&self) -> u8 {
        self.state.borrow().volume
    }

    /// Current mute state.
    pub fn is_muted(&self) -> bool {
        self.state.borrow().muted
    }

    /// Last configured microphone path.
    pub fn mic(&self) -> Option<MicInput> {
        self.state.borrow().mic
    }

    /// Last configured microphone gain.
    pub fn mic_gain(&self) -> Option<MicGain> {
        self.state.borrow().mic_gain
    }

    /// `true` between a successful `init` and `power_down`.
    pub fn is_powered(&self) -> bool {
        self.state.borrow().powered
    }

    /// Record `call` and report whether `fault` is injected.
    fn record(&self, call: CodecCall, fault: CodecFault) -> Result<(), MockCodecError> {
        let mut s = self.state.borrow_mut();
        s.calls.push(call);
        if s.faults.contains(&fault) {
            Err(MockCodecError)
        } else {
            Ok(())
        }
    }
}

impl AudioCodec for MockCodec {
    type Error = MockCodecError;

    async fn init(&mut self, config: CodecClockConfig) -> Result<(), Self::Error> {
        self.record(CodecCall::Init(config.sample_rate.get()), CodecFault::Init)?;
        let mut s = self.state.borrow_mut();
        s.clock = Some(config);
        s.volume = 0;
        s.muted = false;
        s.powered = true;
        Ok(())
    }

    async fn set_volume(&mut self, volume: VolumePercent) -> Result<(), Self::Error> {
        self.record(CodecCall::SetVolume(volume.get()), CodecFault::SetVolume)?;
        self.state.borrow_mut().volume = volume.get();
        Ok(())
    }

    async fn set_mute(&mut self, muted: bool) -> Result<(), Self::Error> {
        self.record(CodecCall::SetMute(muted), CodecFault::SetMute)?;
        self.state.borrow_mut().muted = muted;
        Ok(())
    }

    async fn configure_microphone(&mut self, input: MicInput) -> Result<(), Self::Error> {
        self.record(
            CodecCall::ConfigureMicrophone(input),
            CodecFault::ConfigureMicrophone,
        )?;
        self.state.borrow_mut().mic = Some(input);
        Ok(())
    }

    async fn set_mic_gain(&mut self, gain: MicGain) -> Result<(), Self::Error> {
        self.record(CodecCall::SetMicGain(gain), CodecFault::SetMicGain)?;
        self.state.borrow_mut().mic_gain = Some(gain);
        Ok(())
    }
}

impl CodecDriver for MockCodec {
    async fn probe(&mut self) -> Result<(), Self::Error> {
        self.record(CodecCall::Probe, CodecFault::Probe)
    }

    async fn power_down(&mut self) -> Result<(), Self::Error> {
        let mut s = self.state.borrow_mut();
        s.calls.push(CodecCall::PowerDown);
        s.powered = false;
        Ok(())
    }
}
