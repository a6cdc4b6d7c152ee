//! The audio context.
//!
//! [`AudioSubsystem`] owns the transport, the codec driver and the storage
//! backend behind one async mutex. Every public operation takes the lock
//! for its whole duration, so a rate switch can never interleave with a
//! playback or a recording.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► initialize() ──► play_* / record_to_file / set_* ...
//!               │
//!               └─ failure: everything acquired so far is released
//!                  in reverse order, the context stays uninitialized
//! ```
//!
//! A failed rate switch leaves the transmit path disabled and marks it
//! [`TransportHealth::NeedsRecovery`]; transmit operations are refused
//! until a later `set_sample_rate` completes the full switch sequence.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Timer};
use pcm_stream::{
    capture_into, stream_payload, synthesize, CaptureReport, PlaybackReport, WavReader, WavWriter,
};
use platform::{
    AudioTransport, CodecClockConfig, Direction, I2sAudioConfig, MicGain, MicInput,
    SampleRateHz, Storage, TransportClock, VolumePercent,
};

use super::clock_math::{bclk_hz, mclk_hz};
use super::codec::CodecDriver;
use super::config::SubsystemConfig;
use super::transport_health::TransportHealth;
use crate::error::{AudioError, InitStep, ReconfigStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransportState {
    rate: SampleRateHz,
    initialized: bool,
    health: TransportHealth,
}

/// Settings re-applied to the codec after every full init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodecState {
    volume: VolumePercent,
    muted: bool,
    mic_input: MicInput,
    /// `None` until the first recording sets it.
    mic_gain: Option<MicGain>,
}

/// Resources taken during bring-up; released in reverse on failure.
#[derive(Debug, Default)]
struct Acquired {
    open: bool,
    tx: bool,
    rx: bool,
    codec: bool,
}

struct Inner<T, C, S> {
    transport: T,
    codec: C,
    storage: S,
    config: SubsystemConfig,
    transport_state: TransportState,
    codec_state: CodecState,
}

/// Duplex audio context: ES8311 codec, I²S transport and file storage.
///
/// `M` picks the mutex flavour: `CriticalSectionRawMutex` when the context
/// is shared between executors, `NoopRawMutex` within a single task.
pub struct AudioSubsystem<M: RawMutex, T, C, S> {
    inner: Mutex<M, Inner<T, C, S>>,
}

impl<M, T, C, S> AudioSubsystem<M, T, C, S>
where
    M: RawMutex,
    T: AudioTransport,
    C: CodecDriver,
    S: Storage,
{
    /// Build an uninitialized context. No hardware is touched.
    pub fn new(transport: T, codec: C, storage: S, config: SubsystemConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                transport,
                codec,
                storage,
                transport_state: TransportState {
                    rate: config.default_rate,
                    initialized: false,
                    health: TransportHealth::new(),
                },
                codec_state: CodecState {
                    volume: config.initial_volume,
                    muted: false,
                    mic_input: config.mic_input,
                    mic_gain: None,
                },
                config,
            }),
        }
    }

    /// Bring up the transport and the codec at the configured default rate.
    ///
    /// Idempotent: a second call on an initialized context does nothing.
    pub async fn initialize(&self) -> Result<(), AudioError> {
        self.inner.lock().await.initialize().await
    }

    /// Play a sine tone of `freq_hz` for `duration_ms`.
    ///
    /// A single best-effort transport write; a failed or timed-out write is
    /// logged and still returns `Ok`.
    pub async fn play_tone(&self, freq_hz: u32, duration_ms: u32) -> Result<(), AudioError> {
        self.inner.lock().await.play_tone(freq_hz, duration_ms).await
    }

    /// Stream a WAV file to the speaker.
    ///
    /// Switches the transport to the file's declared rate when it is
    /// supported; otherwise plays at the active rate.
    pub async fn play_file(&self, path: &str) -> Result<PlaybackReport, AudioError> {
        self.inner.lock().await.play_file(path).await
    }

    /// Set the DAC volume in percent (0..=100).
    pub async fn set_volume(&self, percent: u8) -> Result<(), AudioError> {
        self.inner.lock().await.set_volume(percent).await
    }

    /// Record `duration_ms` of microphone input to a new WAV file at `path`.
    pub async fn record_to_file(
        &self,
        path: &str,
        duration_ms: u32,
    ) -> Result<CaptureReport, AudioError> {
        self.inner.lock().await.record_to_file(path, duration_ms).await
    }

    /// Switch transport and codec to `rate_hz`.
    ///
    /// A no-op when the rate is already active and the transmit path is
    /// healthy.
    pub async fn set_sample_rate(&self, rate_hz: u32) -> Result<(), AudioError> {
        let mut inner = self.inner.lock().await;
        inner.ensure_initialized()?;
        let rate = SampleRateHz::new(rate_hz).map_err(|_| AudioError::UnsupportedRate(rate_hz))?;
        inner.set_rate(rate).await
    }

    /// Rate the transport and codec were last switched to successfully.
    pub async fn sample_rate(&self) -> SampleRateHz {
        self.inner.lock().await.transport_state.rate
    }

    /// Volume the codec was last set to.
    pub async fn volume(&self) -> VolumePercent {
        self.inner.lock().await.codec_state.volume
    }

    /// `true` after a successful [`initialize`](Self::initialize).
    pub async fn is_initialized(&self) -> bool {
        self.inner.lock().await.transport_state.initialized
    }

    /// Transmit-path health.
    pub async fn transport_health(&self) -> TransportHealth {
        self.inner.lock().await.transport_state.health
    }
}

impl<T, C, S> Inner<T, C, S>
where
    T: AudioTransport,
    C: CodecDriver,
    S: Storage,
{
    fn ensure_initialized(&self) -> Result<(), AudioError> {
        if self.transport_state.initialized {
            Ok(())
        } else {
            warn!("audio: not initialized");
            Err(AudioError::InvalidState)
        }
    }

    fn ensure_tx_ready(&self) -> Result<(), AudioError> {
        self.ensure_initialized()?;
        if self.transport_state.health.needs_recovery() {
            warn!(
                "audio: tx awaiting recovery after {} failed switches",
                self.transport_state.health.failures()
            );
            return Err(AudioError::InvalidState);
        }
        Ok(())
    }

    async fn initialize(&mut self) -> Result<(), AudioError> {
        if self.transport_state.initialized {
            debug!("audio: already initialized");
            return Ok(());
        }
        let rate = self.config.default_rate;
        info!(
            "audio: init at {} Hz (MCLK {} Hz, BCLK {} Hz)",
            rate.get(),
            mclk_hz(rate),
            bclk_hz(rate)
        );

        let mut acquired = Acquired::default();
        if let Err(step) = self.bring_up(rate, &mut acquired).await {
            error!("audio: init failed at {}", step.as_str());
            self.release(&acquired).await;
            return Err(AudioError::InitializationFailure { step });
        }

        self.transport_state = TransportState {
            rate,
            initialized: true,
            health: TransportHealth::Healthy,
        };
        self.codec_state = CodecState {
            volume: self.config.initial_volume,
            muted: false,
            mic_input: self.config.mic_input,
            mic_gain: None,
        };
        info!("audio: ready");
        Ok(())
    }

    async fn bring_up(
        &mut self,
        rate: SampleRateHz,
        acquired: &mut Acquired,
    ) -> Result<(), InitStep> {
        self.transport
            .open(I2sAudioConfig::es8311(rate))
            .await
            .map_err(|_| InitStep::TransportOpen)?;
        acquired.open = true;
        self.transport
            .enable(Direction::Tx)
            .await
            .map_err(|_| InitStep::TransportEnable)?;
        acquired.tx = true;
        self.transport
            .enable(Direction::Rx)
            .await
            .map_err(|_| InitStep::TransportEnable)?;
        acquired.rx = true;

        // MCLK must be running before the codec sees its first register write.
        Timer::after(self.config.settle).await;

        self.codec.probe().await.map_err(|_| InitStep::CodecProbe)?;
        acquired.codec = true;
        self.codec
            .init(CodecClockConfig::for_rate(rate))
            .await
            .map_err(|_| InitStep::CodecInit)?;
        self.codec
            .set_volume(self.config.initial_volume)
            .await
            .map_err(|_| InitStep::Volume)?;
        self.codec
            .configure_microphone(self.config.mic_input)
            .await
            .map_err(|_| InitStep::Microphone)?;
        self.codec.set_mute(false).await.map_err(|_| InitStep::Unmute)?;

        Timer::after(self.config.settle).await;
        Ok(())
    }

    async fn release(&mut self, acquired: &Acquired) {
        if acquired.codec && self.codec.power_down().await.is_err() {
            warn!("audio: codec power-down failed");
        }
        if acquired.rx && self.transport.disable(Direction::Rx).await.is_err() {
            warn!("audio: rx disable failed");
        }
        if acquired.tx && self.transport.disable(Direction::Tx).await.is_err() {
            warn!("audio: tx disable failed");
        }
        if acquired.open && self.transport.close().await.is_err() {
            warn!("audio: transport close failed");
        }
    }

    async fn play_tone(&mut self, freq_hz: u32, duration_ms: u32) -> Result<(), AudioError> {
        self.ensure_tx_ready()?;
        let spec = self.config.tone(freq_hz, duration_ms);
        let buf = synthesize(&spec)?;
        if buf.is_empty() {
            debug!("audio: empty tone");
            return Ok(());
        }
        info!("audio: tone {} Hz, {} ms, {} bytes", freq_hz, duration_ms, buf.len());

        match with_timeout(self.config.write_timeout, self.transport.write(&buf)).await {
            Ok(Ok(n)) => debug!("audio: tone wrote {} of {} bytes", n, buf.len()),
            Ok(Err(_)) => warn!("audio: tone write failed"),
            Err(_) => warn!("audio: tone write timed out"),
        }
        Ok(())
    }

    async fn play_file(&mut self, path: &str) -> Result<PlaybackReport, AudioError> {
        self.ensure_tx_ready()?;
        let file = self.storage.open_file(path).await.map_err(|_| {
            warn!("audio: cannot open {}", path);
            AudioError::IoFailure
        })?;
        let reader = WavReader::open(file).await?;
        let header = *reader.header();
        info!(
            "audio: {}: {} ch, {} Hz, {} bit, format {}",
            path,
            header.channels,
            header.sample_rate,
            header.bits_per_sample,
            header.audio_format
        );
        if header.audio_format != 1 || header.channels != 2 || header.bits_per_sample != 16 {
            warn!("audio: not 16-bit stereo PCM, streaming bytes as-is");
        }

        match self.config.playback_rate(header.sample_rate) {
            Some(rate) => self.set_rate(rate).await?,
            None => warn!(
                "audio: file rate {} Hz unsupported, playing at {} Hz",
                header.sample_rate,
                self.transport_state.rate.get()
            ),
        }

        let mut payload = reader.into_payload().await?;
        debug!("audio: payload {} bytes at offset {}", payload.len(), payload.offset());
        let report =
            stream_payload(&mut payload, &mut self.transport, self.config.playback_options())
                .await?;
        info!(
            "audio: playback {} after {} bytes",
            report.stop.as_str(),
            report.bytes_written
        );
        Ok(report)
    }

    async fn set_volume(&mut self, percent: u8) -> Result<(), AudioError> {
        self.ensure_initialized()?;
        let volume = VolumePercent::try_new(percent).map_err(|_| AudioError::InvalidArgument)?;
        self.codec.set_volume(volume).await.map_err(|_| {
            warn!("audio: volume write failed");
            AudioError::DeviceFailure
        })?;
        self.codec_state.volume = volume;
        debug!("audio: volume {}%", percent);
        Ok(())
    }

    async fn record_to_file(
        &mut self,
        path: &str,
        duration_ms: u32,
    ) -> Result<CaptureReport, AudioError> {
        self.ensure_initialized()?;
        let file = self.storage.create_file(path).await.map_err(|_| {
            warn!("audio: cannot create {}", path);
            AudioError::IoFailure
        })?;
        let mut writer = WavWriter::create(file).await?;

        match self.codec.set_mic_gain(self.config.mic_gain).await {
            Ok(()) => self.codec_state.mic_gain = Some(self.config.mic_gain),
            Err(_) => warn!("audio: mic gain write failed, recording anyway"),
        }

        let rate = self.transport_state.rate;
        let expected = u64::from(rate.stereo16_byte_rate())
            .saturating_mul(u64::from(duration_ms))
            .checked_div(1000)
            .unwrap_or(0);
        info!("audio: recording {} ms to {} at {} Hz", duration_ms, path, rate.get());

        let report = capture_into(
            &mut self.transport,
            &mut writer,
            self.config.capture_options(duration_ms),
            expected,
        )
        .await?;
        let header = writer.finalize(rate.get()).await?;
        info!("audio: recorded {} bytes", header.data_size);
        Ok(report)
    }

    async fn set_rate(&mut self, rate: SampleRateHz) -> Result<(), AudioError> {
        let current = self.transport_state.rate;
        let recovering = self.transport_state.health.needs_recovery();
        if rate == current && !recovering {
            debug!("audio: already at {} Hz", rate.get());
            return Ok(());
        }
        info!("audio: switching {} Hz -> {} Hz", current.get(), rate.get());

        match self.reconfigure(rate).await {
            Ok(()) => {
                if recovering {
                    info!("audio: tx recovered");
                }
                self.transport_state.rate = rate;
                self.transport_state.health.on_recovered();
                Ok(())
            }
            Err(step) => {
                self.transport_state.health.on_reconfigure_failed();
                error!("audio: switch to {} Hz failed at {}", rate.get(), step.as_str());
                Err(AudioError::ReconfigurationFailure {
                    rate: rate.get(),
                    step,
                })
            }
        }
    }

    /// Disable TX, re-clock, re-init the codec, restore its settings and
    /// re-enable TX. RX keeps its channel; its clock follows TX.
    async fn reconfigure(&mut self, rate: SampleRateHz) -> Result<(), ReconfigStep> {
        self.transport
            .disable(Direction::Tx)
            .await
            .map_err(|_| ReconfigStep::DisableTx)?;
        self.transport
            .reconfigure_clock(Direction::Tx, TransportClock::for_rate(rate))
            .await
            .map_err(|_| ReconfigStep::TransportClock)?;
        self.codec
            .init(CodecClockConfig::for_rate(rate))
            .await
            .map_err(|_| ReconfigStep::CodecInit)?;
        // Full init resets every register, including the ADC side.
        self.codec
            .set_volume(self.codec_state.volume)
            .await
            .map_err(|_| ReconfigStep::RestoreVolume)?;
        self.codec
            .set_mute(self.codec_state.muted)
            .await
            .map_err(|_| ReconfigStep::RestoreMute)?;
        self.codec
            .configure_microphone(self.codec_state.mic_input)
            .await
            .map_err(|_| ReconfigStep::RestoreMicrophone)?;
        if let Some(gain) = self.codec_state.mic_gain {
            self.codec
                .set_mic_gain(gain)
                .await
                .map_err(|_| ReconfigStep::RestoreMicrophone)?;
        }
        self.transport
            .enable(Direction::Tx)
            .await
            .map_err(|_| ReconfigStep::EnableTx)?;
        debug!("audio: MCLK {} Hz", mclk_hz(rate));
        Ok(())
    }
}
