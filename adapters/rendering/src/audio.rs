//! Sound cues raised by the simulation and the clips that voice them.
//!
//! Clips are mono 16-bit PCM WAV at 8 kHz, synthesised at startup and
//! validated before a backend is allowed to decode them.

use std::{
    f32::consts::{PI, TAU},
    io::Cursor,
    time::Duration,
};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::trace;
use pixel_plane_core::Event;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Sample rate shared by every clip.
pub const SAMPLE_RATE: u32 = 8_000;

const NOISE_SEED: u64 = 0x0c01_115e;

/// Sounds requested by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A projectile was fired.
    Shoot,
    /// The player was destroyed.
    Collision,
    /// A dying enemy finished fading out.
    EnemyDestroyed,
}

impl SoundCue {
    /// Maps a world event onto the cue it should trigger, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::ProjectileFired { .. } => Some(Self::Shoot),
            Event::PlayerDestroyed { .. } => Some(Self::Collision),
            Event::EnemyDestroyed { .. } => Some(Self::EnemyDestroyed),
            _ => None,
        }
    }
}

/// Sink for sound cues.
pub trait AudioBackend {
    /// Starts the looping background track.
    fn start_background(&mut self);

    /// Plays the clip associated with `cue`.
    fn play(&mut self, cue: SoundCue);
}

/// Audio backend that only logs the cues it receives.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn start_background(&mut self) {
        trace!("background track suppressed");
    }

    fn play(&mut self, cue: SoundCue) {
        trace!("sound cue {cue:?} suppressed");
    }
}

/// Drops re-triggers of a clip that is still playing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RetriggerGate {
    busy_until: f64,
}

impl RetriggerGate {
    /// Returns `true` and marks the clip busy when it is free at `now` seconds.
    pub fn admit(&mut self, now: f64, duration: Duration) -> bool {
        if now < self.busy_until {
            return false;
        }
        self.busy_until = now + duration.as_secs_f64();
        true
    }
}

/// Errors raised while encoding or validating clip data.
#[derive(Debug, Error)]
pub enum ClipError {
    /// The WAV container could not be read or written.
    #[error("malformed WAV data: {0}")]
    Malformed(#[from] hound::Error),
    /// The clip is not 16-bit integer PCM.
    #[error("clip uses {bits}-bit {format:?} samples, expected 16-bit integer PCM")]
    UnsupportedEncoding {
        /// Declared bit depth.
        bits: u16,
        /// Declared sample format.
        format: SampleFormat,
    },
    /// The clip sample rate differs from [`SAMPLE_RATE`].
    #[error("clip sample rate is {found} Hz, expected {expected} Hz")]
    SampleRateMismatch {
        /// Required sample rate.
        expected: u32,
        /// Declared sample rate.
        found: u32,
    },
    /// The data chunk holds no samples.
    #[error("clip holds no samples")]
    Empty,
}

/// Header fields of a validated clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavInfo {
    /// Number of interleaved channels.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Number of sample frames.
    pub frames: u32,
}

impl WavInfo {
    /// Playback length of the clip.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_nanos(u64::from(self.frames) * 1_000_000_000 / u64::from(self.sample_rate))
    }
}

fn clip_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Reads a WAV clip, checking its format and that every sample is present.
pub fn inspect_wav(bytes: &[u8]) -> Result<WavInfo, ClipError> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(ClipError::UnsupportedEncoding {
            bits: spec.bits_per_sample,
            format: spec.sample_format,
        });
    }
    if spec.sample_rate != SAMPLE_RATE {
        return Err(ClipError::SampleRateMismatch {
            expected: SAMPLE_RATE,
            found: spec.sample_rate,
        });
    }
    let frames = reader.duration();
    if frames == 0 {
        return Err(ClipError::Empty);
    }
    for sample in reader.samples::<i16>() {
        let _ = sample?;
    }

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        frames,
    })
}

/// Validated WAV data with its playback volume.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip {
    bytes: Vec<u8>,
    info: WavInfo,
    volume: f32,
}

impl Clip {
    /// Validates `bytes` and pairs them with a volume clamped to 0.0..=1.0.
    pub fn new(bytes: Vec<u8>, volume: f32) -> Result<Self, ClipError> {
        let info = inspect_wav(&bytes)?;
        Ok(Self {
            bytes,
            info,
            volume: volume.clamp(0.0, 1.0),
        })
    }

    /// Encoded WAV bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Playback volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Playback length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.info.duration()
    }
}

/// Every clip the game plays.
#[derive(Clone, Debug, PartialEq)]
pub struct Soundtrack {
    /// Fired projectile.
    pub shoot: Clip,
    /// Player destroyed.
    pub collision: Clip,
    /// Enemy faded out.
    pub enemy_destroyed: Clip,
    /// Looping background track.
    pub background: Clip,
}

impl Soundtrack {
    /// Synthesises and validates the default clips.
    pub fn synthesized() -> Result<Self, ClipError> {
        Ok(Self {
            shoot: Clip::new(encode_wav(&shoot_samples())?, 1.0)?,
            collision: Clip::new(encode_wav(&collision_samples())?, 1.0)?,
            enemy_destroyed: Clip::new(encode_wav(&enemy_destroyed_samples())?, 0.8)?,
            background: Clip::new(encode_wav(&background_samples())?, 0.3)?,
        })
    }

    /// Clip voicing `cue`.
    #[must_use]
    pub fn clip(&self, cue: SoundCue) -> &Clip {
        match cue {
            SoundCue::Shoot => &self.shoot,
            SoundCue::Collision => &self.collision,
            SoundCue::EnemyDestroyed => &self.enemy_destroyed,
        }
    }
}

/// Encodes mono samples as a 16-bit PCM WAV file at [`SAMPLE_RATE`].
pub fn encode_wav(samples: &[i16]) -> Result<Vec<u8>, ClipError> {
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, clip_spec())?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(cursor.into_inner())
}

fn sample_count(millis: u32) -> usize {
    (SAMPLE_RATE * millis / 1_000) as usize
}

fn to_pcm(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Square wave sweeping down from 1200 Hz to 400 Hz.
fn shoot_samples() -> Vec<i16> {
    let count = sample_count(120);
    let mut phase = 0.0_f32;
    (0..count)
        .map(|index| {
            let progress = index as f32 / count as f32;
            let frequency = 1_200.0 - 800.0 * progress;
            phase = (phase + frequency / SAMPLE_RATE as f32).fract();
            let square = if phase < 0.5 { 1.0 } else { -1.0 };
            to_pcm(square * 0.4 * (1.0 - progress))
        })
        .collect()
}

/// Decaying noise burst.
fn collision_samples() -> Vec<i16> {
    let count = sample_count(450);
    let mut rng = ChaCha8Rng::seed_from_u64(NOISE_SEED);
    let mut smoothed = 0.0_f32;
    (0..count)
        .map(|index| {
            let progress = index as f32 / count as f32;
            let noise: f32 = rng.gen_range(-1.0..1.0);
            smoothed += (noise - smoothed) * 0.35;
            to_pcm(smoothed * 0.9 * (1.0 - progress).powi(2))
        })
        .collect()
}

/// Two rising sine blips.
fn enemy_destroyed_samples() -> Vec<i16> {
    let count = sample_count(250);
    (0..count)
        .map(|index| {
            let progress = index as f32 / count as f32;
            let frequency = if progress < 0.5 { 660.0 } else { 990.0 };
            let time = index as f32 / SAMPLE_RATE as f32;
            to_pcm((TAU * frequency * time).sin() * 0.5 * (1.0 - progress))
        })
        .collect()
}

/// Looping bass arpeggio; starts and ends on silence so the loop is seamless.
fn background_samples() -> Vec<i16> {
    const NOTES: [f32; 8] = [110.0, 130.81, 164.81, 196.0, 164.81, 130.81, 110.0, 98.0];
    let note_len = sample_count(500);
    NOTES
        .iter()
        .flat_map(|&frequency| {
            (0..note_len).map(move |index| {
                let time = index as f32 / SAMPLE_RATE as f32;
                let progress = index as f32 / note_len as f32;
                let envelope = (progress * PI).sin();
                to_pcm((TAU * frequency * time).sin() * 0.35 * envelope)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_plane_core::{EnemyId, Point2D, ProjectileId};

    #[test]
    fn synthesized_soundtrack_validates() {
        let soundtrack = Soundtrack::synthesized().expect("synthesized clips are valid");

        assert_eq!(soundtrack.shoot.duration(), Duration::from_millis(120));
        assert_eq!(soundtrack.background.duration(), Duration::from_secs(4));
        assert_eq!(soundtrack.enemy_destroyed.volume(), 0.8);
        assert_eq!(soundtrack.background.volume(), 0.3);
        assert_eq!(soundtrack.clip(SoundCue::Collision), &soundtrack.collision);
    }

    fn encode_with(spec: WavSpec, samples: usize) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).expect("writer");
        for _ in 0..samples {
            match spec.sample_format {
                SampleFormat::Int => writer.write_sample(0_i16).expect("int sample"),
                SampleFormat::Float => writer.write_sample(0.0_f32).expect("float sample"),
            }
        }
        writer.finalize().expect("finalize");
        cursor.into_inner()
    }

    #[test]
    fn encoded_clip_reports_its_frames() {
        let bytes = encode_wav(&[0; 800]).expect("encode");
        let info = inspect_wav(&bytes).expect("inspect");

        assert_eq!(
            info,
            WavInfo {
                channels: 1,
                sample_rate: SAMPLE_RATE,
                frames: 800
            }
        );
        assert_eq!(info.duration(), Duration::from_millis(100));
    }

    #[test]
    fn truncated_clip_is_rejected() {
        let mut bytes = encode_wav(&[0, 1, 2, 3]).expect("encode");
        bytes.truncate(bytes.len() - 5);

        assert!(matches!(
            Clip::new(bytes, 1.0),
            Err(ClipError::Malformed(_))
        ));
    }

    #[test]
    fn wrong_sample_rate_is_rejected() {
        let spec = WavSpec {
            sample_rate: 44_100,
            ..clip_spec()
        };

        assert!(matches!(
            inspect_wav(&encode_with(spec, 16)),
            Err(ClipError::SampleRateMismatch {
                expected: SAMPLE_RATE,
                found: 44_100
            })
        ));
    }

    #[test]
    fn float_samples_are_rejected() {
        let spec = WavSpec {
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
            ..clip_spec()
        };

        assert!(matches!(
            inspect_wav(&encode_with(spec, 16)),
            Err(ClipError::UnsupportedEncoding {
                bits: 32,
                format: SampleFormat::Float
            })
        ));
    }

    #[test]
    fn non_wav_data_is_rejected() {
        assert!(matches!(
            inspect_wav(b"OggS"),
            Err(ClipError::Malformed(_))
        ));
        assert!(matches!(
            inspect_wav(b"RIFF\0\0\0\0AVI "),
            Err(ClipError::Malformed(_))
        ));
        assert!(matches!(
            inspect_wav(&encode_wav(&[]).expect("encode")),
            Err(ClipError::Empty)
        ));
    }

    #[test]
    fn retrigger_gate_skips_overlapping_plays() {
        let mut gate = RetriggerGate::default();
        let length = Duration::from_millis(120);

        assert!(gate.admit(1.0, length));
        assert!(!gate.admit(1.1, length));
        assert!(gate.admit(1.2, length));
    }

    #[test]
    fn only_audible_events_map_to_cues() {
        assert_eq!(
            SoundCue::from_event(&Event::ProjectileFired {
                projectile: ProjectileId::new(0),
                origin: Point2D::default(),
            }),
            Some(SoundCue::Shoot)
        );
        assert_eq!(
            SoundCue::from_event(&Event::EnemyDestroyed {
                enemy: EnemyId::new(1),
                score: 1
            }),
            Some(SoundCue::EnemyDestroyed)
        );
        assert_eq!(
            SoundCue::from_event(&Event::EnemyEscaped {
                enemy: EnemyId::new(2)
            }),
            None
        );
    }
}
