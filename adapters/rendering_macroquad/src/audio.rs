//! Sound playback through macroquad's audio stack.

use anyhow::Result;
use log::info;
use pixel_plane_rendering::{
    audio::{AudioBackend, SilentAudio},
    Soundtrack,
};

/// Opens the audio backend for `soundtrack`, or a silent one when muted.
pub(crate) async fn open(soundtrack: Option<&Soundtrack>) -> Result<Box<dyn AudioBackend>> {
    let Some(soundtrack) = soundtrack else {
        info!("audio muted");
        return Ok(Box::new(SilentAudio));
    };

    open_soundtrack(soundtrack).await
}

#[cfg(feature = "audio")]
async fn open_soundtrack(soundtrack: &Soundtrack) -> Result<Box<dyn AudioBackend>> {
    Ok(Box::new(playback::MacroquadAudio::load(soundtrack).await?))
}

#[cfg(not(feature = "audio"))]
async fn open_soundtrack(_soundtrack: &Soundtrack) -> Result<Box<dyn AudioBackend>> {
    log::warn!("built without the `audio` feature; sound cues will not be played");
    Ok(Box::new(SilentAudio))
}

#[cfg(feature = "audio")]
mod playback {
    use anyhow::{anyhow, Result};
    use log::debug;
    use macroquad::{
        audio::{self, PlaySoundParams, Sound},
        time::get_time,
    };
    use pixel_plane_rendering::{
        audio::{AudioBackend, Clip, RetriggerGate},
        SoundCue, Soundtrack,
    };
    use std::time::Duration;

    struct LoadedClip {
        sound: Sound,
        volume: f32,
        duration: Duration,
    }

    impl LoadedClip {
        async fn load(name: &str, clip: &Clip) -> Result<Self> {
            let sound = audio::load_sound_from_bytes(clip.bytes())
                .await
                .map_err(|error| anyhow!("failed to load {name} clip: {error:?}"))?;
            debug!("loaded {name} clip ({:?})", clip.duration());
            Ok(Self {
                sound,
                volume: clip.volume(),
                duration: clip.duration(),
            })
        }

        /// Rewinds the clip before playing it again.
        fn replay(&self) {
            audio::stop_sound(self.sound);
            self.play(false);
        }

        fn play(&self, looped: bool) {
            audio::play_sound(
                self.sound,
                PlaySoundParams {
                    looped,
                    volume: self.volume,
                },
            );
        }
    }

    pub(super) struct MacroquadAudio {
        shoot: LoadedClip,
        shoot_gate: RetriggerGate,
        collision: LoadedClip,
        enemy_destroyed: LoadedClip,
        background: LoadedClip,
    }

    impl MacroquadAudio {
        pub(super) async fn load(soundtrack: &Soundtrack) -> Result<Self> {
            Ok(Self {
                shoot: LoadedClip::load("shoot", &soundtrack.shoot).await?,
                shoot_gate: RetriggerGate::default(),
                collision: LoadedClip::load("collision", &soundtrack.collision).await?,
                enemy_destroyed: LoadedClip::load("enemy destroyed", &soundtrack.enemy_destroyed)
                    .await?,
                background: LoadedClip::load("background", &soundtrack.background).await?,
            })
        }
    }

    impl AudioBackend for MacroquadAudio {
        fn start_background(&mut self) {
            audio::stop_sound(self.background.sound);
            self.background.play(true);
            debug!("background track looping");
        }

        fn play(&mut self, cue: SoundCue) {
            match cue {
                SoundCue::Shoot => {
                    // A held fire button would otherwise stack overlapping copies.
                    if self.shoot_gate.admit(get_time(), self.shoot.duration) {
                        self.shoot.play(false);
                    }
                }
                SoundCue::Collision => self.collision.replay(),
                SoundCue::EnemyDestroyed => self.enemy_destroyed.replay(),
            }
        }
    }
}
