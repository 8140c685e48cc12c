//! Impact sound
//!
//! Procedurally generated thump - no external files needed! Each bounce picks
//! one of a few voices at random so repeated bounces don't sound identical.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Shape of one impact sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    /// Starting pitch (Hz)
    pub pitch: f32,
    /// Pitch the thump slides down to (Hz)
    pub drop_to: f32,
    /// Time for the gain to die away (seconds)
    pub decay: f64,
}

/// Available impact voices
pub const VOICES: [Voice; 3] = [
    Voice { pitch: 180.0, drop_to: 70.0, decay: 0.12 },
    Voice { pitch: 150.0, drop_to: 60.0, decay: 0.15 },
    Voice { pitch: 220.0, drop_to: 90.0, decay: 0.10 },
];

/// Seeded picker over [`VOICES`]
pub struct VoicePicker {
    rng: Pcg32,
}

impl VoicePicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn pick(&mut self) -> Voice {
        VOICES[self.rng.random_range(0..VOICES.len())]
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Voice, VoicePicker};
    use crate::error::AudioError;
    use crate::surface::ImpactAudio;

    fn playback_error(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Playback(format!("{:?}", e))
    }

    /// Impact sounds through the Web Audio API
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        voices: VoicePicker,
    }

    impl WebAudio {
        pub fn new(seed: u64) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                voices: VoicePicker::new(seed),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(playback_error)?;
            let gain = ctx.create_gain().map_err(playback_error)?;

            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(playback_error)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(playback_error)?;

            Ok((osc, gain))
        }

        fn play_voice(ctx: &AudioContext, voice: Voice, volume: f32) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, voice.pitch)?;
            let t = ctx.current_time();

            gain.gain()
                .set_value_at_time(volume, t)
                .map_err(playback_error)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + voice.decay)
                .map_err(playback_error)?;
            osc.frequency()
                .set_value_at_time(voice.pitch, t)
                .map_err(playback_error)?;
            osc.frequency()
                .exponential_ramp_to_value_at_time(voice.drop_to, t + voice.decay)
                .map_err(playback_error)?;

            osc.start().map_err(playback_error)?;
            osc.stop_with_when(t + voice.decay + 0.03)
                .map_err(playback_error)?;
            Ok(())
        }
    }

    impl ImpactAudio for WebAudio {
        fn play_impact(&mut self, volume: f32) -> Result<(), AudioError> {
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let voice = self.voices.pick();
            Self::play_voice(ctx, voice, volume.clamp(0.0, 1.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_is_deterministic() {
        let mut a = VoicePicker::new(42);
        let mut b = VoicePicker::new(42);
        for _ in 0..20 {
            assert_eq!(a.pick(), b.pick());
        }
    }

    #[test]
    fn test_picker_uses_every_voice() {
        let mut picker = VoicePicker::new(7);
        let picks: Vec<Voice> = (0..200).map(|_| picker.pick()).collect();
        for voice in VOICES {
            assert!(picks.contains(&voice));
        }
    }

    #[test]
    fn test_voices_slide_down() {
        for voice in VOICES {
            assert!(voice.drop_to > 0.0 && voice.drop_to < voice.pitch);
            assert!(voice.decay > 0.0);
        }
    }
}
