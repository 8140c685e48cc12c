//! Host-facing rope app
//!
//! Owns the rope and wires it to whatever surface and audio the host injects.
//! The host calls `initialize` once, `on_pointer_*` from its input handlers and
//! `frame` once per display frame.

use glam::Vec2;

use crate::consts::*;
use crate::error::RopeError;
use crate::settings::Settings;
use crate::sim::{Rope, RopeEvent};
use crate::surface::{DrawSurface, ImpactAudio, gray};

/// Translucent band behind the start prompt
const SPLASH_BAND: [f32; 4] = [1.0, 1.0, 1.0, 0.2];

/// The rope toy with its collaborators
pub struct RopeApp<A: ImpactAudio> {
    pub rope: Rope,
    settings: Settings,
    audio: A,
    started: bool,
}

impl<A: ImpactAudio> RopeApp<A> {
    /// Build the rope hanging to the right of its start anchor
    pub fn new(settings: Settings, audio: A) -> Result<Self, RopeError> {
        let length = settings.rope_length;
        let rope = Rope::new(
            ANCHOR_START,
            ANCHOR_START + Vec2::new(length, 0.0),
            length,
            settings.physics(),
        )?;
        let started = !settings.start_gate;

        log::info!(
            "Rope ready ({} variant, length {}, start gate {})",
            settings.variant.as_str(),
            length,
            if settings.start_gate { "on" } else { "off" }
        );

        Ok(Self {
            rope,
            settings,
            audio,
            started,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Paint the first frame: background, plus the splash band while gated
    pub fn initialize(&self, surface: &mut impl DrawSurface) {
        surface.background(gray(BACKGROUND_GRAY));
        if !self.started {
            let (w, h) = (self.settings.width, self.settings.height);
            surface.rect(Vec2::new(0.0, h * 0.25), Vec2::new(w, h * 0.5), SPLASH_BAND);
        }
    }

    /// Open the start gate. Returns true only on the press that opened it.
    pub fn on_pointer_down(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        log::info!("Simulation started");
        true
    }

    /// Drag the anchor. Runs whether or not the gate is open.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> Result<(), RopeError> {
        match self.rope.set_anchor(x, y) {
            Ok(()) => Ok(()),
            Err(e) if self.settings.strict_input => Err(e),
            Err(e) => {
                log::debug!("Ignoring pointer move: {}", e);
                Ok(())
            }
        }
    }

    /// Advance physics by the elapsed frame time and voice any bounces
    pub fn update(&mut self, dt: f32) -> Result<(), RopeError> {
        if !self.started {
            return Ok(());
        }
        self.rope.step(dt)?;

        for event in std::mem::take(&mut self.rope.events) {
            match event {
                RopeEvent::Bounce { speed, .. } => self.play_bounce(speed),
            }
        }
        Ok(())
    }

    /// Draw the sagging rope and its endpoints
    pub fn render(&self, surface: &mut impl DrawSurface) {
        if !self.started {
            return;
        }
        surface.background(gray(BACKGROUND_GRAY));

        surface.stroke_weight(ROPE_STROKE);
        let points = self.rope.curve_points(CURVE_SEGMENTS);
        for pair in points.windows(2) {
            surface.line(pair[0], pair[1]);
        }

        surface.stroke_weight(ENDPOINT_STROKE);
        surface.circle(self.rope.anchor, ENDPOINT_DIAMETER);
        surface.circle(self.rope.free, ENDPOINT_DIAMETER);
    }

    /// One display frame: update then render
    pub fn frame(&mut self, dt: f32, surface: &mut impl DrawSurface) -> Result<(), RopeError> {
        self.update(dt)?;
        self.render(surface);
        Ok(())
    }

    fn play_bounce(&mut self, speed: f32) {
        if !self.settings.audio_enabled {
            return;
        }
        let Some(volume) = self.settings.impact_volume(speed) else {
            return;
        };
        if let Err(e) = self.audio.play_impact(volume) {
            log::warn!("Could not play audio: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;
    use crate::settings::Variant;
    use crate::surface::Color;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Background,
        StrokeWeight(f32),
        Line(Vec2, Vec2),
        Circle(Vec2, f32),
        Rect(Vec2, Vec2),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl DrawSurface for Recorder {
        fn background(&mut self, _color: Color) {
            self.calls.push(Call::Background);
        }
        fn stroke_weight(&mut self, weight: f32) {
            self.calls.push(Call::StrokeWeight(weight));
        }
        fn line(&mut self, from: Vec2, to: Vec2) {
            self.calls.push(Call::Line(from, to));
        }
        fn circle(&mut self, center: Vec2, diameter: f32) {
            self.calls.push(Call::Circle(center, diameter));
        }
        fn rect(&mut self, min: Vec2, size: Vec2, _color: Color) {
            self.calls.push(Call::Rect(min, size));
        }
    }

    #[derive(Default)]
    struct FakeAudio {
        volumes: Vec<f32>,
        broken: bool,
    }

    impl ImpactAudio for FakeAudio {
        fn play_impact(&mut self, volume: f32) -> Result<(), AudioError> {
            if self.broken {
                return Err(AudioError::Playback("decoder missing".into()));
            }
            self.volumes.push(volume);
            Ok(())
        }
    }

    fn app(settings: Settings) -> RopeApp<FakeAudio> {
        RopeApp::new(settings, FakeAudio::default()).unwrap()
    }

    #[test]
    fn test_new_places_rope_at_start() {
        let app = app(Settings::default());
        assert_eq!(app.rope.anchor, Vec2::new(100.0, 100.0));
        assert_eq!(app.rope.free, Vec2::new(400.0, 100.0));
        assert_eq!(app.rope.rest_length(), 300.0);
    }

    #[test]
    fn test_new_rejects_bad_length() {
        let settings = Settings {
            rope_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            RopeApp::new(settings, FakeAudio::default()),
            Err(RopeError::InvalidLength)
        ));
    }

    #[test]
    fn test_start_gate_holds_simulation() {
        let mut app = app(Settings::default());
        let mut surface = Recorder::default();

        app.initialize(&mut surface);
        assert_eq!(surface.calls[0], Call::Background);
        assert!(matches!(surface.calls[1], Call::Rect(_, size) if size.x == 800.0));

        surface.calls.clear();
        app.frame(0.016, &mut surface).unwrap();
        assert!(surface.calls.is_empty());
        assert_eq!(app.rope.velocity, Vec2::ZERO);

        assert!(app.on_pointer_down());
        assert!(!app.on_pointer_down());
        app.frame(0.016, &mut surface).unwrap();
        assert!(app.rope.velocity.y > 0.0);
        assert!(!surface.calls.is_empty());
    }

    #[test]
    fn test_elastic_variant_runs_immediately() {
        let mut app = app(Settings::from_variant(Variant::Elastic));
        assert!(app.is_started());

        let mut surface = Recorder::default();
        app.initialize(&mut surface);
        assert_eq!(surface.calls, vec![Call::Background]);

        app.update(0.016).unwrap();
        assert!(app.rope.velocity.y > 0.0);
    }

    #[test]
    fn test_pointer_moves_before_start() {
        let mut app = app(Settings::default());
        app.on_pointer_move(120.0, 90.0).unwrap();
        assert_eq!(app.rope.anchor, Vec2::new(120.0, 90.0));
    }

    #[test]
    fn test_pointer_outside_canvas_flings_rope() {
        let mut app = app(Settings::default());
        app.on_pointer_down();

        app.on_pointer_move(-200.0, 1200.0).unwrap();
        assert_eq!(app.rope.anchor, Vec2::new(-200.0, 1200.0));
        assert!(app.rope.velocity.x < 0.0 && app.rope.velocity.y > 0.0);

        app.update(0.016).unwrap();
        assert_eq!(app.rope.anchor, Vec2::new(-200.0, 1200.0));
        assert!(app.rope.params().contains(app.rope.free));
    }

    #[test]
    fn test_strict_and_lenient_input() {
        let mut strict = app(Settings::default());
        assert_eq!(
            strict.on_pointer_move(f32::NAN, 10.0),
            Err(RopeError::NonFinite { name: "x" })
        );

        let mut lenient = app(Settings::from_variant(Variant::Elastic));
        assert!(lenient.on_pointer_move(f32::NAN, 10.0).is_ok());
        assert_eq!(lenient.rope.anchor, ANCHOR_START);
        assert!(lenient.rope.velocity.is_finite());
    }

    #[test]
    fn test_render_draws_curve_then_endpoints() {
        let mut app = app(Settings::from_variant(Variant::Elastic));
        app.rope.free = Vec2::new(250.0, 200.0);
        let mut surface = Recorder::default();

        app.render(&mut surface);

        let lines: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Line(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), CURVE_SEGMENTS);
        assert_eq!(lines[0].0, app.rope.anchor);
        assert_eq!(lines[lines.len() - 1].1, app.rope.free);

        assert_eq!(surface.calls[0], Call::Background);
        assert_eq!(surface.calls[1], Call::StrokeWeight(ROPE_STROKE));
        let tail = &surface.calls[surface.calls.len() - 3..];
        assert_eq!(
            tail,
            &[
                Call::StrokeWeight(ENDPOINT_STROKE),
                Call::Circle(app.rope.anchor, ENDPOINT_DIAMETER),
                Call::Circle(app.rope.free, ENDPOINT_DIAMETER),
            ]
        );
    }

    #[test]
    fn test_hard_bounce_plays_capped_volume() {
        let mut app = app(Settings::default());
        app.on_pointer_down();
        app.rope.anchor = Vec2::new(400.0, 700.0);
        app.rope.free = Vec2::new(400.0, 795.0);
        app.rope.velocity = Vec2::new(0.0, 50.0);

        app.update(0.016).unwrap();

        assert_eq!(app.audio.volumes, vec![MAX_IMPACT_VOLUME]);
        assert!(app.rope.free.y < 795.0);
        assert!(app.rope.events.is_empty());
    }

    #[test]
    fn test_gentle_bounce_is_silent() {
        let mut app = app(Settings::default());
        app.on_pointer_down();
        app.rope.anchor = Vec2::new(400.0, 700.0);
        app.rope.free = Vec2::new(400.0, 800.0);
        app.rope.velocity = Vec2::new(0.0, 1.0);

        app.update(0.016).unwrap();

        assert!(app.rope.velocity.y < 0.0);
        assert!(app.audio.volumes.is_empty());
    }

    #[test]
    fn test_audio_failure_does_not_stop_physics() {
        let mut app = RopeApp::new(
            Settings::default(),
            FakeAudio {
                broken: true,
                ..Default::default()
            },
        )
        .unwrap();
        app.on_pointer_down();
        app.rope.anchor = Vec2::new(400.0, 700.0);
        app.rope.free = Vec2::new(400.0, 795.0);
        app.rope.velocity = Vec2::new(0.0, 50.0);

        assert!(app.update(0.016).is_ok());
        assert!(app.rope.velocity.y < 0.0);
        assert!(app.update(0.016).is_ok());
    }

    #[test]
    fn test_update_propagates_bad_timestep() {
        let mut app = app(Settings::from_variant(Variant::Elastic));
        assert!(matches!(
            app.update(f32::INFINITY),
            Err(RopeError::InvalidTimestep(_))
        ));
    }
}
