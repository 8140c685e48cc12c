//! Rope settings
//!
//! Read once at startup from the page; never written back.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::PhysicsParams;

/// Rope behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Variant {
    /// Huge stiffness, start screen, sound and strict input checks
    #[default]
    Inelastic,
    /// Unit stiffness, runs immediately, silently, ignoring bad input.
    /// The impulse is normalized, so it swings like `Inelastic`; only a
    /// stiffness of zero would change the motion.
    Elastic,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Inelastic => "Inelastic",
            Variant::Elastic => "Elastic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "inelastic" | "rigid" => Some(Variant::Inelastic),
            "elastic" | "soft" => Some(Variant::Elastic),
            _ => None,
        }
    }

    /// Constraint stiffness for this variant
    pub fn stiffness(&self) -> f32 {
        match self {
            Variant::Inelastic => STIFFNESS,
            Variant::Elastic => 1.0,
        }
    }
}

/// Rope configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which variant the toggles below were derived from
    pub variant: Variant,

    // === Canvas ===
    pub width: f32,
    pub height: f32,

    // === Rope ===
    /// Rest length of the rope
    pub rope_length: f32,
    pub gravity: f32,
    pub stiffness: f32,
    /// Velocity kept on a wall bounce
    pub damping: f32,

    // === Session ===
    /// Wait for a first click before simulating
    pub start_gate: bool,
    /// Report non-finite pointer coordinates instead of dropping them
    pub strict_input: bool,

    // === Audio ===
    pub audio_enabled: bool,
    /// Loudest impact (0.0 - 1.0)
    pub max_volume: f32,
    /// Impacts quieter than this are not played
    pub min_volume: f32,
    /// Speed scale for impact volume (`4 * speed / reference_speed`)
    pub reference_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Inelastic,

            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,

            rope_length: ROPE_LENGTH,
            gravity: GRAVITY,
            stiffness: STIFFNESS,
            damping: BOUNCE_DAMPING,

            start_gate: true,
            strict_input: true,

            audio_enabled: true,
            max_volume: MAX_IMPACT_VOLUME,
            min_volume: MIN_IMPACT_VOLUME,
            reference_speed: IMPACT_REFERENCE_SPEED,
        }
    }
}

impl Settings {
    /// Create settings from a variant (applies variant defaults)
    pub fn from_variant(variant: Variant) -> Self {
        let mut settings = Self::default();
        settings.apply_variant(variant);
        settings
    }

    /// Apply a variant (updates variant-dependent toggles)
    pub fn apply_variant(&mut self, variant: Variant) {
        self.variant = variant;
        self.stiffness = variant.stiffness();

        let inelastic = variant == Variant::Inelastic;
        self.start_gate = inelastic;
        self.audio_enabled = inelastic;
        self.strict_input = inelastic;
    }

    /// Physics constants for the rope
    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            width: self.width,
            height: self.height,
            gravity: self.gravity,
            stiffness: self.stiffness,
            damping: self.damping,
        }
    }

    /// Volume for an impact at `speed`, or `None` if it is too quiet to play
    pub fn impact_volume(&self, speed: f32) -> Option<f32> {
        if !self.reference_speed.is_finite() || self.reference_speed <= 0.0 {
            return None;
        }
        let volume = (4.0 * speed / self.reference_speed).clamp(0.0, self.max_volume);
        (volume >= self.min_volume).then_some(volume)
    }

    /// Parse a JSON settings document.
    ///
    /// A `variant` key selects the base toggles; any other field present
    /// overrides them. Missing fields keep the variant's values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let variant = match overrides.get("variant") {
            Some(v) => Variant::deserialize(v)?,
            None => Variant::default(),
        };
        Self::from_variant(variant).merged(overrides)
    }

    /// Layer the fields of a JSON object over these settings
    fn merged(&self, overrides: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(self)?;
        if let (Some(base), serde_json::Value::Object(fields)) = (base.as_object_mut(), overrides) {
            base.extend(fields);
        }
        serde_json::from_value(base)
    }

    /// Query parameter that picks a variant, e.g. `?variant=elastic`
    const QUERY_KEY: &'static str = "variant";

    /// Variant named in a URL query string, if any
    pub fn variant_from_query(query: &str) -> Option<Variant> {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == Self::QUERY_KEY)
            .and_then(|(_, value)| Variant::from_str(value))
    }

    /// Id of the `<script type="application/json">` element holding overrides
    const ELEMENT_ID: &'static str = "rope-settings";

    /// Load settings embedded in the page (WASM only)
    ///
    /// A `?variant=` query parameter wins over the page's variant; the
    /// page's explicit fields still apply on top.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let window = web_sys::window();
        let query_variant = window
            .as_ref()
            .and_then(|w| w.location().search().ok())
            .and_then(|q| Self::variant_from_query(&q));

        let json = window
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content())
            .unwrap_or_default();

        match Self::resolve(&json, query_variant) {
            Ok(settings) => {
                log::info!(
                    "Loaded {} settings from #{}",
                    settings.variant.as_str(),
                    Self::ELEMENT_ID
                );
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid #{}: {}", Self::ELEMENT_ID, e);
                Self::from_variant(query_variant.unwrap_or_default())
            }
        }
    }

    /// Combine the page document with a variant picked outside it
    pub fn resolve(json: &str, variant: Option<Variant>) -> Result<Self, serde_json::Error> {
        let mut overrides: serde_json::Value = if json.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(json)?
        };
        if let (Some(variant), Some(fields)) = (variant, overrides.as_object_mut()) {
            fields.insert("variant".into(), serde_json::to_value(variant)?);
        }
        Self::from_json(&overrides.to_string())
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No #{} element outside the browser", Self::ELEMENT_ID);
        Self::default()
    }
}
