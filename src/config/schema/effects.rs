use serde::{Deserialize, Serialize};

/// Host-side visual and audio effects applied together with a consequence.
///
/// The engine never renders these itself; they travel to the host inside a
/// `ConsequencePlan` when `enable-effects` is on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EffectsConfig {
    #[serde(default)]
    pub lightning: LightningConfig,
    #[serde(default)]
    pub particles: ParticlesConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LightningConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_strike_count")]
    pub strike_count: u32,
}

fn default_strike_count() -> u32 {
    3
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strike_count: default_strike_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParticlesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_particle_count")]
    pub count: u32,
}

fn default_particle_count() -> u32 {
    1
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: default_particle_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sound")]
    pub sound: String,
    #[serde(default = "default_unit")]
    pub volume: f32,
    #[serde(default = "default_unit")]
    pub pitch: f32,
}

fn default_sound() -> String {
    "ENTITY_GENERIC_EXPLODE".into()
}

fn default_unit() -> f32 {
    1.0
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: default_sound(),
            volume: default_unit(),
            pitch: default_unit(),
        }
    }
}

fn default_true() -> bool {
    true
}
