//! Player feedback preferences
//!
//! Consumed by the sound/haptics layers outside the core. The three-way
//! toggles are tagged enums with an explicit `next()` cycling table, not
//! bare numbers the UI compares against.

use serde::{Deserialize, Serialize};

/// Sound effect intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoundLevel {
    Off,
    Low,
    #[default]
    High,
}

impl SoundLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundLevel::Off => "Off",
            SoundLevel::Low => "Low",
            SoundLevel::High => "High",
        }
    }

    /// Advance to the next value in the cycle Off -> Low -> High -> Off
    pub fn next(self) -> Self {
        match self {
            SoundLevel::Off => SoundLevel::Low,
            SoundLevel::Low => SoundLevel::High,
            SoundLevel::High => SoundLevel::Off,
        }
    }

    /// Volume multiplier handed to the audio layer
    pub fn gain(&self) -> f32 {
        match self {
            SoundLevel::Off => 0.0,
            SoundLevel::Low => 0.4,
            SoundLevel::High => 1.0,
        }
    }
}

/// Haptic feedback intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HapticsLevel {
    Off,
    #[default]
    Low,
    High,
}

impl HapticsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticsLevel::Off => "Off",
            HapticsLevel::Low => "Low",
            HapticsLevel::High => "High",
        }
    }

    /// Advance to the next value in the cycle Off -> Low -> High -> Off
    pub fn next(self) -> Self {
        match self {
            HapticsLevel::Off => HapticsLevel::Low,
            HapticsLevel::Low => HapticsLevel::High,
            HapticsLevel::High => HapticsLevel::Off,
        }
    }
}

/// Feedback settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sound: SoundLevel,
    pub haptics: HapticsLevel,

    // === Accessibility ===
    /// Reduced motion (minimize reveal shake, confetti)
    pub reduced_motion: bool,

    // === HUD ===
    /// Show the per-round stats readout
    pub show_stats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: SoundLevel::High,
            haptics: HapticsLevel::Low,
            reduced_motion: false,
            show_stats: false,
        }
    }
}

impl Settings {
    /// Effective haptics level (respects reduced_motion)
    pub fn effective_haptics(&self) -> HapticsLevel {
        if self.reduced_motion {
            HapticsLevel::Off
        } else {
            self.haptics
        }
    }
}
