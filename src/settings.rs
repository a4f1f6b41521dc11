//! Demo preferences
//!
//! Persisted separately from the match tally in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_POINT_SIZE;
use crate::demos::DemoKind;

/// Brush values for the sketch pad
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Brush {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Point quad side length in pixels
    pub size: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 0.0,
            b: 0.0,
            size: DEFAULT_POINT_SIZE,
        }
    }
}

impl Brush {
    pub fn color(&self) -> [f32; 4] {
        [
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            1.0,
        ]
    }
}

/// Per-user preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Demo to open on launch
    pub demo: DemoKind,
    /// Sketch-pad brush
    pub brush: Brush,
    /// Polygon shading intensity, 0..=1
    pub shade_intensity: f32,
    /// Show the FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            demo: DemoKind::Tug,
            brush: Brush::default(),
            shade_intensity: 1.0,
            show_fps: true,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tug_of_rps_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_color_clamped() {
        let brush = Brush {
            r: 1.5,
            g: -0.2,
            b: 0.4,
            size: 10.0,
        };
        assert_eq!(brush.color(), [1.0, 0.0, 0.4, 1.0]);
    }

    #[test]
    fn test_settings_round_trip_json() {
        let settings = Settings {
            demo: DemoKind::Lighting,
            shade_intensity: 0.6,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.demo, DemoKind::Lighting);
        assert_eq!(back.shade_intensity, 0.6);
    }
}
