use tracing::warn;

/// Parameters of one bloom frame.
///
/// Values are artist facing knobs and are not clamped: negative intensities
/// or saturations reach the shaders unchanged. Only `blur_amount` is checked,
/// when the blur kernel is computed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloomSettings {
    /// Luminance below this is dropped by the extract pass.
    pub threshold: f32,
    /// Theta of the gaussian blur.
    pub blur_amount: f32,
    pub bloom_intensity: f32,
    pub base_intensity: f32,
    pub bloom_saturation: f32,
    pub base_saturation: f32,
}

impl BloomSettings {
    pub const fn new(
        threshold: f32,
        blur_amount: f32,
        bloom_intensity: f32,
        base_intensity: f32,
        bloom_saturation: f32,
        base_saturation: f32,
    ) -> Self {
        Self {
            threshold,
            blur_amount,
            bloom_intensity,
            base_intensity,
            bloom_saturation,
            base_saturation,
        }
    }

    /// The named preset catalog, in order. The first entry is the default.
    pub const PRESETS: [(&'static str, BloomSettings); 6] = [
        ("Default", Self::new(0.25, 4.0, 1.25, 1.0, 1.0, 1.0)),
        ("Soft", Self::new(0.0, 3.0, 1.0, 1.0, 1.0, 1.0)),
        ("Desaturated", Self::new(0.5, 8.0, 2.0, 1.0, 0.0, 1.0)),
        ("Saturated", Self::new(0.25, 4.0, 2.0, 1.0, 2.0, 0.0)),
        ("Blurry", Self::new(0.0, 2.0, 1.0, 0.1, 1.0, 1.0)),
        ("Subtle", Self::new(0.5, 2.0, 1.0, 1.0, 1.0, 1.0)),
    ];

    /// Looks a preset up by name, ignoring ASCII case.
    pub fn preset(name: &str) -> Option<BloomSettings> {
        Self::PRESETS
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, settings)| *settings)
    }

    pub fn presets() -> impl Iterator<Item = (&'static str, BloomSettings)> {
        Self::PRESETS.into_iter()
    }

    /// Logs values that are accepted but unlikely to be intended.
    pub(crate) fn warn_suspicious(&self) {
        if self.threshold >= 1.0 {
            warn!(
                "Bloom threshold {} is >= 1, the extract pass will output black",
                self.threshold
            );
        }
    }
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self::PRESETS[0].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_preset() {
        assert_eq!(BloomSettings::default(), BloomSettings::PRESETS[0].1);
        assert_eq!(BloomSettings::PRESETS[0].0, "Default");
    }

    #[test]
    fn catalog_order() {
        let names: Vec<_> = BloomSettings::presets().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            ["Default", "Soft", "Desaturated", "Saturated", "Blurry", "Subtle"]
        );
    }

    #[test]
    fn preset_by_name() {
        let soft = BloomSettings::preset("soft").unwrap();
        assert_eq!(soft.threshold, 0.0);
        assert_eq!(soft.blur_amount, 3.0);

        let desaturated = BloomSettings::preset("Desaturated").unwrap();
        assert_eq!(desaturated.bloom_saturation, 0.0);
        assert_eq!(desaturated.blur_amount, 8.0);

        assert!(BloomSettings::preset("Glowing").is_none());
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let settings = BloomSettings {
            threshold: -1.0,
            bloom_saturation: -3.0,
            ..BloomSettings::default()
        };
        settings.warn_suspicious();
        assert_eq!(settings.threshold, -1.0);
        assert_eq!(settings.bloom_saturation, -3.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&BloomSettings::default()).unwrap();
        assert!(json.contains("\"blur_amount\":4.0"));
        let back: BloomSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BloomSettings::default());
    }
}
