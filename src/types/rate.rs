//! Emission rate control
//!
//! The configured rate is resolved once, against the source's native rate,
//! before the pacer starts. A configured rate may only lower the native rate
//! (frames are skipped); it never raises it (frames would have to be duplicated).

use serde::{Deserialize, Serialize};

use crate::{Result, SourceInfo, StreamError};

/// Lowest emission rate a session can declare
pub const MIN_FPS: u32 = 1;

/// Highest emission rate a session can declare
pub const MAX_FPS: u32 = 120;

/// Ratio by which a whole rate may exceed an NTSC-style native rate (30 over 30000/1001)
pub const NTSC_TOLERANCE: f64 = 1001.0 / 1000.0;

/// Configured emission rate
///
/// Deserializes from an integer (`0` meaning auto) or the string `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRate", into = "RawRate")]
pub enum RateSetting {
    /// Follow the source's native rate
    Auto,

    /// Emit at this many frames per second
    Fixed(u32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawRate {
    Number(u32),
    Text(String),
}

impl TryFrom<RawRate> for RateSetting {
    type Error = String;

    fn try_from(raw: RawRate) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawRate::Number(fps) => Ok(RateSetting::from_fps(fps)),
            RawRate::Text(text) if text.eq_ignore_ascii_case("auto") => Ok(RateSetting::Auto),
            RawRate::Text(text) => text
                .trim()
                .parse::<u32>()
                .map(RateSetting::from_fps)
                .map_err(|_| format!("expected an integer fps or \"auto\", got '{text}'")),
        }
    }
}

impl From<RateSetting> for RawRate {
    fn from(rate: RateSetting) -> Self {
        match rate {
            RateSetting::Auto => RawRate::Text("auto".to_string()),
            RateSetting::Fixed(fps) => RawRate::Number(fps),
        }
    }
}

impl Default for RateSetting {
    fn default() -> Self {
        RateSetting::Fixed(30)
    }
}

impl RateSetting {
    /// Interpret a raw fps value, `0` meaning auto
    pub fn from_fps(fps: u32) -> Self {
        if fps == 0 { RateSetting::Auto } else { RateSetting::Fixed(fps) }
    }

    /// Check the configured value alone, without a source
    pub fn validate(self) -> Result<()> {
        match self {
            RateSetting::Auto => Ok(()),
            RateSetting::Fixed(fps) if (MIN_FPS..=MAX_FPS).contains(&fps) => Ok(()),
            RateSetting::Fixed(fps) => Err(StreamError::invalid_config(
                "video.fps",
                format!("{fps} is outside {MIN_FPS}-{MAX_FPS}"),
            )),
        }
    }

    /// Resolve against the source's native rate
    ///
    /// Fails when the configured rate exceeds the native rate. The only slack is
    /// [`NTSC_TOLERANCE`], so a 30000/1001 fps file accepts a 30 fps setting while
    /// a 29.5 fps file does not. `Auto` takes the fastest whole rate the source
    /// can feed and fails when that is below [`MIN_FPS`].
    pub fn resolve(self, info: &SourceInfo) -> Result<EffectiveRate> {
        self.validate()?;

        let native = info.native_rate;
        if !native.is_finite() || native <= 0.0 {
            return Err(StreamError::invalid_config(
                "video.native_fps",
                format!("native rate must be positive, got {native}"),
            ));
        }

        let ceiling = native * NTSC_TOLERANCE + 1e-6;
        let fps = match self {
            RateSetting::Auto => {
                let whole = ceiling.floor().min(MAX_FPS as f64) as u32;
                if whole < MIN_FPS {
                    return Err(StreamError::InvalidRate { configured: MIN_FPS, native });
                }
                whole
            }
            RateSetting::Fixed(fps) if fps as f64 > ceiling => {
                return Err(StreamError::InvalidRate { configured: fps, native });
            }
            RateSetting::Fixed(fps) => fps,
        };

        Ok(EffectiveRate { fps, native_rate: native })
    }
}

/// The rate a session actually runs at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRate {
    fps: u32,
    native_rate: f64,
}

impl EffectiveRate {
    /// Declared frames per second, constant for the session
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Native rate of the source this rate was resolved against
    pub fn native_rate(&self) -> f64 {
        self.native_rate
    }

    /// Source frames consumed per emitted frame, never below one
    pub fn frames_per_tick(&self) -> f64 {
        (self.native_rate / self.fps as f64).max(1.0)
    }

    /// Whether source frames must be skipped to hold this rate
    pub fn needs_skipping(&self) -> bool {
        self.frames_per_tick() > 1.0 + f64::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn info(native_rate: f64) -> SourceInfo {
        SourceInfo { width: 64, height: 48, native_rate, total_frames: 10 }
    }

    #[test]
    fn auto_resolves_to_native() {
        let rate = RateSetting::from_fps(0).resolve(&info(30.0)).unwrap();
        assert_eq!(rate.fps(), 30);
        assert!(!rate.needs_skipping());
    }

    #[test]
    fn faster_than_native_is_rejected() {
        let err = RateSetting::Fixed(60).resolve(&info(30.0)).unwrap_err();
        assert!(matches!(err, StreamError::InvalidRate { configured: 60, .. }));
        assert!(err.to_string().contains("60"));
        assert!(err.is_fatal_at_startup());
    }

    #[test]
    fn slower_than_native_skips_frames() {
        let rate = RateSetting::Fixed(15).resolve(&info(30.0)).unwrap();
        assert_eq!(rate.fps(), 15);
        assert_eq!(rate.frames_per_tick(), 2.0);
        assert!(rate.needs_skipping());
    }

    #[test]
    fn ntsc_native_rate_accepts_whole_setting() {
        let rate = RateSetting::Fixed(30).resolve(&info(30000.0 / 1001.0)).unwrap();
        assert_eq!(rate.fps(), 30);
        assert_eq!(rate.frames_per_tick(), 1.0);

        let auto = RateSetting::Auto.resolve(&info(60000.0 / 1001.0)).unwrap();
        assert_eq!(auto.fps(), 60);
    }

    #[test]
    fn fractional_native_rate_is_not_rounded_up() {
        let err = RateSetting::Fixed(30).resolve(&info(29.5)).unwrap_err();
        assert!(matches!(err, StreamError::InvalidRate { configured: 30, .. }));

        let rate = RateSetting::Fixed(29).resolve(&info(29.5)).unwrap();
        assert!(rate.needs_skipping());
    }

    #[test]
    fn auto_never_exceeds_native() {
        let rate = RateSetting::Auto.resolve(&info(29.6)).unwrap();
        assert_eq!(rate.fps(), 29);
        assert!(rate.frames_per_tick() >= 1.0);
    }

    #[test]
    fn auto_rejects_sources_slower_than_one_fps() {
        let err = RateSetting::Auto.resolve(&info(0.6)).unwrap_err();
        assert!(matches!(err, StreamError::InvalidRate { configured: MIN_FPS, .. }));
        assert!(err.is_fatal_at_startup());
    }

    #[test]
    fn out_of_range_settings_are_config_errors() {
        assert!(matches!(
            RateSetting::Fixed(121).validate(),
            Err(StreamError::InvalidConfig { .. })
        ));
        assert!(RateSetting::Fixed(120).validate().is_ok());
    }

    #[test]
    fn auto_clamps_very_fast_sources() {
        let rate = RateSetting::Auto.resolve(&info(240.0)).unwrap();
        assert_eq!(rate.fps(), MAX_FPS);
        assert_eq!(rate.frames_per_tick(), 2.0);
    }

    #[test]
    fn deserializes_numbers_and_auto() {
        let auto: RateSetting = serde_yaml_ng::from_str("auto").unwrap();
        let zero: RateSetting = serde_yaml_ng::from_str("0").unwrap();
        let fixed: RateSetting = serde_yaml_ng::from_str("25").unwrap();

        assert_eq!(auto, RateSetting::Auto);
        assert_eq!(zero, RateSetting::Auto);
        assert_eq!(fixed, RateSetting::Fixed(25));
        assert!(serde_yaml_ng::from_str::<RateSetting>("fast").is_err());
    }

    proptest! {
        #[test]
        fn resolution_never_exceeds_native(configured in 1u32..=120u32, native in 1u32..=120u32) {
            match RateSetting::Fixed(configured).resolve(&info(native as f64)) {
                Ok(rate) => {
                    prop_assert!(configured <= native);
                    prop_assert_eq!(rate.fps(), configured);
                    prop_assert!(rate.frames_per_tick() >= 1.0);
                }
                Err(StreamError::InvalidRate { .. }) => prop_assert!(configured > native),
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        #[test]
        fn auto_stays_within_native(native in 1.0f64..=240.0f64) {
            let rate = RateSetting::Auto.resolve(&info(native)).unwrap();
            prop_assert!(rate.fps() as f64 <= native * NTSC_TOLERANCE + 1e-6);
            prop_assert!(rate.fps() <= MAX_FPS);
        }
    }
}
