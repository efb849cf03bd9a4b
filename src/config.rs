use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Deserializer, Serialize};
use wasm_bindgen::JsValue;

/// Tunables handed to `main_js` as a plain JS object
/// - any missing field keeps its default
/// - `undefined` / `null` means "all defaults"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PresentationConfig {
    pub transition_ms: f64,
    pub title_entrance_ms: f64,
    /// extra time a particle stays in the DOM after its animation ends
    pub particle_linger_ms: f64,
    pub confetti_count: usize,
    #[serde(deserialize_with = "LoopConfig::hearts_over")]
    pub hearts: LoopConfig,
    #[serde(deserialize_with = "LoopConfig::flames_over")]
    pub flames: LoopConfig,
    pub battle: BattleConfig,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        PresentationConfig {
            transition_ms: 800.0,
            title_entrance_ms: 800.0,
            particle_linger_ms: 100.0,
            confetti_count: 40,
            hearts: LoopConfig::hearts(),
            flames: LoopConfig::flames(),
            battle: BattleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopConfig {
    pub start_delay_ms: f64,
    pub interval_ms: f64,
    pub initial_batch: usize,
    pub batch: usize,
    /// 0 spawns a whole batch at once
    pub stride_ms: f64,
}

impl LoopConfig {
    pub fn hearts() -> Self {
        LoopConfig {
            start_delay_ms: 300.0,
            interval_ms: 400.0,
            initial_batch: 12,
            batch: 12,
            stride_ms: 0.0,
        }
    }

    pub fn flames() -> Self {
        LoopConfig {
            start_delay_ms: 300.0,
            interval_ms: 1000.0,
            initial_batch: 15,
            batch: 10,
            stride_ms: 50.0,
        }
    }

    fn hearts_over<'de, D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        LoopOverrides::deserialize(deserializer).map(|overrides| overrides.over(Self::hearts()))
    }

    fn flames_over<'de, D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        LoopOverrides::deserialize(deserializer).map(|overrides| overrides.over(Self::flames()))
    }

    fn validate(&self, name: &str) -> Result<()> {
        ensure!(
            self.interval_ms > 0.0,
            "{}.intervalMs must be positive, got {}",
            name,
            self.interval_ms
        );
        ensure!(
            self.start_delay_ms >= 0.0 && self.stride_ms >= 0.0,
            "{} delays must not be negative",
            name
        );
        Ok(())
    }
}

/// A loop object as written in JS, hearts and flames have different
/// defaults so missing fields are filled in by the owning field
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LoopOverrides {
    start_delay_ms: Option<f64>,
    interval_ms: Option<f64>,
    initial_batch: Option<usize>,
    batch: Option<usize>,
    stride_ms: Option<f64>,
}

impl LoopOverrides {
    fn over(self, base: LoopConfig) -> LoopConfig {
        LoopConfig {
            start_delay_ms: self.start_delay_ms.unwrap_or(base.start_delay_ms),
            interval_ms: self.interval_ms.unwrap_or(base.interval_ms),
            initial_batch: self.initial_batch.unwrap_or(base.initial_batch),
            batch: self.batch.unwrap_or(base.batch),
            stride_ms: self.stride_ms.unwrap_or(base.stride_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleConfig {
    pub start_delay_ms: f64,
    pub duration_s: f64,
    pub kelly_target: f64,
    pub tammy_target: f64,
    pub banner_fade_s: f64,
    pub reaction_s: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            start_delay_ms: 500.0,
            duration_s: 7.0,
            kelly_target: 60.0,
            tammy_target: 90.0,
            banner_fade_s: 0.5,
            reaction_s: 1.5,
        }
    }
}

impl PresentationConfig {
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let config: Self = serde_wasm_bindgen::from_value(value)
            .map_err(|err| anyhow!("Invalid presentation config : {}", err))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.transition_ms >= 0.0 && self.title_entrance_ms >= 0.0,
            "transition durations must not be negative"
        );
        ensure!(self.particle_linger_ms >= 0.0, "particleLingerMs must not be negative");
        self.hearts.validate("hearts")?;
        self.flames.validate("flames")?;
        ensure!(
            self.battle.duration_s > 0.0,
            "battle.durationS must be positive, got {}",
            self.battle.duration_s
        );
        ensure!(
            self.battle.start_delay_ms >= 0.0
                && self.battle.banner_fade_s >= 0.0
                && self.battle.reaction_s >= 0.0,
            "battle timings must not be negative"
        );
        Ok(())
    }
}
