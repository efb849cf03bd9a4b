use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// What a slide does once it becomes active, resolved once at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideEffect {
    #[default]
    None,
    HeartLoop,
    FlameLoop,
    BattleSequence,
}

impl SlideEffect {
    /// Parses a `data-effect` marker
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(SlideEffect::None),
            "hearts" | "heart-loop" => Some(SlideEffect::HeartLoop),
            "flames" | "flame-loop" => Some(SlideEffect::FlameLoop),
            "battle" | "battle-sequence" => Some(SlideEffect::BattleSequence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// The fixed, ordered slide sequence plus the presentation cursor
/// - a slide is active iff it is under the cursor, so exactly one ever is
#[derive(Debug, Clone)]
pub struct Deck {
    effects: Vec<SlideEffect>,
    current: usize,
}

impl Deck {
    pub fn new(effects: Vec<SlideEffect>) -> Result<Self> {
        ensure!(!effects.is_empty(), "A presentation needs at least one slide");
        Ok(Deck {
            effects,
            current: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_active(&self, slide: usize) -> bool {
        slide == self.current
    }

    pub fn effect(&self, slide: usize) -> SlideEffect {
        self.effects.get(slide).copied().unwrap_or_default()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.effects.len()
    }

    /// Direction of travel to `target`
    /// - None for an out of range target or the current slide
    pub fn resolve(&self, target: usize) -> Option<Direction> {
        if target >= self.effects.len() || target == self.current {
            return None;
        }
        if target > self.current {
            Some(Direction::Forward)
        } else {
            Some(Direction::Backward)
        }
    }

    /// Only the slideshow moves the cursor, after the old slide's teardown
    pub(crate) fn set_current(&mut self, slide: usize) {
        debug_assert!(slide < self.effects.len());
        self.current = slide;
    }
}
