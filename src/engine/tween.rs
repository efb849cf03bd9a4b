//! Frame-sampled property tweens.
//!
//! A tween owns a target and one or more tracks (prop, from, to). The set is
//! sampled once per frame; finished tweens hand back their completion message
//! instead of calling a closure, the owner decides whether it is still valid.

use super::stage::{Prop, Target};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    /// quadratic ease-out
    Power1Out,
    /// cubic ease-in-out
    Power2InOut,
}

impl Ease {
    /// `t` is clamped to [0, 1], the curve always maps 0 -> 0 and 1 -> 1
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

pub fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    from + (to - from) * amount
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub prop: Prop,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone)]
pub struct Tween<C> {
    target: Target,
    tracks: Vec<Track>,
    start: f64,
    duration: f64,
    ease: Ease,
    on_complete: Option<C>,
}

impl<C> Tween<C> {
    /// `start` and `duration_ms` are on the timeline clock
    pub fn new(target: Target, start: f64, duration_ms: f64, ease: Ease) -> Self {
        Tween {
            target,
            tracks: Vec::new(),
            start,
            duration: duration_ms.max(0.0),
            ease,
            on_complete: None,
        }
    }

    pub fn track(mut self, prop: Prop, from: f64, to: f64) -> Self {
        self.tracks.push(Track { prop, from, to });
        self
    }

    pub fn on_complete(mut self, completion: C) -> Self {
        self.on_complete = Some(completion);
        self
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub target: Target,
    pub prop: Prop,
    pub value: f64,
}

/// Output of one `TweenSet::sample` pass
#[derive(Debug)]
pub struct Frame<C> {
    pub samples: Vec<Sample>,
    pub completed: Vec<C>,
}

#[derive(Debug)]
pub struct TweenSet<C> {
    tweens: Vec<Tween<C>>,
}

impl<C> Default for TweenSet<C> {
    fn default() -> Self {
        TweenSet { tweens: Vec::new() }
    }
}

impl<C> TweenSet<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, tween: Tween<C>) {
        self.tweens.push(tween);
    }

    /// Drops every tween on `target` without sampling or completing it
    pub fn kill_tweens_of(&mut self, target: Target) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|tween| tween.target != target);
        before - self.tweens.len()
    }

    #[cfg(test)]
    pub fn is_tweening(&self, target: Target) -> bool {
        self.tweens.iter().any(|tween| tween.target == target)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Samples every track at `now`, removes finished tweens
    /// - a finished tween's last sample is exactly its `to` value
    pub fn sample(&mut self, now: f64) -> Frame<C> {
        let mut samples = Vec::new();
        let mut completed = Vec::new();

        for tween in &self.tweens {
            let eased = tween.ease.apply(tween.progress(now));
            samples.extend(tween.tracks.iter().map(|track| Sample {
                target: tween.target,
                prop: track.prop,
                value: lerp(track.from, track.to, eased),
            }));
        }

        let (finished, running): (Vec<_>, Vec<_>) = self
            .tweens
            .drain(..)
            .partition(|tween| tween.is_finished(now));
        self.tweens = running;
        completed.extend(finished.into_iter().filter_map(|tween| tween.on_complete));

        Frame { samples, completed }
    }
}
