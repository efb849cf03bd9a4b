// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Effects, leaf first                                 │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ particle.rs       │ one heart / flame / reaction + per-container arena   │
// │ effect_loop.rs    │ recurring spawner bound to the slide that started it │
// │ battle.rs         │ one-shot power interpolation + status label          │
// │ confetti.rs       │ decorative background pieces, seeded once            │
// └───────────────────┴──────────────────────────────────────────────────────┘
pub mod battle;
pub mod confetti;
pub mod effect_loop;
pub mod particle;

use crate::deck::SlideEffect;
use crate::engine::{Stage, Timeline};
use effect_loop::LoopKind;
use particle::Particles;
use rand::rngs::StdRng;

/// Everything the slideshow schedules on its timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// delayed per-slide setup (battle / hearts / flames)
    Setup { slide: usize, effect: SlideEffect },
    LoopTick(LoopKind),
    /// one staggered particle of a flame batch
    SpawnFlame,
}

/// Borrowed slideshow state an effect needs to spawn and schedule
pub struct EffectContext<'a, S: Stage> {
    pub stage: &'a mut S,
    pub clock: &'a mut Timeline<Timer>,
    pub particles: &'a mut Particles,
    pub rng: &'a mut StdRng,
    pub current_slide: usize,
}
