use super::particle::Particle;
use super::{EffectContext, Timer};
use crate::config::LoopConfig;
use crate::engine::{Container, Stage, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Hearts,
    Flames,
}

impl LoopKind {
    pub fn container(self) -> Container {
        match self {
            LoopKind::Hearts => Container::Hearts,
            LoopKind::Flames => Container::Flames,
        }
    }

    fn particle<R: rand::Rng + ?Sized>(self, rng: &mut R) -> Particle {
        match self {
            LoopKind::Hearts => Particle::heart(rng),
            LoopKind::Flames => Particle::flame(rng),
        }
    }
}

/// Recurring particle spawner bound to one slide
/// - `handle` is Some exactly while the loop is spawning
/// - `staggered` holds the pending one-shot spawns of the current batch
pub struct EffectLoop {
    kind: LoopKind,
    config: LoopConfig,
    linger_ms: f64,
    slide: Option<usize>,
    handle: Option<TimerId>,
    staggered: Vec<TimerId>,
}

impl EffectLoop {
    pub fn new(kind: LoopKind, config: LoopConfig, linger_ms: f64) -> Self {
        EffectLoop {
            kind,
            config,
            linger_ms,
            slide: None,
            handle: None,
            staggered: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start_delay_ms(&self) -> f64 {
        self.config.start_delay_ms
    }

    /// Starts spawning for `slide`
    /// - no-op unless `slide` is the current slide and the container exists
    /// - a running loop is replaced, never doubled
    pub fn start<S: Stage>(&mut self, slide: usize, cx: &mut EffectContext<'_, S>) -> bool {
        if cx.current_slide != slide || !cx.stage.has_container(self.kind.container()) {
            return false;
        }
        self.cancel_timers(cx);
        self.slide = Some(slide);
        self.handle = Some(cx.clock.every(self.config.interval_ms, Timer::LoopTick(self.kind)));
        self.spawn_batch(self.config.initial_batch, cx);
        log!("{:?} loop started on slide {}", self.kind, slide);
        true
    }

    /// Recurring tick
    /// - the bound slide is re-checked here, a missed teardown still stops the loop
    pub fn tick<S: Stage>(&mut self, cx: &mut EffectContext<'_, S>) {
        if self.handle.is_none() {
            return;
        }
        if self.slide != Some(cx.current_slide) {
            self.stop(cx);
            return;
        }
        self.spawn_batch(self.config.batch, cx);
    }

    /// One staggered particle of the current batch
    pub fn spawn_staggered<S: Stage>(&mut self, id: TimerId, cx: &mut EffectContext<'_, S>) {
        let Some(position) = self.staggered.iter().position(|pending| *pending == id) else {
            return;
        };
        self.staggered.swap_remove(position);
        if self.handle.is_some() && self.slide == Some(cx.current_slide) {
            self.spawn_one(cx);
        }
    }

    /// Cancels every timer, then empties the container right away
    pub fn stop<S: Stage>(&mut self, cx: &mut EffectContext<'_, S>) {
        let was_running = self.handle.is_some();
        self.cancel_timers(cx);
        let cleared = cx.particles.clear(&mut *cx.stage, self.kind.container());
        if was_running {
            log!("{:?} loop stopped, cleared {} particles", self.kind, cleared);
        }
    }

    fn cancel_timers<S: Stage>(&mut self, cx: &mut EffectContext<'_, S>) {
        if let Some(handle) = self.handle.take() {
            cx.clock.cancel(handle);
        }
        for id in self.staggered.drain(..) {
            cx.clock.cancel(id);
        }
    }

    /// Hearts land all at once, flames trickle in `stride_ms` apart
    fn spawn_batch<S: Stage>(&mut self, count: usize, cx: &mut EffectContext<'_, S>) {
        if count == 0 {
            return;
        }
        if self.config.stride_ms <= 0.0 {
            (0..count).for_each(|_| self.spawn_one(cx));
            return;
        }
        self.spawn_one(cx);
        for step in 1..count {
            let id = cx
                .clock
                .after(step as f64 * self.config.stride_ms, Timer::SpawnFlame);
            self.staggered.push(id);
        }
    }

    fn spawn_one<S: Stage>(&mut self, cx: &mut EffectContext<'_, S>) {
        let particle = self.kind.particle(&mut *cx.rng);
        let now = cx.clock.now();
        cx.particles.spawn(
            &mut *cx.stage,
            self.kind.container(),
            &particle,
            now,
            self.linger_ms,
        );
    }
}
