use crate::engine::{Container, Stage};
use rand::Rng;
use std::collections::BTreeMap;
use std::f64::consts::TAU;

pub const HEART_GLYPHS: [&str; 7] = ["❤️", "💕", "💖", "💗", "💝", "💞", "💓"];
pub const FLAME_GLYPHS: [&str; 2] = ["🔥", "💨"];
pub const REACTION_GLYPH: &str = "😵";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

/// How the particle's CSS keyframes move it
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    /// `flyOut` : straight line away from the center
    Burst { dx: f64, dy: f64, spin_deg: f64 },
    /// `riseAndBurn` : float up from the bottom edge
    Rise {
        wiggle_px: f64,
        tilt_deg: f64,
        start_x_pct: f64,
        size_rem: f64,
    },
    /// `shockwave` : stays in place
    Shockwave,
}

/// Durations are in seconds, the unit CSS animations use
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub glyph: &'static str,
    pub motion: Motion,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl Particle {
    pub fn heart<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let angle = rng.gen_range(0.0..TAU);
        let distance = rng.gen_range(120.0..200.0);
        Particle {
            glyph: HEART_GLYPHS[rng.gen_range(0..HEART_GLYPHS.len())],
            motion: Motion::Burst {
                dx: angle.cos() * distance,
                dy: angle.sin() * distance,
                spin_deg: rng.gen_range(0.0..360.0),
            },
            duration_s: rng.gen_range(1.0..1.6),
            delay_s: rng.gen_range(0.0..0.1),
        }
    }

    pub fn flame<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Particle {
            glyph: FLAME_GLYPHS[rng.gen_range(0..FLAME_GLYPHS.len())],
            motion: Motion::Rise {
                wiggle_px: rng.gen_range(-15.0..15.0),
                tilt_deg: rng.gen_range(-30.0..30.0),
                start_x_pct: rng.gen_range(0.0..100.0),
                size_rem: rng.gen_range(1.0..2.5),
            },
            duration_s: rng.gen_range(1.5..3.0),
            delay_s: rng.gen_range(0.0..0.3),
        }
    }

    pub fn reaction(duration_s: f64) -> Self {
        Particle {
            glyph: REACTION_GLYPH,
            motion: Motion::Shockwave,
            duration_s,
            delay_s: 0.0,
        }
    }

    /// Time until the animation has fully played out
    pub fn lifetime_ms(&self) -> f64 {
        (self.duration_s + self.delay_s) * 1000.0
    }

    pub fn class_name(&self) -> Option<&'static str> {
        match self.motion {
            Motion::Burst { .. } => Some("heart-particle"),
            Motion::Rise { .. } => Some("fire-particle"),
            Motion::Shockwave => None,
        }
    }

    pub fn css_animation(&self) -> String {
        match self.motion {
            Motion::Burst { .. } => format!(
                "flyOut {}s ease-out {}s forwards",
                self.duration_s, self.delay_s
            ),
            Motion::Rise { .. } => format!(
                "riseAndBurn {}s ease-in-out {}s forwards",
                self.duration_s, self.delay_s
            ),
            Motion::Shockwave => format!("shockwave {}s ease-out", self.duration_s),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveParticle {
    id: ParticleId,
    expires_at: f64,
}

/// Live particles of one container, each with its own expiry
#[derive(Debug, Default)]
pub struct ParticleArena {
    live: Vec<LiveParticle>,
}

impl ParticleArena {
    pub fn insert(&mut self, id: ParticleId, expires_at: f64) {
        self.live.push(LiveParticle { id, expires_at });
    }

    /// Removes and returns everything expired at `now`
    pub fn sweep(&mut self, now: f64) -> Vec<ParticleId> {
        let (expired, live): (Vec<_>, Vec<_>) = self
            .live
            .drain(..)
            .partition(|particle| particle.expires_at <= now);
        self.live = live;
        expired.into_iter().map(|particle| particle.id).collect()
    }

    pub fn clear(&mut self) -> usize {
        let count = self.live.len();
        self.live.clear();
        count
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[cfg(test)]
    pub fn latest_expiry(&self) -> Option<f64> {
        self.live
            .iter()
            .map(|particle| particle.expires_at)
            .max_by(f64::total_cmp)
    }
}

/// Owner of every particle on the page, keyed by container
/// - the stage only ever sees append / remove / clear, it never decides
/// when a particle goes away
#[derive(Debug, Default)]
pub struct Particles {
    next_id: u64,
    arenas: BTreeMap<Container, ParticleArena>,
}

impl Particles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `particle` and schedules its removal `linger_ms` after its
    /// animation ends
    pub fn spawn<S: Stage>(
        &mut self,
        stage: &mut S,
        container: Container,
        particle: &Particle,
        now: f64,
        linger_ms: f64,
    ) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        stage.append_particle(container, id, particle);
        self.arenas
            .entry(container)
            .or_default()
            .insert(id, now + particle.lifetime_ms() + linger_ms.max(0.0));
        id
    }

    pub fn sweep<S: Stage>(&mut self, stage: &mut S, now: f64) -> usize {
        let mut removed = 0;
        for (container, arena) in self.arenas.iter_mut() {
            for id in arena.sweep(now) {
                stage.remove_particle(*container, id);
                removed += 1;
            }
        }
        removed
    }

    /// Drops every particle of `container` at once, without waiting for expiry
    pub fn clear<S: Stage>(&mut self, stage: &mut S, container: Container) -> usize {
        let cleared = self
            .arenas
            .get_mut(&container)
            .map(ParticleArena::clear)
            .unwrap_or(0);
        stage.clear_container(container);
        cleared
    }

    #[cfg(test)]
    pub fn live(&self, container: Container) -> usize {
        self.arenas.get(&container).map_or(0, ParticleArena::len)
    }

    #[cfg(test)]
    pub fn latest_expiry(&self, container: Container) -> Option<f64> {
        self.arenas.get(&container)?.latest_expiry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStage;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn hearts_stay_inside_their_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let heart = Particle::heart(&mut rng);
            let Motion::Burst { dx, dy, spin_deg } = heart.motion else {
                panic!("heart should burst");
            };
            let distance = (dx * dx + dy * dy).sqrt();
            assert!((120.0 - 1e-9..200.0 + 1e-9).contains(&distance));
            assert!((0.0..360.0).contains(&spin_deg));
            assert!((1.0..1.6).contains(&heart.duration_s));
            assert!((0.0..0.1).contains(&heart.delay_s));
            assert!(HEART_GLYPHS.contains(&heart.glyph));
        }
    }

    #[test]
    fn flames_stay_inside_their_documented_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let flame = Particle::flame(&mut rng);
            let Motion::Rise {
                wiggle_px,
                tilt_deg,
                start_x_pct,
                size_rem,
            } = flame.motion
            else {
                panic!("flame should rise");
            };
            assert!((-15.0..15.0).contains(&wiggle_px));
            assert!((-30.0..30.0).contains(&tilt_deg));
            assert!((0.0..100.0).contains(&start_x_pct));
            assert!((1.0..2.5).contains(&size_rem));
            assert!((1.5..3.0).contains(&flame.duration_s));
            assert!((0.0..0.3).contains(&flame.delay_s));
        }
    }

    #[test]
    fn css_animation_matches_keyframe_names() {
        let reaction = Particle::reaction(1.5);
        assert_eq!(reaction.css_animation(), "shockwave 1.5s ease-out");
        assert_eq!(reaction.class_name(), None);
        assert_eq!(reaction.lifetime_ms(), 1500.0);

        let mut rng = StdRng::seed_from_u64(3);
        assert!(Particle::heart(&mut rng).css_animation().starts_with("flyOut "));
        assert!(Particle::flame(&mut rng).css_animation().starts_with("riseAndBurn "));
    }

    #[test]
    fn no_particle_outlives_duration_delay_and_linger() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut stage = MemoryStage::new(1);
        let mut particles = Particles::new();

        let mut deadline: f64 = 0.0;
        for step in 0..20 {
            let now = step as f64 * 50.0;
            let heart = Particle::heart(&mut rng);
            deadline = deadline.max(now + heart.lifetime_ms() + 100.0);
            particles.spawn(&mut stage, Container::Hearts, &heart, now, 100.0);
        }
        assert_eq!(particles.live(Container::Hearts), 20);
        assert_eq!(stage.particle_count(Container::Hearts), 20);

        particles.sweep(&mut stage, deadline - 1.0);
        assert!(particles.live(Container::Hearts) > 0);
        particles.sweep(&mut stage, deadline);
        assert_eq!(particles.live(Container::Hearts), 0);
        assert_eq!(stage.particle_count(Container::Hearts), 0);
    }

    #[test]
    fn clear_empties_one_container_only() {
        let mut stage = MemoryStage::new(1);
        let mut particles = Particles::new();
        let reaction = Particle::reaction(1.5);
        particles.spawn(&mut stage, Container::Hearts, &reaction, 0.0, 0.0);
        particles.spawn(&mut stage, Container::Flames, &reaction, 0.0, 0.0);

        assert_eq!(particles.clear(&mut stage, Container::Hearts), 1);
        assert_eq!(particles.live(Container::Hearts), 0);
        assert_eq!(stage.particle_count(Container::Hearts), 0);
        assert_eq!(particles.live(Container::Flames), 1);
    }
}
