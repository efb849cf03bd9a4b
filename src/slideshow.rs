use crate::audio::Music;
use crate::config::PresentationConfig;
use crate::deck::{Deck, Direction, SlideEffect};
use crate::effects::battle::{Battle, Contender, Finale};
use crate::effects::effect_loop::{EffectLoop, LoopKind};
use crate::effects::particle::{Particle, Particles};
use crate::effects::{EffectContext, Timer};
use crate::engine::tween::Sample;
use crate::engine::{
    Container, Ease, PlayRequest, Prop, Stage, Target, TimerId, Timeline, Tween, TweenSet,
};
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Requests coming from outside the frame loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    GoTo(usize),
    ToggleMusic,
    UnlockMusic,
    MusicStarted,
    MusicFailed { request: PlayRequest, reason: String },
    ToggleExpanded(usize),
}

/// Event handlers post here, the frame loop drains it
/// - keeps every cursor / loop-handle mutation on the loop's turn
#[derive(Debug, Clone, Default)]
pub struct CommandQueue(Rc<RefCell<VecDeque<Command>>>);

impl CommandQueue {
    pub fn post(&self, command: Command) {
        self.0.borrow_mut().push_back(command);
    }

    pub fn drain(&self) -> Vec<Command> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// Tween completion messages
/// - `generation` is the slide's generation when the tween began, an older
/// one means the slide moved again and the message is stale
#[derive(Debug, Clone, Copy, PartialEq)]
enum Completion {
    SlideExited {
        slide: usize,
        generation: u64,
        resting_x: f64,
    },
}

/// Last style values written for a slide, exit tweens start from here
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    x: f64,
    opacity: f64,
}

const OFF_SCREEN: f64 = 100.0;
const TITLE_RISE_PX: f64 = 40.0;
const DETAILS_DROP_PX: f64 = -10.0;
const DETAILS_FADE_MS: f64 = 500.0;

/// TABLE
/// ┌──────────────────────── go_to(new) ─────────────────────────────────────┐
/// │  1. resolve      out of range / same slide  → ignored                   │
/// │  2. teardown     old slide : pending setup, loop, battle, particles     │
/// │  3. transition   old slide slides out + fades, new slide slides in      │
/// │  4. cursor       deck.current = new, prev / next controls refreshed     │
/// │  5. setup        title entrance + one delayed effect start              │
/// │  ...later        old slide's exit completes → hidden, resting offset    │
/// └─────────────────────────────────────────────────────────────────────────┘
pub struct Slideshow<S: Stage> {
    stage: S,
    config: PresentationConfig,
    deck: Deck,
    clock: Timeline<Timer>,
    tweens: TweenSet<Completion>,
    particles: Particles,
    hearts: EffectLoop,
    flames: EffectLoop,
    battle: Battle,
    music: Music,
    rng: StdRng,
    pending_setup: Option<TimerId>,
    generations: Vec<u64>,
    poses: Vec<Pose>,
}

impl<S: Stage> Slideshow<S> {
    pub fn new(stage: S, deck: Deck, config: PresentationConfig, rng: StdRng) -> Self {
        let slides = deck.len();
        Slideshow {
            stage,
            hearts: EffectLoop::new(LoopKind::Hearts, config.hearts, config.particle_linger_ms),
            flames: EffectLoop::new(LoopKind::Flames, config.flames, config.particle_linger_ms),
            battle: Battle::new(config.battle),
            config,
            deck,
            clock: Timeline::new(),
            tweens: TweenSet::new(),
            particles: Particles::new(),
            music: Music::default(),
            rng,
            pending_setup: None,
            generations: vec![0; slides],
            poses: vec![
                Pose {
                    x: OFF_SCREEN,
                    opacity: 1.0
                };
                slides
            ],
        }
    }

    /// Initial layout : first slide in place and active, the rest parked
    /// off-screen to the right
    pub fn start(&mut self) {
        for slide in 0..self.deck.len() {
            let first = slide == 0;
            self.stage.set_slide_active(slide, first);
            self.stage.set_slide_visible(slide, first);
            self.write_slide(slide, Prop::Opacity, 1.0);
            self.write_slide(slide, Prop::TranslateX, if first { 0.0 } else { OFF_SCREEN });
        }
        self.refresh_nav();
        self.setup(0);
        log!("presentation started with {} slides", self.deck.len());
    }

    pub fn next(&mut self) -> bool {
        if self.deck.is_last() {
            return false;
        }
        self.go_to(self.deck.current() + 1)
    }

    pub fn previous(&mut self) -> bool {
        if self.deck.is_first() {
            return false;
        }
        self.go_to(self.deck.current() - 1)
    }

    /// Moves to `index`, returns false when the request was ignored
    pub fn go_to(&mut self, index: usize) -> bool {
        let Some(direction) = self.deck.resolve(index) else {
            return false;
        };
        let old = self.deck.current();
        log!("slide {} -> {}", old, index);

        self.teardown(old);
        self.transition(old, index, direction);
        self.deck.set_current(index);
        self.refresh_nav();
        self.setup(index);
        true
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Next => {
                self.next();
            }
            Command::Previous => {
                self.previous();
            }
            Command::GoTo(index) => {
                self.go_to(index);
            }
            Command::ToggleMusic => self.music.toggle(&mut self.stage),
            Command::UnlockMusic => self.music.unlock(&mut self.stage),
            Command::MusicStarted => self.music.started(&mut self.stage),
            Command::MusicFailed { request, reason } => {
                self.music.failed(&mut self.stage, request, &reason)
            }
            Command::ToggleExpanded(details) => self.toggle_expanded(details),
        }
    }

    /// Fires every timer due by `now`, then drops expired particles
    pub fn update(&mut self, now: f64) {
        while let Some((id, timer)) = self.clock.pop_due(now) {
            self.on_timer(id, timer);
        }
        self.clock.settle(now);
        self.particles.sweep(&mut self.stage, now);
    }

    /// Samples the battle meter and every tween at the current clock
    pub fn render(&mut self) {
        let now = self.clock.now();
        if let Some(finale) = self.battle.sample(&mut self.stage, now) {
            self.celebrate(finale, now);
        }
        let frame = self.tweens.sample(now);
        for sample in frame.samples {
            self.apply(sample);
        }
        for completion in frame.completed {
            self.on_complete(completion);
        }
    }

    // ==================== Transition ====================

    fn transition(&mut self, old: usize, new: usize, direction: Direction) {
        let now = self.clock.now();
        let sign = direction.sign();
        let duration = self.config.transition_ms;

        self.tweens.kill_tweens_of(Target::Slide(old));
        self.generations[old] += 1;
        let from = self.poses[old];
        self.tweens.start(
            Tween::new(Target::Slide(old), now, duration, Ease::Power2InOut)
                .track(Prop::TranslateX, from.x, -sign * OFF_SCREEN)
                .track(Prop::Opacity, from.opacity, 0.0)
                .on_complete(Completion::SlideExited {
                    slide: old,
                    generation: self.generations[old],
                    resting_x: -sign * OFF_SCREEN,
                }),
        );

        // the new slide may still be on its way out, its exit must not land
        self.tweens.kill_tweens_of(Target::Slide(new));
        self.generations[new] += 1;
        self.stage.set_slide_visible(new, true);
        self.write_slide(new, Prop::Opacity, 1.0);
        self.write_slide(new, Prop::TranslateX, sign * OFF_SCREEN);
        self.stage.set_slide_active(new, true);
        self.tweens.start(
            Tween::new(Target::Slide(new), now, duration, Ease::Power2InOut)
                .track(Prop::TranslateX, sign * OFF_SCREEN, 0.0),
        );
    }

    fn on_complete(&mut self, completion: Completion) {
        match completion {
            Completion::SlideExited {
                slide,
                generation,
                resting_x,
            } => {
                if generation != self.generations[slide] || self.deck.is_active(slide) {
                    return;
                }
                self.stage.set_slide_active(slide, false);
                self.stage.set_slide_visible(slide, false);
                self.write_slide(slide, Prop::TranslateX, resting_x);
            }
        }
    }

    fn apply(&mut self, sample: Sample) {
        match sample.target {
            Target::Slide(slide) => self.write_slide(slide, sample.prop, sample.value),
            target => self.stage.set_style(target, sample.prop, sample.value),
        }
    }

    fn write_slide(&mut self, slide: usize, prop: Prop, value: f64) {
        if let Some(pose) = self.poses.get_mut(slide) {
            match prop {
                Prop::TranslateX => pose.x = value,
                Prop::Opacity => pose.opacity = value,
                Prop::TranslateY => {}
            }
        }
        self.stage.set_style(Target::Slide(slide), prop, value);
    }

    fn refresh_nav(&mut self) {
        self.stage
            .set_nav_disabled(self.deck.is_first(), self.deck.is_last());
    }

    // ==================== Per-slide hooks ====================

    fn setup(&mut self, slide: usize) {
        let now = self.clock.now();
        self.stage.set_style(Target::Title(slide), Prop::TranslateY, TITLE_RISE_PX);
        self.stage.set_style(Target::Title(slide), Prop::Opacity, 0.0);
        self.tweens.kill_tweens_of(Target::Title(slide));
        self.tweens.start(
            Tween::new(
                Target::Title(slide),
                now,
                self.config.title_entrance_ms,
                Ease::Power1Out,
            )
            .track(Prop::TranslateY, TITLE_RISE_PX, 0.0)
            .track(Prop::Opacity, 0.0, 1.0),
        );

        let effect = self.deck.effect(slide);
        let delay = match effect {
            SlideEffect::None => return,
            SlideEffect::HeartLoop => self.hearts.start_delay_ms(),
            SlideEffect::FlameLoop => self.flames.start_delay_ms(),
            SlideEffect::BattleSequence => self.config.battle.start_delay_ms,
        };
        self.pending_setup = Some(self.clock.after(delay, Timer::Setup { slide, effect }));
    }

    fn teardown(&mut self, slide: usize) {
        if let Some(id) = self.pending_setup.take() {
            self.clock.cancel(id);
        }
        match self.deck.effect(slide) {
            SlideEffect::None => {}
            SlideEffect::HeartLoop => self.stop_loop(LoopKind::Hearts),
            SlideEffect::FlameLoop => self.stop_loop(LoopKind::Flames),
            SlideEffect::BattleSequence => {
                self.battle.kill();
                self.tweens.kill_tweens_of(Target::Banner);
                for contender in Contender::ALL {
                    self.particles
                        .clear(&mut self.stage, Container::Effects(contender));
                }
            }
        }
    }

    fn on_timer(&mut self, id: TimerId, timer: Timer) {
        match timer {
            Timer::Setup { slide, effect } => {
                if self.pending_setup == Some(id) {
                    self.pending_setup = None;
                }
                if !self.deck.is_active(slide) {
                    return;
                }
                match effect {
                    SlideEffect::None => {}
                    SlideEffect::HeartLoop => self.start_loop(LoopKind::Hearts, slide),
                    SlideEffect::FlameLoop => self.start_loop(LoopKind::Flames, slide),
                    SlideEffect::BattleSequence => self.start_battle(),
                }
            }
            Timer::LoopTick(kind) => {
                let (effect_loop, mut cx) = self.split_loop(kind);
                effect_loop.tick(&mut cx);
            }
            Timer::SpawnFlame => {
                let (effect_loop, mut cx) = self.split_loop(LoopKind::Flames);
                effect_loop.spawn_staggered(id, &mut cx);
            }
        }
    }

    fn start_loop(&mut self, kind: LoopKind, slide: usize) {
        let (effect_loop, mut cx) = self.split_loop(kind);
        effect_loop.start(slide, &mut cx);
    }

    fn stop_loop(&mut self, kind: LoopKind) {
        let (effect_loop, mut cx) = self.split_loop(kind);
        effect_loop.stop(&mut cx);
    }

    fn split_loop(&mut self, kind: LoopKind) -> (&mut EffectLoop, EffectContext<'_, S>) {
        let effect_loop = match kind {
            LoopKind::Hearts => &mut self.hearts,
            LoopKind::Flames => &mut self.flames,
        };
        let cx = EffectContext {
            stage: &mut self.stage,
            clock: &mut self.clock,
            particles: &mut self.particles,
            rng: &mut self.rng,
            current_slide: self.deck.current(),
        };
        (effect_loop, cx)
    }

    // ==================== Battle ====================

    fn start_battle(&mut self) {
        for contender in Contender::ALL {
            self.particles
                .clear(&mut self.stage, Container::Effects(contender));
        }
        self.tweens.kill_tweens_of(Target::Banner);
        self.battle.run(&mut self.stage, self.clock.now());
    }

    fn celebrate(&mut self, finale: Finale, now: f64) {
        let battle = self.config.battle;
        self.tweens.start(
            Tween::new(Target::Banner, now, battle.banner_fade_s * 1000.0, Ease::Power1Out)
                .track(Prop::Opacity, 0.0, 1.0),
        );
        self.particles.spawn(
            &mut self.stage,
            Container::Effects(finale.loser),
            &Particle::reaction(battle.reaction_s),
            now,
            0.0,
        );
    }

    // ==================== Details ====================

    fn toggle_expanded(&mut self, details: usize) {
        if self.stage.toggle_expanded(details).is_none() {
            return;
        }
        let target = Target::Details(details);
        self.tweens.kill_tweens_of(target);
        self.stage.set_style(target, Prop::Opacity, 0.0);
        self.stage.set_style(target, Prop::TranslateY, DETAILS_DROP_PX);
        self.tweens.start(
            Tween::new(target, self.clock.now(), DETAILS_FADE_MS, Ease::Power1Out)
                .track(Prop::Opacity, 0.0, 1.0)
                .track(Prop::TranslateY, DETAILS_DROP_PX, 0.0),
        );
    }
}

#[cfg(test)]
impl<S: Stage> Slideshow<S> {
    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current(&self) -> usize {
        self.deck.current()
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn music(&self) -> &Music {
        &self.music
    }

    pub fn is_loop_running(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Hearts => self.hearts.is_running(),
            LoopKind::Flames => self.flames.is_running(),
        }
    }

    pub fn is_battle_running(&self) -> bool {
        self.battle.is_running()
    }

    pub fn live_particles(&self, container: Container) -> usize {
        self.particles.live(container)
    }

    pub fn recurring_timers(&self) -> usize {
        self.clock.recurring()
    }

    /// update + render, one animation frame
    pub fn advance(&mut self, now: f64) {
        self.update(now);
        self.render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TextSlot;
    use crate::testing::MemoryStage;
    use rand::SeedableRng;

    const HEART_SLIDE: usize = 2;
    const FLAME_SLIDE: usize = 3;
    const BATTLE_SLIDE: usize = 1;

    fn slideshow() -> Slideshow<MemoryStage> {
        let effects = vec![
            SlideEffect::None,
            SlideEffect::BattleSequence,
            SlideEffect::HeartLoop,
            SlideEffect::FlameLoop,
            SlideEffect::None,
        ];
        let stage = MemoryStage::new(effects.len());
        let deck = Deck::new(effects).unwrap();
        let mut slideshow = Slideshow::new(
            stage,
            deck,
            PresentationConfig::default(),
            StdRng::seed_from_u64(5),
        );
        slideshow.start();
        slideshow
    }

    /// Steps in 16ms frames like the browser would
    fn run_until(slideshow: &mut Slideshow<MemoryStage>, until: f64) {
        let mut now = slideshow.now();
        while now < until {
            now = (now + 16.0).min(until);
            slideshow.advance(now);
        }
    }

    fn active_slides(slideshow: &Slideshow<MemoryStage>) -> Vec<usize> {
        (0..slideshow.deck().len())
            .filter(|slide| slideshow.deck().is_active(*slide))
            .collect()
    }

    #[test]
    fn start_lays_out_first_slide_only() {
        let slideshow = slideshow();
        assert_eq!(slideshow.current(), 0);
        assert_eq!(slideshow.stage().active_slides(), vec![0]);
        assert_eq!(slideshow.stage().visible_slides(), vec![0]);
        assert_eq!(slideshow.stage().style(Target::Slide(1), Prop::TranslateX), Some(100.0));
        assert_eq!(slideshow.stage().nav(), (true, false));
    }

    #[test]
    fn out_of_range_navigation_is_ignored() {
        let mut slideshow = slideshow();
        for index in [5, 6, usize::MAX] {
            assert!(!slideshow.go_to(index));
            assert_eq!(slideshow.current(), 0);
            assert_eq!(active_slides(&slideshow), vec![0]);
        }
    }

    #[test]
    fn navigating_to_the_current_slide_is_a_no_op() {
        let mut slideshow = slideshow();
        slideshow.go_to(4);
        let writes = slideshow.stage().style_writes();
        assert!(!slideshow.go_to(4));
        assert_eq!(slideshow.stage().style_writes(), writes);
        assert_eq!(slideshow.current(), 4);
    }

    #[test]
    fn exactly_one_slide_is_active_after_any_go_to() {
        let mut slideshow = slideshow();
        for target in [3, 1, 4, 0, 2] {
            assert!(slideshow.go_to(target));
            assert_eq!(active_slides(&slideshow), vec![target]);
            let until = slideshow.now() + 1000.0;
            run_until(&mut slideshow, until);
            assert_eq!(slideshow.stage().active_slides(), vec![target]);
            assert_eq!(slideshow.stage().visible_slides(), vec![target]);
        }
    }

    #[test]
    fn walks_from_first_to_last_and_stops() {
        let mut slideshow = slideshow();
        assert!(!slideshow.previous());
        assert_eq!(slideshow.current(), 0);

        for _ in 0..4 {
            assert!(slideshow.next());
        }
        assert_eq!(slideshow.current(), 4);
        assert_eq!(slideshow.stage().nav(), (false, true));
        assert!(!slideshow.next());
        assert_eq!(slideshow.current(), 4);
    }

    #[test]
    fn old_slide_exits_opposite_to_travel() {
        let mut slideshow = slideshow();
        slideshow.go_to(4);
        run_until(&mut slideshow, 1000.0);
        let stage = slideshow.stage();
        assert_eq!(stage.style(Target::Slide(0), Prop::TranslateX), Some(-100.0));
        assert_eq!(stage.style(Target::Slide(0), Prop::Opacity), Some(0.0));
        assert_eq!(stage.style(Target::Slide(4), Prop::TranslateX), Some(0.0));

        slideshow.previous();
        run_until(&mut slideshow, 2000.0);
        let stage = slideshow.stage();
        assert_eq!(stage.style(Target::Slide(4), Prop::TranslateX), Some(100.0));
        assert_eq!(stage.style(Target::Slide(3), Prop::TranslateX), Some(0.0));
    }

    #[test]
    fn stale_exit_completion_does_not_hide_a_returning_slide() {
        let mut slideshow = slideshow();
        slideshow.go_to(4);
        run_until(&mut slideshow, 300.0);
        slideshow.go_to(0);
        run_until(&mut slideshow, 3000.0);

        assert_eq!(slideshow.stage().active_slides(), vec![0]);
        assert_eq!(slideshow.stage().visible_slides(), vec![0]);
        assert_eq!(slideshow.stage().style(Target::Slide(0), Prop::TranslateX), Some(0.0));
        assert_eq!(slideshow.stage().style(Target::Slide(0), Prop::Opacity), Some(1.0));
    }

    #[test]
    fn heart_slide_left_before_first_tick_leaves_nothing_behind() {
        let mut slideshow = slideshow();
        slideshow.go_to(HEART_SLIDE);
        run_until(&mut slideshow, 320.0);
        assert!(slideshow.is_loop_running(LoopKind::Hearts));
        assert_eq!(slideshow.live_particles(Container::Hearts), 12);

        slideshow.next();
        assert!(!slideshow.is_loop_running(LoopKind::Hearts));
        assert_eq!(slideshow.live_particles(Container::Hearts), 0);
        assert_eq!(slideshow.stage().particle_count(Container::Hearts), 0);

        run_until(&mut slideshow, 2000.0);
        assert_eq!(slideshow.stage().particle_count(Container::Hearts), 0);
    }

    #[test]
    fn heart_slide_left_before_delayed_start_never_spawns() {
        let mut slideshow = slideshow();
        slideshow.go_to(HEART_SLIDE);
        run_until(&mut slideshow, 100.0);
        slideshow.previous();
        run_until(&mut slideshow, 2000.0);

        assert!(!slideshow.is_loop_running(LoopKind::Hearts));
        assert_eq!(slideshow.stage().appended(Container::Hearts), 0);
    }

    #[test]
    fn re_entering_quickly_still_runs_a_single_loop() {
        let mut slideshow = slideshow();
        slideshow.go_to(HEART_SLIDE);
        slideshow.go_to(FLAME_SLIDE);
        slideshow.go_to(HEART_SLIDE);
        run_until(&mut slideshow, 2000.0);

        assert!(slideshow.is_loop_running(LoopKind::Hearts));
        assert!(!slideshow.is_loop_running(LoopKind::Flames));
        assert_eq!(slideshow.recurring_timers(), 1);
    }

    #[test]
    fn loops_are_mutually_exclusive() {
        let mut slideshow = slideshow();
        slideshow.go_to(HEART_SLIDE);
        run_until(&mut slideshow, 1000.0);
        slideshow.go_to(FLAME_SLIDE);
        run_until(&mut slideshow, 2000.0);

        assert!(!slideshow.is_loop_running(LoopKind::Hearts));
        assert!(slideshow.is_loop_running(LoopKind::Flames));
        assert_eq!(slideshow.live_particles(Container::Hearts), 0);
        assert!(slideshow.live_particles(Container::Flames) > 0);
        assert_eq!(slideshow.recurring_timers(), 1);
    }

    #[test]
    fn particles_never_outlive_their_lifetime_while_looping() {
        let mut slideshow = slideshow();
        slideshow.go_to(HEART_SLIDE);
        run_until(&mut slideshow, 400.0);
        slideshow.advance(400.0);
        // hearts live at most 1.6s + 0.1s delay + 100ms linger
        let mut now = 400.0;
        while now < 10_000.0 {
            now += 16.0;
            slideshow.advance(now);
            let latest = slideshow
                .particles
                .latest_expiry(Container::Hearts)
                .unwrap_or(now);
            assert!(latest <= now + 1800.0);
        }
        let appended = slideshow.stage().appended(Container::Hearts);
        let removed = slideshow.stage().removed(Container::Hearts);
        assert_eq!(appended - removed, slideshow.stage().particle_count(Container::Hearts));
        assert!(removed > 0);
    }

    #[test]
    fn battle_runs_to_victory() {
        let mut slideshow = slideshow();
        slideshow.go_to(BATTLE_SLIDE);
        run_until(&mut slideshow, 500.0);
        assert!(slideshow.is_battle_running());
        let stage = slideshow.stage();
        assert_eq!(stage.text(TextSlot::Power(Contender::Kelly)), Some("⚡ Power: 0%"));
        assert_eq!(stage.text(TextSlot::Power(Contender::Tammy)), Some("⚡ Power: 0%"));

        run_until(&mut slideshow, 7500.0);
        let stage = slideshow.stage();
        assert_eq!(stage.text(TextSlot::Power(Contender::Kelly)), Some("⚡ Power: 60%"));
        assert_eq!(stage.text(TextSlot::Power(Contender::Tammy)), Some("⚡ Power: 90%"));
        assert_eq!(stage.text(TextSlot::BattleStatus), Some("🏆 Victory!"));
        assert_eq!(slideshow.live_particles(Container::Effects(Contender::Kelly)), 1);

        run_until(&mut slideshow, 8100.0);
        assert_eq!(slideshow.stage().style(Target::Banner, Prop::Opacity), Some(1.0));
        run_until(&mut slideshow, 9100.0);
        assert_eq!(slideshow.live_particles(Container::Effects(Contender::Kelly)), 0);
    }

    #[test]
    fn leaving_mid_battle_stops_all_writes() {
        let mut slideshow = slideshow();
        slideshow.go_to(BATTLE_SLIDE);
        run_until(&mut slideshow, 3000.0);
        assert!(slideshow.is_battle_running());

        slideshow.next();
        assert!(!slideshow.is_battle_running());
        let status = slideshow.stage().text(TextSlot::BattleStatus).map(str::to_owned);
        run_until(&mut slideshow, 10_000.0);
        assert_eq!(
            slideshow.stage().text(TextSlot::BattleStatus).map(str::to_owned),
            status
        );
        assert_eq!(slideshow.stage().appended(Container::Effects(Contender::Kelly)), 0);
    }

    #[test]
    fn commands_drive_navigation_and_music() {
        let mut slideshow = slideshow();
        let queue = CommandQueue::default();
        queue.post(Command::Next);
        queue.post(Command::GoTo(3));
        queue.post(Command::Previous);
        queue.post(Command::ToggleMusic);
        for command in queue.drain() {
            slideshow.dispatch(command);
        }
        assert_eq!(slideshow.current(), 2);
        assert_eq!(slideshow.stage().play_requests(), &[PlayRequest::Toggle]);

        slideshow.dispatch(Command::MusicStarted);
        assert!(slideshow.music().is_playing());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn expand_toggles_and_fades_details_in() {
        let mut slideshow = slideshow();
        slideshow.dispatch(Command::ToggleExpanded(0));
        assert!(slideshow.stage().is_expanded(0));
        assert_eq!(slideshow.stage().style(Target::Details(0), Prop::Opacity), Some(0.0));

        run_until(&mut slideshow, 600.0);
        assert_eq!(slideshow.stage().style(Target::Details(0), Prop::Opacity), Some(1.0));
        assert_eq!(slideshow.stage().style(Target::Details(0), Prop::TranslateY), Some(0.0));

        slideshow.dispatch(Command::ToggleExpanded(0));
        assert!(!slideshow.stage().is_expanded(0));
    }
}
