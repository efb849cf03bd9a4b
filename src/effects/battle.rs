use crate::config::BattleConfig;
use crate::engine::{Ease, Prop, Stage, Target, TextSlot};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Contender {
    Kelly,
    Tammy,
}

impl Contender {
    pub const ALL: [Contender; 2] = [Contender::Kelly, Contender::Tammy];

    pub fn name(self) -> &'static str {
        match self {
            Contender::Kelly => "Kelly",
            Contender::Tammy => "Tammy",
        }
    }
}

/// ELI5:
/// ┌──────────────── Battle status over elapsed seconds ─────────────┐
/// │  0 ──── 2 ────── 4.5 ────── 6 ────── duration ──► done          │
/// │  Clash   Intense   Gaining    Dominates           Victory       │
/// └─────────────────────────────────────────────────────────────────┘
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    Ready,
    Clash,
    Intense,
    Gaining(Contender),
    Dominates(Contender),
    Victory(Contender),
}

impl BattleStatus {
    pub fn at(elapsed_s: f64, leader: Contender) -> Self {
        if elapsed_s < 2.0 {
            BattleStatus::Clash
        } else if elapsed_s < 4.5 {
            BattleStatus::Intense
        } else if elapsed_s < 6.0 {
            BattleStatus::Gaining(leader)
        } else {
            BattleStatus::Dominates(leader)
        }
    }
}

impl fmt::Display for BattleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleStatus::Ready => write!(f, "Battle Start!"),
            BattleStatus::Clash => write!(f, "⚔️ Clash!"),
            BattleStatus::Intense => write!(f, "💥 Intense!"),
            BattleStatus::Gaining(leader) => write!(f, "🔥 {} Gaining!", leader.name()),
            BattleStatus::Dominates(leader) => write!(f, "💪 {} Dominates!", leader.name()),
            BattleStatus::Victory(_) => write!(f, "🏆 Victory!"),
        }
    }
}

pub fn power_label(power: i64) -> String {
    format!("⚡ Power: {}%", power)
}

/// What the meter shows at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleFrame {
    pub kelly: i64,
    pub tammy: i64,
    pub status: BattleStatus,
}

impl BattleFrame {
    pub fn power(&self, contender: Contender) -> i64 {
        match contender {
            Contender::Kelly => self.kelly,
            Contender::Tammy => self.tammy,
        }
    }
}

/// Handed back once the interpolation reaches its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finale {
    pub winner: Contender,
    pub loser: Contender,
}

pub struct Battle {
    config: BattleConfig,
    started_at: Option<f64>,
}

impl Battle {
    const EASE: Ease = Ease::Power2InOut;

    pub fn new(config: BattleConfig) -> Self {
        Battle {
            config,
            started_at: None,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    fn target(&self, contender: Contender) -> f64 {
        match contender {
            Contender::Kelly => self.config.kelly_target,
            Contender::Tammy => self.config.tammy_target,
        }
    }

    /// The contender with the higher target, Tammy on a tie
    pub fn leader(&self) -> Contender {
        if self.config.kelly_target > self.config.tammy_target {
            Contender::Kelly
        } else {
            Contender::Tammy
        }
    }

    pub fn trailer(&self) -> Contender {
        match self.leader() {
            Contender::Kelly => Contender::Tammy,
            Contender::Tammy => Contender::Kelly,
        }
    }

    /// Pure view of the meter `elapsed_s` seconds in
    pub fn frame_at(&self, elapsed_s: f64) -> BattleFrame {
        let elapsed = elapsed_s.clamp(0.0, self.config.duration_s);
        let eased = Self::EASE.apply(elapsed / self.config.duration_s);
        BattleFrame {
            kelly: (self.target(Contender::Kelly) * eased).round() as i64,
            tammy: (self.target(Contender::Tammy) * eased).round() as i64,
            status: BattleStatus::at(elapsed, self.leader()),
        }
    }

    /// Resets the display and (re)starts the interpolation at `now` (ms)
    /// - the caller clears both contender effect containers
    pub fn run<S: Stage>(&mut self, stage: &mut S, now: f64) {
        if self.started_at.is_some() {
            log!("battle restarted before it finished");
        }
        stage.set_text(TextSlot::BattleStatus, &BattleStatus::Ready.to_string());
        stage.set_style(Target::Banner, Prop::Opacity, 0.0);
        self.started_at = Some(now);
        log!("battle started");
    }

    /// Cancels an in-flight run, nothing is written afterwards
    pub fn kill(&mut self) -> bool {
        let killed = self.started_at.take().is_some();
        if killed {
            log!("battle killed before victory");
        }
        killed
    }

    /// Writes the frame for `now`
    /// - returns the finale exactly once, on the sample that reaches the end
    pub fn sample<S: Stage>(&mut self, stage: &mut S, now: f64) -> Option<Finale> {
        let started_at = self.started_at?;
        let elapsed_s = (now - started_at) / 1000.0;
        let frame = self.frame_at(elapsed_s);
        for contender in Contender::ALL {
            stage.set_text(TextSlot::Power(contender), &power_label(frame.power(contender)));
        }

        if elapsed_s < self.config.duration_s {
            stage.set_text(TextSlot::BattleStatus, &frame.status.to_string());
            return None;
        }

        self.started_at = None;
        let finale = Finale {
            winner: self.leader(),
            loser: self.trailer(),
        };
        stage.set_text(
            TextSlot::BattleStatus,
            &BattleStatus::Victory(finale.winner).to_string(),
        );
        log!("battle over, {} wins", finale.winner.name());
        Some(finale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStage;

    fn battle() -> Battle {
        Battle::new(BattleConfig::default())
    }

    #[test]
    fn powers_start_at_zero_and_end_on_target() {
        let battle = battle();
        let start = battle.frame_at(0.0);
        assert_eq!((start.kelly, start.tammy), (0, 0));
        assert_eq!(start.status, BattleStatus::Clash);

        let end = battle.frame_at(7.0);
        assert_eq!((end.kelly, end.tammy), (60, 90));
        assert_eq!(battle.frame_at(50.0), end);
    }

    #[test]
    fn powers_rise_monotonically() {
        let battle = battle();
        let mut last = battle.frame_at(0.0);
        for step in 1..=70 {
            let frame = battle.frame_at(step as f64 * 0.1);
            assert!(frame.kelly >= last.kelly && frame.tammy >= last.tammy);
            last = frame;
        }
    }

    #[test]
    fn status_follows_the_elapsed_thresholds() {
        let battle = battle();
        assert_eq!(battle.frame_at(1.99).status, BattleStatus::Clash);
        assert_eq!(battle.frame_at(2.0).status, BattleStatus::Intense);
        assert_eq!(battle.frame_at(4.49).status, BattleStatus::Intense);
        assert_eq!(battle.frame_at(4.5).status, BattleStatus::Gaining(Contender::Tammy));
        assert_eq!(battle.frame_at(6.0).status, BattleStatus::Dominates(Contender::Tammy));
        assert_eq!(
            BattleStatus::Gaining(Contender::Tammy).to_string(),
            "🔥 Tammy Gaining!"
        );
    }

    #[test]
    fn sample_reaches_victory_once() {
        let mut stage = MemoryStage::new(1);
        let mut battle = battle();
        battle.run(&mut stage, 1000.0);
        assert_eq!(stage.text(TextSlot::BattleStatus), Some("Battle Start!"));

        assert_eq!(battle.sample(&mut stage, 1000.0), None);
        assert_eq!(stage.text(TextSlot::Power(Contender::Kelly)), Some("⚡ Power: 0%"));
        assert_eq!(stage.text(TextSlot::BattleStatus), Some("⚔️ Clash!"));

        let finale = battle.sample(&mut stage, 8000.0);
        assert_eq!(
            finale,
            Some(Finale {
                winner: Contender::Tammy,
                loser: Contender::Kelly
            })
        );
        assert_eq!(stage.text(TextSlot::Power(Contender::Kelly)), Some("⚡ Power: 60%"));
        assert_eq!(stage.text(TextSlot::Power(Contender::Tammy)), Some("⚡ Power: 90%"));
        assert_eq!(stage.text(TextSlot::BattleStatus), Some("🏆 Victory!"));
        assert!(!battle.is_running());
        assert_eq!(battle.sample(&mut stage, 9000.0), None);
    }

    #[test]
    fn killed_battle_writes_nothing_more() {
        let mut stage = MemoryStage::new(1);
        let mut battle = battle();
        battle.run(&mut stage, 0.0);
        battle.sample(&mut stage, 3000.0);
        let writes = stage.text_writes();

        assert!(battle.kill());
        assert_eq!(battle.sample(&mut stage, 8000.0), None);
        assert_eq!(stage.text_writes(), writes);
        assert!(!battle.kill());
    }
}
