use crate::effects::battle::Contender;
use crate::effects::particle::{Particle, ParticleId};

/// Anything a tween can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Slide(usize),
    Title(usize),
    Banner,
    Details(usize),
}

/// Animated style properties
/// - TranslateX is in percent (slides travel a full viewport width)
/// - TranslateY is in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    TranslateX,
    TranslateY,
    Opacity,
}

/// Elements that own particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Container {
    Hearts,
    Flames,
    Effects(Contender),
}

impl Container {
    pub fn element_id(self) -> &'static str {
        match self {
            Container::Hearts => "heart-burst-container",
            Container::Flames => "flame-container",
            Container::Effects(Contender::Kelly) => "kelly-effects",
            Container::Effects(Contender::Tammy) => "tammy-effects",
        }
    }
}

/// Elements whose text content the slideshow rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextSlot {
    Power(Contender),
    BattleStatus,
    MusicIcon,
}

impl TextSlot {
    pub fn element_id(self) -> &'static str {
        match self {
            TextSlot::Power(Contender::Kelly) => "kelly-power",
            TextSlot::Power(Contender::Tammy) => "tammy-power",
            TextSlot::BattleStatus => "battle-status",
            TextSlot::MusicIcon => "musicToggle",
        }
    }
}

/// Why playback was requested, echoed back with the play result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRequest {
    Toggle,
    Unlock,
}

/// Everything the slideshow writes to the page goes through here
/// - every method is infallible from the caller's side : a missing element
/// is a silent no-op, browser errors are logged by the implementation
/// - play_music is asynchronous, its outcome comes back as a
/// `Command::MusicStarted` / `Command::MusicFailed`
pub trait Stage {
    fn set_slide_active(&mut self, slide: usize, active: bool);
    fn set_slide_visible(&mut self, slide: usize, visible: bool);
    fn set_style(&mut self, target: Target, prop: Prop, value: f64);
    fn set_text(&mut self, slot: TextSlot, text: &str);
    fn set_nav_disabled(&mut self, previous: bool, next: bool);

    fn has_container(&self, container: Container) -> bool;
    fn append_particle(&mut self, container: Container, id: ParticleId, particle: &Particle);
    fn remove_particle(&mut self, container: Container, id: ParticleId);
    fn clear_container(&mut self, container: Container);

    /// Returns the new expanded state, None when the element is gone
    fn toggle_expanded(&mut self, details: usize) -> Option<bool>;

    fn play_music(&mut self, request: PlayRequest);
    fn pause_music(&mut self);
}
