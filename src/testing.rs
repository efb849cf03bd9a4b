//! In-memory `Stage` that records every write, for driving the slideshow
//! without a browser.

use crate::effects::particle::{Particle, ParticleId};
use crate::engine::{Container, PlayRequest, Prop, Stage, Target, TextSlot};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Default)]
pub struct MemoryStage {
    active: Vec<bool>,
    visible: Vec<bool>,
    styles: HashMap<(Target, Prop), f64>,
    style_writes: usize,
    texts: HashMap<TextSlot, String>,
    text_writes: usize,
    nav: (bool, bool),
    missing: HashSet<Container>,
    particles: BTreeMap<Container, BTreeSet<ParticleId>>,
    appended: HashMap<Container, usize>,
    removed: HashMap<Container, usize>,
    expanded: HashSet<usize>,
    play_requests: Vec<PlayRequest>,
    pauses: usize,
}

impl MemoryStage {
    pub fn new(slides: usize) -> Self {
        MemoryStage {
            active: vec![false; slides],
            visible: vec![false; slides],
            ..Default::default()
        }
    }

    pub fn remove_container(&mut self, container: Container) {
        self.missing.insert(container);
    }

    pub fn active_slides(&self) -> Vec<usize> {
        flagged(&self.active)
    }

    pub fn visible_slides(&self) -> Vec<usize> {
        flagged(&self.visible)
    }

    pub fn style(&self, target: Target, prop: Prop) -> Option<f64> {
        self.styles.get(&(target, prop)).copied()
    }

    pub fn style_writes(&self) -> usize {
        self.style_writes
    }

    pub fn text(&self, slot: TextSlot) -> Option<&str> {
        self.texts.get(&slot).map(String::as_str)
    }

    pub fn text_writes(&self) -> usize {
        self.text_writes
    }

    /// (previous disabled, next disabled)
    pub fn nav(&self) -> (bool, bool) {
        self.nav
    }

    pub fn particle_count(&self, container: Container) -> usize {
        self.particles.get(&container).map_or(0, BTreeSet::len)
    }

    pub fn appended(&self, container: Container) -> usize {
        self.appended.get(&container).copied().unwrap_or(0)
    }

    pub fn removed(&self, container: Container) -> usize {
        self.removed.get(&container).copied().unwrap_or(0)
    }

    pub fn is_expanded(&self, details: usize) -> bool {
        self.expanded.contains(&details)
    }

    pub fn play_requests(&self) -> &[PlayRequest] {
        &self.play_requests
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}

fn flagged(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| **flag)
        .map(|(index, _)| index)
        .collect()
}

impl Stage for MemoryStage {
    fn set_slide_active(&mut self, slide: usize, active: bool) {
        if let Some(flag) = self.active.get_mut(slide) {
            *flag = active;
        }
    }

    fn set_slide_visible(&mut self, slide: usize, visible: bool) {
        if let Some(flag) = self.visible.get_mut(slide) {
            *flag = visible;
        }
    }

    fn set_style(&mut self, target: Target, prop: Prop, value: f64) {
        self.style_writes += 1;
        self.styles.insert((target, prop), value);
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        self.text_writes += 1;
        self.texts.insert(slot, text.to_owned());
    }

    fn set_nav_disabled(&mut self, previous: bool, next: bool) {
        self.nav = (previous, next);
    }

    fn has_container(&self, container: Container) -> bool {
        !self.missing.contains(&container)
    }

    fn append_particle(&mut self, container: Container, id: ParticleId, _particle: &Particle) {
        if !self.has_container(container) {
            return;
        }
        *self.appended.entry(container).or_default() += 1;
        self.particles.entry(container).or_default().insert(id);
    }

    fn remove_particle(&mut self, container: Container, id: ParticleId) {
        let removed = self
            .particles
            .get_mut(&container)
            .map_or(false, |live| live.remove(&id));
        if removed {
            *self.removed.entry(container).or_default() += 1;
        }
    }

    fn clear_container(&mut self, container: Container) {
        if let Some(live) = self.particles.get_mut(&container) {
            live.clear();
        }
    }

    fn toggle_expanded(&mut self, details: usize) -> Option<bool> {
        if self.expanded.remove(&details) {
            Some(false)
        } else {
            self.expanded.insert(details);
            Some(true)
        }
    }

    fn play_music(&mut self, request: PlayRequest) {
        self.play_requests.push(request);
    }

    fn pause_music(&mut self) {
        self.pauses += 1;
    }
}
