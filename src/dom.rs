use crate::browser;
use crate::deck::SlideEffect;
use crate::effects::particle::{Motion, Particle, ParticleId};
use crate::engine::{Container, PlayRequest, Prop, Stage, Target, TextSlot};
use crate::slideshow::{Command, CommandQueue};
use anyhow::{anyhow, ensure, Result};
use js_sys::Promise;
use std::cell::Cell;
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAudioElement, HtmlButtonElement, HtmlElement};

// ==================== Constants ====================
// Selectors and ids of the page this presentation runs in
mod html {
    pub const SLIDE: &str = ".slide";
    pub const SLIDE_TITLE: &str = ".slide-title";
    pub const DETAILS: &str = ".details";
    pub const EFFECT_ATTRIBUTE: &str = "data-effect";
    pub const EXPAND_KEY_ATTRIBUTE: &str = "data-expand-key";
    pub const ACTIVE_CLASS: &str = "active";
    pub const EXPANDED_CLASS: &str = "expanded";
    pub const PREV_BUTTON: &str = "prevBtn";
    pub const NEXT_BUTTON: &str = "nextBtn";
    pub const BANNER: &str = "winner-announce";
    pub const AUDIO: &str = "bgMusic";
}

thread_local! {
    static NEXT_EXPAND_KEY: Cell<usize> = const { Cell::new(0) };
}

/// Stable key for an expandable element, assigned on first use and stored
/// as a data attribute so the stage can find the element again
pub fn expand_key(element: &HtmlElement) -> Result<usize> {
    if let Some(key) = element
        .get_attribute(html::EXPAND_KEY_ATTRIBUTE)
        .and_then(|key| key.parse().ok())
    {
        return Ok(key);
    }
    let key = NEXT_EXPAND_KEY.with(|next| {
        let key = next.get();
        next.set(key + 1);
        key
    });
    element
        .set_attribute(html::EXPAND_KEY_ATTRIBUTE, &key.to_string())
        .map_err(|err| anyhow!("Could not tag expandable element : {:#?}", err))?;
    Ok(key)
}

/// Reads a slide's declared effect
/// - `data-effect` wins, otherwise the effect containers the slide holds
pub fn describe_slide(slide: &HtmlElement) -> SlideEffect {
    if let Some(marker) = slide.get_attribute(html::EFFECT_ATTRIBUTE) {
        match SlideEffect::from_marker(&marker) {
            Some(effect) => return effect,
            None => log!("Ignoring unknown data-effect '{}'", marker),
        }
    }
    let contains = |id: &str| {
        slide
            .query_selector(&format!("#{}", id))
            .ok()
            .flatten()
            .is_some()
    };
    if contains(TextSlot::Power(crate::effects::battle::Contender::Kelly).element_id()) {
        SlideEffect::BattleSequence
    } else if contains(Container::Hearts.element_id()) {
        SlideEffect::HeartLoop
    } else if contains(Container::Flames.element_id()) {
        SlideEffect::FlameLoop
    } else {
        SlideEffect::None
    }
}

/// `Stage` over the live document
/// - slides and titles are found once, everything else is looked up on use
/// so elements added or removed later are respected
pub struct DomStage {
    slides: Vec<HtmlElement>,
    titles: Vec<Option<HtmlElement>>,
    effects: Vec<SlideEffect>,
    particles: HashMap<ParticleId, (Container, HtmlElement)>,
    commands: CommandQueue,
}

impl DomStage {
    pub fn discover(commands: CommandQueue) -> Result<Self> {
        let slides = browser::query_all(html::SLIDE)?;
        ensure!(!slides.is_empty(), "No '{}' elements found", html::SLIDE);

        for slide in &slides {
            let style = slide.style();
            for (name, value) in [
                ("position", "absolute"),
                ("top", "0"),
                ("width", "100%"),
                ("height", "100%"),
            ] {
                style
                    .set_property(name, value)
                    .map_err(|err| anyhow!("Could not position slide : {:#?}", err))?;
            }
        }
        let titles = slides
            .iter()
            .map(|slide| {
                slide
                    .query_selector(html::SLIDE_TITLE)
                    .ok()
                    .flatten()
                    .and_then(|title| title.dyn_into::<HtmlElement>().ok())
            })
            .collect();
        let effects = slides.iter().map(describe_slide).collect();

        Ok(DomStage {
            slides,
            titles,
            effects,
            particles: HashMap::new(),
            commands,
        })
    }

    pub fn effects(&self) -> &[SlideEffect] {
        &self.effects
    }

    fn target(&self, target: Target) -> Option<HtmlElement> {
        match target {
            Target::Slide(slide) => self.slides.get(slide).cloned(),
            Target::Title(slide) => self.titles.get(slide).cloned().flatten(),
            Target::Banner => browser::element_by_id(html::BANNER),
            Target::Details(key) => browser::query_selector(&format!(
                "[{}=\"{}\"] {}",
                html::EXPAND_KEY_ATTRIBUTE,
                key,
                html::DETAILS
            ))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok()),
        }
    }

    fn try_set_style(&self, target: Target, prop: Prop, value: f64) -> Result<()> {
        let Some(element) = self.target(target) else {
            return Ok(());
        };
        let (name, value) = match prop {
            Prop::TranslateX => ("transform", format!("translateX({}%)", value)),
            Prop::TranslateY => ("transform", format!("translateY({}px)", value)),
            Prop::Opacity => ("opacity", value.to_string()),
        };
        element
            .style()
            .set_property(name, &value)
            .map_err(|err| anyhow!("Could not set {} on {:?} : {:#?}", name, target, err))
    }

    fn try_set_slide_active(&self, slide: usize, active: bool) -> Result<()> {
        let Some(element) = self.slides.get(slide) else {
            return Ok(());
        };
        let classes = element.class_list();
        if active {
            classes.add_1(html::ACTIVE_CLASS)
        } else {
            classes.remove_1(html::ACTIVE_CLASS)
        }
        .map_err(|err| anyhow!("Could not toggle slide {} : {:#?}", slide, err))
    }

    fn try_append_particle(
        &mut self,
        container: Container,
        id: ParticleId,
        particle: &Particle,
    ) -> Result<()> {
        let Some(parent) = browser::element_by_id::<HtmlElement>(container.element_id()) else {
            return Ok(());
        };
        let element = build_particle(particle)?;
        parent
            .append_child(&element)
            .map_err(|err| anyhow!("Could not append particle : {:#?}", err))?;
        self.particles.insert(id, (container, element));
        Ok(())
    }

    fn try_play(&self, request: PlayRequest) -> Result<()> {
        let audio = browser::element_by_id::<HtmlAudioElement>(html::AUDIO)
            .ok_or_else(|| anyhow!("No audio element found with ID : '{}'", html::AUDIO))?;
        audio.set_muted(false);
        let promise: Promise = audio
            .play()
            .map_err(|err| anyhow!("play() threw : {:#?}", err))?;

        let commands = self.commands.clone();
        browser::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => commands.post(Command::MusicStarted),
                Err(err) => commands.post(Command::MusicFailed {
                    request,
                    reason: format!("{:?}", err),
                }),
            }
        });
        Ok(())
    }
}

fn build_particle(particle: &Particle) -> Result<HtmlElement> {
    let tag = match particle.motion {
        Motion::Rise { .. } => "span",
        Motion::Burst { .. } | Motion::Shockwave => "div",
    };
    let element = browser::create_element(tag)?;
    element.set_text_content(Some(particle.glyph));
    if let Some(class) = particle.class_name() {
        element
            .class_list()
            .add_1(class)
            .map_err(|err| anyhow!("Could not add class {} : {:#?}", class, err))?;
    }

    let mut properties: Vec<(&str, String)> = match particle.motion {
        Motion::Burst { dx, dy, spin_deg } => vec![
            ("--tx", format!("{}px", dx)),
            ("--ty", format!("{}px", dy)),
            ("--rot", format!("{}deg", spin_deg)),
        ],
        Motion::Rise {
            wiggle_px,
            tilt_deg,
            start_x_pct,
            size_rem,
        } => vec![
            ("font-size", format!("{}rem", size_rem)),
            ("--wiggle", format!("{}px", wiggle_px)),
            ("--rot", format!("{}deg", tilt_deg)),
            ("--start-x", format!("{}%", start_x_pct)),
        ],
        Motion::Shockwave => Vec::new(),
    };
    properties.push(("animation", particle.css_animation()));

    let style = element.style();
    for (name, value) in properties {
        style
            .set_property(name, &value)
            .map_err(|err| anyhow!("Could not set {} : {:#?}", name, err))?;
    }
    Ok(element)
}

impl Stage for DomStage {
    fn set_slide_active(&mut self, slide: usize, active: bool) {
        if let Err(err) = self.try_set_slide_active(slide, active) {
            error!("{:#}", err);
        }
    }

    fn set_slide_visible(&mut self, slide: usize, visible: bool) {
        let Some(element) = self.slides.get(slide) else {
            return;
        };
        let value = if visible { "visible" } else { "hidden" };
        if let Err(err) = element.style().set_property("visibility", value) {
            error!("Could not set visibility of slide {} : {:#?}", slide, err);
        }
    }

    fn set_style(&mut self, target: Target, prop: Prop, value: f64) {
        if let Err(err) = self.try_set_style(target, prop, value) {
            error!("{:#}", err);
        }
    }

    fn set_text(&mut self, slot: TextSlot, text: &str) {
        if let Some(element) = browser::element_by_id::<HtmlElement>(slot.element_id()) {
            element.set_text_content(Some(text));
        }
    }

    fn set_nav_disabled(&mut self, previous: bool, next: bool) {
        for (id, disabled) in [(html::PREV_BUTTON, previous), (html::NEXT_BUTTON, next)] {
            if let Some(button) = browser::element_by_id::<HtmlButtonElement>(id) {
                button.set_disabled(disabled);
            }
        }
    }

    fn has_container(&self, container: Container) -> bool {
        browser::element_by_id::<HtmlElement>(container.element_id()).is_some()
    }

    fn append_particle(&mut self, container: Container, id: ParticleId, particle: &Particle) {
        if let Err(err) = self.try_append_particle(container, id, particle) {
            error!("{:#}", err);
        }
    }

    fn remove_particle(&mut self, _container: Container, id: ParticleId) {
        if let Some((_, element)) = self.particles.remove(&id) {
            element.remove();
        }
    }

    fn clear_container(&mut self, container: Container) {
        self.particles.retain(|_, (owner, _)| *owner != container);
        if let Some(element) = browser::element_by_id::<HtmlElement>(container.element_id()) {
            element.set_inner_html("");
        }
    }

    fn toggle_expanded(&mut self, details: usize) -> Option<bool> {
        let selector = format!("[{}=\"{}\"]", html::EXPAND_KEY_ATTRIBUTE, details);
        let element = browser::query_selector(&selector).ok().flatten()?;
        match element.class_list().toggle(html::EXPANDED_CLASS) {
            Ok(expanded) => Some(expanded),
            Err(err) => {
                error!("Could not toggle {} : {:#?}", selector, err);
                None
            }
        }
    }

    fn play_music(&mut self, request: PlayRequest) {
        if let Err(err) = self.try_play(request) {
            self.commands.post(Command::MusicFailed {
                request,
                reason: format!("{:#}", err),
            });
        }
    }

    fn pause_music(&mut self) {
        if let Some(audio) = browser::element_by_id::<HtmlAudioElement>(html::AUDIO) {
            if let Err(err) = audio.pause() {
                error!("Could not pause music : {:#?}", err);
            }
        }
    }
}
