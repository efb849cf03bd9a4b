use crate::browser;
use crate::config::PresentationConfig;
use crate::deck::Deck;
use crate::dom::DomStage;
use crate::effects::confetti::ConfettiPiece;
use crate::engine::Scene;
use crate::slideshow::{Command, CommandQueue, Slideshow};
use crate::stats::DummyStats;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, KeyboardEvent};

mod html {
    pub const CONFETTI: &str = ".confetti";
    pub const TOP_USER: &str = "topUser";
    pub const USER_BREAKDOWN: &str = "userBreakdown";
    pub const TOP_WORDS: &str = "topWords";
    pub const PREV_BUTTON: &str = "prevBtn";
    pub const NEXT_BUTTON: &str = "nextBtn";
    pub const MUSIC_TOGGLE: &str = "musicToggle";
}

/// TABLE
/// ┌──────────────────── Presentation Lifecycle ──────────────────────┐
/// │                                                                  │
/// │   Loading ──initialize()──► Loaded                               │
/// │     │                          │                                 │
/// │     ├─► wait for DOM ready     ├─► update(): drain commands,     │
/// │     ├─► stats + confetti       │   fire timers, sweep particles  │
/// │     ├─► discover slides        └─► draw(): flush tween samples   │
/// │     └─► wire controls                                            │
/// │                                                                  │
/// └──────────────────────────────────────────────────────────────────┘
pub enum Presentation {
    Loading {
        config: PresentationConfig,
        commands: CommandQueue,
    },
    Loaded(Show),
}

pub struct Show {
    slideshow: Slideshow<DomStage>,
    commands: CommandQueue,
}

impl Presentation {
    pub fn new(config: PresentationConfig, commands: CommandQueue) -> Self {
        Presentation::Loading { config, commands }
    }
}

#[async_trait(?Send)]
impl Scene for Presentation {
    async fn initialize(&self) -> Result<Box<dyn Scene>> {
        match self {
            Presentation::Loading { config, commands } => {
                browser::dom_ready().await?;

                display_stats(&DummyStats::default());
                let mut rng = StdRng::from_entropy();
                seed_confetti(&mut rng, config.confetti_count)?;

                let stage = DomStage::discover(commands.clone())?;
                let deck = Deck::new(stage.effects().to_vec())?;
                log!("Presentation loaded with {} slides", deck.len());

                let mut slideshow = Slideshow::new(stage, deck, config.clone(), rng);
                slideshow.start();
                wire_controls(commands)?;

                Ok(Box::new(Presentation::Loaded(Show {
                    slideshow,
                    commands: commands.clone(),
                })))
            }
            Presentation::Loaded(_) => Err(anyhow!("Presentation is already initialized")),
        }
    }

    fn update(&mut self, now: f64) {
        if let Presentation::Loaded(show) = self {
            for command in show.commands.drain() {
                show.slideshow.dispatch(command);
            }
            show.slideshow.update(now);
        }
    }

    fn draw(&mut self) {
        if let Presentation::Loaded(show) = self {
            show.slideshow.render();
        }
    }
}

fn display_stats(stats: &DummyStats) {
    let lines = [
        (html::TOP_USER, stats.top_user_line()),
        (html::USER_BREAKDOWN, stats.user_breakdown()),
        (html::TOP_WORDS, stats.top_words_line()),
    ];
    for (id, text) in lines {
        if let Some(element) = browser::element_by_id::<HtmlElement>(id) {
            element.set_inner_text(&text);
        }
    }
}

/// Fills `.confetti` with falling pieces, a page without one gets none
fn seed_confetti(rng: &mut StdRng, count: usize) -> Result<()> {
    let Some(container) = browser::query_selector(html::CONFETTI)? else {
        return Ok(());
    };
    for piece in ConfettiPiece::scatter(rng, count) {
        let span = browser::create_element("span")?;
        let style = span.style();
        for (name, value) in [
            ("left", format!("{}%", piece.left_pct)),
            ("--color", piece.color.to_string()),
            ("animation-delay", format!("{}s", piece.delay_s)),
        ] {
            style
                .set_property(name, &value)
                .map_err(|err| anyhow!("Could not set confetti {} : {:#?}", name, err))?;
        }
        container
            .append_child(&span)
            .map_err(|err| anyhow!("Could not append confetti : {:#?}", err))?;
    }
    Ok(())
}

fn wire_controls(commands: &CommandQueue) -> Result<()> {
    for (id, command) in [
        (html::PREV_BUTTON, Command::Previous),
        (html::NEXT_BUTTON, Command::Next),
        (html::MUSIC_TOGGLE, Command::ToggleMusic),
    ] {
        let Some(button) = browser::element_by_id::<HtmlElement>(id) else {
            log!("No #{} control on this page", id);
            continue;
        };
        let commands = commands.clone();
        browser::add_listener(&button, "click", move |_| commands.post(command.clone()))?;
    }

    let document = browser::document()?;

    // browsers refuse audio until the first user gesture
    let unlock = commands.clone();
    browser::add_listener_once(&document, "click", move || {
        unlock.post(Command::UnlockMusic)
    })?;

    let keys = commands.clone();
    browser::add_listener(&document, "keydown", move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        match event.key().as_str() {
            "ArrowRight" | "PageDown" => keys.post(Command::Next),
            "ArrowLeft" | "PageUp" => keys.post(Command::Previous),
            _ => {}
        }
    })?;
    Ok(())
}
