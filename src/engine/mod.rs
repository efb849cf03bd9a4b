use crate::browser;
use anyhow::{anyhow, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;

pub mod stage;
pub mod timeline;
pub mod tween;

pub use stage::{Container, PlayRequest, Prop, Stage, Target, TextSlot};
pub use timeline::{TimerId, Timeline};
pub use tween::{Ease, Tween, TweenSet};

/// A scene is loaded once, then driven by the frame loop
/// - initialize() consumes the "loading" scene and hands back the live one
/// - update() advances timers and commands to `now`
/// - draw() flushes tween samples to the page
#[async_trait(?Send)]
pub trait Scene {
    async fn initialize(&self) -> Result<Box<dyn Scene>>;
    fn update(&mut self, now: f64);
    fn draw(&mut self);
}

// a hidden tab stops requesting frames, when it comes back we do NOT want to
// replay every timer that would have fired in the meantime
const MAX_FRAME_DELTA: f64 = 250.0;

pub struct PresentationLoop {
    last_frame: f64,
    clock: f64,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl PresentationLoop {
    pub async fn start(scene: impl Scene + 'static) -> Result<()> {
        let mut scene = scene.initialize().await?;
        let mut presentation_loop = PresentationLoop {
            last_frame: browser::now()?,
            clock: 0.0,
        };
        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            presentation_loop.tick(perf);
            scene.update(presentation_loop.clock);
            scene.draw();
            if let Some(callback) = f.borrow().as_ref() {
                let _ = browser::request_animation_frame(callback);
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("PresentationLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Advances the scene clock by the (clamped) wall-clock delta
    fn tick(&mut self, perf: f64) {
        self.clock += (perf - self.last_frame).clamp(0.0, MAX_FRAME_DELTA);
        self.last_frame = perf;
    }
}
