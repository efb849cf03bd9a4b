// ==================== Imports ====================
use once_cell::unsync::OnceCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

#[macro_use]
mod browser;
mod audio;
mod config;
mod deck;
mod dom;
mod effects;
mod engine;
mod presentation;
mod slideshow;
mod stats;
#[cfg(test)]
mod testing;

use config::PresentationConfig;
use engine::PresentationLoop;
use presentation::Presentation;
use slideshow::{Command, CommandQueue};

// ==================== Shared State ====================
// every exported control funnels into the one queue the frame loop drains
thread_local! {
    static COMMANDS: OnceCell<CommandQueue> = const { OnceCell::new() };
}

fn post(command: Command) {
    COMMANDS.with(|commands| match commands.get() {
        Some(queue) => queue.post(command),
        None => log!("Presentation not started yet, dropping {:?}", command),
    });
}

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - reads the optional config object
/// - waits for the page, then starts the frame loop
#[wasm_bindgen]
pub fn main_js(config: JsValue) -> Result<(), JsValue> {
    // setup better panic messages for debugging
    console_error_panic_hook::set_once();

    let config = PresentationConfig::from_js(config)
        .map_err(|err| JsValue::from_str(&format!("{:#}", err)))?;

    let commands = CommandQueue::default();
    COMMANDS
        .with(|cell| cell.set(commands.clone()))
        .map_err(|_| JsValue::from_str("Presentation already started"))?;

    // spawns a new asynchronous task in local thread, for web assembly
    // environment, using wasm_bindgen_futures
    browser::spawn_local(async move {
        if let Err(err) = PresentationLoop::start(Presentation::new(config, commands)).await {
            error!("Could not start presentation : {:#?}", err);
        }
    });

    Ok(())
}

// ==================== Controls ====================
#[wasm_bindgen]
pub fn next_slide() {
    post(Command::Next);
}

#[wasm_bindgen]
pub fn prev_slide() {
    post(Command::Previous);
}

#[wasm_bindgen]
pub fn go_to_slide(index: usize) {
    post(Command::GoTo(index));
}

#[wasm_bindgen]
pub fn toggle_music() {
    post(Command::ToggleMusic);
}

/// Flips the `expanded` class of `element` and slides its `.details` in
#[wasm_bindgen]
pub fn expand(element: HtmlElement) {
    match dom::expand_key(&element) {
        Ok(key) => post(Command::ToggleExpanded(key)),
        Err(err) => error!("{:#}", err),
    }
}
