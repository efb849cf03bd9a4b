use anyhow::{anyhow, Result};
use futures::channel::oneshot::channel;
use std::future::Future;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[rustfmt::skip]
use web_sys::{
    AddEventListenerOptions,
    Document,
    Element,
    Event,
    EventTarget,
    HtmlElement,
    Window,
};

// ==================== Logging ====================
// console.log / console.error on wasm32, stderr when running native tests
// - web_sys imports panic when called outside of a wasm runtime
macro_rules! log {
    ($($t:tt)*) => {
        $crate::browser::console_log(&format!($($t)*))
    }
}

macro_rules! error {
    ($($t:tt)*) => {
        $crate::browser::console_error(&format!($($t)*))
    }
}

pub fn console_log(message: &str) {
    if cfg!(target_arch = "wasm32") {
        web_sys::console::log_1(&message.into());
    } else {
        eprintln!("{}", message);
    }
}

pub fn console_error(message: &str) {
    if cfg!(target_arch = "wasm32") {
        web_sys::console::error_1(&message.into());
    } else {
        eprintln!("ERROR {}", message);
    }
}

// ==================== Constants ====================
// Constants related to HTML elements
mod html {
    pub const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";
    pub const READY_STATE_LOADING: &str = "loading";
}

pub type LoopClosure = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().ok_or_else(|| anyhow!("Window not found"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or_else(|| anyhow!("No Document Found"))
}

pub fn now() -> Result<f64> {
    Ok(window()?
        .performance()
        .ok_or_else(|| anyhow!("Performance object not found"))?
        .now())
}

/// Looks up an element by id and casts it to the requested type
/// - None when the element is absent OR is not a `T`
/// - callers treat absence as a silent no-op
pub fn element_by_id<T: JsCast>(id: &str) -> Option<T> {
    document()
        .ok()?
        .get_element_by_id(id)?
        .dyn_into::<T>()
        .ok()
}

pub fn query_selector(selector: &str) -> Result<Option<Element>> {
    document()?
        .query_selector(selector)
        .map_err(|err| anyhow!("Invalid selector '{}' : {:#?}", selector, err))
}

/// Every element matching `selector`, in document order
pub fn query_all(selector: &str) -> Result<Vec<HtmlElement>> {
    let list = document()?
        .query_selector_all(selector)
        .map_err(|err| anyhow!("Invalid selector '{}' : {:#?}", selector, err))?;
    Ok((0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub fn create_element(tag: &str) -> Result<HtmlElement> {
    document()?
        .create_element(tag)
        .map_err(|err| anyhow!("Could not create <{}> element : {:#?}", tag, err))?
        .dyn_into::<HtmlElement>()
        .map_err(|element| anyhow!("Error converting {:#?} to HtmlElement", element))
}

/// Persistent listener, kept alive for the lifetime of the page
pub fn add_listener<F>(target: &EventTarget, event: &str, f: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::<dyn FnMut(Event)>::new(f);
    target
        .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Could not listen for '{}' : {:#?}", event, err))?;
    callback.forget();
    Ok(())
}

/// Listener the browser drops after its first invocation
pub fn add_listener_once<F>(target: &EventTarget, event: &str, f: F) -> Result<()>
where
    F: FnOnce() + 'static,
{
    let mut f = Some(f);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if let Some(f) = f.take() {
            f();
        }
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|err| anyhow!("Could not listen once for '{}' : {:#?}", event, err))?;
    callback.forget();
    Ok(())
}

/// Resolves once the document is parsed
/// - immediately if DOMContentLoaded already fired
pub async fn dom_ready() -> Result<()> {
    let document = document()?;
    if document.ready_state() != html::READY_STATE_LOADING {
        return Ok(());
    }
    let (tx, rx) = channel::<()>();
    add_listener_once(&document, html::DOM_CONTENT_LOADED, move || {
        let _ = tx.send(());
    })?;
    rx.await
        .map_err(|_| anyhow!("DOMContentLoaded listener was dropped"))
}

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub fn create_raf_closure(f: impl FnMut(f64) + 'static) -> LoopClosure {
    Closure::wrap(Box::new(f))
}

pub fn request_animation_frame(callback: &LoopClosure) -> Result<i32> {
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("Cannot request animation frame {:#?}", err))
}
