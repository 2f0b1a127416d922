//! Browser glue: DOM events in, key highlights, floating notes and status text out.
//!
//! Everything here runs on the page's event loop. The piano lives in a
//! `RefCell` shared by the listeners; no borrow is held across a callback.

pub mod console;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent, Window};

use crate::config::{DomConfig, PianoConfig};
use crate::error::ConfigError;
use crate::host::WebAudioHost;
use crate::piano::{KeyPress, Piano};
use crate::state::Control;
use crate::tune::{self, Tune};

struct Shared {
    piano: RefCell<Piano<WebAudioHost>>,
    dom: DomConfig,
    window: Window,
    document: Document,
}

/// The piano as seen from JavaScript.
#[wasm_bindgen]
pub struct WebPiano {
    shared: Rc<Shared>,
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

fn load_config(config: JsValue) -> Result<PianoConfig, ConfigError> {
    if config.is_undefined() || config.is_null() {
        return Ok(PianoConfig::default());
    }
    if let Some(text) = config.as_string() {
        return PianoConfig::from_json(&text);
    }
    serde_wasm_bindgen::from_value(config).map_err(|e| ConfigError::Js(e.to_string()))
}

/// Run `f` once after `ms` milliseconds.
fn after(window: &Window, ms: i32, f: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(f);
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), ms)
    {
        log::warn!("setTimeout failed: {e:?}");
    }
}

impl Shared {
    fn key_element(&self, key: char) -> Option<Element> {
        let selector = format!(
            "{}[{}=\"{}\"]",
            self.dom.key_selector, self.dom.key_attribute, key
        );
        self.document.query_selector(&selector).ok().flatten()
    }

    /// Play `key` and decorate its on-screen key. `element` is the clicked
    /// key if there is one; keyboard input looks it up.
    fn press(&self, key: &str, element: Option<&Element>) -> Option<KeyPress> {
        let press = self.piano.borrow_mut().press(key)?;
        let element = element.cloned().or_else(|| self.key_element(press.key));
        if let Some(el) = element {
            if let Err(e) = self.highlight(&el) {
                log::warn!("could not highlight key '{}': {e:?}", press.key);
            }
            if let Err(e) = self.float_note(&el) {
                log::warn!("could not show floating note: {e:?}");
            }
        }
        Some(press)
    }

    fn highlight(&self, element: &Element) -> Result<(), JsValue> {
        element.class_list().add_1(&self.dom.active_class)?;
        let element = element.clone();
        let class = self.dom.active_class.clone();
        after(&self.window, self.dom.active_ms, move || {
            let _ = element.class_list().remove_1(&class);
        });
        Ok(())
    }

    fn float_note(&self, key: &Element) -> Result<(), JsValue> {
        let Some(container) = self.document.get_element_by_id(&self.dom.notes_container_id)
        else {
            return Ok(());
        };

        let note = self.document.create_element("div")?;
        note.set_class_name(&self.dom.floating_note_class);
        note.set_inner_html(&self.dom.floating_note_html);

        let rect = key.get_bounding_client_rect();
        if let Some(html) = note.dyn_ref::<HtmlElement>() {
            let style = html.style();
            style.set_property("left", &format!("{}px", rect.left() + rect.width() / 2.0))?;
            style.set_property(
                "top",
                &format!("{}px", rect.top() - self.dom.floating_note_lift),
            )?;
        }

        container.append_child(&note)?;
        after(&self.window, self.dom.floating_note_ms, move || {
            let _ = container.remove_child(&note);
        });
        Ok(())
    }

    fn control(&self, control: Control) {
        self.piano.borrow_mut().control(control);
        self.render_status();
    }

    fn render_status(&self) {
        let status = self.piano.borrow().status();
        for (id, text) in [
            (&self.dom.octave_status_id, &status.octave),
            (&self.dom.transpose_status_id, &status.transpose),
        ] {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text.as_str()));
            }
        }
    }

    fn control_id(&self, control: Control) -> &str {
        match control {
            Control::OctaveUp => self.dom.octave_up_id.as_str(),
            Control::OctaveDown => self.dom.octave_down_id.as_str(),
            Control::TransposeUp => self.dom.transpose_up_id.as_str(),
            Control::TransposeDown => self.dom.transpose_down_id.as_str(),
        }
    }
}

fn listen_keyboard(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let state = Rc::clone(shared);
    let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        state.press(&event.key(), None);
    });
    shared
        .document
        .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())?;
    on_keydown.forget();
    Ok(())
}

fn listen_keys(shared: &Rc<Shared>) -> Result<(), JsValue> {
    let keys = shared.document.query_selector_all(&shared.dom.key_selector)?;
    for i in 0..keys.length() {
        let Some(element) = keys.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let state = Rc::clone(shared);
        let target = element.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            if let Some(key) = target.get_attribute(&state.dom.key_attribute) {
                state.press(&key, Some(&target));
            }
        });
        element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

fn listen_controls(shared: &Rc<Shared>) -> Result<(), JsValue> {
    for control in Control::ALL {
        let Some(button) = shared.document.get_element_by_id(shared.control_id(control)) else {
            log::debug!("no button for {control:?}");
            continue;
        };
        let state = Rc::clone(shared);
        let on_click = Closure::<dyn FnMut()>::new(move || state.control(control));
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

#[wasm_bindgen]
impl WebPiano {
    /// Build the piano from an optional config object. The audio context is
    /// not created until the first note plays.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WebPiano, JsValue> {
        let config = load_config(config).map_err(js_error)?;
        console::init(config.verbose);

        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        let piano = Piano::new(WebAudioHost::new(), &config);

        Ok(WebPiano {
            shared: Rc::new(Shared {
                piano: RefCell::new(piano),
                dom: config.dom,
                window,
                document,
            }),
        })
    }

    /// Attach keyboard, key and control listeners and show the initial status.
    pub fn mount(&self) -> Result<(), JsValue> {
        listen_keyboard(&self.shared)?;
        listen_keys(&self.shared)?;
        listen_controls(&self.shared)?;
        self.shared.render_status();
        log::info!("virtual piano mounted");
        Ok(())
    }

    /// Press a key as if it was typed. Returns false for unmapped keys.
    pub fn press(&self, key: &str) -> bool {
        self.shared.press(key, None).is_some()
    }

    /// Apply a control by its button id, e.g. `"octave-up"`.
    pub fn control(&self, id: &str) -> Result<(), JsValue> {
        let control: Control = id.parse().map_err(js_error)?;
        self.shared.control(control);
        Ok(())
    }

    /// Current status lines as `{ octave, transpose }`.
    pub fn status(&self) -> Result<JsValue, JsValue> {
        let status = self.shared.piano.borrow().status();
        serde_wasm_bindgen::to_value(&status).map_err(js_error)
    }

    /// Play a key-sequence tune, one stroke per configured step.
    /// Throws a rendered diagnostic if the tune does not parse.
    pub fn play_tune(&self, source: &str) -> Result<(), JsValue> {
        let tune = Tune::parse(source).map_err(|e| js_error(tune::report(source, &e)))?;
        let step = self.shared.piano.borrow().tune_step();
        for (offset, stroke) in tune.schedule(step) {
            let state = Rc::clone(&self.shared);
            let key = stroke.binding.key.to_string();
            let ms = (offset * 1000.0).round() as i32;
            after(&self.shared.window, ms, move || {
                state.press(&key, None);
            });
        }
        Ok(())
    }

    /// Silence the current tone.
    pub fn stop(&self) {
        self.shared.piano.borrow_mut().stop();
    }
}
