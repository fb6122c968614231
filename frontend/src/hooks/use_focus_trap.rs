use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent};
use yew::prelude::*;

use crate::components::dialog::dom::{self, DomError};
use crate::components::dialog::focus_trap::FocusTrap;
use crate::components::dialog::lifecycle::{DialogLifecycle, Key, KeyResponse};
use crate::services::logging::Logger;

const COMPONENT: &str = "focus-trap";

/// Configuration for the dialog focus trap
#[derive(Clone, Debug, PartialEq)]
pub struct FocusTrapConfig {
    /// Delay between mount and moving focus into the dialog
    pub activation_delay_ms: u32,
    /// Selector for the elements focus is confined to
    pub focusable_selector: String,
    /// Re-query the focusable elements before every Tab press
    pub rescan_on_tab: bool,
}

impl Default for FocusTrapConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: 10,
            focusable_selector: "a, button, input, textarea".to_string(),
            rescan_on_tab: true,
        }
    }
}

/// Per-render options, the latest of which are used by the keydown listener
#[derive(Clone, Default, PartialEq)]
pub struct TrapOptions {
    pub disable_escape: bool,
    pub on_close: Option<Callback<KeyboardEvent>>,
}

/// Document keydown listener and content focusin listener
type Listeners = [EventListener; 2];

struct TrapController {
    lifecycle: DialogLifecycle<Timeout, HtmlElement, Listeners>,
    content: NodeRef,
    /// Content element the active session was armed on
    root: Option<Element>,
    config: FocusTrapConfig,
    options: TrapOptions,
}

/// Outcome of arming the trap
enum Armed {
    /// The session is active; focus goes to the element, if there is one
    Active(Option<HtmlElement>),
    /// The dialog was no longer scheduled, e.g. torn down meanwhile
    Rejected,
}

impl TrapController {
    fn new(content: NodeRef, config: FocusTrapConfig) -> Self {
        Self {
            lifecycle: DialogLifecycle::new(),
            content,
            root: None,
            config,
            options: TrapOptions::default(),
        }
    }

    fn content_root(&self) -> Result<Element, DomError> {
        self.content.cast::<Element>().ok_or(DomError::NotMounted)
    }

    fn scan(&self, root: &Element) -> Result<Vec<HtmlElement>, DomError> {
        let elements = dom::focusable_descendants(root, &self.config.focusable_selector)?;
        dom::mark_tabbable(&elements);
        Ok(elements)
    }

    fn rescan(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        match self.scan(&root) {
            Ok(elements) => {
                self.lifecycle.refresh(elements);
            }
            Err(e) => Logger::warn_with_component(COMPONENT, &format!("Rescan failed, keeping previous elements: {}", e)),
        }
    }

    fn teardown(&mut self) -> bool {
        self.root = None;
        self.lifecycle.teardown()
    }
}

/// Hook confining keyboard focus to the element behind `content` while the
/// calling component is mounted.
///
/// Activation is deferred by `config.activation_delay_ms`; on activation the
/// first focusable element receives focus. Tab and Shift+Tab cycle through
/// the enabled elements and Escape invokes `options.on_close` unless
/// `options.disable_escape` is set. Returns whether the dialog is shown as
/// active.
#[hook]
pub fn use_focus_trap(content: NodeRef, options: TrapOptions, config: FocusTrapConfig) -> bool {
    let active = use_state(|| false);
    let controller = {
        let content = content.clone();
        use_mut_ref(move || TrapController::new(content, config))
    };

    if let Ok(mut controller) = controller.try_borrow_mut() {
        controller.options = options;
    }

    {
        let controller = controller.clone();
        let active = active.clone();
        use_effect_with((), move |_| {
            schedule(&controller, active);

            move || {
                match controller.try_borrow_mut() {
                    Ok(mut controller) => {
                        if controller.teardown() {
                            Logger::debug_with_component(COMPONENT, "Focus trap released");
                        }
                    }
                    Err(_) => Logger::error_with_component(COMPONENT, "Focus trap busy during teardown"),
                }
            }
        });
    }

    *active
}

fn schedule(controller: &Rc<RefCell<TrapController>>, active: UseStateHandle<bool>) {
    let delay = controller.borrow().config.activation_delay_ms;
    let weak = Rc::downgrade(controller);
    let timer = Timeout::new(delay, move || {
        // Gone if the component unmounted before the timer fired
        if let Some(controller) = weak.upgrade() {
            activate(&controller, &active);
        }
    });

    if controller.borrow_mut().lifecycle.schedule(timer) {
        Logger::debug_with_component(COMPONENT, &format!("Activation scheduled in {}ms", delay));
    }
}

fn activate(controller: &Rc<RefCell<TrapController>>, active: &UseStateHandle<bool>) {
    if !controller.borrow().lifecycle.is_scheduled() {
        return;
    }

    let root = controller.borrow().content_root();
    match root.and_then(|root| arm(controller, root)) {
        Ok(Armed::Active(first)) => {
            active.set(true);
            if let Some(first) = first {
                focus_logged(&first);
            }
        }
        Ok(Armed::Rejected) => {
            Logger::debug_with_component(COMPONENT, "Activation skipped, dialog no longer scheduled");
        }
        Err(e) => {
            Logger::error_with_component(COMPONENT, &format!("Focus trap not armed: {}", e));
            controller.borrow_mut().teardown();
            // The dialog still opens, only without a trap
            active.set(true);
        }
    }
}

/// Scan `root`, register the listeners and enter the active phase
fn arm(controller: &Rc<RefCell<TrapController>>, root: Element) -> Result<Armed, DomError> {
    let elements = controller.borrow().scan(&root)?;
    let document = dom::document()?;

    let keydown = {
        let weak = Rc::downgrade(controller);
        EventListener::new_with_options(
            &document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(controller) = weak.upgrade() {
                    on_keydown(&controller, event);
                }
            },
        )
    };
    let focusin = {
        let weak = Rc::downgrade(controller);
        EventListener::new(&root, "focusin", move |event| {
            if let Some(controller) = weak.upgrade() {
                on_focusin(&controller, event);
            }
        })
    };

    let trap = FocusTrap::new(elements);
    let count = trap.len();
    let mut controller = controller.borrow_mut();
    if !controller.lifecycle.activate(trap, [keydown, focusin]) {
        return Ok(Armed::Rejected);
    }
    controller.root = Some(root);
    Logger::debug_with_component(COMPONENT, &format!("Focus trap active with {} focusable elements", count));

    let first = controller.lifecycle.focus_first();
    Ok(Armed::Active(
        first.and_then(|index| controller.lifecycle.element(index).cloned()),
    ))
}

fn focus_logged(element: &HtmlElement) {
    if let Err(e) = dom::focus(element) {
        Logger::warn_with_component(COMPONENT, &e.to_string());
    }
}

fn on_keydown(controller: &Rc<RefCell<TrapController>>, event: &Event) {
    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    let key = Key::classify(&event.key(), event.key_code(), event.shift_key());
    if key == Key::Other {
        return;
    }

    // Focus and the close callback both run after the borrow is released
    let (response, target, on_close) = {
        let Ok(mut controller) = controller.try_borrow_mut() else {
            return;
        };
        if key.is_tab() && controller.config.rescan_on_tab {
            controller.rescan();
        }

        let disable_escape = controller.options.disable_escape;
        let response = controller.lifecycle.handle_key(key, disable_escape);
        let target = match response {
            KeyResponse::Navigated(Some(index)) => controller.lifecycle.element(index).cloned(),
            _ => None,
        };
        (response, target, controller.options.on_close.clone())
    };

    if response.prevents_default() {
        event.prevent_default();
    }

    if response == KeyResponse::CloseRequested {
        if let Some(on_close) = on_close {
            on_close.emit(event.clone());
        }
    }

    if let Some(target) = target {
        focus_logged(&target);
    }
}

fn on_focusin(controller: &Rc<RefCell<TrapController>>, event: &Event) {
    let Some(target) = event.target().and_then(|target| target.dyn_into::<HtmlElement>().ok()) else {
        return;
    };
    if let Ok(mut controller) = controller.try_borrow_mut() {
        controller.lifecycle.focused(target);
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::Cell;
    use wasm_bindgen_test::*;
    use web_sys::KeyboardEventInit;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(html: &str) -> Element {
        let document = dom::document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(html);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    fn by_id(root: &Element, id: &str) -> HtmlElement {
        root.query_selector(&format!("#{}", id))
            .unwrap()
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap()
    }

    fn focused_id() -> Option<String> {
        dom::document().unwrap().active_element().map(|element| element.id())
    }

    fn counting_callback(count: &Rc<Cell<u32>>) -> Callback<KeyboardEvent> {
        let count = count.clone();
        Callback::from(move |_: KeyboardEvent| count.set(count.get() + 1))
    }

    /// Controller armed on `root` with the first element focused, as after
    /// the activation timer fired
    fn armed(root: &Element, options: TrapOptions) -> Rc<RefCell<TrapController>> {
        let controller = Rc::new(RefCell::new(TrapController::new(
            NodeRef::default(),
            FocusTrapConfig::default(),
        )));
        controller.borrow_mut().options = options;
        assert!(controller.borrow_mut().lifecycle.schedule(Timeout::new(60_000, || ())));

        match arm(&controller, root.clone()).unwrap() {
            Armed::Active(first) => {
                if let Some(first) = first {
                    dom::focus(&first).unwrap();
                }
            }
            Armed::Rejected => panic!("scheduled controller rejected activation"),
        }
        controller
    }

    fn press(key: &str, shift: bool) -> KeyboardEvent {
        let init = KeyboardEventInit::new();
        init.set_key(key);
        init.set_shift_key(shift);
        init.set_bubbles(true);
        init.set_cancelable(true);
        let event = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        dom::document().unwrap().dispatch_event(&event).unwrap();
        event
    }

    fn current_tab_index(controller: &Rc<RefCell<TrapController>>) -> usize {
        controller.borrow().lifecycle.state().current_tab_index
    }

    const THREE_BUTTONS: &str = r#"<button id="a">A</button>
        <button id="b" disabled>B</button>
        <button id="c">C</button>"#;

    #[wasm_bindgen_test]
    fn test_activation_focuses_first_element() {
        let root = mount(THREE_BUTTONS);
        let controller = armed(&root, TrapOptions::default());

        assert!(controller.borrow().lifecycle.is_active());
        assert_eq!(focused_id().as_deref(), Some("a"));
        assert!(by_id(&root, "a").class_list().contains(dom::TABBABLE_CLASS));

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_tab_moves_browser_focus_and_prevents_default() {
        let root = mount(THREE_BUTTONS);
        let controller = armed(&root, TrapOptions::default());

        let event = press("Tab", false);
        assert!(event.default_prevented());
        assert_eq!(focused_id().as_deref(), Some("c"));
        assert_eq!(current_tab_index(&controller), 2);

        let event = press("Tab", true);
        assert!(event.default_prevented());
        assert_eq!(focused_id().as_deref(), Some("a"));

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_escape_calls_on_close_once_per_press() {
        let root = mount(THREE_BUTTONS);
        let closed = Rc::new(Cell::new(0));
        let controller = armed(
            &root,
            TrapOptions {
                disable_escape: false,
                on_close: Some(counting_callback(&closed)),
            },
        );

        let event = press("Escape", false);
        assert!(!event.default_prevented());
        assert_eq!(closed.get(), 1);

        press("Escape", false);
        assert_eq!(closed.get(), 2);
        assert_eq!(focused_id().as_deref(), Some("a"));

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_disable_escape_never_calls_on_close() {
        let root = mount(THREE_BUTTONS);
        let closed = Rc::new(Cell::new(0));
        let controller = armed(
            &root,
            TrapOptions {
                disable_escape: true,
                on_close: Some(counting_callback(&closed)),
            },
        );

        press("Escape", false);
        press("Escape", false);
        assert_eq!(closed.get(), 0);

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_focusin_tracks_focus_moved_outside_tab() {
        let root = mount(THREE_BUTTONS);
        let controller = armed(&root, TrapOptions::default());

        dom::focus(&by_id(&root, "c")).unwrap();
        assert_eq!(current_tab_index(&controller), 2);

        press("Tab", false);
        assert_eq!(focused_id().as_deref(), Some("a"));
        assert_eq!(current_tab_index(&controller), 0);

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_tab_continues_from_content_added_after_activation() {
        let root = mount(r#"<button id="a">A</button><button id="b">B</button>"#);
        let controller = armed(&root, TrapOptions::default());

        root.insert_adjacent_html(
            "beforeend",
            r#"<button id="c">C</button><button id="d">D</button>"#,
        )
        .unwrap();
        dom::focus(&by_id(&root, "c")).unwrap();

        press("Tab", false);
        assert_eq!(focused_id().as_deref(), Some("d"));
        assert_eq!(current_tab_index(&controller), 3);

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_keys_have_no_effect_after_teardown() {
        let root = mount(THREE_BUTTONS);
        let closed = Rc::new(Cell::new(0));
        let controller = armed(
            &root,
            TrapOptions {
                disable_escape: false,
                on_close: Some(counting_callback(&closed)),
            },
        );

        assert!(controller.borrow_mut().teardown());
        assert!(!controller.borrow_mut().teardown());

        let event = press("Tab", false);
        assert!(!event.default_prevented());
        assert_eq!(focused_id().as_deref(), Some("a"));

        press("Escape", false);
        assert_eq!(closed.get(), 0);
        assert_eq!(current_tab_index(&controller), 0);
    }

    #[wasm_bindgen_test]
    fn test_no_borrow_held_during_focus_or_close() {
        let root = mount(THREE_BUTTONS);
        let controller = armed(&root, TrapOptions::default());
        let weak = Rc::downgrade(&controller);

        let free_during_focus = Rc::new(Cell::new(None));
        let _observer = {
            let free_during_focus = free_during_focus.clone();
            let weak = weak.clone();
            EventListener::new(&root, "focusin", move |_| {
                let free = weak.upgrade().map(|controller| {
                    let free = controller.try_borrow_mut().is_ok();
                    free
                });
                free_during_focus.set(free);
            })
        };

        let free_during_close = Rc::new(Cell::new(None));
        controller.borrow_mut().options.on_close = Some({
            let free_during_close = free_during_close.clone();
            Callback::from(move |_: KeyboardEvent| {
                let free = weak.upgrade().map(|controller| {
                    let free = controller.try_borrow_mut().is_ok();
                    free
                });
                free_during_close.set(free);
            })
        });

        press("Tab", false);
        assert_eq!(focused_id().as_deref(), Some("c"));
        assert_eq!(free_during_focus.get(), Some(true));

        press("Escape", false);
        assert_eq!(free_during_close.get(), Some(true));

        controller.borrow_mut().teardown();
    }

    #[wasm_bindgen_test]
    fn test_arm_after_teardown_is_rejected() {
        let root = mount(THREE_BUTTONS);
        let controller = Rc::new(RefCell::new(TrapController::new(
            NodeRef::default(),
            FocusTrapConfig::default(),
        )));
        controller.borrow_mut().lifecycle.schedule(Timeout::new(60_000, || ()));
        controller.borrow_mut().teardown();

        assert!(matches!(arm(&controller, root).unwrap(), Armed::Rejected));
        assert!(controller.borrow().lifecycle.is_inactive());

        // No listener survived the rejected activation
        let event = press("Tab", false);
        assert!(!event.default_prevented());
    }
}
