use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use super::focus_trap::Focusable;

/// Class added to every element the dialog traps focus on
pub const TABBABLE_CLASS: &str = "tabbable";

#[derive(Debug, Error)]
pub enum DomError {
    #[error("No browser window available")]
    NoWindow,
    #[error("Window has no document")]
    NoDocument,
    #[error("Dialog content is not mounted")]
    NotMounted,
    #[error("Invalid focusable selector `{selector}`: {message}")]
    InvalidSelector { selector: String, message: String },
    #[error("Failed to focus element: {0}")]
    Focus(String),
}

impl Focusable for HtmlElement {
    fn is_disabled(&self) -> bool {
        self.has_attribute("disabled")
    }
}

pub fn document() -> Result<Document, DomError> {
    web_sys::window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

/// Focusable descendants of `root` in document order
pub fn focusable_descendants(root: &Element, selector: &str) -> Result<Vec<HtmlElement>, DomError> {
    let nodes = root
        .query_selector_all(selector)
        .map_err(|e| DomError::InvalidSelector {
            selector: selector.to_string(),
            message: js_message(&e),
        })?;

    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub fn mark_tabbable(elements: &[HtmlElement]) {
    for element in elements {
        let _ = element.class_list().add_1(TABBABLE_CLASS);
    }
}

pub fn focus(element: &HtmlElement) -> Result<(), DomError> {
    element.focus().map_err(|e| DomError::Focus(js_message(&e)))
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}
