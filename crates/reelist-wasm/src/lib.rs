use wasm_bindgen::prelude::*;

use reelist_core::events::{DomEvent, EventBinder};
use reelist_core::matcher;
use reelist_core::models::{MovieCard, StoredMovie};
use reelist_core::view::{PanelVisibility, View};

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rank stored records (JSON array) against `query` and return the hits as cards.
#[wasm_bindgen]
pub fn fuzzy_search(records_json: &str, query: &str) -> Result<String, JsValue> {
    let records: Vec<StoredMovie> =
        serde_json::from_str(records_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let cards: Vec<MovieCard> = matcher::search_titles(query, &records)
        .iter()
        .map(|hit| MovieCard::from(&hit.item))
        .collect();
    to_json(&cards)
}

/// Panel visibility for `view` (`search`, `watched` or `unwatched`).
#[wasm_bindgen]
pub fn panel_visibility(view: &str) -> Result<String, JsValue> {
    let view: View = serde_json::from_value(serde_json::Value::String(view.to_string()))
        .map_err(|_| JsValue::from_str(&format!("unknown view {view:?}")))?;
    to_json(&PanelVisibility::only(view))
}

/// Page event handlers. Resolves raw events to actions for the host page.
#[wasm_bindgen]
pub struct PageEvents {
    binder: EventBinder,
}

#[wasm_bindgen]
impl PageEvents {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PageEvents {
        PageEvents {
            binder: EventBinder::new(),
        }
    }

    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.binder
            .mount()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn unmount(&mut self) -> usize {
        self.binder.unmount()
    }

    /// Returns the dispatch as JSON, or `null` when nothing listens.
    pub fn click(&self, element_id: &str, movie_id: Option<String>) -> Result<String, JsValue> {
        self.dispatch(DomEvent::Click {
            element_id: element_id.to_string(),
            movie_id,
        })
    }

    pub fn keydown(&self, element_id: &str, key_code: u32, value: &str) -> Result<String, JsValue> {
        self.dispatch(DomEvent::KeyDown {
            element_id: element_id.to_string(),
            key_code,
            value: value.to_string(),
        })
    }

    fn dispatch(&self, event: DomEvent) -> Result<String, JsValue> {
        let dispatch = self
            .binder
            .dispatch(&event)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_json(&dispatch)
    }
}

impl Default for PageEvents {
    fn default() -> Self {
        Self::new()
    }
}
