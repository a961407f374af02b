use partsquote_app_state::{Router, with_app_state_mut};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{ScrollBehavior, ScrollToOptions, StorageEvent};

use super::{CART, ROUTE_POPSTATE_HANDLER, STORAGE_EVENT_HANDLER};
use crate::bridge::storage_event_touches_cart;

/// History API router; pushes are skipped when the path is already current.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BrowserRouter;

impl Router for BrowserRouter {
    fn push(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Ok(history) = window.history() else {
            return;
        };
        if current_pathname() == path {
            return;
        }
        if history
            .push_state_with_url(&JsValue::NULL, "", Some(path))
            .is_err()
        {
            tracing::warn!(path, "failed to push browser history entry");
        }
    }

    fn back(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Ok(history) = window.history() {
            let _ = history.back();
        }
    }

    fn scroll_to_top(&self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

pub(crate) fn current_pathname() -> String {
    let Some(window) = web_sys::window() else {
        return "/".to_string();
    };
    let Ok(pathname) = window.location().pathname() else {
        return "/".to_string();
    };
    if pathname.trim().is_empty() {
        "/".to_string()
    } else {
        pathname
    }
}

pub(crate) fn install_browser_handlers() {
    let Some(window) = web_sys::window() else {
        return;
    };

    ROUTE_POPSTATE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            let path = current_pathname();
            if let Err(error) = with_app_state_mut(|store| store.sync_with_path(&path)) {
                tracing::warn!(%error, "popstate before app state was installed");
            }
        }));
        let _ = window
            .add_event_listener_with_callback("popstate", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    STORAGE_EVENT_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
            let Some(event) = event.dyn_ref::<StorageEvent>() else {
                return;
            };
            if storage_event_touches_cart(event.key().as_deref()) {
                CART.with(|cart| cart.notify_external_change());
            }
        }));
        let _ = window
            .add_event_listener_with_callback("storage", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}
