#[cfg(any(target_arch = "wasm32", test))]
mod bridge;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    use partsquote_app_state::{
        AppStateError, AppStateSnapshot, AppStateStore, DialogKind, install_app_state,
        with_app_state, with_app_state_mut,
    };
    use partsquote_client_core::{CartChange, CartStore, CartSubscription};
    use wasm_bindgen::prelude::*;

    use crate::bridge::{
        cart_change_name, decode_json, decode_order_details, decode_services, navigate_request,
    };

    mod console;
    mod routing;
    mod storage;

    use routing::{BrowserRouter, current_pathname, install_browser_handlers};
    use storage::BrowserLocalStorage;

    thread_local! {
        static CART: CartStore<BrowserLocalStorage> = CartStore::new(BrowserLocalStorage);
        static CART_LISTENERS: RefCell<HashMap<u64, (js_sys::Function, CartSubscription)>> = RefCell::new(HashMap::new());
        static NEXT_CART_LISTENER_ID: Cell<u64> = const { Cell::new(1) };
        static ROUTE_POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static STORAGE_EVENT_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    fn js_error(message: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&message.to_string())
    }

    fn provider_result<T>(result: Result<T, AppStateError>) -> Result<T, JsValue> {
        result.map_err(js_error)
    }

    fn dialog_kind(name: &str) -> Result<DialogKind, JsValue> {
        DialogKind::from_name(name).ok_or_else(|| js_error(format!("unknown dialog: {name}")))
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        console::install_console_logging();
        let mut store = AppStateStore::new(BrowserRouter);
        store.sync_with_path(&current_pathname());
        install_app_state(store);
        install_browser_handlers();
    }

    #[wasm_bindgen]
    pub fn app_state_json() -> Result<String, JsValue> {
        let snapshot = provider_result(with_app_state(|store| {
            AppStateSnapshot::from(store.state())
        }))?;
        serde_json::to_string(&snapshot).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn navigate(page: String, options_json: Option<String>) -> Result<(), JsValue> {
        let request = navigate_request(&page, options_json.as_deref()).map_err(js_error)?;
        provider_result(with_app_state_mut(|store| store.handle_navigate(request)))
    }

    #[wasm_bindgen]
    pub fn start_chat(quote_id: String, supplier_id: String) -> Result<(), JsValue> {
        provider_result(with_app_state_mut(|store| {
            store.handle_start_chat(quote_id, supplier_id);
        }))
    }

    #[wasm_bindgen]
    pub fn go_back() -> Result<(), JsValue> {
        provider_result(with_app_state_mut(AppStateStore::handle_back))
    }

    #[wasm_bindgen]
    pub fn show_order_confirmation(details_json: String) -> Result<(), JsValue> {
        let details = decode_order_details(&details_json).map_err(js_error)?;
        provider_result(with_app_state_mut(|store| {
            store.show_order_confirmation(details);
        }))
    }

    #[wasm_bindgen]
    pub fn set_quote_notifications(data_json: Option<String>) -> Result<(), JsValue> {
        let notifications = match data_json {
            Some(raw) => Some(decode_json(&raw, "quote notifications").map_err(js_error)?),
            None => None,
        };
        provider_result(with_app_state_mut(|store| {
            store.set_quote_notifications(notifications);
        }))
    }

    #[wasm_bindgen]
    pub fn clear_quote_notifications() -> Result<(), JsValue> {
        provider_result(with_app_state_mut(AppStateStore::clear_quote_notifications))
    }

    #[wasm_bindgen]
    pub fn auth_success(role: Option<String>) -> Result<(), JsValue> {
        provider_result(with_app_state_mut(|store| {
            store.handle_auth_success(role.as_deref());
        }))
    }

    #[wasm_bindgen]
    pub fn sign_out() -> Result<(), JsValue> {
        provider_result(with_app_state_mut(AppStateStore::handle_sign_out))
    }

    #[wasm_bindgen]
    pub fn open_dialog(kind: String) -> Result<(), JsValue> {
        let kind = dialog_kind(&kind)?;
        provider_result(with_app_state_mut(|store| store.set_dialog_open(kind, true)))
    }

    #[wasm_bindgen]
    pub fn set_dialog_open(kind: String, open: bool) -> Result<(), JsValue> {
        let kind = dialog_kind(&kind)?;
        provider_result(with_app_state_mut(|store| store.set_dialog_open(kind, open)))
    }

    #[wasm_bindgen]
    pub fn swap_dialog(from: String, to: String) -> Result<(), JsValue> {
        let from = dialog_kind(&from)?;
        let to = dialog_kind(&to)?;
        provider_result(with_app_state_mut(|store| store.swap_dialog(from, to)))
    }

    #[wasm_bindgen]
    pub fn open_track_order_after_confirmation() -> Result<(), JsValue> {
        provider_result(with_app_state_mut(
            AppStateStore::open_track_order_after_confirmation,
        ))
    }

    #[wasm_bindgen]
    pub fn dialog_closed(kind: String) -> Result<(), JsValue> {
        let kind = dialog_kind(&kind)?;
        provider_result(with_app_state_mut(|store| store.on_dialog_closed(kind)))
    }

    #[wasm_bindgen]
    pub fn cart_summary_json() -> Result<String, JsValue> {
        CART.with(|cart| serde_json::to_string(&cart.load_cart_summary()).map_err(js_error))
    }

    #[wasm_bindgen]
    pub fn cart_persist_services(services_json: String) -> Result<(), JsValue> {
        let services = decode_services(&services_json).map_err(js_error)?;
        CART.with(|cart| cart.persist_services_selection(&services));
        Ok(())
    }

    #[wasm_bindgen]
    pub fn cart_persist_vehicle(vehicle_json: String) -> Result<(), JsValue> {
        let vehicle = decode_json(&vehicle_json, "vehicle").map_err(js_error)?;
        CART.with(|cart| cart.persist_vehicle_selection(&vehicle));
        Ok(())
    }

    #[wasm_bindgen]
    pub fn cart_remove_vehicle() {
        CART.with(|cart| cart.remove_vehicle_from_cart());
    }

    #[wasm_bindgen]
    pub fn cart_remove_service(index: usize) {
        CART.with(|cart| cart.remove_service_by_index(index));
    }

    #[wasm_bindgen]
    pub fn cart_toggle_service(item_json: String) -> Result<bool, JsValue> {
        let item = decode_json(&item_json, "cart service").map_err(js_error)?;
        Ok(CART.with(|cart| cart.toggle_service(item)))
    }

    /// Registers a JS callback for cart changes; returns the id to pass to
    /// `unsubscribe_cart_updates`.
    #[wasm_bindgen]
    pub fn subscribe_cart_updates(callback: js_sys::Function) -> f64 {
        let listener_id = NEXT_CART_LISTENER_ID.with(|next| {
            let id = next.get();
            next.set(id.saturating_add(1));
            id
        });
        // The store needs a Send + Sync closure, so it only carries the id
        // and looks the JS function up on this thread when it fires.
        let subscription = CART.with(|cart| {
            cart.subscribe_to_cart_updates(move |change| notify_js_listener(listener_id, change))
        });
        CART_LISTENERS.with(|listeners| {
            listeners
                .borrow_mut()
                .insert(listener_id, (callback, subscription));
        });
        listener_id as f64
    }

    #[wasm_bindgen]
    pub fn unsubscribe_cart_updates(listener_id: f64) -> bool {
        let removed = CART_LISTENERS
            .with(|listeners| listeners.borrow_mut().remove(&(listener_id as u64)));
        removed.is_some_and(|(_, subscription)| subscription.unsubscribe())
    }

    fn notify_js_listener(listener_id: u64, change: CartChange) {
        let callback = CART_LISTENERS.with(|listeners| {
            listeners
                .borrow()
                .get(&listener_id)
                .map(|(callback, _)| callback.clone())
        });
        let Some(callback) = callback else {
            return;
        };
        let name = JsValue::from_str(cart_change_name(change));
        if callback.call1(&JsValue::NULL, &name).is_err() {
            tracing::warn!(listener_id, "cart listener threw");
        }
    }
}
