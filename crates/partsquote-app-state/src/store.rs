use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dialog::DialogKind;
use crate::route::Page;
use crate::state::{
    AppAction, AppEffect, AppState, NavigateRequest, OrderDetails, QuoteNotifications,
    apply_action,
};

/// Client-side router capability the store drives.
pub trait Router {
    fn push(&self, path: &str);
    fn back(&self);
    fn scroll_to_top(&self);
}

/// Explicitly constructed application state: the single owner of ambient
/// state and dialog flags, threaded to page components by the shell.
pub struct AppStateStore {
    state: AppState,
    router: Box<dyn Router>,
}

impl fmt::Debug for AppStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStateStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AppStateStore {
    #[must_use]
    pub fn new(router: impl Router + 'static) -> Self {
        Self::with_state(AppState::default(), router)
    }

    #[must_use]
    pub fn with_state(state: AppState, router: impl Router + 'static) -> Self {
        Self {
            state,
            router: Box::new(router),
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn dispatch(&mut self, action: AppAction) -> AppEffect {
        let effect = apply_action(&mut self.state, action);
        match effect {
            AppEffect::None => {}
            AppEffect::Push(path) => {
                self.router.push(path);
                self.router.scroll_to_top();
            }
            AppEffect::Back => self.router.back(),
        }
        effect
    }

    pub fn handle_navigate(&mut self, request: NavigateRequest) {
        self.dispatch(AppAction::Navigate(request));
    }

    pub fn handle_start_chat(&mut self, quote_id: impl Into<String>, supplier_id: impl Into<String>) {
        self.dispatch(AppAction::StartChat {
            quote_id: quote_id.into(),
            supplier_id: supplier_id.into(),
        });
    }

    pub fn handle_back(&mut self) {
        self.dispatch(AppAction::Back);
    }

    pub fn sync_with_path(&mut self, path: &str) {
        self.dispatch(AppAction::PathChanged {
            path: path.to_string(),
        });
    }

    pub fn show_order_confirmation(&mut self, details: OrderDetails) {
        self.dispatch(AppAction::ShowOrderConfirmation(details));
    }

    pub fn set_quote_notifications(&mut self, notifications: Option<QuoteNotifications>) {
        self.dispatch(AppAction::SetQuoteNotifications(notifications));
    }

    pub fn clear_quote_notifications(&mut self) {
        self.set_quote_notifications(None);
    }

    pub fn clear_selected_part(&mut self) {
        self.dispatch(AppAction::ClearSelectedPart);
    }

    /// `role` is accepted for role-based routing but does not change state yet.
    pub fn handle_auth_success(&mut self, role: Option<&str>) {
        self.dispatch(AppAction::AuthSucceeded {
            role: role.map(str::to_string),
        });
    }

    pub fn handle_sign_out(&mut self) {
        self.dispatch(AppAction::SignedOut);
    }

    pub fn open_signup_dialog(&mut self) {
        self.dispatch(AppAction::OpenDialog(DialogKind::SignUp));
    }

    pub fn open_signin_dialog(&mut self) {
        self.dispatch(AppAction::OpenDialog(DialogKind::SignIn));
    }

    pub fn open_profile_dialog(&mut self) {
        self.dispatch(AppAction::OpenDialog(DialogKind::Profile));
    }

    pub fn open_notification_dialog(&mut self) {
        self.dispatch(AppAction::OpenDialog(DialogKind::Notification));
    }

    /// `onOpenChange` for the dialog component of `kind`.
    pub fn set_dialog_open(&mut self, kind: DialogKind, open: bool) {
        self.dispatch(AppAction::SetDialogOpen { kind, open });
    }

    pub fn swap_dialog(&mut self, from: DialogKind, to: DialogKind) {
        self.dispatch(AppAction::SwapDialog { from, to });
    }

    pub fn open_track_order_after_confirmation(&mut self) {
        self.dispatch(AppAction::ShowTrackOrderAfterConfirmation);
    }

    /// Exit-transition completion reported by a dialog component.
    pub fn on_dialog_closed(&mut self, kind: DialogKind) {
        self.dispatch(AppAction::DialogClosed(kind));
    }

    #[must_use]
    pub fn current_page(&self) -> Page {
        self.state.page
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterCall {
    Push(String),
    Back,
    ScrollToTop,
}

#[derive(Debug, Default)]
struct MemoryHistory {
    entries: Vec<String>,
    calls: Vec<RouterCall>,
}

/// In-memory router with a history stack. Clones share the same history,
/// so a handle can be kept while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouter {
    history: Rc<RefCell<MemoryHistory>>,
}

impl MemoryRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current_path(&self) -> String {
        self.history
            .borrow()
            .entries
            .last()
            .cloned()
            .unwrap_or_else(|| "/".to_string())
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RouterCall> {
        self.history.borrow().calls.clone()
    }

    #[must_use]
    pub fn pushed_paths(&self) -> Vec<String> {
        self.history
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                RouterCall::Push(path) => Some(path.clone()),
                RouterCall::Back | RouterCall::ScrollToTop => None,
            })
            .collect()
    }
}

impl Router for MemoryRouter {
    fn push(&self, path: &str) {
        let mut history = self.history.borrow_mut();
        history.entries.push(path.to_string());
        history.calls.push(RouterCall::Push(path.to_string()));
    }

    fn back(&self) {
        let mut history = self.history.borrow_mut();
        history.entries.pop();
        history.calls.push(RouterCall::Back);
    }

    fn scroll_to_top(&self) {
        self.history.borrow_mut().calls.push(RouterCall::ScrollToTop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (AppStateStore, MemoryRouter) {
        let router = MemoryRouter::new();
        (AppStateStore::new(router.clone()), router)
    }

    #[test]
    fn navigate_pushes_then_scrolls() {
        let (mut store, router) = store();
        store.handle_navigate(NavigateRequest::to("quotes"));
        assert_eq!(
            router.calls(),
            vec![RouterCall::Push("/quotes".to_string()), RouterCall::ScrollToTop]
        );
        assert_eq!(store.current_page(), Page::Quotes);
    }

    #[test]
    fn request_flow_alias_never_reaches_router() {
        let (mut store, router) = store();
        store.handle_navigate(NavigateRequest::to("request-flow"));
        assert_eq!(router.pushed_paths(), vec!["/vehicle-confirmation".to_string()]);
    }

    #[test]
    fn back_delegates_without_touching_state() {
        let (mut store, router) = store();
        store.handle_navigate(NavigateRequest::to("about").category("Brakes"));
        let before = store.state().clone();
        store.handle_back();
        assert_eq!(store.state(), &before);
        assert_eq!(router.calls().last(), Some(&RouterCall::Back));
        assert_eq!(router.current_path(), "/");
    }

    #[test]
    fn sign_out_pushes_root_and_scrolls() {
        let (mut store, router) = store();
        store.handle_auth_success(Some("supplier"));
        store.handle_start_chat("q_1", "sup_1");
        store.handle_sign_out();
        assert!(!store.is_authenticated());
        assert_eq!(
            router.pushed_paths(),
            vec!["/chat".to_string(), "/".to_string()]
        );
        assert_eq!(router.calls().last(), Some(&RouterCall::ScrollToTop));
    }

    #[test]
    fn dialog_openers_and_on_open_change() {
        let (mut store, router) = store();
        store.open_signup_dialog();
        store.open_profile_dialog();
        store.open_notification_dialog();
        store.swap_dialog(DialogKind::SignUp, DialogKind::SignIn);
        assert_eq!(
            store.state().dialogs.open_dialogs(),
            vec![DialogKind::SignIn, DialogKind::Profile, DialogKind::Notification]
        );

        store.set_dialog_open(DialogKind::Notification, false);
        assert!(!store.state().dialogs.notification);
        assert!(router.calls().is_empty());
    }

    #[test]
    fn clear_selected_part_only_drops_the_part() {
        let (mut store, _router) = store();
        store.handle_navigate(NavigateRequest::to("suppliers-list").part(
            partsquote_client_core::PartData {
                name: "Oil Filter".to_string(),
                ..partsquote_client_core::PartData::default()
            },
        ));
        store.clear_selected_part();
        assert!(store.state().selected_part_data.is_none());
        assert_eq!(store.current_page(), Page::SuppliersList);
    }
}
