pub mod checkout;
pub mod dialog;
pub mod provider;
pub mod route;
pub mod snapshot;
pub mod state;
pub mod store;

pub use checkout::{confirm_vehicle, submit_quote_request};
pub use dialog::{DialogKind, DialogState};
pub use provider::{
    AppStateError, app_state_installed, install_app_state, uninstall_app_state, with_app_state,
    with_app_state_mut,
};
pub use route::{Page, page_to_path, resolve_page};
pub use snapshot::AppStateSnapshot;
pub use state::{
    AppAction, AppEffect, AppState, AuthStatus, NavigateRequest, OrderDetails, QuoteNotice,
    QuoteNotifications, apply_action,
};
pub use store::{AppStateStore, MemoryRouter, Router, RouterCall};
