use partsquote_client_core::{PartData, VehicleData};
use serde::{Deserialize, Serialize};

use crate::dialog::{DialogKind, DialogState};
use crate::route::{Page, resolve_page};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteNotice {
    pub id: String,
    pub supplier_name: String,
    pub price: f64,
    pub eta: String,
}

/// Quotes surfaced in the notification dialog for one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteNotifications {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    #[serde(default)]
    pub quotes: Vec<QuoteNotice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order_number: String,
    pub supplier_name: String,
    pub part_name: String,
    pub price: f64,
    pub eta: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    #[default]
    SignedOut,
    SignedIn,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub page: Page,
    pub auth: AuthStatus,
    pub selected_supplier_id: Option<String>,
    pub selected_quote_id: Option<String>,
    pub vehicle_data: Option<VehicleData>,
    pub selected_part_data: Option<PartData>,
    pub selected_category: Option<String>,
    pub quote_notifications: Option<QuoteNotifications>,
    pub confirmed_order_details: Option<OrderDetails>,
    pub dialogs: DialogState,
}

impl AppState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth == AuthStatus::SignedIn
    }
}

/// Arguments of a navigation. Only `category` is reset when omitted;
/// omitted vehicle, part, supplier, and notification fields keep their
/// current values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateRequest {
    pub page: String,
    pub supplier_id: Option<String>,
    pub vehicle: Option<VehicleData>,
    pub part: Option<PartData>,
    pub category: Option<String>,
    pub quote_notifications: Option<QuoteNotifications>,
}

impl NavigateRequest {
    #[must_use]
    pub fn to(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_page(page: Page) -> Self {
        Self::to(page.as_str())
    }

    #[must_use]
    pub fn supplier_id(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    #[must_use]
    pub fn vehicle(mut self, vehicle: VehicleData) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    #[must_use]
    pub fn part(mut self, part: PartData) -> Self {
        self.part = Some(part);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn quote_notifications(mut self, notifications: QuoteNotifications) -> Self {
        self.quote_notifications = Some(notifications);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Navigate(NavigateRequest),
    StartChat {
        quote_id: String,
        supplier_id: String,
    },
    Back,
    /// Browser history moved (popstate); state follows without a push.
    PathChanged {
        path: String,
    },
    ShowOrderConfirmation(OrderDetails),
    SetQuoteNotifications(Option<QuoteNotifications>),
    ClearSelectedPart,
    AuthSucceeded {
        role: Option<String>,
    },
    SignedOut,
    OpenDialog(DialogKind),
    SetDialogOpen {
        kind: DialogKind,
        open: bool,
    },
    SwapDialog {
        from: DialogKind,
        to: DialogKind,
    },
    ShowTrackOrderAfterConfirmation,
    DialogClosed(DialogKind),
}

/// Side effect the store performs on the router after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEffect {
    None,
    /// Push the path, then scroll the viewport to the top.
    Push(&'static str),
    Back,
}

pub fn apply_action(state: &mut AppState, action: AppAction) -> AppEffect {
    match action {
        AppAction::Navigate(request) => {
            let page = resolve_page(&request.page).navigation_target();
            if let Some(supplier_id) = request.supplier_id {
                state.selected_supplier_id = Some(supplier_id);
            }
            if let Some(vehicle) = request.vehicle {
                state.vehicle_data = Some(vehicle);
            }
            if let Some(part) = request.part {
                state.selected_part_data = Some(part);
            }
            state.selected_category = request.category;
            if let Some(notifications) = request.quote_notifications {
                state.quote_notifications = Some(notifications);
            }
            state.page = page;
            tracing::debug!(page = page.as_str(), "navigate");
            AppEffect::Push(page.to_path())
        }
        AppAction::StartChat {
            quote_id,
            supplier_id,
        } => {
            state.selected_quote_id = Some(quote_id);
            state.selected_supplier_id = Some(supplier_id);
            state.page = Page::Chat;
            AppEffect::Push(Page::Chat.to_path())
        }
        AppAction::Back => AppEffect::Back,
        AppAction::PathChanged { path } => {
            state.page = Page::from_path(&path);
            AppEffect::None
        }
        AppAction::ShowOrderConfirmation(details) => {
            tracing::debug!(order_number = %details.order_number, "order confirmed");
            state.confirmed_order_details = Some(details);
            // A follow-up queued for an earlier order must not fire on this one.
            state.dialogs.cancel_follow_up();
            state.dialogs.open(DialogKind::OrderConfirmation);
            AppEffect::None
        }
        AppAction::SetQuoteNotifications(notifications) => {
            state.quote_notifications = notifications;
            AppEffect::None
        }
        AppAction::ClearSelectedPart => {
            state.selected_part_data = None;
            AppEffect::None
        }
        AppAction::AuthSucceeded { role } => {
            tracing::debug!(role = role.as_deref().unwrap_or("customer"), "signed in");
            state.auth = AuthStatus::SignedIn;
            AppEffect::None
        }
        AppAction::SignedOut => {
            state.auth = AuthStatus::SignedOut;
            state.selected_supplier_id = None;
            state.selected_quote_id = None;
            state.confirmed_order_details = None;
            state.dialogs.cancel_follow_up();
            state.page = Page::Home;
            tracing::debug!("signed out");
            // Straight to the root path, not through the page resolver.
            AppEffect::Push("/")
        }
        AppAction::OpenDialog(kind) => {
            state.dialogs.open(kind);
            AppEffect::None
        }
        AppAction::SetDialogOpen { kind, open } => {
            state.dialogs.set_open(kind, open);
            AppEffect::None
        }
        AppAction::SwapDialog { from, to } => {
            state.dialogs.swap(from, to);
            AppEffect::None
        }
        AppAction::ShowTrackOrderAfterConfirmation => {
            state
                .dialogs
                .chain(DialogKind::OrderConfirmation, DialogKind::TrackOrder);
            AppEffect::None
        }
        AppAction::DialogClosed(kind) => {
            if let Some(opened) = state.dialogs.on_closed(kind) {
                tracing::debug!(
                    closed = kind.as_str(),
                    opened = opened.as_str(),
                    "dialog follow-up"
                );
            }
            AppEffect::None
        }
    }
}
