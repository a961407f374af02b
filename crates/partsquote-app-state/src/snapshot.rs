use partsquote_client_core::{PartData, VehicleData};
use serde::Serialize;

use crate::dialog::DialogKind;
use crate::state::{AppState, OrderDetails, QuoteNotifications};

/// Read-only view of the ambient state handed to page and dialog components.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateSnapshot {
    pub page: &'static str,
    pub path: &'static str,
    pub is_authenticated: bool,
    pub selected_supplier_id: Option<String>,
    pub selected_quote_id: Option<String>,
    pub vehicle_data: Option<VehicleData>,
    pub selected_part_data: Option<PartData>,
    pub selected_category: Option<String>,
    pub quote_notifications: Option<QuoteNotifications>,
    pub confirmed_order_details: Option<OrderDetails>,
    pub open_dialogs: Vec<DialogKind>,
}

impl From<&AppState> for AppStateSnapshot {
    fn from(state: &AppState) -> Self {
        Self {
            page: state.page.as_str(),
            path: state.page.to_path(),
            is_authenticated: state.is_authenticated(),
            selected_supplier_id: state.selected_supplier_id.clone(),
            selected_quote_id: state.selected_quote_id.clone(),
            vehicle_data: state.vehicle_data.clone(),
            selected_part_data: state.selected_part_data.clone(),
            selected_category: state.selected_category.clone(),
            quote_notifications: state.quote_notifications.clone(),
            confirmed_order_details: state.confirmed_order_details.clone(),
            open_dialogs: state.dialogs.open_dialogs(),
        }
    }
}
