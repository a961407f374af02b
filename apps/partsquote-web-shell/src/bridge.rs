use partsquote_app_state::{NavigateRequest, OrderDetails, QuoteNotifications};
use partsquote_client_core::{CartChange, CartServiceItem, PartData, VehicleData};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Optional navigation arguments as page components pass them from JS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigateOptions {
    pub id: Option<String>,
    pub vehicle_info: Option<VehicleData>,
    pub part_data: Option<PartData>,
    pub category: Option<String>,
    pub quote_data: Option<QuoteNotifications>,
}

pub fn navigate_request(page: &str, options_json: Option<&str>) -> Result<NavigateRequest, String> {
    let options = match options_json.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => decode_json::<NavigateOptions>(raw, "navigation options")?,
        None => NavigateOptions::default(),
    };
    Ok(NavigateRequest {
        page: page.to_string(),
        supplier_id: options.id,
        vehicle: options.vehicle_info,
        part: options.part_data,
        category: options.category,
        quote_notifications: options.quote_data,
    })
}

pub fn decode_json<T: DeserializeOwned>(raw: &str, label: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|error| format!("failed to decode {label}: {error}"))
}

pub fn decode_order_details(raw: &str) -> Result<OrderDetails, String> {
    decode_json(raw, "order details")
}

pub fn decode_services(raw: &str) -> Result<Vec<CartServiceItem>, String> {
    decode_json(raw, "cart services")
}

#[must_use]
pub fn cart_change_name(change: CartChange) -> &'static str {
    match change {
        CartChange::ServicesReplaced => "services-replaced",
        CartChange::VehicleSaved => "vehicle-saved",
        CartChange::VehicleRemoved => "vehicle-removed",
        CartChange::ServiceRemoved { .. } => "service-removed",
        CartChange::External => "external",
    }
}

/// `storage` events carry no key when the whole storage area was cleared.
#[must_use]
pub fn storage_event_touches_cart(key: Option<&str>) -> bool {
    key.is_none_or(partsquote_client_core::is_cart_storage_key)
}

/// One formatted log event as a console line; blank output is skipped.
pub fn console_line(buffer: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(buffer);
    let line = text.trim_end();
    (!line.is_empty()).then(|| line.to_string())
}
