use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use partsquote_app_state::{
    AppStateStore, DialogKind, MemoryRouter, NavigateRequest, OrderDetails, Page,
    confirm_vehicle, submit_quote_request,
};
use partsquote_client_core::{
    CartServiceItem, CartStore, InMemoryCartStorage, QuoteRequestPayload, QuoteRequestReceipt,
    QuoteRequestTransport, SubmissionOutcome, TransportError, VehicleData,
    VehicleLookupTransport, lookup_vehicle,
};

struct DvlaStub;

#[async_trait]
impl VehicleLookupTransport for DvlaStub {
    async fn lookup_vehicle(&self, registration: &str) -> Result<VehicleData, TransportError> {
        Ok(VehicleData {
            registration_number: registration.to_string(),
            make: Some("FORD".to_string()),
            model: Some("FOCUS".to_string()),
            year: Some(2018),
            fuel_type: Some("PETROL".to_string()),
            mot_status: Some("Valid".to_string()),
            ..VehicleData::default()
        })
    }
}

#[derive(Default)]
struct QuoteApiStub {
    submitted: Mutex<Vec<QuoteRequestPayload>>,
}

#[async_trait]
impl QuoteRequestTransport for QuoteApiStub {
    async fn submit_quote_request(
        &self,
        payload: &QuoteRequestPayload,
    ) -> Result<QuoteRequestReceipt, TransportError> {
        let mut submitted = self
            .submitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        submitted.push(payload.clone());
        Ok(QuoteRequestReceipt {
            request_id: format!("qr_{}", submitted.len()),
            status: Some("open".to_string()),
        })
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn selected_services() -> Vec<CartServiceItem> {
    vec![
        CartServiceItem::new("front-brake-pads", "Front Brake Pads").with_category("Brakes"),
        CartServiceItem::new("oil-filter", "Oil Filter").with_category("Servicing"),
    ]
}

#[tokio::test]
async fn customer_requests_quotes_for_looked_up_vehicle() {
    let router = MemoryRouter::new();
    let mut store = AppStateStore::new(router.clone());
    let cart = CartStore::new(InMemoryCartStorage::new());
    let transport = QuoteApiStub::default();
    store.handle_auth_success(None);

    store.handle_navigate(NavigateRequest::to("request-flow"));
    let vehicle = lookup_vehicle(&DvlaStub, "AB12CDE", false)
        .await
        .expect("lookup succeeds");
    confirm_vehicle(&mut store, &cart, vehicle);
    assert_eq!(
        store
            .state()
            .vehicle_data
            .as_ref()
            .map(|vehicle| vehicle.registration_number.as_str()),
        Some("AB12CDE")
    );
    assert_eq!(store.current_page(), Page::PartsSelection);

    cart.persist_services_selection(&selected_services());
    assert_eq!(cart.load_cart_summary().services.len(), 2);

    cart.remove_service_by_index(0);
    assert_eq!(cart.load_cart_summary().service_labels(), vec!["Oil Filter"]);

    let outcome = submit_quote_request(&mut store, &cart, &transport, now()).await;
    assert!(outcome.is_submitted());

    let summary = cart.load_cart_summary();
    assert!(summary.services.is_empty());
    assert_eq!(
        summary.vehicle.map(|vehicle| vehicle.registration_number),
        Some("AB12CDE".to_string())
    );
    assert_eq!(
        router.pushed_paths(),
        vec![
            "/vehicle-confirmation".to_string(),
            "/parts-selection".to_string()
        ]
    );

    let submitted = transport
        .submitted
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].services.len(), 1);
    assert_eq!(submitted[0].services[0].label, "Oil Filter");
}

#[tokio::test]
async fn signed_out_customer_is_prompted_to_sign_in() {
    let mut store = AppStateStore::new(MemoryRouter::new());
    let cart = CartStore::new(InMemoryCartStorage::new());
    let transport = QuoteApiStub::default();

    let vehicle = lookup_vehicle(&DvlaStub, "AB12CDE", true)
        .await
        .expect("lookup succeeds");
    confirm_vehicle(&mut store, &cart, vehicle);
    cart.persist_services_selection(&selected_services());
    let before = cart.load_cart_summary();

    let outcome = submit_quote_request(&mut store, &cart, &transport, now()).await;

    assert_eq!(outcome, SubmissionOutcome::SignInRequired);
    assert!(store.state().dialogs.is_open(DialogKind::SignIn));
    assert_eq!(cart.load_cart_summary(), before);
    assert!(
        transport
            .submitted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_empty()
    );
}

#[test]
fn cart_page_and_header_badge_both_observe_parts_selection() {
    let cart = CartStore::new(InMemoryCartStorage::new());
    let cart_page_renders = Arc::new(AtomicUsize::new(0));
    let badge_renders = Arc::new(AtomicUsize::new(0));

    let page_counter = Arc::clone(&cart_page_renders);
    let page_subscription = cart.subscribe_to_cart_updates(move |_| {
        page_counter.fetch_add(1, Ordering::SeqCst);
    });
    let badge_counter = Arc::clone(&badge_renders);
    let _badge_subscription = cart.subscribe_to_cart_updates(move |_| {
        badge_counter.fetch_add(1, Ordering::SeqCst);
    });

    cart.persist_services_selection(&selected_services());
    assert_eq!(cart_page_renders.load(Ordering::SeqCst), 1);
    assert_eq!(badge_renders.load(Ordering::SeqCst), 1);

    assert!(page_subscription.unsubscribe());
    cart.remove_service_by_index(1);
    assert_eq!(cart_page_renders.load(Ordering::SeqCst), 1);
    assert_eq!(badge_renders.load(Ordering::SeqCst), 2);
}

#[test]
fn order_confirmation_hands_off_to_track_order() {
    let mut store = AppStateStore::new(MemoryRouter::new());
    store.handle_auth_success(Some("customer"));
    store.handle_start_chat("q_9", "sup_4");
    store.show_order_confirmation(OrderDetails {
        order_number: "ORD-2201".to_string(),
        supplier_name: "Parts Direct".to_string(),
        part_name: "Oil Filter".to_string(),
        price: 14.0,
        eta: "Next day".to_string(),
    });
    assert!(store.state().dialogs.is_open(DialogKind::OrderConfirmation));

    store.open_track_order_after_confirmation();
    assert!(!store.state().dialogs.is_open(DialogKind::TrackOrder));
    store.on_dialog_closed(DialogKind::OrderConfirmation);
    assert!(store.state().dialogs.is_open(DialogKind::TrackOrder));

    store.handle_sign_out();
    store.handle_sign_out();
    let state = store.state();
    assert!(!state.is_authenticated());
    assert!(state.selected_supplier_id.is_none());
    assert!(state.selected_quote_id.is_none());
    assert!(state.confirmed_order_details.is_none());
}

#[test]
fn sign_out_disarms_pending_track_order() {
    let mut store = AppStateStore::new(MemoryRouter::new());
    store.handle_auth_success(None);
    store.show_order_confirmation(OrderDetails {
        order_number: "ORD-1".to_string(),
        supplier_name: "Parts Direct".to_string(),
        part_name: "Oil Filter".to_string(),
        price: 14.0,
        eta: "Next day".to_string(),
    });
    store.open_track_order_after_confirmation();
    store.handle_sign_out();
    store.on_dialog_closed(DialogKind::OrderConfirmation);

    let state = store.state();
    assert!(!state.dialogs.is_open(DialogKind::TrackOrder));
    assert!(state.confirmed_order_details.is_none());
}
