use chrono::{DateTime, Utc};
use partsquote_client_core::{
    CartStorage, CartStore, QuoteRequestTransport, SubmissionOutcome, VehicleData,
    submit_cart_quote_request,
};

use crate::route::Page;
use crate::state::NavigateRequest;
use crate::store::AppStateStore;

/// Stores the confirmed vehicle in ambient state and in the cart, then
/// moves on to parts selection.
pub fn confirm_vehicle<S: CartStorage>(
    store: &mut AppStateStore,
    cart: &CartStore<S>,
    vehicle: VehicleData,
) {
    cart.persist_vehicle_selection(&vehicle);
    store.handle_navigate(NavigateRequest::to_page(Page::PartsSelection).vehicle(vehicle));
}

/// Cart page submit handler. A sign-in requirement opens the sign-in
/// dialog and leaves the cart as it was.
pub async fn submit_quote_request<S, T>(
    store: &mut AppStateStore,
    cart: &CartStore<S>,
    transport: &T,
    now: DateTime<Utc>,
) -> SubmissionOutcome
where
    S: CartStorage,
    T: QuoteRequestTransport + ?Sized,
{
    let outcome = submit_cart_quote_request(cart, transport, store.is_authenticated(), now).await;
    if outcome == SubmissionOutcome::SignInRequired {
        store.open_signin_dialog();
    }
    outcome
}
