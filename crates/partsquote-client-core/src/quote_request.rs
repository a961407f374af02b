use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{CartServiceItem, CartStorage, CartStore, CartSummary};
use crate::transport::TransportError;
use crate::vehicle::{RequestType, VehicleData};

pub const QUOTE_REQUEST_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteRequestError {
    #[error("add your vehicle before requesting quotes")]
    MissingVehicle,
    #[error("add at least one service")]
    NoServices,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestPayload {
    pub client_reference: Uuid,
    pub vehicle: VehicleData,
    pub services: Vec<CartServiceItem>,
    pub request_type: RequestType,
    pub local_request: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestReceipt {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[async_trait]
pub trait QuoteRequestTransport {
    async fn submit_quote_request(
        &self,
        payload: &QuoteRequestPayload,
    ) -> Result<QuoteRequestReceipt, TransportError>;
}

#[must_use]
pub fn quote_request_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(QUOTE_REQUEST_TTL_DAYS)
}

pub fn build_quote_request(
    summary: &CartSummary,
    now: DateTime<Utc>,
) -> Result<QuoteRequestPayload, QuoteRequestError> {
    let Some(vehicle) = summary.vehicle.clone() else {
        return Err(QuoteRequestError::MissingVehicle);
    };
    if summary.services.is_empty() {
        return Err(QuoteRequestError::NoServices);
    }
    Ok(QuoteRequestPayload {
        client_reference: Uuid::new_v4(),
        request_type: vehicle.request_type,
        local_request: vehicle.local_request,
        vehicle,
        services: summary.services.clone(),
        created_at: now,
        expires_at: quote_request_expiry(now),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted(QuoteRequestReceipt),
    Invalid(QuoteRequestError),
    /// Not signed in, or the API answered 401. Callers prompt for sign-in.
    SignInRequired,
    Failed(TransportError),
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Toast text for the cart page; `None` when nothing should be shown.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Submitted(_) => Some("Quote request sent to suppliers.".to_string()),
            Self::Invalid(error) => Some(capitalize(&error.to_string())),
            Self::SignInRequired => None,
            Self::Failed(error) => Some(error.user_message()),
        }
    }
}

/// Submits the persisted cart as a quote request.
///
/// Only a successful submission mutates the cart: the services list is
/// emptied and the vehicle kept so further quotes can be requested for it.
pub async fn submit_cart_quote_request<S, T>(
    cart: &CartStore<S>,
    transport: &T,
    is_authenticated: bool,
    now: DateTime<Utc>,
) -> SubmissionOutcome
where
    S: CartStorage,
    T: QuoteRequestTransport + ?Sized,
{
    let summary = cart.load_cart_summary();
    let payload = match build_quote_request(&summary, now) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%error, "quote request rejected before submission");
            return SubmissionOutcome::Invalid(error);
        }
    };
    if !is_authenticated {
        tracing::debug!("quote request needs a signed in customer");
        return SubmissionOutcome::SignInRequired;
    }

    match transport.submit_quote_request(&payload).await {
        Ok(receipt) => {
            tracing::info!(
                request_id = %receipt.request_id,
                client_reference = %payload.client_reference,
                services = payload.services.len(),
                "quote request submitted"
            );
            cart.persist_services_selection(&[]);
            SubmissionOutcome::Submitted(receipt)
        }
        Err(error) if error.is_unauthorized() => {
            tracing::warn!("quote request rejected as unauthenticated");
            SubmissionOutcome::SignInRequired
        }
        Err(error) => {
            tracing::warn!(status = ?error.status_code, %error, "quote request failed");
            SubmissionOutcome::Failed(error)
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::InMemoryCartStorage;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct RecordingTransport {
        response: Result<QuoteRequestReceipt, TransportError>,
        seen: Mutex<Vec<QuoteRequestPayload>>,
    }

    impl RecordingTransport {
        fn answering(response: Result<QuoteRequestReceipt, TransportError>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .len()
        }
    }

    #[async_trait]
    impl QuoteRequestTransport for RecordingTransport {
        async fn submit_quote_request(
            &self,
            payload: &QuoteRequestPayload,
        ) -> Result<QuoteRequestReceipt, TransportError> {
            self.seen
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(payload.clone());
            self.response.clone()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn receipt() -> QuoteRequestReceipt {
        QuoteRequestReceipt {
            request_id: "qr_123".to_string(),
            status: Some("open".to_string()),
        }
    }

    fn filled_cart() -> CartStore<InMemoryCartStorage> {
        let cart = CartStore::new(InMemoryCartStorage::new());
        cart.persist_vehicle_selection(&VehicleData {
            registration_number: "AB12CDE".to_string(),
            local_request: true,
            request_type: RequestType::Local,
            ..VehicleData::default()
        });
        cart.persist_services_selection(&[
            CartServiceItem::new("front-brake-pads", "Front Brake Pads"),
            CartServiceItem::new("oil-filter", "Oil Filter"),
        ]);
        cart
    }

    #[test]
    fn expiry_is_seven_days_out() {
        let expected = Utc
            .with_ymd_and_hms(2026, 3, 8, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        assert_eq!(quote_request_expiry(now()), expected);
    }

    #[test]
    fn build_requires_vehicle_then_services() {
        let mut summary = CartSummary::default();
        assert_eq!(
            build_quote_request(&summary, now()),
            Err(QuoteRequestError::MissingVehicle)
        );

        summary.vehicle = Some(VehicleData::default());
        assert_eq!(
            build_quote_request(&summary, now()),
            Err(QuoteRequestError::NoServices)
        );
    }

    #[test]
    fn build_copies_scope_from_vehicle() {
        let payload = build_quote_request(&filled_cart().load_cart_summary(), now())
            .expect("valid request");
        assert_eq!(payload.request_type, RequestType::Local);
        assert!(payload.local_request);
        assert_eq!(payload.services.len(), 2);
        assert_eq!(payload.expires_at, quote_request_expiry(now()));

        let encoded = serde_json::to_value(&payload).expect("encode payload");
        assert_eq!(encoded["requestType"], "local");
        assert_eq!(encoded["expiresAt"], "2026-03-08T09:30:00Z");
    }

    #[tokio::test]
    async fn success_empties_services_and_keeps_vehicle() {
        let cart = filled_cart();
        let transport = RecordingTransport::answering(Ok(receipt()));

        let outcome = submit_cart_quote_request(&cart, &transport, true, now()).await;

        assert_eq!(outcome, SubmissionOutcome::Submitted(receipt()));
        let summary = cart.load_cart_summary();
        assert!(summary.services.is_empty());
        assert_eq!(
            summary.vehicle.map(|vehicle| vehicle.registration_number),
            Some("AB12CDE".to_string())
        );
    }

    #[tokio::test]
    async fn unauthenticated_submission_never_reaches_transport() {
        let cart = filled_cart();
        let before = cart.load_cart_summary();
        let transport = RecordingTransport::answering(Ok(receipt()));

        let outcome = submit_cart_quote_request(&cart, &transport, false, now()).await;

        assert_eq!(outcome, SubmissionOutcome::SignInRequired);
        assert_eq!(transport.calls(), 0);
        assert_eq!(cart.load_cart_summary(), before);
    }

    #[tokio::test]
    async fn unauthorized_response_maps_to_sign_in() {
        let cart = filled_cart();
        let before = cart.load_cart_summary();
        let transport = RecordingTransport::answering(Err(TransportError::unauthorized()));

        let outcome = submit_cart_quote_request(&cart, &transport, true, now()).await;

        assert_eq!(outcome, SubmissionOutcome::SignInRequired);
        assert_eq!(outcome.user_message(), None);
        assert_eq!(cart.load_cart_summary(), before);
    }

    #[tokio::test]
    async fn other_failures_keep_cart_and_surface_message() {
        let cart = filled_cart();
        let before = cart.load_cart_summary();
        let transport =
            RecordingTransport::answering(Err(TransportError::http(503, "suppliers offline")));

        let outcome = submit_cart_quote_request(&cart, &transport, true, now()).await;

        assert_eq!(outcome.user_message().as_deref(), Some("suppliers offline"));
        assert_eq!(cart.load_cart_summary(), before);
    }

    #[tokio::test]
    async fn empty_services_are_rejected_with_message() {
        let cart = filled_cart();
        cart.persist_services_selection(&[]);
        let transport = RecordingTransport::answering(Ok(receipt()));

        let outcome = submit_cart_quote_request(&cart, &transport, true, now()).await;

        assert_eq!(outcome, SubmissionOutcome::Invalid(QuoteRequestError::NoServices));
        assert_eq!(outcome.user_message().as_deref(), Some("Add at least one service"));
        assert_eq!(transport.calls(), 0);
    }
}
