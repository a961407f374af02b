#![allow(clippy::print_stdout)]

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use clap::Parser;
use partsquote_app_state::{
    AppStateSnapshot, AppStateStore, MemoryRouter, NavigateRequest, confirm_vehicle,
    submit_quote_request,
};
use partsquote_client_core::config::resolve_api_base_url;
use partsquote_client_core::{
    CartServiceItem, CartStore, CartSummary, InMemoryCartStorage, ManualVehicleEntry,
    QuoteRequestPayload, QuoteRequestReceipt, QuoteRequestTransport, SubmissionOutcome,
    TransportError, VehicleData, VehicleLookupTransport, lookup_vehicle,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(about = "Walk a customer from registration lookup to a submitted quote request")]
struct Args {
    /// Registration to look up.
    #[arg(long, default_value = "AB12CDE")]
    registration: String,
    /// Service label to add to the cart; repeat for several.
    #[arg(long = "service", default_values_t = [
        "Front Brake Pads".to_string(),
        "Oil Filter".to_string(),
    ])]
    services: Vec<String>,
    /// Cart position to remove before submitting.
    #[arg(long)]
    remove_index: Option<usize>,
    /// Submit as a signed in customer.
    #[arg(long)]
    signed_in: bool,
    /// Ask local suppliers only.
    #[arg(long)]
    local: bool,
    /// Skip the lookup and enter the vehicle by hand as MAKE:MODEL.
    #[arg(long)]
    manual: Option<String>,
}

struct CannedVehicleLookup;

#[async_trait]
impl VehicleLookupTransport for CannedVehicleLookup {
    async fn lookup_vehicle(&self, registration: &str) -> Result<VehicleData, TransportError> {
        Ok(VehicleData {
            registration_number: registration.to_string(),
            make: Some("FORD".to_string()),
            model: Some("FOCUS".to_string()),
            year: Some(2018),
            fuel_type: Some("PETROL".to_string()),
            engine_capacity: Some(998),
            co2_emissions: Some(108),
            colour: Some("BLUE".to_string()),
            tax_status: Some("Taxed".to_string()),
            mot_status: Some("Valid".to_string()),
            ..VehicleData::default()
        })
    }
}

#[derive(Default)]
struct CannedQuoteApi {
    issued: AtomicU64,
}

#[async_trait]
impl QuoteRequestTransport for CannedQuoteApi {
    async fn submit_quote_request(
        &self,
        payload: &QuoteRequestPayload,
    ) -> Result<QuoteRequestReceipt, TransportError> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            client_reference = %payload.client_reference,
            expires_at = %payload.expires_at,
            "quote api accepted request"
        );
        Ok(QuoteRequestReceipt {
            request_id: format!("qr_{sequence:04}"),
            status: Some("open".to_string()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WalkthroughReport {
    api_base_url: String,
    outcome: String,
    message: Option<String>,
    visited_paths: Vec<String>,
    cart: CartSummary,
    state: AppStateSnapshot,
}

fn service_item(label: &str) -> CartServiceItem {
    let id = label
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    CartServiceItem::new(id, label.trim())
}

fn manual_vehicle(registration: &str, raw: &str, local: bool) -> Result<VehicleData> {
    let (make, model) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("--manual expects MAKE:MODEL, got {raw:?}"))?;
    ManualVehicleEntry {
        registration: registration.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        local_request: local,
        ..ManualVehicleEntry::default()
    }
    .into_vehicle_data()
    .context("manual vehicle entry")
}

fn outcome_label(outcome: &SubmissionOutcome) -> &'static str {
    match outcome {
        SubmissionOutcome::Submitted(_) => "submitted",
        SubmissionOutcome::Invalid(_) => "invalid",
        SubmissionOutcome::SignInRequired => "sign_in_required",
        SubmissionOutcome::Failed(_) => "failed",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let api = resolve_api_base_url().context("resolve api base url")?;
    tracing::info!(base_url = %api.base_url, source = api.source, "using quote api");

    let router = MemoryRouter::new();
    let mut store = AppStateStore::new(router.clone());
    let cart = CartStore::new(InMemoryCartStorage::new());
    let _cart_log = cart.subscribe_to_cart_updates(|change| {
        tracing::info!(?change, "cart changed");
    });

    if args.signed_in {
        store.handle_auth_success(Some("customer"));
    }

    store.handle_navigate(NavigateRequest::to("request-flow"));
    let vehicle = match args.manual.as_deref() {
        Some(raw) => manual_vehicle(&args.registration, raw, args.local)?,
        None => lookup_vehicle(&CannedVehicleLookup, &args.registration, args.local)
            .await
            .context("vehicle lookup")?,
    };
    tracing::info!(vehicle = %vehicle.display_name(), "vehicle confirmed");
    confirm_vehicle(&mut store, &cart, vehicle);

    for label in &args.services {
        cart.toggle_service(service_item(label));
    }
    if let Some(index) = args.remove_index {
        cart.remove_service_by_index(index);
    }

    let transport = CannedQuoteApi::default();
    let outcome = submit_quote_request(&mut store, &cart, &transport, Utc::now()).await;
    tracing::info!(outcome = outcome_label(&outcome), "checkout finished");

    let report = WalkthroughReport {
        api_base_url: api.base_url,
        outcome: outcome_label(&outcome).to_string(),
        message: outcome.user_message(),
        visited_paths: router.pushed_paths(),
        cart: cart.load_cart_summary(),
        state: AppStateSnapshot::from(store.state()),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("encode walkthrough report")?
    );
    Ok(())
}
