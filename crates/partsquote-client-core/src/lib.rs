pub mod cart;
pub mod config;
pub mod quote_request;
pub mod transport;
pub mod vehicle;

pub use cart::{
    CART_SERVICES_STORAGE_KEY, CART_VEHICLE_STORAGE_KEY, CartChange, CartServiceItem, CartStorage,
    CartStore, CartSubscription, CartSummary, InMemoryCartStorage, is_cart_storage_key,
};
pub use quote_request::{
    QUOTE_REQUEST_TTL_DAYS, QuoteRequestError, QuoteRequestPayload, QuoteRequestReceipt,
    QuoteRequestTransport, SubmissionOutcome, build_quote_request, submit_cart_quote_request,
};
pub use transport::TransportError;
pub use vehicle::{
    ManualVehicleEntry, PartData, RequestType, VehicleData, VehicleInputError,
    VehicleLookupError, VehicleLookupTransport, lookup_vehicle, normalize_registration,
};
