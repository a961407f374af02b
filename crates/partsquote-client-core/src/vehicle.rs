use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::transport::TransportError;

pub const REGISTRATION_MIN_LEN: usize = 2;
pub const REGISTRATION_MAX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleInputError {
    #[error("enter a valid registration number")]
    InvalidRegistration,
    #[error("vehicle make must not be empty")]
    EmptyMake,
    #[error("vehicle model must not be empty")]
    EmptyModel,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleLookupError {
    #[error(transparent)]
    Input(#[from] VehicleInputError),
    #[error("vehicle lookup failed: {0}")]
    Transport(#[from] TransportError),
}

/// Whether suppliers are asked locally or nationwide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Local,
    #[default]
    National,
}

impl RequestType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::National => "national",
        }
    }
}

/// Vehicle record as produced by a registration lookup or manual entry.
///
/// Lookup fields mirror the DVLA vehicle enquiry response. Every field is
/// optional on the wire so older persisted records keep decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleData {
    pub registration_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mot_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mot_expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_emissions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_manufacture: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_of_first_registration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub euro_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_approval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wheelplan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marked_for_export: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_last_v5c_issued: Option<String>,
    pub local_request: bool,
    pub request_type: RequestType,
}

impl VehicleData {
    #[must_use]
    pub fn display_name(&self) -> String {
        let parts = [
            self.year.map(|year| year.to_string()),
            self.make.clone(),
            self.model.clone(),
        ];
        let label = parts
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if label.is_empty() {
            self.registration_number.clone()
        } else {
            label
        }
    }
}

/// The part a customer is viewing supplier quotes for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartData {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Vehicle details typed in by hand when lookup is disabled or failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualVehicleEntry {
    pub registration: String,
    pub make: String,
    pub model: String,
    pub year: Option<u16>,
    pub fuel_type: Option<String>,
    pub local_request: bool,
}

impl ManualVehicleEntry {
    pub fn into_vehicle_data(self) -> Result<VehicleData, VehicleInputError> {
        let registration_number = normalize_registration(&self.registration)?;
        let make = self.make.trim().to_string();
        if make.is_empty() {
            return Err(VehicleInputError::EmptyMake);
        }
        let model = self.model.trim().to_string();
        if model.is_empty() {
            return Err(VehicleInputError::EmptyModel);
        }
        Ok(VehicleData {
            registration_number,
            make: Some(make),
            model: Some(model),
            year: self.year,
            fuel_type: self
                .fuel_type
                .map(|fuel| fuel.trim().to_string())
                .filter(|fuel| !fuel.is_empty()),
            local_request: self.local_request,
            request_type: request_type_for(self.local_request),
            ..VehicleData::default()
        })
    }
}

#[must_use]
pub fn request_type_for(local_request: bool) -> RequestType {
    if local_request {
        RequestType::Local
    } else {
        RequestType::National
    }
}

/// Uppercases and strips whitespace, then checks the UK plate shape.
pub fn normalize_registration(raw: &str) -> Result<String, VehicleInputError> {
    let collapsed = raw
        .split_whitespace()
        .collect::<String>()
        .to_ascii_uppercase();
    let len = collapsed.len();
    if !(REGISTRATION_MIN_LEN..=REGISTRATION_MAX_LEN).contains(&len)
        || !collapsed.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return Err(VehicleInputError::InvalidRegistration);
    }
    Ok(collapsed)
}

#[async_trait]
pub trait VehicleLookupTransport {
    async fn lookup_vehicle(&self, registration: &str) -> Result<VehicleData, TransportError>;
}

/// Validates the registration, runs the lookup, and stamps the request scope.
pub async fn lookup_vehicle<T>(
    transport: &T,
    raw_registration: &str,
    local_request: bool,
) -> Result<VehicleData, VehicleLookupError>
where
    T: VehicleLookupTransport + ?Sized,
{
    let registration = normalize_registration(raw_registration)?;
    let mut vehicle = transport.lookup_vehicle(&registration).await.map_err(|error| {
        tracing::warn!(%registration, status = ?error.status_code, %error, "vehicle lookup failed");
        error
    })?;
    if vehicle.registration_number.trim().is_empty() {
        vehicle.registration_number = registration;
    }
    vehicle.local_request = local_request;
    vehicle.request_type = request_type_for(local_request);
    Ok(vehicle)
}
