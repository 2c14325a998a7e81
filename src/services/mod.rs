// Domain services for the back office
// Author: Gabriel Demetrios Lafis

mod appointments;
mod lifeguards;
mod patients;
mod settings;
mod specialists;

pub use appointments::*;
pub use lifeguards::*;
pub use patients::*;
pub use settings::*;
pub use specialists::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::analytics::{Clock, FilterSelection, Interval};
use crate::storage::{Collections, StoreError};

/// `user_type` of patient accounts
pub const USER_TYPE_PATIENT: &str = "PATIENT";

/// `user_type` of specialist accounts
pub const USER_TYPE_SPECIALIST: &str = "SPECIALIST";

/// Never returned for a patient
pub const PATIENT_HIDDEN_FIELDS: &[&str] = &[
    "profile.password",
    "profile.twoFA_secret",
    "documents",
    "professional_practice",
    "earnings",
    "average_rating",
    "verification_status",
    "awards",
];

/// Never returned for a specialist
pub const SPECIALIST_HIDDEN_FIELDS: &[&str] = &[
    "profile.password",
    "profile.twoFA_secret",
    "emergency_contacts",
    "pre_existing_conditions",
    "dependants",
];

/// Never returned for a lifeguard
pub const LIFEGUARD_HIDDEN_FIELDS: &[&str] = &["password", "card_details"];

/// Parameters of a bucketed analytics request
#[derive(Debug, Clone, PartialEq)]
pub struct GraphQuery<F> {
    pub interval: Interval,
    pub filter: FilterSelection<F>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl<F> GraphQuery<F> {
    pub fn new(interval: Interval, filter: FilterSelection<F>) -> Self {
        GraphQuery {
            interval,
            filter,
            start_date: None,
            end_date: None,
        }
    }

    pub fn between(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}

/// Every domain service, wired to one set of collections
#[derive(Clone)]
pub struct Services {
    pub patients: Arc<PatientsService>,
    pub specialists: Arc<SpecialistsService>,
    pub appointments: Arc<AppointmentsService>,
    pub lifeguards: Arc<LifeguardsService>,
    pub settings: Arc<SettingsService>,
}

impl Services {
    /// Wire services with the system clock
    pub fn new(collections: Collections, default_page_limit: u64) -> Self {
        Self::with_clock(collections, default_page_limit, Arc::new(Utc::now))
    }

    /// Wire services with an explicit clock
    pub fn with_clock(collections: Collections, default_page_limit: u64, clock: Clock) -> Self {
        Services {
            patients: Arc::new(PatientsService::new(&collections, default_page_limit, clock.clone())),
            specialists: Arc::new(SpecialistsService::new(&collections, default_page_limit)),
            appointments: Arc::new(AppointmentsService::new(&collections, default_page_limit, clock)),
            lifeguards: Arc::new(LifeguardsService::new(&collections, default_page_limit)),
            settings: Arc::new(SettingsService::new()),
        }
    }
}

/// Represents an error in the services module
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Lock poisoned: {0}")]
    Lock(&'static str),
}
