// Appointment listings and analytics
// Author: Gabriel Demetrios Lafis

use chrono::{Duration, NaiveDate};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::analytics::{start_of_day, Aggregator, AnalyticsFilter, AnalyticsResult, Clock};
use crate::data::{Predicate, PredicateBuilder, Record};
use crate::query::{PageRequest, PageResult, QueryService};
use crate::storage::{Collections, SharedStore, SortOrder, StoreError};
use super::{GraphQuery, ServiceError};

pub const STATUS_CANCELLED: &str = "CANCELLED";
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Subsets of appointments charted by the analytics graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentFilter {
    All,
    CancelledAppointments,
    CompletedAppointments,
    Other(String),
}

impl From<String> for AppointmentFilter {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ALL" => AppointmentFilter::All,
            "CANCELLED_APPOINTMENTS" => AppointmentFilter::CancelledAppointments,
            "COMPLETED_APPOINTMENTS" => AppointmentFilter::CompletedAppointments,
            _ => AppointmentFilter::Other(s),
        }
    }
}

impl From<AppointmentFilter> for String {
    fn from(filter: AppointmentFilter) -> Self {
        match filter {
            AppointmentFilter::All => "ALL".to_string(),
            AppointmentFilter::CancelledAppointments => "CANCELLED_APPOINTMENTS".to_string(),
            AppointmentFilter::CompletedAppointments => "COMPLETED_APPOINTMENTS".to_string(),
            AppointmentFilter::Other(raw) => raw,
        }
    }
}

impl AnalyticsFilter for AppointmentFilter {
    fn predicate(&self) -> Predicate {
        match self {
            AppointmentFilter::CancelledAppointments => Predicate::eq("status", STATUS_CANCELLED),
            AppointmentFilter::CompletedAppointments => Predicate::eq("status", STATUS_COMPLETED),
            AppointmentFilter::All | AppointmentFilter::Other(_) => Predicate::Any,
        }
    }
}

/// Filter for the appointment listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    pub current_page: u64,
    pub page_limit: Option<u64>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub medium: Option<String>,
    #[serde(rename = "meeting_class")]
    pub meeting_class: Option<String>,
}

impl AppointmentQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            current_page: self.current_page,
            page_limit: self.page_limit,
            search: None,
        }
    }

    pub fn predicate(&self) -> Predicate {
        PredicateBuilder::new()
            .eq("status", self.status.as_deref())
            .created_on(self.date)
            .eq("meeting_type", self.medium.as_deref())
            .eq("meeting_class", self.meeting_class.as_deref())
            .build()
    }
}

/// Appointment totals overall and for yesterday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentSummary {
    pub total_appointments: u64,
    pub cancelled_appointments: u64,
    pub completed_appointments: u64,
    pub total_appointments_yesterday: u64,
    pub cancelled_appointments_yesterday: u64,
    pub completed_appointments_yesterday: u64,
}

/// Appointments where `role` (`patient` or `specialist`) is `id`, newest first
pub(crate) async fn appointments_of(
    store: &SharedStore,
    role: &str,
    id: &str,
    status: Option<&str>,
) -> Result<Vec<Record>, StoreError> {
    let predicate = PredicateBuilder::with_base(Predicate::eq(role, id))
        .eq("status", status)
        .build();

    store
        .find_matching(&predicate, usize::MAX, 0, Some(SortOrder::CreatedAtDesc))
        .await
}

pub struct AppointmentsService {
    appointments: SharedStore,
    query: QueryService,
    aggregator: Aggregator,
}

impl AppointmentsService {
    pub fn new(collections: &Collections, default_page_limit: u64, clock: Clock) -> Self {
        AppointmentsService {
            appointments: collections.appointments.clone(),
            query: QueryService::new(collections.appointments.clone()).with_default_limit(default_page_limit),
            aggregator: Aggregator::new(collections.appointments.clone()).with_clock(clock),
        }
    }

    /// Paginated appointment listing
    pub async fn list(&self, query: &AppointmentQuery) -> Result<PageResult<Record>, ServiceError> {
        Ok(self.query.list(&query.predicate(), &query.page()).await?)
    }

    /// Every appointment of a patient, optionally narrowed by status
    pub async fn for_patient(&self, patient_id: &str, status: Option<&str>) -> Result<Vec<Record>, ServiceError> {
        Ok(appointments_of(&self.appointments, "patient", patient_id, status).await?)
    }

    /// Every appointment of a specialist, optionally narrowed by status
    pub async fn for_specialist(&self, specialist_id: &str, status: Option<&str>) -> Result<Vec<Record>, ServiceError> {
        Ok(appointments_of(&self.appointments, "specialist", specialist_id, status).await?)
    }

    pub async fn summary(&self) -> Result<AppointmentSummary, ServiceError> {
        let today = start_of_day(self.aggregator.now());
        let yesterday = Predicate::created_between(today - Duration::days(1), today);
        let cancelled = Predicate::eq("status", STATUS_CANCELLED);
        let completed = Predicate::eq("status", STATUS_COMPLETED);

        let predicates = [
            Predicate::Any,
            cancelled.clone(),
            completed.clone(),
            yesterday.clone(),
            cancelled.and(yesterday.clone()),
            completed.and(yesterday),
        ];

        let counts = try_join_all(predicates.iter().map(|p| self.appointments.count_matching(p))).await?;

        Ok(AppointmentSummary {
            total_appointments: counts[0],
            cancelled_appointments: counts[1],
            completed_appointments: counts[2],
            total_appointments_yesterday: counts[3],
            cancelled_appointments_yesterday: counts[4],
            completed_appointments_yesterday: counts[5],
        })
    }

    /// Bucketed appointments per filter
    pub async fn analytics_graph(
        &self,
        query: GraphQuery<AppointmentFilter>,
    ) -> Result<AnalyticsResult<AppointmentFilter>, ServiceError> {
        Ok(self
            .aggregator
            .aggregate(&query.interval, query.filter, query.start_date, query.end_date)
            .await?)
    }
}
