// Patient listings, details and analytics
// Author: Gabriel Demetrios Lafis

use std::ops::Bound;

use chrono::{Duration, Months, NaiveDate};
use futures_util::future::{try_join, try_join3, try_join4};
use serde::{Deserialize, Serialize};

use crate::analytics::{
    end_of_day, into_buckets, start_of_day, start_of_month, start_of_week, Aggregator,
    AnalyticsFilter, AnalyticsResult, Bucket, Clock, Granularity, Interval,
};
use crate::data::{Predicate, PredicateBuilder, Record};
use crate::query::{PageRequest, PageResult, QueryService};
use crate::storage::{Collections, SharedStore};
use super::appointments::appointments_of;
use super::{GraphQuery, ServiceError, PATIENT_HIDDEN_FIELDS, USER_TYPE_PATIENT};

/// Subsets of patients charted by the analytics graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatientFilter {
    All,
    MalePatients,
    FemalePatients,
    Other(String),
}

impl From<String> for PatientFilter {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ALL" => PatientFilter::All,
            "MALE_PATIENTS" => PatientFilter::MalePatients,
            "FEMALE_PATIENTS" => PatientFilter::FemalePatients,
            _ => PatientFilter::Other(s),
        }
    }
}

impl From<PatientFilter> for String {
    fn from(filter: PatientFilter) -> Self {
        match filter {
            PatientFilter::All => "ALL".to_string(),
            PatientFilter::MalePatients => "MALE_PATIENTS".to_string(),
            PatientFilter::FemalePatients => "FEMALE_PATIENTS".to_string(),
            PatientFilter::Other(raw) => raw,
        }
    }
}

impl AnalyticsFilter for PatientFilter {
    fn predicate(&self) -> Predicate {
        match self {
            PatientFilter::MalePatients => Predicate::eq("profile.gender", "Male"),
            PatientFilter::FemalePatients => Predicate::eq("profile.gender", "Female"),
            PatientFilter::All | PatientFilter::Other(_) => Predicate::Any,
        }
    }
}

/// Advanced filter for the patient listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientQuery {
    pub current_page: u64,
    pub page_limit: Option<u64>,
    pub search: Option<String>,
    pub gender: Option<String>,
    pub date_reg: Option<NaiveDate>,
    pub min_dependant: Option<usize>,
    pub max_dependant: Option<usize>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub plan: Option<String>,
}

impl PatientQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            current_page: self.current_page,
            page_limit: self.page_limit,
            search: self.search.clone(),
        }
    }

    pub fn predicate(&self) -> Predicate {
        PredicateBuilder::with_base(patients_only())
            .eq("profile.gender", self.gender.as_deref())
            .eq("profile.contact.country", self.country.as_deref())
            .eq("profile.contact.state", self.state.as_deref())
            .created_on(self.date_reg)
            .array_len("dependants", self.min_dependant, self.max_dependant)
            .eq("plan.plan_name", self.plan.as_deref())
            .build()
    }
}

/// A patient with their appointments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientDetail {
    pub user: Record,
    pub appointments: Vec<Record>,
}

/// Headline patient counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub total_patients: u64,
    pub new_patients_today: u64,
    pub new_patients_this_week: u64,
    pub new_patients_this_month: u64,
}

/// Dashboard card: totals plus a daily histogram of the current period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDashboard {
    pub duration: Interval,
    pub total_patients: u64,
    pub new_patients: u64,
    pub graph_data: Vec<Bucket>,
}

fn patients_only() -> Predicate {
    Predicate::eq("user_type", USER_TYPE_PATIENT)
}

/// Patient-facing queries over the users collection
pub struct PatientsService {
    users: SharedStore,
    appointments: SharedStore,
    query: QueryService,
    aggregator: Aggregator,
}

impl PatientsService {
    pub fn new(collections: &Collections, default_page_limit: u64, clock: Clock) -> Self {
        PatientsService {
            users: collections.users.clone(),
            appointments: collections.appointments.clone(),
            query: QueryService::new(collections.users.clone())
                .with_default_limit(default_page_limit)
                .with_hidden_fields(PATIENT_HIDDEN_FIELDS),
            aggregator: Aggregator::new(collections.users.clone())
                .with_base(patients_only())
                .with_clock(clock),
        }
    }

    /// Paginated patient listing with optional search
    pub async fn list(&self, query: &PatientQuery) -> Result<PageResult<Record>, ServiceError> {
        Ok(self.query.list(&query.predicate(), &query.page()).await?)
    }

    /// One patient with their appointments
    pub async fn get(&self, id: &str) -> Result<PatientDetail, ServiceError> {
        let by_id = Predicate::Id(id.to_string()).and(patients_only());

        let (user, appointments) = try_join(
            self.users.find_one(&by_id),
            appointments_of(&self.appointments, "patient", id, None),
        )
        .await?;

        let user = user
            .ok_or_else(|| ServiceError::NotFound(format!("Patient '{}'", id)))?
            .without_paths(PATIENT_HIDDEN_FIELDS);

        Ok(PatientDetail { user, appointments })
    }

    /// Total patients and new registrations today, this week and this month
    pub async fn summary(&self) -> Result<PatientSummary, ServiceError> {
        let now = self.aggregator.now();
        let since = |start| patients_only().and(Predicate::created_between(start, now));

        let (total, today, week, month) = try_join4(
            self.users.count_matching(&patients_only()),
            self.users.count_matching(&since(start_of_day(now))),
            self.users.count_matching(&since(start_of_week(now))),
            self.users.count_matching(&since(start_of_month(now))),
        )
        .await?;

        Ok(PatientSummary {
            total_patients: total,
            new_patients_today: today,
            new_patients_this_week: week,
            new_patients_this_month: month,
        })
    }

    /// Bucketed registrations per filter
    pub async fn analytics_graph(
        &self,
        query: GraphQuery<PatientFilter>,
    ) -> Result<AnalyticsResult<PatientFilter>, ServiceError> {
        Ok(self
            .aggregator
            .aggregate(&query.interval, query.filter, query.start_date, query.end_date)
            .await?)
    }

    /// Dashboard card for the current week or month; anything else reads as week
    pub async fn dashboard(&self, interval: &Interval) -> Result<PatientDashboard, ServiceError> {
        let now = self.aggregator.now();

        let (duration, period_start, period_end) = match interval {
            Interval::Month => {
                let start = start_of_month(now);
                let end = start.checked_add_months(Months::new(1)).unwrap_or(now);
                (Interval::Month, start, end)
            }
            _ => {
                let start = start_of_week(now);
                (Interval::Week, start, start + Duration::days(7))
            }
        };

        let registered_since = patients_only().and(Predicate::CreatedAt {
            start: Bound::Included(period_start),
            end: Bound::Excluded(end_of_day(now)),
        });
        let in_period = patients_only().and(Predicate::created_between(period_start, period_end));

        let (total_patients, new_patients, groups) = try_join3(
            self.users.count_matching(&patients_only()),
            self.users.count_matching(&registered_since),
            self.users.group_count(&in_period, Granularity::Day),
        )
        .await?;

        Ok(PatientDashboard {
            duration,
            total_patients,
            new_patients,
            graph_data: into_buckets(groups),
        })
    }
}
