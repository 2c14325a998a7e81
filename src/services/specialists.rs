// Specialist listings and dashboard counts
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDate;
use futures_util::future::{try_join, try_join3};
use serde::{Deserialize, Serialize};

use crate::data::{Predicate, PredicateBuilder, Record};
use crate::query::{PageRequest, PageResult, QueryService};
use crate::storage::{Collections, FieldCount, SharedStore};
use super::appointments::appointments_of;
use super::{ServiceError, SPECIALIST_HIDDEN_FIELDS, USER_TYPE_SPECIALIST};

/// `verification_status` of a vetted specialist
pub const VERIFIED: &str = "VERIFIED";

/// Advanced filter for the specialist listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistQuery {
    pub current_page: u64,
    pub page_limit: Option<u64>,
    pub search: Option<String>,
    pub gender: Option<String>,
    pub date_reg: Option<NaiveDate>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl SpecialistQuery {
    pub fn page(&self) -> PageRequest {
        PageRequest {
            current_page: self.current_page,
            page_limit: self.page_limit,
            search: self.search.clone(),
        }
    }

    pub fn predicate(&self) -> Predicate {
        PredicateBuilder::with_base(specialists_only())
            .eq("profile.gender", self.gender.as_deref())
            .eq("profile.contact.country", self.country.as_deref())
            .eq("profile.contact.state", self.state.as_deref())
            .created_on(self.date_reg)
            .eq("status", self.status.as_deref())
            .eq("professional_practice.category", self.category.as_deref())
            .build()
    }
}

/// A specialist with their appointments
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialistDetail {
    pub user: Record,
    pub appointments: Vec<Record>,
}

/// Verification breakdown and per-category headcount
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistDashboard {
    pub total_specialists: u64,
    pub verified_specialists: u64,
    pub un_verified_specialists: u64,
    pub percentage_verified: f64,
    pub percentage_unverified: f64,
    pub categories_count: Vec<FieldCount>,
}

fn specialists_only() -> Predicate {
    Predicate::eq("user_type", USER_TYPE_SPECIALIST)
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

pub struct SpecialistsService {
    users: SharedStore,
    appointments: SharedStore,
    query: QueryService,
}

impl SpecialistsService {
    pub fn new(collections: &Collections, default_page_limit: u64) -> Self {
        SpecialistsService {
            users: collections.users.clone(),
            appointments: collections.appointments.clone(),
            query: QueryService::new(collections.users.clone())
                .with_default_limit(default_page_limit)
                .with_hidden_fields(SPECIALIST_HIDDEN_FIELDS),
        }
    }

    /// Paginated specialist listing with optional search
    pub async fn list(&self, query: &SpecialistQuery) -> Result<PageResult<Record>, ServiceError> {
        Ok(self.query.list(&query.predicate(), &query.page()).await?)
    }

    /// One specialist with their appointments
    pub async fn get(&self, id: &str) -> Result<SpecialistDetail, ServiceError> {
        let by_id = Predicate::Id(id.to_string()).and(specialists_only());

        let (user, appointments) = try_join(
            self.users.find_one(&by_id),
            appointments_of(&self.appointments, "specialist", id, None),
        )
        .await?;

        let user = user
            .ok_or_else(|| ServiceError::NotFound(format!("Specialist '{}'", id)))?
            .without_paths(SPECIALIST_HIDDEN_FIELDS);

        Ok(SpecialistDetail { user, appointments })
    }

    pub async fn dashboard(&self) -> Result<SpecialistDashboard, ServiceError> {
        let verified = specialists_only().and(Predicate::eq("verification_status", VERIFIED));

        let (total, verified, categories_count) = try_join3(
            self.users.count_matching(&specialists_only()),
            self.users.count_matching(&verified),
            self.users.count_by_field(&specialists_only(), "professional_practice.category"),
        )
        .await?;

        let unverified = total.saturating_sub(verified);

        Ok(SpecialistDashboard {
            total_specialists: total,
            verified_specialists: verified,
            un_verified_specialists: unverified,
            percentage_verified: percentage(verified, total),
            percentage_unverified: percentage(unverified, total),
            categories_count,
        })
    }
}
