// API request handlers
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use crate::services::{
    AppointmentFilter, AppointmentQuery, LifeguardQuery, PatientFilter, PatientQuery, Services,
    SettingsPatch, SpecialistQuery,
};
use super::{check_page, models::*, ApiError};

/// List patients
pub async fn list_patients(
    services: web::Data<Services>,
    query: web::Query<PatientQuery>,
) -> Result<impl Responder, ApiError> {
    check_page(query.current_page)?;
    let page = services.patients.list(&query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(page)))
}

/// Get one patient with appointments
pub async fn get_patient(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let patient = services.patients.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(patient)))
}

pub async fn list_specialists(
    services: web::Data<Services>,
    query: web::Query<SpecialistQuery>,
) -> Result<impl Responder, ApiError> {
    check_page(query.current_page)?;
    let page = services.specialists.list(&query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(page)))
}

pub async fn get_specialist(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let specialist = services.specialists.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(specialist)))
}

pub async fn list_appointments(
    services: web::Data<Services>,
    query: web::Query<AppointmentQuery>,
) -> Result<impl Responder, ApiError> {
    check_page(query.current_page)?;
    let page = services.appointments.list(&query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(page)))
}

pub async fn list_lifeguards(
    services: web::Data<Services>,
    query: web::Query<LifeguardQuery>,
) -> Result<impl Responder, ApiError> {
    check_page(query.current_page)?;
    let page = services.lifeguards.list(&query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(page)))
}

pub async fn get_lifeguard(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let lifeguard = services.lifeguards.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(lifeguard)))
}

/// Headline patient counts
pub async fn patient_analytics(services: web::Data<Services>) -> Result<impl Responder, ApiError> {
    let summary = services.patients.summary().await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(summary)))
}

/// Bucketed patient registrations
pub async fn patient_graph(
    services: web::Data<Services>,
    params: web::Query<GraphParams>,
) -> Result<impl Responder, ApiError> {
    let query = params.into_inner().into_query::<PatientFilter>()?;
    let result = services.patients.analytics_graph(query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(result)))
}

/// Headline appointment counts
pub async fn appointment_analytics(services: web::Data<Services>) -> Result<impl Responder, ApiError> {
    let summary = services.appointments.summary().await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(summary)))
}

/// Bucketed appointments
pub async fn appointment_graph(
    services: web::Data<Services>,
    params: web::Query<GraphParams>,
) -> Result<impl Responder, ApiError> {
    let query = params.into_inner().into_query::<AppointmentFilter>()?;
    let result = services.appointments.analytics_graph(query).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(result)))
}

pub async fn specialist_dashboard(services: web::Data<Services>) -> Result<impl Responder, ApiError> {
    let dashboard = services.specialists.dashboard().await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(dashboard)))
}

pub async fn patient_dashboard(
    services: web::Data<Services>,
    params: web::Query<DashboardParams>,
) -> Result<impl Responder, ApiError> {
    let dashboard = services.patients.dashboard(&params.interval()).await?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(dashboard)))
}

/// Current admin settings
pub async fn get_settings(services: web::Data<Services>) -> Result<impl Responder, ApiError> {
    let settings = services
        .settings
        .get()?
        .ok_or_else(|| ApiError::NotFound("admin settings have not been created".to_string()))?;
    Ok(HttpResponse::Ok().json(Envelope::retrieved(settings)))
}

/// Create admin settings with defaults
pub async fn create_settings(services: web::Data<Services>) -> Result<impl Responder, ApiError> {
    let settings = services.settings.create()?;
    Ok(HttpResponse::Created().json(Envelope::new(CREATED, settings)))
}

/// Merge provided defaults into the admin settings
pub async fn update_settings(
    services: web::Data<Services>,
    payload: web::Json<SettingsPatch>,
) -> Result<impl Responder, ApiError> {
    let settings = services.settings.update(payload.into_inner())?;
    Ok(HttpResponse::Ok().json(Envelope::new(UPDATED, settings)))
}
