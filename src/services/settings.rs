// Admin settings document
// Author: Gabriel Demetrios Lafis

use std::fmt;
use std::sync::RwLock;

use log::info;
use serde::{Deserialize, Serialize};

use super::ServiceError;

/// Fee charged per appointment when none has been configured
pub const DEFAULT_APPOINTMENT_FEE: u64 = 1000;

/// Payment gateway used for appointment fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentProvider {
    Paystack,
    Flutterwave,
    Stripe,
}

impl Default for PaymentProvider {
    fn default() -> Self {
        PaymentProvider::Paystack
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            PaymentProvider::Paystack => "Paystack",
            PaymentProvider::Flutterwave => "Flutterwave",
            PaymentProvider::Stripe => "Stripe",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminDefaults {
    #[serde(default = "default_fee")]
    pub appointment_fee: u64,
    #[serde(default)]
    pub payment_provider: PaymentProvider,
}

fn default_fee() -> u64 {
    DEFAULT_APPOINTMENT_FEE
}

impl Default for AdminDefaults {
    fn default() -> Self {
        AdminDefaults {
            appointment_fee: DEFAULT_APPOINTMENT_FEE,
            payment_provider: PaymentProvider::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    #[serde(default)]
    pub defaults: AdminDefaults,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DefaultsPatch {
    pub appointment_fee: Option<u64>,
    pub payment_provider: Option<PaymentProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsPatch {
    #[serde(default)]
    pub defaults: DefaultsPatch,
}

/// Holds the single settings document
#[derive(Debug, Default)]
pub struct SettingsService {
    settings: RwLock<Option<AdminSettings>>,
}

impl SettingsService {
    pub fn new() -> Self {
        SettingsService::default()
    }

    /// Current settings, or `None` before the document exists
    pub fn get(&self) -> Result<Option<AdminSettings>, ServiceError> {
        let settings = self
            .settings
            .read()
            .map_err(|_| ServiceError::Lock("settings"))?;
        Ok(settings.clone())
    }

    /// Create the document with defaults, or return it if it already exists
    pub fn create(&self) -> Result<AdminSettings, ServiceError> {
        let mut settings = self
            .settings
            .write()
            .map_err(|_| ServiceError::Lock("settings"))?;

        if let Some(existing) = settings.as_ref() {
            return Ok(existing.clone());
        }

        let created = AdminSettings::default();
        info!("Created admin settings with provider {}", created.defaults.payment_provider);
        *settings = Some(created.clone());
        Ok(created)
    }

    /// Merge provided defaults into the stored document, creating it if needed
    pub fn update(&self, patch: SettingsPatch) -> Result<AdminSettings, ServiceError> {
        if patch.defaults.appointment_fee == Some(0) {
            return Err(ServiceError::Validation("appointment_fee must be greater than zero".to_string()));
        }

        let mut settings = self
            .settings
            .write()
            .map_err(|_| ServiceError::Lock("settings"))?;

        let mut current = settings.clone().unwrap_or_default();

        if let Some(fee) = patch.defaults.appointment_fee {
            current.defaults.appointment_fee = fee;
        }
        if let Some(provider) = patch.defaults.payment_provider {
            current.defaults.payment_provider = provider;
        }

        *settings = Some(current.clone());
        Ok(current)
    }
}
