use std::env;
use anyhow::{bail, Context, Result};

use crate::store::PromoCode;

#[derive(Debug, Clone)]
pub struct Config {
    pub service_port: u16,
    pub service_host: String,
    pub store_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub promo_codes: Vec<PromoCode>,
    pub password_reset_ttl_minutes: i64,
    pub featured_product_count: usize,
    pub seed_demo_catalog: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service_port: 3000,
            service_host: "0.0.0.0".to_string(),
            store_name: "Storefront".to_string(),
            contact_email: "support@example.com".to_string(),
            contact_phone: "+1 555 0100".to_string(),
            promo_codes: vec![PromoCode {
                code: "WELCOME10".to_string(),
                percent_off: 10,
            }],
            password_reset_ttl_minutes: 15,
            featured_product_count: 8,
            seed_demo_catalog: true,
        }
    }
}

/// Parse `CODE:percent` pairs separated by commas, e.g. `WELCOME10:10,VIP:25`.
fn parse_promo_codes(raw: &str) -> Result<Vec<PromoCode>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, percent) = entry
                .split_once(':')
                .with_context(|| {
                    format!("PROMO_CODES entry '{}' must look like CODE:percent", entry)
                })?;
            let percent_off = percent
                .trim()
                .parse::<u8>()
                .with_context(|| {
                    format!("PROMO_CODES entry '{}' has an invalid percentage", entry)
                })?;
            if !(1..=100).contains(&percent_off) {
                bail!("PROMO_CODES entry '{}' must have a percentage between 1 and 100", entry);
            }
            Ok(PromoCode {
                code: code.trim().to_uppercase(),
                percent_off,
            })
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let service_port = env::var("SERVICE_PORT")
            .unwrap_or_else(|_| defaults.service_port.to_string())
            .parse::<u16>()
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = env::var("SERVICE_HOST")
            .unwrap_or(defaults.service_host);

        let store_name = env::var("STORE_NAME").unwrap_or(defaults.store_name);
        let contact_email = env::var("STORE_CONTACT_EMAIL").unwrap_or(defaults.contact_email);
        let contact_phone = env::var("STORE_CONTACT_PHONE").unwrap_or(defaults.contact_phone);

        let promo_codes = match env::var("PROMO_CODES") {
            Ok(raw) => parse_promo_codes(&raw)?,
            Err(_) => defaults.promo_codes,
        };

        let password_reset_ttl_minutes = env::var("PASSWORD_RESET_TTL_MINUTES")
            .unwrap_or_else(|_| defaults.password_reset_ttl_minutes.to_string())
            .parse::<i64>()
            .context("PASSWORD_RESET_TTL_MINUTES must be a whole number of minutes")?;
        if password_reset_ttl_minutes <= 0 {
            bail!("PASSWORD_RESET_TTL_MINUTES must be positive");
        }

        let featured_product_count = env::var("FEATURED_PRODUCT_COUNT")
            .unwrap_or_else(|_| defaults.featured_product_count.to_string())
            .parse::<usize>()
            .context("FEATURED_PRODUCT_COUNT must be a non-negative number")?;

        let seed_demo_catalog = env::var("SEED_DEMO_CATALOG")
            .unwrap_or_else(|_| defaults.seed_demo_catalog.to_string())
            .parse::<bool>()
            .context("SEED_DEMO_CATALOG must be 'true' or 'false'")?;

        Ok(Config {
            service_port,
            service_host,
            store_name,
            contact_email,
            contact_phone,
            promo_codes,
            password_reset_ttl_minutes,
            featured_product_count,
            seed_demo_catalog,
        })
    }

    /// Look up a configured promo code, ignoring case and surrounding space.
    pub fn promo_code(&self, code: &str) -> Option<&PromoCode> {
        let code = code.trim();
        self.promo_codes
            .iter()
            .find(|promo| promo.code.eq_ignore_ascii_case(code))
    }

    pub fn log_startup(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Store name: {}", self.store_name);
        tracing::info!("  Contact: {} / {}", self.contact_email, self.contact_phone);
        tracing::info!("  Promo codes: {}", self.promo_codes.len());
        tracing::info!("  Password reset TTL: {} minutes", self.password_reset_ttl_minutes);
        tracing::info!("  Demo catalog: {}",
            if self.seed_demo_catalog { "enabled" } else { "disabled" });
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}
