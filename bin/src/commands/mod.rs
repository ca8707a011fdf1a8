//! CLI subcommand implementations.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use wetstock_lib::{
    ClientConfig, FC_URL_ENV, ForecastClient, HttpTransport, IMS_URL_ENV, ImsClient, PSK_ENV,
};

pub(crate) mod archive;
pub(crate) mod forecast;
pub(crate) mod readings;
pub(crate) mod replication;
pub(crate) mod tanks;

/// Connection overrides from the command line; environment fills the gaps.
pub(crate) struct Connection {
    pub ims_url: Option<String>,
    pub fc_url: Option<String>,
    pub psk: Option<String>,
}

impl Connection {
    pub(crate) fn ims_client(&self) -> Result<ImsClient> {
        let config = self.config(self.ims_url.as_deref(), IMS_URL_ENV)?;
        Ok(ImsClient::new(HttpTransport::new(config)?.into_shared()))
    }

    pub(crate) fn forecast_client(&self) -> Result<ForecastClient> {
        let config = self.config(self.fc_url.as_deref(), FC_URL_ENV)?;
        Ok(ForecastClient::new(HttpTransport::new(config)?.into_shared()))
    }

    fn config(&self, url_flag: Option<&str>, url_var: &str) -> Result<ClientConfig> {
        let url = match url_flag {
            Some(url) => url.to_string(),
            None => std::env::var(url_var)
                .with_context(|| format!("set ${url_var} or pass the base address flag"))?,
        };
        let psk = match &self.psk {
            Some(psk) => psk.clone(),
            None => std::env::var(PSK_ENV)
                .with_context(|| format!("set ${PSK_ENV} or pass --psk"))?,
        };
        Ok(ClientConfig::new(url, psk))
    }
}

/// Parses a command-line instant: a date (midnight UTC) or RFC 3339.
pub(crate) fn parse_instant(input: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid instant: {input}"))?;
    Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid time")))
}
