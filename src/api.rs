/// Data access for the **prediction API**.
///
/// The [`DataSource`] trait is what the rest of the crate depends on; [`Client`] implements
/// it over HTTP (blocking `reqwest`), tests implement it over literal fixtures.
///
/// ### Notes
/// - 5xx responses and transport errors are retried with a short backoff; 4xx fails at once.
/// - Numeric values may arrive as JSON numbers or strings; both are accepted.
/// - Timeouts come from [`ApiConfig`].
///
/// Typical usage:
/// ```no_run
/// # use epiviz_rs::api::{Client, DataSource};
/// # use epiviz_rs::config::ApiConfig;
/// let client = Client::from_config(&ApiConfig::default())?;
/// let totals = client.cumulative_infections()?;
/// # Ok::<(), epiviz_rs::Error>(())
/// ```
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{Area, AreaForecast, CumulativeEntry, Model};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

/// Parameters of a predict request for one area.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictQuery {
    pub area: Area,
    /// Model names; empty means "observed data only".
    pub models: Vec<String>,
    /// Prediction horizon in days.
    pub days: u32,
    /// Restrict to one distancing scenario; `None` returns both.
    pub distancing: Option<bool>,
}

/// Read operations of the prediction API.
pub trait DataSource {
    /// All areas known to the API.
    fn areas(&self) -> Result<Vec<Area>>;
    /// Available forecasting models.
    fn models(&self) -> Result<Vec<Model>>;
    /// Cumulative infections per area as of the latest date.
    fn cumulative_infections(&self) -> Result<Vec<CumulativeEntry>>;
    /// Observed history and predictions for one area.
    fn predict(&self, query: &PredictQuery) -> Result<AreaForecast>;
    /// Predicted cumulative totals per area, `days` ahead, for one model.
    fn predict_all(&self, model: &str, days: u32) -> Result<Vec<CumulativeEntry>>;
}

/// Which totals the map shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapMode {
    /// Latest observed totals.
    Current,
    /// Predicted totals of `model`, `days` ahead.
    Predicted { model: String, days: u32 },
}

/// Fetch the totals for a map mode. A predicted mode without a model name falls back to
/// the current totals.
pub fn fetch_map_totals<S: DataSource + ?Sized>(
    source: &S,
    mode: &MapMode,
) -> Result<Vec<CumulativeEntry>> {
    match mode {
        MapMode::Predicted { model, days } if !model.trim().is_empty() => {
            source.predict_all(model, *days)
        }
        _ => source.cumulative_infections(),
    }
}

/// Fetch forecasts for several areas, keyed by display name (the chart's area label).
pub fn fetch_forecasts<S: DataSource + ?Sized>(
    source: &S,
    areas: &[Area],
    models: &[String],
    days: u32,
    distancing: Option<bool>,
) -> Result<BTreeMap<String, AreaForecast>> {
    let mut out = BTreeMap::new();
    for area in areas {
        let query = PredictQuery {
            area: area.clone(),
            models: models.to_vec(),
            days,
            distancing,
        };
        out.insert(area.display_name(), source.predict(&query)?);
    }
    Ok(out)
}

/// Resolve user-supplied area names or codes (case-insensitive) against the known areas.
///
/// Names and codes that point at the same area collapse to one entry, first mention wins.
pub fn resolve_areas(known: &[Area], wanted: &[String]) -> Result<Vec<Area>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(wanted.len());
    for w in wanted {
        let w = w.trim();
        let area = known
            .iter()
            .find(|a| a.iso_code.eq_ignore_ascii_case(w) || a.display_name().eq_ignore_ascii_case(w))
            .ok_or_else(|| Error::Config(format!("unknown area: {w}")))?;
        if seen.insert(area.iso_code.as_str()) {
            out.push(area.clone());
        } else {
            log::debug!("area {w} already selected as {}", area.iso_code);
        }
    }
    Ok(out)
}

/// HTTP implementation of [`DataSource`].
#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

// Allow -, _, . unescaped in query values (common in model names)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    pub fn from_config(cfg: &ApiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .redirect(Policy::limited(5))
            .user_agent(concat!("epiviz_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("http client: {e}")))?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, endpoint: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/{}/", self.base_url, endpoint);
        if !query.is_empty() {
            let qs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={}", enc(v))).collect();
            url.push('?');
            url.push_str(&qs.join("&"));
        }
        url
    }

    /// GET and decode JSON, retrying transient failures (5xx / network errors).
    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {url}");
        let mut last_err = String::from("no attempt made");
        for backoff_ms in [100u64, 300, 700] {
            match self.http.get(url).send() {
                Ok(r) if r.status().is_success() => {
                    let body = r.text().map_err(|e| Error::Http {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                    return serde_json::from_str(&body).map_err(|source| Error::Decode {
                        url: url.to_string(),
                        source,
                    });
                }
                Ok(r) if r.status().is_server_error() => {
                    last_err = format!("HTTP {}", r.status());
                }
                Ok(r) => {
                    return Err(Error::Http {
                        url: url.to_string(),
                        message: format!("HTTP {}", r.status()),
                    });
                }
                Err(e) => last_err = e.to_string(),
            }
            log::warn!("GET {url} failed ({last_err}), retrying in {backoff_ms} ms");
            std::thread::sleep(Duration::from_millis(backoff_ms));
        }
        Err(Error::Http {
            url: url.to_string(),
            message: last_err,
        })
    }
}

impl DataSource for Client {
    fn areas(&self) -> Result<Vec<Area>> {
        self.get_json(&self.url("areas", &[]))
    }

    fn models(&self) -> Result<Vec<Model>> {
        self.get_json(&self.url("models", &[]))
    }

    fn cumulative_infections(&self) -> Result<Vec<CumulativeEntry>> {
        self.get_json(&self.url("cumulative_infections", &[]))
    }

    fn predict(&self, query: &PredictQuery) -> Result<AreaForecast> {
        let area = &query.area;
        let country = area.country.clone().unwrap_or_else(|| area.display_name());
        let mut params = vec![("country", country)];
        if let Some(state) = area.state.as_ref().filter(|s| !s.trim().is_empty()) {
            params.push(("state", state.clone()));
        }
        for m in &query.models {
            params.push(("models", m.clone()));
        }
        params.push(("days", query.days.to_string()));
        if let Some(d) = query.distancing {
            params.push(("distancing", d.to_string()));
        }
        self.get_json(&self.url("predict", &params))
    }

    fn predict_all(&self, model: &str, days: u32) -> Result<Vec<CumulativeEntry>> {
        let params = [("model", model.to_string()), ("days", days.to_string())];
        self.get_json(&self.url("predict_all", &params))
    }
}
