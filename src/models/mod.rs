use crate::error::CrawlError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Rectangular lat/lon region used by the bounding-box endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub left_lon: f64,
    pub right_lon: f64,
    pub top_lat: f64,
    pub bottom_lat: f64,
}

impl GeoBounds {
    /// Build a square box of half-width `radius` (in degrees) around a center point.
    ///
    /// A radius that is not strictly positive and finite is rejected rather
    /// than producing an inverted box.
    pub fn around(center_lat: f64, center_lon: f64, radius: f64) -> Result<Self, CrawlError> {
        if !center_lat.is_finite() || !center_lon.is_finite() {
            return Err(CrawlError::InvalidArea(format!(
                "center ({}, {}) is not a finite coordinate",
                center_lat, center_lon
            )));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CrawlError::InvalidArea(format!(
                "radius must be positive, got {}",
                radius
            )));
        }

        Ok(Self {
            left_lon: center_lon - radius,
            right_lon: center_lon + radius,
            top_lat: center_lat + radius,
            bottom_lat: center_lat - radius,
        })
    }

    /// Query pairs shared by every bounding-box endpoint
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("leftLon", self.left_lon.to_string()),
            ("rightLon", self.right_lon.to_string()),
            ("topLat", self.top_lat.to_string()),
            ("bottomLat", self.bottom_lat.to_string()),
        ]
    }
}

/// Cookies and user agent lifted from a warmed-up browser page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionIdentity {
    pub cookies: BTreeMap<String, String>,
    pub user_agent: String,
}

impl SessionIdentity {
    pub fn new(cookies: BTreeMap<String, String>, user_agent: impl Into<String>) -> Self {
        Self {
            cookies,
            user_agent: user_agent.into(),
        }
    }

    /// Render the cookie jar as a single `Cookie` header value.
    /// Returns `None` when there is nothing to send.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let header = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }
}

/// Development plan categories indexed by the vendor map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Road,
    Rail,
    Jigu,
}

impl PlanType {
    pub const ALL: [PlanType; 3] = [PlanType::Road, PlanType::Rail, PlanType::Jigu];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Road => "road",
            PlanType::Rail => "rail",
            PlanType::Jigu => "jigu",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Center and derived bounds of one crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaInfo {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius: f64,
    pub bounds: GeoBounds,
}

/// Everything collected for one area
///
/// Vendor records stay as raw JSON; only `markerId` and `articleList` are
/// ever looked into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaCrawlResult {
    pub area: AreaInfo,
    pub complexes: Vec<Value>,
    pub complex_details: BTreeMap<String, Value>,
    pub articles: BTreeMap<String, Vec<Value>>,
    pub development_plans: BTreeMap<PlanType, Vec<Value>>,
    pub crawled_at: DateTime<Utc>,
    #[serde(default)]
    pub deadline_exceeded: bool,
}

impl AreaCrawlResult {
    /// Empty result with all three plan categories present
    pub fn new(center_lat: f64, center_lon: f64, radius: f64, bounds: GeoBounds) -> Self {
        let development_plans = PlanType::ALL
            .iter()
            .map(|plan| (*plan, Vec::new()))
            .collect();

        Self {
            area: AreaInfo {
                center_lat,
                center_lon,
                radius,
                bounds,
            },
            complexes: Vec::new(),
            complex_details: BTreeMap::new(),
            articles: BTreeMap::new(),
            development_plans,
            crawled_at: Utc::now(),
            deadline_exceeded: false,
        }
    }

    pub fn total_articles(&self) -> usize {
        self.articles.values().map(Vec::len).sum()
    }
}

/// Identifier of a complex marker, if it has one.
///
/// The vendor sends it as a string but numbers are accepted too.
pub fn marker_id(complex: &Value) -> Option<String> {
    match complex.get("markerId")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}
