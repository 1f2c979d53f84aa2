//! Data types for the trends client adapter.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::errors::TrendsError;

/// Search volume request as accepted from callers.
///
/// Geo restriction fields stay as raw strings here so an unknown kind is
/// reported as an invalid argument instead of a body decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchVolumeRequest {
    /// Search terms, one timeline each
    pub terms: Vec<String>,
    /// First day of the range (YYYY-MM-DD)
    pub start_date: String,
    /// Last day of the range (YYYY-MM-DD)
    pub end_date: String,
    /// Timeline resolution passed through as `timelineResolution`
    pub frequency: String,
    /// Restriction kind: `country`, `dma` or `region`
    pub geo_restriction: String,
    /// Code for the chosen restriction kind
    pub geo_restriction_option: String,
}

impl SearchVolumeRequest {
    /// Validate the request into a query the providers understand.
    ///
    /// # Errors
    /// - `TrendsError::InvalidArgument` - `geo_restriction` is not a known kind
    pub fn into_query(self) -> Result<TimelineQuery, TrendsError> {
        let geo = GeoRestriction::from_parts(&self.geo_restriction, self.geo_restriction_option)?;
        Ok(TimelineQuery {
            terms: self.terms,
            start_date: self.start_date,
            end_date: self.end_date,
            resolution: self.frequency,
            geo,
        })
    }
}

/// Geographic scope filter; the API accepts exactly one per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "code", rename_all = "lowercase")]
pub enum GeoRestriction {
    /// ISO country code, e.g. `US`
    Country(String),
    /// Designated Market Area code, e.g. `501`
    Dma(String),
    /// Sub-national region code, e.g. `US-NY`
    Region(String),
}

impl GeoRestriction {
    /// Kinds accepted by [`GeoRestriction::from_parts`].
    pub const KINDS: [&'static str; 3] = ["country", "dma", "region"];

    /// Build a restriction from its kind discriminator and option value.
    ///
    /// # Errors
    /// - `TrendsError::InvalidArgument` - `kind` is not `country`, `dma` or `region`
    pub fn from_parts(kind: &str, option: impl Into<String>) -> Result<Self, TrendsError> {
        let option = option.into();
        match kind {
            "country" => Ok(Self::Country(option)),
            "dma" => Ok(Self::Dma(option)),
            "region" => Ok(Self::Region(option)),
            other => Err(TrendsError::InvalidArgument {
                field: "geo_restriction",
                value: other.to_string(),
                reason: format!("expected one of {}", Self::KINDS.join(", ")),
            }),
        }
    }

    /// Query parameter the API expects for this restriction.
    pub fn param_name(&self) -> &'static str {
        match self {
            Self::Country(_) => "geoRestriction.country",
            Self::Dma(_) => "geoRestriction.dma",
            Self::Region(_) => "geoRestriction.region",
        }
    }

    /// The restriction's code value.
    pub fn code(&self) -> &str {
        match self {
            Self::Country(code) | Self::Dma(code) | Self::Region(code) => code,
        }
    }
}

/// Validated timeline request for `getTimelinesForHealth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineQuery {
    /// Search terms, sent as repeated `terms`
    pub terms: Vec<String>,
    /// Sent as `time.startDate`
    pub start_date: String,
    /// Sent as `time.endDate`
    pub end_date: String,
    /// Sent as `timelineResolution`
    pub resolution: String,
    /// The single geographic restriction
    pub geo: GeoRestriction,
}

impl TimelineQuery {
    /// Query parameters for the remote call, excluding the API key.
    ///
    /// `terms` repeats once per term. Only the parameter matching the geo
    /// restriction is present.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> =
            self.terms.iter().map(|term| ("terms", term.clone())).collect();
        params.push(("time.startDate", self.start_date.clone()));
        params.push(("time.endDate", self.end_date.clone()));
        params.push(("timelineResolution", self.resolution.clone()));
        params.push((self.geo.param_name(), self.geo.code().to_string()));
        params
    }
}

/// Flattened search volume record returned to callers.
///
/// `value` keeps the upstream number as written, so integers stay integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchVolumePoint {
    /// Term the point belongs to
    pub term: String,
    /// Date of the observation, as reported upstream
    pub date: String,
    /// Search volume
    pub value: Number,
}

/// Upstream `getTimelinesForHealth` response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineResponse {
    /// One line per requested term
    #[serde(default)]
    pub lines: Vec<TimelineLine>,
}

/// One term's timeline in the upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineLine {
    /// Term this line describes
    pub term: String,
    /// Observations in date order; absent means none
    #[serde(default)]
    pub points: Vec<TimelinePoint>,
}

/// Single observation in a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Observation date
    pub date: String,
    /// Search volume
    pub value: Number,
}

/// Which related-items ranking to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RelatedKind {
    /// Top related topics (`getTopTopics`)
    #[value(alias = "topics")]
    Topic,
    /// Top related queries (`getTopQueries`)
    #[value(alias = "queries")]
    Query,
}

impl RelatedKind {
    /// Discovery method name backing this kind.
    pub fn method_name(self) -> &'static str {
        match self {
            RelatedKind::Topic => "getTopTopics",
            RelatedKind::Query => "getTopQueries",
        }
    }
}

impl std::str::FromStr for RelatedKind {
    type Err = TrendsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "topic" | "topics" => Ok(Self::Topic),
            "query" | "queries" => Ok(Self::Query),
            _ => Err(TrendsError::InvalidArgument {
                field: "type",
                value: s.to_string(),
                reason: "expected topic or query".to_string(),
            }),
        }
    }
}

impl std::fmt::Display for RelatedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelatedKind::Topic => write!(f, "topic"),
            RelatedKind::Query => write!(f, "query"),
        }
    }
}

/// Request for `getTopTopics` / `getTopQueries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedQuery {
    /// Term to rank related items for
    pub term: String,
    /// Sent as `restrictions.geo`
    pub geography: String,
    /// Sent as `restrictions.startDate`
    pub start_date: String,
    /// Sent as `restrictions.endDate`
    pub end_date: String,
}

impl RelatedQuery {
    /// Query parameters for the remote call, excluding the API key.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("term", self.term.clone()),
            ("restrictions.geo", self.geography.clone()),
            ("restrictions.startDate", self.start_date.clone()),
            ("restrictions.endDate", self.end_date.clone()),
        ]
    }
}
