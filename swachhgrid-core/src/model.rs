//! Domain data structures for bins, alerts, and the projections computed over them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a waste bin, e.g. `bin-007`.
pub struct BinId(pub String);

impl BinId {
    /// Build the canonical identifier for the bin at the given 1-based position.
    #[must_use]
    pub fn from_sequence(sequence: usize) -> Self {
        Self(format!("bin-{sequence:03}"))
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for BinId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for an alert, e.g. `alert-3`.
pub struct AlertId(pub String);

impl AlertId {
    /// Build the canonical identifier for the alert at the given 1-based position.
    #[must_use]
    pub fn from_sequence(sequence: usize) -> Self {
        Self(format!("alert-{sequence}"))
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a registered user, e.g. `user-2`.
pub struct UserId(pub String);

impl UserId {
    /// Build the canonical identifier for the user at the given 1-based position.
    #[must_use]
    pub fn from_sequence(sequence: usize) -> Self {
        Self(format!("user-{sequence}"))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Latitude/longitude pair in signed degrees.
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Construct a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Fill tier derived from a bin's fill level.
pub enum BinStatus {
    /// Below the warning threshold.
    Normal,
    /// At or above 75%.
    Warning,
    /// At or above 90%.
    Critical,
}

impl fmt::Display for BinStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BinStatus::Normal => "normal",
            BinStatus::Warning => "warning",
            BinStatus::Critical => "critical",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Kind of site a bin is placed at.
pub enum LocationType {
    /// Street-side bin.
    Street,
    /// Bin inside a park.
    Park,
    /// Shopping or office area.
    Commercial,
    /// Residential block.
    Residential,
}

impl LocationType {
    /// Every location type, in declaration order.
    pub const ALL: [LocationType; 4] = [
        LocationType::Street,
        LocationType::Park,
        LocationType::Commercial,
        LocationType::Residential,
    ];
}

impl fmt::Display for LocationType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            LocationType::Street => "street",
            LocationType::Park => "park",
            LocationType::Commercial => "commercial",
            LocationType::Residential => "residential",
        };
        formatter.write_str(slug)
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown location type `{raw}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A monitored waste bin.
pub struct Bin {
    /// Unique, stable identifier.
    pub id: BinId,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Volume the bin holds, unit-agnostic.
    pub capacity: u32,
    /// Occupied share of the capacity, 0 to 100.
    pub fill_level: f64,
    /// Tier derived from `fill_level`.
    pub status: BinStatus,
    /// Kind of site the bin stands at.
    pub location_type: LocationType,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Last time the bin was written.
    pub last_updated: DateTime<Utc>,
    /// Estimate of when the bin will be full.
    pub predicted_full_time: Option<DateTime<Utc>>,
}

impl Bin {
    /// Position of the bin.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Urgency attached to an alert.
pub enum Severity {
    /// Informational.
    Low,
    /// Declared for clients; no alert is derived with this severity.
    Medium,
    /// Bin should be collected soon.
    High,
    /// Bin needs immediate collection.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Notice raised for a bin or for the system as a whole.
pub struct Alert {
    /// Unique identifier.
    pub id: AlertId,
    /// Human-readable text.
    pub message: String,
    /// Urgency.
    pub severity: Severity,
    /// Bin that triggered the alert; `None` for system alerts.
    pub bin_id: Option<BinId>,
    /// When the alert was raised.
    pub created_at: DateTime<Utc>,
    /// Whether an operator has seen the alert. Only ever goes from `false` to `true`.
    #[serde(default)]
    pub acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Payload for registering a new bin.
pub struct NewBin {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Volume the bin holds; must be positive.
    pub capacity: u32,
    /// Kind of site.
    pub location_type: LocationType,
    /// Optional free-text note.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Partial update for a bin. Fields left out are kept; unknown fields are ignored.
pub struct BinUpdate {
    /// New fill level, 0 to 100.
    #[serde(default)]
    pub fill_level: Option<f64>,
    /// Expected status; must agree with the resulting fill level.
    #[serde(default)]
    pub status: Option<BinStatus>,
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
}

impl BinUpdate {
    /// Update that only sets the fill level.
    #[must_use]
    pub fn fill_level(fill_level: f64) -> Self {
        Self {
            fill_level: Some(fill_level),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
/// Summary figures over the whole bin collection.
pub struct DashboardStats {
    /// Number of bins.
    pub total_bins: usize,
    /// Bins in the critical tier.
    pub critical_bins: usize,
    /// Bins in the warning tier.
    pub warning_bins: usize,
    /// Bins in the normal tier.
    pub normal_bins: usize,
    /// Mean fill level, rounded to one decimal.
    pub average_fill_level: f64,
    /// Bins at or above the collection threshold.
    pub bins_needing_collection: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Collection tour over the bins that need pickup.
pub struct RouteOptimization {
    /// Bins in visit order.
    pub bin_ids: Vec<BinId>,
    /// Tour length in kilometers, rounded to two decimals.
    pub total_distance: f64,
    /// Estimated duration in minutes, rounded to one decimal.
    pub estimated_time: f64,
    /// `[latitude, longitude]` of each stop, in visit order.
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteOptimization {
    /// Number of stops on the tour.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.bin_ids.len()
    }

    /// Whether there is nothing to collect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bin_ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// What a user is allowed to do.
pub enum Role {
    /// Operator with full access.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::User => "user",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Public view of a registered account. Never carries the password.
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, stored lowercase.
    pub email: String,
    /// Access level.
    pub role: Role,
    /// Optional picture URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Payload for registering an account.
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email; matched case-insensitively.
    pub email: String,
    /// Plain-text password. Only its salted digest is kept.
    pub password: String,
    /// Access level, `user` when left out.
    #[serde(default)]
    pub role: Role,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of seeding the store with demo data.
pub struct DemoSummary {
    /// Bins written.
    pub bins_count: usize,
    /// Alerts written.
    pub alerts_count: usize,
    /// Demo accounts registered; accounts that already exist are skipped.
    pub users_count: usize,
}
