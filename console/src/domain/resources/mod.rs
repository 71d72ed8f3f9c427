//! Record types for every resource managed by the console.
//!
//! DTOs mirror the backend shapes. Unknown fields are ignored and optional
//! nested relations decode to `None` when absent or `null`.

mod booking;
mod class;
mod coupon;
mod instructor;
mod location;
mod organization;
mod package;
mod redemption;
mod session;
mod user;

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::domain::ResourceId;

pub use booking::{BookedSession, Booking};
pub use class::ClassRecord;
pub use coupon::Coupon;
pub use instructor::Instructor;
pub use location::{Location, Seat, SeatLayout};
pub use organization::Organization;
pub use package::Package;
pub use redemption::{
    PendingEntry, PendingOrder, PendingRedemption, PendingSnapshot, Redemption, reconcile_pending,
};
pub use session::ClassSession;
pub use user::User;

/// Monetary amount as sent by the API.
///
/// Decimal columns arrive as JSON strings (`"1200.00"`) from some endpoints
/// and as numbers from others. `Display` prints the shortest form that parses
/// back to the same value, so edit drafts resubmit exactly what was fetched;
/// currency formatting lives in [`DisplayOptions::money`].
///
/// [`DisplayOptions::money`]: crate::domain::display::DisplayOptions::money
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Amount(pub f64);

impl Amount {
    /// Value as a float.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Number(value) => Ok(Self(value)),
            AmountRepr::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Self)
                .map_err(|_| serde::de::Error::custom(format!("invalid amount `{text}`"))),
        }
    }
}

/// User reference embedded in bookings, redemptions, and instructors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserSummary {
    /// User id.
    #[serde(default)]
    pub id: Option<ResourceId>,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserSummary {
    /// Full name when known, falling back to the email.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone().unwrap_or_else(|| "-".to_owned())
        } else {
            name
        }
    }
}

/// Package reference embedded in redemptions and orders.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageSummary {
    /// Package id.
    #[serde(default)]
    pub id: Option<ResourceId>,
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Class reference embedded in sessions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassSummary {
    /// Class id.
    #[serde(default)]
    pub id: Option<ResourceId>,
    /// Class name.
    #[serde(default)]
    pub name: Option<String>,
}

fn user_cell(user: Option<&UserSummary>) -> String {
    user.map_or_else(|| "-".to_owned(), UserSummary::display_name)
}

fn name_cell(name: Option<&str>) -> String {
    name.unwrap_or("-").to_owned()
}
