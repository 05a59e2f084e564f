// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// A qualification a member can hold and a slot can require.
///
/// Capability names are normalized to lowercase so that "Cashier" and
/// "cashier" refer to the same capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    value: String,
}

impl Capability {
    /// Creates a new `Capability`.
    ///
    /// # Arguments
    ///
    /// * `value` - The capability name (trimmed and lowercased)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_lowercase(),
        }
    }

    /// Returns the capability name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Parses a comma separated capability list as stored in the database.
///
/// Empty segments are skipped.
#[must_use]
pub fn parse_capabilities(raw: &str) -> Vec<Capability> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(Capability::new)
        .collect()
}

/// Joins capabilities into their stored comma separated form.
#[must_use]
pub fn join_capabilities(capabilities: &[Capability]) -> String {
    capabilities
        .iter()
        .map(Capability::value)
        .collect::<Vec<&str>>()
        .join(",")
}

/// A cooperative member with their shift configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Database identifier, `None` until persisted.
    pub member_id: Option<i64>,
    /// Human readable name.
    pub display_name: String,
    /// Address used by the mail transport.
    pub email: String,
    /// The day the member account was created.
    pub date_joined: Date,
    /// Whether the member is currently frozen.
    pub is_frozen: bool,
    /// Capabilities the member holds.
    pub capabilities: Vec<Capability>,
    /// Whether the member opted into understaffed shift alerts.
    pub wants_understaffed_alerts: bool,
}

impl Member {
    /// Creates a new, unfrozen member without capabilities.
    ///
    /// # Arguments
    ///
    /// * `display_name` - The member's name
    /// * `email` - The member's email address
    /// * `date_joined` - The date the member joined
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the email is malformed.
    pub fn new(display_name: &str, email: &str, date_joined: Date) -> Result<Self, DomainError> {
        let display_name: String = display_name.trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::InvalidName(String::from(
                "Member name cannot be empty",
            )));
        }
        let email: String = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(DomainError::InvalidEmail(format!(
                "'{email}' is not an email address"
            )));
        }
        Ok(Self {
            member_id: None,
            display_name,
            email,
            date_joined,
            is_frozen: false,
            capabilities: Vec::new(),
            wants_understaffed_alerts: false,
        })
    }

    /// Returns the persisted identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the member has not been persisted yet.
    pub fn id(&self) -> Result<i64, DomainError> {
        self.member_id.ok_or(DomainError::MissingIdentifier { entity: "member" })
    }

    /// Returns true if the member holds every required capability.
    #[must_use]
    pub fn has_capabilities(&self, required: &[Capability]) -> bool {
        required
            .iter()
            .all(|capability| self.capabilities.contains(capability))
    }
}

/// Membership status of a share owner at a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareOwnerStatus {
    /// Holds shares and is expected to participate.
    Active,
    /// Holds shares without working or shopping.
    Investing,
    /// Membership is paused at the date.
    Paused,
    /// No share ownership at the date.
    Inactive,
}

impl ShareOwnerStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Investing => "investing",
            Self::Paused => "paused",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ShareOwnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cooperative share ownership of a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareOwner {
    /// The member holding the shares.
    pub member_id: i64,
    /// Investing members hold shares without working.
    pub is_investing: bool,
    /// First day of the share ownership.
    pub membership_start: Date,
    /// Last day of the share ownership, open if `None`.
    pub membership_end: Option<Date>,
}

impl ShareOwner {
    /// Creates a new working share owner.
    #[must_use]
    pub const fn new(member_id: i64, membership_start: Date) -> Self {
        Self {
            member_id,
            is_investing: false,
            membership_start,
            membership_end: None,
        }
    }

    /// Returns true if the shares are held at the given date.
    #[must_use]
    pub fn owns_shares_at(&self, at: Date) -> bool {
        self.membership_start <= at && self.membership_end.is_none_or(|end| at <= end)
    }

    /// Computes the membership status at a date.
    ///
    /// Share ownership is checked first, then the investing flag, then pauses.
    #[must_use]
    pub fn status_at(&self, at: Date, pauses: &[MembershipPause]) -> ShareOwnerStatus {
        if !self.owns_shares_at(at) {
            return ShareOwnerStatus::Inactive;
        }
        if self.is_investing {
            return ShareOwnerStatus::Investing;
        }
        if pauses.iter().any(|pause| pause.interval.contains(at)) {
            return ShareOwnerStatus::Paused;
        }
        ShareOwnerStatus::Active
    }

    /// Returns true if the share owner is active at the date.
    #[must_use]
    pub fn is_active_at(&self, at: Date, pauses: &[MembershipPause]) -> bool {
        self.status_at(at, pauses) == ShareOwnerStatus::Active
    }
}

/// A closed or open-ended range of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateInterval {
    start_date: Date,
    end_date: Option<Date>,
}

impl DateInterval {
    /// Creates a new interval.
    ///
    /// # Errors
    ///
    /// Returns an error if `end_date` is before `start_date`.
    pub fn new(start_date: Date, end_date: Option<Date>) -> Result<Self, DomainError> {
        if let Some(end) = end_date
            && end < start_date
        {
            return Err(DomainError::InvalidDateInterval {
                start_date,
                end_date: end,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Returns the first day of the interval.
    #[must_use]
    pub const fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the last day of the interval, `None` when open-ended.
    #[must_use]
    pub const fn end_date(&self) -> Option<Date> {
        self.end_date
    }

    /// Returns true if the date lies inside the interval (bounds inclusive).
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Number of days between start and end, `None` when open-ended.
    #[must_use]
    pub fn length_in_days(&self) -> Option<i64> {
        self.end_date
            .map(|end| (end - self.start_date).whole_days())
    }
}

/// A period during which a member owes no shifts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exemption {
    /// Database identifier, `None` until persisted.
    pub exemption_id: Option<i64>,
    /// The exempted member.
    pub member_id: i64,
    /// Covered days.
    pub interval: DateInterval,
    /// Free text reason shown in excused attendances.
    pub description: String,
}

impl Exemption {
    /// Creates a new exemption.
    #[must_use]
    pub const fn new(member_id: i64, interval: DateInterval, description: String) -> Self {
        Self {
            exemption_id: None,
            member_id,
            interval,
            description,
        }
    }

    /// Returns true if the exemption covers the date.
    #[must_use]
    pub fn is_active_at(&self, date: Date) -> bool {
        self.interval.contains(date)
    }

    /// Returns true if the exemption is long enough that the member loses
    /// their recurring slots.
    ///
    /// Open-ended exemptions always qualify.
    ///
    /// # Arguments
    ///
    /// * `threshold_days` - The minimum length in days
    #[must_use]
    pub fn requires_unregister_from_recurring_slots(&self, threshold_days: i64) -> bool {
        self.interval
            .length_in_days()
            .is_none_or(|days| days >= threshold_days)
    }
}

/// A period during which a membership is paused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPause {
    /// Database identifier, `None` until persisted.
    pub pause_id: Option<i64>,
    /// The paused member.
    pub member_id: i64,
    /// Paused days.
    pub interval: DateInterval,
    /// Free text reason.
    pub description: String,
}

impl MembershipPause {
    /// Creates a new membership pause.
    #[must_use]
    pub const fn new(member_id: i64, interval: DateInterval, description: String) -> Self {
        Self {
            pause_id: None,
            member_id,
            interval,
            description,
        }
    }
}

/// The rotating week groups of recurring shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeekGroup {
    A,
    B,
    C,
    D,
}

impl WeekGroup {
    /// All groups in rotation order.
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Converts this group to its label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    /// Returns the group at a rotation index, wrapping around.
    #[must_use]
    pub const fn from_index(index: i64) -> Self {
        match index.rem_euclid(4) {
            0 => Self::A,
            1 => Self::B,
            2 => Self::C,
            _ => Self::D,
        }
    }
}

impl FromStr for WeekGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(DomainError::InvalidWeekGroup(s.to_string())),
        }
    }
}

impl std::fmt::Display for WeekGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
