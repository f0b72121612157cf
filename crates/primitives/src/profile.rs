//! Profile snapshot and validation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use crate::PeerId;

/// Minimum accepted age on a peer profile.
pub const MIN_AGE: u8 = 18;
/// Maximum accepted age on a peer profile.
pub const MAX_AGE: u8 = 99;
/// Maximum number of interest tags on a profile.
pub const MAX_INTERESTS: usize = 10;
/// Reputation score assigned to profiles that have no history yet.
pub const DEFAULT_REPUTATION: u16 = 1000;
/// Upper bound of the reputation scale.
pub const MAX_REPUTATION: u16 = 2000;

/// When the user is available to meet.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Available right now.
    Now,
    /// Available later tonight.
    Tonight,
    /// Available on the weekend.
    Weekend,
    /// No fixed window.
    Flexible,
}

impl Availability {
    /// Returns true for the wildcard availability.
    pub fn is_flexible(&self) -> bool {
        matches!(self, Availability::Flexible)
    }
}

/// Validation failure on an incoming peer profile.
///
/// These are diagnostic, not fatal: a sighting carrying an invalid profile is
/// dropped at the boundary and the scan session continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// Age outside the accepted [`MIN_AGE`]..=[`MAX_AGE`] range.
    #[error("age {0} outside accepted range {MIN_AGE}-{MAX_AGE}")]
    AgeOutOfRange(u8),
    /// Profile carries no interest tags.
    #[error("profile has no interest tags")]
    NoInterests,
    /// More interest tags than [`MAX_INTERESTS`].
    #[error("profile has {0} interest tags, maximum is {MAX_INTERESTS}")]
    TooManyInterests(usize),
    /// Reputation above the [`MAX_REPUTATION`] scale.
    #[error("reputation {0} exceeds maximum {MAX_REPUTATION}")]
    ReputationOutOfRange(u16),
}

/// Immutable profile snapshot, local or peer-announced.
///
/// Interest tags are an order-irrelevant set; `BTreeSet` keeps serialization
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique opaque identifier.
    pub id: PeerId,
    /// Name shown to other users.
    pub display_name: String,
    /// Age in years.
    pub age: u8,
    /// Interest tags (1..=10 entries on a valid profile).
    pub interests: BTreeSet<String>,
    /// When the user is available to meet.
    pub availability: Availability,
    /// Reputation score, 0..=2000.
    pub reputation: u16,
}

impl Profile {
    /// Create a profile with the default reputation.
    pub fn new(
        id: impl Into<PeerId>,
        display_name: impl Into<String>,
        age: u8,
        interests: impl IntoIterator<Item = impl Into<String>>,
        availability: Availability,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            age,
            interests: interests.into_iter().map(Into::into).collect(),
            availability,
            reputation: DEFAULT_REPUTATION,
        }
    }

    /// Return a copy with the given reputation.
    pub fn with_reputation(mut self, reputation: u16) -> Self {
        self.reputation = reputation;
        self
    }

    /// Check the field bounds an announced profile must satisfy.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ProfileError::AgeOutOfRange(self.age));
        }
        if self.interests.is_empty() {
            return Err(ProfileError::NoInterests);
        }
        if self.interests.len() > MAX_INTERESTS {
            return Err(ProfileError::TooManyInterests(self.interests.len()));
        }
        if self.reputation > MAX_REPUTATION {
            return Err(ProfileError::ReputationOutOfRange(self.reputation));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_profile(age: u8) -> Profile {
        Profile::new("peer-1", "Sam", age, ["music"], Availability::Flexible)
    }

    #[test]
    fn test_valid_profile() {
        assert_eq!(test_profile(25).validate(), Ok(()));
        assert_eq!(test_profile(MIN_AGE).validate(), Ok(()));
        assert_eq!(test_profile(MAX_AGE).validate(), Ok(()));
    }

    #[test]
    fn test_age_bounds() {
        assert_eq!(
            test_profile(17).validate(),
            Err(ProfileError::AgeOutOfRange(17))
        );
        assert_eq!(
            test_profile(100).validate(),
            Err(ProfileError::AgeOutOfRange(100))
        );
    }

    #[test]
    fn test_interest_bounds() {
        let mut profile = test_profile(30);
        profile.interests.clear();
        assert_eq!(profile.validate(), Err(ProfileError::NoInterests));

        let tags: Vec<String> = (0..11).map(|n| format!("tag-{n}")).collect();
        let profile = Profile::new("peer-2", "Alex", 30, tags, Availability::Now);
        assert_eq!(profile.validate(), Err(ProfileError::TooManyInterests(11)));
    }

    #[test]
    fn test_reputation_bounds() {
        let profile = test_profile(30).with_reputation(2001);
        assert_eq!(
            profile.validate(),
            Err(ProfileError::ReputationOutOfRange(2001))
        );
        assert_eq!(
            test_profile(30).with_reputation(MAX_REPUTATION).validate(),
            Ok(())
        );
    }

    #[test]
    fn test_default_reputation() {
        assert_eq!(test_profile(30).reputation, DEFAULT_REPUTATION);
    }

    #[test]
    fn test_interests_are_a_set() {
        let profile = Profile::new(
            "peer-1",
            "Sam",
            25,
            ["music", "music", "travel"],
            Availability::Now,
        );
        assert_eq!(profile.interests.len(), 2);
    }
}
