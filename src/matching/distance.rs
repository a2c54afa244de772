//! Coarse geographic proximity between two free-text locations.

use serde::{Serialize, Serializer};

/// Ordinal proximity bucket. Lower is closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationTier {
    SameCity,
    MultiCenter,
    SameCountry,
    SameRegion,
    Distant,
}

impl LocationTier {
    /// Numeric tier as the dashboards report it: 0, 0.5, 1, 2 or 3.
    pub const fn value(self) -> f32 {
        match self {
            Self::SameCity => 0.0,
            Self::MultiCenter => 0.5,
            Self::SameCountry => 1.0,
            Self::SameRegion => 2.0,
            Self::Distant => 3.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SameCity => "Local",
            Self::MultiCenter => "Multi-center",
            Self::SameCountry => "Same Country",
            Self::SameRegion => "Same Region",
            Self::Distant => "Distant",
        }
    }
}

impl Serialize for LocationTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f32(self.value())
    }
}

/// Continent-level bucket used for the "same region" tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    NorthAmerica,
    Europe,
    Other,
}

/// Words that place a location in a region. Anything unlisted is `Other`.
pub const REGION_KEYWORDS: &[(Region, &[&str])] = &[
    (
        Region::NorthAmerica,
        &["usa", "canada", "united states", "america"],
    ),
    (
        Region::Europe,
        &["netherlands", "germany", "france", "uk", "england"],
    ),
];

const MULTI_CENTER_MARKERS: &[&str] = &["multi-center", "multicenter"];

/// Region of an already-lowercased location string.
pub fn region_of(location: &str) -> Region {
    REGION_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| location.contains(w)))
        .map_or(Region::Other, |(region, _)| *region)
}

/// Buckets a candidate location relative to the user's location.
///
/// Checks run in order, first hit wins:
/// 1. multi-center marker in the candidate (only when `multi_center_aware`)
/// 2. candidate contains the user's city (text before the first comma)
/// 3. last comma-separated parts are equal (same country)
/// 4. same [`Region`] bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceClassifier {
    multi_center_aware: bool,
}

impl DistanceClassifier {
    /// For trials, which may run at many sites at once.
    pub const TRIAL: Self = Self {
        multi_center_aware: true,
    };
    /// For single-site candidates such as experts.
    pub const SITE: Self = Self {
        multi_center_aware: false,
    };

    pub fn classify(&self, candidate_location: &str, user_location: &str) -> LocationTier {
        let candidate = candidate_location.to_lowercase();
        let user = user_location.to_lowercase();

        if self.multi_center_aware && MULTI_CENTER_MARKERS.iter().any(|m| candidate.contains(m)) {
            return LocationTier::MultiCenter;
        }

        let user_city = user.split(',').next().unwrap_or_default().trim();
        if !user_city.is_empty() && candidate.contains(user_city) {
            return LocationTier::SameCity;
        }

        let user_parts: Vec<&str> = user.split(',').map(str::trim).collect();
        let candidate_parts: Vec<&str> = candidate.split(',').map(str::trim).collect();
        if user_parts.len() > 1
            && candidate_parts.len() > 1
            && user_parts.last() == candidate_parts.last()
        {
            return LocationTier::SameCountry;
        }

        if region_of(&user) == region_of(&candidate) {
            LocationTier::SameRegion
        } else {
            LocationTier::Distant
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Toronto, Canada", "Toronto, Canada", LocationTier::SameCity)]
    #[case("Toronto General Hospital, Toronto", "toronto", LocationTier::SameCity)]
    #[case("Vancouver, Canada", "Toronto, Canada", LocationTier::SameCountry)]
    #[case("Boston, USA", "Toronto, Canada", LocationTier::SameRegion)]
    #[case("Berlin, Germany", "Amsterdam, Netherlands", LocationTier::SameRegion)]
    #[case("Berlin, Germany", "Toronto, Canada", LocationTier::Distant)]
    #[case("Mumbai, India", "Tokyo, Japan", LocationTier::SameRegion)]
    fn test_trial_tiers(#[case] candidate: &str, #[case] user: &str, #[case] expected: LocationTier) {
        check!(DistanceClassifier::TRIAL.classify(candidate, user) == expected);
    }

    #[rstest]
    #[case("Toronto, Canada")]
    #[case("Paris, France")]
    #[case("")]
    fn test_multi_center_regardless_of_user(#[case] user: &str) {
        check!(DistanceClassifier::TRIAL.classify("Multi-center", user) == LocationTier::MultiCenter);
        check!(
            DistanceClassifier::TRIAL.classify("Multicenter (12 sites)", user)
                == LocationTier::MultiCenter
        );
    }

    #[test]
    fn test_site_classifier_ignores_multi_center() {
        let tier = DistanceClassifier::SITE.classify("Multi-center", "Toronto, Canada");
        check!(tier != LocationTier::MultiCenter);
    }

    #[test]
    fn test_empty_user_location_is_not_local() {
        let tier = DistanceClassifier::SITE.classify("Toronto, Canada", "");
        check!(tier != LocationTier::SameCity);
    }

    #[test]
    fn test_tier_ordering_and_values() {
        check!(LocationTier::SameCity < LocationTier::MultiCenter);
        check!(LocationTier::MultiCenter < LocationTier::SameCountry);
        check!(LocationTier::SameRegion < LocationTier::Distant);
        check!(LocationTier::MultiCenter.value() == 0.5);
        check!(LocationTier::Distant.value() == 3.0);
    }

    #[rstest]
    #[case("los angeles, california, usa", Region::NorthAmerica)]
    #[case("london, uk", Region::Europe)]
    #[case("sydney, australia", Region::Other)]
    fn test_region_of(#[case] location: &str, #[case] expected: Region) {
        check!(region_of(location) == expected);
    }
}
