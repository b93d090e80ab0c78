use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// The eleven staffed positions, in their fixed column order.
///
/// Indices 0-4 are the daytime stations, 5-7 the night stations and 8-10 the
/// unconnected 24h duties. The serde names double as the wire labels used by
/// preschedule files and the output tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Workplace {
    #[serde(rename = "KRG 1")]
    Krg1,
    #[serde(rename = "KRG 2")]
    Krg2,
    #[serde(rename = "KRG 3")]
    Krg3,
    #[serde(rename = "KRG 4")]
    Krg4,
    #[serde(rename = "KRG 5")]
    Krg5,
    #[serde(rename = "KRG N - B")]
    NightB,
    #[serde(rename = "KRG N - MOP")]
    NightMop,
    #[serde(rename = "KRG N - ABD")]
    NightAbd,
    #[serde(rename = "ABDOMEN")]
    AbdDuty,
    #[serde(rename = "ABD prip.")]
    AbdOnCall,
    #[serde(rename = "TRAVMA")]
    TraumaOnCall,
}

impl Workplace {
    pub const ALL: [Workplace; 11] = [
        Workplace::Krg1,
        Workplace::Krg2,
        Workplace::Krg3,
        Workplace::Krg4,
        Workplace::Krg5,
        Workplace::NightB,
        Workplace::NightMop,
        Workplace::NightAbd,
        Workplace::AbdDuty,
        Workplace::AbdOnCall,
        Workplace::TraumaOnCall,
    ];

    pub const DAY: [Workplace; 5] = [
        Workplace::Krg1,
        Workplace::Krg2,
        Workplace::Krg3,
        Workplace::Krg4,
        Workplace::Krg5,
    ];

    pub const NIGHT: [Workplace; 3] = [
        Workplace::NightB,
        Workplace::NightMop,
        Workplace::NightAbd,
    ];

    pub const UNCONNECTED: [Workplace; 3] = [
        Workplace::AbdDuty,
        Workplace::AbdOnCall,
        Workplace::TraumaOnCall,
    ];

    /// The eight day+night stations covered by the eligibility sheet.
    pub const STANDARD: [Workplace; 8] = [
        Workplace::Krg1,
        Workplace::Krg2,
        Workplace::Krg3,
        Workplace::Krg4,
        Workplace::Krg5,
        Workplace::NightB,
        Workplace::NightMop,
        Workplace::NightAbd,
    ];

    // Stations participating in the weekend 24h pattern.
    pub const B_DAY: Workplace = Workplace::Krg1;
    pub const ABD_DAY: Workplace = Workplace::Krg2;
    pub const MOP_DAY: Workplace = Workplace::Krg3;
    pub const B_NIGHT: Workplace = Workplace::NightB;
    pub const MOP_NIGHT: Workplace = Workplace::NightMop;
    pub const ABD_NIGHT: Workplace = Workplace::NightAbd;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Workplace> {
        Workplace::ALL.get(index).copied()
    }

    pub fn is_day(self) -> bool {
        self.index() < 5
    }

    pub fn is_night(self) -> bool {
        (5..8).contains(&self.index())
    }

    pub fn is_unconnected(self) -> bool {
        self.index() >= 8
    }

    pub fn label(self) -> &'static str {
        match self {
            Workplace::Krg1 => "KRG 1",
            Workplace::Krg2 => "KRG 2",
            Workplace::Krg3 => "KRG 3",
            Workplace::Krg4 => "KRG 4",
            Workplace::Krg5 => "KRG 5",
            Workplace::NightB => "KRG N - B",
            Workplace::NightMop => "KRG N - MOP",
            Workplace::NightAbd => "KRG N - ABD",
            Workplace::AbdDuty => "ABDOMEN",
            Workplace::AbdOnCall => "ABD prip.",
            Workplace::TraumaOnCall => "TRAVMA",
        }
    }

    pub fn from_label(label: &str) -> Option<Workplace> {
        Workplace::ALL.iter().copied().find(|wp| wp.label() == label)
    }

    pub fn index_of(label: &str) -> Option<usize> {
        Workplace::from_label(label).map(Workplace::index)
    }
}

impl std::fmt::Display for Workplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Workplace {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Workplace::from_label(s)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown workplace: {s}")))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayKind {
    Workday,
    Weekend,
    Holiday,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Eligibility {
    Yes,
    Maybe,
    #[default]
    No,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inclusion {
    Full,
    Limited,
    Excluded,
}

/// A worker's stance on one slot (day or night) of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPreference {
    Prefer,
    Neutral,
    Forbidden,
}

impl SlotPreference {
    /// Whether an assignment to this slot is allowed at all.
    pub fn allows(self) -> bool {
        !matches!(self, SlotPreference::Forbidden)
    }

    pub fn is_preferred(self) -> bool {
        matches!(self, SlotPreference::Prefer)
    }
}

/// Day/night availability of a worker on a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub day: SlotPreference,
    pub night: SlotPreference,
}

impl Availability {
    pub const INDIFFERENT: Availability = Availability {
        day: SlotPreference::Neutral,
        night: SlotPreference::Neutral,
    };

    /// Parses one availability token from the fixed input vocabulary.
    ///
    /// Any token outside the vocabulary fails fast, echoing the verbatim
    /// offending value.
    pub fn from_token(token: &str) -> DomainResult<Availability> {
        use SlotPreference::{Forbidden, Neutral, Prefer};

        let (day, night) = match token.trim().to_lowercase().as_str() {
            "yes/want" => (Prefer, Prefer),
            "annual-leave" | "rostered-elsewhere" => (Forbidden, Forbidden),
            "indifferent" => (Neutral, Neutral),
            "day-only" => (Neutral, Forbidden),
            "night-only" => (Forbidden, Neutral),
            _ => {
                return Err(DomainError::InvalidInput(format!(
                    "unrecognized availability entry: {token}"
                )))
            }
        };
        Ok(Availability { day, night })
    }

    /// Free for a full 24h duty: neither slot is forbidden.
    pub fn allows_full_day(&self) -> bool {
        self.day.allows() && self.night.allows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workplace_partitions_are_disjoint_and_exhaustive() {
        for (index, wp) in Workplace::ALL.iter().enumerate() {
            assert_eq!(wp.index(), index);
            let classes = [wp.is_day(), wp.is_night(), wp.is_unconnected()]
                .iter()
                .filter(|c| **c)
                .count();
            assert_eq!(classes, 1, "{wp} must be in exactly one class");
        }
        assert_eq!(
            Workplace::DAY.len() + Workplace::NIGHT.len() + Workplace::UNCONNECTED.len(),
            Workplace::ALL.len()
        );
    }

    #[test]
    fn workplace_labels_round_trip() {
        for wp in Workplace::ALL {
            assert_eq!(Workplace::from_label(wp.label()), Some(wp));
            assert_eq!(Workplace::index_of(wp.label()), Some(wp.index()));
        }
        assert_eq!(Workplace::from_label("KRG 9"), None);
    }

    #[test]
    fn availability_vocabulary() {
        use SlotPreference::{Forbidden, Neutral, Prefer};

        let ok = [
            ("yes/want", Prefer, Prefer),
            ("annual-leave", Forbidden, Forbidden),
            ("rostered-elsewhere", Forbidden, Forbidden),
            ("indifferent", Neutral, Neutral),
            ("day-only", Neutral, Forbidden),
            ("night-only", Forbidden, Neutral),
        ];
        for (token, day, night) in ok {
            let availability = Availability::from_token(token).unwrap();
            assert_eq!(availability.day, day, "{token}");
            assert_eq!(availability.night, night, "{token}");
        }
    }

    #[test]
    fn availability_rejects_unknown_tokens_verbatim() {
        let err = Availability::from_token("maybe later").unwrap_err();
        assert!(err.to_string().contains("maybe later"));
    }
}
