use shared::{Availability, DomainError, DomainResult, Eligibility, Inclusion, Workplace};

/// Default upper bound on night shifts per month, before per-worker reductions.
pub const NIGHT_SHIFT_CEILING: u32 = 5;

/// Specialty sentinel for workers on rotation; they are pinned to a fixed
/// number of assignments and excluded from workload balancing.
pub const ROTATING_SPECIALTY: &str = "rotating";

/// What a status string implies for the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusProfile {
    pub year_of_specialization: u32,
    pub min_night_shifts: u32,
}

/// Maps a status string to its year of specialization and minimum number of
/// night shifts.
pub fn status_profile(status: &str) -> DomainResult<StatusProfile> {
    let (year, min_nights) = match status.trim() {
        "1st year" => (1, 0),
        "2nd year" => (2, 5),
        "3rd year" => (3, 4),
        "4th year" => (4, 3),
        "5th year" => (5, 2),
        "6th year" => (6, 1),
        "<6 months to exam" => (6, 0),
        "Specialist" => (6, 0),
        other => {
            return Err(DomainError::InvalidInput(format!(
                "unrecognized worker status: {other}"
            )))
        }
    };
    Ok(StatusProfile {
        year_of_specialization: year,
        min_night_shifts: min_nights,
    })
}

/// Raw per-worker inputs, as joined by the external readers.
#[derive(Debug, Clone)]
pub struct WorkerSpec {
    pub name: String,
    pub included: Inclusion,
    pub specialty_wishes: Option<String>,
    pub specialty_master: Option<String>,
    pub status: String,
    /// Eligibility over the eight standard workplaces, in registry order.
    pub standard_eligibility: [Eligibility; 8],
    /// One entry per horizon day.
    pub availability: Vec<Availability>,
    pub quota_abd_duty: u32,
    pub quota_abd_oncall: u32,
    pub quota_trauma_oncall: u32,
    pub max_day_shifts: Option<u32>,
    pub reduce_nights: u32,
    pub pinned_day_shifts: Option<u32>,
    pub pinned_night_shifts: Option<u32>,
}

impl WorkerSpec {
    /// Resolves the spec into the immutable record used by the model builder.
    ///
    /// Canonicalizes the name, derives the status profile and switches the
    /// unconnected workplaces on only when the matching quota is positive.
    pub fn into_worker(self) -> DomainResult<Worker> {
        let profile = status_profile(&self.status)?;

        let mut eligibility = [Eligibility::No; 11];
        for (slot, wp) in Workplace::STANDARD.iter().enumerate() {
            eligibility[wp.index()] = self.standard_eligibility[slot];
        }
        if self.quota_abd_duty > 0 {
            eligibility[Workplace::AbdDuty.index()] = Eligibility::Yes;
        }
        if self.quota_abd_oncall > 0 {
            eligibility[Workplace::AbdOnCall.index()] = Eligibility::Yes;
        }
        if self.quota_trauma_oncall > 0 {
            eligibility[Workplace::TraumaOnCall.index()] = Eligibility::Yes;
        }

        Ok(Worker {
            name: self.name.trim().to_uppercase(),
            included: self.included,
            specialty_wishes: self.specialty_wishes,
            specialty_master: self.specialty_master,
            year_of_specialization: profile.year_of_specialization,
            min_night_shifts: profile.min_night_shifts,
            eligibility,
            availability: self.availability,
            quota_abd_duty: self.quota_abd_duty,
            quota_abd_oncall: self.quota_abd_oncall,
            quota_trauma_oncall: self.quota_trauma_oncall,
            max_day_shifts: self.max_day_shifts,
            reduce_nights: self.reduce_nights,
            pinned_day_shifts: self.pinned_day_shifts,
            pinned_night_shifts: self.pinned_night_shifts,
        })
    }
}

/// Immutable per-worker record consumed by the model builder.
#[derive(Debug, Clone)]
pub struct Worker {
    pub name: String,
    pub included: Inclusion,
    pub specialty_wishes: Option<String>,
    pub specialty_master: Option<String>,
    pub year_of_specialization: u32,
    pub min_night_shifts: u32,
    eligibility: [Eligibility; 11],
    pub availability: Vec<Availability>,
    pub quota_abd_duty: u32,
    pub quota_abd_oncall: u32,
    pub quota_trauma_oncall: u32,
    pub max_day_shifts: Option<u32>,
    pub reduce_nights: u32,
    pub pinned_day_shifts: Option<u32>,
    pub pinned_night_shifts: Option<u32>,
}

impl Worker {
    pub fn eligibility(&self, workplace: Workplace) -> Eligibility {
        self.eligibility[workplace.index()]
    }

    /// True iff any night workplace is marked YES or MAYBE.
    pub fn works_night_shifts(&self) -> bool {
        Workplace::NIGHT
            .iter()
            .any(|wp| self.eligibility(*wp) != Eligibility::No)
    }

    pub fn is_rotating(&self) -> bool {
        [&self.specialty_wishes, &self.specialty_master]
            .into_iter()
            .flatten()
            .any(|specialty| specialty.eq_ignore_ascii_case(ROTATING_SPECIALTY))
    }

    /// Inclusive (min, max) window for the monthly night-shift count.
    pub fn night_shift_window(&self) -> (u32, u32) {
        let min = self.min_night_shifts;
        let max = min.max(NIGHT_SHIFT_CEILING.saturating_sub(self.reduce_nights));
        (min, max)
    }

    /// Number of horizon days whose day slot is not forbidden.
    pub fn day_eligible_days(&self) -> usize {
        self.availability.iter().filter(|a| a.day.allows()).count()
    }

    pub fn quota_for(&self, workplace: Workplace) -> u32 {
        match workplace {
            Workplace::AbdDuty => self.quota_abd_duty,
            Workplace::AbdOnCall => self.quota_abd_oncall,
            Workplace::TraumaOnCall => self.quota_trauma_oncall,
            _ => 0,
        }
    }
}
