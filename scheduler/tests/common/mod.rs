use chrono::NaiveDate;
use scheduler::domain::entities::{Day, PrescheduleBinding, PrescheduleEntry, Roster, Worker, WorkerSpec};
use scheduler::infrastructure::config::Settings;
use shared::{Availability, Eligibility, Inclusion, Workplace};

/// Settings with flat weights and a roomy time limit for tiny instances.
pub fn settings(start: &str, end: &str, rotating_scheduled_count: u32) -> Settings {
    let json = format!(
        r#"{{
            "start_date": "{start}",
            "end_date": "{end}",
            "rotating_scheduled_count": {rotating_scheduled_count},
            "workplace_weights": {{
                "night_1": 3, "night_2": 3, "night_3": 3,
                "night_4": 3, "night_5": 3, "night_6": 3,
                "workday": 2, "weekend": 3
            }},
            "weight_equal_workload": 100,
            "weight_consecutive_nights": 10,
            "weight_equally_distributed_workplaces": 5,
            "weight_preferred_day_assignment": 2,
            "weight_preferred_workplace_assignment": 2,
            "weight_weekend_travmaprip": 1,
            "print_logs": false,
            "time_limit": 30.0
        }}"#
    );
    serde_json::from_str(&json).unwrap()
}

/// A fully available specialist eligible for every standard workplace.
pub fn full_spec(name: &str, num_days: usize) -> WorkerSpec {
    WorkerSpec {
        name: name.to_string(),
        included: Inclusion::Full,
        specialty_wishes: None,
        specialty_master: None,
        status: "Specialist".to_string(),
        standard_eligibility: [Eligibility::Yes; 8],
        availability: vec![Availability::INDIFFERENT; num_days],
        quota_abd_duty: 0,
        quota_abd_oncall: 0,
        quota_trauma_oncall: 0,
        max_day_shifts: None,
        reduce_nights: 0,
        pinned_day_shifts: None,
        pinned_night_shifts: None,
    }
}

/// Eligibility restricted to the given standard workplaces.
pub fn eligible_only(spec: &mut WorkerSpec, workplaces: &[Workplace]) {
    spec.standard_eligibility = [Eligibility::No; 8];
    for wp in workplaces {
        let slot = Workplace::STANDARD
            .iter()
            .position(|candidate| candidate == wp)
            .expect("standard workplace");
        spec.standard_eligibility[slot] = Eligibility::Yes;
    }
}

pub fn date(iso: &str) -> NaiveDate {
    iso.parse().unwrap()
}

/// Off-roster preschedule entries blocking every slot not listed as open.
///
/// Small scenarios use this to switch off the workplaces they are not about;
/// a blocked slot must stay empty and needs no coverage.
pub fn block_all_except(days: &[Day], open: &[(usize, Workplace)]) -> Vec<PrescheduleEntry> {
    let mut entries = Vec::new();
    for (day_index, day) in days.iter().enumerate() {
        for wp in Workplace::ALL {
            if open.contains(&(day_index, wp)) {
                continue;
            }
            entries.push(PrescheduleEntry {
                name: "BLOCKED".to_string(),
                date: day.date,
                workplace: wp,
            });
        }
    }
    entries
}

/// Post-solve invariants every solved instance must satisfy.
pub fn assert_invariants(
    days: &[Day],
    workers: &[Worker],
    binding: &PrescheduleBinding,
    roster: &Roster,
) {
    // Coverage: open slots are filled, closed slots stay empty.
    for (day_index, day) in days.iter().enumerate() {
        for wp in Workplace::ALL {
            let occupant = roster.worker_at(day_index, wp);
            let closed = binding.is_blocked(day_index, wp.index())
                || (wp == Workplace::AbdOnCall && !day.is_workday());
            if closed {
                assert!(
                    occupant.is_none(),
                    "closed slot {wp} on {day} must stay empty"
                );
            } else {
                assert!(occupant.is_some(), "open slot {wp} on {day} must be filled");
            }
        }
    }

    for (worker_index, worker) in workers.iter().enumerate() {
        for (day_index, day) in days.iter().enumerate() {
            let assigned = roster.workplaces_of(day_index, worker_index);
            let day_shifts = assigned.iter().filter(|wp| wp.is_day()).count();
            let night_shifts = assigned.iter().filter(|wp| wp.is_night()).count();
            let unconnected = assigned.iter().filter(|wp| wp.is_unconnected()).count();

            // At most one shift per class, and 24h duties stand alone.
            assert!(day_shifts <= 1, "{} doubles day shifts on {day}", worker.name);
            assert!(night_shifts <= 1, "{} doubles nights on {day}", worker.name);
            if unconnected > 0 {
                assert_eq!(
                    assigned.len(),
                    1,
                    "{} mixes a 24h duty with another shift on {day}",
                    worker.name
                );
            }

            // Availability is honored.
            let availability = worker.availability[day_index];
            if !availability.day.allows() {
                assert_eq!(day_shifts, 0, "{} works a forbidden day on {day}", worker.name);
            }
            if !availability.night.allows() {
                assert_eq!(night_shifts, 0, "{} works a forbidden night on {day}", worker.name);
            }
            if !availability.allows_full_day() {
                assert_eq!(unconnected, 0, "{} works a forbidden duty on {day}", worker.name);
            }

            // Never a night followed by a day shift.
            if day_index + 1 < days.len() && night_shifts > 0 {
                let next = roster.workplaces_of(day_index + 1, worker_index);
                assert!(
                    next.iter().all(|wp| !wp.is_day()),
                    "{} goes from a night into a day shift after {day}",
                    worker.name
                );
            }
        }

        // No three consecutive working days.
        let working: Vec<bool> = (0..days.len())
            .map(|day_index| !roster.workplaces_of(day_index, worker_index).is_empty())
            .collect();
        assert!(
            working.windows(3).all(|run| run.iter().filter(|w| **w).count() <= 2),
            "{} works three days in a row",
            worker.name
        );

        // Unconnected quotas hold exactly.
        let counts = roster.counts_by_workplace(worker_index);
        assert_eq!(counts[Workplace::AbdDuty.index()] as u32, worker.quota_abd_duty);
        assert_eq!(counts[Workplace::AbdOnCall.index()] as u32, worker.quota_abd_oncall);
        assert_eq!(
            counts[Workplace::TraumaOnCall.index()] as u32,
            worker.quota_trauma_oncall
        );

        // Night totals stay inside the status window.
        if worker.works_night_shifts() {
            let nights: usize = Workplace::NIGHT
                .iter()
                .map(|wp| counts[wp.index()])
                .sum();
            let (min, max) = worker.night_shift_window();
            assert!(
                (min..=max).contains(&(nights as u32)),
                "{} has {nights} nights outside [{min}, {max}]",
                worker.name
            );
        }
    }

    // Preschedule pins are reproduced verbatim.
    for (worker_index, day_index, workplace_index) in &binding.pins {
        let wp = Workplace::from_index(*workplace_index).unwrap();
        assert_eq!(
            roster.worker_at(*day_index, wp),
            Some(*worker_index),
            "pinned slot {wp} lost its worker"
        );
    }
}
