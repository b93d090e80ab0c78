use shared::{DomainError, DomainResult, Inclusion, Workplace};

use crate::domain::entities::{Day, PrescheduleBinding, Worker};
use crate::infrastructure::config::Settings;

/// Non-fatal findings; fatal conditions abort with `DomainError::Precheck`.
#[derive(Debug, Default)]
pub struct PrecheckReport {
    pub warnings: Vec<String>,
}

impl PrecheckReport {
    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// Validates the inputs before any model is built.
///
/// Catches the conditions that would otherwise surface as an opaque
/// infeasibility out of the solver: uncoverable 24h duties, overloaded
/// rotating workers and incomplete limited-worker pins. Quota and
/// night-capacity mismatches are only warned about, because the solver is
/// the final arbiter of feasibility there.
pub fn run(
    workers: &[Worker],
    days: &[Day],
    binding: &PrescheduleBinding,
    settings: &Settings,
) -> DomainResult<PrecheckReport> {
    let mut report = PrecheckReport::default();

    for worker in workers {
        if worker.availability.len() != days.len() {
            return Err(DomainError::InvalidInput(format!(
                "worker {} carries {} availability entries for a {}-day horizon",
                worker.name,
                worker.availability.len(),
                days.len()
            )));
        }
    }

    check_unconnected_coverage(workers, days, binding)?;
    check_quota_totals(workers, days, &mut report);
    check_rotating_capacity(workers, settings)?;
    check_limited_pins(workers)?;
    check_night_capacity(workers, days, &mut report);

    Ok(report)
}

/// Every unconnected duty needs, on every day it runs, either a preassigned
/// slot (an on-roster pin or an off-roster block) or at least one
/// quota-holder who is free the whole day.
fn check_unconnected_coverage(
    workers: &[Worker],
    days: &[Day],
    binding: &PrescheduleBinding,
) -> DomainResult<()> {
    for (day_index, day) in days.iter().enumerate() {
        for wp in Workplace::UNCONNECTED {
            if wp == Workplace::AbdOnCall && !day.is_workday() {
                continue;
            }
            if binding.is_blocked(day_index, wp.index())
                || binding.is_pinned(day_index, wp.index())
            {
                continue;
            }
            let covered = workers.iter().any(|worker| {
                worker.quota_for(wp) > 0 && worker.availability[day_index].allows_full_day()
            });
            if !covered {
                return Err(DomainError::Precheck(format!(
                    "nobody is available for {wp} on {day}; add a placeholder entry for this \
                     day to the preschedule and reduce the matching quota by one"
                )));
            }
        }
    }
    Ok(())
}

fn check_quota_totals(workers: &[Worker], days: &[Day], report: &mut PrecheckReport) {
    let num_days = days.len();
    let num_workdays = days.iter().filter(|day| day.is_workday()).count();

    let totals = [
        (Workplace::AbdDuty, num_days),
        (Workplace::AbdOnCall, num_workdays),
        (Workplace::TraumaOnCall, num_days),
    ];
    for (wp, expected) in totals {
        let total: u32 = workers.iter().map(|worker| worker.quota_for(wp)).sum();
        if total as usize != expected {
            report.warn(format!(
                "the {wp} quotas sum to {total}, but the horizon has {expected} slots"
            ));
        }
    }
}

fn check_rotating_capacity(workers: &[Worker], settings: &Settings) -> DomainResult<()> {
    for worker in workers.iter().filter(|worker| worker.is_rotating()) {
        let eligible = worker.day_eligible_days();
        if eligible < settings.rotating_scheduled_count as usize {
            return Err(DomainError::Precheck(format!(
                "{} is rotating and must be scheduled {}x, but can only work {eligible} days",
                worker.name, settings.rotating_scheduled_count
            )));
        }
    }
    Ok(())
}

fn check_limited_pins(workers: &[Worker]) -> DomainResult<()> {
    for worker in workers.iter().filter(|w| w.included == Inclusion::Limited) {
        if worker.pinned_day_shifts.is_none() {
            return Err(DomainError::Precheck(format!(
                "{} is limited but has no pinned day-shift count",
                worker.name
            )));
        }
        if worker.pinned_night_shifts.is_none() {
            return Err(DomainError::Precheck(format!(
                "{} is limited but has no pinned night-shift count",
                worker.name
            )));
        }
    }
    Ok(())
}

/// Aggregate sanity of the night-shift windows against night capacity.
fn check_night_capacity(workers: &[Worker], days: &[Day], report: &mut PrecheckReport) {
    let mut total_min = 0u32;
    let mut total_max = 0u32;
    for worker in workers.iter().filter(|worker| worker.works_night_shifts()) {
        let (min, max) = worker.night_shift_window();
        total_min += min;
        total_max += max;
    }

    let capacity = (Workplace::NIGHT.len() * days.len()) as u32;
    if total_max < capacity {
        report.warn(format!(
            "the combined night-shift ceilings allow {total_max} shifts, \
             fewer than the {capacity} night slots of the horizon"
        ));
    }
    if total_min > capacity {
        report.warn(format!(
            "the combined night-shift minimums require {total_min} shifts, \
             more than the {capacity} night slots of the horizon"
        ));
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use shared::{Availability, Eligibility, SlotPreference};

    use super::*;
    use crate::domain::entities::{day_span, WorkerSpec};

    fn settings() -> Settings {
        let json = r#"{
            "start_date": "2025-03-03",
            "end_date": "2025-03-07",
            "rotating_scheduled_count": 3,
            "workplace_weights": {
                "night_1": 6, "night_2": 5, "night_3": 4,
                "night_4": 3, "night_5": 2, "night_6": 1,
                "workday": 2, "weekend": 3
            },
            "weight_equal_workload": 100,
            "weight_consecutive_nights": 10,
            "weight_equally_distributed_workplaces": 5,
            "weight_preferred_day_assignment": 2,
            "weight_preferred_workplace_assignment": 2,
            "weight_weekend_travmaprip": 1,
            "print_logs": false,
            "time_limit": 10.0
        }"#;
        serde_json::from_str(json).unwrap()
    }

    fn spec(name: &str, num_days: usize) -> WorkerSpec {
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

    fn horizon() -> Vec<Day> {
        // Monday to Friday, all workdays.
        day_span(
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn uncovered_duty_day_is_fatal() {
        let days = horizon();
        // Quota-holder for every duty except the abdominal on-call.
        let mut holder = spec("A", days.len());
        holder.quota_abd_duty = 5;
        holder.quota_trauma_oncall = 5;
        let workers = vec![holder.into_worker().unwrap()];

        let err = run(&workers, &days, &PrescheduleBinding::default(), &settings())
            .unwrap_err();
        assert!(err.to_string().contains("ABD prip."));
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn blocked_slots_count_as_coverage() {
        let days = horizon();
        let mut holder = spec("A", days.len());
        holder.quota_abd_duty = 5;
        holder.quota_trauma_oncall = 5;
        let workers = vec![holder.into_worker().unwrap()];

        // An off-roster person holds the abdominal on-call all week.
        let mut binding = PrescheduleBinding::default();
        for day_index in 0..days.len() {
            binding.blocked.insert((day_index, Workplace::AbdOnCall.index()));
        }

        let report = run(&workers, &days, &binding, &settings()).unwrap();
        // Quota sums match the horizon for duty and trauma; the blocked
        // on-call still trips the quota-total warning only.
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn roster_pins_count_as_coverage() {
        let days = horizon();
        // Quota-holder for every duty except the abdominal one; the
        // abdominal duty is held by a roster member pinned through the
        // preschedule despite carrying no quota for it.
        let mut holder = spec("A", days.len());
        holder.quota_abd_oncall = 5;
        holder.quota_trauma_oncall = 5;
        let workers = vec![holder.into_worker().unwrap()];

        let mut binding = PrescheduleBinding::default();
        for day_index in 0..days.len() {
            binding.pins.push((0, day_index, Workplace::AbdDuty.index()));
        }

        let report = run(&workers, &days, &binding, &settings()).unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains("ABDOMEN")));
    }

    #[test]
    fn overloaded_rotating_worker_is_fatal() {
        let days = horizon();
        let mut quota_holder = spec("A", days.len());
        quota_holder.quota_abd_duty = 5;
        quota_holder.quota_abd_oncall = 5;
        quota_holder.quota_trauma_oncall = 5;

        let mut rotating = spec("B", days.len());
        rotating.specialty_master = Some("rotating".to_string());
        rotating.availability = vec![
            Availability::INDIFFERENT,
            Availability::INDIFFERENT,
            Availability {
                day: SlotPreference::Forbidden,
                night: SlotPreference::Forbidden,
            },
            Availability {
                day: SlotPreference::Forbidden,
                night: SlotPreference::Forbidden,
            },
            Availability {
                day: SlotPreference::Forbidden,
                night: SlotPreference::Forbidden,
            },
        ];

        let workers = vec![
            quota_holder.into_worker().unwrap(),
            rotating.into_worker().unwrap(),
        ];
        let err = run(&workers, &days, &PrescheduleBinding::default(), &settings())
            .unwrap_err();
        assert!(err.to_string().contains("can only work 2 days"));
    }

    #[test]
    fn limited_workers_need_both_pins() {
        let days = horizon();
        let mut quota_holder = spec("A", days.len());
        quota_holder.quota_abd_duty = 5;
        quota_holder.quota_abd_oncall = 5;
        quota_holder.quota_trauma_oncall = 5;

        let mut limited = spec("B", days.len());
        limited.included = Inclusion::Limited;
        limited.pinned_day_shifts = Some(2);

        let workers = vec![
            quota_holder.into_worker().unwrap(),
            limited.into_worker().unwrap(),
        ];
        let err = run(&workers, &days, &PrescheduleBinding::default(), &settings())
            .unwrap_err();
        assert!(err.to_string().contains("pinned night-shift count"));
    }

    #[test]
    fn night_capacity_shortfall_is_a_warning() {
        let days = horizon();
        let mut quota_holder = spec("A", days.len());
        quota_holder.quota_abd_duty = 5;
        quota_holder.quota_abd_oncall = 5;
        quota_holder.quota_trauma_oncall = 5;

        // One night-eligible specialist can cover at most 5 of 15 slots.
        let workers = vec![quota_holder.into_worker().unwrap()];
        let report = run(&workers, &days, &PrescheduleBinding::default(), &settings())
            .unwrap();
        assert!(report
            .warnings
            .iter()
            .any(|warning| warning.contains("fewer than the 15 night slots")));
    }
}
