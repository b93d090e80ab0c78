use selen::prelude::*;
use shared::{DomainError, DomainResult, Eligibility, Inclusion, Workplace};

use crate::domain::entities::{weekend_pairs, Day, PrescheduleBinding, Worker};
use crate::infrastructure::config::Settings;
use crate::solver::objective;

/// Everything the model builder needs, borrowed from the pipeline.
pub struct ModelInput<'a> {
    pub workers: &'a [Worker],
    pub days: &'a [Day],
    pub binding: &'a PrescheduleBinding,
    pub settings: &'a Settings,
}

/// The constraint model plus the handles needed to read a solution back.
pub struct RosterModel {
    pub model: Model,
    /// Assignment Booleans indexed [worker][day][workplace].
    pub shifts: Vec<Vec<Vec<VarId>>>,
    pub objective: VarId,
    /// (worker index, weighted workload variable); rotating workers excluded.
    pub workloads: Vec<(usize, VarId)>,
}

/// Builds the full constraint model over one Boolean per
/// (worker, day, workplace) triple.
pub fn build(input: &ModelInput) -> DomainResult<RosterModel> {
    let timeout_ms = (input.settings.time_limit * 1000.0).round() as u64;
    let mut model = Model::with_config(SolverConfig::default().with_timeout_ms(timeout_ms));

    let shifts: Vec<Vec<Vec<VarId>>> = input
        .workers
        .iter()
        .map(|_| {
            input
                .days
                .iter()
                .map(|_| Workplace::ALL.iter().map(|_| model.bool()).collect())
                .collect()
        })
        .collect();

    tracing::debug!(
        workers = input.workers.len(),
        days = input.days.len(),
        variables = input.workers.len() * input.days.len() * Workplace::ALL.len(),
        "building roster model"
    );

    pin_preschedule(&mut model, input, &shifts);
    cover_slots(&mut model, input, &shifts);
    forbid_ineligible(&mut model, input, &shifts);
    unconnected_quotas(&mut model, input, &shifts);
    rest_after_nights(&mut model, input, &shifts);
    split_workday_shifts(&mut model, input, &shifts);
    isolate_unconnected(&mut model, input, &shifts);
    respect_availability(&mut model, input, &shifts);
    cap_consecutive_days(&mut model, input, &shifts);
    limit_weekends(&mut model, input, &shifts);
    cap_day_shifts(&mut model, input, &shifts);
    bound_night_shifts(&mut model, input, &shifts);
    pin_rotating_totals(&mut model, input, &shifts);
    pin_limited_totals(&mut model, input, &shifts)?;

    let parts = objective::assemble(&mut model, input, &shifts)?;

    Ok(RosterModel {
        model,
        shifts,
        objective: parts.objective,
        workloads: parts.workloads,
    })
}

// ---------------------------------------------------------------------------
// Variable slices

pub(crate) fn vars_of(
    shifts: &[Vec<Vec<VarId>>],
    worker: usize,
    day: usize,
    places: &[Workplace],
) -> Vec<VarId> {
    places
        .iter()
        .map(|wp| shifts[worker][day][wp.index()])
        .collect()
}

pub(crate) fn ones(len: usize) -> Vec<i32> {
    vec![1; len]
}

// ---------------------------------------------------------------------------
// Reification helpers. selen's reified constraints bind both directions, so
// one-way implications go through an auxiliary Boolean plus a clause.

/// `condition` implies `sum(vars) == total`.
fn imply_sum_eq(model: &mut Model, condition: VarId, vars: &[VarId], total: i32) {
    let holds = model.bool();
    model.int_lin_eq_reif(&ones(vars.len()), vars, total, holds);
    model.bool_clause(&[holds], &[condition]);
}

/// `!condition` implies `sum(vars) <= bound`.
fn imply_not_sum_le(model: &mut Model, condition: VarId, vars: &[VarId], bound: i32) {
    let holds = model.bool();
    model.int_lin_le_reif(&ones(vars.len()), vars, bound, holds);
    model.bool_clause(&[condition, holds], &[]);
}

/// Boolean that is true iff at least one of `vars` is set.
pub(crate) fn any_assigned(model: &mut Model, vars: &[VarId]) -> VarId {
    let none = model.bool();
    model.int_lin_le_reif(&ones(vars.len()), vars, 0, none);
    model.bool_not(none)
}

// ---------------------------------------------------------------------------
// Hard constraints

/// Preschedule pins: roster members keep their pre-assigned slots.
fn pin_preschedule(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker, day, workplace) in &input.binding.pins {
        model.int_lin_eq(&[1], &[shifts[*worker][*day][*workplace]], 1);
    }
}

/// Coverage: every open slot takes exactly one worker; blocked slots and the
/// abdominal on-call outside workdays stay empty.
fn cover_slots(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (day_index, day) in input.days.iter().enumerate() {
        for wp in Workplace::ALL {
            let total = if input.binding.is_blocked(day_index, wp.index()) {
                0
            } else if wp == Workplace::AbdOnCall && !day.is_workday() {
                0
            } else {
                1
            };
            let slot: Vec<VarId> = (0..input.workers.len())
                .map(|worker| shifts[worker][day_index][wp.index()])
                .collect();
            model.int_lin_eq(&ones(slot.len()), &slot, total);
        }
    }
}

/// Workers never take workplaces tagged NO.
fn forbid_ineligible(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        for wp in Workplace::ALL {
            if worker.eligibility(wp) == Eligibility::No {
                let vars: Vec<VarId> = (0..input.days.len())
                    .map(|day| shifts[worker_index][day][wp.index()])
                    .collect();
                model.int_lin_eq(&ones(vars.len()), &vars, 0);
            }
        }
    }
}

/// Each unconnected duty is worked exactly the quota number of times.
///
/// The abdominal on-call runs on workdays only, but its non-workday slots
/// are already forced empty by coverage, so the sum over all days counts the
/// workdays alone.
fn unconnected_quotas(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        for wp in Workplace::UNCONNECTED {
            let vars: Vec<VarId> = (0..input.days.len())
                .map(|day| shifts[worker_index][day][wp.index()])
                .collect();
            model.int_lin_eq(&ones(vars.len()), &vars, worker.quota_for(wp) as i32);
        }
    }
}

/// Never a night shift followed by a day shift the next day.
fn rest_after_nights(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for worker in 0..input.workers.len() {
        for day in 0..input.days.len().saturating_sub(1) {
            let mut vars = vars_of(shifts, worker, day, &Workplace::NIGHT);
            vars.extend(vars_of(shifts, worker, day + 1, &Workplace::DAY));
            model.int_lin_le(&ones(vars.len()), &vars, 1);
        }
    }
}

/// On workdays a day shift and a night shift never combine.
fn split_workday_shifts(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for worker in 0..input.workers.len() {
        for (day_index, day) in input.days.iter().enumerate() {
            if day.is_workday() {
                let mut vars = vars_of(shifts, worker, day_index, &Workplace::DAY);
                vars.extend(vars_of(shifts, worker, day_index, &Workplace::NIGHT));
                model.int_lin_le(&ones(vars.len()), &vars, 1);
            }
        }
    }
}

/// An unconnected duty day carries no other assignment.
fn isolate_unconnected(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for worker in 0..input.workers.len() {
        for day in 0..input.days.len() {
            let unconnected = vars_of(shifts, worker, day, &Workplace::UNCONNECTED);
            let on_duty = model.bool_or(&unconnected);
            let all = vars_of(shifts, worker, day, &Workplace::ALL);
            imply_sum_eq(model, on_duty, &all, 1);
        }
    }
}

/// Forbidden slots stay empty; open slots allow at most one assignment per
/// shift class.
fn respect_availability(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        for day in 0..input.days.len() {
            let availability = worker.availability[day];

            let day_vars = vars_of(shifts, worker_index, day, &Workplace::DAY);
            if availability.day.allows() {
                model.int_lin_le(&ones(day_vars.len()), &day_vars, 1);
            } else {
                model.int_lin_eq(&ones(day_vars.len()), &day_vars, 0);
            }

            let night_vars = vars_of(shifts, worker_index, day, &Workplace::NIGHT);
            if availability.night.allows() {
                model.int_lin_le(&ones(night_vars.len()), &night_vars, 1);
            } else {
                model.int_lin_eq(&ones(night_vars.len()), &night_vars, 0);
            }

            let unconnected = vars_of(shifts, worker_index, day, &Workplace::UNCONNECTED);
            if availability.allows_full_day() {
                model.int_lin_le(&ones(unconnected.len()), &unconnected, 1);
            } else {
                model.int_lin_eq(&ones(unconnected.len()), &unconnected, 0);
            }
        }
    }
}

/// No three consecutive days with any assignment.
fn cap_consecutive_days(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for worker in 0..input.workers.len() {
        let working: Vec<VarId> = (0..input.days.len())
            .map(|day| {
                let all = vars_of(shifts, worker, day, &Workplace::ALL);
                model.bool_or(&all)
            })
            .collect();
        for window in working.windows(3) {
            model.int_lin_le(&ones(3), window, 2);
        }
    }
}

/// Weekend discipline.
///
/// Night-working workers get at most one 24h weekend pattern per month: the
/// MOP day station paired with one partner night station (or the MOP night
/// station paired with one partner day station), with the neighbouring days
/// fully off. Day-only workers work at most one full weekend pair.
fn limit_weekends(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    let pairs = weekend_pairs(input.days);
    let num_days = input.days.len();

    for (worker_index, worker) in input.workers.iter().enumerate() {
        if worker.works_night_shifts() {
            let mut patterns = Vec::new();
            for (day_index, day) in input.days.iter().enumerate() {
                if !day.is_weekend_or_holiday() {
                    continue;
                }
                let night_partners = [
                    shifts[worker_index][day_index][Workplace::ABD_NIGHT.index()],
                    shifts[worker_index][day_index][Workplace::B_NIGHT.index()],
                ];
                let day_partners = [
                    shifts[worker_index][day_index][Workplace::ABD_DAY.index()],
                    shifts[worker_index][day_index][Workplace::B_DAY.index()],
                ];

                // MOP by day, one partner night station alongside.
                let mop_day = shifts[worker_index][day_index][Workplace::MOP_DAY.index()];
                imply_sum_eq(model, mop_day, &night_partners, 1);
                imply_not_sum_le(model, mop_day, &night_partners, 1);

                // MOP by night, one partner day station alongside.
                let mop_night = shifts[worker_index][day_index][Workplace::MOP_NIGHT.index()];
                imply_sum_eq(model, mop_night, &day_partners, 1);
                imply_not_sum_le(model, mop_night, &day_partners, 1);

                // A 24h day clears the day before and the day after.
                let full_day = model.bool_or(&[mop_day, mop_night]);
                if day_index + 1 < num_days {
                    let next = vars_of(shifts, worker_index, day_index + 1, &Workplace::ALL);
                    imply_sum_eq(model, full_day, &next, 0);
                }
                if day_index > 0 {
                    let previous = vars_of(shifts, worker_index, day_index - 1, &Workplace::ALL);
                    imply_sum_eq(model, full_day, &previous, 0);
                }

                patterns.push(mop_day);
                patterns.push(mop_night);
            }
            if !patterns.is_empty() {
                model.int_lin_le(&ones(patterns.len()), &patterns, 1);
            }
        } else {
            let mut worked_pairs = Vec::new();
            for (first, second) in &pairs {
                let first_vars = vars_of(shifts, worker_index, *first, &Workplace::DAY);
                let first_worked = any_assigned(model, &first_vars);
                let second_vars = vars_of(shifts, worker_index, *second, &Workplace::DAY);
                let second_worked = any_assigned(model, &second_vars);
                worked_pairs.push(model.bool_and(&[first_worked, second_worked]));
            }
            if !worked_pairs.is_empty() {
                model.int_lin_le(&ones(worked_pairs.len()), &worked_pairs, 1);
            }
        }
    }
}

/// Optional cap on the monthly day-shift total.
fn cap_day_shifts(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        if let Some(cap) = worker.max_day_shifts {
            let vars: Vec<VarId> = (0..input.days.len())
                .flat_map(|day| vars_of(shifts, worker_index, day, &Workplace::DAY))
                .collect();
            model.int_lin_le(&ones(vars.len()), &vars, cap as i32);
        }
    }
}

/// Night totals stay inside the status-derived window.
fn bound_night_shifts(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        if !worker.works_night_shifts() {
            continue;
        }
        let (min, max) = worker.night_shift_window();
        let vars: Vec<VarId> = (0..input.days.len())
            .flat_map(|day| vars_of(shifts, worker_index, day, &Workplace::NIGHT))
            .collect();

        if max == 0 {
            model.int_lin_eq(&ones(vars.len()), &vars, 0);
            continue;
        }
        model.int_lin_le(&ones(vars.len()), &vars, max as i32);
        if min > 0 {
            // sum >= min, expressed as a <= over negated coefficients
            model.int_lin_le(&vec![-1; vars.len()], &vars, -(min as i32));
        }
    }
}

/// Rotating workers carry exactly the configured number of assignments.
fn pin_rotating_totals(model: &mut Model, input: &ModelInput, shifts: &[Vec<Vec<VarId>>]) {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        if worker.is_rotating() {
            let vars: Vec<VarId> = (0..input.days.len())
                .flat_map(|day| vars_of(shifts, worker_index, day, &Workplace::ALL))
                .collect();
            model.int_lin_eq(
                &ones(vars.len()),
                &vars,
                input.settings.rotating_scheduled_count as i32,
            );
        }
    }
}

/// Limited workers carry exactly their pinned day and night totals.
fn pin_limited_totals(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> DomainResult<()> {
    for (worker_index, worker) in input.workers.iter().enumerate() {
        if worker.included != Inclusion::Limited {
            continue;
        }
        let (Some(day_total), Some(night_total)) =
            (worker.pinned_day_shifts, worker.pinned_night_shifts)
        else {
            return Err(DomainError::InternalError(format!(
                "limited worker {} reached the model builder without pinned totals",
                worker.name
            )));
        };

        let day_vars: Vec<VarId> = (0..input.days.len())
            .flat_map(|day| vars_of(shifts, worker_index, day, &Workplace::DAY))
            .collect();
        model.int_lin_eq(&ones(day_vars.len()), &day_vars, day_total as i32);

        let night_vars: Vec<VarId> = (0..input.days.len())
            .flat_map(|day| vars_of(shifts, worker_index, day, &Workplace::NIGHT))
            .collect();
        model.int_lin_eq(&ones(night_vars.len()), &night_vars, night_total as i32);
    }
    Ok(())
}
