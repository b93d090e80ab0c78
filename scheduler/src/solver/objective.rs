use selen::prelude::*;
use shared::{DomainError, DomainResult, Eligibility, Workplace};

use crate::domain::entities::weekend_pairs;
use crate::solver::model::{any_assigned, vars_of, ModelInput};

/// One weighted contribution to the minimized objective.
struct Term {
    coefficient: i32,
    var: VarId,
    /// Bounds of `coefficient * var` over the variable's domain.
    lo: i64,
    hi: i64,
}

/// An unweighted penalty expression with its value bounds.
struct Expr {
    var: VarId,
    lo: i64,
    hi: i64,
}

impl Expr {
    fn non_negative(var: VarId, hi: i64) -> Expr {
        Expr { var, lo: 0, hi }
    }
}

pub(crate) struct ObjectiveParts {
    pub objective: VarId,
    /// (worker index, weighted workload variable); rotating workers excluded.
    pub workloads: Vec<(usize, VarId)>,
}

/// Builds the soft-penalty expressions and combines them, with the
/// configured weights, into the single objective variable to minimize.
/// Preference and seniority terms are rewards and enter with negative sign.
pub(crate) fn assemble(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> DomainResult<ObjectiveParts> {
    let settings = input.settings;
    let mut terms = Vec::new();

    if let Some(term) = preferred_slots(model, input, shifts) {
        terms.push(scale(term, -(settings.weight_preferred_day_assignment as i32)));
    }
    if let Some(term) = preferred_workplaces(model, input, shifts) {
        terms.push(scale(term, settings.weight_preferred_workplace_assignment as i32));
    }
    if let Some(term) = consecutive_nights(model, input, shifts) {
        terms.push(scale(term, settings.weight_consecutive_nights as i32));
    }
    if let Some(term) = workplace_spread(model, input, shifts)? {
        terms.push(scale(term, settings.weight_equally_distributed_workplaces as i32));
    }
    if let Some(term) = senior_weekend_trauma(model, input, shifts) {
        terms.push(scale(term, -(settings.weight_weekend_travmaprip as i32)));
    }

    let (workload_term, workloads) = workload_balance(model, input, shifts)?;
    if let Some(term) = workload_term {
        terms.push(scale(term, settings.weight_equal_workload as i32));
    }

    let lo: i64 = terms.iter().map(|t| t.lo).sum();
    let hi: i64 = terms.iter().map(|t| t.hi).sum();
    let objective = model.int(lo as i32, hi as i32);

    let mut coefficients: Vec<i32> = terms.iter().map(|t| t.coefficient).collect();
    let mut vars: Vec<VarId> = terms.iter().map(|t| t.var).collect();
    coefficients.push(-1);
    vars.push(objective);
    model.int_lin_eq(&coefficients, &vars, 0);

    Ok(ObjectiveParts {
        objective,
        workloads,
    })
}

fn scale(expr: Expr, coefficient: i32) -> Term {
    let scaled = (expr.lo * coefficient as i64, expr.hi * coefficient as i64);
    Term {
        coefficient,
        var: expr.var,
        lo: scaled.0.min(scaled.1),
        hi: scaled.0.max(scaled.1),
    }
}

/// Count of assignments landing on slots the worker asked for, plus 24h
/// duties on fully wished days.
fn preferred_slots(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> Option<Expr> {
    let mut wished = Vec::new();
    for (worker_index, worker) in input.workers.iter().enumerate() {
        for day in 0..input.days.len() {
            let availability = worker.availability[day];
            if availability.day.is_preferred() {
                wished.extend(vars_of(shifts, worker_index, day, &Workplace::DAY));
            }
            if availability.night.is_preferred() {
                wished.extend(vars_of(shifts, worker_index, day, &Workplace::NIGHT));
            }
            if availability.day.is_preferred() && availability.night.is_preferred() {
                wished.extend(vars_of(shifts, worker_index, day, &Workplace::UNCONNECTED));
            }
        }
    }
    if wished.is_empty() {
        return None;
    }
    let total = model.sum(&wished);
    Some(Expr::non_negative(total, wished.len() as i64))
}

/// MAYBE assignments minus YES assignments over the standard workplaces.
fn preferred_workplaces(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> Option<Expr> {
    let mut coefficients = Vec::new();
    let mut vars = Vec::new();
    let mut maybe_count = 0i64;
    let mut yes_count = 0i64;

    for (worker_index, worker) in input.workers.iter().enumerate() {
        for wp in Workplace::STANDARD {
            let weight = match worker.eligibility(wp) {
                Eligibility::Maybe => 1,
                Eligibility::Yes => -1,
                Eligibility::No => continue,
            };
            for day in 0..input.days.len() {
                coefficients.push(weight);
                vars.push(shifts[worker_index][day][wp.index()]);
            }
            if weight > 0 {
                maybe_count += input.days.len() as i64;
            } else {
                yes_count += input.days.len() as i64;
            }
        }
    }
    if vars.is_empty() {
        return None;
    }

    let balance = model.int(-(yes_count as i32), maybe_count as i32);
    coefficients.push(-1);
    vars.push(balance);
    model.int_lin_eq(&coefficients, &vars, 0);
    Some(Expr {
        var: balance,
        lo: -yes_count,
        hi: maybe_count,
    })
}

/// One Boolean per (worker, day) pair with nights on both days.
fn consecutive_nights(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> Option<Expr> {
    let mut repeats = Vec::new();
    for worker in 0..input.workers.len() {
        for day in 0..input.days.len().saturating_sub(1) {
            let tonight_vars = vars_of(shifts, worker, day, &Workplace::NIGHT);
            let tonight = any_assigned(model, &tonight_vars);
            let tomorrow_vars = vars_of(shifts, worker, day + 1, &Workplace::NIGHT);
            let tomorrow = any_assigned(model, &tomorrow_vars);
            repeats.push(model.bool_and(&[tonight, tomorrow]));
        }
    }
    if repeats.is_empty() {
        return None;
    }
    let total = model.sum(&repeats);
    Some(Expr::non_negative(total, repeats.len() as i64))
}

/// Per-worker spread (max − min) of counts across their YES workplaces.
fn workplace_spread(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> DomainResult<Option<Expr>> {
    let mut spreads = Vec::new();
    for (worker_index, worker) in input.workers.iter().enumerate() {
        let favorites: Vec<Workplace> = Workplace::STANDARD
            .into_iter()
            .filter(|wp| worker.eligibility(*wp) == Eligibility::Yes)
            .collect();
        if favorites.len() <= 1 {
            continue;
        }

        let counts: Vec<VarId> = favorites
            .iter()
            .map(|wp| {
                let vars: Vec<VarId> = (0..input.days.len())
                    .map(|day| shifts[worker_index][day][wp.index()])
                    .collect();
                model.sum(&vars)
            })
            .collect();
        let most = model.max(&counts).map_err(solver_error)?;
        let fewest = model.min(&counts).map_err(solver_error)?;
        spreads.push(model.sub(most, fewest));
    }
    if spreads.is_empty() {
        return Ok(None);
    }
    let total = model.sum(&spreads);
    let bound = (spreads.len() * input.days.len()) as i64;
    Ok(Some(Expr::non_negative(total, bound)))
}

/// Seniority-weighted count of weekend pairs spent on back-to-back trauma
/// on-call. The exponential weight keeps one senior pair worth more than
/// several junior ones.
fn senior_weekend_trauma(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> Option<Expr> {
    let pairs = weekend_pairs(input.days);
    if pairs.is_empty() || input.workers.is_empty() {
        return None;
    }
    let max_year = input
        .workers
        .iter()
        .map(|worker| worker.year_of_specialization)
        .max()
        .unwrap_or(6);

    let trauma = Workplace::TraumaOnCall.index();
    let mut coefficients = Vec::new();
    let mut vars = Vec::new();
    let mut bound = 0i64;

    for (first, second) in &pairs {
        for (worker_index, worker) in input.workers.iter().enumerate() {
            let both = model.bool();
            model.int_lin_eq_reif(
                &[1, 1],
                &[
                    shifts[worker_index][*first][trauma],
                    shifts[worker_index][*second][trauma],
                ],
                2,
                both,
            );

            let seniority = max_year - worker.year_of_specialization;
            let weight = 1i32 << (7 - seniority);
            coefficients.push(weight);
            vars.push(both);
            bound += weight as i64;
        }
    }

    let weighted = model.int(0, bound as i32);
    coefficients.push(-1);
    vars.push(weighted);
    model.int_lin_eq(&coefficients, &vars, 0);
    Some(Expr::non_negative(weighted, bound))
}

/// Spread (max − min) of the weighted workloads over the non-rotating
/// workers; the primary equalization term.
fn workload_balance(
    model: &mut Model,
    input: &ModelInput,
    shifts: &[Vec<Vec<VarId>>],
) -> DomainResult<(Option<Expr>, Vec<(usize, VarId)>)> {
    let weights = &input.settings.workplace_weights;
    let ceiling = (input.days.len() as u32 * weights.largest()) as i32;

    let mut workloads = Vec::new();
    for (worker_index, worker) in input.workers.iter().enumerate() {
        if worker.is_rotating() {
            // Rotating totals are pinned; balancing against them would skew
            // the spread.
            continue;
        }

        let mut coefficients = Vec::new();
        let mut vars = Vec::new();
        for (day_index, day) in input.days.iter().enumerate() {
            for wp in Workplace::STANDARD {
                let weight = if wp.is_night() {
                    weights.night(worker.year_of_specialization)
                } else if day.is_workday() {
                    weights.workday
                } else {
                    weights.weekend
                };
                coefficients.push(weight as i32);
                vars.push(shifts[worker_index][day_index][wp.index()]);
            }
        }

        let total = model.int(0, ceiling);
        coefficients.push(-1);
        vars.push(total);
        model.int_lin_eq(&coefficients, &vars, 0);
        workloads.push((worker_index, total));
    }

    if workloads.len() < 2 {
        return Ok((None, workloads));
    }

    let totals: Vec<VarId> = workloads.iter().map(|(_, var)| *var).collect();
    let most = model.max(&totals).map_err(solver_error)?;
    let fewest = model.min(&totals).map_err(solver_error)?;
    let spread = model.sub(most, fewest);
    Ok((Some(Expr::non_negative(spread, ceiling as i64)), workloads))
}

fn solver_error(error: impl std::fmt::Display) -> DomainError {
    DomainError::Solver(error.to_string())
}
