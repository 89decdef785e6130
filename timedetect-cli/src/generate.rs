//! Synthetic registration generator
//!
//! Produces one registration per employee per calendar day, with working
//! hours drawn from small option lists: the first option is the most likely,
//! each following option half as likely again, and the last option takes the
//! remainder.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use timedetect_core::domain::registration::{Numerical, Registration};

const PROJECTS: [&str; 3] = ["project-alpha", "project-beta", "project-gamma"];
const DEPARTMENTS: [&str; 2] = ["department-green", "department-blue"];
const WORK_CATEGORIES: [&str; 4] = ["development", "maintenance", "support", "meetings"];
const NUMERICALS: [&str; 2] = ["overtime", "kilometers"];

const START_TIMES: [f64; 3] = [8.0, 7.5, 8.5];
const END_TIMES: [f64; 3] = [16.0, 17.0, 16.5];
const BREAK_DURATIONS: [f64; 3] = [0.5, 1.0, 0.0];

/// Probability that any given named numerical is attached to a registration
const NUMERICAL_DENSITY: f64 = 0.3;

/// Generates registrations for a synthetic company
pub struct DataGenerator {
    num_employees: usize,
    reg_id_counter: u64,
}

impl DataGenerator {
    /// Creates a generator for a company of `num_employees`
    pub fn new(num_employees: usize) -> Self {
        Self {
            num_employees,
            reg_id_counter: 0,
        }
    }

    /// Generate one registration per employee per day in `[start, end]`
    ///
    /// Registration ids keep counting across calls, so the train and predict
    /// periods of one generator never collide.
    pub fn generate(
        &mut self,
        rng: &mut impl Rng,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Registration> {
        let mut registrations = Vec::new();
        let mut date = start;
        while date <= end {
            let formatted = date.format("%Y-%m-%d").to_string();
            for employee in 0..self.num_employees {
                let employee_id = format!("employee-{employee}");
                registrations.push(self.create_registration(rng, &employee_id, &formatted));
            }
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        registrations
    }

    fn create_registration(
        &mut self,
        rng: &mut impl Rng,
        employee_id: &str,
        date: &str,
    ) -> Registration {
        let registration_id = format!("reg-{}", self.reg_id_counter);
        self.reg_id_counter += 1;

        let start_time = pick_decreasing(rng, &START_TIMES);
        let end_time = pick_decreasing(rng, &END_TIMES);
        let break_duration = pick_decreasing(rng, &BREAK_DURATIONS);
        let work_duration = end_time - start_time - break_duration;

        Registration {
            registration_id,
            date: date.to_string(),
            employee_id: employee_id.to_string(),
            project_id: choose(rng, &PROJECTS),
            department_id: choose(rng, &DEPARTMENTS),
            work_category: choose(rng, &WORK_CATEGORIES),
            start_time,
            end_time,
            work_duration,
            break_duration,
            public_holiday: false,
            numericals: generate_numericals(rng, &NUMERICALS),
            extra: BTreeMap::new(),
        }
    }
}

/// Pick from `options` with halving probability: the first option wins a
/// coin toss, otherwise the second gets one, and so on; the last option
/// takes whatever probability is left.
fn pick_decreasing(rng: &mut impl Rng, options: &[f64]) -> f64 {
    let Some((last, rest)) = options.split_last() else {
        return 0.0;
    };
    for option in rest {
        if rng.gen_bool(0.5) {
            return *option;
        }
    }
    *last
}

fn choose(rng: &mut impl Rng, options: &[&str]) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn generate_numericals(rng: &mut impl Rng, names: &[&str]) -> Vec<Numerical> {
    names
        .iter()
        .filter_map(|name| {
            if rng.gen_bool(NUMERICAL_DENSITY) {
                Some(Numerical {
                    name: name.to_string(),
                    value: f64::from(rng.gen_range(1..=5)),
                })
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[test]
    fn test_one_registration_per_employee_per_day() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut generator = DataGenerator::new(2);

        let rows = generator.generate(&mut rng, date("2023-04-03"), date("2023-04-05"));
        assert_eq!(rows.len(), 6);

        let employees: BTreeSet<&str> =
            rows.iter().map(|row| row.employee_id.as_str()).collect();
        assert_eq!(employees.len(), 2);

        let dates: BTreeSet<&str> = rows.iter().map(|row| row.date.as_str()).collect();
        assert_eq!(
            dates.into_iter().collect::<Vec<_>>(),
            ["2023-04-03", "2023-04-04", "2023-04-05"]
        );
    }

    #[test]
    fn test_registration_ids_are_unique_across_calls() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = DataGenerator::new(3);

        let train = generator.generate(&mut rng, date("2023-01-02"), date("2023-01-04"));
        let predict = generator.generate(&mut rng, date("2023-01-05"), date("2023-01-06"));

        let ids: BTreeSet<&str> = train
            .iter()
            .chain(predict.iter())
            .map(|row| row.registration_id.as_str())
            .collect();
        assert_eq!(ids.len(), train.len() + predict.len());
    }

    #[test]
    fn test_work_duration_is_consistent() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut generator = DataGenerator::new(4);

        for row in generator.generate(&mut rng, date("2023-04-03"), date("2023-04-07")) {
            assert_eq!(
                row.work_duration,
                row.end_time - row.start_time - row.break_duration
            );
            assert!(START_TIMES.contains(&row.start_time));
            assert!(END_TIMES.contains(&row.end_time));
        }
    }

    #[test]
    fn test_pick_decreasing_stays_inside_the_options() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let picked = pick_decreasing(&mut rng, &START_TIMES);
            assert!(START_TIMES.contains(&picked));
        }
        assert_eq!(pick_decreasing(&mut rng, &[42.0]), 42.0);
    }
}
