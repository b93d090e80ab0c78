use std::path::Path;

use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Run configuration: horizon, objective weights and solver knobs.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rotating_scheduled_count: u32,
    pub workplace_weights: WorkplaceWeights,
    pub weight_equal_workload: u32,
    pub weight_consecutive_nights: u32,
    pub weight_equally_distributed_workplaces: u32,
    pub weight_preferred_day_assignment: u32,
    pub weight_preferred_workplace_assignment: u32,
    pub weight_weekend_travmaprip: u32,
    pub print_logs: bool,
    /// Solver time limit in seconds.
    pub time_limit: f64,
}

/// Workload weights per shift class; night weights depend on the worker's
/// year of specialization.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkplaceWeights {
    pub night_1: u32,
    pub night_2: u32,
    pub night_3: u32,
    pub night_4: u32,
    pub night_5: u32,
    pub night_6: u32,
    pub workday: u32,
    pub weekend: u32,
}

impl WorkplaceWeights {
    pub fn night(&self, year_of_specialization: u32) -> u32 {
        match year_of_specialization {
            1 => self.night_1,
            2 => self.night_2,
            3 => self.night_3,
            4 => self.night_4,
            5 => self.night_5,
            _ => self.night_6,
        }
    }

    pub fn largest(&self) -> u32 {
        [
            self.night_1,
            self.night_2,
            self.night_3,
            self.night_4,
            self.night_5,
            self.night_6,
            self.workday,
            self.weekend,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.time_limit <= 0.0 {
            return Err(ConfigError::Message(format!(
                "time_limit must be positive, got {}",
                settings.time_limit
            )));
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "start_date": "2025-03-01",
            "end_date": "2025-03-31",
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
            "time_limit": 30.0
        }"#
    }

    #[test]
    fn loads_json_settings() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.start_date.to_string(), "2025-03-01");
        assert_eq!(settings.workplace_weights.night(3), 4);
        assert_eq!(settings.workplace_weights.night(6), 1);
        assert_eq!(settings.workplace_weights.largest(), 6);
        assert_eq!(settings.time_limit, 30.0);
    }

    #[test]
    fn rejects_non_positive_time_limit() {
        let json = sample_json().replace("30.0", "0.0");
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        assert!(Settings::load(file.path()).is_err());
    }
}
