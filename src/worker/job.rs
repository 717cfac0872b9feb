//! Monte Carlo job definitions
//!
//! A [`SweepJob`] is one simulation run: one direction, one value of the held
//! condition, and the full grid of the swept condition. [`build_job_config`]
//! turns a base template into the job's input document without touching the
//! template.

use crate::config::{Direction, Grid, SweptDimension};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

/// Condition blocks of the driver section, in document order
pub const CONDITION_BLOCKS: [&str; 3] = ["initial_conditions", "final_conditions", "incremental_conditions"];

/// Thermodynamic state written into one condition block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    pub temperature: f64,
    /// Parametric chemical potential `param_chem_pot.a`
    pub chem_pot: f64,
}

/// Initial, final and incremental conditions of one job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JobConditions {
    pub initial: Conditions,
    #[serde(rename = "final")]
    pub final_: Conditions,
    pub incremental: Conditions,
}

impl JobConditions {
    fn blocks(&self) -> [(&'static str, Conditions); 3] {
        [
            (CONDITION_BLOCKS[0], self.initial),
            (CONDITION_BLOCKS[1], self.final_),
            (CONDITION_BLOCKS[2], self.incremental),
        ]
    }
}

/// One simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepJob {
    pub direction: Direction,
    /// Global index of the held value in its grid
    pub index: usize,
    /// Value of the held condition
    pub held: f64,
    /// Grid of the swept condition
    pub grid: Grid,
}

impl SweepJob {
    /// Job directory name, `<direction>.<index>`
    pub fn dir_name(&self) -> String {
        format!("{}.{}", self.direction.dir_prefix(), self.index)
    }

    /// Conditions for this job
    ///
    /// The swept condition runs from one grid end to the other in grid steps;
    /// the held condition stays at `held` with a zero increment.
    pub fn conditions(&self) -> JobConditions {
        let grid = self.grid;
        let (start, end, step) = if self.direction.ascending() {
            (grid.min, grid.max, grid.step)
        } else {
            (grid.max, grid.min, -grid.step)
        };

        let state = |swept: f64, held: f64| match self.direction.swept() {
            SweptDimension::Temperature => Conditions {
                temperature: swept,
                chem_pot: held,
            },
            SweptDimension::ChemicalPotential => Conditions {
                temperature: held,
                chem_pot: swept,
            },
        };

        JobConditions {
            initial: state(start, self.held),
            final_: state(end, self.held),
            incremental: state(step, 0.0),
        }
    }
}

/// Driver block used when the template has none
pub fn default_driver() -> Value {
    json!({
        "mode": "incremental",
        "dependent_runs": true,
        "motif": {
            "configname": "restricted_auto"
        },
        "initial_conditions": {
            "param_chem_pot": { "a": 0.0 },
            "temperature": 0.0,
            "tolerance": 0.001
        },
        "final_conditions": {
            "param_chem_pot": { "a": 0.0 },
            "temperature": 0.0,
            "tolerance": 0.001
        },
        "incremental_conditions": {
            "param_chem_pot": { "a": 0.0 },
            "temperature": 0.0,
            "tolerance": 0.001
        }
    })
}

/// Build the input document of `job` from `template`
///
/// Only `temperature` and `param_chem_pot.a` of the three condition blocks
/// are written; every other field of the template is carried over as is.
pub fn build_job_config(template: &Value, job: &SweepJob) -> Value {
    let mut config = template.clone();
    let root = object_mut(&mut config);

    let driver = root.entry("driver").or_insert_with(default_driver);
    let driver = object_mut(driver);

    for (name, conditions) in job.conditions().blocks() {
        let block = object_mut(driver.entry(name).or_insert(Value::Null));
        block.insert("temperature".to_string(), json!(conditions.temperature));

        let chem_pot = object_mut(block.entry("param_chem_pot").or_insert(Value::Null));
        chem_pot.insert("a".to_string(), json!(conditions.chem_pot));
    }

    config
}

/// View `value` as an object, replacing anything else with an empty one
fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was replaced by an object"),
    }
}

/// Load the base job template
pub fn load_template(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read job template: {}", path.display()))?;

    let template: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse job template: {}", path.display()))?;

    if !template.is_object() {
        anyhow::bail!("Job template must be a JSON object: {}", path.display());
    }

    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const T_GRID: Grid = Grid::new(200.0, 841.0, 20.0);
    const XI_GRID: Grid = Grid::new(-1.5, 2.501, 0.05);

    fn job(direction: Direction, index: usize, held: f64) -> SweepJob {
        let grid = match direction.swept() {
            SweptDimension::Temperature => T_GRID,
            SweptDimension::ChemicalPotential => XI_GRID,
        };
        SweepJob {
            direction,
            index,
            held,
            grid,
        }
    }

    #[test]
    fn test_dir_names() {
        assert_eq!(job(Direction::TUp, 0, 0.0).dir_name(), "T_up.0");
        assert_eq!(job(Direction::TDown, 12, 0.0).dir_name(), "T_down.12");
        assert_eq!(job(Direction::XiUp, 7, 300.0).dir_name(), "xi_up.7");
        assert_eq!(job(Direction::XiDown, 32, 840.0).dir_name(), "xi_down.32");
    }

    #[test]
    fn test_t_up_conditions() {
        let c = job(Direction::TUp, 3, -1.35).conditions();

        assert_eq!(c.initial, Conditions { temperature: 200.0, chem_pot: -1.35 });
        assert_eq!(c.final_, Conditions { temperature: 841.0, chem_pot: -1.35 });
        assert_eq!(c.incremental, Conditions { temperature: 20.0, chem_pot: 0.0 });
    }

    #[test]
    fn test_t_down_reverses_t_up() {
        let up = job(Direction::TUp, 3, 0.5).conditions();
        let down = job(Direction::TDown, 3, 0.5).conditions();

        assert_eq!(down.initial, up.final_);
        assert_eq!(down.final_, up.initial);
        assert_eq!(down.incremental.temperature, -20.0);
        assert_eq!(down.incremental.chem_pot, 0.0);
    }

    #[test]
    fn test_xi_conditions() {
        let up = job(Direction::XiUp, 1, 220.0).conditions();
        assert_eq!(up.initial, Conditions { temperature: 220.0, chem_pot: -1.5 });
        assert_eq!(up.final_, Conditions { temperature: 220.0, chem_pot: 2.501 });
        assert_eq!(up.incremental, Conditions { temperature: 0.0, chem_pot: 0.05 });

        let down = job(Direction::XiDown, 1, 220.0).conditions();
        assert_eq!(down.initial.chem_pot, 2.501);
        assert_eq!(down.final_.chem_pot, -1.5);
        assert_eq!(down.incremental.chem_pot, -0.05);
        assert_eq!(down.incremental.temperature, 0.0);
    }

    #[test]
    fn test_build_job_config_keeps_template() {
        let template = json!({
            "comment": "grand canonical",
            "driver": {
                "mode": "incremental",
                "initial_conditions": { "param_chem_pot": { "a": -2.0 }, "temperature": 1200.0, "tolerance": 0.002 }
            },
            "model": { "formation_energy": "formation_energy" }
        });
        let original = template.clone();

        let config = build_job_config(&template, &job(Direction::TDown, 4, 0.25));

        assert_eq!(template, original);
        assert_eq!(config["comment"], "grand canonical");
        assert_eq!(config["model"], original["model"]);
        assert_eq!(config["driver"]["mode"], "incremental");
        assert_eq!(config["driver"]["initial_conditions"]["temperature"], 841.0);
        assert_eq!(config["driver"]["initial_conditions"]["tolerance"], 0.002);
        assert_eq!(config["driver"]["initial_conditions"]["param_chem_pot"]["a"], 0.25);
        assert_eq!(config["driver"]["final_conditions"]["temperature"], 200.0);
        assert_eq!(config["driver"]["incremental_conditions"]["temperature"], -20.0);
        assert_eq!(config["driver"]["incremental_conditions"]["param_chem_pot"]["a"], 0.0);
    }

    #[test]
    fn test_build_job_config_inserts_default_driver() {
        let config = build_job_config(&json!({ "ensemble": "grand_canonical" }), &job(Direction::XiUp, 0, 300.0));

        let driver = &config["driver"];
        assert_eq!(driver["mode"], "incremental");
        assert_eq!(driver["dependent_runs"], true);
        assert_eq!(driver["motif"]["configname"], "restricted_auto");
        assert_eq!(driver["final_conditions"]["tolerance"], 0.001);
        assert_eq!(driver["initial_conditions"]["temperature"], 300.0);
        assert_eq!(driver["incremental_conditions"]["param_chem_pot"]["a"], 0.05);
        assert_eq!(config["ensemble"], "grand_canonical");
    }

    #[test]
    fn test_load_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metropolis_grand_canonical.json");

        fs::write(&path, r#"{"method": "metropolis"}"#).unwrap();
        assert_eq!(load_template(&path).unwrap()["method"], "metropolis");

        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(load_template(&path).is_err());

        fs::write(&path, "{ not json").unwrap();
        assert!(load_template(&path).is_err());

        assert!(load_template(&temp_dir.path().join("missing.json")).is_err());
    }
}
