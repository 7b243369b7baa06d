//! Loading and assembling simulations from TOML files.

use std::io::Write;
use std::path::Path;

use rotary_control::config::load_simulation;
use rotary_control::error::{ConfigError, SimError};
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
dt = 0.01

[motor]
inertia = 0.01
friction_viscous = 0.05
max_torque = 1.0

[encoder]
noise_std_deg = 0.0

[planner]
pos0 = 0.0
posf = 90.0
vmax = 60.0
amax = 120.0

[speed_pid]
kp = 0.02
ki = 0.0
kd = 0.0
deadband = 0.0

[stop]
max_time = 10.0
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loaded_config_runs_to_settle() {
    let file = write_config(CONFIG);
    let mut sim = load_simulation(file.path(), 1).unwrap();
    let summary = sim.run(|_| {});
    assert!(summary.settled, "{summary:?}");
}

#[test]
fn missing_file_is_reported() {
    let result = load_simulation(Path::new("/nonexistent/rotary.toml"), 0);
    assert!(matches!(
        result,
        Err(SimError::Config(ConfigError::FileNotFound))
    ));
}

#[test]
fn unknown_field_is_a_parse_error() {
    let file = write_config(&CONFIG.replace(
        "max_torque = 1.0",
        "max_torque = 1.0\ngear_ratio = 3.0",
    ));
    assert!(matches!(
        load_simulation(file.path(), 0),
        Err(SimError::Config(ConfigError::ParseError(_)))
    ));
}

#[test]
fn invalid_value_is_a_param_error() {
    let file = write_config(&CONFIG.replace("inertia = 0.01", "inertia = 0.0"));
    assert!(matches!(
        load_simulation(file.path(), 0),
        Err(SimError::Config(ConfigError::Param(_)))
    ));
}

#[test]
fn filter_section_selects_filter() {
    let file = write_config(&format!(
        "{CONFIG}\n[velocity_filter]\nkind = \"exponential\"\nalpha = 0.3\n"
    ));
    let sim = load_simulation(file.path(), 0).unwrap();
    assert!(sim.speed_controller().velocity_filter().is_some());
}
