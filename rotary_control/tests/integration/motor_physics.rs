//! Open-loop plant behaviour: spin-up, friction lock, wrap bookkeeping.

use std::f64::consts::TAU;

use rotary_common::params::MotorParams;
use rotary_control::plant::RotaryMotor;
use rotary_control::sim::open_loop::{OpenLoopParams, simulate_motor};

const DT: f64 = 0.01;

fn reference_motor() -> RotaryMotor {
    RotaryMotor::new(MotorParams::new(0.01, 0.001, 1.0)).unwrap()
}

/// Full throttle on J=0.01, b=0.001, τ=1: v[n] = 1000·(1 − 0.999ⁿ) rad/s.
#[test]
fn full_throttle_spin_up_matches_closed_form() {
    let mut motor = reference_motor();
    let signal = vec![1.0; 1000];
    let mut velocities = Vec::with_capacity(signal.len());
    let report = simulate_motor(&mut motor, &signal, &OpenLoopParams::default(), |_, s| {
        velocities.push(s.velocity_deg_s.to_radians());
    })
    .unwrap();
    assert_eq!(report.steps, 1000);

    for pair in velocities.windows(2) {
        assert!(pair[1] > pair[0], "velocity not increasing: {pair:?}");
    }
    for (n, v) in velocities.iter().enumerate() {
        let expected = 1000.0 * (1.0 - 0.999_f64.powi(n as i32 + 1));
        assert!(
            (v - expected).abs() <= 1e-9 * expected.max(1.0),
            "step {n}: {v} vs {expected}"
        );
    }
}

#[test]
fn full_throttle_approaches_steady_state() {
    let mut motor = reference_motor();
    motor.set_throttle(1.0);
    let steady = 1.0 / 0.001;
    let mut prev = 0.0;
    for _ in 0..5000 {
        motor.update(DT);
        let v = motor.velocity_rad_s();
        assert!(v > prev && v < steady);
        prev = v;
    }
    assert!((steady - prev) / steady < 0.05, "v = {prev}");
}

#[test]
fn slow_shaft_locks_without_drift() {
    let mut motor =
        RotaryMotor::new(MotorParams::new(0.01, 0.001, 1.0).with_coulomb(0.01)).unwrap();
    motor.reset_to(1.0, 5e-5);
    for _ in 0..10_000 {
        motor.update(DT);
        assert_eq!(motor.velocity_rad_s(), 0.0);
        assert_eq!(motor.last_net_torque(), 0.0);
    }
    assert_eq!(motor.position_unwrapped_rad(), 1.0);
}

#[test]
fn sub_coulomb_disturbance_is_held() {
    let params = MotorParams::new(0.01, 0.001, 1.0)
        .with_coulomb(0.01)
        .with_external_torque(0.008);
    let mut motor = RotaryMotor::new(params).unwrap();
    for _ in 0..1000 {
        motor.update(DT);
    }
    assert_eq!(motor.velocity_rad_s(), 0.0);
    assert_eq!(motor.position_unwrapped_rad(), 0.0);

    // Raising the disturbance above the limit breaks the lock.
    motor.set_external_torque(0.02);
    motor.update(DT);
    assert!(motor.velocity_rad_s() > 0.0);
}

#[test]
fn wrapped_and_unwrapped_positions_agree() {
    for external in [0.0, -0.8] {
        let params = MotorParams::new(0.01, 0.001, 1.0).with_external_torque(external);
        let mut motor = RotaryMotor::new(params).unwrap();
        motor.set_throttle(0.5);
        for _ in 0..3000 {
            motor.update(DT);
            let wrapped = motor.position_rad();
            assert!((0.0..TAU).contains(&wrapped), "wrapped = {wrapped}");
            let turns = (motor.position_unwrapped_rad() - wrapped) / TAU;
            assert!((turns - turns.round()).abs() < 1e-6, "turns = {turns}");
            let deg = motor.position_deg();
            assert!((0.0..360.0).contains(&deg));
        }
        // several revolutions in either direction
        assert!(motor.position_unwrapped_rad().abs() > 2.0 * TAU);
    }
}
