//! Motor forward test on the simulated board.

use std::time::Duration;

use rpi_outputs::Error;
use rpi_outputs::adapters::sim::{HalCall, SimBoard};
use rpi_outputs::app::motor_test;
use rpi_outputs::config::MotorTestConfig;

use crate::mock_clock::MockClock;

// ENA, IN1, IN2, IN3, IN4, ENB
const MOTOR_PINS: [u8; 6] = [18, 17, 27, 22, 23, 10];

fn assert_all_released(board: &SimBoard) {
    for id in MOTOR_PINS {
        assert!(board.is_safe(id), "GPIO {} left driven", id);
        assert!(!board.is_claimed(id), "GPIO {} still claimed", id);
    }
}

#[test]
fn runs_forward_until_stopped_then_cleans_up() {
    let board = SimBoard::new();
    let config = MotorTestConfig::default();
    let mut clock = MockClock::new().interrupt_at(3).watching(&board, &MOTOR_PINS);

    let result = motor_test::run_forward_test(board.hal(), &config, &mut clock);

    assert_eq!(result, Err(Error::Interrupted));
    assert_eq!(clock.waits, vec![Duration::from_secs(1); 3]);
    for duties in &clock.duties {
        assert_eq!(duties[0], 15.0, "ENA");
        assert_eq!(duties[5], 15.0, "ENB");
    }
    for frame in &clock.frames {
        use rpi_outputs::Level::{High, Low};
        assert_eq!(&frame[1..5], &[High, Low, High, Low]);
    }
    assert_eq!(board.release_count(), 1);
    assert_all_released(&board);
}

#[test]
fn stop_zeroes_enables_before_close() {
    let board = SimBoard::new();
    let config = MotorTestConfig::default();
    let mut clock = MockClock::new().interrupt_at(1);

    let _ = motor_test::run_forward_test(board.hal(), &config, &mut clock);

    let calls = board.calls();
    let stop_ena = calls
        .iter()
        .position(|c| *c == HalCall::WriteDuty(18, 0.0))
        .expect("ENA zeroed");
    let first_stop_pwm = calls
        .iter()
        .position(|c| matches!(c, HalCall::StopPwm(_)))
        .expect("PWM stopped at close");
    assert!(stop_ena < first_stop_pwm);
    assert_eq!(calls.last(), Some(&HalCall::ReleaseAll));
}

#[test]
fn immediate_interrupt_still_cleans_up() {
    let board = SimBoard::new();
    let config = MotorTestConfig::default();
    let mut clock = MockClock::new().interrupt_at(0);

    let result = motor_test::run_forward_test(board.hal(), &config, &mut clock);

    assert_eq!(result, Err(Error::Interrupted));
    assert!(clock.waits.is_empty());
    assert_all_released(&board);
}

#[test]
fn busy_enable_pin_fails_before_any_write() {
    let board = SimBoard::new();
    board.fail_claim(10);
    let config = MotorTestConfig::default();
    let mut clock = MockClock::new();

    let result = motor_test::run_forward_test(board.hal(), &config, &mut clock);

    assert!(matches!(
        result,
        Err(Error::HardwareInit {
            channel: Some(10),
            ..
        })
    ));
    assert!(clock.waits.is_empty());
    let wrote = |c: &HalCall| {
        matches!(
            c,
            HalCall::WriteDigital(..) | HalCall::WriteDuty(..) | HalCall::StartPwm(..)
        )
    };
    assert!(!board.calls().iter().any(wrote));
    assert_all_released(&board);
}

#[test]
fn write_fault_on_open_is_an_init_error() {
    let board = SimBoard::new();
    board.fail_writes(22);
    let config = MotorTestConfig::default();
    let mut clock = MockClock::new();

    let result = motor_test::run_forward_test(board.hal(), &config, &mut clock);

    assert!(matches!(
        result,
        Err(Error::HardwareInit {
            channel: Some(22),
            ..
        })
    ));
    assert!(clock.waits.is_empty());
    for id in MOTOR_PINS {
        assert!(!board.is_claimed(id));
    }
}
