//! LED patterns and the full demo cycle on the simulated board.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use rpi_outputs::adapters::sim::{SimBoard, SimHal};
use rpi_outputs::app::led_demo;
use rpi_outputs::config::LedDemoConfig;
use rpi_outputs::drivers::led_patterns::LedBank;
use rpi_outputs::{Error, HardwareOutputSession, Level};

use crate::mock_clock::MockClock;

const LEDS: [u8; 6] = [17, 27, 22, 23, 18, 10];
const MS: Duration = Duration::from_millis(1);

/// Waits in one full cycle of the default config, before the cycle pause.
const CYCLE_WAITS: usize = 270;
/// Waits spent inside the digital session of a cycle.
const DIGITAL_WAITS: usize = 65;

fn digital_session(board: &SimBoard) -> HardwareOutputSession<SimHal> {
    let config = LedDemoConfig::default();
    HardwareOutputSession::open(board.hal(), &config.digital_channels()).unwrap()
}

fn lit(frame: &[Level]) -> usize {
    frame.iter().filter(|&&l| l == Level::High).count()
}

fn assert_all_released(board: &SimBoard) {
    for id in LEDS {
        assert!(board.is_safe(id), "GPIO {} left driven", id);
        assert!(!board.is_claimed(id), "GPIO {} still claimed", id);
    }
}

#[test]
fn binary_counter_shows_each_count() {
    let board = SimBoard::new();
    let mut s = digital_session(&board);
    let mut clock = MockClock::new().watching(&board, &[17, 27, 22]);

    LedBank::new(&LEDS)
        .binary_counter(&mut s, 8, 800 * MS, &mut clock)
        .unwrap();

    assert_eq!(clock.frames.len(), 8);
    for (count, frame) in clock.frames.iter().enumerate() {
        let expected: Vec<Level> = (0..3).map(|bit| Level::from(count & (1 << bit) != 0)).collect();
        assert_eq!(frame, &expected, "count {}", count);
    }
    // 5 is 101: first and third LED lit, middle off.
    assert_eq!(clock.frames[5], vec![Level::High, Level::Low, Level::High]);
    assert_eq!(board.level(23), Level::Low);
}

#[test]
fn blink_alternates_whole_bank() {
    let board = SimBoard::new();
    let mut s = digital_session(&board);
    let mut clock = MockClock::new().watching(&board, &LEDS);

    LedBank::new(&LEDS).blink_all(&mut s, 3, 500 * MS, &mut clock).unwrap();

    assert_eq!(clock.frames.len(), 6);
    for (i, frame) in clock.frames.iter().enumerate() {
        let want = if i % 2 == 0 { LEDS.len() } else { 0 };
        assert_eq!(lit(frame), want, "frame {}", i);
    }
    assert_eq!(clock.total(), Duration::from_secs(3));
}

#[test]
fn chase_lights_exactly_one_in_order() {
    let board = SimBoard::new();
    let mut s = digital_session(&board);
    let mut clock = MockClock::new().watching(&board, &LEDS);

    LedBank::new(&LEDS).chase(&mut s, 2, 150 * MS, &mut clock).unwrap();

    assert_eq!(clock.frames.len(), 12);
    for (i, frame) in clock.frames.iter().enumerate() {
        assert_eq!(lit(frame), 1, "frame {}", i);
        assert_eq!(frame[i % LEDS.len()], Level::High);
    }
}

#[test]
fn wave_fills_then_drains_in_reverse() {
    let board = SimBoard::new();
    let mut s = digital_session(&board);
    let mut clock = MockClock::new().watching(&board, &LEDS);

    LedBank::new(&LEDS).wave(&mut s, 1, 100 * MS, &mut clock).unwrap();

    assert_eq!(clock.frames.len(), 12);
    for i in 0..6 {
        let frame = &clock.frames[i];
        assert!(frame[..=i].iter().all(|&l| l == Level::High));
        assert!(frame[i + 1..].iter().all(|&l| l == Level::Low));
    }
    for j in 0..6 {
        let frame = &clock.frames[6 + j];
        let on = 5 - j;
        assert!(frame[..on].iter().all(|&l| l == Level::High));
        assert!(frame[on..].iter().all(|&l| l == Level::Low));
    }
}

#[test]
fn random_blink_never_shows_an_empty_frame() {
    let board = SimBoard::new();
    let mut s = digital_session(&board);
    let mut clock = MockClock::new().watching(&board, &LEDS);
    let mut rng = StdRng::seed_from_u64(0x5eed);

    LedBank::new(&LEDS)
        .random_blink(&mut s, Duration::from_secs(3), 300 * MS, &mut rng, &mut clock)
        .unwrap();

    assert_eq!(clock.frames.len(), 10);
    for frame in &clock.frames {
        assert!(lit(frame) >= 1);
    }
}

#[test]
fn breathing_reaches_full_and_stops_pwm() {
    let board = SimBoard::new();
    let config = LedDemoConfig::default();
    let mut s = HardwareOutputSession::open(board.hal(), &config.pwm_channels()).unwrap();
    let mut clock = MockClock::new().watching(&board, &LEDS);

    LedBank::new(&LEDS)
        .breathing(&mut s, 1, 100, 2, 30 * MS, &mut clock)
        .unwrap();

    assert_eq!(clock.waits.len(), 102);
    assert!(clock.duties.iter().flatten().all(|&d| (0.0..=100.0).contains(&d)));
    assert!(clock.duties.iter().any(|d| d.iter().all(|&x| x == 100.0)));
    assert_eq!(clock.duties.first().unwrap(), &vec![0.0; 6]);
    for id in LEDS {
        assert!(!board.pwm_running(id));
        assert_eq!(board.pwm_frequency(id), None);
    }
    assert!(s.is_open());
}

#[test]
fn interrupted_breathing_still_stops_pwm() {
    let board = SimBoard::new();
    let config = LedDemoConfig::default();
    let mut s = HardwareOutputSession::open(board.hal(), &config.pwm_channels()).unwrap();
    let mut clock = MockClock::new().interrupt_at(40);

    let result = LedBank::new(&LEDS).breathing(&mut s, 2, 100, 2, 30 * MS, &mut clock);

    assert_eq!(result, Err(Error::Interrupted));
    for id in LEDS {
        assert!(!board.pwm_running(id));
        assert!(!s.is_pwm_running(id).unwrap());
    }
    drop(s);
    assert_all_released(&board);
}

#[test]
fn full_cycle_leaves_board_released() {
    let board = SimBoard::new();
    let config = LedDemoConfig::default();
    let mut clock = MockClock::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut open = || Ok::<_, Error>(board.hal());

    led_demo::run_cycle(&mut open, &config, &mut clock, &mut rng).unwrap();

    assert_eq!(clock.waits.len(), CYCLE_WAITS);
    assert_eq!(clock.total(), Duration::from_millis(28_720));
    assert_eq!(board.release_count(), 2);
    assert_all_released(&board);
}

/// Sessions opened by `run` before wait `k` is interrupted.
fn sessions_opened(k: usize) -> usize {
    let per_loop = CYCLE_WAITS + 1;
    let cycle = k / per_loop;
    let within = k % per_loop;
    2 * cycle + if within < DIGITAL_WAITS { 1 } else { 2 }
}

#[test]
fn interrupt_at_any_point_cleans_up() {
    for k in [0, 1, 7, 20, 45, 64, 65, 200, 269, 270, 271, 300, 400] {
        let board = SimBoard::new();
        let config = LedDemoConfig::default();
        let mut clock = MockClock::new().interrupt_at(k);
        let mut rng = StdRng::seed_from_u64(k as u64);

        let result = led_demo::run(|| Ok::<_, Error>(board.hal()), &config, &mut clock, &mut rng);

        assert_eq!(result, Err(Error::Interrupted), "k = {}", k);
        assert_eq!(clock.waits.len(), k);
        assert_eq!(board.release_count(), sessions_opened(k), "k = {}", k);
        assert_all_released(&board);
    }
}

#[test]
fn claim_failure_ends_demo_without_writes() {
    let board = SimBoard::new();
    board.fail_claim(18);
    let config = LedDemoConfig::default();
    let mut clock = MockClock::new();
    let mut rng = StdRng::seed_from_u64(3);

    let result = led_demo::run(|| Ok::<_, Error>(board.hal()), &config, &mut clock, &mut rng);

    assert!(matches!(
        result,
        Err(Error::HardwareInit {
            channel: Some(18),
            ..
        })
    ));
    assert!(clock.waits.is_empty());
    for id in LEDS {
        assert_eq!(board.level(id), Level::Low);
        assert!(!board.is_claimed(id));
    }
}
