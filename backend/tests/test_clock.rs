//! Tests for SimClock

use os_simulator_core_rs::SimClock;

#[test]
fn test_clock_starts_at_zero() {
    let clock = SimClock::new();
    assert_eq!(clock.now(), 0);
}

#[test]
fn test_tick_returns_unit_start() {
    let mut clock = SimClock::new();

    assert_eq!(clock.tick(), 0);
    assert_eq!(clock.tick(), 1);
    assert_eq!(clock.now(), 2);
}

#[test]
fn test_advance_by_burst() {
    let mut clock = SimClock::new();
    clock.tick();

    // A 5-unit burst starting at t=1 ends at t=6
    let start = clock.advance(5);
    assert_eq!(start, 1);
    assert_eq!(clock.now(), 6);
}

#[test]
fn test_jump_to_next_arrival() {
    let mut clock = SimClock::new();
    clock.advance(3);

    clock.jump_to(10);
    assert_eq!(clock.now(), 10);
}

#[test]
fn test_never_moves_backwards() {
    let mut clock = SimClock::new();
    clock.advance(8);

    clock.jump_to(8);
    assert_eq!(clock.now(), 8);

    clock.jump_to(2);
    assert_eq!(clock.now(), 8);
}
