// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_only_moves_when_advanced() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
    assert_eq!(clock.epoch_ms(), 1_000);
    clock.advance(250);
    assert_eq!(clock.epoch_ms(), 1_250);
}

#[test]
fn system_clock_is_nonzero() {
    assert!(SystemClock.epoch_ms() > 0);
}
