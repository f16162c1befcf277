//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises one program flow
//! against the simulated board and a fake clock.  All tests run on the
//! host with no real GPIO required.

mod led_demo_tests;
mod mock_clock;
mod motor_test_tests;
