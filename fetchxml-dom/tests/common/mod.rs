//! Shared helpers for integration tests.

use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TestLogger;

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
