use std::time::Duration;

use sporlwatch::config::request_interval_for;

const DEFAULT: Duration = Duration::from_secs(1);

#[test]
fn test_rate_becomes_interval() {
    assert_eq!(request_interval_for(1.0, DEFAULT), Duration::from_secs(1));
    assert_eq!(request_interval_for(4.0, DEFAULT), Duration::from_millis(250));
}

#[test]
fn test_unusable_rates_fall_back_to_default() {
    assert_eq!(request_interval_for(0.0, DEFAULT), DEFAULT);
    assert_eq!(request_interval_for(-2.0, DEFAULT), DEFAULT);
    assert_eq!(request_interval_for(f64::NAN, DEFAULT), DEFAULT);
    // one request every 1e300 seconds overflows Duration
    assert_eq!(request_interval_for(1e-300, DEFAULT), DEFAULT);
}
