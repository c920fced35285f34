use std::thread;
use std::time::Duration;

use log::info;

/// Fixed politeness pause between requests to the archive.
pub fn polite_delay(delay: Duration) {
    if delay.is_zero() {
        return;
    }
    info!("Waiting for {:.1} seconds before the next request...", delay.as_secs_f64());
    thread::sleep(delay);
}
