mod battery;

pub use battery::{BatteryProbe, BatteryStatus};
