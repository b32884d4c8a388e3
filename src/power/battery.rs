//! Battery state for the `#battery` and `#charging` template tokens.
//!
//! Most panels run on hosts without a battery; everything here degrades to
//! "0%, not charging" rather than erroring.

use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatteryStatus {
    pub percent: u8,
    pub charging: bool,
}

/// Reads the first battery exposed under the power supply class.
pub struct BatteryProbe {
    base: PathBuf,
}

impl Default for BatteryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl BatteryProbe {
    pub fn new() -> Self {
        Self {
            base: PathBuf::from("/sys/class/power_supply"),
        }
    }

    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn read(&self) -> BatteryStatus {
        self.find_battery().unwrap_or_default()
    }

    fn find_battery(&self) -> Option<BatteryStatus> {
        let mut supplies: Vec<PathBuf> = fs::read_dir(&self.base)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .collect();
        supplies.sort();

        for supply in supplies {
            match fs::read_to_string(supply.join("type")) {
                Ok(kind) if kind.trim() == "Battery" => {}
                _ => continue,
            }

            let percent = fs::read_to_string(supply.join("capacity"))
                .ok()
                .and_then(|value| value.trim().parse::<u8>().ok())
                .unwrap_or(0)
                .min(100);

            // "Full" means on external power, same as charging here
            let charging = fs::read_to_string(supply.join("status"))
                .map(|value| matches!(value.trim(), "Charging" | "Full"))
                .unwrap_or(false);

            return Some(BatteryStatus { percent, charging });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_supply(dir: &TempDir, name: &str, kind: &str, capacity: &str, status: &str) {
        let supply = dir.path().join(name);
        fs::create_dir(&supply).unwrap();
        fs::write(supply.join("type"), kind).unwrap();
        fs::write(supply.join("capacity"), capacity).unwrap();
        fs::write(supply.join("status"), status).unwrap();
    }

    #[test]
    fn missing_base_reads_as_no_battery() {
        let probe = BatteryProbe::with_base("/nonexistent/power_supply");
        assert_eq!(probe.read(), BatteryStatus::default());
    }

    #[test]
    fn reads_capacity_and_charging_state() {
        let dir = TempDir::new().unwrap();
        write_supply(&dir, "BAT0", "Battery\n", "73\n", "Charging\n");

        let probe = BatteryProbe::with_base(dir.path());
        assert_eq!(
            probe.read(),
            BatteryStatus {
                percent: 73,
                charging: true
            }
        );
    }

    #[test]
    fn full_counts_as_charging() {
        let dir = TempDir::new().unwrap();
        write_supply(&dir, "BAT0", "Battery", "100", "Full");

        let probe = BatteryProbe::with_base(dir.path());
        assert_eq!(
            probe.read(),
            BatteryStatus {
                percent: 100,
                charging: true
            }
        );
    }

    #[test]
    fn discharging_is_not_charging() {
        let dir = TempDir::new().unwrap();
        write_supply(&dir, "BAT0", "Battery", "42", "Discharging");

        let probe = BatteryProbe::with_base(dir.path());
        assert_eq!(
            probe.read(),
            BatteryStatus {
                percent: 42,
                charging: false
            }
        );
    }

    #[test]
    fn skips_non_battery_supplies() {
        let dir = TempDir::new().unwrap();
        write_supply(&dir, "AC", "Mains", "0", "");
        write_supply(&dir, "BAT0", "Battery", "55", "Discharging");

        let probe = BatteryProbe::with_base(dir.path());
        assert_eq!(probe.read().percent, 55);
    }

    #[test]
    fn unparseable_capacity_defaults_to_zero() {
        let dir = TempDir::new().unwrap();
        write_supply(&dir, "BAT0", "Battery", "wat", "Charging");

        let probe = BatteryProbe::with_base(dir.path());
        assert_eq!(
            probe.read(),
            BatteryStatus {
                percent: 0,
                charging: true
            }
        );
    }
}
