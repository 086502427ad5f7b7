use crate::domain::models::Measurement;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file I/O failed: {0}")]
    IoFailure(#[from] std::io::Error),
    #[error("session file format invalid: {0}")]
    FormatError(String),
}

/// Durable record of one measurement session.
///
/// `angles_deg`, `powers_dBm` and `gains_dB` are index-aligned; gains equal
/// the raw powers when no reference power exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub angles_deg: Vec<u16>,
    #[serde(rename = "powers_dBm")]
    pub powers_dbm: Vec<f64>,
    pub reference_power: Option<f64>,
    #[serde(rename = "gains_dB")]
    pub gains_db: Vec<f64>,
}

impl SessionRecord {
    pub fn from_measurements(measurements: &[Measurement]) -> Self {
        let reference_power = if measurements.is_empty() {
            None
        } else {
            Some(
                measurements
                    .iter()
                    .map(|m| m.power_dbm)
                    .fold(f64::NEG_INFINITY, f64::max),
            )
        };

        let angles_deg: Vec<u16> = measurements.iter().map(|m| m.angle_deg).collect();
        let powers_dbm: Vec<f64> = measurements.iter().map(|m| m.power_dbm).collect();
        let gains_db: Vec<f64> = match reference_power {
            Some(reference) => powers_dbm.iter().map(|p| p - reference).collect(),
            None => powers_dbm.clone(),
        };

        Self {
            angles_deg,
            powers_dbm,
            reference_power,
            gains_db,
        }
    }

    pub fn to_measurements(&self) -> Vec<Measurement> {
        self.angles_deg
            .iter()
            .zip(&self.powers_dbm)
            .map(|(&angle_deg, &power_dbm)| Measurement {
                angle_deg,
                power_dbm,
            })
            .collect()
    }

    /// Write the record as pretty JSON; the file appears atomically (temp
    /// file then rename) so a failed save never leaves a partial record.
    pub fn save(&self, path: &Path) -> Result<PathBuf, SessionError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SessionError::FormatError(e.to_string()))?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!(path = %path.display(), "session saved");
        Ok(path.to_path_buf())
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let contents = fs::read_to_string(path)?;
        let record: SessionRecord = serde_json::from_str(&contents)
            .map_err(|e| SessionError::FormatError(e.to_string()))?;

        if record.powers_dbm.len() != record.angles_deg.len()
            || record.gains_db.len() != record.angles_deg.len()
        {
            return Err(SessionError::FormatError(
                "angle, power and gain arrays differ in length".into(),
            ));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("antenna_positioner_{}_{}.json", name, std::process::id()));
        path
    }

    #[test]
    fn record_from_single_measurement_normalizes_to_zero_gain() {
        let record = SessionRecord::from_measurements(&[Measurement {
            angle_deg: 0,
            power_dbm: 5.0,
        }]);

        assert_eq!(record.angles_deg, vec![0]);
        assert_eq!(record.powers_dbm, vec![5.0]);
        assert_eq!(record.reference_power, Some(5.0));
        assert_eq!(record.gains_db, vec![0.0]);
    }

    #[test]
    fn empty_record_has_no_reference_and_raw_gains() {
        let record = SessionRecord::from_measurements(&[]);
        assert_eq!(record.reference_power, None);
        assert!(record.gains_db.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch_path("roundtrip");
        let record = SessionRecord::from_measurements(&[
            Measurement {
                angle_deg: 0,
                power_dbm: 5.0,
            },
            Measurement {
                angle_deg: 90,
                power_dbm: -1.5,
            },
        ]);

        record.save(&path).unwrap();
        let loaded = SessionRecord::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.to_measurements().len(), 2);
    }

    #[test]
    fn load_rejects_malformed_json() {
        let path = scratch_path("malformed");
        fs::write(&path, "{not json").unwrap();
        let result = SessionRecord::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(SessionError::FormatError(_))));
    }

    #[test]
    fn load_rejects_misaligned_arrays() {
        let path = scratch_path("misaligned");
        fs::write(
            &path,
            r#"{"angles_deg":[0,90],"powers_dBm":[1.0],"reference_power":null,"gains_dB":[1.0]}"#,
        )
        .unwrap();
        let result = SessionRecord::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(SessionError::FormatError(_))));
    }
}
