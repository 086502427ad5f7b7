use crate::domain::models::Measurement;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("add at least one power measurement first")]
    InsufficientData,
}

/// One point of the normalized polar series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramPoint {
    pub angle_rad: f64,
    pub gain_db: f64,
}

/// Angle-sorted, loop-closed polar series normalized against the session's
/// maximum power.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSeries {
    pub reference_power: f64,
    pub points: Vec<DiagramPoint>,
}

impl DiagramSeries {
    /// Lower radial bound for grid scaling, snapped down to a multiple of
    /// 5 dB.
    pub fn min_gain_floor(&self) -> i32 {
        let min_gain = self
            .points
            .iter()
            .map(|p| p.gain_db)
            .fold(f64::INFINITY, f64::min);
        ((min_gain / 5.0).floor() * 5.0) as i32
    }
}

/// Normalize a snapshot of measurements into a closed polar loop.
///
/// The reference is the maximum power seen; gains are `power - reference`,
/// sorted by angle ascending (stable on ties) with the first point repeated
/// at the end so the rendered loop closes.
pub fn prepare(measurements: &[Measurement]) -> Result<DiagramSeries, DiagramError> {
    if measurements.is_empty() {
        return Err(DiagramError::InsufficientData);
    }

    let reference_power = measurements
        .iter()
        .map(|m| m.power_dbm)
        .fold(f64::NEG_INFINITY, f64::max);

    let mut sorted: Vec<&Measurement> = measurements.iter().collect();
    sorted.sort_by_key(|m| m.angle_deg);

    let mut points: Vec<DiagramPoint> = sorted
        .iter()
        .map(|m| DiagramPoint {
            angle_rad: f64::from(m.angle_deg).to_radians(),
            gain_db: m.power_dbm - reference_power,
        })
        .collect();
    points.push(points[0]);

    Ok(DiagramSeries {
        reference_power,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement(angle_deg: u16, power_dbm: f64) -> Measurement {
        Measurement {
            angle_deg,
            power_dbm,
        }
    }

    #[test]
    fn prepare_requires_data() {
        assert_eq!(prepare(&[]), Err(DiagramError::InsufficientData));
    }

    #[test]
    fn prepare_normalizes_sorts_and_closes_the_loop() {
        let series = prepare(&[
            measurement(90, 5.0),
            measurement(0, 10.0),
            measurement(180, -3.0),
        ])
        .unwrap();

        assert_eq!(series.reference_power, 10.0);
        assert_eq!(series.points.len(), 4);

        let gains: Vec<f64> = series.points.iter().map(|p| p.gain_db).collect();
        assert_eq!(gains, vec![0.0, -5.0, -13.0, 0.0]);

        let angles: Vec<f64> = series.points.iter().map(|p| p.angle_rad).collect();
        assert_eq!(angles[0], 0.0);
        assert!((angles[1] - 90f64.to_radians()).abs() < 1e-12);
        assert!((angles[2] - 180f64.to_radians()).abs() < 1e-12);
        // Closing point repeats the first.
        assert_eq!(angles[3], angles[0]);
        assert_eq!(series.min_gain_floor(), -15);
    }

    #[test]
    fn single_measurement_yields_zero_gain_loop() {
        let series = prepare(&[measurement(0, 5.0)]).unwrap();
        assert_eq!(series.reference_power, 5.0);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].gain_db, 0.0);
        assert_eq!(series.min_gain_floor(), 0);
    }
}
