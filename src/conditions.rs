//! Threshold predicates over single records, plus the heat index math they rely on.

use crate::types::condition::{Condition, ConditionSpec, ConditionThresholds};
use crate::types::daily_record::DailyRecord;

pub(crate) fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub(crate) fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub(crate) fn mph_to_kmh(mph: f64) -> f64 {
    mph * 1.609_344
}

pub(crate) fn inches_to_mm(inches: f64) -> f64 {
    inches * 25.4
}

/// Heat index in °C for an air temperature in °C and relative humidity in percent.
///
/// Follows the NWS procedure: Steadman's simple formula when the result stays
/// below 80 °F, otherwise the Rothfusz regression with its low- and
/// high-humidity adjustments. Returns `None` for non-finite input or humidity
/// outside [0, 100].
pub fn heat_index_c(temp_c: f64, rh_pct: f64) -> Option<f64> {
    if !temp_c.is_finite() || !rh_pct.is_finite() || !(0.0..=100.0).contains(&rh_pct) {
        return None;
    }
    let t = c_to_f(temp_c);
    let rh = rh_pct;

    let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
    if (simple + t) / 2.0 < 80.0 {
        return Some(f_to_c(simple));
    }

    let mut hi = -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
        - 0.224_755_41 * t * rh
        - 0.006_837_83 * t * t
        - 0.054_817_17 * rh * rh
        + 0.001_228_74 * t * t * rh
        + 0.000_852_82 * t * rh * rh
        - 0.000_001_99 * t * t * rh * rh;

    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }
    Some(f_to_c(hi))
}

/// Relative humidity (%) from air temperature and dew point, both °C (Magnus formula).
///
/// Dew points above the air temperature clamp to 100 %.
pub fn relative_humidity_from_dew_point(temp_c: f64, dew_point_c: f64) -> Option<f64> {
    const A: f64 = 17.625;
    const B: f64 = 243.04;
    if !temp_c.is_finite() || !dew_point_c.is_finite() {
        return None;
    }
    let rh = 100.0 * ((A * dew_point_c) / (B + dew_point_c)).exp()
        / ((A * temp_c) / (B + temp_c)).exp();
    rh.is_finite().then(|| rh.clamp(0.0, 100.0))
}

/// Per-record outcome for every condition.
///
/// `None` means the record lacks the input needed for that condition, which
/// is different from the condition not occurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConditionOutcomes([Option<bool>; Condition::ALL.len()]);

impl ConditionOutcomes {
    pub fn get(&self, condition: Condition) -> Option<bool> {
        self.0[condition.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Condition, Option<bool>)> + '_ {
        Condition::ALL.iter().map(move |c| (*c, self.get(*c)))
    }
}

/// Applies the configured condition specs to records.
#[derive(Debug, Clone)]
pub struct ConditionEvaluator {
    specs: [ConditionSpec; Condition::ALL.len()],
}

impl ConditionEvaluator {
    pub fn new(thresholds: &ConditionThresholds) -> Self {
        Self {
            specs: Condition::ALL.map(|c| c.spec(thresholds)),
        }
    }

    pub fn specs(&self) -> &[ConditionSpec] {
        &self.specs
    }

    pub fn evaluate(&self, record: &DailyRecord) -> ConditionOutcomes {
        ConditionOutcomes(self.specs.map(|spec| spec.test(record)))
    }
}
