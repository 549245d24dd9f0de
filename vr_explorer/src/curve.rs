use serde::{Deserialize, Serialize};

use crate::error::{VrError, VrResult};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear float curve, flat beyond its first and last keys.
/// Used to map speed to the blinker radius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct ResponseCurve {
    keys: Vec<CurveKey>,
}

impl ResponseCurve {
    pub fn new(mut keys: Vec<CurveKey>) -> VrResult<Self> {
        if keys.is_empty() {
            return Err(VrError::validation("response curve", "needs at least one key"));
        }

        if keys
            .iter()
            .any(|k| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(VrError::validation(
                "response curve",
                "keys must be finite numbers",
            ));
        }

        keys.sort_by(|a, b| a.time.total_cmp(&b.time));

        if keys.windows(2).any(|pair| pair[0].time == pair[1].time) {
            return Err(VrError::validation(
                "response curve",
                "two keys share the same time",
            ));
        }

        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn evaluate(&self, time: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];

        if time.is_nan() || time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; the clamps above keep it in 1..len
        let upper = self.keys.partition_point(|k| k.time <= time);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];

        let alpha = (time - a.time) / (b.time - a.time);
        a.value + (b.value - a.value) * alpha
    }
}

impl TryFrom<Vec<CurveKey>> for ResponseCurve {
    type Error = VrError;

    fn try_from(keys: Vec<CurveKey>) -> Result<Self, Self::Error> {
        ResponseCurve::new(keys)
    }
}

impl From<ResponseCurve> for Vec<CurveKey> {
    fn from(curve: ResponseCurve) -> Self {
        curve.keys
    }
}
