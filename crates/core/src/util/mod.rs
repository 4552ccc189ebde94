pub mod unit;

use std::cmp::Ordering;

/// A macro to measure the evaluation time of an expression. Wraps an
/// expression, logs how long it took to evaluate, and evaluates to the value
/// of the expression.
#[macro_export]
macro_rules! timed {
    ($label:expr, $ex:expr) => {
        $crate::timed!($label, log::Level::Debug, $ex)
    };
    ($label:expr, $log_level:expr, $ex:expr) => {{
        let now = std::time::Instant::now();
        let value = $ex;
        let elapsed = now.elapsed();
        log::log!(
            $log_level,
            "{} took {} µs",
            $label,
            elapsed.as_micros()
        );
        value
    }};
}

/// Compare two floats with a total ordering. NaN sorts above every other
/// value, so it never compares as the cheapest option anywhere we use this.
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Calculate the number of cells in a hexagon of the given radius. Radius 0
/// means 1 cell, 1 is 7 cells, 2 is 19, etc.
pub fn hexagon_len(radius: u16) -> usize {
    // 3r^2+3r+1: we start with one cell and add a ring of 6r cells for every
    // step after that: 1, (+6) 7, (+12) 19, (+18) 37, ...
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}

// Serialize a point-keyed map as a list of `[key, value]` entries instead of
// a map. Points generally shouldn't be used as serialized map keys, since JSON
// and other formats don't support complex keys.
pub mod serde_point_map_to_vec {
    use crate::CubePointIndexMap;
    use serde::{
        ser::SerializeSeq, Deserialize, Deserializer, Serialize, Serializer,
    };

    /// Serialize a point map as a list of entries, in iteration order
    pub fn serialize<T, S>(
        map: &CubePointIndexMap<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(map.len()))?;
        for entry in map.iter() {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }

    /// Deserialize a list of `[key, value]` entries back into a map. If a key
    /// appears more than once, the last value wins.
    pub fn deserialize<'de, T, D>(
        deserializer: D,
    ) -> Result<CubePointIndexMap<T>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let vec: Vec<(crate::CubePoint, T)> = Vec::deserialize(deserializer)?;
        Ok(vec.into_iter().collect())
    }
}
