use serde::{Deserialize, Serialize};

/// A named numeric interval used to classify a continuous value into a
/// discrete filter option. Membership is half-open: `min <= value < max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub id: String,
    pub min: f64,
    pub max: f64,
}

impl RangeBucket {
    pub fn new(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            id: id.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

/// Half-open bucket lookup. A missing value or an id not present in the
/// table is a non-match, never an error.
pub fn value_in_bucket(value: Option<f64>, bucket_id: &str, table: &[RangeBucket]) -> bool {
    let Some(value) = value else {
        return false;
    };
    match table.iter().find(|b| b.id == bucket_id) {
        Some(bucket) => bucket.contains(value),
        None => false,
    }
}

/// The personal-rating variant: ratings on the 0–10 scale are integers in
/// practice, so the value rounds to the nearest whole number and its string
/// form is compared against the bucket id directly (closed single-point
/// buckets, no table).
pub fn rounded_matches_bucket(value: Option<f64>, bucket_id: &str) -> bool {
    match value {
        Some(v) => format!("{}", v.round() as i64) == bucket_id,
        None => false,
    }
}

/// The bucket tables the filter engine classifies against, one per
/// continuous dimension. Recomputed by external configuration; the engine
/// itself never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeTables {
    pub rating: Vec<RangeBucket>,
    pub file_size_kb: Vec<RangeBucket>,
    pub page_count: Vec<RangeBucket>,
    pub match_score: Vec<RangeBucket>,
}

impl Default for RangeTables {
    fn default() -> Self {
        Self {
            rating: vec![
                RangeBucket::new("under-2", 0.0, 2.0),
                RangeBucket::new("2-3", 2.0, 3.0),
                RangeBucket::new("3-4", 3.0, 4.0),
                RangeBucket::new("4-4.5", 4.0, 4.5),
                RangeBucket::new("4.5-5", 4.5, 5.5),
            ],
            file_size_kb: vec![
                RangeBucket::new("under-1mb", 0.0, 1024.0),
                RangeBucket::new("1-10mb", 1024.0, 10240.0),
                RangeBucket::new("10-50mb", 10240.0, 51200.0),
                RangeBucket::new("over-50mb", 51200.0, f64::INFINITY),
            ],
            page_count: vec![
                RangeBucket::new("under-200", 0.0, 200.0),
                RangeBucket::new("200-400", 200.0, 400.0),
                RangeBucket::new("400-600", 400.0, 600.0),
                RangeBucket::new("over-600", 600.0, f64::INFINITY),
            ],
            match_score: vec![
                RangeBucket::new("low", 0.0, 50.0),
                RangeBucket::new("medium", 50.0, 80.0),
                RangeBucket::new("high", 80.0, f64::INFINITY),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<RangeBucket> {
        vec![
            RangeBucket::new("a", 10.0, 20.0),
            RangeBucket::new("b", 20.0, 30.0),
        ]
    }

    #[test]
    fn test_half_open_membership() {
        let t = table();
        assert!(value_in_bucket(Some(10.0), "a", &t));
        assert!(value_in_bucket(Some(19.999), "a", &t));
        assert!(!value_in_bucket(Some(20.0), "a", &t));
        assert!(!value_in_bucket(Some(9.999), "a", &t));
        // The exact upper bound belongs to the next bucket.
        assert!(value_in_bucket(Some(20.0), "b", &t));
    }

    #[test]
    fn test_missing_value_or_bucket_is_non_match() {
        let t = table();
        assert!(!value_in_bucket(None, "a", &t));
        assert!(!value_in_bucket(Some(15.0), "nope", &t));
        assert!(!value_in_bucket(Some(15.0), "a", &[]));
    }

    #[test]
    fn test_rounded_bucket_match() {
        assert!(rounded_matches_bucket(Some(7.4), "7"));
        assert!(!rounded_matches_bucket(Some(7.4), "8"));
        assert!(rounded_matches_bucket(Some(7.5), "8"));
        assert!(rounded_matches_bucket(Some(10.0), "10"));
        assert!(rounded_matches_bucket(Some(0.2), "0"));
        assert!(!rounded_matches_bucket(None, "7"));
    }

    #[test]
    fn test_default_tables_are_ordered_and_disjoint() {
        let tables = RangeTables::default();
        for table in [
            &tables.rating,
            &tables.file_size_kb,
            &tables.page_count,
            &tables.match_score,
        ] {
            for pair in table.windows(2) {
                assert!(pair[0].min < pair[1].min);
                assert!(pair[0].max <= pair[1].min);
            }
        }
    }

    #[test]
    fn test_unbounded_top_bucket() {
        let tables = RangeTables::default();
        assert!(value_in_bucket(
            Some(1_000_000.0),
            "over-50mb",
            &tables.file_size_kb
        ));
    }
}
