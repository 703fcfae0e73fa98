//! Variable naming of the input datasets.

use serde::{Deserialize, Serialize};

/// Names of the variables and files the loader looks for.
///
/// Defaults follow the GloFAS daily product and its return-period
/// threshold file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    /// Discharge variable in each daily file.
    pub discharge_var: String,
    pub lat_var: String,
    pub lon_var: String,
    pub time_var: String,
    pub q2_var: String,
    pub q5_var: String,
    pub q20_var: String,
    /// Extension of discharge files, without the dot.
    pub extension: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            discharge_var: "dis24".to_string(),
            lat_var: "lat".to_string(),
            lon_var: "lon".to_string(),
            time_var: "time".to_string(),
            q2_var: "Q_2".to_string(),
            q5_var: "Q_5".to_string(),
            q20_var: "Q_20".to_string(),
            extension: "nc".to_string(),
        }
    }
}

impl DatasetLayout {
    /// Threshold variable names in Q2, Q5, Q20 order.
    pub fn threshold_vars(&self) -> [&str; 3] {
        [&self.q2_var, &self.q5_var, &self.q20_var]
    }

    /// Name of the first empty field, if any.
    pub fn first_empty(&self) -> Option<&'static str> {
        [
            ("discharge_var", &self.discharge_var),
            ("lat_var", &self.lat_var),
            ("lon_var", &self.lon_var),
            ("time_var", &self.time_var),
            ("q2_var", &self.q2_var),
            ("q5_var", &self.q5_var),
            ("q20_var", &self.q20_var),
            ("extension", &self.extension),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let layout = DatasetLayout::default();
        assert_eq!(layout.discharge_var, "dis24");
        assert_eq!(layout.threshold_vars(), ["Q_2", "Q_5", "Q_20"]);
        assert_eq!(layout.first_empty(), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let layout: DatasetLayout = serde_yaml::from_str("discharge_var: dis\n").unwrap();
        assert_eq!(layout.discharge_var, "dis");
        assert_eq!(layout.lat_var, "lat");
    }

    #[test]
    fn test_first_empty() {
        let layout = DatasetLayout {
            q5_var: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(layout.first_empty(), Some("q5_var"));
    }
}
