//! Top-level run configuration.
//!
//! Every field has a default, so a partial JSON/TOML document deserializes
//! into a complete configuration.

use serde::{Deserialize, Serialize};

use crate::connect::ConnectCfg;
use crate::error::SetupError;
use crate::filter::FilterCfg;
use crate::search::SearchCfg;

/// Parameters for a full rupture-set build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildCfg {
    pub connect: ConnectCfg,
    pub search: SearchCfg,
    pub filters: FilterCfg,
    /// Parent ids whose sections are left out of every cluster.
    pub excluded_parents: Vec<u32>,
    /// Search clusters on the rayon pool. Output order is unaffected.
    pub parallel: bool,
}

impl Default for BuildCfg {
    fn default() -> Self {
        Self {
            connect: ConnectCfg::default(),
            search: SearchCfg::default(),
            filters: FilterCfg::default(),
            excluded_parents: Vec::new(),
            parallel: true,
        }
    }
}

impl BuildCfg {
    pub fn validate(&self) -> Result<(), SetupError> {
        self.connect.validate()?;
        self.search.validate()?;
        self.filters.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(BuildCfg::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: BuildCfg = serde_json::from_str(
            r#"{"connect": {"max_jump_distance_km": 3.0}, "excluded_parents": [4], "parallel": false}"#,
        )
        .unwrap();
        assert_eq!(cfg.connect.max_jump_distance_km, 3.0);
        assert_eq!(cfg.connect.tie_rel_eps, 1e-9);
        assert_eq!(cfg.search, SearchCfg::default());
        assert_eq!(cfg.filters, FilterCfg::default());
        assert_eq!(cfg.excluded_parents, vec![4]);
        assert!(!cfg.parallel);
    }

    #[test]
    fn nested_errors_surface() {
        let mut cfg = BuildCfg::default();
        cfg.search.max_ruptures_per_cluster = 0;
        assert!(matches!(cfg.validate(), Err(SetupError::InvalidConfig { .. })));
        let mut cfg = BuildCfg::default();
        cfg.connect.max_jump_distance_km = f64::NAN;
        assert!(cfg.validate().is_err());
    }
}
