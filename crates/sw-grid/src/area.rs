//! Area parameter records.

use crate::error::{GridError, GridResult};

/// Swing parameters of one grid area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaParams {
    pub name: String,
    /// Number of generators in the area (must be >= 1)
    pub generator_count: usize,
    /// Mechanical input power [p.u.]
    pub p_m: f64,
    /// Synchronizing coefficient [p.u.]
    pub b: f64,
    /// Intra-area coupling coefficient [p.u.]
    pub b_int: f64,
    /// Inter-area coupling strength [p.u.]
    pub epsilon: f64,
    /// Inter-area connection coefficient carried by parameter sheets.
    /// Informational only; the dynamics never read it.
    pub connection_coeff: Option<f64>,
    /// Map anchor (longitude, degrees)
    pub lon: Option<f64>,
    /// Map anchor (latitude, degrees)
    pub lat: Option<f64>,
}

impl AreaParams {
    pub fn new(
        name: impl Into<String>,
        generator_count: usize,
        p_m: f64,
        b: f64,
        b_int: f64,
        epsilon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            generator_count,
            p_m,
            b,
            b_int,
            epsilon,
            connection_coeff: None,
            lon: None,
            lat: None,
        }
    }

    /// Check the record for values the model cannot use.
    ///
    /// The equilibrium-angle domain (`|p_m / b| <= 1`) is checked separately
    /// when initial conditions are built.
    pub fn validate(&self) -> GridResult<()> {
        let invalid = |what: &'static str| GridError::InvalidArea {
            area: self.name.clone(),
            what,
        };
        if self.generator_count == 0 {
            return Err(invalid("generator count must be at least 1"));
        }
        if !self.p_m.is_finite() {
            return Err(invalid("p_m must be finite"));
        }
        if !self.b.is_finite() {
            return Err(invalid("b must be finite"));
        }
        if !self.b_int.is_finite() {
            return Err(invalid("b_int must be finite"));
        }
        if !self.epsilon.is_finite() {
            return Err(invalid("epsilon must be finite"));
        }
        Ok(())
    }
}

/// Ordered, immutable table of areas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaTable {
    areas: Vec<AreaParams>,
}

impl AreaTable {
    /// Build a table, validating every record.
    pub fn new(areas: Vec<AreaParams>) -> GridResult<Self> {
        for area in &areas {
            area.validate()?;
        }
        Ok(Self { areas })
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AreaParams> {
        self.areas.get(index)
    }

    pub fn areas(&self) -> &[AreaParams] {
        &self.areas
    }

    pub fn names(&self) -> Vec<&str> {
        self.areas.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn generator_counts(&self) -> Vec<usize> {
        self.areas.iter().map(|a| a.generator_count).collect()
    }

    pub fn p_m(&self) -> Vec<f64> {
        self.areas.iter().map(|a| a.p_m).collect()
    }

    pub fn b(&self) -> Vec<f64> {
        self.areas.iter().map(|a| a.b).collect()
    }

    pub fn b_int(&self) -> Vec<f64> {
        self.areas.iter().map(|a| a.b_int).collect()
    }

    pub fn epsilon(&self) -> Vec<f64> {
        self.areas.iter().map(|a| a.epsilon).collect()
    }

    /// Restrict the table to the given original indices, in the given order.
    pub fn subset(&self, indices: &[usize]) -> GridResult<Self> {
        let areas = indices
            .iter()
            .map(|&i| {
                self.areas.get(i).cloned().ok_or(GridError::AreaOutOfRange {
                    index: i,
                    len: self.areas.len(),
                })
            })
            .collect::<GridResult<Vec<_>>>()?;
        Ok(Self { areas })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(name: &str, n: usize) -> AreaParams {
        AreaParams::new(name, n, 0.95, 1.0, 100.0, 0.1)
    }

    #[test]
    fn zero_generators_rejected() {
        let err = AreaTable::new(vec![area("A", 1), area("B", 0)]).unwrap_err();
        assert!(matches!(err, GridError::InvalidArea { ref area, .. } if area == "B"));
    }

    #[test]
    fn non_finite_parameter_rejected() {
        let mut a = area("A", 3);
        a.b_int = f64::NAN;
        assert!(a.validate().is_err());
    }

    #[test]
    fn subset_preserves_requested_order() {
        let table = AreaTable::new(vec![area("A", 1), area("B", 2), area("C", 3)]).unwrap();
        let sub = table.subset(&[2, 0]).unwrap();
        assert_eq!(sub.names(), vec!["C", "A"]);
        assert_eq!(sub.generator_counts(), vec![3, 1]);
        assert!(table.subset(&[5]).is_err());
    }
}
