use super::format::FormatSpec;

/// Physical limits attached to a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limits {
    /// No constraint (string parameters).
    Unconstrained,
    /// Inclusive `[low, high]`; either end may be infinite.
    Interval { low: f64, high: f64 },
    /// An enumeration of admissible values, for `version` parameters.
    Allowed(&'static [f64]),
}

impl Limits {
    pub const fn interval(low: f64, high: f64) -> Self {
        Limits::Interval { low, high }
    }

    /// Bounds for range and grid checks. Only intervals bound anything.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Limits::Interval { low, high } => (*low, *high),
            Limits::Unconstrained | Limits::Allowed(_) => (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// Whether `value` is an admissible version number.
    pub fn admits(&self, value: f64) -> bool {
        match self {
            Limits::Allowed(set) => set.contains(&value),
            Limits::Interval { low, high } => *low <= value && value <= *high,
            Limits::Unconstrained => true,
        }
    }
}

/// One row of the parameter table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub format: FormatSpec,
    pub limits: Limits,
}

/// The simulation inputs checked before a run, in check order.
pub const PARAMETER_TABLE: [ParameterSpec; 7] = [
    ParameterSpec {
        name: "z",
        format: FormatSpec::LIST_FLOAT,
        limits: Limits::interval(0.0, 0.1),
    },
    ParameterSpec {
        name: "obsfile",
        format: FormatSpec::STR_FILE,
        limits: Limits::Unconstrained,
    },
    ParameterSpec {
        name: "astfile",
        format: FormatSpec::STR_FILE,
        limits: Limits::Unconstrained,
    },
    ParameterSpec {
        name: "logt",
        format: FormatSpec::LIST_FLOAT_GRID,
        limits: Limits::interval(f64::NEG_INFINITY, 10.15),
    },
    ParameterSpec {
        name: "avs",
        format: FormatSpec::LIST_FLOAT_GRID,
        limits: Limits::interval(0.0, f64::INFINITY),
    },
    ParameterSpec {
        name: "rvs",
        format: FormatSpec::LIST_FLOAT_GRID,
        limits: Limits::interval(1.0, 7.0),
    },
    ParameterSpec {
        name: "fAs",
        format: FormatSpec::LIST_FLOAT_GRID,
        limits: Limits::interval(0.0, 1.0),
    },
];

/// Look up a table row by name.
pub fn parameter_spec(name: &str) -> Option<&'static ParameterSpec> {
    PARAMETER_TABLE.iter().find(|p| p.name == name)
}
