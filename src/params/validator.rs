//! Format and physical-range checks for simulation inputs.
//!
//! Checks run as ordered, independent guard clauses keyed on the declared
//! [`FormatSpec`]: the `list` capability first, then `string`, then
//! `version`. The first error ends validation. Warnings are logged, kept in
//! the returned report, and do not stop anything.

use std::path::Path;

use crate::error::{RangeViolation, ValidationError, ValidationWarning};

use super::format::FormatSpec;
use super::table::{Limits, PARAMETER_TABLE, ParameterSpec};
use super::value::{ParamValue, ParameterBundle};

/// Warnings collected by a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True when nothing at all was flagged.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check every parameter of [`PARAMETER_TABLE`] in table order.
pub fn verify_all(bundle: &ParameterBundle) -> Result<ValidationReport, ValidationError> {
    verify_with_table(bundle, &PARAMETER_TABLE)
}

/// Check `bundle` against an arbitrary parameter table, in its order.
pub fn verify_with_table(
    bundle: &ParameterBundle,
    table: &[ParameterSpec],
) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::default();
    for spec in table {
        let warnings = verify_one(bundle.get(spec.name), spec.name, spec.format, &spec.limits)?;
        report.warnings.extend(warnings);
    }
    log::debug!(
        "validated {} parameters ({} warnings)",
        table.len(),
        report.warnings.len()
    );
    Ok(report)
}

/// Check a single parameter value against its declared format and limits.
pub fn verify_one(
    value: &ParamValue,
    name: &str,
    format: FormatSpec,
    limits: &Limits,
) -> Result<Vec<ValidationWarning>, ValidationError> {
    log::debug!("checking {name} ({format}) = {value:?}");
    let mut warnings = Vec::new();

    if format.list {
        match value {
            ParamValue::List(items) => {
                if format.float {
                    let values = value.as_float_list().ok_or_else(|| {
                        let offender = items
                            .iter()
                            .find(|item| !matches!(item, ParamValue::Float(_)))
                            .unwrap_or(value);
                        wrong_kind(name, "list of floats", offender)
                    })?;
                    if format.grid {
                        warnings.extend(check_grid(&values, name, limits)?);
                    } else {
                        verify_range(&values, name, limits)?;
                    }
                }
            }
            ParamValue::Unset => {
                warnings.push(warn(ValidationWarning::Undefined {
                    name: name.to_string(),
                }));
                return Ok(warnings);
            }
            _ => return Err(wrong_kind(name, "a list", value)),
        }
    }

    if format.string {
        let ParamValue::Text(path) = value else {
            return Err(wrong_kind(name, "a string", value));
        };
        if format.file && !Path::new(path).exists() {
            return Err(ValidationError::NotFound {
                name: name.to_string(),
                path: path.into(),
            });
        }
    }

    if format.version {
        let ParamValue::Float(version) = value else {
            return Err(wrong_kind(name, "a float", value));
        };
        if !limits.admits(*version) {
            return Err(ValidationError::format(
                name,
                format!("{version} is not a known isochrone version"),
            ));
        }
    }

    Ok(warnings)
}

fn wrong_kind(name: &str, expected: &str, found: &ParamValue) -> ValidationError {
    ValidationError::format(name, format!("{expected}, got {}", found.kind()))
}

/// Every element must lie inside the limits.
pub fn verify_range(values: &[f64], name: &str, limits: &Limits) -> Result<(), ValidationError> {
    let (low, high) = limits.bounds();
    if values.iter().any(|&v| v < low) {
        return Err(ValidationError::range(name, RangeViolation::BelowMinimum));
    }
    if values.iter().any(|&v| v > high) {
        return Err(ValidationError::range(name, RangeViolation::AboveMaximum));
    }
    Ok(())
}

/// Check a `[min, max, step]` grid against the limits.
pub fn check_grid(
    values: &[f64],
    name: &str,
    limits: &Limits,
) -> Result<Option<ValidationWarning>, ValidationError> {
    let &[min, max, step] = values else {
        return Err(ValidationError::format(name, "a [min, max, step] grid"));
    };
    let (low, high) = limits.bounds();

    if min < low {
        return Err(ValidationError::range(name, RangeViolation::BelowMinimum));
    }
    if max > high {
        return Err(ValidationError::range(name, RangeViolation::AboveMaximum));
    }
    if min > max {
        return Err(ValidationError::range(name, RangeViolation::MinAboveMax));
    }
    if max - min < step {
        if max == min {
            return Ok(Some(warn(ValidationWarning::DegenerateGrid {
                name: name.to_string(),
            })));
        }
        return Err(ValidationError::range(name, RangeViolation::StepTooCoarse));
    }
    Ok(None)
}

fn warn(warning: ValidationWarning) -> ValidationWarning {
    log::warn!("{warning}");
    warning
}

#[cfg(test)]
mod tests {
    use super::*;

    const Z_LIMITS: Limits = Limits::interval(0.0, 0.1);

    fn grid(min: f64, max: f64, step: f64) -> ParamValue {
        ParamValue::from(vec![min, max, step])
    }

    #[test]
    fn single_valued_grid_warns() {
        let warnings =
            verify_one(&grid(0.0, 0.0, 0.01), "fAs", FormatSpec::LIST_FLOAT_GRID, &Z_LIMITS)
                .unwrap();
        assert_eq!(
            warnings,
            vec![ValidationWarning::DegenerateGrid { name: "fAs".into() }]
        );
    }

    #[test]
    fn coarse_step_fails() {
        let err = verify_one(&grid(0.0, 0.005, 0.01), "fAs", FormatSpec::LIST_FLOAT_GRID, &Z_LIMITS)
            .unwrap_err();
        assert_eq!(err, ValidationError::range("fAs", RangeViolation::StepTooCoarse));
    }

    #[test]
    fn inverted_grid_fails() {
        let err = verify_one(
            &grid(5.0, 1.0, 0.1),
            "avs",
            FormatSpec::LIST_FLOAT_GRID,
            &Limits::interval(0.0, f64::INFINITY),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::range("avs", RangeViolation::MinAboveMax));
    }

    #[test]
    fn grid_bounds_checked_before_order() {
        let limits = Limits::interval(1.0, 7.0);
        let err = check_grid(&[0.5, 8.0, 0.5], "rvs", &limits).unwrap_err();
        assert_eq!(err, ValidationError::range("rvs", RangeViolation::BelowMinimum));
        let err = check_grid(&[9.0, 8.0, 0.5], "rvs", &limits).unwrap_err();
        assert_eq!(err, ValidationError::range("rvs", RangeViolation::AboveMaximum));
    }

    #[test]
    fn grid_needs_three_values() {
        let err = check_grid(&[0.0, 1.0], "logt", &Limits::Unconstrained).unwrap_err();
        assert!(matches!(err, ValidationError::Format { .. }));
    }

    #[test]
    fn plain_list_range() {
        let z = ParamValue::from(vec![0.03, 0.2]);
        let err = verify_one(&z, "z", FormatSpec::LIST_FLOAT, &Z_LIMITS).unwrap_err();
        assert_eq!(err, ValidationError::range("z", RangeViolation::AboveMaximum));

        let z = ParamValue::from(vec![0.03, 0.019]);
        assert!(verify_one(&z, "z", FormatSpec::LIST_FLOAT, &Z_LIMITS).unwrap().is_empty());
    }

    #[test]
    fn unset_list_warns_and_stops() {
        let warnings =
            verify_one(&ParamValue::Unset, "z", FormatSpec::LIST_FLOAT, &Z_LIMITS).unwrap();
        assert_eq!(warnings, vec![ValidationWarning::Undefined { name: "z".into() }]);

        // `list_str` would reject an unset string, but unset lists stop early.
        let both: FormatSpec = "list_str".parse().unwrap();
        assert!(verify_one(&ParamValue::Unset, "z", both, &Limits::Unconstrained).is_ok());
    }

    #[test]
    fn non_list_fails_format() {
        let err =
            verify_one(&ParamValue::Float(0.02), "z", FormatSpec::LIST_FLOAT, &Z_LIMITS).unwrap_err();
        assert_eq!(err, ValidationError::format("z", "a list, got float"));
    }

    #[test]
    fn integers_are_not_floats() {
        let v = ParamValue::from(vec![1i64, 2, 1]);
        let err = verify_one(&v, "rvs", FormatSpec::LIST_FLOAT_GRID, &Limits::Unconstrained)
            .unwrap_err();
        assert_eq!(err, ValidationError::format("rvs", "list of floats, got integer"));
    }

    #[test]
    fn list_and_string_checks_both_run() {
        let both: FormatSpec = "list_str".parse().unwrap();
        let err = verify_one(
            &ParamValue::from(vec![1.0]),
            "odd",
            both,
            &Limits::Unconstrained,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::format("odd", "a string, got list"));
    }

    #[test]
    fn version_membership() {
        let limits = Limits::Allowed(&[1.0, 2.0, 3.0]);
        assert!(verify_one(&ParamValue::Float(2.0), "oiso", FormatSpec::VERSION, &limits).is_ok());

        let err =
            verify_one(&ParamValue::Float(2.5), "oiso", FormatSpec::VERSION, &limits).unwrap_err();
        assert!(matches!(err, ValidationError::Format { .. }));

        let err =
            verify_one(&ParamValue::Int(2), "oiso", FormatSpec::VERSION, &limits).unwrap_err();
        assert_eq!(err, ValidationError::format("oiso", "a float, got integer"));
    }

    #[test]
    fn file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("obs.fits");
        std::fs::write(&present, b"").unwrap();

        let ok = ParamValue::from(present.to_string_lossy().into_owned());
        assert!(verify_one(&ok, "obsfile", FormatSpec::STR_FILE, &Limits::Unconstrained).is_ok());

        let missing = ParamValue::from(dir.path().join("nope.fits").to_string_lossy().into_owned());
        let err = verify_one(&missing, "obsfile", FormatSpec::STR_FILE, &Limits::Unconstrained)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NotFound { .. }));
        assert!(err.to_string().contains("obsfile"));
    }

    #[test]
    fn file_parameter_must_be_text() {
        let err = verify_one(
            &ParamValue::Unset,
            "astfile",
            FormatSpec::STR_FILE,
            &Limits::Unconstrained,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::format("astfile", "a string, got unset"));
    }
}
