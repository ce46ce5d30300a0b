//! Accumulating diagnostics over the validation rules.

use super::{SpecError, CHECKS};
use crate::spec::AutomatonSpec;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Run every rule independently, accumulating ALL failing rules.
///
/// Each rule still stops at its own first violation, so the result holds at
/// most one error per rule, in rule order. The first error is the one
/// [`super::validate`] reports; later ones may stem from data an earlier
/// failing rule already rejected.
pub fn diagnose(spec: &AutomatonSpec) -> Validation<(), NonEmptyVec<SpecError>> {
    let checks: Vec<Validation<(), NonEmptyVec<SpecError>>> = CHECKS
        .iter()
        .map(|(_, check)| match check(spec) {
            Ok(()) => Validation::success(()),
            Err(error) => Validation::fail(error),
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
