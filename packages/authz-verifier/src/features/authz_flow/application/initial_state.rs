//! Entry-state seeding from parameter annotations
//!
//! An annotation states that the framework already enforced a relation on a
//! parameter before the entry point runs:
//! - `(X, R)`: R at X
//! - `(X, R, id-parameter Y)`: R at X and at Y
//! - `(X, R, list form)`: R at the element summary of X

use super::resolution::{Frame, OperandResolver};
use crate::features::permissions::AuthorizationLattice;
use crate::features::points_to::{ProgramPoint, Reference};
use crate::shared::models::ParameterAnnotation;

pub fn build_initial_state(
    frame: &Frame<'_>,
    annotations: &[ParameterAnnotation],
    operands: &OperandResolver<'_>,
    point: ProgramPoint,
) -> AuthorizationLattice {
    annotations
        .iter()
        .fold(AuthorizationLattice::bottom(), |state, annotation| {
            let permission = operands.annotation_permission(&annotation.relation);

            let parameter = Reference::parameter(annotation.parameter.as_str());
            let target = if annotation.list_form {
                Reference::element_of(parameter)
            } else {
                parameter
            };

            let mut locations = operands.reference_locations(frame, &target, point);
            if let Some(id_parameter) = &annotation.id_parameter {
                locations.extend(operands.reference_locations(
                    frame,
                    &Reference::parameter(id_parameter.as_str()),
                    point,
                ));
            }

            locations.into_iter().fold(state, |acc, location| {
                acc.join(&AuthorizationLattice::singleton(location, permission.clone()))
            })
        })
}
