use super::docs;
use crate::ir::{MethodDescriptor, MethodKind, Parameter, Statement, TypeHint};

const STATE: &str = "state";

pub(super) fn plan(struct_name: &str, parent: Option<&str>) -> MethodDescriptor {
    MethodDescriptor {
        kind: MethodKind::StateRestore,
        name: "fromState".to_string(),
        parameters: vec![Parameter {
            name: STATE.to_string(),
            ty: TypeHint::State,
            default: None,
            optional: false,
        }],
        body: vec![Statement::Restore {
            state: STATE.to_string(),
        }],
        documentation: docs::restore_doc(struct_name, parent),
        attribute: None,
    }
}
