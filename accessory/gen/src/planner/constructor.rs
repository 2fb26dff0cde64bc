//! The `new` constructor.

use accessory_define::Struct;

use super::{AttributeContext, docs};
use crate::ir::{Expr, MethodDescriptor, MethodKind, Parameter, Statement};

/// Required attributes come first, each in declared order. Every argument
/// is routed through its setter; an omitted optional argument keeps the
/// seeded default.
pub(super) fn plan(
    struct_name: &str,
    item: &Struct,
    contexts: &[AttributeContext<'_>],
) -> MethodDescriptor {
    let ordered: Vec<&AttributeContext<'_>> = item
        .constructor_order()
        .into_iter()
        .filter_map(|i| contexts.get(i))
        .collect();

    let parameters = ordered
        .iter()
        .map(|ctx| Parameter {
            name: ctx.names.parameter.clone(),
            ty: ctx.type_hint.clone(),
            default: if ctx.attribute.required {
                None
            } else {
                ctx.attribute.default_value()
            },
            optional: !ctx.attribute.required,
        })
        .collect();

    let mut body: Vec<Statement> = ordered
        .iter()
        .map(|ctx| Statement::Apply {
            setter: ctx.names.setter.clone(),
            argument: ctx.names.parameter.clone(),
            optional: !ctx.attribute.required,
        })
        .collect();
    body.push(Statement::Return(Expr::SelfRef));

    MethodDescriptor {
        kind: MethodKind::Constructor,
        name: "new".to_string(),
        parameters,
        body,
        documentation: docs::constructor_doc(struct_name, &ordered),
        attribute: None,
    }
}
