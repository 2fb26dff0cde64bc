use super::{AttributeContext, docs};
use crate::ir::{Check, Expr, MethodDescriptor, MethodKind, Parameter, Statement, TypeHint, Validation};

const ITEM: &str = "item";

/// Appends one item to an array attribute. The item passes the same rules
/// as each item given to the setter, plus the choice check.
pub(super) fn plan(
    ctx: &AttributeContext<'_>,
    struct_name: &str,
    validation: bool,
) -> MethodDescriptor {
    let mut body = Vec::new();
    if validation {
        let checks: Vec<Check> = ctx
            .choice
            .iter()
            .chain(&ctx.rules)
            .map(|r| r.check(ITEM))
            .collect();
        if !checks.is_empty() {
            body.push(Statement::Guard(Validation::Chain(checks)));
        }
    }
    body.push(Statement::Append {
        field: ctx.field.clone(),
        value: Expr::var(ITEM),
    });
    body.push(Statement::Return(Expr::SelfRef));

    MethodDescriptor {
        kind: MethodKind::AddTo,
        name: ctx.names.add_to.clone(),
        parameters: vec![Parameter {
            name: ITEM.to_string(),
            ty: TypeHint::Value(ctx.element_label()),
            default: None,
            optional: false,
        }],
        body,
        documentation: docs::add_to_doc(ctx, struct_name, validation),
        attribute: Some(ctx.position),
    }
}
