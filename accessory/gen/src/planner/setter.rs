use super::{AttributeContext, docs};
use crate::ir::{Check, Expr, MethodDescriptor, MethodKind, Parameter, Statement, Validation};

const ITEM: &str = "item";

pub(super) fn plan(
    ctx: &AttributeContext<'_>,
    struct_name: &str,
    validation: bool,
) -> MethodDescriptor {
    let parameter = ctx.names.parameter.as_str();
    let local = local_name(parameter);
    let mut body = Vec::new();

    if validation {
        body.extend(guards(ctx, parameter));
    }

    let input = Expr::var(parameter);
    let converted = if ctx.attribute.is_array {
        Expr::conditional(
            Expr::IsList(Box::new(input.clone())),
            Expr::JoinList(Box::new(input.clone()), " ".to_string()),
            Expr::Null,
        )
    } else if ctx.attribute.is_xml {
        Expr::conditional(
            Expr::And(vec![
                Expr::IsXmlDocument(Box::new(input.clone())),
                Expr::HasXmlContent(Box::new(input.clone())),
            ]),
            Expr::SerializeXml(Box::new(input.clone())),
            input.clone(),
        )
    } else {
        input.clone()
    };
    body.push(Statement::Let {
        name: local.clone(),
        value: converted,
    });

    let assign = Statement::Assign {
        field: ctx.field.clone(),
        value: Expr::var(&local),
    };
    if ctx.attribute.removable_from_request {
        body.push(Statement::If {
            condition: Expr::Or(vec![
                Expr::is_null(input.clone()),
                Expr::And(vec![
                    Expr::IsList(Box::new(input.clone())),
                    Expr::IsEmpty(Box::new(input)),
                ]),
            ]),
            then: vec![Statement::Unset(ctx.field.clone())],
            otherwise: vec![assign],
        });
    } else {
        body.push(assign);
    }
    body.push(Statement::Return(Expr::SelfRef));

    MethodDescriptor {
        kind: MethodKind::Setter,
        name: ctx.names.setter.clone(),
        parameters: vec![Parameter {
            name: parameter.to_string(),
            ty: ctx.type_hint.clone(),
            default: None,
            optional: false,
        }],
        body,
        documentation: docs::setter_doc(ctx, struct_name, validation),
        attribute: Some(ctx.position),
    }
}

/// Guards of a setter. Array setters check each item; the choice check
/// always applies to the value as a whole.
fn guards(ctx: &AttributeContext<'_>, parameter: &str) -> Vec<Statement> {
    let mut guards = Vec::new();
    let choice: Vec<Check> = ctx.choice.iter().map(|r| r.check(parameter)).collect();

    if ctx.attribute.is_array {
        if !choice.is_empty() {
            guards.push(Statement::Guard(Validation::Chain(choice)));
        }
        if !ctx.rules.is_empty() {
            guards.push(Statement::Guard(Validation::EachItem {
                subject: parameter.to_string(),
                binding: ITEM.to_string(),
                checks: ctx.rules.iter().map(|r| r.check(ITEM)).collect(),
            }));
        }
    } else {
        let mut checks = choice;
        checks.extend(ctx.rules.iter().map(|r| r.check(parameter)));
        if !checks.is_empty() {
            guards.push(Statement::Guard(Validation::Chain(checks)));
        }
    }
    guards
}

/// Name of the converted local, distinct from the parameter.
fn local_name(parameter: &str) -> String {
    if parameter == "stored" {
        "stored_value".to_string()
    } else {
        "stored".to_string()
    }
}
