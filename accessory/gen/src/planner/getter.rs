use accessory_define::Literal;

use super::{AttributeContext, docs};
use crate::ir::{Expr, MethodDescriptor, MethodKind, Parameter, Statement, TypeHint};

const VALUE: &str = "value";
const DOCUMENT: &str = "document";
const AS_STRING: &str = "asString";

pub(super) fn plan(ctx: &AttributeContext<'_>, struct_name: &str) -> MethodDescriptor {
    let read = || {
        if ctx.attribute.removable_from_request {
            Expr::FieldOrNull(ctx.field.clone())
        } else {
            Expr::Field(ctx.field.clone())
        }
    };

    let mut body = vec![Statement::Let {
        name: VALUE.to_string(),
        value: read(),
    }];
    let mut parameters = Vec::new();

    if ctx.attribute.is_xml {
        let value = Expr::var(VALUE);
        // A stored XML string is upgraded to a document in place.
        body.push(Statement::If {
            condition: Expr::And(vec![
                Expr::not_null(value.clone()),
                Expr::not(Expr::IsXmlDocument(Box::new(value.clone()))),
                Expr::not(Expr::IsEmpty(Box::new(value.clone()))),
            ]),
            then: vec![
                Statement::Let {
                    name: DOCUMENT.to_string(),
                    value: Expr::ParseXml(Box::new(value.clone())),
                },
                Statement::If {
                    condition: Expr::not_null(Expr::var(DOCUMENT)),
                    then: vec![Statement::Assign {
                        field: ctx.field.clone(),
                        value: Expr::var(DOCUMENT),
                    }],
                    otherwise: Vec::new(),
                },
            ],
            otherwise: Vec::new(),
        });
        body.push(Statement::Let {
            name: VALUE.to_string(),
            value: read(),
        });
        body.push(Statement::Return(Expr::conditional(
            Expr::And(vec![
                Expr::Flag(AS_STRING.to_string()),
                Expr::IsXmlDocument(Box::new(value.clone())),
                Expr::HasXmlContent(Box::new(value.clone())),
            ]),
            Expr::SerializeXml(Box::new(value.clone())),
            value,
        )));
        parameters.push(Parameter {
            name: AS_STRING.to_string(),
            ty: TypeHint::Flag,
            default: Some(Literal::Bool(true)),
            optional: true,
        });
    } else {
        body.push(Statement::Return(Expr::var(VALUE)));
    }

    MethodDescriptor {
        kind: MethodKind::Getter,
        name: ctx.names.getter.clone(),
        parameters,
        body,
        documentation: docs::getter_doc(ctx, struct_name),
        attribute: Some(ctx.position),
    }
}
