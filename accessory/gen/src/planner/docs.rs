//! Documentation blocks for generated methods and properties.
//!
//! Blocks are built from the attribute itself (its flags, restriction and
//! choice group), never from the generated method name.

use super::AttributeContext;
use crate::naming::type_name;

/// A structured documentation block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Documentation {
    pub summary: String,
    pub notes: Vec<String>,
    pub tags: Vec<DocTag>,
}

/// A tagged documentation line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// Another item the method relies on.
    Uses(String),
    Param {
        name: String,
        ty: String,
        description: Option<String>,
    },
    Return(String),
    /// Error variant the method may return.
    Throws(String),
    See(String),
}

impl Documentation {
    pub fn builder(summary: impl Into<String>) -> DocBuilder {
        DocBuilder {
            doc: Documentation {
                summary: summary.into(),
                ..Documentation::default()
            },
        }
    }

    pub fn throws(&self, variant: &str) -> bool {
        self.tags
            .iter()
            .any(|t| matches!(t, DocTag::Throws(v) if v == variant))
    }

    pub fn uses(&self, item: &str) -> bool {
        self.tags.iter().any(|t| matches!(t, DocTag::Uses(u) if u == item))
    }

    /// Renders the block as rustdoc lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.summary.clone()];
        for note in &self.notes {
            lines.push(String::new());
            lines.push(note.clone());
        }

        let params: Vec<String> = self
            .tags
            .iter()
            .filter_map(|t| match t {
                DocTag::Param {
                    name,
                    ty,
                    description,
                } => Some(match description {
                    Some(d) => format!("* `{name}` - `{ty}`: {d}"),
                    None => format!("* `{name}` - `{ty}`"),
                }),
                _ => None,
            })
            .collect();
        push_section(&mut lines, "Arguments", params);

        let returns: Vec<String> = self
            .tags
            .iter()
            .filter_map(|t| match t {
                DocTag::Return(r) => Some(r.clone()),
                _ => None,
            })
            .collect();
        push_section(&mut lines, "Returns", returns);

        let errors: Vec<String> = self
            .tags
            .iter()
            .filter_map(|t| match t {
                DocTag::Throws(variant) => Some(format!("* `AccessorError::{variant}`")),
                _ => None,
            })
            .collect();
        push_section(&mut lines, "Errors", errors);

        let uses: Vec<String> = self
            .tags
            .iter()
            .filter_map(|t| match t {
                DocTag::Uses(item) => Some(format!("* uses `{item}`")),
                DocTag::See(item) => Some(format!("* see `{item}`")),
                _ => None,
            })
            .collect();
        push_section(&mut lines, "See Also", uses);

        lines
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, body: Vec<String>) {
    if body.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("## {title}"));
    lines.push(String::new());
    lines.extend(body);
}

/// Builder for [`Documentation`].
#[derive(Debug)]
pub struct DocBuilder {
    doc: Documentation,
}

impl DocBuilder {
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.doc.notes.push(note.into());
        self
    }

    pub fn note_if(self, condition: bool, note: impl Into<String>) -> Self {
        if condition { self.note(note) } else { self }
    }

    pub fn maybe_note(self, note: Option<&str>) -> Self {
        match note {
            Some(n) if !n.trim().is_empty() => self.note(n.trim()),
            _ => self,
        }
    }

    pub fn tag(mut self, tag: DocTag) -> Self {
        if !self.doc.tags.contains(&tag) {
            self.doc.tags.push(tag);
        }
        self
    }

    pub fn uses(self, item: impl Into<String>) -> Self {
        self.tag(DocTag::Uses(item.into()))
    }

    pub fn param(self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.tag(DocTag::Param {
            name: name.into(),
            ty: ty.into(),
            description: None,
        })
    }

    pub fn param_described(
        self,
        name: impl Into<String>,
        ty: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.tag(DocTag::Param {
            name: name.into(),
            ty: ty.into(),
            description: Some(description.into()),
        })
    }

    pub fn returns(self, what: impl Into<String>) -> Self {
        self.tag(DocTag::Return(what.into()))
    }

    pub fn throws(self, variant: impl Into<String>) -> Self {
        self.tag(DocTag::Throws(variant.into()))
    }

    pub fn see(self, item: impl Into<String>) -> Self {
        self.tag(DocTag::See(item.into()))
    }

    pub fn build(self) -> Documentation {
        self.doc
    }
}

const REMOVABLE_SET_NOTE: &str = "This property is removable from request (nillable and optional), \
     therefore if the value assigned to this property is null or an empty sequence, it is removed from this object.";
const REMOVABLE_GET_NOTE: &str = "This property may have been removed before, as it is removable from request \
     (nillable and optional); a removed property reads as null.";
const CHOICE_NOTE: &str = "This property belongs to a choice that allows only one property to exist.";
const ARRAY_SET_NOTE: &str = "A sequence is stored as a single string, its items joined by one space.";

/// Helpers of the restriction an attribute references, if any.
fn restriction_helpers(ctx: &AttributeContext<'_>) -> Vec<String> {
    ctx.restriction
        .as_ref()
        .map(|r| {
            let ty = type_name(&r.name);
            vec![format!("{ty}::value_is_valid"), format!("{ty}::valid_values")]
        })
        .unwrap_or_default()
}

pub(crate) fn property_doc(ctx: &AttributeContext<'_>) -> Documentation {
    Documentation::builder(format!("The {}", ctx.attribute.raw_name))
        .maybe_note(ctx.attribute.documentation.as_deref())
        .note_if(ctx.attribute.removable_from_request, "Removable from request.")
        .build()
}

pub(crate) fn getter_doc(ctx: &AttributeContext<'_>, struct_name: &str) -> Documentation {
    let mut builder = Documentation::builder(format!("Get {} value", ctx.names.method))
        .maybe_note(ctx.attribute.documentation.as_deref())
        .note_if(ctx.attribute.removable_from_request, REMOVABLE_GET_NOTE);

    if ctx.attribute.is_xml {
        builder = builder
            .uses("accessory::xml::parse")
            .uses("XmlDocument::has_content")
            .uses("XmlDocument::serialize_first_child")
            .uses(format!("{struct_name}::{}", ctx.names.setter))
            .param_described(
                "asString",
                "bool",
                "true (default): returns the XML string, false: returns the XML document",
            );
    }
    if !ctx.attribute.removable_from_request {
        builder = builder.throws("UnsetField");
    }
    let returns = if ctx.attribute.removable_from_request {
        format!("{}|null", ctx.type_hint.label())
    } else {
        ctx.type_hint.label()
    };
    builder.returns(returns).build()
}

pub(crate) fn setter_doc(
    ctx: &AttributeContext<'_>,
    struct_name: &str,
    validation: bool,
) -> Documentation {
    let mut builder = Documentation::builder(format!("Set {} value", ctx.names.method))
        .maybe_note(ctx.attribute.documentation.as_deref())
        .note_if(ctx.attribute.removable_from_request, REMOVABLE_SET_NOTE)
        .note_if(ctx.attribute.is_array, ARRAY_SET_NOTE);

    if ctx.attribute.is_xml {
        builder = builder
            .uses("XmlDocument::has_content")
            .uses("XmlDocument::serialize_first_child");
    }
    if validation {
        if ctx.choice.is_some() {
            builder = builder.note(CHOICE_NOTE).throws("InvalidArgument");
        }
        for helper in restriction_helpers(ctx) {
            builder = builder.uses(helper);
        }
        if !ctx.rules.is_empty() {
            builder = builder.throws("InvalidArgument");
        }
    }
    builder
        .param(&ctx.names.parameter, ctx.type_hint.label())
        .returns(struct_name)
        .build()
}

pub(crate) fn add_to_doc(
    ctx: &AttributeContext<'_>,
    struct_name: &str,
    validation: bool,
) -> Documentation {
    let mut builder = Documentation::builder(format!("Add item to {} value", ctx.attribute.clean_name))
        .note("The item is appended to the stored sequence, which is started when empty.");
    if validation {
        for helper in restriction_helpers(ctx) {
            builder = builder.uses(helper);
        }
        if !ctx.rules.is_empty() || ctx.choice.is_some() {
            builder = builder.throws("InvalidArgument");
        }
    }
    builder
        .throws("NotASequence")
        .param("item", ctx.element_label())
        .returns(struct_name)
        .build()
}

pub(crate) fn constructor_doc(
    struct_name: &str,
    contexts: &[&AttributeContext<'_>],
) -> Documentation {
    let mut builder = Documentation::builder(format!("Constructor method for {struct_name}"));
    for ctx in contexts {
        builder = builder.uses(format!("{struct_name}::{}", ctx.names.setter));
    }
    for ctx in contexts {
        builder = builder.param(&ctx.names.parameter, ctx.type_hint.label());
    }
    builder.returns(struct_name).build()
}

pub(crate) fn restore_doc(struct_name: &str, parent: Option<&str>) -> Documentation {
    let mut builder = Documentation::builder(
        "Rebuilds an instance from previously exported values, without validation",
    )
    .uses("Record::from_state");
    if let Some(parent) = parent {
        builder = builder.see(format!("{parent}::fromState"));
    }
    builder
        .param_described("state", "state", "the exported values")
        .returns(struct_name)
        .build()
}

pub(crate) fn struct_doc(
    struct_name: &str,
    packaged_name: &str,
    documentation: Option<&str>,
) -> Documentation {
    let summary = if packaged_name == struct_name {
        format!("This class stands for {struct_name}")
    } else {
        format!("This class stands for {struct_name} ({packaged_name})")
    };
    Documentation::builder(summary).maybe_note(documentation).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_render_sections_in_order() {
        let doc = Documentation::builder("Set id value")
            .note("Some note.")
            .param("id", "int")
            .returns("Person")
            .throws("InvalidArgument")
            .uses("Person::setId")
            .build();
        let lines = doc.lines();
        assert_eq!(lines[0], "Set id value");
        let joined = lines.join("\n");
        let args = joined.find("## Arguments").unwrap();
        let ret = joined.find("## Returns").unwrap();
        let err = joined.find("## Errors").unwrap();
        let see = joined.find("## See Also").unwrap();
        assert!(args < ret && ret < err && err < see, "got:\n{joined}");
        assert!(joined.contains("* `AccessorError::InvalidArgument`"));
    }

    #[test]
    fn duplicate_tags_are_collapsed() {
        let doc = Documentation::builder("x")
            .throws("InvalidArgument")
            .throws("InvalidArgument")
            .build();
        assert_eq!(doc.tags.len(), 1);
        assert!(doc.throws("InvalidArgument"));
    }

    #[test]
    fn blank_notes_are_skipped() {
        let doc = Documentation::builder("x").maybe_note(Some("   ")).build();
        assert!(doc.notes.is_empty());
    }
}
