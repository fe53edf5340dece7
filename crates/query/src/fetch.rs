//! Structured query documents for joined reads.
//!
//! A small document model rendered to the platform's `<fetch>` XML dialect.
//! Rendering escapes every attribute value, so platform-generated
//! identifiers and caller-supplied text alike are inert by the time they
//! reach the wire.

use std::fmt::Write;

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// Condition operators the domain's queries need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
        }
    }
}

/// One `<condition>` inside a `<filter>`.
#[derive(Debug, Clone)]
pub struct Condition {
    pub attribute: &'static str,
    pub operator: Operator,
    pub value: String,
}

impl Condition {
    pub fn eq(attribute: &'static str, value: impl ToString) -> Self {
        Self { attribute, operator: Operator::Eq, value: value.to_string() }
    }

    pub fn ne(attribute: &'static str, value: impl ToString) -> Self {
        Self { attribute, operator: Operator::Ne, value: value.to_string() }
    }
}

/// A `<link-entity>` join. `attributes` pairs a column with an optional
/// result alias.
#[derive(Debug, Clone)]
pub struct LinkEntity {
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub alias: &'static str,
    pub outer: bool,
    pub attributes: Vec<(&'static str, Option<&'static str>)>,
    pub conditions: Vec<Condition>,
}

/// The root `<entity>` block.
#[derive(Debug, Clone)]
pub struct EntityBlock {
    pub name: &'static str,
    pub attributes: Vec<&'static str>,
    /// `(attribute, descending)`.
    pub order: Option<(&'static str, bool)>,
    pub conditions: Vec<Condition>,
    pub links: Vec<LinkEntity>,
}

impl EntityBlock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            order: None,
            conditions: Vec::new(),
            links: Vec::new(),
        }
    }
}

/// A complete `<fetch>` document.
#[derive(Debug, Clone)]
pub struct FetchDoc {
    pub top: Option<u32>,
    pub entity: EntityBlock,
}

impl FetchDoc {
    /// Web-API collection the document is issued against.
    pub fn entity_set(&self) -> String {
        entity_set_name(self.entity.name)
    }

    /// Render the document as `<fetch>` XML.
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self.top {
            Some(top) => {
                let _ = write!(out, "<fetch top='{top}'>");
            }
            None => out.push_str("<fetch>"),
        }

        let entity = &self.entity;
        let _ = write!(out, "<entity name='{}'>", entity.name);
        for attribute in &entity.attributes {
            let _ = write!(out, "<attribute name='{attribute}'/>");
        }
        if let Some((attribute, descending)) = &entity.order {
            let _ = write!(out, "<order attribute='{attribute}' descending='{descending}'/>");
        }
        render_filter(&mut out, &entity.conditions);
        for link in &entity.links {
            render_link(&mut out, link);
        }
        out.push_str("</entity></fetch>");
        out
    }
}

fn render_filter(out: &mut String, conditions: &[Condition]) {
    if conditions.is_empty() {
        return;
    }
    out.push_str("<filter>");
    for condition in conditions {
        let _ = write!(
            out,
            "<condition attribute='{}' operator='{}' value='{}'/>",
            condition.attribute,
            condition.operator.as_str(),
            xml_escape(&condition.value),
        );
    }
    out.push_str("</filter>");
}

fn render_link(out: &mut String, link: &LinkEntity) {
    let _ = write!(out, "<link-entity name='{}' from='{}' to='{}'", link.name, link.from, link.to);
    if link.outer {
        out.push_str(" link-type='outer'");
    }
    let _ = write!(out, " alias='{}'>", link.alias);
    for (attribute, alias) in &link.attributes {
        match alias {
            Some(alias) => {
                let _ = write!(out, "<attribute name='{attribute}' alias='{alias}'/>");
            }
            None => {
                let _ = write!(out, "<attribute name='{attribute}'/>");
            }
        }
    }
    render_filter(out, &link.conditions);
    out.push_str("</link-entity>");
}

/// Escape a value for use inside a single-quoted XML attribute.
fn xml_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Collection names for the entities this domain queries. Not a general
/// pluralizer: the access-grant entity has a fixed `...set` collection name
/// on the platform.
fn entity_set_name(logical_name: &str) -> String {
    match logical_name {
        "principalobjectaccess" => "principalobjectaccessset".to_owned(),
        other => format!("{other}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_top_entity_and_attributes() {
        let mut entity = EntityBlock::new("workflow");
        entity.attributes = vec!["name", "workflowid"];
        let doc = FetchDoc { top: Some(50), entity };

        assert_eq!(
            doc.render(),
            "<fetch top='50'><entity name='workflow'>\
             <attribute name='name'/><attribute name='workflowid'/>\
             </entity></fetch>"
        );
    }

    #[test]
    fn condition_values_are_escaped() {
        let mut entity = EntityBlock::new("solution");
        entity.conditions = vec![Condition::eq("uniquename", "a<b&'c\"")];
        let doc = FetchDoc { top: None, entity };

        assert!(doc
            .render()
            .contains("value='a&lt;b&amp;&apos;c&quot;'"));
    }

    #[test]
    fn outer_link_carries_link_type() {
        let mut entity = EntityBlock::new("principalobjectaccess");
        entity.links = vec![LinkEntity {
            name: "systemuser",
            from: "systemuserid",
            to: "principalid",
            alias: "u",
            outer: true,
            attributes: vec![("fullname", Some("user"))],
            conditions: Vec::new(),
        }];
        let rendered = FetchDoc { top: None, entity }.render();

        assert!(rendered.contains(
            "<link-entity name='systemuser' from='systemuserid' to='principalid' \
             link-type='outer' alias='u'>"
        ));
        assert!(rendered.contains("<attribute name='fullname' alias='user'/>"));
    }

    #[test]
    fn entity_set_names_the_collection() {
        for (entity, collection) in [
            ("workflow", "workflows"),
            ("solution", "solutions"),
            ("principalobjectaccess", "principalobjectaccessset"),
        ] {
            let doc = FetchDoc { top: None, entity: EntityBlock::new(entity) };
            assert_eq!(doc.entity_set(), collection);
        }
    }
}
