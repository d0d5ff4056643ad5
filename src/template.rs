//! Path templates: `$field` interpolation and `%function{args}` calls.
//!
//! ```text
//! $initial_artist/%shorten{$combined_artist_sort}/${combined_disctrack}_$title
//! ```
//!
//! Undefined fields render as the empty string. `$$`, `$%`, `$,` and `$}`
//! produce the literal character.

mod functions;
mod parser;

use crate::error::TemplateError;
use crate::meta::FieldMap;

use parser::Node;

/// A parsed template, reusable across files.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            nodes: parser::parse(source)?,
        })
    }

    pub fn render(&self, fields: &FieldMap) -> Result<String, TemplateError> {
        render_nodes(&self.nodes, fields)
    }
}

/// Parse and render in one go.
#[cfg(test)]
pub fn render(source: &str, fields: &FieldMap) -> Result<String, TemplateError> {
    Template::parse(source)?.render(fields)
}

fn render_nodes(nodes: &[Node], fields: &FieldMap) -> Result<String, TemplateError> {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Field(name) => {
                if let Some(value) = fields.get(name) {
                    out.push_str(value);
                }
            }
            Node::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|arg| render_nodes(arg, fields))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push_str(&functions::call(name, &args, fields)?);
            }
        }
    }
    Ok(out)
}
