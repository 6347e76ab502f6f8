//! Primitive qualification.
//!
//! The preview loads the runtime from a script tag, so hook primitives that
//! the file used to import have to be read off the global namespace instead:
//! `useState(0)` becomes `React.useState(0)`.
//!
//! Only identifier *references* are rewritten. Property names, longer
//! identifiers, strings and comments never match because they are different
//! AST nodes. A reference that resolves to a binding the file declares itself
//! (in whatever scope) stays bare; unresolved ones, and ones that resolve to
//! an import, are qualified.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_semantic::{Scoping, SemanticBuilder};
use oxc_span::Span;
use std::collections::HashSet;
use tracing::warn;

use crate::config::QualifierConfig;
use crate::edits::{apply_edits, Edit};
use crate::error::Result;
use crate::parse::parse_tsx;

/// Qualify the default primitive set against `React`.
pub fn qualify(source: &str) -> Result<String> {
    qualify_with(source, &QualifierConfig::default())
}

pub fn qualify_with(source: &str, config: &QualifierConfig) -> Result<String> {
    let allocator = Allocator::default();
    let program = parse_tsx(&allocator, source)?;

    // Resolution only; redeclarations and the like are reported downstream.
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let import_spans = program
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::ImportDeclaration(decl) => Some(decl.span),
            _ => None,
        })
        .collect();

    let mut qualifier = HookQualifier {
        config,
        scoping: &scoping,
        import_spans,
        shadowed: HashSet::new(),
        edits: Vec::new(),
    };
    qualifier.visit_program(&program);

    for name in &qualifier.shadowed {
        warn!(primitive = %name, "primitive resolves to a local binding; leaving it unqualified");
    }

    Ok(apply_edits(source, qualifier.edits))
}

struct HookQualifier<'c> {
    config: &'c QualifierConfig,
    scoping: &'c Scoping,
    import_spans: Vec<Span>,
    shadowed: HashSet<String>,
    edits: Vec<Edit>,
}

impl<'c> HookQualifier<'c> {
    fn target(&mut self, ident: &IdentifierReference) -> Option<String> {
        let name = ident.name.as_str();
        if !self.config.is_primitive(name) {
            return None;
        }
        if self.is_local(ident) {
            self.shadowed.insert(name.to_string());
            return None;
        }
        Some(format!("{}.{}", self.config.namespace, name))
    }

    /// Whether the reference binds to something the file declares, other
    /// than an import.
    fn is_local(&self, ident: &IdentifierReference) -> bool {
        let Some(reference_id) = ident.reference_id.get() else {
            return false;
        };
        let Some(symbol_id) = self.scoping.get_reference(reference_id).symbol_id() else {
            return false;
        };
        let declared_at = self.scoping.symbol_span(symbol_id);
        !self
            .import_spans
            .iter()
            .any(|span| span.start <= declared_at.start && declared_at.end <= span.end)
    }
}

impl<'a, 'c> Visit<'a> for HookQualifier<'c> {
    fn visit_identifier_reference(&mut self, ident: &IdentifierReference<'a>) {
        if let Some(qualified) = self.target(ident) {
            self.edits
                .push(Edit::replace(ident.span.start, ident.span.end, qualified));
        }
    }

    fn visit_object_property(&mut self, prop: &ObjectProperty<'a>) {
        // `{ useState }` must keep its key: `{ useState: React.useState }`.
        if prop.shorthand {
            if let Expression::Identifier(ident) = &prop.value {
                if let Some(qualified) = self.target(ident) {
                    self.edits.push(Edit::replace(
                        prop.span.start,
                        prop.span.end,
                        format!("{}: {}", ident.name, qualified),
                    ));
                    return;
                }
            }
        }
        walk::walk_object_property(self, prop);
    }

    fn visit_import_declaration(&mut self, _decl: &ImportDeclaration<'a>) {}

    // Export specifiers name bindings; `export { React.useState }` is not a thing.
    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'a>) {
        if let Some(inner) = &decl.declaration {
            self.visit_declaration(inner);
        }
    }
}
