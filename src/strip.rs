//! Dialect stripping.
//!
//! The preview runs the file as a classic script, so module boundaries have to
//! go: imports are dropped, exports lose their `export` keyword, and an
//! anonymous default export is bound to a name the bootstrap can render.
//! Shorthand fragments are spelled out because the in-browser interpreter
//! predates them.
//!
//! All edits are driven by the AST. Keyword sequences inside strings,
//! comments and template literals are never touched.

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_span::{GetSpan, Span};
use std::collections::HashSet;
use tracing::debug;

use crate::config::PreviewConfig;
use crate::edits::{apply_edits, Edit};
use crate::error::{PreviewError, Result, SourceLocation};
use crate::parse::{declared_names, parse_tsx};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOutput {
    pub code: String,
    /// Name the default export is reachable under, if the file has one.
    pub default_export: Option<String>,
}

/// Strip module statements and shorthand fragments with the default
/// configuration.
pub fn strip(source: &str) -> Result<String> {
    strip_module(source, &PreviewConfig::default()).map(|out| out.code)
}

pub fn strip_module(source: &str, config: &PreviewConfig) -> Result<StripOutput> {
    let allocator = Allocator::default();
    let program = parse_tsx(&allocator, source)?;

    let mut stripper = DialectStripper {
        source,
        fragment_tag: &config.fragment_tag,
        entry_component: &config.entry_component,
        declared: declared_names(&program),
        edits: Vec::new(),
        default_export: None,
        unsupported: None,
    };
    for stmt in &program.body {
        stripper.strip_statement(stmt);
    }
    stripper.visit_program(&program);

    if let Some(err) = stripper.unsupported {
        return Err(err);
    }

    debug!(edits = stripper.edits.len(), "stripped module statements");
    let code = apply_edits(source, stripper.edits).trim().to_string();
    Ok(StripOutput {
        code,
        default_export: stripper.default_export,
    })
}

struct DialectStripper<'s> {
    source: &'s str,
    fragment_tag: &'s str,
    entry_component: &'s str,
    declared: HashSet<String>,
    edits: Vec<Edit>,
    default_export: Option<String>,
    unsupported: Option<PreviewError>,
}

impl<'s> DialectStripper<'s> {
    fn strip_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::ImportDeclaration(decl) => self.remove(decl.span),
            Statement::ExportAllDeclaration(decl) => self.remove(decl.span),
            Statement::TSExportAssignment(decl) => self.remove(decl.span),
            Statement::TSNamespaceExportDeclaration(decl) => self.remove(decl.span),
            Statement::TSImportEqualsDeclaration(decl) => {
                // `import x = require('y')` only; `import x = A.B` is a local alias.
                if matches!(
                    decl.module_reference,
                    TSModuleReference::ExternalModuleReference(_)
                ) {
                    self.remove(decl.span);
                }
            }
            Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
                Some(inner) => self.remove_prefix(decl.span, inner.span()),
                None => {
                    if decl.source.is_none() {
                        self.record_default_specifier(&decl.specifiers);
                    }
                    self.remove(decl.span);
                }
            },
            Statement::ExportDefaultDeclaration(decl) => self.strip_default_export(decl),
            _ => {}
        }
    }

    fn strip_default_export(&mut self, decl: &ExportDefaultDeclaration) {
        let inner = decl.declaration.span();
        match &decl.declaration {
            ExportDefaultDeclarationKind::Identifier(ident) => {
                self.default_export = Some(ident.name.to_string());
                self.remove(decl.span);
            }
            ExportDefaultDeclarationKind::FunctionDeclaration(func) if func.id.is_some() => {
                self.default_export = func.id.as_ref().map(|id| id.name.to_string());
                self.remove_prefix(decl.span, inner);
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) if class.id.is_some() => {
                self.default_export = class.id.as_ref().map(|id| id.name.to_string());
                self.remove_prefix(decl.span, inner);
            }
            ExportDefaultDeclarationKind::TSInterfaceDeclaration(_) => {
                self.remove_prefix(decl.span, inner);
            }
            _ => {
                // Anonymous function/class or any expression.
                let name = self.fresh_entry_name();
                self.edits.push(Edit::replace(
                    decl.span.start,
                    inner.start,
                    format!("const {} = ", name),
                ));
                if !self.source[..decl.span.end as usize].ends_with(';') {
                    self.edits.push(Edit::insert(decl.span.end, ";"));
                }
                self.default_export = Some(name);
            }
        }
    }

    /// `export { Greeter as default }` names the default export through a
    /// specifier instead of a declaration.
    fn record_default_specifier(&mut self, specifiers: &[ExportSpecifier]) {
        let local = specifiers.iter().find(|spec| {
            !spec.export_kind.is_type() && spec.exported.name().as_str() == "default"
        });
        if let Some(spec) = local {
            self.default_export = Some(spec.local.name().to_string());
        }
    }

    /// The configured entry name, suffixed until it does not collide with a
    /// name the file already declares.
    fn fresh_entry_name(&self) -> String {
        let base = self.entry_component;
        if !self.declared.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| match n {
                1 => format!("{}Default", base),
                n => format!("{}Default{}", base, n),
            })
            .find(|candidate| !self.declared.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn remove(&mut self, span: Span) {
        self.edits.push(Edit::remove(span.start, span.end));
    }

    /// Drop `export` / `export default` ahead of a declaration.
    fn remove_prefix(&mut self, outer: Span, inner: Span) {
        self.edits.push(Edit::remove(outer.start, inner.start));
    }

    fn reject(&mut self, construct: &str, span: Span) {
        if self.unsupported.is_none() {
            self.unsupported = Some(PreviewError::UnsupportedConstruct {
                construct: construct.to_string(),
                location: SourceLocation::from_offset(self.source, span.start),
            });
        }
    }
}

impl<'a, 's> Visit<'a> for DialectStripper<'s> {
    fn visit_jsx_opening_element(&mut self, elem: &JSXOpeningElement<'a>) {
        // The inline script cannot contain a literal script element.
        if let JSXElementName::Identifier(ident) = &elem.name {
            if ident.name.starts_with('s') && ident.name.eq_ignore_ascii_case("script") {
                self.reject("<script> element", elem.span);
            }
        }
        walk::walk_jsx_opening_element(self, elem);
    }

    fn visit_jsx_fragment(&mut self, frag: &JSXFragment<'a>) {
        let open = frag.opening_fragment.span;
        let close = frag.closing_fragment.span;
        self.edits.push(Edit::replace(
            open.start,
            open.end,
            format!("<{}>", self.fragment_tag),
        ));
        self.edits.push(Edit::replace(
            close.start,
            close.end,
            format!("</{}>", self.fragment_tag),
        ));
        walk::walk_jsx_fragment(self, frag);
    }

    fn visit_import_expression(&mut self, expr: &ImportExpression<'a>) {
        self.reject("import()", expr.span);
        walk::walk_import_expression(self, expr);
    }

    fn visit_meta_property(&mut self, meta: &MetaProperty<'a>) {
        if meta.meta.name == "import" {
            self.reject("import.meta", meta.span);
        }
    }
}
