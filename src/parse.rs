//! Shared oxc front end.
//!
//! Every stage parses the file as a TSX module. Parse errors are never
//! recovered from: the whole diagnostic list is handed back to the caller.

use oxc_allocator::Allocator;
use oxc_ast::ast::{BindingIdentifier, ImportDeclaration, Program};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::collections::HashSet;

use crate::error::{PreviewError, Result};

pub fn tsx_source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

/// Parse `source` into `allocator`, failing on any diagnostic.
pub fn parse_tsx<'a>(allocator: &'a Allocator, source: &'a str) -> Result<Program<'a>> {
    let ret = Parser::new(allocator, source, tsx_source_type()).parse();

    if !ret.errors.is_empty() {
        return Err(PreviewError::compile(ret.errors.iter()));
    }
    if ret.panicked {
        return Err(PreviewError::compile(["parser aborted before the end of input"]));
    }

    Ok(ret.program)
}

/// Every name the file binds itself, in any scope. Import bindings are
/// excluded since imports never survive into the preview.
pub fn declared_names(program: &Program) -> HashSet<String> {
    let mut collector = BindingCollector::default();
    collector.visit_program(program);
    collector.names
}

#[derive(Default)]
struct BindingCollector {
    names: HashSet<String>,
}

impl<'a> Visit<'a> for BindingCollector {
    fn visit_binding_identifier(&mut self, ident: &BindingIdentifier<'a>) {
        self.names.insert(ident.name.to_string());
    }

    fn visit_import_declaration(&mut self, _decl: &ImportDeclaration<'a>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_typed_markup() {
        let allocator = Allocator::default();
        let src = "const App = (p: { n: number }) => <div>{p.n}</div>;";
        let program = parse_tsx(&allocator, src).unwrap();
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_reports_syntax_errors() {
        let allocator = Allocator::default();
        let err = parse_tsx(&allocator, "const x: = ;").unwrap_err();
        match err {
            PreviewError::Compile { diagnostics } => assert!(!diagnostics.is_empty()),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_declared_names_skip_imports() {
        let allocator = Allocator::default();
        let src = r#"
            import { useState } from 'react';
            const [count, setCount] = useState(0);
            function useRef() {}
            class Box {}
        "#;
        let program = parse_tsx(&allocator, src).unwrap();
        let names = declared_names(&program);
        assert!(names.contains("count"));
        assert!(names.contains("setCount"));
        assert!(names.contains("useRef"));
        assert!(names.contains("Box"));
        assert!(!names.contains("useState"));
    }
}
