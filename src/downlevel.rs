//! Down-leveling through the oxc transformer.
//!
//! Type annotations and other TypeScript-only syntax are removed; markup is
//! printed back unchanged for the in-browser interpreter, and no ECMAScript
//! lowering happens (ESNext in, ESNext out). Any diagnostic aborts the stage:
//! there is no best-effort output.

use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_semantic::SemanticBuilder;
use oxc_transformer::{JsxOptions, TransformOptions, Transformer};
use std::path::Path;
use tracing::debug;

use crate::error::{PreviewError, Result};
use crate::parse::parse_tsx;

/// Name the transformer sees; only its extension matters.
const VIRTUAL_FILE: &str = "preview.tsx";

/// Transformer configuration: TypeScript plugin on, every JSX plugin off,
/// default (empty) environment so nothing below ESNext is emitted.
pub fn preserve_markup_options() -> TransformOptions {
    TransformOptions {
        jsx: JsxOptions {
            jsx_plugin: false,
            display_name_plugin: false,
            jsx_self_plugin: false,
            jsx_source_plugin: false,
            ..JsxOptions::default()
        },
        ..TransformOptions::default()
    }
}

pub fn downlevel(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let mut program = parse_tsx(&allocator, source)?;

    let semantic = SemanticBuilder::new()
        .with_check_syntax_error(true)
        .build(&program);
    if !semantic.errors.is_empty() {
        return Err(PreviewError::compile(semantic.errors.iter()));
    }
    let scoping = semantic.semantic.into_scoping();

    let options = preserve_markup_options();
    let ret = Transformer::new(&allocator, Path::new(VIRTUAL_FILE), &options)
        .build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        return Err(PreviewError::compile(ret.errors.iter()));
    }

    let code = Codegen::new().build(&program).code;
    debug!(bytes_in = source.len(), bytes_out = code.len(), "down-leveled source");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_type_annotations_keeps_markup() {
        let src = r#"
interface Props { name: string }
const App = ({ name }: Props): JSX.Element => {
  const [n, setN] = React.useState<number>(0);
  return <div className="greeting">Hi {name} {n as number}</div>;
};
"#;
        let out = downlevel(src).unwrap();

        assert!(!out.contains("interface"));
        assert!(!out.contains(": Props"));
        assert!(!out.contains("JSX.Element"));
        assert!(!out.contains("<number>"));
        assert!(!out.contains(" as number"));
        assert!(out.contains("<div className="));
        assert!(out.contains("</div>"));
        assert!(out.contains("React.useState(0)"));
        // Markup is not compiled to calls
        assert!(!out.contains("createElement"));
        assert!(!out.contains("_jsx"));
    }

    #[test]
    fn test_modern_syntax_is_not_lowered() {
        let src = "const f = async (xs?: number[]) => xs?.map((x) => x ** 2) ?? [];\nclass C { #p = 1; }";
        let out = downlevel(src).unwrap();
        assert!(out.contains("async"));
        assert!(out.contains("=>"));
        assert!(out.contains("?."));
        assert!(out.contains("??"));
        assert!(out.contains("**"));
        assert!(out.contains("#p"));
    }

    #[test]
    fn test_enum_becomes_runtime_code() {
        let out = downlevel("enum Color { Red, Green }\nconst c: Color = Color.Green;").unwrap();
        assert!(!out.contains("enum "));
        assert!(out.contains("Color"));
    }

    #[test]
    fn test_invalid_syntax_fails() {
        match downlevel("const x: = ;") {
            Err(PreviewError::Compile { diagnostics }) => assert!(!diagnostics.is_empty()),
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_redeclaration_fails() {
        assert!(matches!(
            downlevel("let a = 1;\nlet a = 2;"),
            Err(PreviewError::Compile { .. })
        ));
    }

    #[test]
    fn test_unclosed_markup_fails() {
        assert!(downlevel("const A = () => <div><span></div>;").is_err());
    }
}
