#[cfg(test)]
mod tests {
    use crate::config::PreviewConfig;
    use crate::error::PreviewError;
    use crate::finalize::{
        compile_preview, download_artifact, PreviewCompiler, HTML_CONTENT_TYPE,
        SOURCE_CONTENT_TYPE,
    };
    use crate::listing::FileContents;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    const STUDENT_COMPONENT: &str = r#"import { useState, useEffect } from 'react';
import './App.css';

type Todo = { id: number; text: string };

function App() {
  const [todos, setTodos] = useState<Todo[]>([]);
  const [text, setText] = useState('');

  useEffect(() => {
    document.title = `${todos.length} todos`;
  }, [todos]);

  const add = (e: React.FormEvent) => {
    e.preventDefault();
    setTodos([...todos, { id: Date.now(), text } as Todo]);
  };

  return (
    <>
      <form onSubmit={add}>
        <input value={text} onChange={(e) => setText(e.target.value)} />
      </form>
      <ul>{todos.map((t) => <li key={t.id}>{t.text}</li>)}</ul>
    </>
  );
}

export default App;
"#;

    #[test]
    fn test_full_pipeline() {
        let doc = compile_preview(STUDENT_COMPONENT, &PreviewConfig::default()).unwrap();

        assert_eq!(doc.raw, STUDENT_COMPONENT);
        assert_eq!(doc.entry, "App");

        assert!(!doc.stripped.contains("import"));
        assert!(!doc.stripped.contains("export"));
        assert!(doc.stripped.contains("React.useState<Todo[]>([])"));
        assert!(doc.stripped.contains("React.useEffect(() =>"));
        assert!(!doc.stripped.contains("<>"));

        assert!(!doc.downleveled.contains("type Todo"));
        assert!(!doc.downleveled.contains("React.FormEvent"));
        assert!(!doc.downleveled.contains(" as Todo"));
        assert!(doc.downleveled.contains("React.useState([])"));
        assert!(doc.downleveled.contains("<form onSubmit={add}>"));

        assert!(doc.assembled.contains(&doc.downleveled));
        assert!(doc.assembled.contains("root.render(<App />);"));
        assert_eq!(doc.assembled.matches("<script src=").count(), 3);
        assert_eq!(doc.assembled.matches(r#"<script type="text/babel">"#).count(), 1);
    }

    #[test]
    fn test_entry_follows_named_default_export() {
        let src = "export default function Clock() { return <time />; }";
        let doc = compile_preview(src, &PreviewConfig::default()).unwrap();
        assert_eq!(doc.entry, "Clock");
        assert!(doc.assembled.contains("root.render(<Clock />);"));
    }

    #[test]
    fn test_entry_follows_default_export_specifier() {
        let src = "function Greeter() { return <p>hi</p>; }\nexport { Greeter as default };";
        let doc = compile_preview(src, &PreviewConfig::default()).unwrap();
        assert_eq!(doc.entry, "Greeter");
        assert!(doc.assembled.contains("root.render(<Greeter />);"));
        assert!(!doc.assembled.contains("<App />"));
    }

    #[test]
    fn test_shadowed_primitive_is_still_qualified_elsewhere() {
        let src = "function helper(useRef) { return useRef; }\nexport default function App() { const r = useRef(null); return <div ref={r} />; }";
        let doc = compile_preview(src, &PreviewConfig::default()).unwrap();
        assert!(doc.stripped.contains("const r = React.useRef(null);"));
        assert!(doc.stripped.contains("return useRef; }"));
    }

    #[test]
    fn test_file_without_default_export_uses_configured_entry() {
        let config = PreviewConfig {
            entry_component: "Main".to_string(),
            ..PreviewConfig::default()
        };
        let doc = compile_preview("const Main = () => <p />;", &config).unwrap();
        assert_eq!(doc.entry, "Main");
        assert!(doc.assembled.contains("root.render(<Main />);"));
    }

    #[test]
    fn test_compile_failure_produces_no_document() {
        let err = compile_preview("const App = () => <div>;", &PreviewConfig::default())
            .unwrap_err();
        assert!(matches!(err, PreviewError::Compile { .. }));
        assert!(err.to_string().starts_with("compile failed"));
    }

    #[test]
    fn test_preview_artifact() {
        let compiler = PreviewCompiler::default();
        let artifact = compiler
            .artifact(STUDENT_COMPONENT, Some("src/App.tsx"), true)
            .unwrap();
        assert_eq!(artifact.file_name, "student-code.html");
        assert_eq!(artifact.content_type, HTML_CONTENT_TYPE);
        assert!(artifact.body.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_source_artifact_is_unchanged() {
        let config = PreviewConfig::default();
        let artifact =
            download_artifact(STUDENT_COMPONENT, Some("src/App.jsx"), false, &config).unwrap();
        assert_eq!(artifact.file_name, "student-code.jsx");
        assert_eq!(artifact.content_type, SOURCE_CONTENT_TYPE);
        assert_eq!(artifact.body, STUDENT_COMPONENT);

        // Source mode never compiles, so broken input is still downloadable
        let broken = download_artifact("const x: = ;", None, false, &config).unwrap();
        assert_eq!(broken.file_name, "student-code.tsx");
        assert_eq!(broken.body, "const x: = ;");
    }

    #[test]
    fn test_contents_payload_to_preview() {
        let payload = serde_json::json!({
            "name": "App.tsx",
            "path": "src/App.tsx",
            "encoding": "base64",
            "content": STANDARD.encode(STUDENT_COMPONENT),
        });
        let contents = FileContents::from_json(&payload.to_string()).unwrap();
        let raw = contents.decode().unwrap();
        let doc = PreviewCompiler::default().compile(&raw).unwrap();
        assert_eq!(doc.raw, STUDENT_COMPONENT);
        assert_eq!(doc.entry, "App");
    }
}
