/// Incremental builds and configuration.
#[cfg(test)]
mod workspace_tests {
    use crate::utils::{get_test_data_path, init_tracing};
    use miniprob::{config::AnalysisConfig, workspace::Workspace};
    use miniprob_ast::{
        builder::Builder,
        document::{Document, DocumentUri},
        nodes::{DeclaredType, Statement},
    };
    use pretty_assertions::assert_eq;

    fn standalone(uri: &str, suffix: &str) -> Document {
        Document::new(
            uri,
            Builder::program(
                vec![],
                vec![Builder::decl(DeclaredType::int("u4"), &["x"])],
                vec![Builder::func(
                    "main",
                    vec![],
                    vec![],
                    vec![Builder::assignment(Builder::lval("x"), Builder::int_literal(1, suffix))],
                )],
            ),
        )
    }

    fn importing(uri: &str, import: &str, statements: Vec<Statement>) -> Document {
        Document::new(
            uri,
            Builder::program(
                vec![Builder::import(import)],
                vec![],
                vec![Builder::func("main", vec![], vec![], statements)],
            ),
        )
    }

    fn flags(uri: &str, name: &str) -> Document {
        Document::new(
            uri,
            Builder::program(vec![], vec![Builder::decl(DeclaredType::Bool, &[name])], vec![]),
        )
    }

    #[test]
    fn test_config_file_drives_the_build() -> anyhow::Result<()> {
        init_tracing();
        let config = AnalysisConfig::load(&get_test_data_path().join("strict.toml"))?;
        assert_eq!(config.types.max_integer_width, 32);
        assert!(!config.scoping.report_unindexed_imports);

        let program = Builder::program(
            vec![Builder::import("missing.mp")],
            vec![Builder::decl(DeclaredType::int("u64"), &["wide"])],
            vec![Builder::func(
                "main",
                vec![],
                vec![],
                vec![Builder::assignment(Builder::lval("wide"), Builder::int_literal(1, "u8"))],
            )],
        );
        let mut workspace = Workspace::new(config);
        workspace.add_document(Document::new("file:///main.mp", program));
        let report = workspace.build();
        assert_eq!(
            report.messages(&DocumentUri::new("file:///main.mp")),
            vec!["Could not infer type of Lval reference: Width 64 exceeds the maximum integer width 32"]
        );
        Ok(())
    }

    #[test]
    fn test_only_changed_documents_are_rebuilt() {
        let first = DocumentUri::new("file:///first.mp");
        let second = DocumentUri::new("file:///second.mp");
        let mut workspace = Workspace::default();
        workspace.add_document(standalone(first.as_str(), "u8"));
        workspace.add_document(standalone(second.as_str(), "u4"));

        let report = workspace.build();
        assert_eq!(report.built().collect::<Vec<_>>(), vec![&first, &second]);
        assert_eq!(report.error_count(), 1);

        workspace.update_document(standalone(second.as_str(), "u8"));
        let report = workspace.build();
        assert_eq!(report.built().collect::<Vec<_>>(), vec![&second]);
        assert_eq!(
            report.messages(&second),
            vec!["Type unsigned integer8 is not assignable to unsigned integer4."]
        );
        // diagnostics of untouched documents survive the rebuild
        assert_eq!(workspace.diagnostics(&first).len(), 1);
        assert_eq!(workspace.documents().count(), 2);
    }

    #[test]
    fn test_removed_document_drops_its_diagnostics() {
        let uri = DocumentUri::new("file:///gone.mp");
        let mut workspace = Workspace::default();
        workspace.add_document(standalone(uri.as_str(), "u8"));
        assert!(!workspace.build().is_clean());

        assert!(workspace.remove_document(&uri).is_some());
        assert!(workspace.document(&uri).is_none());
        assert!(workspace.diagnostics(&uri).is_empty());
        assert!(workspace.remove_document(&uri).is_none());
        assert!(workspace.build().is_clean());
    }

    #[test]
    fn test_import_only_dependent_is_rebuilt_when_target_appears() {
        let main = DocumentUri::new("file:///main.mp");
        let lib = DocumentUri::new("file:///lib.mp");
        let mut workspace = Workspace::default();
        workspace.add_document(importing(main.as_str(), "lib.mp", vec![Builder::throw()]));
        assert_eq!(
            workspace.build().messages(&main),
            vec!["Imported file 'lib.mp' could not be found in the workspace index."]
        );

        workspace.add_document(flags(lib.as_str(), "unused"));
        assert!(workspace.is_dirty(&main));
        let report = workspace.build();
        assert_eq!(report.built().collect::<Vec<_>>(), vec![&lib, &main]);
        assert!(report.is_clean());
        assert!(workspace.diagnostics(&main).is_empty());
    }

    #[test]
    fn test_removing_an_import_dirties_transitive_importers() {
        let base = DocumentUri::new("file:///base.mp");
        let middle = DocumentUri::new("file:///middle.mp");
        let top = DocumentUri::new("file:///top.mp");
        let mut workspace = Workspace::default();
        workspace.add_document(flags(base.as_str(), "seed"));
        workspace.add_document(importing(
            middle.as_str(),
            "base.mp",
            vec![Builder::assignment(Builder::lval("seed"), Builder::bool_literal(true))],
        ));
        workspace.add_document(importing(top.as_str(), "middle.mp", vec![Builder::throw()]));
        assert!(workspace.build().is_clean());

        assert!(workspace.remove_document(&base).is_some());
        assert!(workspace.is_dirty(&middle));
        assert!(workspace.is_dirty(&top));
        assert!(!workspace.is_dirty(&base));

        let report = workspace.build();
        assert_eq!(report.built().collect::<Vec<_>>(), vec![&middle, &top]);
        assert_eq!(
            report.messages(&middle),
            vec![
                "Imported file 'base.mp' could not be found in the workspace index.",
                "Could not resolve reference to Decl named 'seed'.",
            ]
        );
        assert!(report.messages(&top).is_empty());
    }
}
