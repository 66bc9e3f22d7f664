/// Reference resolution within a single document.
///
/// Covers:
/// 1. Variable uses binding to locals, parameters and globals by precedence
/// 2. Call sites binding to real functions only
/// 3. The in-progress locals offered to completion at call sites
#[cfg(test)]
mod scope_tests {
    use crate::utils::{MAIN_URI, analyze_program, main_messages, main_program, messages_of};
    use miniprob::{analyze, config::AnalysisConfig};
    use miniprob_ast::{
        builder::Builder,
        document::{Document, DocumentUri},
        nodes::{DeclaredType, OperatorKind, Statement},
        reference::{LinkState, ResolvedSymbol},
    };
    use miniprob_linker::{
        cache::ScopeCache,
        index::WorkspaceIndex,
        provider::{ReferenceSite, ScopeOptions, ScopeProvider},
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_global_flag_assignment_is_clean() {
        let flag = Builder::decl(DeclaredType::Bool, &["flag"]);
        let target = Builder::lval("flag");
        let program = main_program(
            vec![flag.clone()],
            vec![Builder::assignment(target.clone(), Builder::bool_literal(false))],
        );
        let report = analyze_program(program);
        assert!(report.is_clean());
        match target.reference.target() {
            Some(ResolvedSymbol::Declaration(decl)) => assert_eq!(decl.id, flag.id),
            other => panic!("expected the global declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_name_is_a_single_link_error() {
        let target = Builder::lval("y");
        let report = analyze_program(main_program(
            vec![],
            vec![Builder::assignment(target.clone(), Builder::bool_literal(true))],
        ));
        let expected = "Could not resolve reference to Decl named 'y'.";
        assert_eq!(main_messages(&report), vec![expected.to_string()]);
        assert_eq!(target.reference.state(), LinkState::Failed(expected.to_string()));
        let diagnostic = &report.diagnostics(&DocumentUri::new(MAIN_URI))[0];
        assert_eq!(diagnostic.node_id, target.id);
    }

    #[test]
    fn test_locals_shadow_parameters_and_parameters_shadow_globals() {
        let global = Builder::decl(DeclaredType::int("u8"), &["n"]);
        let param_n = Builder::param("n", DeclaredType::Bool, false);
        let param_m = Builder::param("m", DeclaredType::Bool, false);
        let local_m = Builder::decl(DeclaredType::int("u4"), &["m"]);
        let use_n = Builder::lval("n");
        let use_m = Builder::lval("m");
        let helper = Builder::func(
            "helper",
            vec![param_n.clone(), param_m],
            vec![local_m.clone()],
            vec![
                Builder::assignment(use_n.clone(), Builder::bool_literal(true)),
                Builder::assignment(use_m.clone(), Builder::int_literal(3, "u4")),
            ],
        );
        let program = Builder::program(
            vec![],
            vec![global],
            vec![helper, Builder::func("main", vec![], vec![], vec![])],
        );
        assert!(analyze_program(program).is_clean());
        assert_eq!(use_n.reference.target().map(|symbol| symbol.id()), Some(param_n.id));
        assert_eq!(use_m.reference.target().map(|symbol| symbol.id()), Some(local_m.id));
    }

    #[test]
    fn test_ghost_function_never_satisfies_a_call() {
        let program = Builder::program(
            vec![],
            vec![],
            vec![
                Builder::ghost_func("helper"),
                Builder::func("main", vec![], vec![], vec![Builder::call("helper", vec![])]),
            ],
        );
        assert_eq!(
            messages_of(program),
            vec!["Could not resolve reference to Func named 'helper'.".to_string()]
        );
    }

    #[test]
    fn test_calls_ignore_variables_of_the_same_name() {
        let call = Builder::call_node("helper", vec![]);
        let program = main_program(
            vec![Builder::decl(DeclaredType::Bool, &["helper"])],
            vec![Statement::FunctionCall(call.clone())],
        );
        assert_eq!(
            messages_of(program),
            vec!["Could not resolve reference to Func named 'helper'.".to_string()]
        );
        assert!(!call.reference.is_resolved());
    }

    #[test]
    fn test_in_progress_locals_are_offered_but_not_bound() {
        let call = Builder::call_node("draft", vec![]);
        let editing = Builder::func_with_source(
            "main",
            vec![],
            vec![Builder::decl(DeclaredType::int("u8"), &["draft"])],
            Some(vec![Statement::FunctionCall(call.clone())]),
            "main() {\n  u8 draft;\n  draft(",
        );
        let helper = Builder::func("helper", vec![], vec![], vec![]);
        let document = Document::new(MAIN_URI, Builder::program(vec![], vec![], vec![helper, editing]));

        let index = WorkspaceIndex::new();
        let mut cache = ScopeCache::new();
        let mut provider = ScopeProvider::new(&index, &mut cache, ScopeOptions::default());
        let scope = provider.scope_for(&document, ReferenceSite::FunctionCall(&call));
        assert_eq!(scope.names(), vec!["helper", "main", "draft"]);

        let mut quiet = ScopeCache::new();
        let options = ScopeOptions {
            fold_in_progress_locals: false,
            ..ScopeOptions::default()
        };
        let scope = ScopeProvider::new(&index, &mut quiet, options)
            .scope_for(&document, ReferenceSite::FunctionCall(&call));
        assert_eq!(scope.names(), vec!["helper", "main"]);

        let report = analyze([document], &AnalysisConfig::default());
        assert_eq!(
            main_messages(&report),
            vec!["Could not resolve reference to Func named 'draft'.".to_string()]
        );
    }

    #[test]
    fn test_nested_blocks_resolve_like_the_function_body() {
        let inner = Builder::lval("count");
        let program = main_program(
            vec![Builder::decl(DeclaredType::int("u8"), &["count"])],
            vec![Builder::while_loop(
                Builder::binary(
                    Builder::var("count"),
                    OperatorKind::Lt,
                    Builder::int_literal(10, "u8"),
                ),
                vec![Builder::if_then_else(
                    Builder::bool_literal(true),
                    vec![Builder::assignment(
                        inner.clone(),
                        Builder::binary(
                            Builder::var("count"),
                            OperatorKind::Add,
                            Builder::int_literal(1, "u8"),
                        ),
                    )],
                    Some(vec![Builder::throw()]),
                )],
            )],
        );
        let report = analyze_program(program);
        assert_eq!(main_messages(&report), Vec::<String>::new());
        assert!(inner.reference.is_resolved());
    }
}
