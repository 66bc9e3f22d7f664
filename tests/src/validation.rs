/// Validation scenarios over complete programs.
///
/// Every program goes through the whole pipeline, so the messages below are
/// the union of link and validation diagnostics in report order.
#[cfg(test)]
mod validation_tests {
    use crate::utils::{
        MAIN_URI, analyze_program, analyze_with, main_messages, main_program, messages_of,
    };
    use miniprob::{analyze, config::AnalysisConfig, workspace::Workspace};
    use miniprob_ast::{
        builder::Builder,
        document::{Document, DocumentUri},
        nodes::{AssignedValue, DeclaredType, OperatorKind, Program, Statement},
    };
    use miniprob_validator::diagnostic::Severity;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    /// Exercises every statement and expression form without a single error.
    fn dice_game() -> Rc<Program> {
        let roll = Builder::func(
            "roll",
            vec![
                Builder::param("out", DeclaredType::int("u8"), true),
                Builder::param("bound", DeclaredType::int("u8"), false),
            ],
            vec![],
            vec![Builder::draw(
                Builder::lval("out"),
                Builder::uniform(Builder::int_literal(1, "u8"), Builder::var("bound")),
            )],
        );
        let main = Builder::func(
            "main",
            vec![],
            vec![Builder::decl(DeclaredType::int("s8"), &["delta"])],
            vec![
                Builder::draw(
                    Builder::lval("coin"),
                    Builder::bernoulli(Builder::int_literal(1, "u4"), Builder::int_literal(2, "u4")),
                ),
                Builder::observe(Builder::var("coin")),
                Builder::if_then_else(
                    Builder::not(Builder::var("coin")),
                    vec![Builder::assignment(
                        Builder::lval("count"),
                        Builder::binary(
                            Builder::var("count"),
                            OperatorKind::Add,
                            Builder::int_literal(1, "u8"),
                        ),
                    )],
                    Some(vec![Builder::throw()]),
                ),
                Builder::while_loop(
                    Builder::binary(
                        Builder::var("count"),
                        OperatorKind::Lt,
                        Builder::int_literal(3, "u8"),
                    ),
                    vec![Builder::call(
                        "roll",
                        vec![Builder::var("count"), Builder::int_literal(6, "u8")],
                    )],
                ),
                Builder::assignment(
                    Builder::indexed_lval("samples", Builder::int_literal(0, "u2")),
                    Builder::var("count"),
                ),
                Builder::assignment(Builder::lval("delta"), Builder::negative_literal(4, "s8")),
                Builder::try_catch(
                    vec![Builder::query(
                        "roll",
                        vec![Builder::var("count"), Builder::int_literal(6, "u8")],
                    )],
                    vec![Builder::throw()],
                ),
                Builder::assignment(
                    Builder::lval("count"),
                    Builder::probabilistic(
                        Builder::int_literal(1, "u8"),
                        vec![(
                            Builder::int_literal(1, "u4"),
                            Builder::int_literal(3, "u4"),
                            Builder::element("samples", Builder::int_literal(1, "u2")),
                        )],
                    ),
                ),
            ],
        );
        Builder::program(
            vec![],
            vec![
                Builder::decl(DeclaredType::Bool, &["coin"]),
                Builder::decl(DeclaredType::int("u8"), &["count"]),
                Builder::decl(DeclaredType::int_array("u8", 4), &["samples"]),
            ],
            vec![roll, main],
        )
    }

    #[test]
    fn test_well_formed_program_is_clean() {
        assert_eq!(messages_of(dice_game()), Vec::<String>::new());
    }

    #[test]
    fn test_arity_mismatch_is_the_only_diagnostic() {
        let helper = Builder::func(
            "helper",
            vec![Builder::param("flag", DeclaredType::Bool, false)],
            vec![],
            vec![Builder::throw()],
        );
        let main = Builder::func(
            "main",
            vec![],
            vec![],
            vec![Builder::call(
                "helper",
                vec![Builder::var("mainFlag"), Builder::int_literal(1, "s8")],
            )],
        );
        let program = Builder::program(
            vec![],
            vec![Builder::decl(DeclaredType::Bool, &["mainFlag"])],
            vec![helper, main],
        );
        assert_eq!(
            messages_of(program),
            vec!["Number of parameters does not match.".to_string()]
        );
    }

    #[test]
    fn test_zero_denominator_is_the_only_diagnostic() {
        let program = main_program(
            vec![Builder::decl(DeclaredType::int("s8"), &["x"])],
            vec![Builder::assignment(
                Builder::lval("x"),
                Builder::probabilistic(
                    Builder::int_literal(1, "s8"),
                    vec![(
                        Builder::int_literal(1, "s8"),
                        Builder::int_literal(0, "s8"),
                        Builder::int_literal(2, "s8"),
                    )],
                ),
            )],
        );
        assert_eq!(
            messages_of(program),
            vec!["Division by 0 not possible.".to_string()]
        );
    }

    #[test]
    fn test_failing_checks_do_not_hide_each_other() {
        let program = main_program(
            vec![
                Builder::decl(DeclaredType::Bool, &["flag"]),
                Builder::decl(DeclaredType::int("u4"), &["small"]),
            ],
            vec![
                Builder::assignment(Builder::lval("flag"), Builder::not(Builder::int_literal(3, "u8"))),
                Builder::assignment(Builder::lval("small"), Builder::int_literal(200, "u8")),
                Builder::observe(Builder::var("small")),
                Builder::assignment(Builder::lval("ghost"), Builder::int_literal(1, "u4")),
            ],
        );
        assert_eq!(
            messages_of(program),
            vec![
                "Could not resolve reference to Decl named 'ghost'.".to_string(),
                "The operation '!' is not possible on type 'unsigned integer8'".to_string(),
                "Type unsigned integer8 is not assignable to unsigned integer4.".to_string(),
                "Only boolean expressions can be observed".to_string(),
            ]
        );
    }

    #[test]
    fn test_diagnostics_carry_node_and_property() {
        let value = Builder::int_literal(200, "u8");
        let assignment = Builder::assignment_node(
            Builder::lval("small"),
            AssignedValue::Expression(value),
        );
        let program = main_program(
            vec![Builder::decl(DeclaredType::int("u4"), &["small"])],
            vec![Statement::Assignment(assignment.clone())],
        );
        let report = analyze_program(program);
        let diagnostics = report.diagnostics(&DocumentUri::new(MAIN_URI));
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.node_id, assignment.id);
        assert_eq!(diagnostic.property, Some("value"));
        assert_eq!(diagnostic.index, None);
    }

    #[test]
    fn test_rebuilding_unchanged_document_is_idempotent() {
        let mut flawed = dice_game().as_ref().clone();
        flawed.declarations.push(Builder::decl(DeclaredType::int("u4"), &["count"]));
        let document = Document::new(MAIN_URI, Rc::new(flawed));

        let mut workspace = Workspace::default();
        workspace.add_document(document.clone());
        let first = workspace.build();
        workspace.update_document(document);
        let second = workspace.build();
        assert!(!first.is_clean());
        assert_eq!(first, second);
    }

    #[test]
    fn test_width_ceiling_is_read_from_configuration() -> anyhow::Result<()> {
        let config = AnalysisConfig::from_toml_str("[types]\nmax-integer-width = 16\n")?;
        let program = main_program(
            vec![Builder::decl(DeclaredType::int("u16"), &["x"])],
            vec![Builder::assignment(Builder::lval("x"), Builder::int_literal(1, "u17"))],
        );
        let report = analyze_with(program, &config);
        assert_eq!(
            main_messages(&report),
            vec![
                "Could not infer type for IntLiteral: Width 17 exceeds the maximum integer width 16"
                    .to_string()
            ]
        );
        Ok(())
    }

    #[test]
    fn test_imported_parameter_errors_land_on_the_argument() -> anyhow::Result<()> {
        let config = AnalysisConfig::from_toml_str("[types]\nmax-integer-width = 16\n")?;
        let library = Document::new(
            "file:///project/lib.mp",
            Builder::program(
                vec![],
                vec![],
                vec![Builder::func(
                    "wide",
                    vec![Builder::param("big", DeclaredType::int("u17"), false)],
                    vec![],
                    vec![Builder::throw()],
                )],
            ),
        );
        let call = Builder::call_node("wide", vec![Builder::int_literal(1, "u8")]);
        let main = Document::new(
            MAIN_URI,
            Builder::program(
                vec![Builder::import("lib.mp")],
                vec![],
                vec![Builder::func("main", vec![], vec![], vec![Statement::FunctionCall(call.clone())])],
            ),
        );
        let report = analyze([library, main], &config);
        let diagnostics = report.diagnostics(&DocumentUri::new(MAIN_URI));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Conflicting parameter: Could not infer type of Lval reference: Width 17 exceeds the maximum integer width 16"
        );
        assert_eq!(diagnostics[0].node_id, call.arguments[0].id);
        Ok(())
    }
}
