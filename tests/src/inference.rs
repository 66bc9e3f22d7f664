/// Type inference, compatibility and operator legality.
///
/// These tests drive the type checker directly on literal expressions, and
/// through the full pipeline where a linked reference is needed.
#[cfg(test)]
mod inference_tests {
    use crate::utils::{analyze_with, main_messages, main_program, messages_of};
    use miniprob::config::{AnalysisConfig, MAX_INTEGER_WIDTH_LIMIT};
    use miniprob_ast::{
        builder::Builder,
        nodes::{
            BinaryExpression, DeclaredType, Expression, Location, OperatorKind, UnaryOperatorKind,
        },
    };
    use miniprob_type_checker::{
        compatible::is_compatible,
        errors::InferenceErrorKind,
        infer::{InferenceCache, InferenceState, infer_distribution, infer_expression},
        operation::{Operation, is_legal_operation},
        type_info::TypeDescription,
    };
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    const WIDTHS: [u32; 8] = [1, 2, 7, 8, 16, 31, 32, 63];

    fn infer(expression: &Expression) -> TypeDescription {
        infer_expression(expression, &mut InferenceCache::new())
    }

    fn error_kind(ty: &TypeDescription) -> Option<InferenceErrorKind> {
        ty.as_error().map(|error| error.kind.clone())
    }

    #[test]
    fn test_literal_suffix_sets_width_and_sign() {
        for width in WIDTHS {
            for (prefix, signed) in [("u", false), ("s", true)] {
                let suffix = format!("{prefix}{width}");
                let ty = infer(&Builder::int_literal((1 << width) - 1, &suffix));
                let integer = ty.as_integer().unwrap();
                assert_eq!((integer.width, integer.signed), (width, signed), "suffix {suffix}");
            }
        }
    }

    #[test]
    fn test_literal_value_must_fit_width() {
        for width in WIDTHS {
            let suffix = format!("u{width}");
            assert_eq!(
                error_kind(&infer(&Builder::int_literal(1 << width, &suffix))),
                Some(InferenceErrorKind::ValueOutOfRange {
                    value: 1 << width,
                    width
                }),
                "suffix {suffix}"
            );
        }
        assert!(infer(&Builder::int_literal(u64::MAX, "u64")).is_integer());
    }

    #[test]
    fn test_negative_literal_needs_signed_suffix() {
        for width in WIDTHS {
            let ty = infer(&Builder::negative_literal(1, &format!("u{width}")));
            assert_eq!(error_kind(&ty), Some(InferenceErrorKind::NegativeUnsigned));
            assert!(infer(&Builder::negative_literal(1, &format!("s{width}"))).is_integer());
        }
    }

    #[test]
    fn test_width_ceiling_is_configurable() {
        let mut cache = InferenceCache::with_max_integer_width(16);
        assert!(infer_expression(&Builder::int_literal(1, "u16"), &mut cache).is_integer());
        let ty = infer_expression(&Builder::int_literal(1, "u17"), &mut cache);
        assert_eq!(
            ty.as_error().map(|error| error.message()),
            Some("Could not infer type for IntLiteral: Width 17 exceeds the maximum integer width 16".to_string())
        );
    }

    #[test]
    fn test_integer_compatibility_is_reflexive_and_rejects_narrowing() {
        for width in WIDTHS {
            for signed in [false, true] {
                let ty = TypeDescription::integer(width, signed);
                assert!(is_compatible(&ty, &ty));
            }
            let narrow = TypeDescription::integer(width, false);
            let wide = TypeDescription::integer(width + 1, false);
            assert!(!is_compatible(&narrow, &wide));
            assert!(is_compatible(&wide, &narrow));
        }
        // s9 holds eight magnitude bits, like u8
        assert!(is_compatible(
            &TypeDescription::integer(9, true),
            &TypeDescription::integer(8, false)
        ));
    }

    #[test]
    fn test_boolean_accepts_single_bits() {
        let boolean = TypeDescription::boolean();
        assert!(is_compatible(&boolean, &TypeDescription::integer(1, false)));
        assert!(!is_compatible(&boolean, &TypeDescription::integer(1, true)));
        assert!(!is_compatible(&boolean, &TypeDescription::integer(8, false)));
        assert!(is_compatible(&boolean, &infer(&Builder::int_literal(1, "u8"))));
        assert!(!is_compatible(&boolean, &infer(&Builder::int_literal(2, "u8"))));
        assert!(!is_compatible(&TypeDescription::integer(8, false), &boolean));
    }

    #[test]
    fn test_arithmetic_widens_to_larger_effective_width() {
        let sum = infer(&Builder::binary(
            Builder::int_literal(1, "u8"),
            OperatorKind::Add,
            Builder::int_literal(1, "s16"),
        ));
        let integer = sum.as_integer().unwrap();
        assert_eq!((integer.width, integer.signed), (16, true));

        let product = infer(&Builder::binary(
            Builder::int_literal(1, "u8"),
            OperatorKind::Mul,
            Builder::int_literal(1, "s8"),
        ));
        assert_eq!(product.to_string(), "signed integer9");
    }

    #[test]
    fn test_widening_at_the_width_ceiling_stays_in_range() -> anyhow::Result<()> {
        let config = AnalysisConfig::from_toml_str(&format!(
            "[types]\nmax-integer-width = {MAX_INTEGER_WIDTH_LIMIT}\n"
        ))?;
        let widest = format!("u{MAX_INTEGER_WIDTH_LIMIT}");
        let program = main_program(
            vec![],
            vec![Builder::observe(Builder::binary(
                Builder::binary(
                    Builder::int_literal(1, &widest),
                    OperatorKind::Add,
                    Builder::int_literal(1, "s8"),
                ),
                OperatorKind::Lt,
                Builder::int_literal(1, "u8"),
            ))],
        );
        assert_eq!(main_messages(&analyze_with(program, &config)), Vec::<String>::new());
        Ok(())
    }

    #[test]
    fn test_comparisons_yield_boolean() {
        for operator in [OperatorKind::Lt, OperatorKind::Eq, OperatorKind::And] {
            let ty = infer(&Builder::binary(
                Builder::int_literal(1, "u8"),
                operator,
                Builder::bool_literal(true),
            ));
            assert!(ty.is_boolean(), "{operator}");
        }
    }

    #[test]
    fn test_division_by_literal_zero_is_an_inference_error() {
        for operator in [OperatorKind::Div, OperatorKind::Mod] {
            let ty = infer(&Builder::binary(
                Builder::int_literal(4, "s8"),
                operator,
                Builder::int_literal(0, "s8"),
            ));
            assert_eq!(error_kind(&ty), Some(InferenceErrorKind::DivisionByZero));
        }
        let messages = messages_of(main_program(
            vec![Builder::decl(DeclaredType::int("s8"), &["x"])],
            vec![Builder::assignment(
                Builder::lval("x"),
                Builder::binary(Builder::var("x"), OperatorKind::Div, Builder::int_literal(0, "s8")),
            )],
        ));
        assert_eq!(messages, vec!["Division by 0".to_string()]);
    }

    #[test]
    fn test_distribution_result_types() {
        let mut cache = InferenceCache::new();
        let coin = infer_distribution(
            &Builder::bernoulli(Builder::int_literal(1, "u8"), Builder::int_literal(2, "u8")),
            &mut cache,
        );
        assert_eq!(coin.to_string(), "unsigned integer1");
        assert!(is_compatible(&TypeDescription::boolean(), &coin));

        let die = infer_distribution(
            &Builder::uniform(Builder::int_literal(1, "u2"), Builder::int_literal(6, "s4")),
            &mut cache,
        );
        assert_eq!(die.to_string(), "signed integer4");

        let broken = infer_distribution(
            &Builder::uniform(Builder::int_literal(1, "u2"), Builder::bool_literal(true)),
            &mut cache,
        );
        assert_eq!(error_kind(&broken), Some(InferenceErrorKind::NonIntegerDistribution));
    }

    #[test]
    fn test_probabilistic_branches_share_a_type() {
        let widened = infer(&Builder::probabilistic(
            Builder::int_literal(1, "u4"),
            vec![(
                Builder::int_literal(1, "u8"),
                Builder::int_literal(2, "u8"),
                Builder::int_literal(1, "s8"),
            )],
        ));
        assert_eq!(widened.to_string(), "signed integer8");

        let mismatched = infer(&Builder::probabilistic(
            Builder::int_literal(1, "u4"),
            vec![(
                Builder::int_literal(1, "u8"),
                Builder::int_literal(2, "u8"),
                Builder::bool_literal(false),
            )],
        ));
        assert_eq!(error_kind(&mismatched), Some(InferenceErrorKind::MismatchedBranches));
    }

    #[test]
    fn test_results_are_memoized() {
        let mut cache = InferenceCache::new();
        let expression = Builder::binary(
            Builder::int_literal(3, "u8"),
            OperatorKind::Sub,
            Builder::int_literal(1, "u8"),
        );
        let first = infer_expression(&expression, &mut cache);
        let entries = cache.len();
        let second = infer_expression(&expression, &mut cache);
        assert_eq!(first, second);
        assert_eq!(cache.len(), entries);
    }

    #[test]
    fn test_node_reached_again_during_its_own_inference_is_recursive() {
        // identity is the node id, so an operand sharing its parent's id
        // re-enters the parent while it is still being inferred
        let operand = Builder::int_literal(3, "u8");
        let looping = Expression::Binary(Rc::new(BinaryExpression {
            id: operand.id(),
            location: Location::default(),
            left: operand.clone(),
            operator: OperatorKind::Add,
            right: Builder::int_literal(1, "u8"),
        }));
        let mut cache = InferenceCache::new();
        let ty = infer_expression(&looping, &mut cache);
        assert_eq!(error_kind(&ty), Some(InferenceErrorKind::RecursiveDefinition));
        assert_eq!(cache.state(looping.id()), Some(&InferenceState::Done(ty.clone())));
        assert_eq!(infer_expression(&operand, &mut cache), ty);
    }

    #[test]
    fn test_operator_legality() {
        let int = TypeDescription::integer(8, false);
        let boolean = TypeDescription::boolean();
        assert!(is_legal_operation(OperatorKind::Add, &int, Some(&int)));
        assert!(!is_legal_operation(OperatorKind::Add, &int, Some(&boolean)));
        assert!(!is_legal_operation(OperatorKind::Lt, &int, None));
        assert!(is_legal_operation(OperatorKind::Or, &boolean, Some(&boolean)));
        assert!(!is_legal_operation(OperatorKind::And, &int, Some(&boolean)));
        assert!(is_legal_operation(OperatorKind::Eq, &int, Some(&boolean)));
        assert!(is_legal_operation(UnaryOperatorKind::Not, &boolean, None));
        assert!(!is_legal_operation(UnaryOperatorKind::Not, &int, None));
        assert!(is_legal_operation(Operation::Ratio, &int, Some(&int)));
        assert!(!is_legal_operation(Operation::Ratio, &boolean, Some(&int)));
    }
}
