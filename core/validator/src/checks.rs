//! The per-node rule set.
//!
//! Each check inspects one node kind, reports through the [`CheckContext`]
//! and never fails. Operand types are checked for inference errors first;
//! compatibility and legality rules only run on error-free operands.

use std::{rc::Rc, sync::LazyLock};

use miniprob_ast::{
    document::Document,
    nodes::{
        AssignedValue, AstNode, DeclaredType, Definition, Expression, Func, Literal, Lval, Misc,
        Statement,
    },
    reference::{Reference, ResolvedSymbol},
};
use miniprob_type_checker::{
    compatible::is_compatible,
    errors::InferenceErrorKind,
    infer::{InferenceCache, infer_distribution, infer_expression, infer_param},
    operation::{Operation, is_legal_operation},
    type_info::{LiteralValue, TypeDescription},
};
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::diagnostic::{Diagnostic, DiagnosticSink};

static WELL_FORMED_INTEGER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d+[uUsS]\d+$").expect("integer literal pattern is valid")
});

/// State shared by all checks during one validation pass.
pub struct CheckContext<'a> {
    document: &'a Document,
    cache: &'a mut InferenceCache,
    sink: &'a mut DiagnosticSink,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        document: &'a Document,
        cache: &'a mut InferenceCache,
        sink: &'a mut DiagnosticSink,
    ) -> Self {
        Self {
            document,
            cache,
            sink,
        }
    }

    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn infer(&mut self, expression: &Expression) -> TypeDescription {
        infer_expression(expression, self.cache)
    }

    pub fn accept(&mut self, diagnostic: Diagnostic) {
        self.sink.accept(diagnostic);
    }

    /// Reports `ty` if it is an inference error and returns whether it was.
    ///
    /// The diagnostic goes to the node that caused the error when it belongs
    /// to this document, otherwise to `node` and `property`. Errors that only
    /// restate a failed link are swallowed; the linker reported those.
    fn propagate(
        &mut self,
        ty: &TypeDescription,
        node: &AstNode,
        property: Option<&'static str>,
    ) -> bool {
        let Some(error) = ty.as_error() else {
            return false;
        };
        if error.kind == InferenceErrorKind::MissingLinkedReference {
            return true;
        }
        let source = error
            .source
            .and_then(|id| self.document.arena.find_node(id));
        let diagnostic = match source {
            Some(source) => Diagnostic::error(source.id(), source.location(), error.message()),
            None => {
                let diagnostic = Diagnostic::error(node.id(), node.location(), error.message());
                match property {
                    Some(property) => diagnostic.with_property(property),
                    None => diagnostic,
                }
            }
        };
        self.accept(diagnostic);
        true
    }
}

/// An indexed `Lval` needs an integer index.
pub fn check_array_access(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Expression(Expression::Lval(lval)) = node else {
        return;
    };
    let Some(index) = &lval.index else {
        return;
    };
    let ty = ctx.infer(index);
    if ctx.propagate(&ty, node, Some("index")) {
        return;
    }
    if !ty.is_integer() {
        ctx.accept(
            Diagnostic::error(
                lval.id,
                lval.location.clone(),
                format!("Index type '{ty}' not compatible with integer"),
            )
            .with_property("index"),
        );
    }
}

/// Scalars cannot be indexed, and arrays must be indexed unless they are
/// passed whole as a call argument.
pub fn check_lval_shape(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Expression(Expression::Lval(lval)) = node else {
        return;
    };
    let Some(declared) = declared_type_of(&lval.reference) else {
        return;
    };
    let name = &lval.reference.name;
    match (declared.is_array(), lval.index.is_some()) {
        (false, true) => ctx.accept(
            Diagnostic::error(
                lval.id,
                lval.location.clone(),
                format!("Variable '{name}' is not an array and cannot be indexed."),
            )
            .with_property("index"),
        ),
        (true, false) if !is_call_argument(ctx.document(), lval) => ctx.accept(Diagnostic::error(
            lval.id,
            lval.location.clone(),
            format!("Array '{name}' must be accessed with an index."),
        )),
        _ => {}
    }
}

pub fn check_assignment(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Statement(Statement::Assignment(assignment)) = node else {
        return;
    };
    let left = ctx.infer(&Expression::Lval(assignment.target.clone()));
    let right = match &assignment.value {
        AssignedValue::Expression(expression) => ctx.infer(expression),
        AssignedValue::Distribution(distribution) if !distribution.is_complete() => {
            // the distribution check reports the missing argument
            ctx.propagate(&left, node, None);
            return;
        }
        AssignedValue::Distribution(distribution) => infer_distribution(distribution, ctx.cache),
    };
    let left_failed = ctx.propagate(&left, node, None);
    let right_failed = ctx.propagate(&right, node, None);
    if left_failed || right_failed {
        return;
    }
    if !is_compatible(&left, &right) {
        ctx.accept(
            Diagnostic::error(
                assignment.id,
                assignment.location.clone(),
                format!("Type {right} is not assignable to {left}."),
            )
            .with_property("value"),
        );
    }
}

/// Arity and argument types of a linked call. By-reference parameters take
/// named variables of exactly the parameter's type.
pub fn check_function_call(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Statement(Statement::FunctionCall(call)) = node else {
        return;
    };
    let Some(func) = linked_function(&call.reference) else {
        return;
    };
    if func.params.len() != call.arguments.len() {
        ctx.accept(
            Diagnostic::error(
                call.id,
                call.location.clone(),
                "Number of parameters does not match.",
            )
            .with_property("arguments"),
        );
        return;
    }

    let mut diagnostics = Vec::new();
    for (argument, param) in call.arguments.iter().zip(&func.params) {
        let argument_type = ctx.infer(&argument.expression);
        let param_type = infer_param(param, ctx.cache);
        let at_argument =
            |message: String| Diagnostic::error(argument.id, argument.location.clone(), message);

        let mut skip_compatibility = false;
        if let Some(error) = argument_type.as_error() {
            if error.kind != InferenceErrorKind::MissingLinkedReference {
                diagnostics.push(at_argument(format!("Conflicting argument: {}", error.message())));
            }
            skip_compatibility = true;
        }
        if let Some(error) = param_type.as_error() {
            let message = format!("Conflicting parameter: {}", error.message());
            // parameters of imported functions live in another document
            diagnostics.push(if ctx.document().arena.find_node(param.id).is_some() {
                Diagnostic::error(param.id, param.location.clone(), message)
            } else {
                at_argument(message)
            });
            skip_compatibility = true;
        }
        if !skip_compatibility && !is_compatible(&param_type, &argument_type) {
            diagnostics.push(at_argument(format!(
                "Argument type '{argument_type}' cannot be passed to '{param_type}'"
            )));
            skip_compatibility = true;
        }

        if param.by_reference {
            if !matches!(argument.expression, Expression::Lval(_)) {
                diagnostics.push(at_argument(
                    "Value-result parameter expect named variables.".to_string(),
                ));
            }
            if !skip_compatibility && !is_compatible(&argument_type, &param_type) {
                diagnostics.push(at_argument(
                    "Value-result parameter and argument types must match.".to_string(),
                ));
            }
        }
    }
    for diagnostic in diagnostics {
        ctx.accept(diagnostic);
    }
}

/// `main` takes no parameters and function names are unique per program.
/// Bodiless placeholders take no part in the uniqueness rule.
pub fn check_function_definition(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Definition(Definition::Function(func)) = node else {
        return;
    };
    if func.name == "main" && func.has_params() {
        ctx.accept(
            Diagnostic::error(
                func.id,
                func.location.clone(),
                "Function 'main' cannot have any arguments.",
            )
            .with_property("params"),
        );
    }
    if !func.has_body() {
        return;
    }
    let Some(program) = ctx.document().arena.program() else {
        return;
    };
    let duplicated = program
        .real_functions()
        .any(|other| other.id != func.id && other.name == func.name);
    if duplicated {
        ctx.accept(
            Diagnostic::error(
                func.id,
                func.location.clone(),
                format!("Function with name {} already exists", func.name),
            )
            .with_property("name"),
        );
    }
}

/// A queried function needs an output channel: at least one by-reference
/// parameter.
pub fn check_query(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Statement(Statement::Query(query)) = node else {
        return;
    };
    let Some(func) = linked_function(&query.call.reference) else {
        return;
    };
    if !func.has_params() {
        ctx.accept(Diagnostic::error(
            query.id,
            query.location.clone(),
            "Queried function must use at least one argument.",
        ));
        return;
    }
    if func.params.iter().any(|param| param.by_reference) {
        return;
    }
    ctx.accept(
        Diagnostic::error(
            query.id,
            query.location.clone(),
            "At least one parameter must be value-result (by reference).",
        )
        .with_property("call"),
    );
}

/// `numerator : denominator` must denote a probability in `[0, 1]`.
pub fn check_probabilistic_choice(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Misc(Misc::ProbChoice(choice)) = node else {
        return;
    };
    let numerator = ctx.infer(&choice.numerator);
    let denominator = ctx.infer(&choice.denominator);
    let numerator_failed = ctx.propagate(&numerator, node, Some("numerator"));
    let denominator_failed = ctx.propagate(&denominator, node, Some("denominator"));
    if numerator_failed || denominator_failed {
        return;
    }
    let at_choice = |message: String| Diagnostic::error(choice.id, choice.location.clone(), message);

    if !is_legal_operation(Operation::Ratio, &numerator, Some(&denominator)) {
        ctx.accept(at_choice(format!(
            "This operation ':' is not possible with types '{numerator}' and '{denominator}'"
        )));
        return;
    }
    if denominator.literal().is_some_and(LiteralValue::is_zero) {
        ctx.accept(at_choice("Division by 0 not possible.".to_string()));
        return;
    }
    let exceeds_one = matches!(
        (numerator.literal(), denominator.literal()),
        (Some(numerator), Some(denominator)) if numerator.value > denominator.value
    );
    if may_be_negative(&numerator) || may_be_negative(&denominator) || exceeds_one {
        ctx.accept(at_choice(
            "Probability value must be 0...1 and cannot be negative".to_string(),
        ));
    }
}

pub fn check_distribution(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Misc(Misc::Distribution(distribution)) = node else {
        return;
    };
    if !distribution.is_complete() {
        ctx.accept(Diagnostic::error(
            distribution.id,
            distribution.location.clone(),
            "Distributions expect two arguments",
        ));
        return;
    }
    let arguments: Vec<(&'static str, TypeDescription)> = distribution
        .arguments()
        .into_iter()
        .filter_map(|(property, expression)| expression.map(|e| (property, ctx.infer(e))))
        .collect();

    let mut failed = false;
    for (_, ty) in &arguments {
        failed |= ctx.propagate(ty, node, None);
    }
    if failed {
        return;
    }
    for (property, ty) in &arguments {
        if !ty.is_integer() {
            ctx.accept(
                Diagnostic::error(
                    distribution.id,
                    distribution.location.clone(),
                    format!("Argument type '{ty}' not compatible with 'integer'"),
                )
                .with_property(*property),
            );
        }
    }
}

pub fn check_binary_expression(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Expression(Expression::Binary(binary)) = node else {
        return;
    };
    let left = ctx.infer(&binary.left);
    let right = ctx.infer(&binary.right);
    let left_failed = ctx.propagate(&left, node, None);
    let right_failed = ctx.propagate(&right, node, None);
    if left_failed || right_failed {
        return;
    }
    if !is_legal_operation(binary.operator, &left, Some(&right)) {
        ctx.accept(Diagnostic::error(
            binary.id,
            binary.location.clone(),
            format!(
                "The operation '{}' cannot be performed on types '{left}' and '{right}'",
                binary.operator
            ),
        ));
    }
}

pub fn check_logical_negation(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Expression(Expression::Negation(negation)) = node else {
        return;
    };
    let operand = ctx.infer(&negation.operand);
    if ctx.propagate(&operand, node, Some("operand")) {
        return;
    }
    if !is_legal_operation(negation.operator, &operand, None) {
        ctx.accept(
            Diagnostic::error(
                negation.id,
                negation.location.clone(),
                format!(
                    "The operation '{}' is not possible on type '{operand}'",
                    negation.operator
                ),
            )
            .with_property("operand"),
        );
    }
}

/// Integer literals are single tokens: `[+-]<digits><u|s><digits>`.
pub fn check_integer_literal(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Expression(Expression::Literal(Literal::Integer(literal))) = node else {
        return;
    };
    let source = literal.location.source.as_str();
    if source.is_empty() || WELL_FORMED_INTEGER_LITERAL.is_match(source) {
        return;
    }
    ctx.accept(Diagnostic::error(
        literal.id,
        literal.location.clone(),
        "No spaces are allowed in integer literals",
    ));
}

/// Names are unique within a declaration statement and may not repeat a
/// program-level name or, for locals, another local of the same function.
pub fn check_declaration_ids(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Definition(Definition::Declaration(decl)) = node else {
        return;
    };
    let document = ctx.document();
    let program = document.arena.program();
    let function = document.arena.enclosing_function(decl.id);
    let forbidden: FxHashSet<&str> = program
        .iter()
        .flat_map(|program| program.declarations.iter())
        .chain(function.iter().flat_map(|func| func.declarations.iter()))
        .filter(|other| other.id != decl.id)
        .flat_map(|other| other.names.iter().map(String::as_str))
        .collect();

    let mut seen = FxHashSet::default();
    let mut duplicate = None;
    for (index, name) in decl.names.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            duplicate = Some(index);
        }
    }
    if let Some(index) = duplicate {
        ctx.accept(
            Diagnostic::error(
                decl.id,
                decl.location.clone(),
                "Identifier is already declared here",
            )
            .with_property("names")
            .at_index(index),
        );
    }

    for (index, name) in decl.names.iter().enumerate() {
        if forbidden.contains(name.as_str()) {
            ctx.accept(
                Diagnostic::error(
                    decl.id,
                    decl.location.clone(),
                    format!("Identifier '{name}' is already declared"),
                )
                .with_property("names")
                .at_index(index),
            );
        }
    }
}

pub fn check_observation(node: &AstNode, ctx: &mut CheckContext<'_>) {
    let AstNode::Statement(Statement::Observation(observation)) = node else {
        return;
    };
    let condition = ctx.infer(&observation.condition);
    if ctx.propagate(&condition, node, Some("condition")) {
        return;
    }
    if !condition.is_boolean() {
        ctx.accept(
            Diagnostic::error(
                observation.id,
                observation.location.clone(),
                "Only boolean expressions can be observed",
            )
            .with_property("condition"),
        );
    }
}

fn linked_function(reference: &Reference) -> Option<Rc<Func>> {
    reference
        .target()
        .and_then(|symbol| symbol.as_function().cloned())
}

fn declared_type_of(reference: &Reference) -> Option<DeclaredType> {
    match reference.target()? {
        ResolvedSymbol::Declaration(decl) => Some(decl.declared_type.clone()),
        ResolvedSymbol::Parameter(param) => Some(param.declared_type.clone()),
        ResolvedSymbol::Function(_) => None,
    }
}

fn is_call_argument(document: &Document, lval: &Lval) -> bool {
    document
        .arena
        .find_parent_node(lval.id)
        .and_then(|parent| document.arena.find_node(parent))
        .is_some_and(|parent| matches!(parent, AstNode::Misc(Misc::Argument(_))))
}

/// Literals are negative only when written so; other values are possibly
/// negative whenever their type is signed.
fn may_be_negative(ty: &TypeDescription) -> bool {
    match ty.literal() {
        Some(literal) => literal.negative,
        None => ty.is_signed(),
    }
}
