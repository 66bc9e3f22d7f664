//! Programmatic AST construction.
//!
//! Parsing lives outside this workspace; hosts and tests assemble trees with
//! the associated functions on [`Builder`]. Each function allocates a fresh
//! node id, so nested calls compose naturally:
//!
//! ```
//! use miniprob_ast::builder::Builder;
//! use miniprob_ast::nodes::DeclaredType;
//!
//! let main = Builder::func(
//!     "main",
//!     vec![],
//!     vec![],
//!     vec![Builder::assignment(Builder::lval("flag"), Builder::bool_literal(false))],
//! );
//! let program = Builder::program(
//!     vec![],
//!     vec![Builder::decl(DeclaredType::Bool, &["flag"])],
//!     vec![main],
//! );
//! assert_eq!(program.functions.len(), 1);
//! ```
//!
//! # Node ID Assignment
//!
//! Node ids come from one process-wide atomic counter starting at 1, so ids
//! stay unique across documents. Zero is reserved for "no node".
//!
//! # Source Text
//!
//! Every node records a rendering of its source text in `location.source`.
//! Integer literals render as `[-]<value><suffix>` and functions render with
//! balanced braces. The `*_with_source` variants take the text verbatim,
//! which is how hosts hand over what the user actually typed.

use std::{
    rc::Rc,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    nodes::{
        Argument, AssignedValue, Assignment, BinaryExpression, Block, BoolLiteral, Decl,
        DeclaredType, Distribution, DistributionKind, Expression, FileImport, Func, FuncCall,
        IfThenElse, IntLiteral, Literal, Location, LogicalNegation, Lval, Observation,
        OperatorKind, Param, ProbChoice, ProbabilisticAssignment, Program, Query, Statement,
        Throw, TryCatch, UnaryOperatorKind, While,
    },
    reference::{Reference, ReferenceKind},
};

pub struct Builder;

impl Builder {
    #[must_use]
    pub fn program(
        imports: Vec<Rc<FileImport>>,
        declarations: Vec<Rc<Decl>>,
        functions: Vec<Rc<Func>>,
    ) -> Rc<Program> {
        Rc::new(Program {
            id: Self::get_node_id(),
            location: Location::default(),
            imports,
            declarations,
            functions,
        })
    }

    #[must_use]
    pub fn import(path: &str) -> Rc<FileImport> {
        Rc::new(FileImport {
            id: Self::get_node_id(),
            location: Location::from_source(format!("import \"{path}\"")),
            path: path.to_string(),
        })
    }

    #[must_use]
    pub fn decl(declared_type: DeclaredType, names: &[&str]) -> Rc<Decl> {
        let source = format!("{declared_type} {}", names.join(", "));
        Rc::new(Decl {
            id: Self::get_node_id(),
            location: Location::from_source(source),
            declared_type,
            names: names.iter().map(ToString::to_string).collect(),
        })
    }

    #[must_use]
    pub fn param(name: &str, declared_type: DeclaredType, by_reference: bool) -> Rc<Param> {
        let marker = if by_reference { "&" } else { "" };
        Rc::new(Param {
            id: Self::get_node_id(),
            location: Location::from_source(format!("{declared_type} {marker}{name}")),
            name: name.to_string(),
            declared_type,
            by_reference,
        })
    }

    /// A function with a body.
    #[must_use]
    pub fn func(
        name: &str,
        params: Vec<Rc<Param>>,
        declarations: Vec<Rc<Decl>>,
        statements: Vec<Statement>,
    ) -> Rc<Func> {
        let source = format!("{name}() {{ }}");
        Self::func_with_source(name, params, declarations, Some(statements), &source)
    }

    /// A bodiless placeholder, as produced for a call whose target does not
    /// exist yet.
    #[must_use]
    pub fn ghost_func(name: &str) -> Rc<Func> {
        Self::func_with_source(name, vec![], vec![], None, name)
    }

    #[must_use]
    pub fn func_with_source(
        name: &str,
        params: Vec<Rc<Param>>,
        declarations: Vec<Rc<Decl>>,
        statements: Option<Vec<Statement>>,
        source: &str,
    ) -> Rc<Func> {
        Rc::new(Func {
            id: Self::get_node_id(),
            location: Location::from_source(source),
            name: name.to_string(),
            params,
            declarations,
            body: statements.map(Self::block),
        })
    }

    #[must_use]
    pub fn block(statements: Vec<Statement>) -> Rc<Block> {
        Rc::new(Block {
            id: Self::get_node_id(),
            location: Location::default(),
            statements,
        })
    }

    #[must_use]
    pub fn assignment(target: Rc<Lval>, value: Expression) -> Statement {
        Statement::Assignment(Self::assignment_node(target, AssignedValue::Expression(value)))
    }

    /// `target = Bernoulli(..)` / `target = Uniform(..)`
    #[must_use]
    pub fn draw(target: Rc<Lval>, distribution: Rc<Distribution>) -> Statement {
        Statement::Assignment(Self::assignment_node(
            target,
            AssignedValue::Distribution(distribution),
        ))
    }

    #[must_use]
    pub fn assignment_node(target: Rc<Lval>, value: AssignedValue) -> Rc<Assignment> {
        Rc::new(Assignment {
            id: Self::get_node_id(),
            location: Location::default(),
            target,
            value,
        })
    }

    #[must_use]
    pub fn call(name: &str, arguments: Vec<Expression>) -> Statement {
        Statement::FunctionCall(Self::call_node(name, arguments))
    }

    #[must_use]
    pub fn call_node(name: &str, arguments: Vec<Expression>) -> Rc<FuncCall> {
        Rc::new(FuncCall {
            id: Self::get_node_id(),
            location: Location::from_source(name),
            reference: Reference::new(name, ReferenceKind::Function),
            arguments: arguments.into_iter().map(Self::argument).collect(),
        })
    }

    #[must_use]
    pub fn argument(expression: Expression) -> Rc<Argument> {
        Rc::new(Argument {
            id: Self::get_node_id(),
            location: Location::default(),
            expression,
        })
    }

    #[must_use]
    pub fn query(name: &str, arguments: Vec<Expression>) -> Statement {
        Statement::Query(Rc::new(Query {
            id: Self::get_node_id(),
            location: Location::default(),
            call: Self::call_node(name, arguments),
        }))
    }

    #[must_use]
    pub fn observe(condition: Expression) -> Statement {
        Statement::Observation(Rc::new(Observation {
            id: Self::get_node_id(),
            location: Location::default(),
            condition,
        }))
    }

    #[must_use]
    pub fn if_then_else(
        condition: Expression,
        then_statements: Vec<Statement>,
        else_statements: Option<Vec<Statement>>,
    ) -> Statement {
        Statement::If(Rc::new(IfThenElse {
            id: Self::get_node_id(),
            location: Location::default(),
            condition,
            then_block: Self::block(then_statements),
            else_block: else_statements.map(Self::block),
        }))
    }

    #[must_use]
    pub fn while_loop(condition: Expression, statements: Vec<Statement>) -> Statement {
        Statement::While(Rc::new(While {
            id: Self::get_node_id(),
            location: Location::default(),
            condition,
            body: Self::block(statements),
        }))
    }

    #[must_use]
    pub fn try_catch(try_statements: Vec<Statement>, catch_statements: Vec<Statement>) -> Statement {
        Statement::TryCatch(Rc::new(TryCatch {
            id: Self::get_node_id(),
            location: Location::default(),
            try_block: Self::block(try_statements),
            catch_block: Self::block(catch_statements),
        }))
    }

    #[must_use]
    pub fn throw() -> Statement {
        Statement::Throw(Rc::new(Throw {
            id: Self::get_node_id(),
            location: Location::from_source("throw"),
        }))
    }

    #[must_use]
    pub fn lval(name: &str) -> Rc<Lval> {
        Self::lval_node(name, None)
    }

    #[must_use]
    pub fn indexed_lval(name: &str, index: Expression) -> Rc<Lval> {
        Self::lval_node(name, Some(index))
    }

    fn lval_node(name: &str, index: Option<Expression>) -> Rc<Lval> {
        Rc::new(Lval {
            id: Self::get_node_id(),
            location: Location::from_source(name),
            reference: Reference::new(name, ReferenceKind::Variable),
            index,
        })
    }

    /// Variable use as an expression.
    #[must_use]
    pub fn var(name: &str) -> Expression {
        Expression::Lval(Self::lval(name))
    }

    /// Indexed array element use as an expression.
    #[must_use]
    pub fn element(name: &str, index: Expression) -> Expression {
        Expression::Lval(Self::indexed_lval(name, index))
    }

    #[must_use]
    pub fn bool_literal(value: bool) -> Expression {
        Expression::Literal(Literal::Bool(Rc::new(BoolLiteral {
            id: Self::get_node_id(),
            location: Location::from_source(value.to_string()),
            value,
        })))
    }

    /// Non-negative integer literal such as `3u8`.
    #[must_use]
    pub fn int_literal(value: u64, suffix: &str) -> Expression {
        Self::int_literal_with_source(false, value, suffix, &format!("{value}{suffix}"))
    }

    /// Negative integer literal such as `-3s8`.
    #[must_use]
    pub fn negative_literal(value: u64, suffix: &str) -> Expression {
        Self::int_literal_with_source(true, value, suffix, &format!("-{value}{suffix}"))
    }

    #[must_use]
    pub fn int_literal_with_source(
        negative: bool,
        value: u64,
        suffix: &str,
        source: &str,
    ) -> Expression {
        Expression::Literal(Literal::Integer(Rc::new(IntLiteral {
            id: Self::get_node_id(),
            location: Location::from_source(source),
            negative,
            value,
            suffix: suffix.to_string(),
        })))
    }

    #[must_use]
    pub fn binary(left: Expression, operator: OperatorKind, right: Expression) -> Expression {
        Expression::Binary(Rc::new(BinaryExpression {
            id: Self::get_node_id(),
            location: Location::default(),
            left,
            operator,
            right,
        }))
    }

    #[must_use]
    pub fn not(operand: Expression) -> Expression {
        Expression::Negation(Rc::new(LogicalNegation {
            id: Self::get_node_id(),
            location: Location::default(),
            operator: UnaryOperatorKind::Not,
            operand,
        }))
    }

    #[must_use]
    pub fn prob_choice(numerator: Expression, denominator: Expression) -> Rc<ProbChoice> {
        Rc::new(ProbChoice {
            id: Self::get_node_id(),
            location: Location::default(),
            numerator,
            denominator,
        })
    }

    /// `head { n1 : d1 } f1 { n2 : d2 } f2 ...`, one `(numerator,
    /// denominator, fallback)` triple per branch.
    #[must_use]
    pub fn probabilistic(
        head: Expression,
        branches: Vec<(Expression, Expression, Expression)>,
    ) -> Expression {
        let mut choices = Vec::with_capacity(branches.len());
        let mut fallbacks = Vec::with_capacity(branches.len());
        for (numerator, denominator, fallback) in branches {
            choices.push(Self::prob_choice(numerator, denominator));
            fallbacks.push(fallback);
        }
        Expression::Probabilistic(Rc::new(ProbabilisticAssignment {
            id: Self::get_node_id(),
            location: Location::default(),
            head,
            choices,
            fallbacks,
        }))
    }

    #[must_use]
    pub fn bernoulli(p: Expression, q: Expression) -> Rc<Distribution> {
        Self::distribution(DistributionKind::Bernoulli, Some(p), Some(q))
    }

    #[must_use]
    pub fn uniform(lower: Expression, upper: Expression) -> Rc<Distribution> {
        Self::distribution(DistributionKind::Uniform, Some(lower), Some(upper))
    }

    /// Distribution with possibly missing arguments, in declaration order
    /// (`p, q` or `lower, upper`).
    #[must_use]
    pub fn distribution(
        kind: DistributionKind,
        first: Option<Expression>,
        second: Option<Expression>,
    ) -> Rc<Distribution> {
        let (p, q, lower, upper) = match kind {
            DistributionKind::Bernoulli => (first, second, None, None),
            DistributionKind::Uniform => (None, None, first, second),
        };
        Rc::new(Distribution {
            id: Self::get_node_id(),
            location: Location::from_source(kind.to_string()),
            kind,
            p,
            q,
            lower,
            upper,
        })
    }

    fn get_node_id() -> u32 {
        static COUNTER: AtomicU32 = AtomicU32::new(1);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}
