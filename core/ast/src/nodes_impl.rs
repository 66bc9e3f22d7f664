use std::rc::Rc;

use crate::nodes::{
    Argument, AssignedValue, Ast, AstNode, Decl, DeclaredType, Definition, Distribution,
    DistributionKind, Expression, Func, FuncCall, IntLiteral, Literal, Lval, Misc, NodeKind,
    Program, Statement,
};

impl AstNode {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            AstNode::Ast(Ast::Program(_)) => NodeKind::Program,
            AstNode::Definition(definition) => match definition {
                Definition::Import(_) => NodeKind::FileImport,
                Definition::Declaration(_) => NodeKind::Decl,
                Definition::Function(_) => NodeKind::Func,
                Definition::Parameter(_) => NodeKind::Param,
            },
            AstNode::Statement(statement) => statement.kind(),
            AstNode::Expression(expression) => expression.kind(),
            AstNode::Misc(misc) => match misc {
                Misc::Block(_) => NodeKind::Block,
                Misc::Argument(_) => NodeKind::Argument,
                Misc::ProbChoice(_) => NodeKind::ProbChoice,
                Misc::Distribution(_) => NodeKind::Distribution,
            },
        }
    }

    /// Direct children in source order.
    #[must_use]
    pub fn children(&self) -> Vec<AstNode> {
        let mut children = Vec::new();
        match self {
            AstNode::Ast(Ast::Program(program)) => {
                children.extend(
                    program
                        .imports
                        .iter()
                        .map(|import| AstNode::Definition(Definition::Import(import.clone()))),
                );
                children.extend(
                    program
                        .declarations
                        .iter()
                        .map(|decl| AstNode::Definition(Definition::Declaration(decl.clone()))),
                );
                children.extend(
                    program
                        .functions
                        .iter()
                        .map(|func| AstNode::Definition(Definition::Function(func.clone()))),
                );
            }
            AstNode::Definition(Definition::Function(func)) => {
                children.extend(
                    func.params
                        .iter()
                        .map(|param| AstNode::Definition(Definition::Parameter(param.clone()))),
                );
                children.extend(
                    func.declarations
                        .iter()
                        .map(|decl| AstNode::Definition(Definition::Declaration(decl.clone()))),
                );
                if let Some(body) = &func.body {
                    children.push(AstNode::Misc(Misc::Block(body.clone())));
                }
            }
            AstNode::Definition(_) => {}
            AstNode::Statement(statement) => match statement {
                Statement::Assignment(assignment) => {
                    children.push(AstNode::Expression(Expression::Lval(
                        assignment.target.clone(),
                    )));
                    children.push(match &assignment.value {
                        AssignedValue::Expression(expression) => {
                            AstNode::Expression(expression.clone())
                        }
                        AssignedValue::Distribution(distribution) => {
                            AstNode::Misc(Misc::Distribution(distribution.clone()))
                        }
                    });
                }
                Statement::FunctionCall(call) => {
                    children.extend(
                        call.arguments
                            .iter()
                            .map(|argument| AstNode::Misc(Misc::Argument(argument.clone()))),
                    );
                }
                Statement::Query(query) => {
                    children.push(AstNode::Statement(Statement::FunctionCall(
                        query.call.clone(),
                    )));
                }
                Statement::Observation(observation) => {
                    children.push(AstNode::Expression(observation.condition.clone()));
                }
                Statement::If(if_then_else) => {
                    children.push(AstNode::Expression(if_then_else.condition.clone()));
                    children.push(AstNode::Misc(Misc::Block(if_then_else.then_block.clone())));
                    if let Some(else_block) = &if_then_else.else_block {
                        children.push(AstNode::Misc(Misc::Block(else_block.clone())));
                    }
                }
                Statement::While(while_loop) => {
                    children.push(AstNode::Expression(while_loop.condition.clone()));
                    children.push(AstNode::Misc(Misc::Block(while_loop.body.clone())));
                }
                Statement::TryCatch(try_catch) => {
                    children.push(AstNode::Misc(Misc::Block(try_catch.try_block.clone())));
                    children.push(AstNode::Misc(Misc::Block(try_catch.catch_block.clone())));
                }
                Statement::Throw(_) => {}
            },
            AstNode::Expression(expression) => match expression {
                Expression::Binary(binary) => {
                    children.push(AstNode::Expression(binary.left.clone()));
                    children.push(AstNode::Expression(binary.right.clone()));
                }
                Expression::Negation(negation) => {
                    children.push(AstNode::Expression(negation.operand.clone()));
                }
                Expression::Lval(lval) => {
                    if let Some(index) = &lval.index {
                        children.push(AstNode::Expression(index.clone()));
                    }
                }
                Expression::Literal(_) => {}
                Expression::Probabilistic(assignment) => {
                    children.push(AstNode::Expression(assignment.head.clone()));
                    children.extend(
                        assignment
                            .choices
                            .iter()
                            .map(|choice| AstNode::Misc(Misc::ProbChoice(choice.clone()))),
                    );
                    children.extend(
                        assignment
                            .fallbacks
                            .iter()
                            .map(|fallback| AstNode::Expression(fallback.clone())),
                    );
                }
            },
            AstNode::Misc(misc) => match misc {
                Misc::Block(block) => {
                    children.extend(
                        block
                            .statements
                            .iter()
                            .map(|statement| AstNode::Statement(statement.clone())),
                    );
                }
                Misc::Argument(argument) => {
                    children.push(AstNode::Expression(argument.expression.clone()));
                }
                Misc::ProbChoice(choice) => {
                    children.push(AstNode::Expression(choice.numerator.clone()));
                    children.push(AstNode::Expression(choice.denominator.clone()));
                }
                Misc::Distribution(distribution) => {
                    children.extend(
                        distribution
                            .arguments()
                            .into_iter()
                            .filter_map(|(_, expression)| expression.cloned())
                            .map(AstNode::Expression),
                    );
                }
            },
        }
        children
    }
}

impl Statement {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Statement::Assignment(_) => NodeKind::Assignment,
            Statement::FunctionCall(_) => NodeKind::FuncCall,
            Statement::Query(_) => NodeKind::Query,
            Statement::Observation(_) => NodeKind::Observation,
            Statement::If(_) => NodeKind::IfThenElse,
            Statement::While(_) => NodeKind::While,
            Statement::TryCatch(_) => NodeKind::TryCatch,
            Statement::Throw(_) => NodeKind::Throw,
        }
    }
}

impl Expression {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Binary(_) => NodeKind::BinaryExpression,
            Expression::Negation(_) => NodeKind::LogicalNegation,
            Expression::Lval(_) => NodeKind::Lval,
            Expression::Literal(Literal::Bool(_)) => NodeKind::BoolLiteral,
            Expression::Literal(Literal::Integer(_)) => NodeKind::IntegerLiteral,
            Expression::Probabilistic(_) => NodeKind::ProbabilisticAssignment,
        }
    }

    #[must_use]
    pub fn as_lval(&self) -> Option<&Rc<Lval>> {
        match self {
            Expression::Lval(lval) => Some(lval),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int_literal(&self) -> Option<&Rc<IntLiteral>> {
        match self {
            Expression::Literal(Literal::Integer(literal)) => Some(literal),
            _ => None,
        }
    }
}

impl Program {
    /// Functions with a body. Bodiless placeholders never count as definitions.
    pub fn real_functions(&self) -> impl Iterator<Item = &Rc<Func>> {
        self.functions.iter().filter(|func| func.has_body())
    }

    #[must_use]
    pub fn has_imports(&self) -> bool {
        !self.imports.is_empty()
    }
}

impl Func {
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    #[must_use]
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// True while the function's source text has more opening than closing
    /// braces, i.e. it is still being typed.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        let opens = self.location.source.matches('{').count();
        let closes = self.location.source.matches('}').count();
        closes < opens
    }
}

impl Decl {
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|declared| declared == name)
    }
}

impl DeclaredType {
    #[must_use]
    pub fn int(prefix: &str) -> Self {
        DeclaredType::Int {
            prefix: prefix.to_string(),
        }
    }

    #[must_use]
    pub fn int_array(prefix: &str, size: u32) -> Self {
        DeclaredType::IntArray {
            prefix: prefix.to_string(),
            size,
        }
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, DeclaredType::IntArray { .. })
    }

    /// Integer prefix such as `u8`, or `None` for `bool`.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        match self {
            DeclaredType::Bool => None,
            DeclaredType::Int { prefix } | DeclaredType::IntArray { prefix, .. } => Some(prefix),
        }
    }
}

impl FuncCall {
    #[must_use]
    pub fn argument(&self, index: usize) -> Option<&Rc<Argument>> {
        self.arguments.get(index)
    }
}

impl IntLiteral {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }
}

impl Distribution {
    /// The argument slots of this distribution by property name, in source
    /// order. Slots that do not belong to the distribution kind are omitted.
    #[must_use]
    pub fn arguments(&self) -> Vec<(&'static str, Option<&Expression>)> {
        match self.kind {
            DistributionKind::Bernoulli => vec![("p", self.p.as_ref()), ("q", self.q.as_ref())],
            DistributionKind::Uniform => vec![
                ("lower", self.lower.as_ref()),
                ("upper", self.upper.as_ref()),
            ],
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.arguments()
            .iter()
            .all(|(_, expression)| expression.is_some())
    }
}
