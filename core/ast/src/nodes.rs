use core::fmt;
use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

use crate::reference::Reference;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Location {
    pub offset_start: u32,
    pub offset_end: u32,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub source: String,
}

impl Location {
    #[must_use]
    pub fn new(
        offset_start: u32,
        offset_end: u32,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
        source: String,
    ) -> Self {
        Self {
            offset_start,
            offset_end,
            start_line,
            start_column,
            end_line,
            end_column,
            source,
        }
    }

    /// A location that only carries the original source text of a node.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

macro_rules! ast_node {
    (
        $(#[$outer:meta])*
        $struct_vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $struct_vis struct $name {
            pub id: u32,
            pub location: $crate::nodes::Location,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }
    };
}

macro_rules! ast_nodes {
    (
        $(
            $(#[$outer:meta])*
            $struct_vis:vis struct $name:ident { $($fields:tt)* }
        )+
    ) => {
        $(
            ast_node! {
                $(#[$outer])*
                $struct_vis struct $name { $($fields)* }
            }
        )+
    };
}

macro_rules! ast_enum {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $(@$conv:ident)? $arm:ident ( $($tuple:tt)* ) ,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $enum_vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm ( $($tuple)* ) ,
            )*
        }

        impl $name {
            #[must_use]
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        $name::$arm(n, ..) => { ast_enum!(@id_arm n, $($conv)?) }
                    )*
                }
            }

            #[must_use]
            pub fn location(&self) -> Location {
                match self {
                    $(
                        $name::$arm(n, ..) => { ast_enum!(@location_arm n, $($conv)?) }
                    )*
                }
            }
        }
    };

    (@id_arm $inner:ident, inner_enum) => {
        $inner.id()
    };

    (@id_arm $inner:ident, ) => {
        $inner.id
    };

    (@location_arm $inner:ident, inner_enum) => {
        $inner.location()
    };

    (@location_arm $inner:ident, ) => {
        $inner.location.clone()
    };
}

macro_rules! ast_enums {
    (
        $(
            $(#[$outer:meta])*
            $enum_vis:vis enum $name:ident { $($arms:tt)* }
        )+
    ) => {
        $(
            ast_enum! {
                $(#[$outer])*
                $enum_vis enum $name { $($arms)* }
            }
        )+

        #[derive(Clone, PartialEq, Eq, Debug)]
        pub enum AstNode {
            $(
                $name($name),
            )+
        }

        impl AstNode {
            #[must_use]
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        AstNode::$name(node) => node.id(),
                    )+
                }
            }

            #[must_use]
            pub fn location(&self) -> Location {
                match self {
                    $(
                        AstNode::$name(node) => node.location(),
                    )+
                }
            }
        }
    };
}

ast_enum! {
    pub enum Literal {
        Bool(Rc<BoolLiteral>),
        Integer(Rc<IntLiteral>),
    }
}

ast_enums! {

    pub enum Ast {
        Program(Rc<Program>),
    }

    pub enum Definition {
        Import(Rc<FileImport>),
        Declaration(Rc<Decl>),
        Function(Rc<Func>),
        Parameter(Rc<Param>),
    }

    pub enum Statement {
        Assignment(Rc<Assignment>),
        FunctionCall(Rc<FuncCall>),
        Query(Rc<Query>),
        Observation(Rc<Observation>),
        If(Rc<IfThenElse>),
        While(Rc<While>),
        TryCatch(Rc<TryCatch>),
        Throw(Rc<Throw>),
    }

    pub enum Expression {
        Binary(Rc<BinaryExpression>),
        Negation(Rc<LogicalNegation>),
        Lval(Rc<Lval>),
        @inner_enum Literal(Literal),
        Probabilistic(Rc<ProbabilisticAssignment>),
    }

    pub enum Misc {
        Block(Rc<Block>),
        Argument(Rc<Argument>),
        ProbChoice(Rc<ProbChoice>),
        Distribution(Rc<Distribution>),
    }
}

/// Closed set of node kinds, used for dispatching inference and validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NodeKind {
    Program,
    FileImport,
    Decl,
    Param,
    Func,
    Block,
    Assignment,
    FuncCall,
    Argument,
    Query,
    Observation,
    IfThenElse,
    While,
    TryCatch,
    Throw,
    BinaryExpression,
    LogicalNegation,
    Lval,
    IntegerLiteral,
    BoolLiteral,
    ProbabilisticAssignment,
    ProbChoice,
    Distribution,
}

/// Declared type of a declaration or parameter, as written in the source.
///
/// Integer prefixes (`u8`, `s32`, ...) are kept verbatim; they are interpreted
/// by the type checker so that malformed prefixes become inference errors.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum DeclaredType {
    Bool,
    Int { prefix: String },
    IntArray { prefix: String, size: u32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum UnaryOperatorKind {
    Not,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum DistributionKind {
    Bernoulli,
    Uniform,
}

/// Right-hand side of an assignment: either an expression or a distribution draw.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AssignedValue {
    Expression(Expression),
    Distribution(Rc<Distribution>),
}

ast_nodes! {

    pub struct Program {
        pub imports: Vec<Rc<FileImport>>,
        pub declarations: Vec<Rc<Decl>>,
        pub functions: Vec<Rc<Func>>,
    }

    pub struct FileImport {
        pub path: String,
    }

    pub struct Decl {
        pub declared_type: DeclaredType,
        pub names: Vec<String>,
    }

    pub struct Param {
        pub name: String,
        pub declared_type: DeclaredType,
        pub by_reference: bool,
    }

    /// A function definition. A missing body marks a forward/ghost function
    /// that must never satisfy call resolution or be exported.
    pub struct Func {
        pub name: String,
        pub params: Vec<Rc<Param>>,
        pub declarations: Vec<Rc<Decl>>,
        pub body: Option<Rc<Block>>,
    }

    pub struct Block {
        pub statements: Vec<Statement>,
    }

    pub struct Assignment {
        pub target: Rc<Lval>,
        pub value: AssignedValue,
    }

    pub struct FuncCall {
        pub reference: Reference,
        pub arguments: Vec<Rc<Argument>>,
    }

    pub struct Argument {
        pub expression: Expression,
    }

    pub struct Query {
        pub call: Rc<FuncCall>,
    }

    pub struct Observation {
        pub condition: Expression,
    }

    pub struct IfThenElse {
        pub condition: Expression,
        pub then_block: Rc<Block>,
        pub else_block: Option<Rc<Block>>,
    }

    pub struct While {
        pub condition: Expression,
        pub body: Rc<Block>,
    }

    pub struct TryCatch {
        pub try_block: Rc<Block>,
        pub catch_block: Rc<Block>,
    }

    pub struct Throw {}

    pub struct BinaryExpression {
        pub left: Expression,
        pub operator: OperatorKind,
        pub right: Expression,
    }

    pub struct LogicalNegation {
        pub operator: UnaryOperatorKind,
        pub operand: Expression,
    }

    pub struct Lval {
        pub reference: Reference,
        pub index: Option<Expression>,
    }

    /// Integer literal `[-]<value><u|s><width>`; `location.source` holds the
    /// literal exactly as written.
    pub struct IntLiteral {
        pub negative: bool,
        pub value: u64,
        pub suffix: String,
    }

    pub struct BoolLiteral {
        pub value: bool,
    }

    /// `head { num : den } fallback { num : den } fallback ...`
    pub struct ProbabilisticAssignment {
        pub head: Expression,
        pub choices: Vec<Rc<ProbChoice>>,
        pub fallbacks: Vec<Expression>,
    }

    pub struct ProbChoice {
        pub numerator: Expression,
        pub denominator: Expression,
    }

    pub struct Distribution {
        pub kind: DistributionKind,
        pub p: Option<Expression>,
        pub q: Option<Expression>,
        pub lower: Option<Expression>,
        pub upper: Option<Expression>,
    }

}
