//! SQL expressions

use crate::parsing::ast::SelectStatement;
use crate::types::Value;
use std::fmt;

/// An expression node plus the byte offset of its first token.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub offset: usize,
}

impl Expression {
    pub fn new(kind: ExpressionKind, offset: usize) -> Expression {
        Expression { kind, offset }
    }

    /// Walks the expression tree depth-first, halting when the visitor
    /// returns false.
    pub fn walk(&self, visitor: &mut impl FnMut(&Expression) -> bool) -> bool {
        if !visitor(self) {
            return false;
        }
        match &self.kind {
            ExpressionKind::Binary { lhs, rhs, .. } | ExpressionKind::Arithmetic { lhs, rhs, .. } => {
                lhs.walk(visitor) && rhs.walk(visitor)
            }
            ExpressionKind::Unary { expr, .. } | ExpressionKind::Is { expr, .. } => {
                expr.walk(visitor)
            }
            ExpressionKind::Between { expr, low, high } => {
                expr.walk(visitor) && low.walk(visitor) && high.walk(visitor)
            }
            ExpressionKind::In { expr, list } => {
                expr.walk(visitor) && list.iter().all(|e| e.walk(visitor))
            }
            ExpressionKind::Case { cases, else_value } => {
                cases
                    .iter()
                    .all(|(guard, value)| guard.walk(visitor) && value.walk(visitor))
                    && else_value.as_ref().is_none_or(|e| e.walk(visitor))
            }
            ExpressionKind::Function { args, .. } => args.iter().all(|e| e.walk(visitor)),
            ExpressionKind::Aggregate { expr, .. } => expr.walk(visitor),
            ExpressionKind::Literal(_)
            | ExpressionKind::Identifier(_)
            | ExpressionKind::Star
            | ExpressionKind::Subquery(_) => true,
        }
    }

    /// True if the expression contains an aggregate function anywhere.
    pub fn contains_aggregate(&self) -> bool {
        !self.walk(&mut |expr| !matches!(expr.kind, ExpressionKind::Aggregate { .. }))
    }

    /// True if this node is an aggregate function.
    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, ExpressionKind::Aggregate { .. })
    }

    /// The column names this expression references, in visit order.
    /// Subqueries are opaque; their columns resolve in their own scope.
    pub fn referenced_columns(&self) -> Vec<String> {
        let mut columns = Vec::new();
        self.walk(&mut |expr| {
            if let ExpressionKind::Identifier(column) = &expr.kind {
                columns.push(column.name.clone());
            }
            true
        });
        columns
    }
}

/// A column reference, optionally qualified with a table name or alias.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpressionKind {
    /// A literal value.
    Literal(Value),
    /// A column reference.
    Identifier(ColumnRef),
    /// A comparison or boolean operator; always evaluates to a Bool.
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// `+ - * /`, dispatching on the lhs value type.
    Arithmetic {
        op: ArithmeticOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    /// Unary minus.
    Unary {
        op: UnaryOp,
        expr: Box<Expression>,
    },
    /// `expr BETWEEN low AND high`, both ends inclusive.
    Between {
        expr: Box<Expression>,
        low: Box<Expression>,
        high: Box<Expression>,
    },
    /// `expr IN (a, b, ...)`, compared through string coercion.
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
    },
    /// `expr IS [NOT] NULL`.
    Is {
        expr: Box<Expression>,
        what: IsWhat,
    },
    /// `CASE WHEN guard THEN value ... [ELSE value] END`.
    Case {
        cases: Vec<(Expression, Expression)>,
        else_value: Option<Box<Expression>>,
    },
    /// A non-aggregate function call, dispatched by name to the builtin
    /// function table.
    Function {
        name: String,
        args: Vec<Expression>,
    },
    /// An aggregate function. Never evaluated per row; the SELECT executor
    /// recognizes it structurally and aggregates over the current group.
    Aggregate {
        function: AggregateKind,
        expr: Box<Expression>,
        over: Option<String>,
    },
    /// A scalar subquery; evaluates to a ResultSet value.
    Subquery(Box<SelectStatement>),
    /// `*`, valid only as the argument of COUNT.
    Star,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,
    Like,
    Match,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Like => "LIKE",
            BinaryOp::Match => "MATCH",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsWhat {
    Null,
    NotNull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregateKind {
    Count,
    Sum,
    Min,
    Max,
    Avg,
}

impl AggregateKind {
    pub fn from_name(name: &str) -> Option<AggregateKind> {
        match name.to_uppercase().as_str() {
            "COUNT" => Some(AggregateKind::Count),
            "SUM" => Some(AggregateKind::Sum),
            "MIN" => Some(AggregateKind::Min),
            "MAX" => Some(AggregateKind::Max),
            "AVG" => Some(AggregateKind::Avg),
            _ => None,
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregateKind::Count => "COUNT",
            AggregateKind::Sum => "SUM",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
            AggregateKind::Avg => "AVG",
        })
    }
}

// The printable form doubles as the default projection column name, so it
// must be deterministic for a given parse.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Literal(value) => write!(f, "{}", value),
            ExpressionKind::Identifier(column) => write!(f, "{}", column),
            ExpressionKind::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            ExpressionKind::Arithmetic { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            ExpressionKind::Unary { op: UnaryOp::Minus, expr } => write!(f, "-{}", expr),
            ExpressionKind::Between { expr, low, high } => {
                write!(f, "{} BETWEEN {} AND {}", expr, low, high)
            }
            ExpressionKind::In { expr, list } => {
                write!(f, "{} IN (", expr)?;
                for (i, arg) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExpressionKind::Is { expr, what } => match what {
                IsWhat::Null => write!(f, "{} IS NULL", expr),
                IsWhat::NotNull => write!(f, "{} IS NOT NULL", expr),
            },
            ExpressionKind::Case { cases, else_value } => {
                write!(f, "CASE")?;
                for (guard, value) in cases {
                    write!(f, " WHEN {} THEN {}", guard, value)?;
                }
                if let Some(else_value) = else_value {
                    write!(f, " ELSE {}", else_value)?;
                }
                write!(f, " END")
            }
            ExpressionKind::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            ExpressionKind::Aggregate { function, expr, .. } => {
                write!(f, "{}({})", function, expr)
            }
            ExpressionKind::Subquery(_) => write!(f, "(SELECT ...)"),
            ExpressionKind::Star => write!(f, "*"),
        }
    }
}
