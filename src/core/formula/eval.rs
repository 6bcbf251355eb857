use super::parser::{BinaryOp, CompareOp, Expr, Function};
use super::token::Attribute;
use super::FormulaError;
use crate::domain::model::{IN_SCOPE_ANSWER, OUT_OF_SCOPE_ANSWER};
use crate::domain::ports::ScopeLookup;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Text(_) => "text",
        }
    }

    /// Booleans take part in arithmetic as 1 and 0.
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(_) => None,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0,
            Self::Bool(b) => *b,
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Final coercion of a formula result to a weightage.
    pub fn into_weightage(self) -> Result<f64, FormulaError> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0.0);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| FormulaError::NonNumericResult(trimmed.to_string()))
            }
        }
    }
}

pub fn evaluate<S: ScopeLookup + ?Sized>(expr: &Expr, scope: &S) -> Result<Value, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Text(s) => Ok(Value::Text(s.clone())),
        Expr::Reference { item, attribute } => Ok(match attribute {
            Attribute::InScope => {
                let answer = if scope.in_scope(item) {
                    IN_SCOPE_ANSWER
                } else {
                    OUT_OF_SCOPE_ANSWER
                };
                Value::Text(answer.to_string())
            }
            Attribute::Details => Value::Number(scope.details(item)),
        }),
        Expr::Negate(inner) => {
            let value = evaluate(inner, scope)?;
            value
                .as_number()
                .map(|n| Value::Number(-n))
                .ok_or(FormulaError::TypeMismatch {
                    op: "-",
                    lhs: value.type_name(),
                    rhs: "nothing",
                })
        }
        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, scope)?;
            let rhs = evaluate(rhs, scope)?;
            arithmetic(*op, &lhs, &rhs)
        }
        Expr::Compare { first, rest } => {
            let mut left = evaluate(first, scope)?;
            let mut holds = true;
            for (op, operand) in rest {
                let right = evaluate(operand, scope)?;
                if !compare(*op, &left, &right)? {
                    holds = false;
                }
                left = right;
            }
            Ok(Value::Bool(holds))
        }
        Expr::Call { function, args } => {
            // every argument is evaluated before the function is applied
            let values = args
                .iter()
                .map(|arg| evaluate(arg, scope))
                .collect::<Result<Vec<_>, _>>()?;
            call(*function, values)
        }
    }
}

fn arithmetic(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, FormulaError> {
    let symbol = match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
    };
    let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
        return Err(FormulaError::TypeMismatch {
            op: symbol,
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        });
    };

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(FormulaError::DivisionByZero);
            }
            a / b
        }
    };
    Ok(Value::Number(result))
}

fn compare(op: CompareOp, lhs: &Value, rhs: &Value) -> Result<bool, FormulaError> {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return Ok(match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        });
    }

    if let (Value::Text(a), Value::Text(b)) = (lhs, rhs) {
        return Ok(match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
        });
    }

    // mixed text and number: equality is simply false, ordering is an error
    match op {
        CompareOp::Eq => Ok(false),
        CompareOp::Ne => Ok(true),
        _ => Err(FormulaError::TypeMismatch {
            op: "comparison",
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn call(function: Function, args: Vec<Value>) -> Result<Value, FormulaError> {
    match function {
        Function::If => {
            let found = args.len();
            let mut args = args.into_iter();
            match (args.next(), args.next(), args.next(), args.next()) {
                (Some(condition), Some(then), Some(otherwise), None) => {
                    Ok(if condition.is_truthy() { then } else { otherwise })
                }
                _ => Err(FormulaError::Arity {
                    function: "IF",
                    expected: "exactly 3",
                    found,
                }),
            }
        }
        Function::And => Ok(Value::Bool(args.iter().all(Value::is_truthy))),
        Function::Or => Ok(Value::Bool(args.iter().any(Value::is_truthy))),
        Function::Sum => {
            let mut total = 0.0;
            for value in &args {
                total += value.as_number().ok_or(FormulaError::TypeMismatch {
                    op: "SUM",
                    lhs: value.type_name(),
                    rhs: "number",
                })?;
            }
            Ok(Value::Number(total))
        }
        Function::Ifs => {
            // an unpaired trailing argument is ignored
            for pair in args.chunks_exact(2) {
                if pair[0].is_truthy() {
                    return Ok(pair[1].clone());
                }
            }
            Ok(Value::Number(0.0))
        }
    }
}
