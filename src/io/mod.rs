//! # Reading constraints from text
//!
//! Parses the grammar `expr (== | <= | >=) expr`, where an expression is
//! built from float literals, registered variable names, `+ - * /` and
//! parentheses. Variables must be registered up front; the parser has no
//! authority to invent them:
//!
//! ```
//! use std::collections::HashMap;
//!
//! use moa::io::parse_constraint;
//! use moa::{SimplexSolver, Variable};
//!
//! let x = Variable::named("x", 0.0);
//! let mut vars = HashMap::new();
//! vars.insert("x".to_string(), x.clone());
//!
//! let constraint = parse_constraint("2 * x + 4 == 10", &vars).unwrap();
//! let mut solver = SimplexSolver::new();
//! solver.add_constraint(&constraint).unwrap();
//! assert_eq!(x.value(), 3.0);
//! ```
//!
//! The parse happens in two stages: a grammar pass producing a small
//! syntax tree, then a lowering pass that resolves names and folds the
//! arithmetic into a [`LinearExpression`], rejecting nonlinear products.
use std::collections::HashMap;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace0, satisfy};
use nom::combinator::{all_consuming, map, recognize};
use nom::multi::many0;
use nom::number::complete::double;
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use crate::data::constraint::{Constraint, Relation};
use crate::data::linear::LinearExpression;
use crate::data::strength::Strength;
use crate::data::variable::Variable;
use crate::error::Error;

pub use self::error::ParseError;

mod error;

/// Parse a constraint over the given named variables.
///
/// The result is a required constraint; apply another strength with the
/// pipe operator: `parse_constraint(...)? | Strength::weak()`.
pub fn parse_constraint(
    input: &str,
    vars: &HashMap<String, Variable>,
) -> Result<Constraint, ParseError> {
    let (_, (lhs, relation, rhs)) = all_consuming(terminated(constraint_syntax, multispace0))(input)
        .map_err(|error| match error {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                ParseError::at("malformed constraint", e.input)
            }
            nom::Err::Incomplete(_) => ParseError::new("unexpected end of input"),
        })?;

    let lhs = lower(&lhs, vars)?;
    let rhs = lower(&rhs, vars)?;
    Ok(Constraint::new(lhs - rhs, relation, Strength::required()))
}

/// Parse a bare linear expression over the given named variables.
pub fn parse_expression(
    input: &str,
    vars: &HashMap<String, Variable>,
) -> Result<LinearExpression, ParseError> {
    let (_, ast) = all_consuming(terminated(expression, multispace0))(input)
        .map_err(|error| match error {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                ParseError::at("malformed expression", e.input)
            }
            nom::Err::Incomplete(_) => ParseError::new("unexpected end of input"),
        })?;
    lower(&ast, vars)
}

/// The syntax tree of one side of a constraint.
#[derive(Debug)]
enum Ast {
    Number(f64),
    Name(String),
    Sum(Box<Ast>, char, Box<Ast>),
    Product(Box<Ast>, char, Box<Ast>),
}

/// Resolve names and fold the arithmetic into a linear expression.
fn lower(ast: &Ast, vars: &HashMap<String, Variable>) -> Result<LinearExpression, ParseError> {
    match ast {
        Ast::Number(value) => Ok(LinearExpression::from(*value)),
        Ast::Name(name) => vars
            .get(name)
            .map(LinearExpression::from)
            .ok_or_else(|| ParseError::new(format!("unknown variable `{name}`"))),
        Ast::Sum(lhs, op, rhs) => {
            let lhs = lower(lhs, vars)?;
            let rhs = lower(rhs, vars)?;
            Ok(if *op == '+' { lhs + rhs } else { lhs - rhs })
        }
        Ast::Product(lhs, op, rhs) => {
            let lhs = lower(lhs, vars)?;
            let rhs = lower(rhs, vars)?;
            let result = if *op == '*' {
                lhs.try_mul(&rhs)
            } else {
                lhs.try_div(&rhs)
            };
            result.map_err(|error| match error {
                Error::Nonlinear => ParseError::new("the expression is nonlinear"),
                other => ParseError::new(other.to_string()),
            })
        }
    }
}

fn constraint_syntax(input: &str) -> IResult<&str, (Ast, Relation, Ast)> {
    let (input, lhs) = expression(input)?;
    let (input, relation) = ws(relation)(input)?;
    let (input, rhs) = expression(input)?;
    Ok((input, (lhs, relation, rhs)))
}

fn relation(input: &str) -> IResult<&str, Relation> {
    alt((
        map(alt((tag("=="), tag("="))), |_| Relation::Equal),
        map(tag("<="), |_| Relation::LessOrEqual),
        map(tag(">="), |_| Relation::GreaterOrEqual),
    ))(input)
}

/// `term (("+" | "-") term)*`
fn expression(input: &str) -> IResult<&str, Ast> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(alt((char('+'), char('-')))), term))(input)?;
    Ok((input, fold_chain(first, rest, Ast::Sum)))
}

/// `factor (("*" | "/") factor)*`
fn term(input: &str) -> IResult<&str, Ast> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(pair(ws(alt((char('*'), char('/')))), factor))(input)?;
    Ok((input, fold_chain(first, rest, Ast::Product)))
}

fn factor(input: &str) -> IResult<&str, Ast> {
    // Names before numbers: `double` would otherwise claim identifiers
    // like `inf` as literals.
    ws(alt((
        map(identifier, |name| Ast::Name(name.to_string())),
        map(double, Ast::Number),
        delimited(char('('), expression, ws(char(')'))),
    )))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_alphabetic() || c == '_'),
        many0(satisfy(|c| c.is_alphanumeric() || c == '_')),
    ))(input)
}

fn fold_chain(first: Ast, rest: Vec<(char, Ast)>, node: fn(Box<Ast>, char, Box<Ast>) -> Ast) -> Ast {
    rest.into_iter().fold(first, |lhs, (op, rhs)| {
        node(Box::new(lhs), op, Box::new(rhs))
    })
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(multispace0, inner)
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use approx::assert_abs_diff_eq;

    use super::{parse_constraint, parse_expression};
    use crate::algorithm::simplex::SimplexSolver;
    use crate::data::constraint::Relation;
    use crate::data::variable::Variable;

    fn vars(names: &[&str]) -> (HashMap<String, Variable>, Vec<Variable>) {
        let mut map = HashMap::new();
        let mut list = Vec::new();
        for &name in names {
            let variable = Variable::named(name, 0.0);
            map.insert(name.to_string(), variable.clone());
            list.push(variable);
        }
        (map, list)
    }

    #[test]
    fn equation_with_arithmetic() {
        let (map, list) = vars(&["x", "y"]);
        let constraint = parse_constraint("2 * x + y / 2 - 3 == y + 7", &map).unwrap();

        assert_eq!(constraint.op(), Relation::Equal);
        assert_eq!(constraint.expression().coefficient(&list[0]), 2.0);
        assert_eq!(constraint.expression().coefficient(&list[1]), -0.5);
        assert_eq!(constraint.expression().constant(), -10.0);
        assert!(constraint.is_required());
    }

    #[test]
    fn inequalities_and_parentheses() {
        let (map, list) = vars(&["width"]);
        let constraint = parse_constraint("3 * (width + 2) <= 18", &map).unwrap();

        assert_eq!(constraint.op(), Relation::LessOrEqual);
        assert_eq!(constraint.expression().coefficient(&list[0]), 3.0);
        assert_eq!(constraint.expression().constant(), -12.0);

        assert!(parse_constraint("width >= 4", &map).is_ok());
    }

    #[test]
    fn bare_expressions() {
        let (map, list) = vars(&["x"]);
        let expression = parse_expression("(x + 1) * 3 - x", &map).unwrap();
        assert_eq!(expression.coefficient(&list[0]), 2.0);
        assert_eq!(expression.constant(), 3.0);

        assert!(parse_expression("x ==", &map).is_err());
    }

    #[test]
    fn single_equals_is_accepted() {
        let (map, _) = vars(&["x"]);
        let constraint = parse_constraint("x = 4", &map).unwrap();
        assert_eq!(constraint.op(), Relation::Equal);
    }

    #[test]
    fn solves_through_the_engine() {
        let (map, list) = vars(&["x", "y"]);
        let mut solver = SimplexSolver::new();

        solver
            .add_constraint(&parse_constraint("x == 10", &map).unwrap())
            .unwrap();
        solver
            .add_constraint(&parse_constraint("y == x + 3", &map).unwrap())
            .unwrap();

        assert_abs_diff_eq!(list[0].value(), 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(list[1].value(), 13.0, epsilon = 1e-6);
    }

    #[test]
    fn unknown_variables_are_rejected() {
        let (map, _) = vars(&["x"]);
        let error = parse_constraint("x + q == 1", &map).unwrap_err();
        assert_eq!(error.to_string(), "ParseError: unknown variable `q`");
    }

    #[test]
    fn nonlinear_products_are_rejected() {
        let (map, _) = vars(&["x", "y"]);
        let error = parse_constraint("x * y == 1", &map).unwrap_err();
        assert_eq!(error.to_string(), "ParseError: the expression is nonlinear");

        assert!(parse_constraint("2 * x == 1", &map).is_ok());
        let error = parse_constraint("1 / x == 1", &map).unwrap_err();
        assert_eq!(error.to_string(), "ParseError: the expression is nonlinear");
    }

    #[test]
    fn malformed_input_is_rejected() {
        let (map, _) = vars(&["x"]);
        assert!(parse_constraint("x >> 3", &map).is_err());
        assert!(parse_constraint("x == ", &map).is_err());
        assert!(parse_constraint("x == 3 junk", &map).is_err());
    }
}
