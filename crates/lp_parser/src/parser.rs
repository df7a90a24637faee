//! Pest-driven parsing of spec §6's grammar into a [`lp_core::model::Model`],
//! grounded in the teacher's `domains::optimization::parser.rs` (the same
//! `#[derive(Parser)] #[grammar = "..."]` + recursive `Pair` walk shape),
//! generalized from the teacher's symbolic `Expr` tree to exact
//! `BigRational` coefficients and the sign/integrality tail line spec.md
//! adds on top of the teacher's bare objective/constraints block.

use num_bigint::BigInt;
use num_rational::BigRational;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use lp_core::model::{Constraint, LinearForm, LpType, Model, Sign, Term, Variable};
use lp_core::scalar::ExactScalar;

use crate::ast::{ParsedConstraint, ParsedExpr, ParsedProgram, ParsedSense, ParsedTerm};
use crate::error::{ParseError, ParseResult};

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct LpGrammar;

pub fn parse(content: &str) -> ParseResult<ParsedProgram> {
    let mut pairs = LpGrammar::parse(Rule::program, content).map_err(|e| ParseError::Grammar(Box::new(e)))?;
    let program_pair = pairs.next().ok_or(ParseError::MissingObjective)?;

    let mut program = ParsedProgram::default();
    for pair in program_pair.into_inner() {
        match pair.as_rule() {
            Rule::objective_line => {
                let (sense, objective) = parse_objective_line(pair);
                program.sense = Some(sense);
                program.objective = objective;
            }
            Rule::constraint_line => program.constraints.push(parse_constraint_line(pair)),
            Rule::tail_line => {
                let (sign_restrictions, integer_variables) = parse_tail_line(pair)?;
                program.sign_restrictions = sign_restrictions;
                program.integer_variables = integer_variables;
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    if program.sense.is_none() {
        return Err(ParseError::MissingObjective);
    }
    Ok(program)
}

/// Parses `content` and lowers it directly into a solver-ready `Model`
/// (column order follows insertion order, matching `lp_core`'s own
/// convention of "the objective's term order is the tableau's column
/// order").
pub fn parse_model(content: &str) -> ParseResult<Model> {
    let program = parse(content)?;
    Ok(build_model(program))
}

fn build_model(program: ParsedProgram) -> Model {
    let lp_type = match program.sense.expect("parse() guarantees a sense") {
        ParsedSense::Min => LpType::Min,
        ParsedSense::Max => LpType::Max,
    };
    let target = expr_to_linear_form(&program.objective);
    let constraints: Vec<Constraint> = program.constraints.iter().map(parsed_constraint_to_constraint).collect();
    let variable_constraints: Vec<Constraint> =
        program.sign_restrictions.iter().map(parsed_constraint_to_constraint).collect();
    let positive_integer_variables: Vec<Variable> =
        program.integer_variables.iter().map(|(name, idx)| Variable::new(name.clone(), *idx)).collect();

    Model::new(lp_type, target, constraints, variable_constraints, positive_integer_variables)
}

fn expr_to_linear_form(expr: &ParsedExpr) -> LinearForm {
    let mut form = LinearForm::new();
    for term in &expr.terms {
        form.add_term(parsed_term_to_term(term));
    }
    form
}

fn parsed_term_to_term(term: &ParsedTerm) -> Term {
    Term::new(
        Variable::new(term.variable_name.clone(), term.variable_index),
        ExactScalar::rational(term.coefficient.clone()),
    )
}

fn parsed_constraint_to_constraint(c: &ParsedConstraint) -> Constraint {
    Constraint::new(expr_to_linear_form(&c.left), c.sign, ExactScalar::rational(c.right.clone()))
}

fn parse_int(pair: Pair<Rule>) -> BigInt {
    pair.as_str().parse().expect("int rule matches only ASCII digits")
}

fn parse_sign(pair: Pair<Rule>) -> BigRational {
    if pair.as_str() == "-" {
        BigRational::from_integer(BigInt::from(-1))
    } else {
        BigRational::from_integer(BigInt::from(1))
    }
}

fn parse_magnitude(pair: Pair<Rule>) -> BigRational {
    let mut inner = pair.into_inner();
    let numer = parse_int(inner.next().expect("magnitude always has a numerator"));
    match inner.next() {
        Some(denom_pair) => BigRational::new(numer, parse_int(denom_pair)),
        None => BigRational::from_integer(numer),
    }
}

fn parse_rational(pair: Pair<Rule>) -> BigRational {
    let mut inner = pair.into_inner().peekable();
    let mut sign = BigRational::from_integer(BigInt::from(1));
    if matches!(inner.peek().map(|p| p.as_rule()), Some(Rule::sign)) {
        sign = parse_sign(inner.next().unwrap());
    }
    let numer = parse_int(inner.next().expect("rational always has a numerator"));
    let magnitude = match inner.next() {
        Some(denom_pair) => BigRational::new(numer, parse_int(denom_pair)),
        None => BigRational::from_integer(numer),
    };
    &sign * &magnitude
}

fn parse_variable(pair: Pair<Rule>) -> (String, u32) {
    let mut inner = pair.into_inner();
    let name = inner.next().expect("variable always has an identifier").as_str().to_string();
    let index: u32 = inner.next().expect("variable always has an index").as_str().parse().expect("int rule matches digits");
    (name, index)
}

fn parse_signed_term(pair: Pair<Rule>) -> ParsedTerm {
    let mut inner = pair.into_inner().peekable();
    let mut sign = BigRational::from_integer(BigInt::from(1));
    if matches!(inner.peek().map(|p| p.as_rule()), Some(Rule::sign)) {
        sign = parse_sign(inner.next().unwrap());
    }
    let mut magnitude = BigRational::from_integer(BigInt::from(1));
    if matches!(inner.peek().map(|p| p.as_rule()), Some(Rule::magnitude)) {
        magnitude = parse_magnitude(inner.next().unwrap());
    }
    let (name, index) = parse_variable(inner.next().expect("signed_term always ends in a variable"));
    ParsedTerm { variable_name: name, variable_index: index, coefficient: &sign * &magnitude }
}

fn parse_linear_expr(pair: Pair<Rule>) -> ParsedExpr {
    ParsedExpr { terms: pair.into_inner().map(parse_signed_term).collect() }
}

fn parse_relation(pair: Pair<Rule>) -> Sign {
    match pair.as_str() {
        "<=" => Sign::LessOrEqual,
        ">=" => Sign::GreaterOrEqual,
        "=" => Sign::Equal,
        other => unreachable!("grammar only produces <=, >=, = — got {other}"),
    }
}

fn parse_objective_line(pair: Pair<Rule>) -> (ParsedSense, ParsedExpr) {
    let mut inner = pair.into_inner();
    let sense_pair = inner.next().expect("objective_line always has a sense");
    let sense = match sense_pair.as_str().to_ascii_lowercase().as_str() {
        "min" => ParsedSense::Min,
        "max" => ParsedSense::Max,
        other => unreachable!("grammar only matches min/max — got {other}"),
    };
    let expr = parse_linear_expr(inner.next().expect("objective_line always has a linear_expr"));
    (sense, expr)
}

fn parse_constraint_line(pair: Pair<Rule>) -> ParsedConstraint {
    let mut inner = pair.into_inner();
    let left = parse_linear_expr(inner.next().expect("constraint_line always has a linear_expr"));
    let sign = parse_relation(inner.next().expect("constraint_line always has a relation"));
    let right = parse_rational(inner.next().expect("constraint_line always has a rational"));
    ParsedConstraint { left, sign, right }
}

fn parse_variable_list(pair: Pair<Rule>) -> ParseResult<Vec<(String, u32)>> {
    let mut inner = pair.into_inner();
    let first = inner.next().expect("variable_list is never empty");
    if first.as_rule() == Rule::variable_range {
        let mut range = first.into_inner();
        let (name, start) = parse_variable(range.next().expect("variable_range has a start"));
        let (end_name, end) = parse_variable(range.next().expect("variable_range has an end"));
        if start > end {
            return Err(ParseError::InvalidRange(format!("{name}{start}..{end_name}{end}")));
        }
        Ok((start..=end).map(|i| (name.clone(), i)).collect())
    } else {
        let mut result = vec![parse_variable(first)];
        result.extend(inner.map(parse_variable));
        Ok(result)
    }
}

fn parse_sign_clause(pair: Pair<Rule>) -> ParseResult<Vec<ParsedConstraint>> {
    let mut inner = pair.into_inner();
    let variables = parse_variable_list(inner.next().expect("sign_clause always has a variable_list"))?;
    let sign = parse_relation(inner.next().expect("sign_clause always has a relation"));
    let right = parse_rational(inner.next().expect("sign_clause always has a rational"));
    Ok(variables
        .into_iter()
        .map(|(name, index)| ParsedConstraint {
            left: ParsedExpr { terms: vec![ParsedTerm { variable_name: name, variable_index: index, coefficient: BigRational::from_integer(BigInt::from(1)) }] },
            sign,
            right: right.clone(),
        })
        .collect())
}

fn parse_integer_clause(pair: Pair<Rule>) -> ParseResult<Vec<(String, u32)>> {
    let mut inner = pair.into_inner();
    parse_variable_list(inner.next().expect("integer_clause always has a variable_list"))
}

fn parse_tail_line(pair: Pair<Rule>) -> ParseResult<(Vec<ParsedConstraint>, Vec<(String, u32)>)> {
    let mut sign_restrictions = Vec::new();
    let mut integer_variables = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::sign_clause => sign_restrictions.extend(parse_sign_clause(p)?),
            Rule::integer_clause => integer_variables.extend(parse_integer_clause(p)?),
            _ => {}
        }
    }
    Ok((sign_restrictions, integer_variables))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_objective_and_two_constraints() {
        let input = "MAX Z = 3x1+2x2\n2x1+1x2<=100\n1x1+1x2<=80\n";
        let program = parse(input).unwrap();
        assert_eq!(program.sense, Some(ParsedSense::Max));
        assert_eq!(program.objective.terms.len(), 2);
        assert_eq!(program.constraints.len(), 2);
    }

    #[test]
    fn parses_fractional_coefficient_and_bare_sign() {
        let input = "MAX Z = -1/600x1+x2\nx1<=10\n";
        let program = parse(input).unwrap();
        assert_eq!(program.objective.terms[0].coefficient, BigRational::new(BigInt::from(-1), BigInt::from(600)));
        assert_eq!(program.objective.terms[1].coefficient, BigRational::from_integer(BigInt::from(1)));
    }

    #[test]
    fn parses_tail_line_with_sign_and_integrality() {
        let input = "MIN Z = x1+x2\nx1+x2=100\nx2>=10 and x1,x2 non-negative integers\n";
        let program = parse(input).unwrap();
        assert_eq!(program.sign_restrictions.len(), 1);
        assert_eq!(program.integer_variables, vec![("x".to_string(), 1), ("x".to_string(), 2)]);
    }

    #[test]
    fn parses_variable_range_in_tail_line() {
        let input = "MIN Z = x1+x2+x3\nx1+x2+x3=10\nx1..x3 non-negative integers\n";
        let program = parse(input).unwrap();
        assert_eq!(program.integer_variables, vec![("x".to_string(), 1), ("x".to_string(), 2), ("x".to_string(), 3)]);
    }

    #[test]
    fn builds_a_solver_ready_model() {
        let input = "MAX Z = 3x1+2x2\n2x1+1x2<=100\n1x1+1x2<=80\n";
        let model = parse_model(input).unwrap();
        assert_eq!(model.lp_type, LpType::Max);
        assert_eq!(model.initial_target.len(), 2);
        assert_eq!(model.initial_constraints.len(), 2);
    }

    #[test]
    fn descending_variable_range_is_a_parse_error() {
        let input = "MIN Z = x1+x2+x3\nx1+x2+x3=10\nx3..x1 non-negative integers\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, ParseError::InvalidRange(_)));
    }

    #[test]
    fn no_trailing_newline_after_tail_line_still_parses() {
        let input = "MIN Z = x1+x2\nx1+x2=100\nx1,x2 non-negative integers";
        let program = parse(input).unwrap();
        assert_eq!(program.integer_variables.len(), 2);
    }
}
