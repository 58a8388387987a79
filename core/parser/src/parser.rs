//! FILENAME: core/parser/src/parser.rs
//! PURPOSE: Recursive descent parser that converts a stream of Tokens into an AST.
//! CONTEXT: This is the third stage of the parsing pipeline. It reads tokens
//! from the token lookahead buffer, resolves identifiers against a `Scope`
//! and builds an `Expression` tree, which is simplified once before it is
//! returned.
//!
//! GRAMMAR:
//!   expression --> boolean ( "?" expression ":" expression )?
//!   boolean    --> relational ( ("&&" | "||") boolean )?
//!   relational --> term ( ("<" | "<=" | ">" | ">=" | "==" | "!=") relational )?
//!   term       --> product ( ("+" | "-") term )?
//!   product    --> power ( ("*" | "/" | "%") product )?
//!   power      --> atom ( ("^" | "**") power )?
//!   atom       --> "-" atom | "(" expression ")" | "|" expression "|"
//!                | IDENTIFIER "(" arguments? ")" | IDENTIFIER | literal
//!   literal    --> "+"? NUMBER QUANTIFIER?
//!   arguments  --> expression ("," expression)*
//!
//! Every binary level recurses into itself on the right. `reorder` turns the
//! resulting right-leaning chains into the left-associative shape by pushing
//! the new operand down the left spine of the right operand. Power is the
//! exception and stays right-associative.

use crate::ast::{is_truthy, BinaryOperation, BinaryOperator, Expression};
use crate::config::ParserConfig;
use crate::error::{CalcError, CalcResult};
use crate::function::{Arity, Function};
use crate::lexer::{Lexer, TokenStream};
use crate::scope::Scope;
use crate::token::Token;
use log::debug;
use std::io::Read;
use std::rc::Rc;

const BOOLEAN_OPERATORS: [(&str, BinaryOperator); 2] =
    [("&&", BinaryOperator::And), ("||", BinaryOperator::Or)];

const RELATIONAL_OPERATORS: [(&str, BinaryOperator); 6] = [
    ("<", BinaryOperator::LessThan),
    ("<=", BinaryOperator::LessEqual),
    (">", BinaryOperator::GreaterThan),
    (">=", BinaryOperator::GreaterEqual),
    ("==", BinaryOperator::Equal),
    ("!=", BinaryOperator::NotEqual),
];

const TERM_OPERATORS: [(&str, BinaryOperator); 2] = [
    ("+", BinaryOperator::Add),
    ("-", BinaryOperator::Subtract),
];

const PRODUCT_OPERATORS: [(&str, BinaryOperator); 3] = [
    ("*", BinaryOperator::Multiply),
    ("/", BinaryOperator::Divide),
    ("%", BinaryOperator::Modulo),
];

const POWER_OPERATORS: [(&str, BinaryOperator); 2] =
    [("^", BinaryOperator::Power), ("**", BinaryOperator::Power)];

/// Rescales `value` by a unit suffix, or `None` for an unknown suffix.
fn apply_quantifier(value: f64, quantifier: &str) -> Option<f64> {
    match quantifier {
        "n" => Some(value / 1e9),
        "u" => Some(value / 1e6),
        "m" => Some(value / 1e3),
        "k" | "K" => Some(value * 1e3),
        "M" => Some(value * 1e6),
        "G" => Some(value * 1e9),
        _ => None,
    }
}

/// The Parser holds the token stream and the scope used for name lookup.
pub struct Parser<'s, R: Read> {
    scope: &'s Scope,
    tokens: TokenStream<R>,
    conditional: Rc<Function>,
    absolute: Rc<Function>,
}

impl<'s, R: Read> Parser<'s, R> {
    pub fn new(input: R, scope: &'s mut Scope) -> Self {
        Parser::with_config(input, scope, &ParserConfig::default())
    }

    /// Creates a parser. With `inject_constants` set, `tau` and `e` are bound
    /// as constants in `scope` first; the scope is read-only afterwards.
    pub fn with_config(input: R, scope: &'s mut Scope, config: &ParserConfig) -> Self {
        if config.inject_constants {
            scope.create_constant("tau", std::f64::consts::TAU);
            scope.create_constant("e", std::f64::consts::E);
        }

        Parser {
            scope,
            tokens: Lexer::with_config(input, config).into_stream(),
            conditional: Rc::new(conditional_function()),
            absolute: Rc::new(Function::unary("abs", f64::abs, true)),
        }
    }

    /// Parses the entire input and returns the simplified tree.
    pub fn parse(&mut self) -> CalcResult<Expression> {
        let expression = self.parse_expression()?.simplify()?;

        let token = self.tokens.current()?;
        if !token.is_end() {
            return Err(CalcError::syntax(
                format!(
                    "Unexpected token: {}. Expected end of input.",
                    token.describe()
                ),
                token.position,
            ));
        }

        debug!(target: "PARSER", "parsed {}", expression);
        Ok(expression)
    }

    /// Consumes the current token if it is the symbol `symbol`.
    fn expect(&mut self, symbol: &str) -> CalcResult<()> {
        let token = self.tokens.current()?;
        if token.is_symbol(symbol) {
            self.tokens.consume()?;
            return Ok(());
        }
        Err(CalcError::syntax(
            format!(
                "Unexpected token: {}. Expected: '{}'.",
                token.describe(),
                symbol
            ),
            token.position,
        ))
    }

    /// Consumes and returns the operator the current token spells, if it is
    /// one of `operators`.
    fn operator_at(
        &mut self,
        operators: &[(&str, BinaryOperator)],
    ) -> CalcResult<Option<BinaryOperator>> {
        let token = self.tokens.current()?;
        if !token.is_any_symbol() {
            return Ok(None);
        }
        let found = operators
            .iter()
            .find(|(symbol, _)| token.trigger == *symbol)
            .map(|(_, operator)| *operator);
        if found.is_some() {
            self.tokens.consume()?;
        }
        Ok(found)
    }

    /// Conditional: desugared into a call of a lazy three-argument function.
    fn parse_expression(&mut self) -> CalcResult<Expression> {
        let condition = self.parse_boolean()?;
        if !self.tokens.current()?.is_symbol("?") {
            return Ok(condition);
        }
        self.tokens.consume()?;

        let when_true = self.parse_expression()?;
        self.expect(":")?;
        let when_false = self.parse_expression()?;

        Ok(Expression::call(
            Rc::clone(&self.conditional),
            vec![condition, when_true, when_false],
        ))
    }

    fn parse_boolean(&mut self) -> CalcResult<Expression> {
        let left = self.parse_relational()?;
        match self.operator_at(&BOOLEAN_OPERATORS)? {
            Some(operator) => {
                let right = self.parse_boolean()?;
                Ok(reorder(left, right, operator))
            }
            None => Ok(left),
        }
    }

    fn parse_relational(&mut self) -> CalcResult<Expression> {
        let left = self.parse_term()?;
        match self.operator_at(&RELATIONAL_OPERATORS)? {
            Some(operator) => {
                let right = self.parse_relational()?;
                Ok(reorder(left, right, operator))
            }
            None => Ok(left),
        }
    }

    fn parse_term(&mut self) -> CalcResult<Expression> {
        let left = self.parse_product()?;
        if let Some(operator) = self.operator_at(&TERM_OPERATORS)? {
            let right = self.parse_term()?;
            return Ok(reorder(left, right, operator));
        }

        // `3-2` lexes as `3` followed by the literal `-2`, read here as a sum.
        let token = self.tokens.current()?;
        if token.is_number() && token.contents.starts_with('-') {
            let right = self.parse_term()?;
            return Ok(reorder(left, right, BinaryOperator::Add));
        }

        Ok(left)
    }

    fn parse_product(&mut self) -> CalcResult<Expression> {
        let left = self.parse_power()?;
        match self.operator_at(&PRODUCT_OPERATORS)? {
            Some(operator) => {
                let right = self.parse_product()?;
                Ok(reorder(left, right, operator))
            }
            None => Ok(left),
        }
    }

    /// Right-associative: `2^3^2` is `2^(3^2)`.
    fn parse_power(&mut self) -> CalcResult<Expression> {
        let left = self.parse_atom()?;
        match self.operator_at(&POWER_OPERATORS)? {
            Some(operator) => {
                let right = self.parse_power()?;
                Ok(Expression::binary(operator, left, right))
            }
            None => Ok(left),
        }
    }

    fn parse_atom(&mut self) -> CalcResult<Expression> {
        if self.tokens.current()?.is_symbol("-") {
            self.tokens.consume()?;
            let operand = self.parse_atom()?;
            let negation =
                BinaryOperation::new(BinaryOperator::Subtract, Expression::constant(0.0), operand);
            return Ok(Expression::Binary(negation.sealed()));
        }

        if self.tokens.current()?.is_symbol("+") && self.tokens.next()?.is_symbol("(") {
            self.tokens.consume()?;
        }

        if self.tokens.current()?.is_symbol("(") {
            self.tokens.consume()?;
            let mut inner = self.parse_expression()?;
            if let Expression::Binary(operation) = &mut inner {
                operation.seal();
            }
            self.expect(")")?;
            return Ok(inner);
        }

        if self.tokens.current()?.is_symbol("|") {
            self.tokens.consume()?;
            let inner = self.parse_expression()?;
            self.expect("|")?;
            return Ok(Expression::call(Rc::clone(&self.absolute), vec![inner]));
        }

        if self.tokens.current()?.is_identifier() {
            if self.tokens.next()?.is_symbol("(") {
                return self.parse_function_call();
            }

            let name = self.tokens.consume()?;
            return match self.scope.get_variable(&name.contents) {
                Some(variable) => Ok(Expression::variable(variable)),
                None => Err(CalcError::semantic(
                    format!("Unknown variable: '{}'", name.contents),
                    Some(name.position),
                )),
            };
        }

        self.parse_literal()
    }

    fn parse_literal(&mut self) -> CalcResult<Expression> {
        if self.tokens.current()?.is_symbol("+") && self.tokens.next()?.is_number() {
            self.tokens.consume()?;
        }

        let token = self.tokens.consume()?;
        if !token.is_number() {
            return Err(unexpected(&token, "Expected an expression."));
        }

        let mut value: f64 = token.contents.parse().map_err(|_| {
            CalcError::lexical(
                format!("Malformed number: '{}'", token.source),
                token.position,
            )
        })?;

        if self.tokens.current()?.is_identifier() {
            let suffix = self.tokens.consume()?;
            value = apply_quantifier(value, &suffix.contents)
                .ok_or_else(|| unexpected(&suffix, "Expected a valid quantifier."))?;
        }

        Ok(Expression::constant(value))
    }

    /// The callee is resolved now; an unknown name never reaches evaluation.
    fn parse_function_call(&mut self) -> CalcResult<Expression> {
        let name = self.tokens.consume()?;
        let function = self.scope.get_function(&name.contents).ok_or_else(|| {
            CalcError::semantic(
                format!("Unknown function: '{}'", name.contents),
                Some(name.position),
            )
        })?;

        self.expect("(")?;
        let mut arguments = Vec::new();
        loop {
            let token = self.tokens.current()?;
            if token.is_symbol(")") || token.is_end() {
                break;
            }
            if !arguments.is_empty() {
                self.expect(",")?;
            }
            arguments.push(self.parse_expression()?);
        }
        self.expect(")")?;

        Ok(Expression::call(function, arguments))
    }
}

fn unexpected(token: &Token, expectation: &str) -> CalcError {
    CalcError::syntax(
        format!("Unexpected token: {}. {}", token.describe(), expectation),
        token.position,
    )
}

/// Combines `left op right`. When `right` is an unsealed node of the same
/// precedence rank, `left op` is pushed down its left spine instead of being
/// wrapped around it, which yields the left-associative shape.
fn reorder(left: Expression, right: Expression, operator: BinaryOperator) -> Expression {
    match right {
        Expression::Binary(mut target) if target.accepts_left_insertion(operator) => {
            replace_left(&mut target, left, operator);
            Expression::Binary(target)
        }
        right => Expression::binary(operator, left, right),
    }
}

/// Replaces the left child of the deepest unsealed, same-rank node on the
/// left spine of `target` with `(new_left op old_left)`.
fn replace_left(target: &mut BinaryOperation, new_left: Expression, operator: BinaryOperator) {
    if let Expression::Binary(child) = target.left.as_mut() {
        if child.accepts_left_insertion(operator) {
            replace_left(child, new_left, operator);
            return;
        }
    }

    let old_left = std::mem::replace(target.left.as_mut(), Expression::constant(0.0));
    *target.left = Expression::binary(operator, new_left, old_left);
}

/// `(condition, when_true, when_false)`: only the selected branch is evaluated.
fn conditional_function() -> Function {
    Function::general("if", Arity::Fixed(3), true, |arguments| {
        if is_truthy(arguments[0].evaluate()?) {
            arguments[1].evaluate()
        } else {
            arguments[2].evaluate()
        }
    })
}

/// Parses `input` against `scope` with the default configuration.
pub fn parse(input: &str, scope: &mut Scope) -> CalcResult<Expression> {
    Parser::new(input.as_bytes(), scope).parse()
}

/// Parses everything readable from `input`.
pub fn parse_reader<R: Read>(input: R, scope: &mut Scope) -> CalcResult<Expression> {
    Parser::new(input, scope).parse()
}

pub fn parse_with_config(
    input: &str,
    scope: &mut Scope,
    config: &ParserConfig,
) -> CalcResult<Expression> {
    Parser::with_config(input.as_bytes(), scope, config).parse()
}
