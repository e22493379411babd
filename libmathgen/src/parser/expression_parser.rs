use super::errors::ParseError;
use crate::grammar::*;
use crate::scanner::{scan, types::Token};
use crate::utils::PeekIter;

use core::convert::TryFrom;

/// Parses an expression's text into a [grammar][crate::grammar] tree.
///
/// The returned tree still carries raw [Number](Expr::Number) literal nodes;
/// run it through the [literal rewrite pass][crate::evaluator] before
/// evaluating it.
pub fn parse_expression(text: &str) -> Result<Expr, ParseError> {
    let mut parser = ExpressionParser::new(scan(text), text);
    let parsed = parser.expr()?;
    parser.expect_done()?;
    Ok(parsed)
}

struct ExpressionParser<'a> {
    input: PeekIter<Token>,
    text: &'a str,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: Vec<Token>, text: &'a str) -> Self {
        Self {
            input: PeekIter::new(input.into_iter()),
            text,
        }
    }

    fn err<T>(&self, reason: String) -> Result<T, ParseError> {
        Err(ParseError::ExpressionSyntax {
            text: self.text.to_owned(),
            reason,
        })
    }

    fn peek(&mut self) -> Token {
        self.input.peek().cloned().unwrap_or(Token::EOF)
    }

    fn next(&mut self) -> Token {
        self.input.next().unwrap_or(Token::EOF)
    }

    fn eat(&mut self, expected: Token) -> Result<(), ParseError> {
        let found = self.next();
        if found == expected {
            Ok(())
        } else {
            self.err(format!(r#"expected "{}", found "{}""#, expected, found))
        }
    }

    fn expect_done(&mut self) -> Result<(), ParseError> {
        match self.next() {
            Token::EOF => Ok(()),
            found => self.err(format!(r#"unexpected extra token "{}""#, found)),
        }
    }

    // Precedence climbing, loosest first: or < and < not < comparison chains
    // < additive < multiplicative < unary sign < exponentiation.
    fn expr(&mut self) -> Result<Expr, ParseError> {
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.and_expr()?;
        while self.peek() == Token::Or {
            self.next();
            lhs = Expr::BoolExpr(BoolExpr {
                op: BoolOperator::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(self.and_expr()?),
            });
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.not_expr()?;
        while self.peek() == Token::And {
            self.next();
            lhs = Expr::BoolExpr(BoolExpr {
                op: BoolOperator::And,
                lhs: Box::new(lhs),
                rhs: Box::new(self.not_expr()?),
            });
        }
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Token::Not {
            self.next();
            return Ok(Expr::UnaryExpr(UnaryExpr {
                op: UnaryOperator::Not,
                rhs: Box::new(self.not_expr()?),
            }));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let first = self.additive()?;
        let mut rest = Vec::new();
        while let Ok(op) = ComparisonOperator::try_from(&self.peek()) {
            self.next();
            rest.push((op, self.additive()?));
        }
        if rest.is_empty() {
            return Ok(first);
        }
        Ok(Expr::Comparison(Comparison {
            first: Box::new(first),
            rest,
        }))
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOperator::Plus,
                Token::Minus => BinaryOperator::Minus,
                _ => break,
            };
            self.next();
            lhs = Expr::BinaryExpr(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(self.multiplicative()?),
            });
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Token::Mult => BinaryOperator::Mult,
                Token::Div => BinaryOperator::Div,
                Token::FloorDiv => BinaryOperator::FloorDiv,
                Token::Mod => BinaryOperator::Mod,
                _ => break,
            };
            self.next();
            lhs = Expr::BinaryExpr(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(self.unary()?),
            });
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Plus => UnaryOperator::SignPositive,
            Token::Minus => UnaryOperator::SignNegative,
            _ => return self.power(),
        };
        self.next();
        Ok(Expr::UnaryExpr(UnaryExpr {
            op,
            rhs: Box::new(self.unary()?),
        }))
    }

    fn power(&mut self) -> Result<Expr, ParseError> {
        let base = self.atom()?;
        if self.peek() != Token::Exp {
            return Ok(base);
        }
        self.next();
        // Right-associative; the exponent may carry its own sign, as in
        // `2 ** -3`.
        Ok(Expr::BinaryExpr(BinaryExpr {
            op: BinaryOperator::Exp,
            lhs: Box::new(base),
            rhs: Box::new(self.unary()?),
        }))
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.next() {
            Token::Number(raw) => Ok(Expr::Number(raw)),
            Token::Bool(b) => Ok(Expr::Bool(b)),
            Token::Ident(name) => {
                if self.peek() == Token::OpenParen {
                    return self.call(name);
                }
                Ok(Expr::Var(name))
            }
            Token::OpenParen => {
                let inner = self.expr()?;
                self.eat(Token::CloseParen)?;
                Ok(inner)
            }
            Token::OpenBracket => self.comprehension(false),
            Token::OpenBrace => self.comprehension(true),
            found => self.err(format!(r#"expected an expression, found "{}""#, found)),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.eat(Token::OpenParen)?;
        let mut args = Vec::new();
        if self.peek() != Token::CloseParen {
            loop {
                args.push(self.expr()?);
                if self.peek() != Token::Comma {
                    break;
                }
                self.next();
            }
        }
        self.eat(Token::CloseParen)?;
        Ok(Expr::Call(Call { name, args }))
    }

    fn comprehension(&mut self, set: bool) -> Result<Expr, ParseError> {
        let element = self.expr()?;
        self.eat(Token::For)?;
        let binding = match self.next() {
            Token::Ident(name) => name,
            found => {
                return self.err(format!(
                    r#"expected a comprehension binding name, found "{}""#,
                    found
                ))
            }
        };
        self.eat(Token::In)?;
        let iterable = self.expr()?;
        let filter = if self.peek() == Token::If {
            self.next();
            Some(self.expr()?)
        } else {
            None
        };
        self.eat(if set {
            Token::CloseBrace
        } else {
            Token::CloseBracket
        })?;
        Ok(Expr::Comprehension(Box::new(Comprehension {
            element,
            binding,
            iterable,
            filter,
            set,
        })))
    }
}

#[cfg(test)]
mod tests {
    // Tests the parser's output against the canonical display form of the
    // parsed tree: each program below round-trips through parse + Display.
    macro_rules! parser_tests {
        ($($name:ident: $program:expr)*) => {
        $(
            #[test]
            fn $name() {
                use super::parse_expression;

                let parsed = parse_expression($program).expect($program);
                assert_eq!(parsed.to_string(), $program);
            }
        )*
        }
    }

    macro_rules! parser_error_tests {
        ($($name:ident: $program:expr => $reason:expr)*) => {
        $(
            #[test]
            fn $name() {
                use super::parse_expression;
                use crate::parser::ParseError;

                match parse_expression($program) {
                    Err(ParseError::ExpressionSyntax { text, reason }) => {
                        assert_eq!(text, $program);
                        assert_eq!(reason, $reason);
                    }
                    other => panic!("expected a syntax error, got {:?}", other),
                }
            }
        )*
        }
    }

    parser_tests! {
        number:                  "13"
        decimal:                 "1.25"
        variable:                "a"
        boolean:                 "true"
        variable_in_op_left:     "a + 1"
        variable_in_op_right:    "1 + a"
        precedence:              "1 + 2 * 3"
        parenthesized:           "(1 + 2) * 3"
        sign_negative:           "-2"
        exponent:                "2 ** 3"
        exponent_signed:         "2 ** -3"
        negated_exponent:        "-(2 ** 3)"
        floor_div_and_mod:       "a // b % c"
        comparison:              "a < b"
        comparison_chain:        "1 < a <= 10"
        equality:                "a == b != c"
        boolean_ops:             "a and b or not c"
        call:                    "rand(3, 10)"
        call_nested:             "gcd(rand(1, 5), 10)"
        call_no_args:            "f()"
        comprehension:           "[x * x for x in range(5)]"
        comprehension_filtered:  "[x for x in range(10) if x % 2 == 1]"
        set_comprehension:       "{x % 3 for x in range(9)}"
    }

    parser_error_tests! {
        missing_operand:      "1 +"         => r#"expected an expression, found "end of input""#
        lone_operator:        "*"           => r#"expected an expression, found "*""#
        unclosed_paren:       "(1 + 2"      => r#"expected ")", found "end of input""#
        mismatched_delimiter: "(1 + 2]"     => r#"expected ")", found "]""#
        extra_tokens:         "1 2"         => r#"unexpected extra token "2""#
        invalid_token:        "1 @ 2"       => r#"unexpected extra token "@""#
        assignment:           "a = 5"       => r#"unexpected extra token "=""#
        missing_for:          "[x in y]"    => r#"expected "for", found "in""#
        missing_binding:      "[x for 2 in y]" => r#"expected a comprehension binding name, found "2""#
        empty:                ""            => r#"expected an expression, found "end of input""#
    }
}
