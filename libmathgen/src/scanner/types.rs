//! Definitions of types used in the libmathgen scanner.

use core::fmt;

/// A token in a mathgen expression.
#[derive(PartialEq, Clone, Debug)]
pub enum Token {
    /// A scanned numeric literal, kept as its raw lexeme so that no precision
    /// is lost before the exact-literal rewrite.
    Number(String),

    /// A boolean literal, `true` or `false`.
    Bool(bool),

    /// An identifier: a variable, function, or comprehension binding name.
    Ident(String),

    /// + symbol
    Plus,

    /// - symbol
    Minus,

    /// * symbol
    Mult,

    /// / symbol
    Div,

    /// // symbol
    FloorDiv,

    /// % symbol
    Mod,

    /// ** symbol
    Exp,

    /// < symbol
    Lt,

    /// <= symbol
    Le,

    /// > symbol
    Gt,

    /// >= symbol
    Ge,

    /// == symbol
    EqEq,

    /// != symbol
    Ne,

    /// `and` keyword
    And,

    /// `or` keyword
    Or,

    /// `not` keyword
    Not,

    /// `for` keyword
    For,

    /// `in` keyword
    In,

    /// `if` keyword
    If,

    /// , symbol
    Comma,

    /// ( symbol
    OpenParen,

    /// ) symbol
    CloseParen,

    /// [ symbol
    OpenBracket,

    /// ] symbol
    CloseBracket,

    /// { symbol
    OpenBrace,

    /// } symbol
    CloseBrace,

    /// An invalid token.
    Invalid(String),

    /// End of input.
    EOF,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;
        write!(
            f,
            "{}",
            match self {
                Number(num) => num.to_string(),
                Bool(b) => b.to_string(),
                Ident(s) => s.to_string(),
                Plus => "+".into(),
                Minus => "-".into(),
                Mult => "*".into(),
                Div => "/".into(),
                FloorDiv => "//".into(),
                Mod => "%".into(),
                Exp => "**".into(),
                Lt => "<".into(),
                Le => "<=".into(),
                Gt => ">".into(),
                Ge => ">=".into(),
                EqEq => "==".into(),
                Ne => "!=".into(),
                And => "and".into(),
                Or => "or".into(),
                Not => "not".into(),
                For => "for".into(),
                In => "in".into(),
                If => "if".into(),
                Comma => ",".into(),
                OpenParen => "(".into(),
                CloseParen => ")".into(),
                OpenBracket => "[".into(),
                CloseBracket => "]".into(),
                OpenBrace => "{".into(),
                CloseBrace => "}".into(),
                Invalid(s) => s.to_string(),
                EOF => "end of input".into(),
            }
        )
    }
}

#[cfg(test)]
mod tests {
    mod format {
        use crate::scanner::types::*;

        macro_rules! format_tests {
            ($($name:ident: $ty:expr, $format_str:expr)*) => {
            $(
                #[test]
                fn $name() {
                    use Token::*;
                    let tok = $ty;
                    assert_eq!(tok.to_string(), $format_str);
                }
            )*
            }
        }

        format_tests! {
            number: Number("1.3".into()), "1.3"
            boolean: Bool(true), "true"
            ident: Ident("ab".into()), "ab"
            plus: Plus, "+"
            minus: Minus, "-"
            mult: Mult, "*"
            div: Div, "/"
            floor_div: FloorDiv, "//"
            modulo: Mod, "%"
            exp: Exp, "**"
            lt: Lt, "<"
            le: Le, "<="
            eq_eq: EqEq, "=="
            ne: Ne, "!="
            comma: Comma, ","
            open_paren: OpenParen, "("
            close_brace: CloseBrace, "}"
            invalid: Invalid("@".into()), "@"
        }
    }
}
