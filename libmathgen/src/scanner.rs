pub mod types;

use crate::utils::PeekIter;
use types::Token;

/// Tokenizes a mathgen expression.
///
/// Scanning never fails: unrecognized characters are emitted as
/// [Invalid](Token::Invalid) tokens for the parser to report.
pub fn scan<T: Into<String>>(input: T) -> Vec<Token> {
    let mut scanner = Scanner::new(input);
    scanner.scan();
    scanner.output
}

struct Scanner {
    input: PeekIter<char>,
    output: Vec<Token>,
}

impl Scanner {
    fn new<T: Into<String>>(input: T) -> Scanner {
        let chars: Vec<char> = input.into().chars().collect();

        Scanner {
            input: PeekIter::new(chars.into_iter()),
            output: Vec::new(),
        }
    }

    fn scan(&mut self) {
        while let Some(&c) = self.input.peek() {
            match c {
                _ if c.is_whitespace() => {
                    self.input.next();
                }
                _ if c.is_ascii_digit() => self.scan_num(),
                _ if c.is_alphabetic() || c == '_' => self.scan_word(),
                _ => self.scan_symbol(),
            }
        }

        self.output.push(Token::EOF);
    }

    // Consumes `next` if it is the next character, fusing two-character
    // symbols like `**` and `<=`.
    fn fuse(&mut self, next: char, fused: Token, plain: Token) -> Token {
        if self.input.peek() == Some(&next) {
            self.input.next();
            fused
        } else {
            plain
        }
    }

    fn scan_symbol(&mut self) {
        use Token::*;
        let ty = match self.input.next().unwrap() {
            '+' => Plus,
            '-' => Minus,
            '*' => self.fuse('*', Exp, Mult),
            '/' => self.fuse('/', FloorDiv, Div),
            '%' => Mod,
            '<' => self.fuse('=', Le, Lt),
            '>' => self.fuse('=', Ge, Gt),
            '=' => self.fuse('=', EqEq, Invalid("=".into())),
            '!' => self.fuse('=', Ne, Invalid("!".into())),
            ',' => Comma,
            '(' => OpenParen,
            ')' => CloseParen,
            '[' => OpenBracket,
            ']' => CloseBracket,
            '{' => OpenBrace,
            '}' => CloseBrace,
            c => Invalid(c.to_string()),
        };
        self.output.push(ty);
    }

    // Scans an integer or decimal literal, keeping the raw lexeme.
    fn scan_num(&mut self) {
        let mut num_str: String = self.input.collect_while(|c| c.is_ascii_digit());
        if let Some('.') = self.input.peek() {
            num_str.push('.');
            self.input.next();
            num_str.push_str(&self.input.collect_while::<_, String>(|c| c.is_ascii_digit()));
        }
        self.output.push(Token::Number(num_str));
    }

    // Scans an identifier or a keyword.
    fn scan_word(&mut self) {
        use Token::*;
        let word: String = self
            .input
            .collect_while(|&c| c.is_alphanumeric() || c == '_');
        let ty = match word.as_str() {
            "and" => And,
            "or" => Or,
            "not" => Not,
            "for" => For,
            "in" => In,
            "if" => If,
            "true" => Bool(true),
            "false" => Bool(false),
            _ => Ident(word),
        };
        self.output.push(ty);
    }
}
