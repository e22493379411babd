//! The directive-level grammar: programs, directives, and text templates.

use super::Expr;
use crate::emit::EmitForm;

use core::fmt;

/// One line of a template program, tagged by its directive kind.
///
/// The set of kinds is closed: adding a directive is a compile-time
/// exhaustiveness check on every consumer, not a runtime lookup.
#[derive(PartialEq, Clone, Debug)]
pub enum Directive {
    /// `@var name = expr` — binds `name` to the value of `expr`.
    Var {
        /// The variable name being bound.
        name: String,
        /// The bound expression, parsed and literal-rewritten.
        expr: Expr,
    },
    /// `@condition expr` — invalidates the attempt when `expr` is false.
    Condition(Expr),
    /// `@question template` — adds a question phrasing candidate.
    Question(Template),
    /// `@answer template` — sets the attempt's answer.
    Answer(Template),
    /// `@group ...` — composite templates; must be expanded by an external
    /// layer before interpretation, so executing one always fails.
    Group(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Directive::*;
        match self {
            Var { name, expr } => write!(f, "@var {} = {}", name, expr),
            Condition(expr) => write!(f, "@condition {}", expr),
            Question(template) => write!(f, "@question {}", template),
            Answer(template) => write!(f, "@answer {}", template),
            Group(payload) => write!(f, "@group {}", payload),
        }
    }
}

/// An ordered sequence of [Directive]s.
///
/// A program is parsed once per template and shared read-only across all
/// generation attempts.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Program {
    directives: Vec<Directive>,
}

impl Program {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self
            .directives
            .iter()
            .map(|directive| directive.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", lines)
    }
}

/// An interpolated text template: literal text interspersed with
/// `{expr[:form[:options]]}` placeholders.
#[derive(PartialEq, Clone, Debug, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// One piece of a [Template].
#[derive(PartialEq, Clone, Debug)]
pub enum Segment {
    /// Literal text, with brace escapes already resolved.
    Text(String),
    /// An expression placeholder.
    Placeholder(Placeholder),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Re-escape braces so the displayed template re-parses.
            Segment::Text(text) => write!(f, "{}", text.replace('{', "{{").replace('}', "}}")),
            Segment::Placeholder(placeholder) => write!(f, "{}", placeholder),
        }
    }
}

/// An expression placeholder inside a [Template], with its rendering form and
/// optional decimal digit count.
#[derive(PartialEq, Clone, Debug)]
pub struct Placeholder {
    /// The placeholder expression, parsed and literal-rewritten.
    pub expr: Expr,
    /// The form scalar results render in.
    pub form: EmitForm,
    /// Decimal digit count override from the placeholder options.
    pub digits: Option<u32>,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.form, self.digits) {
            (EmitForm::Auto, None) => write!(f, "{{{}}}", self.expr),
            (form, None) => write!(f, "{{{}:{}}}", self.expr, form),
            (form, Some(digits)) => write!(f, "{{{}:{}:{}}}", self.expr, form, digits),
        }
    }
}
