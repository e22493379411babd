//! Generation of problems from directive programs.
//!
//! A [ProblemGenerator] owns a parsed [Program] and runs the per-attempt
//! state machine over it: directives execute in order, a false condition
//! invalidates the attempt (and only that — every evaluation error is fatal),
//! and invalid attempts are retried with an advanced seed cursor until one
//! succeeds or the try budget runs out.

use crate::emit::DEFAULT_DECIMAL_DIGITS;
use crate::evaluator::{evaluate_expr, EvalError, Value, VarEnv};
use crate::grammar::{Directive, Placeholder, Program, Segment, Template};
use crate::parser::{parse_program, ParseError};
use crate::problem::{AnswerFormat, Problem};
use crate::rng;

use core::fmt;
use rand::seq::SliceRandom;

/// Options configuring a [ProblemGenerator], passed through from the template
/// model.
#[derive(Clone, PartialEq, Debug)]
pub struct GeneratorOptions {
    /// The base seed. Every public generate call starts its seed cursor here,
    /// so one generator always reproduces the same problems.
    pub seed: u64,
    /// The declared answer format. [Auto](AnswerFormat::Auto) infers a format
    /// from each rendered answer.
    pub format: AnswerFormat,
    /// Units display option, passed through untouched to emitted problems.
    pub units: Option<String>,
    /// Right-to-left display flag, passed through untouched to emitted
    /// problems.
    pub rtl: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            format: AnswerFormat::Auto,
            units: None,
            rtl: false,
        }
    }
}

/// An error raised while generating problems. All of these are fatal; the
/// retry loop only ever absorbs the falsity of a `@condition` directive.
#[derive(PartialEq, Clone, Debug)]
pub enum GenerateError {
    /// A directive's expression failed to evaluate.
    Eval {
        /// The template the directive belongs to.
        template: String,
        /// The directive that failed, as written.
        directive: String,
        /// The underlying evaluation error.
        source: EvalError,
    },
    /// No valid problem was found within the try budget.
    Exhausted {
        /// The template that was exhausted.
        template: String,
    },
    /// The program contains a `@group` directive, which must be expanded by
    /// an external layer before interpretation.
    GroupNotHandled {
        /// The template containing the directive.
        template: String,
    },
    /// The declared format was `auto` but the rendered answer matched no
    /// structural pattern.
    UnrecognizedAnswerFormat {
        /// The template the answer belongs to.
        template: String,
        /// The rendered answer.
        answer: String,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use GenerateError::*;
        match self {
            Eval {
                template,
                directive,
                source,
            } => write!(
                f,
                r#"error evaluating "{}" in template "{}": {}"#,
                directive, template, source
            ),
            Exhausted { template } => write!(
                f,
                r#"failed to generate a valid problem for "{}" after {} tries"#,
                template,
                ProblemGenerator::MAX_TRIES
            ),
            GroupNotHandled { template } => write!(
                f,
                r#"template "{}" contains a group directive, which must be expanded before generation"#,
                template
            ),
            UnrecognizedAnswerFormat { template, answer } => write!(
                f,
                r#"could not infer an answer format for "{}" in template "{}""#,
                answer, template
            ),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Eval { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The outcome of a single attempt. Errors are not an outcome: they abort the
/// whole call.
enum Outcome {
    Valid(Draft),
    Invalid,
}

/// The mutable state of one attempt, promoted to a [Problem] on success.
struct Draft {
    vars: VarEnv,
    questions: Vec<String>,
    answer: String,
    format: AnswerFormat,
    /// The cursor after the last executed directive; drives question
    /// candidate choice.
    final_seed: u64,
}

/// Generates problems from a parsed template program.
///
/// One generator instance holds no mutable state across calls: the seed
/// cursor is threaded through each call as a local value, starting from the
/// configured base seed, so concurrent callers sharing an instance observe no
/// seed leakage.
pub struct ProblemGenerator {
    name: String,
    program: Program,
    options: GeneratorOptions,
}

impl ProblemGenerator {
    /// Attempts per generate call before giving up with
    /// [Exhausted](GenerateError::Exhausted).
    pub const MAX_TRIES: usize = 50;

    /// Consecutive duplicates [generate_multiple](Self::generate_multiple)
    /// discards before accepting duplicates to guarantee progress.
    pub const MAX_DUPLICATES: usize = 10;

    /// Parses `source` as a directive program and builds a generator for it.
    /// `name` identifies the template in errors.
    pub fn new<N: Into<String>>(
        name: N,
        source: &str,
        options: GeneratorOptions,
    ) -> Result<Self, ParseError> {
        Ok(Self::from_program(name, parse_program(source)?, options))
    }

    /// Builds a generator over an already-parsed program.
    pub fn from_program<N: Into<String>>(
        name: N,
        program: Program,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            name: name.into(),
            program,
            options,
        }
    }

    /// The template name this generator reports in errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generates one problem, retrying invalid attempts up to
    /// [MAX_TRIES](Self::MAX_TRIES) times.
    pub fn generate(&self) -> Result<Problem, GenerateError> {
        let mut cursor = self.options.seed;
        self.generate_at(&mut cursor)
    }

    /// Generates `count` problems, deduplicating against prior successes by
    /// variable snapshot and by (question, answer) pair.
    ///
    /// A duplicate is discarded and retried without consuming an output slot
    /// while the consecutive-duplicate budget lasts; once the budget is
    /// exhausted, duplicates are accepted as-is so the call always makes
    /// progress.
    pub fn generate_multiple(&self, count: usize) -> Result<Vec<Problem>, GenerateError> {
        let mut cursor = self.options.seed;
        let mut problems: Vec<Problem> = Vec::with_capacity(count);
        let mut consecutive_duplicates = 0;
        while problems.len() < count {
            let problem = self.generate_at(&mut cursor)?;
            let duplicate = problems
                .iter()
                .any(|prior| {
                    prior.vars == problem.vars
                        || (prior.question == problem.question && prior.answer == problem.answer)
                });
            if duplicate && consecutive_duplicates < Self::MAX_DUPLICATES {
                consecutive_duplicates += 1;
                continue;
            }
            consecutive_duplicates = 0;
            problems.push(problem);
        }
        Ok(problems)
    }

    fn generate_at(&self, cursor: &mut u64) -> Result<Problem, GenerateError> {
        for _ in 0..Self::MAX_TRIES {
            match self.attempt(cursor)? {
                Outcome::Valid(draft) => return Ok(self.finish(draft)),
                Outcome::Invalid => continue,
            }
        }
        Err(GenerateError::Exhausted {
            template: self.name.clone(),
        })
    }

    /// Runs one pass over the program's directives. The cursor advances once
    /// per executed directive, so each directive observes a distinct derived
    /// seed and a failed attempt leaves the cursor moved for the next one.
    fn attempt(&self, cursor: &mut u64) -> Result<Outcome, GenerateError> {
        let mut vars = VarEnv::new();
        let mut questions: Vec<String> = Vec::new();
        let mut answer = String::new();
        let mut format = self.options.format;
        for directive in self.program.directives() {
            match directive {
                Directive::Var { name, expr } => {
                    let value = evaluate_expr(expr, &vars, *cursor)
                        .map_err(|err| self.eval_error(directive, err))?;
                    match value {
                        Value::Number(num) => vars.set(name.clone(), num),
                        other => {
                            return Err(self.eval_error(
                                directive,
                                EvalError::TypeMismatch {
                                    reason: format!(
                                        "variable \"{}\" must be a number, found {}",
                                        name,
                                        other.type_name()
                                    ),
                                },
                            ))
                        }
                    }
                }
                Directive::Condition(expr) => {
                    let value = evaluate_expr(expr, &vars, *cursor)
                        .map_err(|err| self.eval_error(directive, err))?;
                    let holds = match value {
                        Value::Bool(b) => b,
                        other => {
                            return Err(self.eval_error(
                                directive,
                                EvalError::TypeMismatch {
                                    reason: format!(
                                        "a condition must be a boolean, found {}",
                                        other.type_name()
                                    ),
                                },
                            ))
                        }
                    };
                    if !holds {
                        *cursor = rng::advance(*cursor);
                        return Ok(Outcome::Invalid);
                    }
                }
                Directive::Question(template) => {
                    questions.push(self.render(template, &vars, *cursor, directive)?);
                }
                Directive::Answer(template) => {
                    answer = self.render(template, &vars, *cursor, directive)?;
                    if self.options.format == AnswerFormat::Auto {
                        format = AnswerFormat::detect(&answer).ok_or_else(|| {
                            GenerateError::UnrecognizedAnswerFormat {
                                template: self.name.clone(),
                                answer: answer.clone(),
                            }
                        })?;
                    }
                }
                Directive::Group(..) => {
                    return Err(GenerateError::GroupNotHandled {
                        template: self.name.clone(),
                    })
                }
            }
            *cursor = rng::advance(*cursor);
        }
        Ok(Outcome::Valid(Draft {
            vars,
            questions,
            answer,
            format,
            final_seed: *cursor,
        }))
    }

    /// Promotes a valid draft to a [Problem]. With multiple question
    /// candidates, one is chosen uniformly using the attempt's final seed
    /// state, so the choice is deterministic in the base seed.
    fn finish(&self, draft: Draft) -> Problem {
        let mut questions = draft.questions;
        let question = if questions.len() > 1 {
            let mut rng = rng::derive(draft.final_seed);
            questions
                .choose(&mut rng)
                .cloned()
                .unwrap_or_default()
        } else {
            questions.pop().unwrap_or_default()
        };
        Problem {
            question,
            answer: draft.answer,
            format: draft.format,
            units: self.options.units.clone(),
            rtl: self.options.rtl,
            vars: draft.vars,
        }
    }

    /// Renders an interpolated template. Each placeholder is evaluated
    /// independently against the directive's seed; scalar results render in
    /// the placeholder's form, other results render textually. The rendered
    /// text is wrapped in `$...$` math-mode delimiters.
    fn render(
        &self,
        template: &Template,
        vars: &VarEnv,
        seed: u64,
        directive: &Directive,
    ) -> Result<String, GenerateError> {
        let mut out = String::from("$");
        for segment in template.segments() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => out.push_str(
                    &self
                        .render_placeholder(placeholder, vars, seed)
                        .map_err(|err| self.eval_error(directive, err))?,
                ),
            }
        }
        out.push('$');
        Ok(out)
    }

    fn render_placeholder(
        &self,
        placeholder: &Placeholder,
        vars: &VarEnv,
        seed: u64,
    ) -> Result<String, EvalError> {
        let value = evaluate_expr(&placeholder.expr, vars, seed)?;
        let digits = placeholder.digits.unwrap_or(DEFAULT_DECIMAL_DIGITS);
        Ok(match value {
            Value::Number(num) => num.emit(placeholder.form, digits)?,
            other => other.to_string(),
        })
    }

    fn eval_error(&self, directive: &Directive, source: EvalError) -> GenerateError {
        GenerateError::Eval {
            template: self.name.clone(),
            directive: directive.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(source: &str, seed: u64) -> ProblemGenerator {
        ProblemGenerator::new(
            "test",
            source,
            GeneratorOptions {
                seed,
                ..GeneratorOptions::default()
            },
        )
        .unwrap()
    }

    const SUM_TEMPLATE: &str = "@var a = rand(3, 10)\n\
                                @var b = rand(3, 10)\n\
                                @condition a < b\n\
                                @question {a} + {b} = ?\n\
                                @answer {a + b}";

    #[test]
    fn end_to_end_sum_template() {
        let problem = generator(SUM_TEMPLATE, 20).generate().unwrap();

        let a = problem.vars.get("a").unwrap().clone();
        let b = problem.vars.get("b").unwrap().clone();
        assert!(a < b);
        assert_eq!(problem.question, format!("${} + {} = ?$", a, b));
        assert_eq!(problem.answer, format!("${}$", &a + &b));
        assert_eq!(problem.format, AnswerFormat::Number);
    }

    #[test]
    fn same_seed_reproduces_the_problem() {
        let gen = generator(SUM_TEMPLATE, 20);
        assert_eq!(gen.generate().unwrap(), gen.generate().unwrap());
        assert_eq!(
            gen.generate().unwrap(),
            generator(SUM_TEMPLATE, 20).generate().unwrap()
        );
    }

    #[test]
    fn different_seeds_usually_differ() {
        let reference = generator(SUM_TEMPLATE, 0).generate().unwrap();
        let differs = (1..=8u64)
            .any(|seed| generator(SUM_TEMPLATE, seed).generate().unwrap().vars != reference.vars);
        assert!(differs);
    }

    #[test]
    fn always_false_condition_exhausts() {
        let gen = generator("@var a = rand(1, 5)\n@condition a > 5", 3);
        match gen.generate() {
            Err(GenerateError::Exhausted { template }) => assert_eq!(template, "test"),
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn group_directives_are_not_handled() {
        let gen = generator("@var a = 1\n@group some_sub_template", 3);
        match gen.generate() {
            Err(GenerateError::GroupNotHandled { template }) => assert_eq!(template, "test"),
            other => panic!("expected a group error, got {:?}", other),
        }
        // The failure does not depend on surrounding directives.
        let gen = generator("@group some_sub_template", 3);
        assert!(matches!(
            gen.generate(),
            Err(GenerateError::GroupNotHandled { .. })
        ));
    }

    #[test]
    fn evaluation_errors_are_fatal_not_retried() {
        let gen = generator("@var a = b + 1", 3);
        match gen.generate() {
            Err(GenerateError::Eval {
                template,
                directive,
                source: EvalError::UnknownVariable { name },
            }) => {
                assert_eq!(template, "test");
                assert_eq!(directive, "@var a = b + 1");
                assert_eq!(name, "b");
            }
            other => panic!("expected an unknown-variable error, got {:?}", other),
        }
    }

    #[test]
    fn division_by_zero_is_fatal() {
        let gen = generator("@var a = 1 / 0", 3);
        assert!(matches!(
            gen.generate(),
            Err(GenerateError::Eval {
                source: EvalError::DivisionByZero,
                ..
            })
        ));
    }

    #[test]
    fn multiple_question_candidates_choose_deterministically() {
        let source = "@var a = rand(1, 9)\n\
                      @question add {a} and {a}\n\
                      @question what is {a} + {a}?\n\
                      @answer {a + a}";
        let first = generator(source, 11).generate().unwrap();
        let second = generator(source, 11).generate().unwrap();
        assert_eq!(first.question, second.question);

        let a = first.vars.get("a").unwrap();
        let phrasings = [
            format!("$add {} and {}$", a, a),
            format!("$what is {} + {}?$", a, a),
        ];
        assert!(phrasings.contains(&first.question));
    }

    #[test]
    fn answer_formats_are_inferred() {
        let cases: &[(&str, AnswerFormat)] = &[
            ("@answer {3 + 4}", AnswerFormat::Number),
            ("@answer {7 / 2:decimal:1}", AnswerFormat::Decimal),
            ("@answer {1 / 2}", AnswerFormat::Fraction),
            ("@answer {7 / 3}", AnswerFormat::Mixed),
        ];
        for (source, expected) in cases {
            let problem = generator(source, 5).generate().unwrap();
            assert_eq!(problem.format, *expected, "{}", source);
        }
    }

    #[test]
    fn unrecognized_answer_format_is_fatal() {
        let gen = generator("@answer x marks the spot", 5);
        match gen.generate() {
            Err(GenerateError::UnrecognizedAnswerFormat { answer, .. }) => {
                assert_eq!(answer, "$x marks the spot$");
            }
            other => panic!("expected an answer format error, got {:?}", other),
        }
    }

    #[test]
    fn declared_formats_are_passed_through() {
        let gen = ProblemGenerator::new(
            "test",
            "@answer costs {5}",
            GeneratorOptions {
                seed: 5,
                format: AnswerFormat::Money,
                units: Some("dollars".to_owned()),
                rtl: true,
            },
        )
        .unwrap();
        let problem = gen.generate().unwrap();
        assert_eq!(problem.format, AnswerFormat::Money);
        assert_eq!(problem.units.as_deref(), Some("dollars"));
        assert!(problem.rtl);
    }

    #[test]
    fn generate_multiple_yields_distinct_problems() {
        let gen = generator("@var a = rand(1, 1000000)\n@question {a}?\n@answer {a}", 20);
        let problems = gen.generate_multiple(5).unwrap();
        assert_eq!(problems.len(), 5);
        for (i, p) in problems.iter().enumerate() {
            for q in &problems[i + 1..] {
                assert!(p.question != q.question || p.answer != q.answer);
                assert!(p.vars != q.vars);
            }
        }
    }

    #[test]
    fn generate_multiple_accepts_duplicates_once_budget_is_spent() {
        // A constant template can only ever produce one distinct problem.
        let gen = generator("@var a = 3\n@question {a}?\n@answer {a}", 20);
        let problems = gen.generate_multiple(3).unwrap();
        assert_eq!(problems.len(), 3);
        assert!(problems.iter().all(|p| p == &problems[0]));
    }

    #[test]
    fn generate_multiple_is_reproducible() {
        let gen = generator(SUM_TEMPLATE, 20);
        assert_eq!(
            gen.generate_multiple(3).unwrap(),
            gen.generate_multiple(3).unwrap()
        );
    }

    #[test]
    fn calls_do_not_leak_seed_state() {
        let gen = generator(SUM_TEMPLATE, 20);
        let reference = gen.generate().unwrap();
        gen.generate_multiple(4).unwrap();
        assert_eq!(gen.generate().unwrap(), reference);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let gen = generator("\n@var a = 2\n\n@answer {a}\n", 5);
        assert_eq!(gen.generate().unwrap().answer, "$2$");
    }
}
