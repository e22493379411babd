use super::errors::ParseError;
use super::expression_parser::parse_expression;
use crate::emit::EmitForm;
use crate::evaluator::rewrite_literals;
use crate::grammar::*;

/// Parses a template program: newline-separated directives, blank lines
/// ignored. Every directive payload — expressions and templates alike — is
/// parsed here, exactly once; generation attempts reuse the parsed program.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let mut directives = Vec::new();
    for line in source.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        directives.push(parse_directive(line)?);
    }
    Ok(Program::new(directives))
}

fn parse_directive(line: &str) -> Result<Directive, ParseError> {
    if let Some(payload) = line.strip_prefix("@var ") {
        let (name, expr) = match payload.split_once('=') {
            Some(split) => split,
            None => {
                return Err(ParseError::MalformedDirective {
                    line: line.to_owned(),
                    reason: "expected `name = expression`".to_owned(),
                })
            }
        };
        let name = name.trim();
        if !is_ident(name) {
            return Err(ParseError::MalformedDirective {
                line: line.to_owned(),
                reason: format!(r#""{}" is not a valid variable name"#, name),
            });
        }
        Ok(Directive::Var {
            name: name.to_owned(),
            expr: rewrite_literals(parse_expression(expr.trim())?),
        })
    } else if let Some(payload) = line.strip_prefix("@condition ") {
        Ok(Directive::Condition(rewrite_literals(parse_expression(
            payload.trim(),
        )?)))
    } else if let Some(payload) = line.strip_prefix("@question ") {
        Ok(Directive::Question(parse_template(payload.trim())?))
    } else if let Some(payload) = line.strip_prefix("@answer ") {
        Ok(Directive::Answer(parse_template(payload.trim())?))
    } else if let Some(payload) = line.strip_prefix("@group ") {
        Ok(Directive::Group(payload.trim().to_owned()))
    } else {
        Err(ParseError::UnrecognizedDirective {
            line: line.to_owned(),
        })
    }
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Parses an interpolated text template.
///
/// `{` opens a `{expr[:form[:options]]}` placeholder; `{{` and `}}` escape
/// literal braces. Braces inside a placeholder (set comprehensions, say) nest
/// rather than terminate it.
pub fn parse_template(text: &str) -> Result<Template, ParseError> {
    let err = |reason: &str| ParseError::MalformedTemplate {
        text: text.to_owned(),
        reason: reason.to_owned(),
    };
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                if !literal.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut literal)));
                }
                let mut content = String::new();
                let mut depth = 1;
                loop {
                    match chars.next() {
                        None => return Err(err("unterminated placeholder")),
                        Some('{') => {
                            depth += 1;
                            content.push('{');
                        }
                        Some('}') => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            content.push('}');
                        }
                        Some(c) => content.push(c),
                    }
                }
                segments.push(Segment::Placeholder(parse_placeholder(&content, text)?));
            }
            '}' => return Err(err("stray `}` outside a placeholder")),
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Text(literal));
    }
    Ok(Template::new(segments))
}

fn parse_placeholder(content: &str, template_text: &str) -> Result<Placeholder, ParseError> {
    let pieces: Vec<&str> = content.splitn(3, ':').collect();
    let expr = rewrite_literals(parse_expression(pieces[0].trim())?);
    let form = match pieces.get(1).map(|form| form.trim()) {
        None | Some("") => EmitForm::Auto,
        Some(form) => form.parse::<EmitForm>().map_err(|_| {
            ParseError::MalformedTemplate {
                text: template_text.to_owned(),
                reason: format!(r#""{}" is not an emit form"#, form),
            }
        })?,
    };
    let digits = match pieces.get(2) {
        None => None,
        Some(options) => {
            let digits: String = options.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                None
            } else {
                Some(digits.parse::<u32>().map_err(|_| {
                    ParseError::MalformedTemplate {
                        text: template_text.to_owned(),
                        reason: format!(r#""{}" is not a digit count"#, options),
                    }
                })?)
            }
        }
    };
    Ok(Placeholder { expr, form, digits })
}
