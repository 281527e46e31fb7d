use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{CaptchaError, Result};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A whole expression: optionally negated integer, then operator/integer pairs.
static FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+([+\-*][0-9]+)*$").expect("format pattern is valid"));

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-*]|[0-9]+").expect("token pattern is valid"));

/// An expression embedded in text; at least one operator.
static EMBEDDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?[0-9]+(?:[+\-*][0-9]+)+").expect("embedded expression pattern is valid")
});

/// Evaluate an arithmetic expression such as `3+4-10` or `-5*2+1`.
///
/// Whitespace is ignored. The expression must be an optionally negated
/// integer followed by any number of `+`, `-` or `*` and another integer.
///
/// # Examples
///
/// ```
/// use assay_captcha::evaluate;
///
/// assert_eq!(evaluate("3+4-10").unwrap(), -3);
/// assert_eq!(evaluate(" 5 * 2 + 1 ").unwrap(), 11);
/// assert_eq!(evaluate("1+2*3").unwrap(), 9);
/// assert!(evaluate("3/4").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<i64> {
    if expression.is_empty() {
        return Err(CaptchaError::Empty("expression"));
    }
    let clean = WHITESPACE.replace_all(expression, "");
    let invalid = || CaptchaError::InvalidFormat(expression.to_string());
    let overflow = || CaptchaError::Overflow(expression.to_string());

    if !FORMAT.is_match(&clean) {
        return Err(invalid());
    }

    let mut tokens = TOKEN.find_iter(&clean).map(|m| m.as_str());
    let negative = clean.starts_with('-');
    if negative {
        tokens.next();
    }

    let first = tokens.next().ok_or_else(invalid)?;
    let first: i64 = first.parse().map_err(|_| overflow())?;
    let mut acc = if negative {
        first.checked_neg().ok_or_else(overflow)?
    } else {
        first
    };

    while let Some(op) = tokens.next() {
        let operand: i64 = tokens
            .next()
            .ok_or_else(invalid)?
            .parse()
            .map_err(|_| overflow())?;
        acc = match op {
            "+" => acc.checked_add(operand),
            "-" => acc.checked_sub(operand),
            "*" => acc.checked_mul(operand),
            _ => return Err(invalid()),
        }
        .ok_or_else(overflow)?;
    }

    Ok(acc)
}

/// Find the leftmost expression with at least one operator in `text`.
///
/// Operands and operators must be adjacent; `3 + 4` is not an expression.
///
/// ```
/// use assay_captcha::find_expression;
///
/// assert_eq!(find_expression("What is 3+4-10 ?"), Some("3+4-10"));
/// assert_eq!(find_expression("What is 42 ?"), None);
/// ```
pub fn find_expression(text: &str) -> Option<&str> {
    EMBEDDED.find(text).map(|m| m.as_str())
}

/// Extract the expression from a CAPTCHA question and evaluate it.
///
/// ```
/// use assay_captcha::solve_question;
///
/// assert_eq!(solve_question("What is 3+4-10 ?").unwrap(), -3);
/// ```
pub fn solve_question(text: &str) -> Result<i64> {
    if text.is_empty() {
        return Err(CaptchaError::Empty("question text"));
    }
    let expression =
        find_expression(text).ok_or_else(|| CaptchaError::NoExpression(text.to_string()))?;
    let answer = evaluate(expression)?;
    debug!(expression, answer, "solved captcha");
    Ok(answer)
}
