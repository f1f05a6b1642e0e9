//! Function graph nodes and their evaluation
//!
//! [`Function`] is a closed set of node kinds. Evaluation never fails:
//! bad runtime data becomes [`Outcome::Error`], composites propagate it,
//! and its boolean reading is false.

use std::cell::Cell;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use regex::Regex;
use rust_decimal::Decimal;

use super::external::ExternEntry;
use super::number::NumberFormat;
use super::outcome::Outcome;
use super::prompt::{Prompt, PromptContext};
use super::values::Values;
use crate::observability::{log_event_with_fields, Event};

/// Aggregate numeric operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    /// Sum of all operands
    Sum,
    /// Negated sum
    Minus,
    /// First operand minus the rest
    Diff,
    /// Product of all operands
    Product,
    /// Absolute value of the sum
    Abs,
    /// Signum of the sum: "-1", "0" or "1"
    Sign,
}

/// Numeric comparisons of the first operand against the rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    /// Reports the direction instead of a truth value
    NumCmp,
}

impl CompareOp {
    /// Per-operand results (first.cmp(other)) that make the comparison false
    fn rejects(&self, ord: i32) -> bool {
        match self {
            CompareOp::Lt => ord == 0 || ord == 1,
            CompareOp::Le => ord == 1,
            CompareOp::Gt => ord == 0 || ord == -1,
            CompareOp::Ge => ord == -1,
            CompareOp::NumCmp => false,
        }
    }
}

/// DIVIDE/FORMAT node
#[derive(Debug, Clone)]
pub struct Divide {
    pub(crate) dividend: Function,
    pub(crate) divisor: Option<Function>,
    pub(crate) min_digits: usize,
    pub(crate) max_digits: Option<u32>,
    pub(crate) format: NumberFormat,
}

/// BIND node
#[derive(Debug, Clone)]
pub struct Bind {
    pub(crate) function: Arc<Function>,
    pub(crate) bindings: Vec<(String, Function)>,
    pub(crate) params: Vec<String>,
}

/// EXTERN node
#[derive(Clone)]
pub struct ExternCall {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) entry: ExternEntry,
}

impl fmt::Debug for ExternCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternCall")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Prompt-bound node
#[derive(Clone)]
pub struct PromptField {
    pub(crate) prompt: String,
    pub(crate) field: String,
    pub(crate) template: Arc<dyn Prompt>,
}

impl fmt::Debug for PromptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptField")
            .field("prompt", &self.prompt)
            .field("field", &self.field)
            .finish()
    }
}

/// A node of a function graph
#[derive(Debug, Clone)]
pub enum Function {
    /// A constant string
    Literal(String),
    /// Lookup of a named value; the sentinel if the value is missing
    Value(String),
    And(Vec<Function>),
    Or(Vec<Function>),
    /// "true" unless every operand is true
    Not(Vec<Function>),
    Cat(Vec<Function>),
    /// Character count of the concatenation
    Length(Vec<Function>),
    If {
        condition: Box<Function>,
        then: Box<Function>,
        otherwise: Box<Function>,
    },
    /// First non-empty branch; a sentinel switches to `on_error`
    Select {
        branches: Vec<Function>,
        on_error: Option<Box<Function>>,
    },
    Bind(Box<Bind>),
    /// Full match of the input against a pattern
    Match {
        input: Box<Function>,
        pattern: Regex,
    },
    Replace {
        input: Box<Function>,
        pattern: Regex,
        replacement: Box<Function>,
    },
    Split {
        input: Box<Function>,
        pattern: Regex,
        index: usize,
    },
    Divide(Box<Divide>),
    Arithmetic {
        op: ArithmeticOp,
        operands: Vec<Function>,
        format: NumberFormat,
    },
    Compare {
        op: CompareOp,
        operands: Vec<Function>,
        margin: Option<Box<Function>>,
        format: NumberFormat,
    },
    /// Lexicographic comparison of the first operand against the rest
    StrCmp(Vec<Function>),
    /// `strict`: only the sentinel itself counts; otherwise its text too
    IsError {
        inner: Box<Function>,
        strict: bool,
    },
    Extern(ExternCall),
    Prompt(PromptField),
    AlwaysTrue,
}

impl Function {
    pub fn literal(s: impl Into<String>) -> Self {
        Function::Literal(s.into())
    }

    pub fn value(name: impl Into<String>) -> Self {
        Function::Value(name.into())
    }

    pub fn always_true() -> Self {
        Function::AlwaysTrue
    }

    /// Evaluates without a prompt session
    pub fn evaluate(&self, values: &dyn Values) -> Outcome {
        self.eval(values, None)
    }

    /// Evaluates with the caller's prompt session
    pub fn evaluate_in(&self, values: &dyn Values, session: &PromptContext) -> Outcome {
        self.eval(values, Some(session))
    }

    /// String result; the sentinel reads as its text
    pub fn string(&self, values: &dyn Values) -> String {
        self.evaluate(values).into_string()
    }

    /// Boolean result; the sentinel is false
    pub fn boolean(&self, values: &dyn Values) -> bool {
        self.evaluate(values).truthy()
    }

    pub fn boolean_in(&self, values: &dyn Values, session: &PromptContext) -> bool {
        self.evaluate_in(values, session).truthy()
    }

    /// Free value names this graph still requires, in first-use order
    pub fn parameters(&self) -> Vec<String> {
        let mut params = Vec::new();
        self.collect_params(&mut params);
        params
    }

    fn collect_params(&self, acc: &mut Vec<String>) {
        match self {
            Function::Literal(_) | Function::AlwaysTrue | Function::Prompt(_) => {}
            Function::Value(name) => push_unique(acc, name),
            Function::And(fs)
            | Function::Or(fs)
            | Function::Not(fs)
            | Function::Cat(fs)
            | Function::Length(fs)
            | Function::StrCmp(fs)
            | Function::Arithmetic { operands: fs, .. } => {
                fs.iter().for_each(|f| f.collect_params(acc));
            }
            Function::If {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_params(acc);
                then.collect_params(acc);
                otherwise.collect_params(acc);
            }
            Function::Select { branches, on_error } => {
                branches.iter().for_each(|f| f.collect_params(acc));
                if let Some(f) = on_error {
                    f.collect_params(acc);
                }
            }
            Function::Bind(bind) => bind.params.iter().for_each(|p| push_unique(acc, p)),
            Function::Match { input, .. } | Function::Split { input, .. } => {
                input.collect_params(acc);
            }
            Function::Replace {
                input, replacement, ..
            } => {
                input.collect_params(acc);
                replacement.collect_params(acc);
            }
            Function::Divide(div) => {
                div.dividend.collect_params(acc);
                if let Some(f) = &div.divisor {
                    f.collect_params(acc);
                }
            }
            Function::Compare {
                operands, margin, ..
            } => {
                operands.iter().for_each(|f| f.collect_params(acc));
                if let Some(f) = margin {
                    f.collect_params(acc);
                }
            }
            Function::IsError { inner, .. } => inner.collect_params(acc),
            Function::Extern(call) => call.params.iter().for_each(|p| push_unique(acc, p)),
        }
    }

    pub(crate) fn eval(&self, values: &dyn Values, session: Option<&PromptContext>) -> Outcome {
        match self {
            Function::Literal(s) => Outcome::value(s.as_str()),
            Function::AlwaysTrue => Outcome::from_bool(true),
            Function::Value(name) => {
                if values.has_value(name) {
                    Outcome::Value(values.get_string(name))
                } else {
                    Outcome::Error
                }
            }
            Function::And(fs) => {
                for f in fs {
                    let out = f.eval(values, session);
                    if out.is_error() {
                        return Outcome::Error;
                    }
                    if !out.truthy() {
                        return Outcome::from_bool(false);
                    }
                }
                Outcome::from_bool(true)
            }
            Function::Or(fs) => {
                for f in fs {
                    let out = f.eval(values, session);
                    if out.is_error() {
                        return Outcome::Error;
                    }
                    if out.truthy() {
                        return Outcome::from_bool(true);
                    }
                }
                Outcome::from_bool(false)
            }
            Function::Not(fs) => {
                for f in fs {
                    let out = f.eval(values, session);
                    if out.is_error() {
                        return Outcome::Error;
                    }
                    if !out.truthy() {
                        return Outcome::from_bool(true);
                    }
                }
                Outcome::from_bool(false)
            }
            Function::Cat(fs) => concat(fs, values, session),
            Function::Length(fs) => match concat(fs, values, session) {
                Outcome::Value(s) => Outcome::Value(s.chars().count().to_string()),
                Outcome::Error => Outcome::Error,
            },
            Function::If {
                condition,
                then,
                otherwise,
            } => {
                let cond = condition.eval(values, session);
                if cond.is_error() {
                    Outcome::Error
                } else if cond.truthy() {
                    then.eval(values, session)
                } else {
                    otherwise.eval(values, session)
                }
            }
            Function::Select { branches, on_error } => {
                let mut result = Outcome::Value(String::new());
                for f in branches {
                    match f.eval(values, session) {
                        Outcome::Error => {
                            return match on_error {
                                Some(handler) => handler.eval(values, session),
                                None => Outcome::Error,
                            };
                        }
                        Outcome::Value(s) => {
                            let done = !s.is_empty();
                            result = Outcome::Value(s);
                            if done {
                                break;
                            }
                        }
                    }
                }
                result
            }
            Function::Bind(bind) => bind.eval(values, session),
            Function::Match { input, pattern } => match input.eval(values, session) {
                Outcome::Value(s) => Outcome::from_bool(pattern.is_match(&s)),
                Outcome::Error => Outcome::Error,
            },
            Function::Replace {
                input,
                pattern,
                replacement,
            } => {
                let Outcome::Value(s) = input.eval(values, session) else {
                    return Outcome::Error;
                };
                let Outcome::Value(rep) = replacement.eval(values, session) else {
                    return Outcome::Error;
                };
                Outcome::Value(pattern.replace_all(&s, rep.as_str()).into_owned())
            }
            Function::Split {
                input,
                pattern,
                index,
            } => {
                let Outcome::Value(s) = input.eval(values, session) else {
                    return Outcome::Error;
                };
                let mut parts: Vec<&str> = pattern.split(&s).collect();
                while parts.len() > 1 && parts.last().is_some_and(|p| p.is_empty()) {
                    parts.pop();
                }
                Outcome::Value(parts.get(*index).map(|p| p.to_string()).unwrap_or_default())
            }
            Function::Divide(div) => div.eval(values, session),
            Function::Arithmetic {
                op,
                operands,
                format,
            } => arithmetic(*op, operands, format, values, session),
            Function::Compare {
                op,
                operands,
                margin,
                format,
            } => compare(*op, operands, margin.as_deref(), format, values, session),
            Function::StrCmp(fs) => strcmp(fs, values, session),
            Function::IsError { inner, strict } => {
                let out = inner.eval(values, session);
                let is_error = match &out {
                    Outcome::Error => true,
                    Outcome::Value(s) => !strict && s == super::outcome::ERROR_TEXT,
                };
                Outcome::from_bool(is_error)
            }
            Function::Extern(call) => call.eval(values),
            Function::Prompt(field) => field.eval(session),
        }
    }
}

fn push_unique(acc: &mut Vec<String>, name: &str) {
    if !acc.iter().any(|p| p == name) {
        acc.push(name.to_string());
    }
}

fn concat(fs: &[Function], values: &dyn Values, session: Option<&PromptContext>) -> Outcome {
    let mut out = String::new();
    for f in fs {
        match f.eval(values, session) {
            Outcome::Value(s) => out.push_str(&s),
            Outcome::Error => return Outcome::Error,
        }
    }
    Outcome::Value(out)
}

/// Evaluates each operand as a number, stopping at the first failure
fn numbers<'f>(
    fs: &'f [Function],
    format: &'f NumberFormat,
    values: &'f dyn Values,
    session: Option<&'f PromptContext>,
) -> impl Iterator<Item = Option<Decimal>> + 'f {
    fs.iter().map(move |f| match f.eval(values, session) {
        Outcome::Value(s) => format.parse(&s),
        Outcome::Error => None,
    })
}

fn arithmetic(
    op: ArithmeticOp,
    fs: &[Function],
    format: &NumberFormat,
    values: &dyn Values,
    session: Option<&PromptContext>,
) -> Outcome {
    let mut acc: Option<Decimal> = None;
    for num in numbers(fs, format, values, session) {
        let Some(num) = num else {
            return Outcome::Error;
        };
        let next = match (acc, op) {
            (None, _) => Some(num),
            (Some(a), ArithmeticOp::Diff) => a.checked_sub(num),
            (Some(a), ArithmeticOp::Product) => a.checked_mul(num),
            (Some(a), _) => a.checked_add(num),
        };
        match next {
            Some(n) => acc = Some(n),
            None => return Outcome::Error,
        }
    }
    let Some(total) = acc else {
        return Outcome::Error;
    };

    match op {
        ArithmeticOp::Sum | ArithmeticOp::Diff | ArithmeticOp::Product => {
            Outcome::Value(format.format(total))
        }
        ArithmeticOp::Minus => Outcome::Value(format.format(-total)),
        ArithmeticOp::Abs => Outcome::Value(format.format(total.abs())),
        ArithmeticOp::Sign => {
            let sign = if total.is_zero() {
                "0"
            } else if total.is_sign_negative() {
                "-1"
            } else {
                "1"
            };
            Outcome::value(sign)
        }
    }
}

fn compare(
    op: CompareOp,
    fs: &[Function],
    margin: Option<&Function>,
    format: &NumberFormat,
    values: &dyn Values,
    session: Option<&PromptContext>,
) -> Outcome {
    let margin = match margin {
        None => Decimal::ZERO,
        Some(f) => match f.eval(values, session) {
            Outcome::Value(s) => match format.parse(&s) {
                Some(m) => m.abs(),
                None => return Outcome::Error,
            },
            Outcome::Error => return Outcome::Error,
        },
    };

    let mut first: Option<Decimal> = None;
    let mut direction: i32 = 0;
    for num in numbers(fs, format, values, session) {
        let Some(num) = num else {
            return Outcome::Error;
        };
        let Some(base) = first else {
            first = Some(num);
            continue;
        };

        let within = base - margin <= num && num <= base + margin;
        let ord = if within {
            0
        } else {
            ordering_sign(base.cmp(&num))
        };

        if op.rejects(ord) {
            return Outcome::from_bool(false);
        }
        if ord * direction < 0 {
            return Outcome::value("0");
        }
        direction += ord;
    }

    if op != CompareOp::NumCmp {
        return Outcome::from_bool(true);
    }
    match direction.signum() {
        1 => Outcome::value("1"),
        -1 => Outcome::value("-1"),
        _ => Outcome::from_bool(true),
    }
}

fn strcmp(fs: &[Function], values: &dyn Values, session: Option<&PromptContext>) -> Outcome {
    let mut iter = fs.iter();
    let Some(head) = iter.next() else {
        return Outcome::Error;
    };
    let Outcome::Value(base) = head.eval(values, session) else {
        return Outcome::Error;
    };

    let mut direction: i32 = 0;
    for f in iter {
        let Outcome::Value(s) = f.eval(values, session) else {
            return Outcome::Error;
        };
        let ord = ordering_sign(base.as_str().cmp(s.as_str()));
        if ord * direction < 0 {
            return Outcome::value("0");
        }
        direction += ord;
    }

    match direction.signum() {
        -1 => Outcome::value("-1"),
        1 => Outcome::value("1"),
        _ => Outcome::from_bool(true),
    }
}

fn ordering_sign(ord: Ordering) -> i32 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

impl Divide {
    fn eval(&self, values: &dyn Values, session: Option<&PromptContext>) -> Outcome {
        let Outcome::Value(dividend) = self.dividend.eval(values, session) else {
            return Outcome::Error;
        };
        let divisor = match &self.divisor {
            Some(f) => match f.eval(values, session) {
                Outcome::Value(s) => s,
                Outcome::Error => return Outcome::Error,
            },
            None => "1".to_string(),
        };

        let (Some(dividend), Some(divisor)) =
            (self.format.parse(&dividend), self.format.parse(&divisor))
        else {
            return Outcome::Error;
        };
        match dividend.checked_div(divisor) {
            Some(quotient) => Outcome::Value(self.format.format_scaled(
                quotient,
                self.min_digits,
                self.max_digits,
            )),
            None => Outcome::Error,
        }
    }
}

/// Values view that answers bound names from SET functions
struct BoundValues<'v> {
    outer: &'v dyn Values,
    bindings: &'v [(String, Function)],
    session: Option<&'v PromptContext>,
    failed: Cell<bool>,
}

impl BoundValues<'_> {
    fn binding(&self, id: &str) -> Option<&Function> {
        self.bindings
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, f)| f)
    }
}

impl Values for BoundValues<'_> {
    fn has_value(&self, id: &str) -> bool {
        self.binding(id).is_some() || self.outer.has_value(id)
    }

    fn get_string(&self, id: &str) -> String {
        match self.binding(id) {
            Some(f) => match f.eval(self.outer, self.session) {
                Outcome::Value(s) => s,
                Outcome::Error => {
                    self.failed.set(true);
                    String::new()
                }
            },
            None => self.outer.get_string(id),
        }
    }
}

impl Bind {
    fn eval(&self, values: &dyn Values, session: Option<&PromptContext>) -> Outcome {
        let bound = BoundValues {
            outer: values,
            bindings: &self.bindings,
            session,
            failed: Cell::new(false),
        };
        let out = self.function.eval(&bound, session);
        if bound.failed.get() {
            Outcome::Error
        } else {
            out
        }
    }
}

impl ExternCall {
    fn eval(&self, values: &dyn Values) -> Outcome {
        let args: Vec<String> = self.params.iter().map(|p| values.get_string(p)).collect();
        match self.entry.call(&args) {
            Ok(s) => Outcome::Value(s),
            Err(e) => {
                let error = e.to_string();
                log_event_with_fields(
                    Event::ExternCallFailed,
                    &[("callable", self.name.as_str()), ("error", error.as_str())],
                );
                Outcome::Error
            }
        }
    }
}

impl PromptField {
    fn eval(&self, session: Option<&PromptContext>) -> Outcome {
        let Some(session) = session else {
            return Outcome::Error;
        };
        session
            .instance(&self.prompt, self.template.as_ref())
            .and_then(|instance| instance.data(&self.field))
            .map_or(Outcome::Error, Outcome::Value)
    }
}
