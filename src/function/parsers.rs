//! Per-label parsers used by the factory's registration table

use std::sync::Arc;

use regex::Regex;

use super::factory::FunctionFactory;
use super::node::{ArithmeticOp, Bind, CompareOp, Divide, ExternCall, Function, PromptField};
use super::values::NoValues;
use crate::config::{ConfigError, ConfigNode, ConfigResult};

/// A named parameter child such as `THEN(...)` or `BY(...)`
fn is_named(child: &ConfigNode, name: &str) -> bool {
    !child.is_leaf() && child.name() == name
}

/// Parses every child, requiring at least `min`
fn operands(f: &FunctionFactory<'_>, conf: &ConfigNode, min: usize) -> ConfigResult<Vec<Function>> {
    operands_of(f, conf.name(), conf.children(), min)
}

fn operands_of(
    f: &FunctionFactory<'_>,
    label: &str,
    children: &[ConfigNode],
    min: usize,
) -> ConfigResult<Vec<Function>> {
    if children.len() < min {
        return Err(ConfigError::arity(if min == 1 {
            format!("function {} requires at least one parameter", label)
        } else {
            format!("function {} requires at least {} parameters", label, min)
        }));
    }
    children.iter().map(|c| f.parse(c)).collect()
}

/// Parses exactly `n` children
fn exactly(f: &FunctionFactory<'_>, conf: &ConfigNode, n: usize) -> ConfigResult<Vec<Function>> {
    if conf.count() != n {
        return Err(ConfigError::arity(format!(
            "function {} requires exactly {} parameter{}",
            conf.name(),
            n,
            if n == 1 { "" } else { "s" }
        )));
    }
    operands(f, conf, n)
}

/// Parses and evaluates a constant argument
fn constant(f: &FunctionFactory<'_>, conf: &ConfigNode, label: &str) -> ConfigResult<String> {
    f.parse(conf)?.evaluate(&NoValues).ok().ok_or_else(|| {
        ConfigError::invalid_value(format!(
            "parameter of {} must be a constant expression",
            label
        ))
    })
}

fn compile(pattern: &str, anchored: bool) -> ConfigResult<Regex> {
    let source = if anchored {
        format!("^(?:{})$", pattern)
    } else {
        pattern.to_string()
    };
    Regex::new(&source).map_err(|e| ConfigError::pattern(pattern, e))
}

/// A non-negative integer literal
fn digits(conf: &ConfigNode, label: &str) -> ConfigResult<usize> {
    conf.scalar()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            ConfigError::invalid_value(format!("{} requires a non-negative integer", label))
        })
}

/// Body of THEN/ELSE/ONERROR: nothing is "", one child is itself,
/// several concatenate
fn branch(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut parts = conf
        .children()
        .iter()
        .map(|c| f.parse(c))
        .collect::<ConfigResult<Vec<_>>>()?;
    Ok(match parts.len() {
        0 => Function::Literal(String::new()),
        1 => parts.remove(0),
        _ => Function::Cat(parts),
    })
}

pub(crate) fn and(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::And(operands(f, conf, 1)?))
}

pub(crate) fn or(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::Or(operands(f, conf, 1)?))
}

pub(crate) fn not(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::Not(operands(f, conf, 1)?))
}

pub(crate) fn cat(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::Cat(operands(f, conf, 1)?))
}

pub(crate) fn length(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::Length(operands(f, conf, 1)?))
}

pub(crate) fn if_then_else(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut then = None;
    let mut otherwise = None;
    let mut conditions = Vec::new();

    for child in conf.children() {
        if is_named(child, "THEN") {
            if then.is_some() {
                return Err(ConfigError::duplicate("IF may contain only one THEN"));
            }
            then = Some(branch(f, child)?);
        } else if is_named(child, "ELSE") {
            if otherwise.is_some() {
                return Err(ConfigError::duplicate("IF may contain only one ELSE"));
            }
            otherwise = Some(branch(f, child)?);
        } else {
            conditions.push(child);
        }
    }

    if conditions.len() != 1 {
        return Err(ConfigError::arity(
            "IF requires exactly one condition besides THEN and ELSE",
        ));
    }

    Ok(Function::If {
        condition: Box::new(f.parse(conditions[0])?),
        then: Box::new(then.unwrap_or_else(|| Function::literal(""))),
        otherwise: Box::new(otherwise.unwrap_or_else(|| Function::literal(""))),
    })
}

pub(crate) fn select(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut on_error = None;
    let mut branches = Vec::new();
    for child in conf.children() {
        if is_named(child, "ONERROR") {
            if on_error.is_some() {
                return Err(ConfigError::duplicate("SELECT may contain only one ONERROR"));
            }
            on_error = Some(Box::new(branch(f, child)?));
        } else {
            branches.push(f.parse(child)?);
        }
    }
    if branches.is_empty() {
        return Err(ConfigError::arity(
            "function SELECT requires at least one parameter",
        ));
    }
    Ok(Function::Select { branches, on_error })
}

pub(crate) fn bind(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut function = None;
    let mut bindings: Vec<(String, Function)> = Vec::new();

    for child in conf.children() {
        if is_named(child, "FUNCTION") {
            if function.is_some() {
                return Err(ConfigError::duplicate("BIND may contain only one FUNCTION"));
            }
            let [inner] = child.children() else {
                return Err(ConfigError::arity(
                    "FUNCTION in BIND requires exactly one function or function name",
                ));
            };
            let resolved = if inner.is_leaf() {
                f.functions.get(inner.name()).ok_or_else(|| {
                    ConfigError::invalid_value(format!(
                        "function '{}' is not defined",
                        inner.name()
                    ))
                })?
            } else {
                Arc::new(f.parse(inner)?)
            };
            function = Some(resolved);
        } else if is_named(child, "SET") {
            let [name, value] = child.children() else {
                return Err(ConfigError::arity(
                    "SET requires exactly a name and a value",
                ));
            };
            if !name.is_leaf() {
                return Err(ConfigError::invalid_value("SET name must be a string"));
            }
            if bindings.iter().any(|(n, _)| n == name.name()) {
                return Err(ConfigError::duplicate(format!(
                    "value '{}' is bound more than once",
                    name.name()
                )));
            }
            bindings.push((name.name().to_string(), f.parse(value)?));
        } else {
            return Err(ConfigError::invalid_value(format!(
                "unexpected parameter '{}' in BIND",
                child.name()
            )));
        }
    }

    let function = function.ok_or_else(|| ConfigError::missing_key("BIND", "FUNCTION"))?;

    let mut params: Vec<String> = function
        .parameters()
        .into_iter()
        .filter(|p| !bindings.iter().any(|(n, _)| n == p))
        .collect();
    for (_, value) in &bindings {
        for p in value.parameters() {
            if !params.contains(&p) {
                params.push(p);
            }
        }
    }

    Ok(Function::Bind(Box::new(Bind {
        function,
        bindings,
        params,
    })))
}

pub(crate) fn value(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let [name] = conf.children() else {
        return Err(ConfigError::arity("function VALUE requires exactly 1 parameter"));
    };
    Ok(Function::Value(constant(f, name, "VALUE")?))
}

pub(crate) fn match_regex(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let [input, pattern] = conf.children() else {
        return Err(ConfigError::arity("function MATCH requires exactly 2 parameters"));
    };
    let pattern = constant(f, pattern, "MATCH")?;
    Ok(Function::Match {
        input: Box::new(f.parse(input)?),
        pattern: compile(&pattern, true)?,
    })
}

pub(crate) fn replace(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let [input, pattern, replacement] = conf.children() else {
        return Err(ConfigError::arity("function REPLACE requires exactly 3 parameters"));
    };
    let pattern = constant(f, pattern, "REPLACE")?;
    Ok(Function::Replace {
        input: Box::new(f.parse(input)?),
        pattern: compile(&pattern, false)?,
        replacement: Box::new(f.parse(replacement)?),
    })
}

pub(crate) fn split(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let [input, pattern, index] = conf.children() else {
        return Err(ConfigError::arity("function SPLIT requires exactly 3 parameters"));
    };
    let pattern = constant(f, pattern, "SPLIT")?;
    Ok(Function::Split {
        input: Box::new(f.parse(input)?),
        pattern: compile(&pattern, false)?,
        index: digits(index, "the SPLIT index")?,
    })
}

pub(crate) fn divide(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let label = conf.name();
    let mut dividend = None;
    let mut divisor = None;
    let mut min_digits = None;
    let mut max_digits = None;

    for child in conf.children() {
        if is_named(child, "BY") {
            if divisor.is_some() {
                return Err(ConfigError::duplicate(format!("{} may contain only one BY", label)));
            }
            let [by] = child.children() else {
                return Err(ConfigError::arity("BY requires exactly one function"));
            };
            divisor = Some(f.parse(by)?);
        } else if is_named(child, "MIN") {
            if min_digits.is_some() {
                return Err(ConfigError::duplicate(format!("{} may contain only one MIN", label)));
            }
            min_digits = Some(digits(child, "MIN")?);
        } else if is_named(child, "MAX") {
            if max_digits.is_some() {
                return Err(ConfigError::duplicate(format!("{} may contain only one MAX", label)));
            }
            max_digits = Some(digits(child, "MAX")?);
        } else {
            if dividend.is_some() {
                return Err(ConfigError::arity(format!(
                    "{} takes a single dividend; the divisor goes in BY",
                    label
                )));
            }
            dividend = Some(f.parse(child)?);
        }
    }

    let dividend = dividend.ok_or_else(|| {
        ConfigError::arity(format!("{} requires a dividend", label))
    })?;
    if divisor.is_some() && max_digits.is_none() {
        return Err(ConfigError::missing_key(label, "MAX"));
    }
    if let (Some(min), Some(max)) = (min_digits, max_digits) {
        if min > max {
            return Err(ConfigError::invalid_value(format!(
                "MIN of {} must not exceed MAX",
                label
            )));
        }
    }
    let max_digits = max_digits
        .map(|m| {
            u32::try_from(m).map_err(|_| ConfigError::invalid_value("MAX is too large"))
        })
        .transpose()?;

    Ok(Function::Divide(Box::new(Divide {
        dividend,
        divisor,
        min_digits: min_digits.unwrap_or(0),
        max_digits,
        format: f.format,
    })))
}

fn arithmetic(f: &FunctionFactory<'_>, conf: &ConfigNode, op: ArithmeticOp) -> ConfigResult<Function> {
    Ok(Function::Arithmetic {
        op,
        operands: operands(f, conf, 1)?,
        format: f.format,
    })
}

pub(crate) fn sum(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Sum)
}

pub(crate) fn minus(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Minus)
}

pub(crate) fn diff(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Diff)
}

pub(crate) fn product(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Product)
}

pub(crate) fn abs(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Abs)
}

pub(crate) fn sign(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    arithmetic(f, conf, ArithmeticOp::Sign)
}

fn comparison(f: &FunctionFactory<'_>, conf: &ConfigNode, op: CompareOp) -> ConfigResult<Function> {
    let mut margin = None;
    let mut rest = Vec::new();
    for child in conf.children() {
        if is_named(child, "MARGIN") {
            if margin.is_some() {
                return Err(ConfigError::duplicate("only one MARGIN is allowed"));
            }
            let [m] = child.children() else {
                return Err(ConfigError::arity("MARGIN requires exactly one function"));
            };
            margin = Some(Box::new(f.parse(m)?));
        } else {
            rest.push(child.clone());
        }
    }
    Ok(Function::Compare {
        op,
        operands: operands_of(f, conf.name(), &rest, 2)?,
        margin,
        format: f.format,
    })
}

pub(crate) fn lt(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    comparison(f, conf, CompareOp::Lt)
}

pub(crate) fn le(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    comparison(f, conf, CompareOp::Le)
}

pub(crate) fn gt(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    comparison(f, conf, CompareOp::Gt)
}

pub(crate) fn ge(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    comparison(f, conf, CompareOp::Ge)
}

pub(crate) fn numcmp(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    comparison(f, conf, CompareOp::NumCmp)
}

pub(crate) fn strcmp(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    Ok(Function::StrCmp(operands(f, conf, 2)?))
}

pub(crate) fn is_error(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut inner = exactly(f, conf, 1)?;
    Ok(Function::IsError {
        inner: Box::new(inner.remove(0)),
        strict: true,
    })
}

pub(crate) fn is_error_string(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let mut inner = exactly(f, conf, 1)?;
    Ok(Function::IsError {
        inner: Box::new(inner.remove(0)),
        strict: false,
    })
}

pub(crate) fn external(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let name = conf.require("URL", "EXTERN")?;
    let params = conf
        .child("PARAMS")
        .filter(|p| !p.is_leaf())
        .map(|p| {
            p.children()
                .iter()
                .map(|c| {
                    if c.is_leaf() {
                        Ok(c.name().to_string())
                    } else {
                        Err(ConfigError::invalid_value(
                            "PARAMS of EXTERN must list parameter names",
                        ))
                    }
                })
                .collect::<ConfigResult<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let entry = f.externs.get(name).ok_or_else(|| {
        ConfigError::unknown_callable(format!("no external callable named '{}'", name))
    })?;
    if entry.arity() != params.len() {
        return Err(ConfigError::unknown_callable(format!(
            "external callable '{}' takes {} parameters but PARAMS declares {}",
            name,
            entry.arity(),
            params.len()
        )));
    }

    Ok(Function::Extern(ExternCall {
        name: name.to_string(),
        params,
        entry,
    }))
}

pub(crate) fn prompt(f: &FunctionFactory<'_>, conf: &ConfigNode) -> ConfigResult<Function> {
    let [prompt, field] = conf.children() else {
        return Err(ConfigError::arity(format!(
            "function {} requires exactly 2 parameters",
            conf.name()
        )));
    };
    if !prompt.is_leaf() || !field.is_leaf() {
        return Err(ConfigError::invalid_value(format!(
            "parameters of {} must be strings",
            conf.name()
        )));
    }

    let template = f.prompts.get(prompt.name()).ok_or_else(|| {
        ConfigError::unknown_prompt(format!("prompt '{}' is not defined", prompt.name()))
    })?;
    if !template.schema().iter().any(|s| s == field.name()) {
        return Err(ConfigError::unknown_prompt(format!(
            "prompt '{}' has no field '{}'",
            prompt.name(),
            field.name()
        )));
    }

    Ok(Function::Prompt(PromptField {
        prompt: prompt.name().to_string(),
        field: field.name().to_string(),
        template,
    }))
}
