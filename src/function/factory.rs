//! Builds function graphs from configuration trees
//!
//! A leaf becomes a string literal. Any other node is looked up by its
//! label in the registration table; unknown labels fail through
//! [`ConfigError::unknown_label`].

use std::sync::{Arc, OnceLock};

use super::external::ExternRegistry;
use super::library::FunctionLibrary;
use super::node::Function;
use super::number::NumberFormat;
use super::parsers;
use super::prompt::PromptLibrary;
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::observability::{log_event_with_fields, Event};

/// Parser for one node label
pub(crate) type ParseFn = fn(&FunctionFactory<'_>, &ConfigNode) -> ConfigResult<Function>;

/// Label → parser registration table
const PARSERS: &[(&str, ParseFn)] = &[
    ("AND", parsers::and),
    ("OR", parsers::or),
    ("NOT", parsers::not),
    ("CAT", parsers::cat),
    ("THEN", parsers::cat),
    ("ELSE", parsers::cat),
    ("LENGTH", parsers::length),
    ("IF", parsers::if_then_else),
    ("SELECT", parsers::select),
    ("BIND", parsers::bind),
    ("VALUE", parsers::value),
    ("MATCH", parsers::match_regex),
    ("REPLACE", parsers::replace),
    ("SPLIT", parsers::split),
    ("DIVIDE", parsers::divide),
    ("FORMAT", parsers::divide),
    ("SUM", parsers::sum),
    ("MINUS", parsers::minus),
    ("DIFF", parsers::diff),
    ("PRODUCT", parsers::product),
    ("ABS", parsers::abs),
    ("SIGN", parsers::sign),
    ("LT", parsers::lt),
    ("LE", parsers::le),
    ("GT", parsers::gt),
    ("GE", parsers::ge),
    ("NUMCMP", parsers::numcmp),
    ("STRCMP", parsers::strcmp),
    ("ISERROR", parsers::is_error),
    ("ISERRORSTRING", parsers::is_error_string),
    ("EXTERN", parsers::external),
    ("DIALOG", parsers::prompt),
];

/// Labels the factory understands
pub fn labels() -> impl Iterator<Item = &'static str> {
    PARSERS.iter().map(|(label, _)| *label)
}

fn empty_prompts() -> &'static PromptLibrary {
    static EMPTY: OnceLock<PromptLibrary> = OnceLock::new();
    EMPTY.get_or_init(PromptLibrary::new)
}

fn empty_externs() -> &'static ExternRegistry {
    static EMPTY: OnceLock<ExternRegistry> = OnceLock::new();
    EMPTY.get_or_init(ExternRegistry::new)
}

/// Parses configuration trees into function graphs
///
/// Borrows the libraries that named references resolve against.
#[derive(Debug, Clone, Copy)]
pub struct FunctionFactory<'a> {
    pub(crate) functions: &'a FunctionLibrary,
    pub(crate) prompts: &'a PromptLibrary,
    pub(crate) externs: &'a ExternRegistry,
    pub(crate) format: NumberFormat,
}

impl<'a> FunctionFactory<'a> {
    /// A factory resolving names against `functions`, with no prompts
    /// and no external callables
    pub fn new(functions: &'a FunctionLibrary) -> Self {
        Self {
            functions,
            prompts: empty_prompts(),
            externs: empty_externs(),
            format: NumberFormat::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: &'a PromptLibrary) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_externs(mut self, externs: &'a ExternRegistry) -> Self {
        self.externs = externs;
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    /// Parses one node
    pub fn parse(&self, conf: &ConfigNode) -> ConfigResult<Function> {
        if conf.is_leaf() {
            return Ok(Function::Literal(conf.name().to_string()));
        }

        let label = conf.name();
        if label.is_empty() {
            return Err(ConfigError::invalid_value(
                "opening bracket without preceding function name",
            ));
        }

        match PARSERS.iter().find(|(l, _)| *l == label) {
            Some((_, parse)) => parse(self, conf),
            None => Err(ConfigError::unknown_label(label)),
        }
    }

    /// Parses the children of `conf`: none → `None`, one → that function,
    /// several → their AND
    pub fn parse_children(&self, conf: &ConfigNode) -> ConfigResult<Option<Function>> {
        let mut functions = conf
            .children()
            .iter()
            .map(|c| self.parse(c))
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(match functions.len() {
            0 => None,
            1 => functions.pop(),
            _ => Some(Function::And(functions)),
        })
    }

    /// Like [`parse_children`](Self::parse_children) over all grandchildren
    pub fn parse_grandchildren(&self, conf: &ConfigNode) -> ConfigResult<Option<Function>> {
        let mut functions = Vec::new();
        for child in conf.children() {
            for grandchild in child.children() {
                functions.push(self.parse(grandchild)?);
            }
        }
        Ok(match functions.len() {
            0 => None,
            1 => functions.pop(),
            _ => Some(Function::And(functions)),
        })
    }

    /// Builds a library from a section whose children are named
    /// definitions. Later definitions may use earlier ones and anything
    /// in `base`. Malformed definitions are logged and skipped.
    pub fn parse_functions(
        &self,
        section: &ConfigNode,
        base: Option<Arc<FunctionLibrary>>,
    ) -> FunctionLibrary {
        let mut library = match base {
            Some(base) => FunctionLibrary::with_base(base),
            None => FunctionLibrary::new(),
        };

        for definition in section.children() {
            let name = definition.name();
            let parsed = FunctionFactory {
                functions: &library,
                ..*self
            }
            .parse_children(definition);

            match parsed {
                Ok(Some(function)) => library.add(name, function),
                Ok(None) => reject(name, "empty function definition"),
                Err(e) => reject(name, &e.to_string()),
            }
        }
        library
    }

    /// Builds pseudo-column definitions from a section whose children are
    /// named definitions, in order. Malformed definitions are logged and
    /// skipped.
    pub fn parse_trafos(&self, section: &ConfigNode) -> Vec<(String, Function)> {
        let mut trafos: Vec<(String, Function)> = Vec::new();
        for definition in section.children() {
            let name = definition.name();
            match self.parse_children(definition) {
                Ok(Some(function)) => {
                    trafos.retain(|(existing, _)| existing != name);
                    trafos.push((name.to_string(), function));
                }
                Ok(None) => reject(name, "empty function definition"),
                Err(e) => reject(name, &e.to_string()),
            }
        }
        trafos
    }
}

fn reject(name: &str, reason: &str) {
    log_event_with_fields(
        Event::FunctionDefinitionRejected,
        &[("function", name), ("reason", reason)],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigErrorCode;
    use crate::function::prompt::testing::ScriptedPrompt;
    use crate::function::{NoValues, PromptContext, SimpleValues};

    fn node(json: &str) -> ConfigNode {
        ConfigNode::from_json(json).unwrap()
    }

    fn parse(json: &str) -> ConfigResult<Function> {
        let lib = FunctionLibrary::new();
        FunctionFactory::new(&lib).parse(&node(json))
    }

    fn eval(json: &str, pairs: &[(&str, &str)]) -> String {
        let values: SimpleValues = pairs.iter().copied().collect();
        parse(json).unwrap().string(&values)
    }

    #[test]
    fn test_leaf_is_literal() {
        let f = parse(r#""hello""#).unwrap();
        assert_eq!(f.string(&NoValues), "hello");
        assert!(f.parameters().is_empty());
    }

    #[test]
    fn test_unknown_label() {
        let err = parse(r#"{"FROB": ["x"]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::UnknownLabel);
    }

    #[test]
    fn test_empty_label() {
        let err = parse(r#"{"": ["x"]}"#).unwrap_err();
        assert!(err.message().contains("function name"));
    }

    #[test]
    fn test_and_true_true() {
        let f = parse(r#"{"AND": ["true", "true"]}"#).unwrap();
        assert!(f.boolean(&NoValues));
        assert_eq!(f.string(&NoValues), "true");
    }

    #[test]
    fn test_childless_node_is_literal() {
        // zero children makes a leaf, so "AND()" is the string "AND"
        let lib = FunctionLibrary::new();
        let f = FunctionFactory::new(&lib)
            .parse(&ConfigNode::new("AND", vec![]))
            .unwrap();
        assert_eq!(f.string(&NoValues), "AND");
    }

    #[test]
    fn test_select_requires_a_branch() {
        let err = parse(r#"{"SELECT": [{"ONERROR": ["x"]}]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_if_then_else() {
        let json = r#"{"IF": [{"STRCMP": [{"VALUE": ["a"]}, "x"]}, {"THEN": ["yes"]}, {"ELSE": ["no"]}]}"#;
        assert_eq!(eval(json, &[("a", "x")]), "yes");
        assert_eq!(eval(json, &[("a", "y")]), "no");
        assert!(parse(json).unwrap().evaluate(&NoValues).is_error());
    }

    #[test]
    fn test_if_defaults_to_empty_branches() {
        assert_eq!(eval(r#"{"IF": ["false", {"THEN": ["x"]}]}"#, &[]), "");
        assert_eq!(eval(r#"{"IF": ["true", {"ELSE": ["x"]}]}"#, &[]), "");
    }

    #[test]
    fn test_if_rejects_repeated_then_and_missing_condition() {
        let err = parse(r#"{"IF": ["true", {"THEN": ["a"]}, {"THEN": ["b"]}]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Duplicate);
        let err = parse(r#"{"IF": [{"THEN": ["a"]}]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Arity);
        let err = parse(r#"{"IF": ["true", "false", {"THEN": ["a"]}]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_select_with_if_branches() {
        let json = r#"{"SELECT": [
            {"IF": [{"MATCH": [{"VALUE": ["n"]}, "[0-9]+"]}, {"THEN": ["number"]}]},
            {"IF": [{"MATCH": [{"VALUE": ["n"]}, "[a-z]+"]}, {"THEN": ["word"]}]},
            {"ELSE": ["other"]},
            {"ONERROR": ["broken"]}
        ]}"#;
        assert_eq!(eval(json, &[("n", "42")]), "number");
        assert_eq!(eval(json, &[("n", "abc")]), "word");
        assert_eq!(eval(json, &[("n", "a1")]), "other");
        assert_eq!(eval(json, &[]), "broken");
    }

    #[test]
    fn test_value_parameters() {
        let f = parse(r#"{"CAT": [{"VALUE": ["first"]}, " ", {"VALUE": ["last"]}, {"VALUE": ["first"]}]}"#).unwrap();
        assert_eq!(f.parameters(), vec!["first", "last"]);
    }

    #[test]
    fn test_value_arity() {
        assert_eq!(parse(r#"{"VALUE": ["a", "b"]}"#).unwrap_err().code(), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_match_is_full_match() {
        assert_eq!(eval(r#"{"MATCH": ["abc", "b"]}"#, &[]), "false");
        assert_eq!(eval(r#"{"MATCH": ["abc", "a.c"]}"#, &[]), "true");
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let err = parse(r#"{"MATCH": ["abc", "(unclosed"]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::Pattern);
    }

    #[test]
    fn test_replace_and_split() {
        assert_eq!(eval(r#"{"REPLACE": ["a-b-c", "-", "+"]}"#, &[]), "a+b+c");
        assert_eq!(eval(r#"{"SPLIT": ["a,b,c", ",", "1"]}"#, &[]), "b");
        assert_eq!(eval(r#"{"SPLIT": ["a,b,c", ",", "7"]}"#, &[]), "");
        assert_eq!(eval(r#"{"SPLIT": ["a,b,,", ",", "2"]}"#, &[]), "");
        let err = parse(r#"{"SPLIT": ["a,b", ",", "-1"]}"#).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_replace_and_split_propagate_sentinel() {
        assert!(parse(r#"{"REPLACE": [{"VALUE": ["x"]}, "a", "b"]}"#)
            .unwrap()
            .evaluate(&NoValues)
            .is_error());
        assert!(parse(r#"{"SPLIT": [{"VALUE": ["x"]}, ",", "0"]}"#)
            .unwrap()
            .evaluate(&NoValues)
            .is_error());
    }

    #[test]
    fn test_divide() {
        assert_eq!(eval(r#"{"DIVIDE": ["10", {"BY": ["30"]}, {"MIN": ["1"]}, {"MAX": ["3"]}]}"#, &[]), "0.333");
        assert_eq!(eval(r#"{"FORMAT": ["7", {"MIN": ["2"]}]}"#, &[]), "7.00");
        assert_eq!(eval(r#"{"DIVIDE": ["0", {"BY": ["3"]}, {"MAX": ["2"]}]}"#, &[]), "0");
        let by_zero = parse(r#"{"DIVIDE": ["1", {"BY": ["0"]}, {"MAX": ["2"]}]}"#).unwrap();
        assert!(by_zero.evaluate(&NoValues).is_error());
        assert!(!by_zero.boolean(&NoValues));
    }

    #[test]
    fn test_divide_construction_errors() {
        let code = |json: &str| parse(json).unwrap_err().code();
        assert_eq!(code(r#"{"DIVIDE": ["1", {"BY": ["2"]}, {"BY": ["3"]}, {"MAX": ["1"]}]}"#), ConfigErrorCode::Duplicate);
        assert_eq!(code(r#"{"DIVIDE": ["1", {"MIN": ["1"]}, {"MIN": ["2"]}]}"#), ConfigErrorCode::Duplicate);
        assert_eq!(code(r#"{"DIVIDE": ["1", {"MAX": ["1"]}, {"MAX": ["2"]}]}"#), ConfigErrorCode::Duplicate);
        assert_eq!(code(r#"{"DIVIDE": ["1", {"MIN": ["-1"]}]}"#), ConfigErrorCode::InvalidValue);
        assert_eq!(code(r#"{"DIVIDE": ["1", {"BY": ["2"]}]}"#), ConfigErrorCode::MissingKey);
        assert_eq!(code(r#"{"DIVIDE": ["1", {"MIN": ["3"]}, {"MAX": ["2"]}]}"#), ConfigErrorCode::InvalidValue);
        assert_eq!(code(r#"{"DIVIDE": ["1", "2"]}"#), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval(r#"{"SUM": ["1.5", "2", "-0.5"]}"#, &[]), "3");
        assert_eq!(eval(r#"{"MINUS": ["1.5", "2"]}"#, &[]), "-3.5");
        assert_eq!(eval(r#"{"DIFF": ["10", "2", "3"]}"#, &[]), "5");
        assert_eq!(eval(r#"{"PRODUCT": ["2", "2.5"]}"#, &[]), "5");
        assert_eq!(eval(r#"{"ABS": ["-4", "1"]}"#, &[]), "3");
        assert_eq!(eval(r#"{"SIGN": ["-4", "1"]}"#, &[]), "-1");
        assert_eq!(eval(r#"{"SIGN": ["0"]}"#, &[]), "0");
        assert!(parse(r#"{"SUM": ["1", "x"]}"#).unwrap().evaluate(&NoValues).is_error());
    }

    #[test]
    fn test_locale_separator() {
        let lib = FunctionLibrary::new();
        let factory = FunctionFactory::new(&lib).with_format(NumberFormat::new(','));
        let f = factory.parse(&node(r#"{"SUM": ["1,25", "1"]}"#)).unwrap();
        assert_eq!(f.string(&NoValues), "2,25");
        let dotted = factory.parse(&node(r#"{"SUM": ["1.25"]}"#)).unwrap();
        assert!(dotted.evaluate(&NoValues).is_error());
    }

    #[test]
    fn test_number_comparisons() {
        assert_eq!(eval(r#"{"LT": ["1", "2", "3"]}"#, &[]), "true");
        assert_eq!(eval(r#"{"LT": ["1", "1"]}"#, &[]), "false");
        assert_eq!(eval(r#"{"LE": ["1", "1"]}"#, &[]), "true");
        assert_eq!(eval(r#"{"GT": ["3", "2"]}"#, &[]), "true");
        assert_eq!(eval(r#"{"GE": ["2", "3"]}"#, &[]), "false");
        assert_eq!(eval(r#"{"NUMCMP": ["1", "2"]}"#, &[]), "-1");
        assert_eq!(eval(r#"{"NUMCMP": ["2", "1"]}"#, &[]), "1");
        assert_eq!(eval(r#"{"NUMCMP": ["2", "1", "3"]}"#, &[]), "0");
        assert_eq!(eval(r#"{"NUMCMP": ["2", "2"]}"#, &[]), "true");
        assert_eq!(eval(r#"{"LT": ["1", "1.05", {"MARGIN": ["0.1"]}]}"#, &[]), "false");
        assert_eq!(parse(r#"{"LT": ["1"]}"#).unwrap_err().code(), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_is_error() {
        assert_eq!(eval(r#"{"ISERROR": [{"VALUE": ["nope"]}]}"#, &[]), "true");
        assert_eq!(eval(r#"{"ISERROR": ["fine"]}"#, &[]), "false");
        assert_eq!(parse(r#"{"ISERROR": ["a", "b"]}"#).unwrap_err().code(), ConfigErrorCode::Arity);
    }

    #[test]
    fn test_bind_with_library_function() {
        let mut lib = FunctionLibrary::new();
        lib.add(
            "greet",
            FunctionFactory::new(&FunctionLibrary::new())
                .parse(&node(r#"{"CAT": ["Hello ", {"VALUE": ["who"]}]}"#))
                .unwrap(),
        );
        let f = FunctionFactory::new(&lib)
            .parse(&node(r#"{"BIND": [{"FUNCTION": ["greet"]}, {"SET": ["who", {"VALUE": ["name"]}]}]}"#))
            .unwrap();
        assert_eq!(f.parameters(), vec!["name"]);

        let values: SimpleValues = [("name", "Ada")].into_iter().collect();
        assert_eq!(f.string(&values), "Hello Ada");
        assert!(f.evaluate(&NoValues).is_error());
    }

    #[test]
    fn test_bind_errors() {
        let code = |json: &str| parse(json).unwrap_err().code();
        assert_eq!(code(r#"{"BIND": [{"FUNCTION": ["undefined"]}]}"#), ConfigErrorCode::InvalidValue);
        assert_eq!(code(r#"{"BIND": [{"SET": ["a", "1"]}]}"#), ConfigErrorCode::MissingKey);
        assert_eq!(
            code(r#"{"BIND": [{"FUNCTION": [{"VALUE": ["a"]}]}, {"SET": ["a"]}]}"#),
            ConfigErrorCode::Arity
        );
        assert_eq!(
            code(r#"{"BIND": [{"FUNCTION": [{"VALUE": ["a"]}]}, {"SET": ["a", "1", "2"]}]}"#),
            ConfigErrorCode::Arity
        );
        assert_eq!(
            code(r#"{"BIND": [{"FUNCTION": [{"VALUE": ["a"]}]}, {"SET": ["a", "1"]}, {"SET": ["a", "2"]}]}"#),
            ConfigErrorCode::Duplicate
        );
    }

    #[test]
    fn test_extern() {
        let externs = ExternRegistry::new();
        externs
            .register("join", 2, |args: &[String]| Ok(args.join("/")))
            .unwrap();
        externs
            .register("fail", 0, |_: &[String]| {
                Err(crate::function::ExternError::Failed("boom".into()))
            })
            .unwrap();
        let lib = FunctionLibrary::new();
        let factory = FunctionFactory::new(&lib).with_externs(&externs);

        let f = factory
            .parse(&node(r#"{"EXTERN": [{"URL": ["join"]}, {"PARAMS": ["a", "b"]}]}"#))
            .unwrap();
        assert_eq!(f.parameters(), vec!["a", "b"]);
        let values: SimpleValues = [("a", "x"), ("b", "y")].into_iter().collect();
        assert_eq!(f.string(&values), "x/y");

        let failing = factory.parse(&node(r#"{"EXTERN": [{"URL": ["fail"]}]}"#)).unwrap();
        assert!(failing.evaluate(&NoValues).is_error());

        let unknown = factory.parse(&node(r#"{"EXTERN": [{"URL": ["nope"]}]}"#));
        assert_eq!(unknown.unwrap_err().code(), ConfigErrorCode::UnknownCallable);
        let arity = factory.parse(&node(r#"{"EXTERN": [{"URL": ["join"]}, {"PARAMS": ["a"]}]}"#));
        assert_eq!(arity.unwrap_err().code(), ConfigErrorCode::UnknownCallable);
    }

    #[test]
    fn test_prompt_bound() {
        let mut prompts = PromptLibrary::new();
        prompts.add(
            "sender",
            Arc::new(ScriptedPrompt::new(&["name", "phone"], &[("name", "Ada")])),
        );
        let lib = FunctionLibrary::new();
        let factory = FunctionFactory::new(&lib).with_prompts(&prompts);

        let f = factory.parse(&node(r#"{"DIALOG": ["sender", "name"]}"#)).unwrap();
        assert!(f.parameters().is_empty());
        assert!(f.evaluate(&NoValues).is_error());

        let session = PromptContext::new();
        assert_eq!(f.evaluate_in(&NoValues, &session).into_string(), "Ada");

        let unanswered = factory.parse(&node(r#"{"DIALOG": ["sender", "phone"]}"#)).unwrap();
        assert!(unanswered.evaluate_in(&NoValues, &session).is_error());

        let bad_field = factory.parse(&node(r#"{"DIALOG": ["sender", "fax"]}"#));
        assert_eq!(bad_field.unwrap_err().code(), ConfigErrorCode::UnknownPrompt);
        let bad_prompt = factory.parse(&node(r#"{"DIALOG": ["nobody", "name"]}"#));
        assert_eq!(bad_prompt.unwrap_err().code(), ConfigErrorCode::UnknownPrompt);
    }

    #[test]
    fn test_parse_children() {
        let lib = FunctionLibrary::new();
        let factory = FunctionFactory::new(&lib);
        assert!(factory.parse_children(&ConfigNode::new("X", vec![])).unwrap().is_none());
        let one = factory.parse_children(&node(r#"{"X": ["a"]}"#)).unwrap().unwrap();
        assert_eq!(one.string(&NoValues), "a");
        let many = factory.parse_children(&node(r#"{"X": ["true", "false"]}"#)).unwrap().unwrap();
        assert_eq!(many.string(&NoValues), "false");
        let grand = factory
            .parse_grandchildren(&node(r#"{"X": [{"A": ["true"]}, {"B": ["true"]}]}"#))
            .unwrap()
            .unwrap();
        assert!(grand.boolean(&NoValues));
    }

    #[test]
    fn test_parse_functions_skips_bad_entries() {
        let section = node(
            r#"{"Funktionen": [
                {"Greeting": ["Hello"]},
                {"Broken": [{"FROB": ["x"]}]},
                {"Empty": []},
                {"Loud": [{"BIND": [{"FUNCTION": ["Greeting"]}]}]}
            ]}"#,
        );
        let lib = FunctionFactory::new(&FunctionLibrary::new()).parse_functions(&section, None);
        assert_eq!(lib.names(), vec!["Greeting", "Loud"]);
        assert_eq!(lib.get("Loud").unwrap().string(&NoValues), "Hello");
    }

    #[test]
    fn test_parse_trafos_keeps_order() {
        let section = node(
            r#"{"Spaltenumsetzung": [
                {"Full": [{"CAT": [{"VALUE": ["first"]}, " ", {"VALUE": ["last"]}]}]},
                {"Bad": [{"FROB": ["x"]}]},
                {"Initial": [{"SPLIT": [{"VALUE": ["first"]}, "-", "0"]}]}
            ]}"#,
        );
        let trafos = FunctionFactory::new(&FunctionLibrary::new()).parse_trafos(&section);
        let names: Vec<_> = trafos.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Full", "Initial"]);
    }

    #[test]
    fn test_labels_table() {
        let labels: Vec<_> = labels().collect();
        assert!(labels.contains(&"FORMAT"));
        assert!(labels.contains(&"THEN"));
        assert_eq!(labels.len(), 32);
    }
}
