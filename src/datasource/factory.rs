//! Datasource construction from configuration
//!
//! The `TYPE` of each description selects a builder from a registration
//! table. Built-in types: `ram`, `empty`, `conf`, `attach`, `overlay`,
//! `prefer`, `funky`, `schema`, `union`. Hosts add their own (for example
//! a `directory` leaf bound to a transport) with
//! [`DatasourceFactory::register`].

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::attach::AttachDatasource;
use super::file::{conf_from_config, empty_from_config, ram_from_config};
use super::funky::FunkyDatasource;
use super::overlay::OverlayDatasource;
use super::prefer::PreferDatasource;
use super::schema::SchemaDatasource;
use super::source::{name_of, DatasourceMap, DatasourceRef};
use super::union::UnionDatasource;
use crate::config::{ConfigError, ConfigNode, ConfigResult};
use crate::function::FunctionFactory;
use crate::observability::{log_event_with_fields, Event};

/// What a builder may use besides its own description
pub struct BuildContext<'a> {
    /// Datasources defined before this one
    pub datasources: &'a DatasourceMap,
    /// Parses pseudo column definitions
    pub functions: &'a FunctionFactory<'a>,
    /// Base for relative file references
    pub base_dir: Option<&'a Path>,
}

/// Builds one datasource from its description
pub type Builder =
    Arc<dyn Fn(&BuildContext<'_>, &ConfigNode) -> ConfigResult<DatasourceRef> + Send + Sync>;

type BuiltinFn = fn(&BuildContext<'_>, &ConfigNode) -> ConfigResult<DatasourceRef>;

const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("ram", ram),
    ("empty", empty),
    ("conf", conf),
    ("attach", attach),
    ("overlay", overlay),
    ("prefer", prefer),
    ("funky", funky),
    ("schema", schema),
    ("union", union),
];

fn ram(_: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(ram_from_config(desc)?))
}

fn empty(_: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(empty_from_config(desc)?))
}

fn conf(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(conf_from_config(desc, ctx.base_dir)?))
}

fn attach(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(AttachDatasource::from_config(ctx.datasources, desc)?))
}

fn overlay(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(OverlayDatasource::from_config(ctx.datasources, desc)?))
}

fn prefer(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(PreferDatasource::from_config(ctx.datasources, desc)?))
}

fn funky(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(FunkyDatasource::from_config(
        ctx.datasources,
        desc,
        ctx.functions,
    )?))
}

fn schema(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(SchemaDatasource::from_config(ctx.datasources, desc)?))
}

fn union(ctx: &BuildContext<'_>, desc: &ConfigNode) -> ConfigResult<DatasourceRef> {
    Ok(Arc::new(UnionDatasource::from_config(ctx.datasources, desc)?))
}

/// Registration table of datasource types
pub struct DatasourceFactory {
    builders: HashMap<String, Builder>,
    base_dir: Option<PathBuf>,
}

impl DatasourceFactory {
    /// A factory knowing the built-in types
    pub fn new() -> Self {
        let builders = BUILTINS
            .iter()
            .map(|(label, build)| {
                let build = *build;
                (label.to_string(), Arc::new(build) as Builder)
            })
            .collect();
        Self {
            builders,
            base_dir: None,
        }
    }

    /// Resolves relative `URL`s against `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Adds a type; a label can only be registered once
    pub fn register<F>(&mut self, label: &str, build: F) -> ConfigResult<()>
    where
        F: Fn(&BuildContext<'_>, &ConfigNode) -> ConfigResult<DatasourceRef> + Send + Sync + 'static,
    {
        if self.builders.contains_key(label) {
            return Err(ConfigError::duplicate(format!(
                "datasource type \"{label}\" is already registered"
            )));
        }
        self.builders.insert(label.to_string(), Arc::new(build));
        Ok(())
    }

    /// Registered type labels, sorted
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.builders.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Builds one datasource on top of `datasources`
    pub fn build(
        &self,
        desc: &ConfigNode,
        datasources: &DatasourceMap,
        functions: &FunctionFactory<'_>,
    ) -> ConfigResult<DatasourceRef> {
        let name = name_of(desc)?;
        let label = desc.require("TYPE", name)?;
        let build = self
            .builders
            .get(label)
            .ok_or_else(|| ConfigError::unknown_label(label))?;

        let ctx = BuildContext {
            datasources,
            functions,
            base_dir: self.base_dir.as_deref(),
        };
        build(&ctx, desc)
    }

    /// Builds every description in order; each may reference the ones
    /// before it. Any failure discards everything built so far.
    pub fn build_all(
        &self,
        descs: &[ConfigNode],
        functions: &FunctionFactory<'_>,
    ) -> ConfigResult<DatasourceMap> {
        let mut datasources = DatasourceMap::new();
        for desc in descs {
            let built = self.build(desc, &datasources, functions)?;
            let name = built.name().to_string();
            if datasources.contains_key(&name) {
                return Err(ConfigError::duplicate(format!(
                    "datasource \"{name}\" is defined twice"
                )));
            }
            log_event_with_fields(
                Event::DatasourceBuilt,
                &[("datasource", name.as_str()), ("type", desc.value_of("TYPE").unwrap_or(""))],
            );
            datasources.insert(name, built);
        }
        Ok(datasources)
    }
}

impl Default for DatasourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DatasourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasourceFactory")
            .field("types", &self.labels())
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigErrorCode;
    use crate::datasource::EmptyDatasource;
    use crate::function::FunctionLibrary;
    use crate::query::QueryPart;

    fn descs(json: &str) -> Vec<ConfigNode> {
        ConfigNode::from_json(json).unwrap().children().to_vec()
    }

    fn build(json: &str) -> ConfigResult<DatasourceMap> {
        let lib = FunctionLibrary::new();
        DatasourceFactory::new().build_all(&descs(json), &FunctionFactory::new(&lib))
    }

    const PEOPLE: &str = r#"{"Datenquelle": [
        {"NAME": ["people"]}, {"TYPE": ["ram"]}, {"Schema": ["id", "name"]},
        {"Schluessel": ["id"]}, {"Daten": [{"": ["1", "Ada"]}, {"": ["2", "Alan"]}]}
    ]}"#;

    #[test]
    fn test_build_all_resolves_references_in_order() {
        let json = format!(
            r#"{{"Datenquellen": [{PEOPLE},
                {{"Datenquelle": [{{"NAME": ["nothing"]}}, {{"TYPE": ["empty"]}}, {{"Schema": ["id", "name"]}}]}},
                {{"Datenquelle": [{{"NAME": ["all"]}}, {{"TYPE": ["prefer"]}}, {{"SOURCE": ["nothing"]}}, {{"OVER": ["people"]}}]}}
            ]}}"#
        );
        let map = build(&json).unwrap();
        assert_eq!(map.len(), 3);
        let hits = map["all"].find(&[QueryPart::new("name", "a*")]);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_forward_reference_fails() {
        let json = format!(
            r#"{{"Datenquellen": [
                {{"Datenquelle": [{{"NAME": ["u"]}}, {{"TYPE": ["union"]}}, {{"SOURCE1": ["people"]}}, {{"SOURCE2": ["people"]}}]}},
                {PEOPLE}
            ]}}"#
        );
        let err = build(&json).unwrap_err();
        assert_eq!(err.code(), ConfigErrorCode::UnknownSource);
    }

    #[test]
    fn test_duplicate_name_and_unknown_type() {
        let dup = format!(r#"{{"Datenquellen": [{PEOPLE}, {PEOPLE}]}}"#);
        assert_eq!(build(&dup).unwrap_err().code(), ConfigErrorCode::Duplicate);

        let unknown = r#"{"Datenquellen": [{"Datenquelle": [{"NAME": ["x"]}, {"TYPE": ["ldap"]}]}]}"#;
        assert_eq!(build(unknown).unwrap_err().code(), ConfigErrorCode::UnknownLabel);

        let untyped = r#"{"Datenquellen": [{"Datenquelle": [{"NAME": ["x"]}]}]}"#;
        assert_eq!(build(untyped).unwrap_err().code(), ConfigErrorCode::MissingKey);
    }

    #[test]
    fn test_register_host_type() {
        let mut factory = DatasourceFactory::new();
        factory
            .register("fixed", |_, desc| {
                let name = desc.require("NAME", "fixed")?;
                let ds: DatasourceRef =
                    Arc::new(EmptyDatasource::new(name, crate::dataset::schema_of(["a"])));
                Ok(ds)
            })
            .unwrap();
        assert!(factory.labels().contains(&"fixed".to_string()));
        assert!(factory.register("ram", |_, _| unreachable!()).is_err());

        let lib = FunctionLibrary::new();
        let map = factory
            .build_all(
                &descs(r#"{"x": [{"Datenquelle": [{"NAME": ["f"]}, {"TYPE": ["fixed"]}]}]}"#),
                &FunctionFactory::new(&lib),
            )
            .unwrap();
        assert_eq!(map["f"].schema().to_vec(), vec!["a"]);
    }
}
