//! Datasource with computed columns

use super::source::{name_of, referenced, Datasource, DatasourceMap, DatasourceRef};
use crate::config::{ConfigNode, ConfigResult};
use crate::dataset::{QueryResults, Schema};
use crate::function::FunctionFactory;
use crate::query::QueryPart;
use crate::transform::ColumnTransformer;

/// Section holding the pseudo column definitions
const TRANSFORMATION_SECTION: &str = "Spaltenumsetzung";

/// SOURCE seen through a [`ColumnTransformer`]
///
/// Queries go to SOURCE unchanged; every returned row is transformed.
#[derive(Debug)]
pub struct FunkyDatasource {
    name: String,
    source: DatasourceRef,
    transformer: ColumnTransformer,
    schema: Schema,
}

impl FunkyDatasource {
    /// Builds from `NAME`, `SOURCE` and an optional `Spaltenumsetzung`
    /// section
    pub fn from_config(
        map: &DatasourceMap,
        desc: &ConfigNode,
        functions: &FunctionFactory<'_>,
    ) -> ConfigResult<Self> {
        let name = name_of(desc)?;
        let source = referenced(map, desc, "SOURCE", name)?;
        let transformer = desc
            .children_named(TRANSFORMATION_SECTION)
            .fold(Vec::new(), |mut acc, section| {
                acc.extend(functions.parse_trafos(section));
                acc
            });
        Ok(Self::new(name, source, ColumnTransformer::new(transformer)))
    }

    pub fn new(name: impl Into<String>, source: DatasourceRef, transformer: ColumnTransformer) -> Self {
        let schema = transformer.schema_for(source.schema());
        Self {
            name: name.into(),
            source,
            transformer,
            schema,
        }
    }

    fn transform(&self, results: QueryResults) -> QueryResults {
        self.transformer
            .transform_results(results)
            .with_schema(self.schema.clone())
    }
}

impl Datasource for FunkyDatasource {
    fn name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn find(&self, query: &[QueryPart]) -> QueryResults {
        if query.is_empty() {
            return QueryResults::empty().with_schema(self.schema.clone());
        }
        self.transform(self.source.find(query))
    }

    fn datasets_by_key(&self, keys: &[String]) -> QueryResults {
        self.transform(self.source.datasets_by_key(keys))
    }

    fn contents(&self) -> QueryResults {
        self.transform(self.source.contents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::testing::ram_source as ram;
    use crate::function::FunctionLibrary;

    fn funky() -> FunkyDatasource {
        let mut map = DatasourceMap::new();
        map.insert(
            "people".into(),
            ram("people", &["first", "last"], &[&["p1", "Ada", "Lovelace"], &["p2", "Alan", "Turing"]]),
        );
        let desc = ConfigNode::from_json(
            r#"{"Datenquelle": [
                {"NAME": ["nice"]}, {"SOURCE": ["people"]},
                {"Spaltenumsetzung": [
                    {"Full": [{"CAT": [{"VALUE": ["last"]}, ", ", {"VALUE": ["first"]}]}]},
                    {"last": [{"CAT": ["Dr. ", {"VALUE": ["last"]}]}]}
                ]}
            ]}"#,
        )
        .unwrap();
        let lib = FunctionLibrary::new();
        FunkyDatasource::from_config(&map, &desc, &FunctionFactory::new(&lib)).unwrap()
    }

    #[test]
    fn test_schema_puts_pseudo_columns_first() {
        assert_eq!(funky().schema().to_vec(), vec!["Full", "last", "first"]);
    }

    #[test]
    fn test_rows_are_transformed() {
        let hits = funky().find(&[QueryPart::new("first", "ada")]);
        assert_eq!(hits.keys(), vec!["p1"]);
        let row = hits.get(0).unwrap();
        assert_eq!(row.get("Full").unwrap(), Some("Lovelace, Ada".into()));
        // pseudo column shadows the source column; VALUE still reads the source
        assert_eq!(row.get("last").unwrap(), Some("Dr. Lovelace".into()));
    }

    #[test]
    fn test_contents_and_keys_pass_through() {
        let f = funky();
        assert!(f.find(&[]).is_empty());
        assert_eq!(f.contents().len(), 2);
        assert_eq!(f.datasets_by_key(&["p2".into()]).keys(), vec!["p2"]);
    }
}
