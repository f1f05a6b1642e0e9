//! Datasource federation
//!
//! Leaf sources (RAM, flat files, directory services) and the operators
//! that combine them (Attach, Overlay, Prefer, Funky, Schema, Union) all
//! implement [`Datasource`]. Operators are built from a description node
//! and the datasources defined before them; see [`DatasourceFactory`].
//!
//! Federation operators answer an empty query with no rows.

mod attach;
mod directory;
mod errors;
mod factory;
mod file;
mod funky;
mod join;
mod overlay;
mod prefer;
mod ram;
mod schema;
mod source;
mod union;

pub use attach::AttachDatasource;
pub use directory::{ColumnKey, DirectoryDatasource, DirectoryTransport, HashedKey, KeyStrategy, Record};
pub use errors::{TransportError, TransportResult};
pub use factory::{BuildContext, Builder, DatasourceFactory};
pub use file::{conf_from_config, empty_from_config, ram_from_config, KEY_SEPARATOR};
pub use funky::FunkyDatasource;
pub use overlay::{OverlayDatasource, OverlayMode};
pub use prefer::PreferDatasource;
pub use ram::{EmptyDatasource, RamDatasource};
pub use schema::SchemaDatasource;
pub use source::{Datasource, DatasourceMap, DatasourceRef};
pub use union::UnionDatasource;

#[cfg(test)]
pub(crate) use ram::testing;
