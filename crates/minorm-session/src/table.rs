//! Table-level operations on the bound record type.

use minorm_core::{Result, Value};
use minorm_schema::ddl;

use crate::Session;

impl Session<'_> {
    /// `CREATE TABLE` for the bound record type.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn create_table(&mut self) -> Result<()> {
        let table = self.ref_table()?;
        tracing::info!(table = %table.name, "Creating table");
        let sql = ddl::create_table_sql(table);
        self.exec(&sql, &[])?;
        Ok(())
    }

    /// `DROP TABLE IF EXISTS` for the bound record type.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn drop_table(&mut self) -> Result<()> {
        let table = self.ref_table()?;
        tracing::info!(table = %table.name, "Dropping table");
        let sql = ddl::drop_table_sql(&table.name);
        self.exec(&sql, &[])?;
        Ok(())
    }

    /// Whether the bound record type's table exists.
    pub fn has_table(&mut self) -> Result<bool> {
        let name = self.ref_table()?.name.clone();
        let (sql, args) = self.dialect.table_exist_sql(&name);
        let found = self
            .query_one(&sql, &args)?
            .and_then(|row| row.get(0).and_then(Value::as_str).map(|s| s == name))
            .unwrap_or(false);
        Ok(found)
    }
}
