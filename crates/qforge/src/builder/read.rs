use super::write::id_condition;
use super::{CrudBuilder, limit_offset, order_by, staged};
use crate::args::ArgList;
use crate::envelope::SqlEnvelope;
use crate::error::{OrmError, OrmResult};
use crate::ident::validate_ident;
use crate::record::Record;

impl<E: Record> CrudBuilder<E> {
    /// `SELECT * FROM <table>[ WHERE ...][ ORDER BY ...][ LIMIT n OFFSET m]`.
    pub fn build_select_and_args<Q: Record>(&self, filter: &Q, args: &mut ArgList) -> OrmResult<String> {
        self.build_select_columns_and_args(filter, &["*"], args)
    }

    pub fn build_select<Q: Record>(&self, filter: &Q) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_select_and_args(filter, args))
    }

    /// Like [`build_select_and_args`](Self::build_select_and_args) with an
    /// explicit projection.
    pub fn build_select_columns_and_args<Q: Record>(
        &self,
        filter: &Q,
        columns: &[&str],
        args: &mut ArgList,
    ) -> OrmResult<String> {
        if columns.is_empty() {
            return Err(OrmError::validation("select needs at least one column"));
        }
        for column in columns {
            if *column != "*" {
                validate_ident(column)?;
            }
        }
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, filter)?;
            let mut sql = format!("SELECT {} FROM {table}", columns.join(", "));
            sql.push_str(&self.where_clause(&descriptor, &config, filter, args)?);
            if let Some(page) = filter.page() {
                if let Some(sort) = &page.sort {
                    sql.push_str(&order_by(sort, &config)?);
                }
                sql.push_str(&limit_offset(page));
            }
            Ok(sql)
        })
    }

    pub fn build_select_columns<Q: Record>(&self, filter: &Q, columns: &[&str]) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_select_columns_and_args(filter, columns, args))
    }

    /// `SELECT count(*) FROM <table>[ WHERE ...]`; paging is ignored.
    pub fn build_count_and_args<Q: Record>(&self, filter: &Q, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, filter)?;
            let where_clause = self.where_clause(&descriptor, &config, filter, args)?;
            Ok(format!("SELECT count(*) FROM {table}{where_clause}"))
        })
    }

    pub fn build_count<Q: Record>(&self, filter: &Q) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_count_and_args(filter, args))
    }

    /// `DELETE FROM <table>[ WHERE ...][ LIMIT n]`.
    pub fn build_delete_and_args<Q: Record>(&self, filter: &Q, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, filter)?;
            let mut sql = format!("DELETE FROM {table}");
            sql.push_str(&self.where_clause(&descriptor, &config, filter, args)?);
            if let Some(size) = filter.page().and_then(|p| p.page_size) {
                sql.push_str(&format!(" LIMIT {size}"));
            }
            Ok(sql)
        })
    }

    pub fn build_delete<Q: Record>(&self, filter: &Q) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_delete_and_args(filter, args))
    }

    /// `SELECT * FROM <table> WHERE <id> = ?`.
    ///
    /// `record` is the entity itself or an id wrapper whose other fields feed
    /// the table template.
    pub fn build_select_by_id_and_args<R: Record>(&self, record: &R, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, record)?;
            let source = self.registry.resolve::<R>()?;
            let id = id_condition(&source, &config, record, args)?;
            Ok(format!("SELECT * FROM {table} WHERE {id}"))
        })
    }

    pub fn build_select_by_id<R: Record>(&self, record: &R) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_select_by_id_and_args(record, args))
    }

    /// `DELETE FROM <table> WHERE <id> = ?`.
    pub fn build_delete_by_id_and_args<R: Record>(&self, record: &R, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, record)?;
            let source = self.registry.resolve::<R>()?;
            let id = id_condition(&source, &config, record, args)?;
            Ok(format!("DELETE FROM {table} WHERE {id}"))
        })
    }

    pub fn build_delete_by_id<R: Record>(&self, record: &R) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_delete_by_id_and_args(record, args))
    }
}
