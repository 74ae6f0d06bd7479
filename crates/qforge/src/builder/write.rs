use super::{CrudBuilder, staged};
use crate::args::ArgList;
use crate::config::GlobalConfiguration;
use crate::descriptor::{FieldDescriptor, RecordDescriptor};
use crate::envelope::SqlEnvelope;
use crate::error::{OrmError, OrmResult};
use crate::ident::validate_ident;
use crate::record::{AnyRecord, Record};
use crate::value::Value;

impl<E: Record> CrudBuilder<E> {
    /// `INSERT INTO <table> (<columns>) VALUES (...), (...)`.
    ///
    /// Every mapped column is written, nulls included, so all tuples share one
    /// column list. The table is rendered from the first entity. With
    /// `upsert_columns`, appends `ON DUPLICATE KEY UPDATE col = VALUES(col), ...`.
    pub fn build_create_and_args(
        &self,
        entities: &[E],
        upsert_columns: &[&str],
        args: &mut ArgList,
    ) -> OrmResult<String> {
        let Some(first) = entities.first() else {
            return Err(OrmError::validation("create needs at least one entity"));
        };
        staged(args, |args| self.render_create(first, entities, upsert_columns, args))
    }

    fn render_create(
        &self,
        first: &E,
        entities: &[E],
        upsert_columns: &[&str],
        args: &mut ArgList,
    ) -> OrmResult<String> {
        let descriptor = self.descriptor()?;
        let config = self.config();
        let table = self.table_name(&descriptor, first)?;

        let fields: Vec<(usize, &FieldDescriptor)> = descriptor.column_fields().collect();
        if fields.is_empty() {
            return Err(OrmError::metadata(descriptor.name(), "no columns to insert"));
        }
        let columns: Vec<String> = fields
            .iter()
            .map(|(_, f)| f.column_name(&config).into_owned())
            .collect();
        let tuple = format!("({})", vec!["?"; columns.len()].join(", "));

        let mut sql = format!("INSERT INTO {table} ({}) VALUES ", columns.join(", "));
        for (n, entity) in entities.iter().enumerate() {
            if n > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&tuple);
            for (index, field) in &fields {
                args.push_value(column_value(&descriptor, field, entity, *index)?);
            }
        }

        if !upsert_columns.is_empty() {
            let mut updates = Vec::with_capacity(upsert_columns.len());
            for column in upsert_columns {
                validate_ident(column)?;
                updates.push(format!("{column} = VALUES({column})"));
            }
            sql.push_str(" ON DUPLICATE KEY UPDATE ");
            sql.push_str(&updates.join(", "));
        }
        Ok(sql)
    }

    pub fn build_create(&self, entities: &[E], upsert_columns: &[&str]) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_create_and_args(entities, upsert_columns, args))
    }

    /// `UPDATE <table> SET <every column> = ? WHERE <id> = ?`.
    pub fn build_update_and_args(&self, entity: &E, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            if descriptor.id_field().is_none() {
                return Err(OrmError::metadata(descriptor.name(), "no id field declared"));
            }
            let table = self.table_name(&descriptor, entity)?;

            let mut sets = Vec::new();
            for (index, field) in descriptor.column_fields() {
                sets.push(format!("{} = ?", field.column_name(&config)));
                args.push_value(column_value(&descriptor, field, entity, index)?);
            }
            if sets.is_empty() {
                return Err(OrmError::metadata(descriptor.name(), "no columns to update"));
            }
            let id = id_condition(&descriptor, &config, entity, args)?;
            Ok(format!("UPDATE {table} SET {} WHERE {id}", sets.join(", ")))
        })
    }

    pub fn build_update(&self, entity: &E) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_update_and_args(entity, args))
    }

    /// `UPDATE <table> SET <non-null columns> WHERE <id> = ?`.
    ///
    /// Fails with [`OrmError::EmptyPatch`] when every column is null.
    pub fn build_patch_by_id_and_args(&self, entity: &E, args: &mut ArgList) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            if descriptor.id_field().is_none() {
                return Err(OrmError::metadata(descriptor.name(), "no id field declared"));
            }
            let table = self.table_name(&descriptor, entity)?;
            let sets = patch_sets(&descriptor, &config, entity, args)?;
            let id = id_condition(&descriptor, &config, entity, args)?;
            Ok(format!("UPDATE {table} SET {sets} WHERE {id}"))
        })
    }

    pub fn build_patch_by_id(&self, entity: &E) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_patch_by_id_and_args(entity, args))
    }

    /// `UPDATE <table> SET <non-null columns>[ WHERE <filter>]`.
    ///
    /// Patch arguments come before the filter's.
    pub fn build_patch_by_query_and_args<Q: Record>(
        &self,
        entity: &E,
        filter: &Q,
        args: &mut ArgList,
    ) -> OrmResult<String> {
        staged(args, |args| {
            let descriptor = self.descriptor()?;
            let config = self.config();
            let table = self.table_name(&descriptor, entity)?;
            let sets = patch_sets(&descriptor, &config, entity, args)?;
            let where_clause = self.where_clause(&descriptor, &config, filter, args)?;
            Ok(format!("UPDATE {table} SET {sets}{where_clause}"))
        })
    }

    pub fn build_patch_by_query<Q: Record>(&self, entity: &E, filter: &Q) -> OrmResult<SqlEnvelope> {
        self.envelope(|args| self.build_patch_by_query_and_args(entity, filter, args))
    }
}

/// `col = ?, ...` for the non-null mapped columns of `entity`.
fn patch_sets(
    descriptor: &RecordDescriptor,
    config: &GlobalConfiguration,
    entity: &dyn AnyRecord,
    args: &mut ArgList,
) -> OrmResult<String> {
    let mut sets = Vec::new();
    for (index, field) in descriptor.column_fields() {
        let value = column_value(descriptor, field, entity, index)?;
        if value.is_null() {
            continue;
        }
        sets.push(format!("{} = ?", field.column_name(config)));
        args.push_value(value);
    }
    if sets.is_empty() {
        return Err(OrmError::empty_patch(format!(
            "no non-null columns on '{}'",
            descriptor.name()
        )));
    }
    Ok(sets.join(", "))
}

/// Value written for a mapped column.
fn column_value(
    descriptor: &RecordDescriptor,
    field: &FieldDescriptor,
    record: &dyn AnyRecord,
    index: usize,
) -> OrmResult<Value> {
    record.field_value(index).to_column_value().ok_or_else(|| {
        OrmError::validation(format!(
            "field '{}' of '{}' cannot be written as a column",
            field.name(),
            descriptor.name()
        ))
    })
}

/// `<id> = ?` for records carrying an id field, binding the id value.
pub(super) fn id_condition(
    descriptor: &RecordDescriptor,
    config: &GlobalConfiguration,
    record: &dyn AnyRecord,
    args: &mut ArgList,
) -> OrmResult<String> {
    let Some((index, field)) = descriptor.id_field() else {
        return Err(OrmError::metadata(descriptor.name(), "no id field declared"));
    };
    args.push_value(column_value(descriptor, field, record, index)?);
    Ok(format!("{} = ?", field.column_name(config)))
}
