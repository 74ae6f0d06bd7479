//! Record descriptors.
//!
//! A [`RecordDescriptor`] is the declarative metadata of one record type: an
//! optional table template and its fields in declaration order. Each
//! [`FieldDescriptor`] is compiled to a [`ClauseGenerator`] when the descriptor
//! is built, so contradictory metadata fails once, at first use, instead of on
//! every statement.
//!
//! # Example
//! ```ignore
//! use qforge::{FieldDescriptor, RecordDescriptor, Subquery, ValueShape};
//!
//! let descriptor = RecordDescriptor::builder("UserQuery")
//!     .field(FieldDescriptor::builder("username_like", ValueShape::Scalar))
//!     .field(
//!         FieldDescriptor::builder("role_id_in", ValueShape::List)
//!             .subquery(Subquery::new("id", "user_id", "t_user_role")),
//!     )
//!     .build()?;
//! # Ok::<(), qforge::OrmError>(())
//! ```

pub mod generator;
pub mod registry;
pub mod suffix;


pub use generator::{ClauseGenerator, InnerFilter};
pub use registry::Registry;
pub use suffix::SuffixOp;

use crate::config::GlobalConfiguration;
use crate::error::{OrmError, OrmResult};
use crate::ident::{validate_ident, validate_table_template};
use crate::table;
use generator::FieldMeta;
use std::borrow::Cow;

/// Declared value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueShape {
    /// A single value, possibly optional.
    Scalar,
    /// A plain `bool`.
    Flag,
    /// A collection bound with `IN (...)`.
    List,
    /// A pair bound with `BETWEEN`.
    Range,
    /// A nested filter record.
    Filter,
}

/// What a field is when the record is written as a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// A mapped column.
    Column,
    /// The identifier column.
    Id,
    /// Not stored; only feeds table templates.
    Transient,
}

/// A single correlated subquery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery {
    /// Column of the outer table compared with the subquery.
    pub column: String,
    pub op: String,
    /// Column projected by the subquery.
    pub select: String,
    pub from: String,
    /// Extra text after the table; every `?` binds the field value.
    pub extra: Option<String>,
}

impl Subquery {
    pub fn new(column: impl Into<String>, select: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: "IN".to_string(),
            select: select.into(),
            from: from.into(),
            extra: None,
        }
    }

    pub fn with_op(mut self, op: &str) -> Self {
        self.op = op.trim().to_ascii_uppercase();
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

/// One level of a [`NestedChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedLevel {
    /// Column selected by this level, and compared by the level above it.
    pub left: String,
    pub from: String,
    /// Operator joining this level to the next one.
    pub op: String,
    pub extra: Option<String>,
}

impl NestedLevel {
    pub fn new(left: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            from: from.into(),
            op: "IN".to_string(),
            extra: None,
        }
    }

    pub fn with_op(mut self, op: &str) -> Self {
        self.op = op.trim().to_ascii_uppercase();
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

/// Chain of correlated subqueries; level `i` nests inside level `i - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedChain {
    pub column: String,
    pub op: String,
    pub levels: Vec<NestedLevel>,
    /// Put the field's own condition inside the innermost level.
    pub append_where: bool,
}

impl NestedChain {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op: "IN".to_string(),
            levels: Vec::new(),
            append_where: false,
        }
    }

    pub fn with_op(mut self, op: &str) -> Self {
        self.op = op.trim().to_ascii_uppercase();
        self
    }

    pub fn level(mut self, level: NestedLevel) -> Self {
        self.levels.push(level);
        self
    }

    pub fn append_where(mut self, append: bool) -> Self {
        self.append_where = append;
        self
    }
}

/// Compiled metadata of one field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    shape: ValueShape,
    role: FieldRole,
    column: Option<String>,
    alias: Option<String>,
    literal: Option<String>,
    subquery: Option<Subquery>,
    nested: Option<NestedChain>,
    generator: ClauseGenerator,
}

impl FieldDescriptor {
    pub fn builder(name: impl Into<String>, shape: ValueShape) -> FieldBuilder {
        FieldBuilder {
            name: name.into(),
            shape,
            role: FieldRole::Column,
            column: None,
            alias: None,
            literal: None,
            subquery: None,
            nested: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ValueShape {
        self.shape
    }

    pub fn role(&self) -> FieldRole {
        self.role
    }

    pub fn is_transient(&self) -> bool {
        self.role == FieldRole::Transient
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    pub fn subquery(&self) -> Option<&Subquery> {
        self.subquery.as_ref()
    }

    pub fn nested(&self) -> Option<&NestedChain> {
        self.nested.as_ref()
    }

    pub fn generator(&self) -> &ClauseGenerator {
        &self.generator
    }

    /// Column written for this field: the declared override, or the field name
    /// under the given configuration.
    pub fn column_name<'a>(&'a self, config: &GlobalConfiguration) -> Cow<'a, str> {
        match &self.column {
            Some(column) => Cow::Borrowed(column.as_str()),
            None => config.column_name(&self.name),
        }
    }
}

/// Declarative input for a [`FieldDescriptor`].
#[derive(Debug, Clone)]
#[must_use]
pub struct FieldBuilder {
    name: String,
    shape: ValueShape,
    role: FieldRole,
    column: Option<String>,
    alias: Option<String>,
    literal: Option<String>,
    subquery: Option<Subquery>,
    nested: Option<NestedChain>,
}

impl FieldBuilder {
    /// Mark as the identifier column.
    pub fn id(mut self) -> Self {
        self.role = FieldRole::Id;
        self
    }

    /// Exclude from columns and conditions; still readable by table templates.
    pub fn transient(mut self) -> Self {
        self.role = FieldRole::Transient;
        self
    }

    /// Column name used when the record is written as a row (`INSERT`,
    /// `UPDATE`, `SET`).
    ///
    /// Conditions keep naming the column after the field: a filter field
    /// `score_lt` with `.column("user_score")` still renders `score < ?`.
    /// Use an alias, literal or subquery to compare against another column.
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Fixed condition text; the value is bound once per `?`.
    pub fn literal(mut self, template: impl Into<String>) -> Self {
        self.literal = Some(template.into());
        self
    }

    pub fn subquery(mut self, subquery: Subquery) -> Self {
        self.subquery = Some(subquery);
        self
    }

    pub fn nested(mut self, chain: NestedChain) -> Self {
        self.nested = Some(chain);
        self
    }

    fn build(self, record: &str) -> OrmResult<FieldDescriptor> {
        if let Some(column) = &self.column {
            validate_ident(column).map_err(|e| {
                OrmError::metadata(record, format!("field '{}': {e}", self.name))
            })?;
        }
        let generator = ClauseGenerator::compile(&FieldMeta {
            name: &self.name,
            shape: self.shape,
            alias: self.alias.as_deref(),
            literal: self.literal.as_deref(),
            subquery: self.subquery.as_ref(),
            nested: self.nested.as_ref(),
        })
        .map_err(|message| OrmError::metadata(record, message))?;

        Ok(FieldDescriptor {
            name: self.name,
            shape: self.shape,
            role: self.role,
            column: self.column,
            alias: self.alias,
            literal: self.literal,
            subquery: self.subquery,
            nested: self.nested,
            generator,
        })
    }
}

/// Immutable metadata of one record type.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    name: String,
    table: Option<String>,
    fields: Vec<FieldDescriptor>,
    id_index: Option<usize>,
    table_placeholders: Vec<String>,
}

impl RecordDescriptor {
    pub fn builder(name: impl Into<String>) -> RecordDescriptorBuilder {
        RecordDescriptorBuilder {
            name: name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table name template, e.g. `t_dynamic_${user}_${project}`.
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Field names referenced by the table template.
    pub fn table_placeholders(&self) -> &[String] {
        &self.table_placeholders
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// The identifier field and its index.
    pub fn id_field(&self) -> Option<(usize, &FieldDescriptor)> {
        self.id_index.map(|i| (i, &self.fields[i]))
    }

    /// Mapped, non-identifier columns in declaration order.
    pub fn column_fields(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.role == FieldRole::Column)
    }
}

/// Declarative input for a [`RecordDescriptor`].
#[derive(Debug, Clone)]
#[must_use]
pub struct RecordDescriptorBuilder {
    name: String,
    table: Option<String>,
    fields: Vec<FieldBuilder>,
}

impl RecordDescriptorBuilder {
    pub fn table(mut self, template: impl Into<String>) -> Self {
        self.table = Some(template.into());
        self
    }

    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate and compile every field.
    pub fn build(self) -> OrmResult<RecordDescriptor> {
        let name = self.name;
        if let Some(table) = &self.table {
            validate_table_template(table).map_err(|e| OrmError::metadata(&name, e.to_string()))?;
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut id_index = None;
        for field in self.fields {
            if fields.iter().any(|f: &FieldDescriptor| f.name == field.name) {
                return Err(OrmError::metadata(
                    &name,
                    format!("duplicate field '{}'", field.name),
                ));
            }
            let field = field.build(&name)?;
            if field.role == FieldRole::Id {
                if id_index.is_some() {
                    return Err(OrmError::metadata(&name, "more than one id field"));
                }
                id_index = Some(fields.len());
            }
            fields.push(field);
        }

        let table_placeholders = self
            .table
            .as_deref()
            .map(|t| table::placeholders(t).into_iter().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(RecordDescriptor {
            name,
            table: self.table,
            fields,
            id_index,
            table_placeholders,
        })
    }
}
