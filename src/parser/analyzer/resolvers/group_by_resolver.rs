use std::collections::BTreeSet;

use crate::parser::analyzer::{ColumnRef, CompileError, TypeContext};

pub struct GroupByResolver;

impl GroupByResolver {
    /// Split GROUP BY names into select-field aliases and source columns.
    /// A name matching a select alias is an alias group even when a column of
    /// the same name exists.
    pub fn partition(
        groups: &[String],
        aliases: &[String],
        table_ctx: &TypeContext,
    ) -> Result<(BTreeSet<String>, Vec<ColumnRef>), CompileError> {
        let mut alias_groups = BTreeSet::new();
        let mut field_groups: Vec<ColumnRef> = Vec::new();

        for name in groups {
            if aliases.contains(name) {
                alias_groups.insert(name.clone());
                continue;
            }
            let column = table_ctx.column_ref_for_name(name).map_err(|err| match err {
                CompileError::UnknownColumn(_) => CompileError::InvalidGroupBy(name.clone()),
                other => other,
            })?;
            if !field_groups.contains(&column) {
                field_groups.push(column);
            }
        }

        Ok((alias_groups, field_groups))
    }
}
