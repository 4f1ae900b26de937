use crate::columns::column_named;
use crate::values::fit_to_column;
use auditrail_common::{AuditError, MorphKey, MorphKeyType, Result};
use sea_orm::{ActiveModelTrait, EntityTrait, Value};

/// Points the `{name}_*` polymorphic columns of `active` at a row of
/// `type_name`. Exactly one key column receives a value; under the `any`
/// strategy the other key columns are cleared.
pub fn assign_morph<A: ActiveModelTrait>(
    active: &mut A,
    name: &str,
    strategy: MorphKeyType,
    type_name: &str,
    key: &MorphKey,
) -> Result<()> {
    let mut values = vec![(format!("{name}_type"), Value::from(type_name.to_string()))];
    values.extend(strategy.key_values(name, key)?);

    for (column_name, value) in values {
        let column = column_named::<<A::Entity as EntityTrait>::Column>(&column_name)
            .ok_or_else(|| AuditError::missing_column(column_name.as_str()))?;
        let described = format!("{value:?}");
        let value = fit_to_column(value, column).ok_or_else(|| {
            AuditError::morph(format!("{described} does not fit morph column {column_name}"))
        })?;
        active.set(column, value);
    }
    Ok(())
}
