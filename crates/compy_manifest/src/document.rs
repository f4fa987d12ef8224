use std::{
    fmt,
    fmt::{Display, Formatter},
};

use toml_edit::{Array, Item, Table, TableLike, Value};

use crate::TomlError;

/// A wrapper around a TOML document that allows editing nested tables and
/// arrays while keeping the rest of the document as it was written.
#[derive(Debug, Clone, Default)]
pub struct TomlDocument(toml_edit::DocumentMut);

impl Display for TomlDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TomlDocument {
    pub fn new(document: toml_edit::DocumentMut) -> Self {
        Self(document)
    }

    /// Retrieve a mutable reference to a target table using key array.
    /// If the table is not found, it is inserted into the document.
    pub fn get_or_insert_nested_table<'a>(
        &'a mut self,
        keys: &[&str],
    ) -> Result<&'a mut dyn TableLike, TomlError> {
        let mut current_table = self.0.as_table_mut() as &mut dyn TableLike;

        for part in keys {
            let entry = current_table.entry(part);
            let item = entry.or_insert(Item::Table(Table::new()));
            if let Some(table) = item.as_table_mut() {
                // Avoid creating empty tables
                table.set_implicit(true);
            }
            current_table = item
                .as_table_like_mut()
                .ok_or_else(|| TomlError::table_error(part, &keys.join(".")))?;
        }
        Ok(current_table)
    }

    /// Retrieve a mutable reference to the array `array_name`, inserting an
    /// empty array when it does not exist yet.
    pub fn get_or_insert_toml_array_mut<'a>(
        &'a mut self,
        keys: &[&str],
        array_name: &str,
    ) -> Result<&'a mut Array, TomlError> {
        self.get_or_insert_nested_table(keys)?
            .entry(array_name)
            .or_insert(Item::Value(Value::Array(Array::new())))
            .as_array_mut()
            .ok_or_else(|| TomlError::array_error(array_name, &keys.join(".")))
    }
}
