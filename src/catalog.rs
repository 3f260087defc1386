/// A column value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeId {
    Int,
    Text,
}

impl TypeId {
    /// Returns the type name.
    pub fn name(self) -> &'static str {
        match self {
            TypeId::Int => "int",
            TypeId::Text => "text",
        }
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// The column identifier.
    pub name: String,
    /// The column value type.
    pub ty: TypeId,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Column {
        Column {
            name: name.into(),
            ty,
        }
    }
}

/// A table schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// The table columns.
    ///
    /// This in-memory vector is assumed to be in the same order as the fields
    /// are produced by the backing store's scan.
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Checks if the schema contains the given column, returning a reference to
    /// it.
    ///
    /// This is a linear operation which, in the worst case, scans over all of
    /// the schema columns.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Returns the position of the given column in the scan order.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }
}
