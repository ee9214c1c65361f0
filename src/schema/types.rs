// src/schema/types.rs

use serde::{Deserialize, Serialize};

/// A single destination-column definition.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    pub ty: String,
}

impl Column {
    pub fn new(name: &str, ty: &str) -> Column {
        Column {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}
