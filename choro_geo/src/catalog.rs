// Copyright 2025 the Choro Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ordered set of attributes the views can express.

use crate::error::CatalogError;

/// Handle to an attribute of an [`AttributeCatalog`].
///
/// Only a catalog hands these out, so holding one means the attribute exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(usize);

impl AttributeId {
    /// Position of the attribute in catalog order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A displayable attribute and the fixed value domain its bars are sized against.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    name: String,
    size_domain: (f64, f64),
}

impl Attribute {
    /// Creates an attribute.
    pub fn new(name: impl Into<String>, size_domain: (f64, f64)) -> Self {
        Self {
            name: name.into(),
            size_domain,
        }
    }

    /// Column / property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Domain of the bar size scale.
    pub fn size_domain(&self) -> (f64, f64) {
        self.size_domain
    }
}

/// Non-empty, ordered, uniquely named attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeCatalog {
    attributes: Vec<Attribute>,
}

impl AttributeCatalog {
    /// Validates and wraps `attributes`.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, CatalogError> {
        if attributes.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, a) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|b| b.name == a.name) {
                return Err(CatalogError::Duplicate(a.name.clone()));
            }
        }
        Ok(Self { attributes })
    }

    /// The county employment attributes with their hand-tuned size domains.
    pub fn employment() -> Self {
        Self {
            attributes: vec![
                Attribute::new("Labor Force", (0.0, 200_000.0)),
                Attribute::new("Employed", (0.0, 200_000.0)),
                Attribute::new("Unemployed", (0.0, 5_500.0)),
                Attribute::new("Unemployed Rate", (0.0, 8.0)),
                Attribute::new("Population", (0.0, 325_000.0)),
            ],
        }
    }

    /// The attribute expressed at startup.
    pub fn first(&self) -> AttributeId {
        AttributeId(0)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Always `false`; catalogs are non-empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Finds an attribute by exact name.
    pub fn lookup(&self, name: &str) -> Result<AttributeId, CatalogError> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map(AttributeId)
            .ok_or_else(|| CatalogError::Unknown(name.to_owned()))
    }

    /// Returns the attribute behind `id`.
    ///
    /// # Panics
    ///
    /// If `id` came from a different, shorter catalog.
    pub fn get(&self, id: AttributeId) -> &Attribute {
        &self.attributes[id.0]
    }

    /// Shorthand for `get(id).name()`.
    pub fn name(&self, id: AttributeId) -> &str {
        self.get(id).name()
    }

    /// Iterates attributes in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &Attribute)> {
        self.attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (AttributeId(i), a))
    }
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        Self::employment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employment_catalog_order_and_domains() {
        let c = AttributeCatalog::employment();
        let names: Vec<&str> = c.iter().map(|(_, a)| a.name()).collect();
        assert_eq!(
            names,
            ["Labor Force", "Employed", "Unemployed", "Unemployed Rate", "Population"]
        );
        assert_eq!(c.name(c.first()), "Labor Force");
        let rate = c.lookup("Unemployed Rate").unwrap();
        assert_eq!(c.get(rate).size_domain(), (0.0, 8.0));
        assert_eq!(rate.index(), 3);
    }

    #[test]
    fn lookup_is_exact() {
        let c = AttributeCatalog::employment();
        assert_eq!(
            c.lookup("employed"),
            Err(CatalogError::Unknown("employed".into()))
        );
    }

    #[test]
    fn invalid_catalogs_are_rejected() {
        assert_eq!(AttributeCatalog::new(vec![]), Err(CatalogError::Empty));
        let dup = vec![Attribute::new("A", (0.0, 1.0)), Attribute::new("A", (0.0, 2.0))];
        assert_eq!(
            AttributeCatalog::new(dup),
            Err(CatalogError::Duplicate("A".into()))
        );
    }
}
