//! Per-field manual operation overrides.
//!
//! A manual operation replaces the generic pipeline for one field: when a
//! parameter's name is registered, its builder is used exclusively, before
//! the nesting marker is even looked at.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ConfigError, FilterResult};
use crate::types::BaseSearchParam;

/// A caller-supplied predicate builder for one field.
pub trait ManualOperationProvider<F>: Send + Sync {
    /// The field this builder handles.
    fn field_name(&self) -> &str;

    /// Builds the fragment for a parameter on [`field_name`](Self::field_name).
    fn build_operation(&self, param: &BaseSearchParam) -> FilterResult<F>;
}

type BuildFn<F> = Box<dyn Fn(&BaseSearchParam) -> FilterResult<F> + Send + Sync>;

/// A [`ManualOperationProvider`] backed by a closure.
pub struct ManualOperation<F> {
    field_name: String,
    build: BuildFn<F>,
}

impl<F> ManualOperation<F> {
    /// Creates a manual operation for `field_name`.
    pub fn new(
        field_name: impl Into<String>,
        build: impl Fn(&BaseSearchParam) -> FilterResult<F> + Send + Sync + 'static,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            build: Box::new(build),
        }
    }
}

impl<F> ManualOperationProvider<F> for ManualOperation<F> {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn build_operation(&self, param: &BaseSearchParam) -> FilterResult<F> {
        (self.build)(param)
    }
}

impl<F> fmt::Debug for ManualOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualOperation")
            .field("field_name", &self.field_name)
            .finish_non_exhaustive()
    }
}

/// Manual operations keyed by field name.
///
/// Built once; lookups are read-only.
pub struct ManualOperationRegistry<F> {
    operations: HashMap<String, Box<dyn ManualOperationProvider<F>>>,
}

impl<F> ManualOperationRegistry<F> {
    /// Builds the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateManualOperation`] if two providers
    /// declare the same field.
    pub fn new(providers: Vec<Box<dyn ManualOperationProvider<F>>>) -> Result<Self, ConfigError> {
        let mut operations = HashMap::with_capacity(providers.len());

        for provider in providers {
            let field = provider.field_name().to_string();
            if operations.contains_key(&field) {
                return Err(ConfigError::DuplicateManualOperation { field });
            }
            operations.insert(field, provider);
        }

        tracing::info!(
            count = operations.len(),
            "Manual operation registry initialized"
        );

        Ok(Self { operations })
    }

    /// Creates a registry with no overrides.
    pub fn empty() -> Self {
        Self {
            operations: HashMap::new(),
        }
    }

    /// Returns the override for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&dyn ManualOperationProvider<F>> {
        self.operations.get(field).map(|provider| provider.as_ref())
    }

    /// Returns true if `field` has an override.
    pub fn contains(&self, field: &str) -> bool {
        self.operations.contains_key(field)
    }

    /// Number of registered overrides.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if no overrides are registered.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl<F> Default for ManualOperationRegistry<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> fmt::Debug for ManualOperationRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&String> = self.operations.keys().collect();
        fields.sort();
        f.debug_struct("ManualOperationRegistry")
            .field("fields", &fields)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(field: &str, value: &'static str) -> Box<dyn ManualOperationProvider<String>> {
        Box::new(ManualOperation::new(field, move |_| Ok(value.to_string())))
    }

    #[test]
    fn test_registry_lookup() {
        let registry =
            ManualOperationRegistry::new(vec![constant("name", "custom"), constant("age", "x")])
                .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("name"));
        assert!(registry.get("missing").is_none());

        let param = BaseSearchParam::eq("name", "John");
        let fragment = registry.get("name").unwrap().build_operation(&param).unwrap();
        assert_eq!(fragment, "custom");
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let err = ManualOperationRegistry::new(vec![constant("name", "a"), constant("name", "b")])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateManualOperation {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn test_closure_sees_param() {
        let operation = ManualOperation::new("name", |param: &BaseSearchParam| {
            Ok(format!("{}:{}", param.name, param.operation_code()))
        });
        let param = BaseSearchParam::new("name", "like", "Jo");
        assert_eq!(operation.build_operation(&param).unwrap(), "name:like");
    }
}
