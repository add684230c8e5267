//! Request-level predicate and page building.

use std::fmt;

use crate::config::EngineConfig;
use crate::core::OperationProvider;
use crate::error::{FilterResult, OperationError, ValidationError};
use crate::search::{
    ManualOperationRegistry, NestedOperation, OperationProcess, OperationType, resolve_sort,
};
use crate::types::{
    BaseSearchParam, CommonOperationShell, ComplexSearchParam, GlueOperation,
    MultipleOperationShell, PageAttribute, PageRequest,
};

/// The output of building a whole request shell.
#[derive(Debug, Clone)]
pub struct SearchPlan<F> {
    /// The combined predicate fragment.
    pub predicate: F,
    /// The resolved page descriptor.
    pub page: PageRequest,
}

/// Builds predicates and page descriptors for one backend.
///
/// Parameters are resolved in this order:
///
/// 1. paging codes (`limit`, `offset`, `sortBy`) are skipped;
/// 2. a manual override registered for the field is used exclusively;
/// 3. a code carrying the nesting marker builds a subquery comparison;
/// 4. any other code is dispatched through [`OperationType`].
///
/// The service holds no mutable state and can be shared between threads
/// when the provider can.
pub struct OperationService<P: OperationProvider> {
    provider: P,
    config: EngineConfig,
    manual_operations: ManualOperationRegistry<P::Fragment>,
}

impl<P: OperationProvider> OperationService<P> {
    /// Creates a service with the default configuration and no overrides.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: EngineConfig::default(),
            manual_operations: ManualOperationRegistry::empty(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the manual override registry.
    pub fn with_manual_operations(mut self, registry: ManualOperationRegistry<P::Fragment>) -> Self {
        self.manual_operations = registry;
        self
    }

    /// Returns the backend provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the fragment of a flat parameter list joined by `glue`.
    ///
    /// An empty list matches everything.
    pub fn build_base_by_params(
        &self,
        params: &[BaseSearchParam],
        glue: GlueOperation,
    ) -> FilterResult<P::Fragment> {
        self.build_group(params, glue, 0)
    }

    /// Builds the fragment of several groups joined by `external_glue`.
    ///
    /// Each group is joined by its own internal glue first. An empty list
    /// matches everything.
    pub fn build_complex_by_params(
        &self,
        groups: &[ComplexSearchParam],
        external_glue: GlueOperation,
    ) -> FilterResult<P::Fragment> {
        let fragments = groups
            .iter()
            .map(|group| self.build_group(&group.base_search_params, group.internal_glue, 0))
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(external_glue.combine(&self.provider, fragments))
    }

    /// Resolves a page descriptor against the sortable fields.
    ///
    /// Missing fields take the configured defaults.
    pub fn build_page_settings<S: AsRef<str>>(
        &self,
        page_attribute: Option<&PageAttribute>,
        sort_fields: &[S],
    ) -> FilterResult<PageRequest> {
        let (offset, limit, sort_by) = match page_attribute {
            Some(page) => (page.offset, page.limit, page.sort_by.as_deref()),
            None => (None, None, None),
        };

        let orders = resolve_sort(sort_fields, sort_by)?;
        let page = PageRequest::new(
            offset.unwrap_or(self.config.default_offset),
            limit.unwrap_or(self.config.default_limit),
            orders,
        );

        tracing::debug!(
            offset = page.offset,
            limit = page.limit,
            orders = page.orders.len(),
            "Resolved page settings"
        );
        Ok(page)
    }

    /// Builds the predicate and page of a flat request shell.
    ///
    /// Paging codes in the parameter list fill whatever the shell's page
    /// attribute leaves out.
    pub fn build_common<S: AsRef<str>>(
        &self,
        shell: &CommonOperationShell,
        sort_fields: &[S],
    ) -> FilterResult<SearchPlan<P::Fragment>> {
        let predicate = self.build_base_by_params(&shell.base_search_params, shell.glue)?;
        let page_attribute = merge_page_attribute(
            shell.page_attribute.clone(),
            PageAttribute::from_params(&shell.base_search_params)?,
        );
        let page = self.build_page_settings(page_attribute.as_ref(), sort_fields)?;

        Ok(SearchPlan { predicate, page })
    }

    /// Builds the predicate and page of a grouped request shell.
    pub fn build_multiple<S: AsRef<str>>(
        &self,
        shell: &MultipleOperationShell,
        sort_fields: &[S],
    ) -> FilterResult<SearchPlan<P::Fragment>> {
        let predicate = self.build_complex_by_params(&shell.search, shell.external_glue)?;

        let mut from_params: Option<PageAttribute> = None;
        for group in &shell.search {
            from_params = merge_page_attribute(
                from_params,
                PageAttribute::from_params(&group.base_search_params)?,
            );
        }
        let page_attribute = merge_page_attribute(shell.page_attribute.clone(), from_params);
        let page = self.build_page_settings(page_attribute.as_ref(), sort_fields)?;

        Ok(SearchPlan { predicate, page })
    }

    fn build_group(
        &self,
        params: &[BaseSearchParam],
        glue: GlueOperation,
        depth: usize,
    ) -> FilterResult<P::Fragment> {
        let mut fragments = Vec::with_capacity(params.len());
        for param in params {
            if let Some(fragment) = self.build_operation(param, depth)? {
                fragments.push(fragment);
            }
        }

        Ok(glue.combine(&self.provider, fragments))
    }

    /// Builds one parameter; paging parameters yield `None`.
    fn build_operation(
        &self,
        param: &BaseSearchParam,
        depth: usize,
    ) -> FilterResult<Option<P::Fragment>> {
        let code = param.operation_code();

        if let Ok(operation) = OperationType::of(code)
            && operation.process() == OperationProcess::Paging
        {
            return Ok(None);
        }

        if let Some(manual) = self.manual_operations.get(&param.name) {
            tracing::debug!(field = %param.name, "Using manual operation");
            return manual.build_operation(param).map(Some);
        }

        if let Some(nested_code) = self.config.strip_nested_marker(code) {
            return self.build_nested(param, nested_code, depth).map(Some);
        }

        let operation = OperationType::of(code)?;
        let build = operation
            .operation::<P>()
            .ok_or_else(|| OperationError::PagingOperation {
                code: operation.code().to_string(),
            })?;

        tracing::debug!(
            field = %param.name,
            operation = %operation,
            backend = self.provider.backend_name(),
            "Building operation"
        );
        build(&self.provider, param).map(Some)
    }

    fn build_nested(
        &self,
        param: &BaseSearchParam,
        code: &str,
        depth: usize,
    ) -> FilterResult<P::Fragment> {
        let operation = NestedOperation::of(code)?;

        let depth = depth + 1;
        if depth > self.config.max_nesting_depth {
            return Err(OperationError::NestingTooDeep {
                depth,
                max: self.config.max_nesting_depth,
            }
            .into());
        }

        let group = match (&param.value, operation) {
            (_, NestedOperation::IsNull) => ComplexSearchParam::default(),
            (Some(value), _) => value.to_group(&param.name)?,
            (None, _) => {
                return Err(ValidationError::MalformedNestedValue {
                    parameter: param.name.clone(),
                    message: "missing filter group".to_string(),
                }
                .into());
            }
        };

        tracing::debug!(
            field = %param.name,
            operation = %operation,
            depth,
            "Building nested operation"
        );

        let subquery = self.build_group(&group.base_search_params, group.internal_glue, depth)?;
        self.provider.nested(&param.name, operation, subquery)
    }
}

/// Lets explicit fields win over ones collected from parameters.
fn merge_page_attribute(
    explicit: Option<PageAttribute>,
    fallback: Option<PageAttribute>,
) -> Option<PageAttribute> {
    match (explicit, fallback) {
        (Some(explicit), Some(fallback)) => Some(explicit.or(fallback)),
        (explicit, fallback) => explicit.or(fallback),
    }
}

impl<P> fmt::Debug for OperationService<P>
where
    P: OperationProvider + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationService")
            .field("provider", &self.provider)
            .field("config", &self.config)
            .field("manual_operations", &self.manual_operations)
            .finish()
    }
}
