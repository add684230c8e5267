//! Request shells.
//!
//! A request arrives either as one flat list of conditions
//! ([`CommonOperationShell`]) or as a list of groups joined by an external
//! glue ([`MultipleOperationShell`]). Both may carry paging.

use serde::{Deserialize, Serialize};

use super::{BaseSearchParam, ComplexSearchParam, GlueOperation, PageAttribute};

/// A flat list of conditions with one glue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonOperationShell {
    /// The conditions, in order.
    #[serde(default)]
    pub base_search_params: Vec<BaseSearchParam>,

    /// How the conditions are joined.
    #[serde(default)]
    pub glue: GlueOperation,

    /// Requested paging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_attribute: Option<PageAttribute>,
}

impl CommonOperationShell {
    /// Creates a shell without paging.
    pub fn new(base_search_params: Vec<BaseSearchParam>, glue: GlueOperation) -> Self {
        Self {
            base_search_params,
            glue,
            page_attribute: None,
        }
    }

    /// Sets the page attribute.
    pub fn with_page(mut self, page_attribute: PageAttribute) -> Self {
        self.page_attribute = Some(page_attribute);
        self
    }
}

/// Groups of conditions joined by an external glue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleOperationShell {
    /// The groups, in order.
    #[serde(default)]
    pub search: Vec<ComplexSearchParam>,

    /// How the groups are joined.
    #[serde(default)]
    pub external_glue: GlueOperation,

    /// Requested paging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_attribute: Option<PageAttribute>,
}

impl MultipleOperationShell {
    /// Creates a shell without paging.
    pub fn new(search: Vec<ComplexSearchParam>, external_glue: GlueOperation) -> Self {
        Self {
            search,
            external_glue,
            page_attribute: None,
        }
    }

    /// Sets the page attribute.
    pub fn with_page(mut self, page_attribute: PageAttribute) -> Self {
        self.page_attribute = Some(page_attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_common_shell_defaults() {
        let shell: CommonOperationShell = serde_json::from_value(json!({
            "baseSearchParams": [{"name": "status", "value": "active", "operation": "eq"}]
        }))
        .unwrap();

        assert_eq!(shell.glue, GlueOperation::And);
        assert!(shell.page_attribute.is_none());
        assert_eq!(shell.base_search_params[0].name, "status");
    }

    #[test]
    fn test_multiple_shell() {
        let shell: MultipleOperationShell = serde_json::from_value(json!({
            "search": [
                {"baseSearchParams": [{"name": "a", "value": 1}], "internalGlue": "OR"},
                {"baseSearchParams": [{"name": "b", "value": 2}]}
            ],
            "externalGlue": "OR",
            "pageAttribute": {"limit": 10}
        }))
        .unwrap();

        assert_eq!(shell.search.len(), 2);
        assert_eq!(shell.external_glue, GlueOperation::Or);
        assert_eq!(shell.search[0].internal_glue, GlueOperation::Or);
        assert_eq!(shell.search[1].internal_glue, GlueOperation::And);
        assert_eq!(shell.page_attribute.unwrap().limit, Some(10));
    }
}
