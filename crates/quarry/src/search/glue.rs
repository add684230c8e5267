//! AND/OR combination of predicate fragments.

use serde_json::{Value, json};

use crate::core::OperationProvider;
use crate::types::GlueOperation;

impl GlueOperation {
    /// Combines fragments with this glue.
    ///
    /// No fragments yields the backend's match-all fragment and a single
    /// fragment is returned as is. Input order is preserved in the result.
    pub fn combine<P: OperationProvider>(
        self,
        provider: &P,
        mut fragments: Vec<P::Fragment>,
    ) -> P::Fragment {
        if fragments.len() <= 1 {
            return fragments.pop().unwrap_or_else(|| provider.find_all());
        }

        tracing::trace!(glue = %self, count = fragments.len(), "Combining fragments");
        match self {
            GlueOperation::And => provider.and(fragments),
            GlueOperation::Or => provider.or(fragments),
        }
    }

    /// Combines raw document criteria with this glue.
    ///
    /// No criteria yields `{}` (matches every document).
    pub fn glue_criteria(self, mut criteria: Vec<Value>) -> Value {
        if criteria.len() <= 1 {
            return criteria.pop().unwrap_or_else(|| json!({}));
        }

        match self {
            GlueOperation::And => json!({ "$and": criteria }),
            GlueOperation::Or => json!({ "$or": criteria }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glue_criteria() {
        assert_eq!(GlueOperation::And.glue_criteria(vec![]), json!({}));
        assert_eq!(GlueOperation::Or.glue_criteria(vec![]), json!({}));
        assert_eq!(
            GlueOperation::Or.glue_criteria(vec![json!({"a": 1})]),
            json!({"a": 1})
        );
        assert_eq!(
            GlueOperation::Or.glue_criteria(vec![json!({"a": 1}), json!({"b": 2})]),
            json!({"$or": [{"a": 1}, {"b": 2}]})
        );
        assert_eq!(
            GlueOperation::And.glue_criteria(vec![json!({"a": 1}), json!({"b": 2})]),
            json!({"$and": [{"a": 1}, {"b": 2}]})
        );
    }
}
