//! Cross-tenant accessor fan-out with not-found suppression.

use std::collections::HashMap;

use serde_json::Value;

use crate::api::TenantScope;
use crate::error::ApiError;
use crate::handle::Handle;
use crate::service::ServiceType;

/// Aggregated inventory keyed by the requested attribute's value.
pub type ResourceMap = HashMap<String, Value>;

impl Handle {
    /// Invoke `accessor` on every accessible tenant's `service` session and
    /// merge the entities into one map keyed by `key_attribute`.
    ///
    /// A tenant whose service answers not-found contributes nothing; that
    /// covers both the accessor call and the realization of its result,
    /// since some backends defer the request until enumeration. Any other
    /// failure aborts the whole aggregation, and a failure of tenant
    /// discovery itself propagates unmodified.
    ///
    /// Scopes are processed in enumerator order; on a key collision the
    /// later tenant's entity replaces the earlier one. An empty map is a
    /// valid outcome.
    ///
    /// # Errors
    ///
    /// Tenant-discovery failures, any non-not-found accessor failure, and
    /// [`ApiError::InvalidResponse`] for an entity without a usable
    /// `key_attribute` value.
    pub async fn collect_for_accessible_tenants(
        &self,
        service: ServiceType,
        accessor: &str,
        key_attribute: &str,
    ) -> Result<ResourceMap, ApiError> {
        let scopes = self.enumerator().accessible_scopes(service).await?;
        collect_scoped(&scopes, service, accessor, key_attribute).await
    }
}

/// Aggregation over pre-enumerated scopes; see
/// [`Handle::collect_for_accessible_tenants`] for the failure policy.
///
/// # Errors
///
/// Any non-not-found accessor failure, and [`ApiError::InvalidResponse`]
/// for an entity without a usable `key_attribute` value.
pub async fn collect_scoped(
    scopes: &[TenantScope],
    service: ServiceType,
    accessor: &str,
    key_attribute: &str,
) -> Result<ResourceMap, ApiError> {
    let mut merged = ResourceMap::new();
    for scope in scopes {
        let entities = match tenant_entities(scope, accessor).await {
            Ok(entities) => entities,
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    service = %service,
                    accessor,
                    project = %scope.project.id,
                    error = %err,
                    "service not available for tenant, skipping"
                );
                continue;
            }
            Err(err) => return Err(err),
        };
        for entity in entities {
            let key = entity_key(&entity, key_attribute)?;
            merged.insert(key, entity);
        }
    }
    Ok(merged)
}

/// Accessor call and realization share one not-found guard.
async fn tenant_entities(scope: &TenantScope, accessor: &str) -> Result<Vec<Value>, ApiError> {
    scope.service.invoke(accessor).await?.realize().await
}

/// Stringify the merge key of one entity.
///
/// Strings are used verbatim, numbers and booleans via their canonical
/// text form. A missing, null, or composite value is an error: silently
/// dropping such an entity would hide data loss from the caller.
fn entity_key(entity: &Value, key_attribute: &str) -> Result<String, ApiError> {
    match entity.get(key_attribute) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) | None => Err(ApiError::invalid_response(format!(
            "entity has no usable '{key_attribute}' attribute"
        ))),
    }
}
