/**
 * Roles Routes
 * The central credit-roles database (flat array file, typed records)
 */
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::models::CreditRole;
use crate::routes::{store_unavailable, ErrorResponse};
use crate::store;

#[derive(Debug, Deserialize)]
pub struct RolesRequest {
    pub action: String,
    #[serde(default)]
    pub role: RoleInput,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RoleInput {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum RolesActionError {
    DuplicateId,
    UnknownId,
}

/// Apply one roles mutation. Pure, so the duplicate/missing-id rules are
/// testable without a store.
pub fn apply_roles_action(
    mut roles: Vec<CreditRole>,
    action: &str,
    input: &RoleInput,
) -> Result<Vec<CreditRole>, RolesActionError> {
    match action {
        "add" => {
            if roles.iter().any(|role| role.id == input.id) {
                return Err(RolesActionError::DuplicateId);
            }
            let order = input.order.unwrap_or(roles.len() as i64 + 1);
            roles.push(CreditRole {
                id: input.id.clone(),
                name: input.name.clone(),
                category: input
                    .category
                    .clone()
                    .unwrap_or_else(|| "additional".to_string()),
                description: input.description.clone().unwrap_or_default(),
                order,
            });
        }
        "update" => {
            let role = roles
                .iter_mut()
                .find(|role| role.id == input.id)
                .ok_or(RolesActionError::UnknownId)?;
            role.name = input.name.clone();
            if let Some(category) = &input.category {
                role.category = category.clone();
            }
            if let Some(description) = &input.description {
                role.description = description.clone();
            }
            if let Some(order) = input.order {
                role.order = order;
            }
        }
        "delete" => {
            roles.retain(|role| role.id != input.id);
        }
        // Unknown actions fall through and write the list back unchanged.
        _ => {}
    }
    Ok(roles)
}

/// GET /api/admin/database/roles
pub async fn list_roles() -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    match store.read_as::<Vec<CreditRole>>("roles") {
        Ok(roles) => (StatusCode::OK, Json(roles)).into_response(),
        Err(store::StoreError::NotFound(_)) => {
            (StatusCode::OK, Json(Vec::<CreditRole>::new())).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to read roles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to load roles")),
            )
                .into_response()
        }
    }
}

/// POST /api/admin/database/roles - add/update/delete one role
pub async fn update_roles(Json(request): Json<RolesRequest>) -> impl IntoResponse {
    let store = match store::get_store() {
        Some(s) => s,
        None => return store_unavailable().into_response(),
    };

    // A missing or unreadable file starts from an empty list.
    let roles = store.read_as::<Vec<CreditRole>>("roles").unwrap_or_default();

    let roles = match apply_roles_action(roles, &request.action, &request.role) {
        Ok(roles) => roles,
        Err(RolesActionError::DuplicateId) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Role already exists")),
            )
                .into_response();
        }
        Err(RolesActionError::UnknownId) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Role not found")),
            )
                .into_response();
        }
    };

    let document = match serde_json::to_value(&roles) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("Failed to serialize roles: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update roles")),
            )
                .into_response();
        }
    };

    match store.write("roles", &document) {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true, "roles": roles }))).into_response(),
        Err(e) => {
            tracing::error!("Failed to write roles: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to update roles")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, name: &str) -> RoleInput {
        RoleInput {
            id: id.to_string(),
            name: name.to_string(),
            ..RoleInput::default()
        }
    }

    #[test]
    fn add_fills_defaults_and_orders_after_existing() {
        let roles = apply_roles_action(vec![], "add", &input("foley", "Foley")).unwrap();
        assert_eq!(roles[0].category, "additional");
        assert_eq!(roles[0].order, 1);

        let roles = apply_roles_action(roles, "add", &input("adr", "ADR")).unwrap();
        assert_eq!(roles[1].order, 2);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let roles = apply_roles_action(vec![], "add", &input("foley", "Foley")).unwrap();
        assert_eq!(
            apply_roles_action(roles, "add", &input("foley", "Foley Again")),
            Err(RolesActionError::DuplicateId)
        );
    }

    #[test]
    fn update_requires_an_existing_id() {
        assert_eq!(
            apply_roles_action(vec![], "update", &input("ghost", "Ghost")),
            Err(RolesActionError::UnknownId)
        );

        let roles = apply_roles_action(vec![], "add", &input("foley", "Foley")).unwrap();
        let mut update = input("foley", "Foley Artist");
        update.order = Some(7);
        let roles = apply_roles_action(roles, "update", &update).unwrap();
        assert_eq!(roles[0].name, "Foley Artist");
        assert_eq!(roles[0].order, 7);
        assert_eq!(roles[0].category, "additional");
    }

    #[test]
    fn delete_removes_by_id() {
        let roles = apply_roles_action(vec![], "add", &input("foley", "Foley")).unwrap();
        let roles = apply_roles_action(roles, "delete", &input("foley", "")).unwrap();
        assert!(roles.is_empty());
    }

    #[test]
    fn unknown_action_leaves_the_list_unchanged() {
        let roles = apply_roles_action(vec![], "add", &input("foley", "Foley")).unwrap();
        let same = apply_roles_action(roles.clone(), "rename", &input("foley", "X")).unwrap();
        assert_eq!(same, roles);
    }
}
