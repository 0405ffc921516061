//! User provisioning (spec §4.6 table, User rows).

use crate::ListResponse;
use chrono::Utc;
use identity_core::error::{IdentityError, Result};
use identity_core::ids::new_user_id;
use identity_core::model::{Email, Meta, PasswordVerifier, User, USER_SCHEMA};
use record_store::UserStore;
use serde::Deserialize;
use std::sync::Arc;
use token_service::hash_password;
use tracing::instrument;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_name: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub formatted_name: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub emails: Vec<Email>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub risk_score: i64,
    /// Plaintext password, hashed on write. Absent means the account has
    /// no password verifier (client-credential-only or seeded later).
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatchUserRequest {
    pub active: Option<bool>,
    pub department: Option<String>,
    pub risk_score: Option<i64>,
    pub emails: Option<Vec<Email>>,
    pub groups: Option<Vec<String>>,
}

pub struct UserService {
    store: Arc<UserStore>,
}

impl UserService {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, request), fields(user_name = %request.user_name))]
    pub fn create(&self, request: CreateUserRequest) -> Result<Arc<User>> {
        if request.user_name.trim().is_empty() {
            return Err(IdentityError::BadRequest {
                reason: "userName must not be empty".to_string(),
            });
        }
        for email in &request.emails {
            if email.value.trim().is_empty() {
                return Err(IdentityError::BadRequest {
                    reason: "email value must not be empty".to_string(),
                });
            }
        }
        if !(0..=100).contains(&request.risk_score) {
            return Err(IdentityError::BadRequest {
                reason: format!("riskScore must be within 0..=100, got {}", request.risk_score),
            });
        }

        let password = request
            .password
            .as_deref()
            .map(|raw| hash_password(raw).map(|hash| PasswordVerifier { hash }))
            .transpose()?;

        let now = Utc::now();
        let id = new_user_id();
        let user = User {
            schemas: vec![USER_SCHEMA.to_string()],
            id: id.clone(),
            user_name: request.user_name,
            given_name: request.given_name,
            family_name: request.family_name,
            formatted_name: request.formatted_name,
            active: request.active,
            emails: request.emails,
            groups: vec![],
            department: request.department,
            risk_score: request.risk_score,
            password,
            meta: Meta {
                resource_type: "User".to_string(),
                created: now,
                last_modified: now,
                location: format!("/scim/v2/Users/{id}"),
            },
        };

        self.store.insert_new(user, || IdentityError::Conflict {
            what: "userName".to_string(),
        })
    }

    pub fn get(&self, id: &str) -> Result<Arc<User>> {
        self.store.get(id).ok_or_else(|| IdentityError::NotFound {
            what: format!("user {id}"),
        })
    }

    pub fn list(&self, filter: Option<&str>) -> Result<ListResponse<Arc<User>>> {
        let resources = self.store.list(filter)?;
        Ok(ListResponse {
            schemas: vec![USER_SCHEMA.to_string()],
            total_results: resources.len(),
            resources,
        })
    }

    #[instrument(skip(self, patch))]
    pub fn patch(&self, id: &str, patch: PatchUserRequest) -> Result<Arc<User>> {
        let existing = self.get(id)?;
        let mut updated = (*existing).clone();

        if let Some(active) = patch.active {
            updated.active = active;
        }
        if let Some(department) = patch.department {
            updated.department = Some(department);
        }
        if let Some(risk_score) = patch.risk_score {
            updated.set_risk_score(risk_score)?;
        }
        if let Some(emails) = patch.emails {
            updated.emails = emails;
        }
        if let Some(groups) = patch.groups {
            updated.groups = groups;
        }
        updated.meta.last_modified = Utc::now();

        Ok(self.store.replace(updated))
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.store
            .delete(id)
            .map(|_| ())
            .ok_or_else(|| IdentityError::NotFound {
                what: format!("user {id}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> UserService {
        UserService::new(Arc::new(UserStore::new()))
    }

    #[test]
    fn create_assigns_a_prefixed_id_and_persists() {
        let service = service();
        let user = service
            .create(CreateUserRequest {
                user_name: "jdoe".to_string(),
                given_name: None,
                family_name: None,
                formatted_name: None,
                active: true,
                emails: vec![],
                department: None,
                risk_score: 0,
                password: None,
            })
            .unwrap();
        assert!(user.id.starts_with("usr_"));
        assert_eq!(service.get(&user.id).unwrap().user_name, "jdoe");
    }

    #[test]
    fn duplicate_user_name_is_a_conflict_and_store_is_unchanged() {
        let service = service();
        let req = |name: &str| CreateUserRequest {
            user_name: name.to_string(),
            given_name: None,
            family_name: None,
            formatted_name: None,
            active: true,
            emails: vec![],
            department: None,
            risk_score: 0,
            password: None,
        };
        service.create(req("jdoe")).unwrap();
        let err = service.create(req("jdoe")).unwrap_err();
        assert!(matches!(err, IdentityError::Conflict { .. }));
        assert_eq!(service.list(None).unwrap().total_results, 1);
    }

    #[test]
    fn patch_updates_risk_score_and_last_modified() {
        let service = service();
        let user = service
            .create(CreateUserRequest {
                user_name: "jdoe".to_string(),
                given_name: None,
                family_name: None,
                formatted_name: None,
                active: true,
                emails: vec![],
                department: None,
                risk_score: 0,
                password: None,
            })
            .unwrap();
        let created_at = user.meta.last_modified;

        let updated = service
            .patch(
                &user.id,
                PatchUserRequest {
                    risk_score: Some(75),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.risk_score, 75);
        assert!(updated.meta.last_modified >= created_at);
    }

    #[test]
    fn patch_rejects_out_of_range_risk_score() {
        let service = service();
        let user = service
            .create(CreateUserRequest {
                user_name: "jdoe".to_string(),
                given_name: None,
                family_name: None,
                formatted_name: None,
                active: true,
                emails: vec![],
                department: None,
                risk_score: 0,
                password: None,
            })
            .unwrap();
        let err = service
            .patch(
                &user.id,
                PatchUserRequest {
                    risk_score: Some(999),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, IdentityError::BadRequest { .. }));
    }

    #[test]
    fn get_missing_user_is_not_found() {
        let service = service();
        assert!(matches!(service.get("usr_missing").unwrap_err(), IdentityError::NotFound { .. }));
    }
}
