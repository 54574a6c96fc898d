//! View-based field projection for users.
//!
//! Each serialisable field of [`User`] is either untagged (present in every
//! response) or tagged with a view scope. A caller requesting a scope gets
//! the untagged fields plus that scope's fields; the password hash is
//! excluded from all scopes. The projection is an explicit transform
//! ([`User::to_view`]) rather than serializer-level filtering.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  authority::Authority,
  restaurant::Restaurant,
  user::{AccountState, User},
};

/// Which field subset a response exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewScope {
  /// Untagged fields only: identity, audit, email, name, authorities.
  #[default]
  Basic,
  /// Adds surname, account state, and the owned restaurant.
  User,
}

/// The serialisable projection of a [`User`] under a [`ViewScope`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
  pub id:          Uuid,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub email:       String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  pub authorities: BTreeSet<Authority>,

  // Scope-gated fields; absent entirely outside the `User` scope.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub surname:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub account_state: Option<AccountState>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub restaurant:    Option<Restaurant>,
}

impl User {
  /// Project this user for serialisation under `scope`.
  pub fn to_view(&self, scope: ViewScope) -> UserView {
    let gated = scope == ViewScope::User;
    UserView {
      id:          self.meta.id,
      created_at:  self.meta.created_at,
      updated_at:  self.meta.updated_at,
      email:       self.email.clone(),
      name:        self.name.clone(),
      authorities: self.authorities.clone(),

      surname:       if gated { self.surname.clone() } else { None },
      account_state: gated.then_some(self.account_state),
      restaurant:    if gated { self.restaurant.clone() } else { None },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::EntityMetadata;

  fn sample_user() -> User {
    User {
      meta:          EntityMetadata::new_now(),
      email:         "owner@example.com".into(),
      name:          Some("Jan".into()),
      surname:       Some("Kowalski".into()),
      password_hash: "$argon2id$v=19$secret".into(),
      account_state: AccountState::Active,
      restaurant:    None,
      authorities:   [Authority::from("ROLE_OWNER")].into(),
    }
  }

  #[test]
  fn no_scope_ever_exposes_the_password_hash() {
    let user = sample_user();
    for scope in [ViewScope::Basic, ViewScope::User] {
      let json = serde_json::to_string(&user.to_view(scope)).unwrap();
      assert!(!json.contains("password"), "{scope:?}: {json}");
      assert!(!json.contains("argon2"), "{scope:?}: {json}");
    }
  }

  #[test]
  fn basic_scope_omits_gated_fields() {
    let json =
      serde_json::to_value(sample_user().to_view(ViewScope::Basic)).unwrap();
    assert_eq!(json["email"], "owner@example.com");
    assert_eq!(json["name"], "Jan");
    assert!(json.get("surname").is_none());
    assert!(json.get("account_state").is_none());
    assert!(json.get("restaurant").is_none());
  }

  #[test]
  fn user_scope_includes_gated_fields() {
    let json =
      serde_json::to_value(sample_user().to_view(ViewScope::User)).unwrap();
    assert_eq!(json["surname"], "Kowalski");
    assert_eq!(json["account_state"], "active");
  }
}
