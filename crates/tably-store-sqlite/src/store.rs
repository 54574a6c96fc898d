//! [`SqliteStore`] — the SQLite implementation of [`DirectoryStore`].

use std::{collections::BTreeSet, path::Path};

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use tably_core::{
  authority::Authority,
  entity::EntityMetadata,
  restaurant::{NewRestaurant, Restaurant},
  store::DirectoryStore,
  user::{NewUser, User, UserUpdate},
};

use crate::{
  Error, Result,
  encode::{
    RawRestaurant, RawUser, encode_account_state, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn query_restaurant(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawRestaurant>> {
  conn
    .query_row(
      "SELECT restaurant_id, created_at, updated_at, name, description, active
       FROM restaurants WHERE restaurant_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok(RawRestaurant {
          restaurant_id: row.get(0)?,
          created_at:    row.get(1)?,
          updated_at:    row.get(2)?,
          name:          row.get(3)?,
          description:   row.get(4)?,
          active:        row.get(5)?,
        })
      },
    )
    .optional()
}

fn query_authorities(
  conn: &rusqlite::Connection,
  user_id_str: &str,
) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(
    "SELECT authority FROM user_authority WHERE user_id = ?1 ORDER BY authority",
  )?;
  let names = stmt
    .query_map(rusqlite::params![user_id_str], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(names)
}

/// Read a user row plus its eagerly-joined restaurant and authority set.
fn query_user(
  conn: &rusqlite::Connection,
  id_str: &str,
) -> rusqlite::Result<Option<RawUser>> {
  let base = conn
    .query_row(
      "SELECT user_id, created_at, updated_at, email, name, surname,
              password_hash, account_state, restaurant_id
       FROM users WHERE user_id = ?1",
      rusqlite::params![id_str],
      |row| {
        Ok((
          RawUser {
            user_id:       row.get(0)?,
            created_at:    row.get(1)?,
            updated_at:    row.get(2)?,
            email:         row.get(3)?,
            name:          row.get(4)?,
            surname:       row.get(5)?,
            password_hash: row.get(6)?,
            account_state: row.get(7)?,
            restaurant:    None,
            authorities:   Vec::new(),
          },
          row.get::<_, Option<String>>(8)?,
        ))
      },
    )
    .optional()?;

  let Some((mut raw, restaurant_id)) = base else {
    return Ok(None);
  };

  if let Some(rid) = restaurant_id {
    raw.restaurant = query_restaurant(conn, &rid)?;
  }
  raw.authorities = query_authorities(conn, id_str)?;

  Ok(Some(raw))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tably directory store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The
/// connection's worker thread serialises all database access, so each store
/// operation is atomic with respect to the others.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a user or fail with [`Error::UserNotFound`].
  async fn require_user(&self, id: Uuid) -> Result<User> {
    self
      .get_user(id)
      .await?
      .ok_or(Error::UserNotFound(id))
  }
}

// ─── DirectoryStore impl ─────────────────────────────────────────────────────

impl DirectoryStore for SqliteStore {
  type Error = Error;

  // ── Restaurants ───────────────────────────────────────────────────────────

  async fn add_restaurant(&self, input: NewRestaurant) -> Result<Restaurant> {
    let restaurant = Restaurant {
      meta:        EntityMetadata::new_now(),
      name:        input.name,
      description: input.description,
      active:      input.active,
    };

    let id_str      = encode_uuid(restaurant.meta.id);
    let created_str = encode_dt(restaurant.meta.created_at);
    let updated_str = encode_dt(restaurant.meta.updated_at);
    let name        = restaurant.name.clone();
    let description = restaurant.description.clone();
    let active      = restaurant.active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO restaurants
             (restaurant_id, created_at, updated_at, name, description, active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            created_str,
            updated_str,
            name,
            description,
            active
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(restaurant)
  }

  async fn get_restaurant(&self, id: Uuid) -> Result<Option<Restaurant>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawRestaurant> = self
      .conn
      .call(move |conn| Ok(query_restaurant(conn, &id_str)?))
      .await?;

    raw.map(RawRestaurant::into_restaurant).transpose()
  }

  async fn list_restaurants(&self) -> Result<Vec<Restaurant>> {
    let raws: Vec<RawRestaurant> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT restaurant_id, created_at, updated_at, name, description,
                  active
           FROM restaurants",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawRestaurant {
              restaurant_id: row.get(0)?,
              created_at:    row.get(1)?,
              updated_at:    row.get(2)?,
              name:          row.get(3)?,
              description:   row.get(4)?,
              active:        row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRestaurant::into_restaurant)
      .collect()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let restaurant = input.restaurant.map(|r| Restaurant {
      meta:        EntityMetadata::new_now(),
      name:        r.name,
      description: r.description,
      active:      r.active,
    });

    let user = User {
      meta:          EntityMetadata::new_now(),
      email:         input.email,
      name:          input.name,
      surname:       input.surname,
      password_hash: input.password_hash,
      account_state: input.account_state,
      restaurant,
      authorities:   input.authorities.into_iter().collect::<BTreeSet<_>>(),
    };

    let user_id_str   = encode_uuid(user.meta.id);
    let created_str   = encode_dt(user.meta.created_at);
    let updated_str   = encode_dt(user.meta.updated_at);
    let email         = user.email.clone();
    let name          = user.name.clone();
    let surname       = user.surname.clone();
    let password_hash = user.password_hash.clone();
    let state_str     = encode_account_state(user.account_state);
    let restaurant_row = user.restaurant.as_ref().map(|r| {
      (
        encode_uuid(r.meta.id),
        encode_dt(r.meta.created_at),
        encode_dt(r.meta.updated_at),
        r.name.clone(),
        r.description.clone(),
        r.active,
      )
    });
    let authority_names: Vec<String> =
      user.authorities.iter().map(|a| a.name().to_owned()).collect();

    // One transaction: cascading restaurant insert, user insert, grants.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let restaurant_id_str =
          restaurant_row.as_ref().map(|(id, ..)| id.clone());

        if let Some((id, created, updated, name, description, active)) =
          restaurant_row
        {
          tx.execute(
            "INSERT INTO restaurants
               (restaurant_id, created_at, updated_at, name, description,
                active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![id, created, updated, name, description, active],
          )?;
        }

        tx.execute(
          "INSERT INTO users
             (user_id, created_at, updated_at, email, name, surname,
              password_hash, account_state, restaurant_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            user_id_str,
            created_str,
            updated_str,
            email,
            name,
            surname,
            password_hash,
            state_str,
            restaurant_id_str,
          ],
        )?;

        for authority in &authority_names {
          tx.execute(
            "INSERT OR IGNORE INTO authorities (name) VALUES (?1)",
            rusqlite::params![authority],
          )?;
          tx.execute(
            "INSERT OR IGNORE INTO user_authority (user_id, authority)
             VALUES (?1, ?2)",
            rusqlite::params![user_id_str, authority],
          )?;
        }

        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| Ok(query_user(conn, &id_str)?))
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User> {
    let User {
      meta,
      email,
      name,
      surname,
      password_hash,
      account_state,
      restaurant,
      authorities,
    } = self.require_user(id).await?;

    // The email column is immutable after INSERT; the UPDATE below never
    // writes it, and a payload naming a different address is rejected here.
    if let Some(requested) = &update.email
      && requested != &email
    {
      return Err(Error::EmailImmutable);
    }

    let updated = User {
      meta: EntityMetadata { updated_at: chrono::Utc::now(), ..meta },
      email,
      name: update.name.or(name),
      surname: update.surname.or(surname),
      password_hash,
      account_state: update.account_state.unwrap_or(account_state),
      restaurant,
      authorities,
    };

    let id_str      = encode_uuid(id);
    let updated_str = encode_dt(updated.meta.updated_at);
    let name        = updated.name.clone();
    let surname     = updated.surname.clone();
    let state_str   = encode_account_state(updated.account_state);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users
           SET updated_at = ?2, name = ?3, surname = ?4, account_state = ?5
           WHERE user_id = ?1",
          rusqlite::params![id_str, updated_str, name, surname, state_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(updated)
  }

  // ── Authorities ───────────────────────────────────────────────────────────

  async fn add_authority(&self, name: String) -> Result<Authority> {
    let name_param = name.clone();
    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO authorities (name) VALUES (?1)",
          rusqlite::params![name_param],
        )?;
        Ok(())
      })
      .await;

    match result.map_err(Error::from) {
      Ok(()) => Ok(Authority::new(name)),
      Err(Error::Constraint(_)) => Err(Error::DuplicateAuthority(name)),
      Err(other) => Err(other),
    }
  }

  async fn list_authorities(&self) -> Result<Vec<Authority>> {
    let names: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT name FROM authorities ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(names.into_iter().map(Authority::new).collect())
  }

  async fn grant_authority(
    &self,
    user_id: Uuid,
    authority: Authority,
  ) -> Result<User> {
    // Existence check first so a bad id is a not-found, not an FK failure.
    self.require_user(user_id).await?;

    let id_str = encode_uuid(user_id);
    let name   = authority.name().to_owned();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT OR IGNORE INTO authorities (name) VALUES (?1)",
          rusqlite::params![name],
        )?;
        tx.execute(
          "INSERT OR IGNORE INTO user_authority (user_id, authority)
           VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    self.require_user(user_id).await
  }

  async fn revoke_authority(
    &self,
    user_id: Uuid,
    authority: Authority,
  ) -> Result<User> {
    self.require_user(user_id).await?;

    let id_str = encode_uuid(user_id);
    let name   = authority.name().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM user_authority WHERE user_id = ?1 AND authority = ?2",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    self.require_user(user_id).await
  }
}
