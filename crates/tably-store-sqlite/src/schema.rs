//! SQL schema for the Tably SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS restaurants (
    restaurant_id TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    name          TEXT NOT NULL,
    description   TEXT,
    active        INTEGER NOT NULL DEFAULT 1
);

-- Reference data; never owned by a user.
CREATE TABLE IF NOT EXISTS authorities (
    name TEXT PRIMARY KEY
);

-- email is written once at INSERT; no UPDATE statement touches the column.
-- restaurant_id is UNIQUE: a restaurant belongs to at most one user.
CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT,
    surname       TEXT,
    password_hash TEXT NOT NULL,
    account_state TEXT NOT NULL DEFAULT 'pending',
    restaurant_id TEXT UNIQUE REFERENCES restaurants(restaurant_id)
);

CREATE TABLE IF NOT EXISTS user_authority (
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    authority TEXT NOT NULL REFERENCES authorities(name),
    PRIMARY KEY (user_id, authority)
);

CREATE INDEX IF NOT EXISTS users_email_idx ON users(email);

PRAGMA user_version = 1;
";
