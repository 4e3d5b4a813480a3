//! SQL schema for the Cohort SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS study_environments (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participant_users (
    id          TEXT PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL,
    last_login  TEXT
);

CREATE TABLE IF NOT EXISTS profiles (
    id            TEXT PRIMARY KEY,
    given_name    TEXT,
    family_name   TEXT,
    contact_email TEXT,
    phone_number  TEXT,
    birth_date    TEXT,             -- YYYY-MM-DD
    sex_at_birth  TEXT,
    do_not_email  INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS enrollees (
    id                   TEXT PRIMARY KEY,
    shortcode            TEXT NOT NULL UNIQUE,
    study_environment_id TEXT NOT NULL REFERENCES study_environments(id),
    participant_user_id  TEXT NOT NULL REFERENCES participant_users(id),
    profile_id           TEXT REFERENCES profiles(id),
    consented            INTEGER NOT NULL DEFAULT 0,
    created_at           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS participant_tasks (
    id               TEXT PRIMARY KEY,
    enrollee_id      TEXT NOT NULL REFERENCES enrollees(id),
    target_stable_id TEXT NOT NULL,
    status           TEXT NOT NULL,  -- 'NEW' | 'VIEWED' | 'IN_PROGRESS' | 'COMPLETE' | 'REJECTED'
    task_type        TEXT NOT NULL,  -- 'CONSENT' | 'SURVEY' | 'KIT_REQUEST'
    created_at       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS kit_requests (
    id          TEXT PRIMARY KEY,
    enrollee_id TEXT NOT NULL REFERENCES enrollees(id),
    kit_type    TEXT NOT NULL,
    status      TEXT NOT NULL,       -- 'CREATED' | 'SENT' | 'RECEIVED' | 'ERRORED'
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS enrollees_env_idx      ON enrollees(study_environment_id);
CREATE INDEX IF NOT EXISTS tasks_enrollee_idx     ON participant_tasks(enrollee_id, target_stable_id);
CREATE INDEX IF NOT EXISTS kit_requests_recent_idx ON kit_requests(enrollee_id, created_at);

PRAGMA user_version = 1;
";
