//! v001: users, projects, bids, milestones, subscriptions, wallet trail.

use rusqlite::Connection;

use lancer_core::errors::StorageError;

pub fn migrate(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE users (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            username              TEXT NOT NULL UNIQUE,
            email                 TEXT NOT NULL UNIQUE,
            role                  TEXT NOT NULL,
            full_name             TEXT,
            skills                TEXT,
            category              TEXT,
            location              TEXT,
            hourly_rate_cents     INTEGER NOT NULL DEFAULT 0,
            wallet_balance_cents  INTEGER NOT NULL DEFAULT 0
                                  CHECK (wallet_balance_cents >= 0),
            performance_score     REAL NOT NULL DEFAULT 5.0,
            completed_projects    INTEGER NOT NULL DEFAULT 0,
            is_active             INTEGER NOT NULL DEFAULT 1,
            is_verified           INTEGER NOT NULL DEFAULT 0,
            created_at            TEXT NOT NULL,
            updated_at            TEXT NOT NULL
        );

        CREATE TABLE projects (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id               INTEGER NOT NULL REFERENCES users(id),
            title                   TEXT NOT NULL,
            description             TEXT NOT NULL,
            category                TEXT,
            skills_required         TEXT,
            budget_min_cents        INTEGER NOT NULL DEFAULT 0,
            budget_max_cents        INTEGER NOT NULL DEFAULT 0,
            deadline                TEXT,
            status                  TEXT NOT NULL,
            assigned_freelancer_id  INTEGER REFERENCES users(id),
            created_at              TEXT NOT NULL
        );
        CREATE INDEX idx_projects_status ON projects(status);
        CREATE INDEX idx_projects_client ON projects(client_id);

        CREATE TABLE bids (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id     INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            freelancer_id  INTEGER NOT NULL REFERENCES users(id),
            amount_cents   INTEGER NOT NULL,
            delivery_days  INTEGER NOT NULL,
            proposal       TEXT NOT NULL,
            status         TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );
        CREATE INDEX idx_bids_project ON bids(project_id);
        CREATE INDEX idx_bids_freelancer ON bids(freelancer_id);
        -- At most one non-withdrawn bid per (project, freelancer).
        CREATE UNIQUE INDEX idx_bids_open_unique
            ON bids(project_id, freelancer_id)
            WHERE status != 'WITHDRAWN';

        CREATE TABLE milestones (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id       INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            title            TEXT NOT NULL,
            amount_cents     INTEGER NOT NULL,
            order_index      INTEGER NOT NULL,
            status           TEXT NOT NULL,
            client_feedback  TEXT,
            created_at       TEXT NOT NULL,
            UNIQUE (project_id, order_index)
        );
        CREATE INDEX idx_milestones_project ON milestones(project_id);

        CREATE TABLE subscriptions (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id               INTEGER NOT NULL REFERENCES users(id),
            plan                  TEXT NOT NULL,
            status                TEXT NOT NULL,
            payment_method        TEXT,
            amount_paid_cents     INTEGER NOT NULL DEFAULT 0,
            auto_renew            INTEGER NOT NULL DEFAULT 0,
            start_date            TEXT NOT NULL,
            next_billing_date     TEXT NOT NULL,
            bids_used_this_cycle  INTEGER NOT NULL DEFAULT 0,
            invoice_number        TEXT NOT NULL UNIQUE,
            transaction_id        TEXT NOT NULL UNIQUE,
            created_at            TEXT NOT NULL
        );
        -- At most one ACTIVE subscription per user.
        CREATE UNIQUE INDEX idx_subscriptions_one_active
            ON subscriptions(user_id)
            WHERE status = 'ACTIVE';

        CREATE TABLE wallet_transactions (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id),
            amount_cents  INTEGER NOT NULL,
            kind          TEXT NOT NULL,
            description   TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );
        CREATE INDEX idx_wallet_tx_user ON wallet_transactions(user_id, id);",
    )
    .map_err(StorageError::sqlite)
}
