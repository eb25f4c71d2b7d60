//! SQL schema definitions.

/// Complete schema for the v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- DPR: household demographic particulars
-- ============================================================

CREATE TABLE IF NOT EXISTS dpr (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name_and_address TEXT NOT NULL,
    district TEXT NOT NULL,
    state TEXT NOT NULL,
    family_size INTEGER NOT NULL,
    income_group TEXT NOT NULL,
    centre_code TEXT NOT NULL,
    return_no TEXT NOT NULL,
    month_and_year TEXT NOT NULL,
    household_members TEXT NOT NULL DEFAULT '[]',
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    is_synced INTEGER NOT NULL DEFAULT 0,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_dpr_centre ON dpr(centre_code);
CREATE INDEX IF NOT EXISTS idx_dpr_unsynced ON dpr(is_synced);

-- ============================================================
-- MPR: monthly textile purchases
-- ============================================================

CREATE TABLE IF NOT EXISTS mpr (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name_and_address TEXT NOT NULL,
    district_state_tel TEXT NOT NULL,
    panel_centre TEXT NOT NULL,
    centre_code TEXT NOT NULL,
    return_no TEXT NOT NULL,
    family_size INTEGER NOT NULL,
    income_group TEXT NOT NULL,
    month_and_year TEXT NOT NULL,
    occupation_of_head TEXT NOT NULL,
    items TEXT NOT NULL DEFAULT '[]',
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    is_synced INTEGER NOT NULL DEFAULT 0,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_mpr_centre ON mpr(centre_code);
CREATE INDEX IF NOT EXISTS idx_mpr_unsynced ON mpr(is_synced);

-- ============================================================
-- FP: centre forwarding summaries
-- ============================================================

CREATE TABLE IF NOT EXISTS fp (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    centre_name TEXT NOT NULL,
    centre_code TEXT NOT NULL,
    panel_size INTEGER NOT NULL,
    mpr_collected INTEGER NOT NULL,
    not_collected INTEGER NOT NULL,
    with_purchase_data INTEGER NOT NULL,
    nil_mprs INTEGER NOT NULL,
    nil_serial_nos INTEGER NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    is_synced INTEGER NOT NULL DEFAULT 0,
    version INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_fp_centre ON fp(centre_code);
CREATE INDEX IF NOT EXISTS idx_fp_unsynced ON fp(is_synced);
"#;
