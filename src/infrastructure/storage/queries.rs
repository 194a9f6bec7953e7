pub(super) const SELECT_VALUE: &str = r#"
    SELECT value
    FROM local_store
    WHERE key = ?1
"#;

pub(super) const UPSERT_VALUE: &str = r#"
    INSERT INTO local_store (key, value, updated_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
"#;

pub(super) const INSERT_CHANGE: &str = r#"
    INSERT INTO store_changes (key, value, writer_id, changed_at)
    VALUES (?1, ?2, ?3, ?4)
"#;

pub(super) const SELECT_KEYS: &str = r#"
    SELECT key
    FROM local_store
    ORDER BY rowid
"#;

pub(super) const SELECT_LATEST_SEQ: &str = r#"
    SELECT COALESCE(MAX(seq), 0)
    FROM store_changes
"#;

pub(super) const SELECT_CHANGES_AFTER: &str = r#"
    SELECT seq, key, value, writer_id
    FROM store_changes
    WHERE seq > ?1
    ORDER BY seq ASC
    LIMIT ?2
"#;

pub(super) const PRUNE_CHANGES_THROUGH: &str = r#"
    DELETE FROM store_changes
    WHERE seq <= ?1
"#;
