// [libs/infra/store/src/repositories/task/queries.rs]
/*!
 * =================================================================
 * APARATO: TASK DEFINITION SQL STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE SQL (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN DE SENTENCIAS PARA TAREAS PROGRAMABLES
 * =================================================================
 */

pub const INSERT_TASK: &str = r#"
    INSERT INTO tasks (
        id, name, cron_expression, feed_ids_json, enabled,
        webhook_url, headers, cookies, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
"#;

pub const FIND_TASK_BY_ID: &str = r#"
    SELECT id, name, cron_expression, feed_ids_json, enabled, webhook_url, headers, cookies
    FROM tasks WHERE id = ?1
"#;

pub const LIST_ALL_TASKS: &str = r#"
    SELECT id, name, cron_expression, feed_ids_json, enabled, webhook_url, headers, cookies
    FROM tasks ORDER BY created_at ASC
"#;

pub const LIST_ENABLED_TASKS: &str = r#"
    SELECT id, name, cron_expression, feed_ids_json, enabled, webhook_url, headers, cookies
    FROM tasks WHERE enabled = 1 ORDER BY created_at ASC
"#;

pub const SET_TASK_ENABLED: &str = r#"
    UPDATE tasks SET enabled = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1
"#;

pub const DELETE_TASK: &str = r#"
    DELETE FROM tasks WHERE id = ?1
"#;
