// [libs/infra/store/src/repositories/allocation/queries.rs]
/*!
 * =================================================================
 * APARATO: DISPATCH LEDGER SQL STORE (V1.0)
 * CLASIFICACIÓN: INFRASTRUCTURE SQL (ESTRATO L3)
 * RESPONSABILIDAD: DEFINICIÓN DE SENTENCIAS ATÓMICAS PARA ALLOCATIONS
 *
 * # Mathematical Proof (ACID Consistency):
 * Las consultas utilizan guardias de estado (WHERE status = 'pending')
 * para garantizar que la transición de propiedad sea una operación
 * atómica indivisible: la fila candidata se vuelve a comprobar en el
 * UPDATE que la reclama, de forma que dos transacciones concurrentes
 * nunca puedan reclamar la misma allocation.
 * =================================================================
 */

pub const INSERT_PENDING_ALLOCATION: &str = r#"
    INSERT INTO allocations (
        id, task_id, task_name_snapshot, cron_snapshot, node_id, feed_ids_json,
        status, dispatched_at, schedule_run_id, article_count, new_article_count
    ) VALUES (?1, ?2, ?3, ?4, NULL, ?5, 'pending', ?6, ?7, 0, 0)
"#;

pub const FIND_OLDEST_PENDING: &str = r#"
    SELECT id FROM allocations
    WHERE status = 'pending' AND node_id IS NULL
    ORDER BY dispatched_at ASC
    LIMIT 1
"#;

pub const CLAIM_ALLOCATION: &str = r#"
    UPDATE allocations
    SET status = 'claimed', node_id = ?2, claimed_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND status = 'pending' AND node_id IS NULL
"#;

pub const FIND_ALLOCATION_BY_ID: &str = r#"
    SELECT id, task_id, task_name_snapshot, cron_snapshot, node_id, feed_ids_json,
           status, result_summary_json, error_message, dispatched_at, claimed_at,
           started_at, completed_at, schedule_run_id, article_count, new_article_count
    FROM allocations WHERE id = ?1
"#;

pub const SET_STATUS_EXECUTING: &str = r#"
    UPDATE allocations
    SET status = 'executing', started_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND node_id = ?2 AND status = 'claimed'
"#;

pub const SET_STATUS_FAILED: &str = r#"
    UPDATE allocations
    SET status = 'failed', error_message = ?3, completed_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND node_id = ?2 AND status = 'executing'
"#;

/// Rollback path for a claim whose task definition vanished or was
/// disabled between dispatch and claim. Guarded on `status = 'claimed'`
/// since the worker never reached `executing` for this allocation.
pub const FAIL_CLAIMED_ALLOCATION: &str = r#"
    UPDATE allocations
    SET status = 'failed', error_message = ?3, completed_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND node_id = ?2 AND status = 'claimed'
"#;

pub const RECORD_NEW_ARTICLES: &str = r#"
    UPDATE allocations
    SET new_article_count = new_article_count + ?3
    WHERE id = ?1 AND node_id = ?2 AND status IN ('claimed', 'executing')
"#;

pub const COMPLETE_ALLOCATION: &str = r#"
    UPDATE allocations
    SET status = 'completed',
        article_count = ?3,
        result_summary_json = ?4,
        completed_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND node_id = ?2 AND status = 'executing'
"#;

pub const FIND_EXPIRED_IN_FLIGHT: &str = r#"
    SELECT id FROM allocations
    WHERE status IN ('pending', 'claimed', 'executing')
      AND dispatched_at < ?1
"#;

pub const MARK_TIMED_OUT: &str = r#"
    UPDATE allocations
    SET status = 'timeout', error_message = 'reclaimed after exceeding timeout window', completed_at = CURRENT_TIMESTAMP
    WHERE id = ?1 AND status IN ('pending', 'claimed', 'executing')
"#;

pub const COUNT_PENDING: &str = r#"
    SELECT COUNT(*) FROM allocations WHERE status = 'pending'
"#;

pub const COUNT_IN_FLIGHT: &str = r#"
    SELECT COUNT(*) FROM allocations WHERE status IN ('claimed', 'executing')
"#;

pub const COUNT_COMPLETED_TODAY: &str = r#"
    SELECT COUNT(*) FROM allocations
    WHERE status = 'completed' AND completed_at >= ?1
"#;

pub const COUNT_FAILED_TODAY: &str = r#"
    SELECT COUNT(*) FROM allocations
    WHERE status IN ('failed', 'timeout') AND completed_at >= ?1
"#;

pub const LIST_BY_TASK: &str = r#"
    SELECT id, task_id, task_name_snapshot, cron_snapshot, node_id, feed_ids_json,
           status, result_summary_json, error_message, dispatched_at, claimed_at,
           started_at, completed_at, schedule_run_id, article_count, new_article_count
    FROM allocations WHERE task_id = ?1 ORDER BY dispatched_at DESC LIMIT ?2 OFFSET ?3
"#;

pub const LIST_ALL: &str = r#"
    SELECT id, task_id, task_name_snapshot, cron_snapshot, node_id, feed_ids_json,
           status, result_summary_json, error_message, dispatched_at, claimed_at,
           started_at, completed_at, schedule_run_id, article_count, new_article_count
    FROM allocations ORDER BY dispatched_at DESC LIMIT ?1 OFFSET ?2
"#;
