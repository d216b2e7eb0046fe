// [libs/infra/store/src/repositories/node/mod.rs]
/*!
 * =================================================================
 * APARATO: NODE REPOSITORY (V1.0 - REGISTRY GUARD)
 * CLASIFICACIÓN: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DEL CICLO DE VIDA Y CREDENCIALES DE NODOS
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. CREDENTIAL ISSUANCE: Genera pares AK/SK con prefijos "CN"/"CS",
 *    preservando únicamente el resumen SHA-256 del secreto.
 * 2. HEARTBEAT SIDE EFFECT: Verificar credenciales también marca al
 *    nodo como en línea, igual que en el sistema de origen.
 * 3. ZERO ABBREVIATIONS: Nomenclatura nominal absoluta.
 * =================================================================
 */

pub mod queries;

use crate::errors::StoreError;
use cascade_domain_models::{Node, NodeKind, SyncConfig, UpdateNodePayload};
use chrono::{DateTime, Utc};
use libsql::{params, Connection};
use rand::Rng;
use sha2::{Digest, Sha256};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use self::queries as sql_registry;

/// Ventana de latido usada para clasificar un nodo como en línea.
/// Grounded en `jobs/cascade_task_dispatcher.py`'s `HEARTBEAT_WINDOW`.
pub const HEARTBEAT_WINDOW_SECONDS: i64 = 180;

/// Resultado de emitir credenciales: persistido sólo como resumen, el
/// secreto en claro se retorna una única vez al llamador.
pub struct MintedCredentials {
    pub access_key: String,
    pub secret: String,
}

pub struct NodeRepository {
    database_connection: Connection,
}

impl NodeRepository {
    pub fn new(connection: Connection) -> Self {
        Self {
            database_connection: connection,
        }
    }

    /// Genera un par AK/SK nominal. Grounded en `core/cascade.py`'s
    /// `generate_node_credentials`: prefijo "CN" para la clave de acceso,
    /// "CS" para el secreto, resumen SHA-256 persistido en su lugar.
    fn mint_credentials() -> MintedCredentials {
        let access_key = format!("CN{}", random_url_safe_token(32));
        let secret = format!("CS{}", random_url_safe_token(32));
        MintedCredentials { access_key, secret }
    }

    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex_encode(&hasher.finalize())
    }

    #[instrument(skip(self))]
    pub async fn register_node(
        &self,
        kind: NodeKind,
        display_name: &str,
        api_url: Option<&str>,
    ) -> Result<(Node, MintedCredentials), StoreError> {
        let credentials = Self::mint_credentials();
        let secret_hash = Self::hash_secret(&credentials.secret);
        let node_id = Uuid::new_v4().to_string();
        let sync_config = SyncConfig::default();
        let sync_config_json = serde_json::to_string(&sync_config)
            .map_err(|e| StoreError::MappingError(e.to_string()))?;

        self.database_connection
            .execute(
                sql_registry::INSERT_NODE,
                params![
                    node_id.clone(),
                    kind_to_wire(kind),
                    display_name.to_string(),
                    api_url.map(|s| s.to_string()),
                    credentials.access_key.clone(),
                    secret_hash,
                    sync_config_json
                ],
            )
            .await?;

        info!("🔑 [REGISTRY]: Node [{}] minted as [{}]", node_id, credentials.access_key);

        let node = self
            .find_by_id(&node_id)
            .await?
            .ok_or(StoreError::NodeNotFound)?;

        Ok((node, credentials))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, node_id: &str) -> Result<Option<Node>, StoreError> {
        let mut rows = self
            .database_connection
            .query(sql_registry::FIND_NODE_BY_ID, params![node_id.to_string()])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(map_row_to_node(&row, false)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Node>, StoreError> {
        let mut rows = self.database_connection.query(sql_registry::LIST_NODES, ()).await?;
        let mut nodes = Vec::new();
        while let Some(row) = rows.next().await? {
            nodes.push(map_row_to_node(&row, false)?);
        }
        Ok(nodes)
    }

    /// Verifica un par AK/SK contra el resumen almacenado. Al igual que
    /// el sistema de origen, una verificación exitosa registra latido.
    ///
    /// Las credenciales llegan recortadas de espacios y comillas sueltas:
    /// viajan por archivos de configuración editados a mano. La comparación
    /// del resumen es a tiempo constante para no filtrar el secreto por
    /// temporización.
    #[instrument(skip(self, secret))]
    pub async fn verify_credentials(
        &self,
        access_key: &str,
        secret: &str,
    ) -> Result<Node, StoreError> {
        let access_key = trim_credential(access_key);
        let secret = trim_credential(secret);

        let mut rows = self
            .database_connection
            .query(
                sql_registry::FIND_NODE_BY_ACCESS_KEY,
                params![access_key.to_string()],
            )
            .await?;

        let row = rows.next().await?.ok_or(StoreError::CredentialRejected)?;
        let stored_hash: String = row.get(5)?;

        if !constant_time_eq(stored_hash.as_bytes(), Self::hash_secret(secret).as_bytes()) {
            warn!("🚫 [SECURITY]: Credential rejected for access key [{}]", access_key);
            return Err(StoreError::CredentialRejected);
        }

        let node = map_row_to_node(&row, false)?;
        self.record_heartbeat(&node.id, 1).await?;

        Ok(node)
    }

    /// Cuenta los nodos clasificados como en línea en este instante,
    /// contra la ventana de latido estándar. Deriva el dato en vivo;
    /// nunca persiste el resultado en `reported_status`.
    #[instrument(skip(self))]
    pub async fn count_online(&self) -> Result<u64, StoreError> {
        let nodes = self.list_all().await?;
        let now = Utc::now();
        let window = chrono::Duration::seconds(HEARTBEAT_WINDOW_SECONDS);
        Ok(nodes.iter().filter(|node| node.classify(now, window)).count() as u64)
    }

    #[instrument(skip(self))]
    pub async fn record_heartbeat(&self, node_id: &str, reported_status: u8) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(
                sql_registry::UPDATE_HEARTBEAT,
                params![node_id.to_string(), reported_status as i64],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::NodeNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, payload))]
    pub async fn update_node(
        &self,
        node_id: &str,
        payload: UpdateNodePayload,
    ) -> Result<Node, StoreError> {
        let sync_config_json = match payload.sync_config {
            Some(config) => {
                Some(serde_json::to_string(&config).map_err(|e| StoreError::MappingError(e.to_string()))?)
            }
            None => None,
        };

        let affected = self
            .database_connection
            .execute(
                sql_registry::UPDATE_NODE,
                params![
                    node_id.to_string(),
                    payload.display_name,
                    payload.api_url,
                    payload.active.map(|flag| flag as i64),
                    sync_config_json
                ],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::NodeNotFound);
        }

        self.find_by_id(node_id).await?.ok_or(StoreError::NodeNotFound)
    }

    /// Emite un nuevo par AK/SK para un nodo existente, invalidando el
    /// anterior de forma irreversible. El secreto en claro sólo se
    /// retorna en esta llamada.
    #[instrument(skip(self))]
    pub async fn reissue_credentials(&self, node_id: &str) -> Result<MintedCredentials, StoreError> {
        let credentials = Self::mint_credentials();
        let secret_hash = Self::hash_secret(&credentials.secret);

        let affected = self
            .database_connection
            .execute(
                sql_registry::REISSUE_CREDENTIALS,
                params![node_id.to_string(), credentials.access_key.clone(), secret_hash],
            )
            .await?;

        if affected == 0 {
            return Err(StoreError::NodeNotFound);
        }

        info!("🔑 [REGISTRY]: Node [{}] credentials reissued as [{}]", node_id, credentials.access_key);
        Ok(credentials)
    }

    #[instrument(skip(self))]
    pub async fn delete_node(&self, node_id: &str) -> Result<(), StoreError> {
        let affected = self
            .database_connection
            .execute(sql_registry::DELETE_NODE, params![node_id.to_string()])
            .await?;

        if affected == 0 {
            return Err(StoreError::NodeNotFound);
        }
        Ok(())
    }
}

fn kind_to_wire(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Coordinator => "coordinator",
        NodeKind::Worker => "worker",
    }
}

fn wire_to_kind(value: &str) -> Result<NodeKind, StoreError> {
    match value {
        "coordinator" => Ok(NodeKind::Coordinator),
        "worker" => Ok(NodeKind::Worker),
        other => Err(StoreError::MappingError(format!("unknown node kind: {other}"))),
    }
}

/// Columnas uniformes: id(0) kind(1) display_name(2) api_url(3)
/// access_key(4) secret_hash(5) reported_status(6) active(7)
/// last_heartbeat_at(8) sync_config_json(9) created_at(10) updated_at(11).
fn map_row_to_node(row: &libsql::Row, include_secret: bool) -> Result<Node, StoreError> {
    let sync_config_json: String = row.get(9)?;
    let sync_config: SyncConfig =
        serde_json::from_str(&sync_config_json).map_err(|e| StoreError::MappingError(e.to_string()))?;

    let last_heartbeat_raw: Option<String> = row.get(8)?;
    let last_heartbeat_at = last_heartbeat_raw
        .map(|raw| parse_timestamp(&raw))
        .transpose()?;

    let secret_hash: String = row.get(5)?;

    Ok(Node {
        id: row.get(0)?,
        kind: wire_to_kind(&row.get::<String>(1)?)?,
        display_name: row.get(2)?,
        api_url: row.get(3)?,
        access_key: row.get(4)?,
        secret_hash: if include_secret { Some(secret_hash) } else { None },
        reported_status: row.get::<i64>(6)? as u8,
        active: row.get::<i64>(7)? != 0,
        last_heartbeat_at,
        sync_config,
        created_at: parse_timestamp(&row.get::<String>(10)?)?,
        updated_at: parse_timestamp(&row.get::<String>(11)?)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        })
        .map_err(|e| StoreError::MappingError(format!("timestamp parse fault: {e}")))
}

fn random_url_safe_token(length: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Recorta espacios en blanco y comillas sueltas que a veces rodean un
/// valor copiado desde un archivo de configuración editado a mano.
fn trim_credential(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

/// Compara dos resúmenes byte a byte sin short-circuit, de forma que el
/// tiempo de ejecución no dependa de en qué posición difieren.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter().zip(right.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}
