//! In-memory stand-in for the cooperative REST API.
//!
//! Every collection stores raw JSON objects keyed by an integer id. The
//! server keeps what clients send and echoes it back with the id filled in.
//! It has no business rules: balances are not recomputed and references are
//! not checked.

use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// Static description of one API collection.
#[derive(Debug)]
pub struct CollectionDef {
    /// Path segment after `/api/`.
    pub name: &'static str,
    pub id_field: &'static str,
    /// `(path segment, field)` pairs served as `/api/{name}/{segment}/{value}`.
    pub filters: &'static [(&'static str, &'static str)],
    /// Field served by `/api/{name}/fecha/{from}/{to}`.
    pub date_field: Option<&'static str>,
}

pub const COLLECTIONS: &[CollectionDef] = &[
    CollectionDef {
        name: "Socio",
        id_field: "idSocio",
        filters: &[("estado", "estado")],
        date_field: Some("fechaIngreso"),
    },
    CollectionDef {
        name: "CuentasAhorro",
        id_field: "idCuentaAhorro",
        filters: &[("socio", "idSocio"), ("estado", "estado")],
        date_field: Some("fechaApertura"),
    },
    CollectionDef {
        name: "MovimientosAhorro",
        id_field: "idMovimiento",
        filters: &[("cuenta", "idCuentaAhorro"), ("tipo", "tipoMovimiento")],
        date_field: Some("fechaMovimiento"),
    },
    CollectionDef {
        name: "Aportaciones",
        id_field: "idAportacion",
        filters: &[("socio", "idSocio"), ("estado", "estado")],
        date_field: Some("fechaAportacion"),
    },
    CollectionDef {
        name: "TiposAportacion",
        id_field: "idTipoAportacion",
        filters: &[],
        date_field: None,
    },
    CollectionDef {
        name: "PagosCredito",
        id_field: "idPago",
        filters: &[("credito", "idCredito"), ("estado", "estado")],
        date_field: Some("fechaPago"),
    },
    CollectionDef {
        name: "Creditos",
        id_field: "id",
        filters: &[],
        date_field: None,
    },
];

fn collection_def(name: &str) -> Option<&'static CollectionDef> {
    COLLECTIONS.iter().find(|c| c.name == name)
}

#[derive(Debug, Default)]
pub struct Collection {
    rows: BTreeMap<i64, Value>,
    next_id: i64,
}

impl Collection {
    fn insert(&mut self, id_field: &str, mut row: Map<String, Value>) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        row.insert(id_field.to_string(), json!(id));
        let row = Value::Object(row);
        self.rows.insert(id, row.clone());
        row
    }
}

pub type Db = Arc<RwLock<HashMap<&'static str, Collection>>>;

/// Router over an empty store, except for a small contribution-type catalog.
pub fn app() -> Router {
    let mut store: HashMap<&'static str, Collection> =
        COLLECTIONS.iter().map(|c| (c.name, Collection::default())).collect();
    if let Some(types) = store.get_mut("TiposAportacion") {
        for (name, mandatory) in [("Ordinaria", true), ("Extraordinaria", false)] {
            let row = json!({
                "nombreTipo": name,
                "esObligatoria": mandatory,
                "estado": "Activo",
            });
            if let Value::Object(row) = row {
                types.insert("idTipoAportacion", row);
            }
        }
    }
    router(Arc::new(RwLock::new(store)))
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/api/{collection}", get(list_rows).post(create_row))
        .route(
            "/api/{collection}/{key}",
            get(get_row).put(update_row).delete(delete_row),
        )
        .route("/api/{collection}/{key}/{value}", get(filter_rows))
        .route("/api/{collection}/{key}/{value}/{extra}", get(two_part_lookup))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Compare a stored field with a path segment: strings verbatim, numbers by
/// their decimal text.
fn field_equals(row: &Value, field: &str, value: &str) -> bool {
    match row.get(field) {
        Some(Value::String(s)) => s == value,
        Some(Value::Number(n)) => n.to_string() == value,
        _ => false,
    }
}

/// Embed each account's owner the way the real API does.
fn embed_owner(store: &HashMap<&'static str, Collection>, mut account: Value) -> Value {
    let owner = account
        .get("idSocio")
        .and_then(Value::as_i64)
        .and_then(|id| store.get("Socio")?.rows.get(&id).cloned());
    if let (Some(owner), Value::Object(fields)) = (owner, &mut account) {
        fields.insert("idSocioNavigation".to_string(), owner);
    }
    account
}

fn present(store: &HashMap<&'static str, Collection>, name: &str, row: &Value) -> Value {
    if name == "CuentasAhorro" {
        embed_owner(store, row.clone())
    } else {
        row.clone()
    }
}

async fn list_rows(
    State(db): State<Db>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    let rows = store.get(def.name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(
        rows.rows
            .values()
            .map(|row| present(&store, def.name, row))
            .collect(),
    ))
}

async fn create_row(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(input): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let Value::Object(fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = db.write().await;
    let rows = store.get_mut(def.name).ok_or(StatusCode::NOT_FOUND)?;
    let row = rows.insert(def.id_field, fields);
    tracing::debug!(collection = def.name, "created row");
    Ok((StatusCode::CREATED, Json(present(&store, def.name, &row))))
}

async fn get_row(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<Json<Value>, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    let row = store
        .get(def.name)
        .and_then(|c| c.rows.get(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(present(&store, def.name, row)))
}

async fn update_row(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
    Json(input): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let Value::Object(mut fields) = input else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };
    let mut store = db.write().await;
    let row = store
        .get_mut(def.name)
        .and_then(|c| c.rows.get_mut(&id))
        .ok_or(StatusCode::NOT_FOUND)?;
    fields.insert(def.id_field.to_string(), json!(id));
    *row = Value::Object(fields);
    let row = row.clone();
    Ok(Json(present(&store, def.name, &row)))
}

async fn delete_row(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, i64)>,
) -> Result<StatusCode, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let mut store = db.write().await;
    store
        .get_mut(def.name)
        .and_then(|c| c.rows.remove(&id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn filter_rows(
    State(db): State<Db>,
    Path((collection, filter, value)): Path<(String, String, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let field = def
        .filters
        .iter()
        .find(|(segment, _)| *segment == filter)
        .map(|(_, field)| *field)
        .ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    let rows = store.get(def.name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(
        rows.rows
            .values()
            .filter(|row| field_equals(row, field, &value))
            .map(|row| present(&store, def.name, row))
            .collect(),
    ))
}

/// `fecha/{from}/{to}` on any dated collection, `resumen/{cedula}/{number}`
/// on accounts.
async fn two_part_lookup(
    State(db): State<Db>,
    Path((collection, op, first, second)): Path<(String, String, String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let def = collection_def(&collection).ok_or(StatusCode::NOT_FOUND)?;
    let store = db.read().await;
    match op.as_str() {
        "fecha" => rows_between(&store, def, &first, &second).map(|rows| Json(Value::Array(rows))),
        "resumen" if def.name == "CuentasAhorro" => account_summary(&store, &first, &second).map(Json),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

/// Rows whose date field, cut to `YYYY-MM-DD`, lies in `from..=to`.
fn rows_between(
    store: &HashMap<&'static str, Collection>,
    def: &CollectionDef,
    from: &str,
    to: &str,
) -> Result<Vec<Value>, StatusCode> {
    let field = def.date_field.ok_or(StatusCode::NOT_FOUND)?;
    let rows = store.get(def.name).ok_or(StatusCode::NOT_FOUND)?;
    Ok(rows
        .rows
        .values()
        .filter(|row| {
            row.get(field)
                .and_then(Value::as_str)
                .and_then(|d| d.get(..10))
                .is_some_and(|day| day >= from && day <= to)
        })
        .map(|row| present(store, def.name, row))
        .collect())
}

/// The account with `number` owned by the member with `cedula`, its owner and
/// its movements.
fn account_summary(
    store: &HashMap<&'static str, Collection>,
    cedula: &str,
    number: &str,
) -> Result<Value, StatusCode> {
    let accounts = store.get("CuentasAhorro").ok_or(StatusCode::NOT_FOUND)?;
    let account = accounts
        .rows
        .values()
        .map(|row| embed_owner(store, row.clone()))
        .find(|row| {
            field_equals(row, "numeroCuenta", number)
                && row
                    .get("idSocioNavigation")
                    .is_some_and(|owner| field_equals(owner, "cedula", cedula))
        })
        .ok_or(StatusCode::NOT_FOUND)?;
    let movements: Vec<Value> = match (account.get("idCuentaAhorro"), store.get("MovimientosAhorro")) {
        (Some(id), Some(movements)) => movements
            .rows
            .values()
            .filter(|m| m.get("idCuentaAhorro") == Some(id))
            .cloned()
            .collect(),
        _ => Vec::new(),
    };
    Ok(json!({
        "saldoActual": account.get("saldoActual").cloned().unwrap_or(json!(0)),
        "cuenta": account,
        "movimientos": movements,
    }))
}
