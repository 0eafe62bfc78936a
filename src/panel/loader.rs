use super::PanelContext;
use crate::domain::{group_key, key_of, Client, Group};
use crate::shared::logging::LogLevel;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

pub const CLIENTS_FIELD: &str = "clients";
pub const GROUPS_FIELD: &str = "groups";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSource {
    Live,
    Cache,
}

impl GroupSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Cache => "cache",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupLoad {
    pub groups: Vec<Group>,
    pub source: GroupSource,
}

/// Accepts either a bare array or an object wrapping the array under `field`.
/// An object without the field is an empty sequence.
pub fn normalize_sequence<T: DeserializeOwned>(body: Value, field: &str) -> Result<Vec<T>, String> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(format!(
                    "field `{field}` must be an array, got {}",
                    json_kind(&other)
                ))
            }
        },
        other => {
            return Err(format!(
                "expected an array or an object with `{field}`, got {}",
                json_kind(&other)
            ))
        }
    };
    serde_json::from_value(Value::Array(items)).map_err(|e| format!("invalid {field} entry: {e}"))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn dedupe_clients(ctx: &PanelContext, clients: Vec<Client>) -> Vec<Client> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(clients.len());
    for client in clients {
        let key = key_of(&ctx.broker, &client);
        if seen.insert(key.clone()) {
            out.push(client);
        } else {
            ctx.log(
                LogLevel::Warn,
                "clients.duplicate_key",
                &format!("dropping duplicate client record {key}"),
            );
        }
    }
    out
}

fn dedupe_groups(ctx: &PanelContext, groups: Vec<Group>) -> Vec<Group> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let key = group_key(&group);
        if seen.insert(key.clone()) {
            out.push(group);
        } else {
            ctx.log(
                LogLevel::Warn,
                "groups.duplicate_key",
                &format!("dropping duplicate group record {key}"),
            );
        }
    }
    out
}

/// Fetches the client roster. Fails closed: any error yields an empty
/// collection rather than a stale one.
pub fn load_clients(ctx: &PanelContext) -> Vec<Client> {
    let loaded = ctx
        .service
        .fetch_clients()
        .map_err(|e| e.to_string())
        .and_then(|body| normalize_sequence::<Client>(body, CLIENTS_FIELD));
    match loaded {
        Ok(clients) => {
            let clients = dedupe_clients(ctx, clients);
            ctx.log(
                LogLevel::Info,
                "clients.loaded",
                &format!("count={}", clients.len()),
            );
            clients
        }
        Err(err) => {
            ctx.log(LogLevel::Warn, "clients.load_failed", &err);
            Vec::new()
        }
    }
}

/// Fetches groups, falling back to the cached snapshot on any failure. The
/// snapshot is left untouched; see `store_group_snapshot`.
pub fn fetch_group_load(ctx: &PanelContext) -> GroupLoad {
    let loaded = ctx
        .service
        .fetch_groups()
        .map_err(|e| e.to_string())
        .and_then(|body| normalize_sequence::<Group>(body, GROUPS_FIELD));
    match loaded {
        Ok(groups) => {
            let groups = dedupe_groups(ctx, groups);
            ctx.log(
                LogLevel::Info,
                "groups.loaded",
                &format!("count={} source=live", groups.len()),
            );
            GroupLoad {
                groups,
                source: GroupSource::Live,
            }
        }
        Err(err) => {
            let groups = dedupe_groups(ctx, ctx.cache.read_groups());
            ctx.log(
                LogLevel::Warn,
                "groups.load_failed",
                &format!("{err}; using {} cached groups", groups.len()),
            );
            GroupLoad {
                groups,
                source: GroupSource::Cache,
            }
        }
    }
}

/// Replaces the cached group snapshot. Failures are logged, never raised.
pub fn store_group_snapshot(ctx: &PanelContext, groups: &[Group]) {
    if let Err(err) = ctx.cache.write_groups(groups) {
        ctx.log(LogLevel::Warn, "groups.cache_write_failed", &err.to_string());
    }
}

/// Fetches groups, refreshing the cached snapshot on success and falling back
/// to it on any failure.
pub fn load_groups(ctx: &PanelContext) -> GroupLoad {
    let load = fetch_group_load(ctx);
    if load.source == GroupSource::Live {
        store_group_snapshot(ctx, &load.groups);
    }
    load
}
