//! Schema resolution: raw configuration → extended schema
//!
//! Three ordered passes over the raw map:
//! 1. direct: entries without `is_a` are taken as-is
//! 2. vertical: entries with `is_a` and `inherit_properties: true` receive
//!    the properties of their first parent, looked up in the *raw* map
//! 3. horizontal: entries whose `preferred_id` (or else `source`) is a list
//!    are fanned out into one virtual entry per value, keyed
//!    `{discriminator}.{entity}`, next to the umbrella entry itself

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::drivers;
use crate::errors::{BiokgError, Result};
use crate::mapping::schema::{
    ExtendedSchema, ExtendedSchemaEntry, OneOrMany, RawSchema, Representation, SchemaEntry,
    DEFAULT_PREFERRED_ID,
};

/// Field whose list value drives the fan-out of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FanOut {
    PreferredId,
    Source,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaResolver;

impl SchemaResolver {
    pub fn new() -> Self {
        Self
    }

    /// Load a raw schema from a local path or an `http(s)://` URL
    pub fn load_raw(location: &str) -> Result<RawSchema> {
        info!(location, "loading schema configuration");
        let bytes = drivers::fetch_document(location)?;
        let text = String::from_utf8(bytes).map_err(|e| BiokgError::InvalidSchema {
            entity: location.to_string(),
            reason: format!("schema configuration is not UTF-8: {}", e),
        })?;
        RawSchema::from_yaml_str(&text)
    }

    /// Resolve a raw schema into the extended schema
    pub fn resolve(&self, raw: &RawSchema) -> Result<ExtendedSchema> {
        let mut resolved: IndexMap<String, SchemaEntry> = IndexMap::new();

        // Direct pass
        for (key, entry) in raw.iter().filter(|(_, e)| !e.has_parents()) {
            check_represented_as(key, entry)?;
            resolved.insert(key.clone(), entry.clone());
        }

        // Vertical pass
        for (key, entry) in raw.iter().filter(|(_, e)| e.has_parents()) {
            check_represented_as(key, entry)?;

            if entry.parents().iter().any(|parent| parent == key) {
                warn!(entity = %key, "entity declares itself as its own parent, dropping it");
                continue;
            }

            let mut entry = entry.clone();
            if entry.inherit_properties == Some(true) {
                inherit_from_first_parent(key, &mut entry, raw);
            }
            resolved.insert(key.clone(), entry);
        }

        // Horizontal pass
        let mut extended = ExtendedSchema::new();
        let mut virtual_entries: Vec<(String, ExtendedSchemaEntry)> = Vec::new();

        for (key, entry) in &resolved {
            if entry.is_virtual.is_some() {
                warn!(entity = %key, "'virtual' is set by the resolver, ignoring the declared value");
            }

            match fan_out_field(entry) {
                Some(field) => {
                    let children = fan_out(key, entry, field);
                    let mut umbrella = to_extended(entry);
                    umbrella.virtual_children = children.iter().map(|(k, _)| k.clone()).collect();
                    debug!(entity = %key, children = umbrella.virtual_children.len(), "fanned out entity");
                    extended.insert(key.clone(), umbrella);
                    virtual_entries.extend(children);
                }
                None => extended.insert(key.clone(), to_extended(entry)),
            }
        }

        for (key, entry) in virtual_entries {
            extended.insert(key, entry);
        }

        info!(entities = extended.len(), "resolved extended schema");
        Ok(extended)
    }
}

fn check_represented_as(key: &str, entry: &SchemaEntry) -> Result<()> {
    match &entry.represented_as {
        None => Err(BiokgError::InvalidSchema {
            entity: key.to_string(),
            reason: "missing 'represented_as'".to_string(),
        }),
        Some(OneOrMany::Many(kinds)) if kinds.is_empty() => Err(BiokgError::InvalidSchema {
            entity: key.to_string(),
            reason: "'represented_as' is an empty list".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

/// Copy properties of the first parent as declared in the raw map. The
/// child's own declarations win over inherited ones.
fn inherit_from_first_parent(key: &str, entry: &mut SchemaEntry, raw: &RawSchema) {
    let parents = entry.parents();
    let Some(parent_key) = parents.first() else {
        return;
    };
    let Some(parent) = raw.get(parent_key) else {
        debug!(entity = %key, parent = %parent_key, "parent not declared in schema, nothing to inherit");
        return;
    };

    entry.properties = merge_properties(&parent.properties, &entry.properties);
    entry.exclude_properties = merge_properties(&parent.exclude_properties, &entry.exclude_properties);
}

fn merge_properties(
    inherited: &Option<IndexMap<String, String>>,
    own: &Option<IndexMap<String, String>>,
) -> Option<IndexMap<String, String>> {
    match (inherited, own) {
        (None, None) => None,
        (Some(p), None) => Some(p.clone()),
        (None, Some(o)) => Some(o.clone()),
        (Some(p), Some(o)) => {
            let mut merged = p.clone();
            for (name, kind) in o {
                merged.insert(name.clone(), kind.clone());
            }
            Some(merged)
        }
    }
}

fn fan_out_field(entry: &SchemaEntry) -> Option<FanOut> {
    if entry.preferred_id.as_ref().map_or(false, OneOrMany::is_many) {
        Some(FanOut::PreferredId)
    } else if entry.source.as_ref().map_or(false, OneOrMany::is_many) {
        Some(FanOut::Source)
    } else {
        None
    }
}

fn broadcast<T: Clone>(value: &Option<OneOrMany<T>>, n: usize) -> Vec<Option<T>> {
    match value {
        None => vec![None; n],
        Some(v) => v.broadcast(n).into_iter().map(Some).collect(),
    }
}

/// Build the virtual siblings of a list-valued entry
fn fan_out(key: &str, entry: &SchemaEntry, field: FanOut) -> Vec<(String, ExtendedSchemaEntry)> {
    let discriminators = match field {
        FanOut::PreferredId => entry.preferred_id.as_ref(),
        FanOut::Source => entry.source.as_ref(),
    }
    .map(OneOrMany::to_vec)
    .unwrap_or_default();
    let n = discriminators.len();

    let ids = broadcast(&entry.preferred_id, n);
    let labels = broadcast(&entry.label_in_input, n);
    let kinds = broadcast(&entry.represented_as, n);
    let sources = broadcast(&entry.source, n);

    let width = [ids.len(), labels.len(), kinds.len(), sources.len()]
        .into_iter()
        .min()
        .unwrap_or(0);
    if width != n {
        warn!(
            entity = %key,
            expected = n,
            used = width,
            "list-valued attributes differ in length, truncating to the shortest"
        );
    }

    let mut is_a = vec![key.to_string()];
    is_a.extend(entry.parents());

    let mut out = Vec::with_capacity(width);
    for i in 0..width {
        let discriminator = &discriminators[i];
        let virtual_entry = ExtendedSchemaEntry {
            represented_as: kinds[i].unwrap_or(Representation::Node),
            preferred_id: ids[i].clone().unwrap_or_else(|| DEFAULT_PREFERRED_ID.to_string()),
            label_in_input: labels[i].clone(),
            is_a: is_a.clone(),
            properties: entry.properties.clone().unwrap_or_default(),
            exclude_properties: entry.exclude_properties.clone().unwrap_or_default(),
            inherit_properties: entry.inherit_properties.unwrap_or(false),
            // A synonym is renamed once, on the umbrella only
            synonym_for: None,
            source: sources[i].clone(),
            is_virtual: true,
            label_as_edge: entry.label_as_edge.clone(),
            virtual_children: Vec::new(),
            extra: entry.extra.clone(),
        };
        out.push((format!("{}.{}", discriminator, key), virtual_entry));
    }

    out
}

/// Scalarize an entry. List values that were fanned out are dropped from
/// the umbrella: its identifier falls back to the default.
fn to_extended(entry: &SchemaEntry) -> ExtendedSchemaEntry {
    let scalar = |value: &Option<OneOrMany<String>>| match value {
        Some(OneOrMany::One(v)) => Some(v.clone()),
        _ => None,
    };

    let represented_as = entry
        .represented_as
        .as_ref()
        .and_then(|r| r.first().copied())
        .unwrap_or(Representation::Node);

    ExtendedSchemaEntry {
        represented_as,
        preferred_id: scalar(&entry.preferred_id).unwrap_or_else(|| DEFAULT_PREFERRED_ID.to_string()),
        label_in_input: scalar(&entry.label_in_input),
        is_a: entry.parents(),
        properties: entry.properties.clone().unwrap_or_default(),
        exclude_properties: entry.exclude_properties.clone().unwrap_or_default(),
        inherit_properties: entry.inherit_properties.unwrap_or(false),
        synonym_for: entry.synonym_for.clone(),
        source: scalar(&entry.source),
        is_virtual: false,
        label_as_edge: entry.label_as_edge.clone(),
        virtual_children: Vec::new(),
        extra: entry.extra.clone(),
    }
}
