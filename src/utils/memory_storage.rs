//! In-memory store and auth implementations for testing

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

type UserCollections = HashMap<Collection, Vec<Document>>;

/// In-memory document store for testing and development
///
/// Documents keep insertion order within a collection. Clones share state,
/// so a test can keep a handle for inspection after moving one into the
/// manager.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, UserCollections>>>,
    calls: Arc<AtomicUsize>,
    fail_next: Arc<Mutex<Option<StoreFailureKind>>>,
    latency: Option<Duration>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of store calls issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    /// Make the next call fail with `kind`
    pub fn fail_next(&self, kind: StoreFailureKind) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(kind);
        }
    }

    /// Snapshot of a user's collection in insertion order
    pub fn documents(&self, user: &User, collection: Collection) -> Vec<Document> {
        self.users
            .read()
            .ok()
            .and_then(|users| {
                users
                    .get(&user.uid)
                    .and_then(|collections| collections.get(&collection))
                    .cloned()
            })
            .unwrap_or_default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        if let Ok(mut users) = self.users.write() {
            users.clear();
        }
    }

    async fn begin_call(&self) -> InventoryResult<()> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let injected = self.fail_next.lock().map_err(|_| poisoned())?.take();
        match injected {
            Some(kind) => Err(InventoryError::store(kind, "injected failure")),
            None => Ok(()),
        }
    }
}

fn poisoned() -> InventoryError {
    InventoryError::store(StoreFailureKind::Unknown, "memory store lock poisoned")
}

fn not_found(collection: Collection, id: &str) -> InventoryError {
    InventoryError::store(
        StoreFailureKind::NotFound,
        format!("no document {id} in {collection}"),
    )
}

fn new_document(fields: Fields) -> Document {
    Document {
        id: Uuid::new_v4().simple().to_string(),
        fields,
    }
}

fn apply_update(
    collections: &mut UserCollections,
    collection: Collection,
    id: &str,
    patch: Fields,
) -> InventoryResult<()> {
    let document = collections
        .get_mut(&collection)
        .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        .ok_or_else(|| not_found(collection, id))?;
    document.fields.extend(patch);
    Ok(())
}

fn apply_delete(collections: &mut UserCollections, collection: Collection, id: &str) {
    if let Some(docs) = collections.get_mut(&collection) {
        docs.retain(|doc| doc.id != id);
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        user: &User,
        collection: Collection,
        fields: Fields,
    ) -> InventoryResult<Document> {
        self.begin_call().await?;
        let document = new_document(fields);
        self.users
            .write()
            .map_err(|_| poisoned())?
            .entry(user.uid.clone())
            .or_default()
            .entry(collection)
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn list(
        &self,
        user: &User,
        collection: Collection,
        order: OrderBy,
    ) -> InventoryResult<Vec<Document>> {
        self.begin_call().await?;
        let mut documents = self.documents(user, collection);
        // Equal keys keep insertion order ascending, newest first descending
        if order.direction == Direction::Desc {
            documents.reverse();
        }
        documents.sort_by(|a, b| {
            let ordering = compare_values(a.fields.get(order.field), b.fields.get(order.field));
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
        Ok(documents)
    }

    async fn update(
        &self,
        user: &User,
        collection: Collection,
        id: &str,
        patch: Fields,
    ) -> InventoryResult<()> {
        self.begin_call().await?;
        let mut users = self.users.write().map_err(|_| poisoned())?;
        let collections = users
            .get_mut(&user.uid)
            .ok_or_else(|| not_found(collection, id))?;
        apply_update(collections, collection, id, patch)
    }

    async fn delete(&self, user: &User, collection: Collection, id: &str) -> InventoryResult<()> {
        self.begin_call().await?;
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if let Some(collections) = users.get_mut(&user.uid) {
            apply_delete(collections, collection, id);
        }
        Ok(())
    }

    async fn commit(
        &self,
        user: &User,
        writes: Vec<WriteOp>,
    ) -> InventoryResult<Vec<Option<String>>> {
        self.begin_call().await?;
        let mut users = self.users.write().map_err(|_| poisoned())?;

        // Work on a copy so a failing write leaves the original untouched
        let mut staged = users.get(&user.uid).cloned().unwrap_or_default();
        let mut ids = Vec::with_capacity(writes.len());
        for write in writes {
            match write {
                WriteOp::Create { collection, fields } => {
                    let document = new_document(fields);
                    ids.push(Some(document.id.clone()));
                    staged.entry(collection).or_default().push(document);
                }
                WriteOp::Update {
                    collection,
                    id,
                    patch,
                } => {
                    apply_update(&mut staged, collection, &id, patch)?;
                    ids.push(None);
                }
                WriteOp::Delete { collection, id } => {
                    apply_delete(&mut staged, collection, &id);
                    ids.push(None);
                }
            }
        }

        users.insert(user.uid.clone(), staged);
        Ok(ids)
    }
}

/// In-memory authentication provider
#[derive(Debug, Clone, Default)]
pub struct MemoryAuth {
    user: Option<User>,
    fail_with: Option<String>,
}

impl MemoryAuth {
    /// Provider whose sign-in always yields `user`
    pub fn new(user: User) -> Self {
        Self {
            user: Some(user),
            fail_with: None,
        }
    }

    /// Provider whose sign-in and sign-out always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            user: None,
            fail_with: Some(message.into()),
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self) -> InventoryResult<User> {
        if let Some(message) = &self.fail_with {
            return Err(InventoryError::Auth(message.clone()));
        }
        self.user
            .clone()
            .ok_or_else(|| InventoryError::Auth("no user configured".to_string()))
    }

    async fn sign_out(&self) -> InventoryResult<()> {
        match &self.fail_with {
            Some(message) => Err(InventoryError::Auth(message.clone())),
            None => Ok(()),
        }
    }
}
