use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use crate::ports::{DeleteResult, Filter, FindOneOptions};
use crate::record::{entity_name, Record};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

type UniqueKey<T> = Box<dyn Fn(&T) -> String + Send + Sync>;

/// The server half of the in-memory store.
///
/// Owns every record of type `T` in a `BTreeMap` keyed by id, so listings come back in
/// ascending id order. Requests are handled sequentially in [`run`](Self::run).
///
/// # Operations
///
/// * **Save**: a record without an id gets the next free id from an internal counter
///   (ids already taken by explicit saves are skipped). A record with an id is stored
///   under that id, inserting or overwriting. Unique constraints are checked first.
/// * **FindOne**: keeps records matching the filter, sorts them by the requested order
///   (id order otherwise), skips `skip` of them and returns the next one.
/// * **Delete**: reports `affected: 1` when a record was removed, `0` otherwise.
///
/// ```rust
/// use crud_framework::{record, PersistencePort, StoreActor};
///
/// record! {
///     pub struct Item {
///         id: u64,
///         pub name: String,
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, store) = StoreActor::<Item>::new(10);
///     tokio::spawn(actor.with_unique("item_name", |item: &Item| item.name.clone()).run());
///
///     let saved = store.save(Item { id: None, name: "bolt".into() }).await.unwrap();
///     assert_eq!(saved.id, Some(1));
///     assert!(store.save(Item { id: None, name: "bolt".into() }).await.is_err());
/// }
/// ```
pub struct StoreActor<T: Record> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<T::Id, T>,
    unique: Vec<(String, UniqueKey<T>)>,
    next_id: u64,
}

impl<T: Record> StoreActor<T> {
    /// Creates the actor and its first client. `buffer_size` is the channel capacity;
    /// callers wait for space when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            unique: Vec::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Seeds the store before it starts serving requests.
    pub fn with_records(mut self, records: impl IntoIterator<Item = T>) -> Self {
        for record in records {
            let record = self.assign_id(record);
            if let Some(id) = record.id() {
                self.records.insert(id, record);
            }
        }
        self
    }

    /// Rejects saves where `key` collides with another stored record.
    pub fn with_unique(
        mut self,
        constraint: impl Into<String>,
        key: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        self.unique.push((constraint.into(), Box::new(key)));
        self
    }

    pub async fn run(mut self) {
        let entity_type = entity_name::<T>();
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            debug!(entity_type, request = msg.kind(), "Request");
            match msg {
                StoreRequest::FindAll { respond_to } => {
                    let records: Vec<T> = self.records.values().cloned().collect();
                    let _ = respond_to.send(Ok(records));
                }
                StoreRequest::FindById { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(entity_type, %id, found = record.is_some(), "FindById");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::FindOne {
                    filter,
                    options,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.find_one(filter, options)));
                }
                StoreRequest::Save { record, respond_to } => {
                    let result = self.save(record);
                    match &result {
                        Ok(saved) => {
                            if let Some(id) = saved.id() {
                                info!(entity_type, %id, size = self.records.len(), "Saved");
                            }
                        }
                        Err(e) => warn!(entity_type, error = %e, "Save failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    let affected = u64::from(self.records.remove(&id).is_some());
                    info!(entity_type, %id, affected, size = self.records.len(), "Deleted");
                    let _ = respond_to.send(Ok(DeleteResult::affected(affected)));
                }
            }
        }

        info!(entity_type, size = self.records.len(), "Shutdown");
    }

    fn find_one(&self, filter: Option<Filter<T>>, options: FindOneOptions<T>) -> Option<T> {
        let mut matches: Vec<&T> = self
            .records
            .values()
            .filter(|record| filter.as_ref().map_or(true, |f| f.matches(record)))
            .collect();
        if let Some(order) = &options.order {
            matches.sort_by(|a, b| order(a, b));
        }
        matches.into_iter().nth(options.skip).cloned()
    }

    fn save(&mut self, record: T) -> Result<T, StoreError> {
        self.check_unique(&record)?;
        let record = self.assign_id(record);
        if let Some(id) = record.id() {
            self.records.insert(id, record.clone());
        }
        Ok(record)
    }

    fn assign_id(&mut self, mut record: T) -> T {
        if record.id().is_none() {
            let mut id = T::Id::from(self.next_id);
            while self.records.contains_key(&id) {
                self.next_id += 1;
                id = T::Id::from(self.next_id);
            }
            self.next_id += 1;
            record.set_id(id);
        }
        record
    }

    fn check_unique(&self, record: &T) -> Result<(), StoreError> {
        for (constraint, key) in &self.unique {
            let value = key(record);
            let taken = self
                .records
                .values()
                .any(|other| other.id() != record.id() && key(other) == value);
            if taken {
                return Err(StoreError::UniqueViolation {
                    constraint: constraint.clone(),
                    value,
                });
            }
        }
        Ok(())
    }
}
