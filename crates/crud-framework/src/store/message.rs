//! Requests sent from a `StoreClient` to its `StoreActor`.

use super::error::StoreError;
use crate::ports::{DeleteResult, Filter, FindOneOptions};
use crate::record::Record;
use tokio::sync::oneshot;

/// One-shot reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// One variant per persistence capability.
#[derive(Debug)]
pub enum StoreRequest<T: Record> {
    FindAll {
        respond_to: Response<Vec<T>>,
    },
    FindById {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    FindOne {
        filter: Option<Filter<T>>,
        options: FindOneOptions<T>,
        respond_to: Response<Option<T>>,
    },
    Save {
        record: T,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<DeleteResult>,
    },
}

impl<T: Record> StoreRequest<T> {
    /// Operation name, as recorded in logs and mock call logs.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreRequest::FindAll { .. } => "find_all",
            StoreRequest::FindById { .. } => "find_by_id",
            StoreRequest::FindOne { .. } => "find_one",
            StoreRequest::Save { .. } => "save",
            StoreRequest::Delete { .. } => "delete",
        }
    }
}
