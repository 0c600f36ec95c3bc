use super::error::StoreError;
use super::message::StoreRequest;
use crate::ports::{DeleteResult, Filter, FindOneOptions, PersistencePort};
use crate::record::Record;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// The sending half of a [`StoreActor`](super::StoreActor). It forwards each persistence
/// call as a [`StoreRequest`] and awaits the reply on a oneshot channel. Holds only a
/// sender, so cloning is cheap and clones can be shared across tasks and services.
pub struct StoreClient<T: Record> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Record> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Record> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<R, StoreError>>) -> StoreRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl<T: Record> PersistencePort<T> for StoreClient<T> {
    type Error = StoreError;

    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| StoreRequest::FindAll { respond_to })
            .await
    }

    async fn find_by_id(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::FindById { id, respond_to })
            .await
    }

    async fn find_one(
        &self,
        filter: Option<Filter<T>>,
        options: Option<FindOneOptions<T>>,
    ) -> Result<Option<T>, StoreError> {
        self.request(|respond_to| StoreRequest::FindOne {
            filter,
            options: options.unwrap_or_default(),
            respond_to,
        })
        .await
    }

    async fn save(&self, record: T) -> Result<T, StoreError> {
        self.request(|respond_to| StoreRequest::Save { record, respond_to })
            .await
    }

    async fn delete_by_id(&self, id: T::Id) -> Result<DeleteResult, StoreError> {
        self.request(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
