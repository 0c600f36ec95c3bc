use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::{product_rules, user_rules, Product, User};
use crate::validation::RuleValidator;
use crud_framework::{CrudService, StoreActor, StoreClient};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub type UserService = CrudService<User, StoreClient<User>, RuleValidator<User>>;
pub type ProductService = CrudService<Product, StoreClient<Product>, RuleValidator<Product>>;

/// Every running service plus the store tasks behind them.
///
/// ```ignore
/// let system = RecordSystem::new(AppConfig::load()?)?;
/// let user = system.users.create(partial).await?;
/// system.shutdown().await?;
/// ```
pub struct RecordSystem {
    pub users: UserService,
    pub products: ProductService,
    handles: Vec<JoinHandle<()>>,
}

impl RecordSystem {
    /// Starts the stores and builds the services. Must be called inside a Tokio runtime.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let options = Arc::new(config.validator);
        let buffer_size = config.store.buffer_size;
        let product_validator = product_rules()?;

        let (user_actor, user_store) = StoreActor::<User>::new(buffer_size);
        let user_actor = user_actor.with_unique("user_email", |u: &User| u.email.to_lowercase());
        let (product_actor, product_store) = StoreActor::<Product>::new(buffer_size);
        let product_actor = product_actor.with_unique("product_sku", |p: &Product| p.sku.clone());

        let handles = vec![
            tokio::spawn(user_actor.run()),
            tokio::spawn(product_actor.run()),
        ];
        info!(buffer_size, ?options, "Record system started");

        Ok(Self {
            users: CrudService::new(user_store, user_rules(), options.clone()),
            products: CrudService::new(product_store, product_validator, options),
            handles,
        })
    }

    /// Drops every service and waits for the store tasks to finish.
    pub async fn shutdown(self) -> Result<(), AppError> {
        info!("Shutting down record system...");
        drop(self.users);
        drop(self.products);

        let mut first_failure = None;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                first_failure.get_or_insert(e);
            }
        }

        if let Some(e) = first_failure {
            return Err(AppError::Join(e));
        }
        info!("Record system shutdown complete.");
        Ok(())
    }
}
