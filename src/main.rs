//! # CRUD Recipe Demo
//!
//! Walks one user and one product through every service operation:
//! 1. Create (and a rejected create, to show the violation payload).
//! 2. Patch, which keeps the fields it is not given.
//! 3. Update, which resets them.
//! 4. Find, then delete twice.

use crud_framework::tracing::setup_tracing;
use crud_framework::Filter;
use crud_recipe::config::AppConfig;
use crud_recipe::error::AppError;
use crud_recipe::lifecycle::RecordSystem;
use crud_recipe::model::{ProductPartial, User, UserPartial};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_tracing();

    let config = AppConfig::load()?;
    let system = RecordSystem::new(config)?;

    let span = tracing::info_span!("user_lifecycle");
    async {
        let ada = system
            .users
            .create(UserPartial {
                name: Some("Ada".into()),
                email: Some("ada@example.com".into()),
                bio: Some("Analyst".into()),
                age: Some(Some(36)),
                ..Default::default()
            })
            .await?;
        let Some(id) = ada.id else {
            warn!("Store assigned no id");
            return Ok(());
        };
        info!(%id, "User created");

        match system
            .users
            .create(UserPartial {
                email: Some("not-an-email".into()),
                ..Default::default()
            })
            .await
        {
            Err(e) => {
                for violation in e.violations().unwrap_or_default() {
                    warn!(property = %violation.property, constraints = ?violation.constraints, "Rejected");
                }
            }
            Ok(user) => warn!(?user, "Invalid user was accepted"),
        }

        let patched = system
            .users
            .patch(id, UserPartial {
                name: Some("Ada Lovelace".into()),
                ..Default::default()
            })
            .await?;
        info!(name = %patched.name, bio = %patched.bio, "Patched, bio kept");

        let updated = system
            .users
            .update(UserPartial {
                id: Some(id),
                name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
                ..Default::default()
            })
            .await?;
        info!(name = %updated.name, bio = %updated.bio, age = ?updated.age, "Updated, omitted fields reset");

        let found = system
            .users
            .find_one(Some(Filter::new(|u: &User| u.email.ends_with("@example.com"))), None)
            .await?;
        info!(found = found.is_some(), "Lookup by email domain");

        let first = system.users.delete(id).await?;
        let second = system.users.delete(id).await?;
        info!(first = first.affected, second = second.affected, "Deleted twice");

        Ok::<(), AppError>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("product_lifecycle");
    async {
        let product = system
            .products
            .create(ProductPartial {
                name: Some("Difference Engine".into()),
                sku: Some("ENG-1822".into()),
                price: Some(17_000.0),
                quantity: Some(1),
                ..Default::default()
            })
            .await?;
        info!(id = ?product.id, active = product.active, "Product created");

        let listed = system.products.find_all().await?;
        info!(count = listed.len(), "Products listed");
        Ok::<(), AppError>(())
    }
    .instrument(span)
    .await?;

    system.shutdown().await?;
    info!("Demo completed successfully");
    Ok(())
}
