//! Base repository trait for database operations.
//!
//! A repository is a data access layer for one table (plus its children),
//! wrapping a mutable connection so callers can hand it either a pool
//! connection or an open transaction. Entity-specific updates (status
//! changes, warehouse notes) live on the concrete repositories.

use crate::db::errors::Result;

#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching a filter
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;

    /// Delete an entity by ID; returns whether a row was removed
    async fn delete(&mut self, id: Self::Id) -> Result<bool>;
}
