//! Asynchronous yes/no decision from the user, asked before destructive task
//! operations.

use async_trait::async_trait;

#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}
