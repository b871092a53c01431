//! Administrative API of the cloud emulation endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FunctionDescriptor, InvokePermission, NotificationRule};

/// The provisioning calls the bootstrap sequence needs.
#[async_trait]
pub trait CloudAdmin: Send + Sync {
    /// Create an object-storage bucket.
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// List the bucket's objects, returning how many were listed.
    ///
    /// Fails while the bucket does not exist yet.
    async fn list_objects(&self, bucket: &str) -> Result<usize>;

    /// Create a function and return its ARN.
    async fn create_function(&self, function: &FunctionDescriptor) -> Result<String>;

    /// Attach an invoke permission to a function.
    async fn add_permission(&self, permission: &InvokePermission) -> Result<()>;

    /// Replace the bucket's notification configuration with `rule`.
    async fn put_bucket_notification(&self, rule: &NotificationRule) -> Result<()>;
}
