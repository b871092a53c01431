//! Provisioning descriptors sent to the cloud emulation endpoint.

use super::{FunctionConfig, LocalStackConfig};

/// Event pattern that fires on every object upload.
pub const OBJECT_CREATED_EVENT: &str = "s3:ObjectCreated:*";

/// Principal used by S3 when it invokes a function.
pub const S3_PRINCIPAL: &str = "s3.amazonaws.com";

/// Action granted to the S3 principal.
pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";

/// A function to create, with its code already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    pub runtime: String,
    pub role_arn: String,
    pub handler: String,
    pub code: Vec<u8>,
}

impl FunctionDescriptor {
    pub fn new(config: &FunctionConfig, code: Vec<u8>) -> Self {
        Self {
            name: config.name.clone(),
            runtime: config.runtime.clone(),
            role_arn: config.role_arn.clone(),
            handler: config.handler.clone(),
            code,
        }
    }
}

/// Resource policy statement letting a bucket invoke a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokePermission {
    pub function_name: String,
    pub statement_id: String,
    pub action: String,
    pub principal: String,
    pub source_arn: String,
}

impl InvokePermission {
    /// Permission for `bucket` to invoke `function_name`.
    pub fn for_bucket(function_name: &str, bucket: &str) -> Self {
        Self {
            function_name: function_name.to_string(),
            statement_id: "1".to_string(),
            action: INVOKE_ACTION.to_string(),
            principal: S3_PRINCIPAL.to_string(),
            source_arn: bucket_arn(bucket),
        }
    }
}

/// Bucket notification routing object-created events to a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRule {
    pub bucket: String,
    pub function_arn: String,
    pub events: Vec<String>,
}

impl NotificationRule {
    pub fn object_created(bucket: &str, function_arn: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            function_arn: function_arn.to_string(),
            events: vec![OBJECT_CREATED_EVENT.to_string()],
        }
    }
}

/// ARN of an S3 bucket.
pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}")
}

/// ARN LocalStack assigns to a function in the configured region/account.
pub fn function_arn(localstack: &LocalStackConfig, function_name: &str) -> String {
    format!(
        "arn:aws:lambda:{}:{}:function:{}",
        localstack.region, localstack.account_id, function_name
    )
}
