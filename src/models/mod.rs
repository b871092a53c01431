// src/models/mod.rs

//! Domain models: configuration and provisioning descriptors.

mod config;
mod provision;

pub use config::{ApiConfig, BrokerConfig, Config, FunctionConfig, LocalStackConfig, ReadinessConfig};
pub use provision::{
    FunctionDescriptor, INVOKE_ACTION, InvokePermission, NotificationRule, OBJECT_CREATED_EVENT,
    S3_PRINCIPAL, bucket_arn, function_arn,
};
