//! LocalStack implementation of [`CloudAdmin`].
//!
//! Both SDK clients point at the emulation endpoint with static dummy
//! credentials. S3 uses path-style addressing so bucket names never have to
//! resolve as hostnames.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionCode, Runtime};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Event, LambdaFunctionConfiguration,
    NotificationConfiguration,
};

use crate::error::{AppError, Result};
use crate::models::{FunctionDescriptor, InvokePermission, LocalStackConfig, NotificationRule};
use crate::services::CloudAdmin;

/// Region where buckets must be created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// S3 + Lambda admin clients bound to a LocalStack endpoint.
#[derive(Debug, Clone)]
pub struct LocalStackAdmin {
    s3: aws_sdk_s3::Client,
    lambda: aws_sdk_lambda::Client,
    region: String,
}

impl LocalStackAdmin {
    /// Create admin clients from explicit configuration.
    pub async fn connect(config: &LocalStackConfig) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "localstack",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .endpoint_url(&config.url)
            .credentials_provider(credentials)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        log::debug!("LocalStack admin clients bound to {}", config.url);

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3_config),
            lambda: aws_sdk_lambda::Client::new(&sdk_config),
            region: config.region.clone(),
        }
    }
}

#[async_trait]
impl CloudAdmin for LocalStackAdmin {
    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.s3.create_bucket().bucket(bucket);
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| AppError::s3(DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<usize> {
        let output = self
            .s3
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| AppError::s3(DisplayErrorContext(&e)))?;
        Ok(output.contents().len())
    }

    async fn create_function(&self, function: &FunctionDescriptor) -> Result<String> {
        let code = FunctionCode::builder()
            .zip_file(Blob::new(function.code.clone()))
            .build();

        let output = self
            .lambda
            .create_function()
            .function_name(&function.name)
            .runtime(Runtime::from(function.runtime.as_str()))
            .role(&function.role_arn)
            .handler(&function.handler)
            .code(code)
            .send()
            .await
            .map_err(|e| AppError::lambda(DisplayErrorContext(&e)))?;

        output
            .function_arn()
            .map(str::to_string)
            .ok_or_else(|| AppError::lambda(format!("no ARN returned for {}", function.name)))
    }

    async fn add_permission(&self, permission: &InvokePermission) -> Result<()> {
        self.lambda
            .add_permission()
            .function_name(&permission.function_name)
            .statement_id(&permission.statement_id)
            .action(&permission.action)
            .principal(&permission.principal)
            .source_arn(&permission.source_arn)
            .send()
            .await
            .map_err(|e| AppError::lambda(DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn put_bucket_notification(&self, rule: &NotificationRule) -> Result<()> {
        let mut target = LambdaFunctionConfiguration::builder().lambda_function_arn(&rule.function_arn);
        for event in &rule.events {
            target = target.events(Event::from(event.as_str()));
        }
        let target = target.build().map_err(AppError::s3)?;

        let notification = NotificationConfiguration::builder()
            .lambda_function_configurations(target)
            .build();

        self.s3
            .put_bucket_notification_configuration()
            .bucket(&rule.bucket)
            .notification_configuration(notification)
            .send()
            .await
            .map_err(|e| AppError::s3(DisplayErrorContext(&e)))?;
        Ok(())
    }
}
