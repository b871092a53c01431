// src/pipeline/provision.rs

//! Resource provisioning: bucket → function → permission → notification.
//!
//! Each step assumes the previous one succeeded. Only the post-creation
//! bucket listing is retried; any other failure aborts the sequence and
//! leaves earlier resources in place.

use crate::error::{AppError, Result};
use crate::models::{
    Config, FunctionDescriptor, InvokePermission, NotificationRule, function_arn,
};
use crate::services::{CloudAdmin, wait_until_ready};

const TOTAL_STEPS: usize = 4;

/// What the provisioning run created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub bucket: String,
    pub function_arn: String,
    /// Listing attempts until the new bucket was visible
    pub bucket_checks: u32,
}

/// Run all provisioning steps in order.
pub async fn run_provision(admin: &dyn CloudAdmin, config: &Config) -> Result<ProvisionReport> {
    let bucket = &config.localstack.bucket;

    log::info!("[STEP 1/{}] Creating S3 bucket {}...", TOTAL_STEPS, bucket);
    let bucket_checks = create_bucket(admin, config).await?;

    log::info!(
        "[STEP 2/{}] Creating Lambda function {}...",
        TOTAL_STEPS,
        config.function.name
    );
    let arn = create_function(admin, config).await?;
    let expected_arn = function_arn(&config.localstack, &config.function.name);
    if arn != expected_arn {
        log::warn!(
            "Endpoint reported function ARN {}, expected {}; using the reported one",
            arn,
            expected_arn
        );
    }

    log::info!(
        "[STEP 3/{}] Adding permission to Lambda function {}...",
        TOTAL_STEPS,
        config.function.name
    );
    grant_invoke(admin, config).await?;

    log::info!(
        "[STEP 4/{}] Configuring S3 event on Lambda {}...",
        TOTAL_STEPS,
        arn
    );
    admin
        .put_bucket_notification(&NotificationRule::object_created(bucket, &arn))
        .await?;

    Ok(ProvisionReport {
        bucket: bucket.clone(),
        function_arn: arn,
        bucket_checks,
    })
}

/// Create the bucket, then poll until a listing against it succeeds.
async fn create_bucket(admin: &dyn CloudAdmin, config: &Config) -> Result<u32> {
    let bucket = &config.localstack.bucket;
    admin.create_bucket(bucket).await?;

    log::info!("Checking if S3 bucket {} was created...", bucket);
    let service = format!("S3 bucket {bucket}");
    let ready = wait_until_ready(&service, &config.readiness.policy(), move || async move {
        admin.list_objects(bucket).await.map(|_| true)
    })
    .await?;

    Ok(ready.attempts)
}

async fn create_function(admin: &dyn CloudAdmin, config: &Config) -> Result<String> {
    let path = &config.function.code_path;
    let code = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::archive(path, e))?;
    log::debug!("Read {} bytes of function code from {}", code.len(), path.display());

    admin
        .create_function(&FunctionDescriptor::new(&config.function, code))
        .await
}

/// Grant the invoke permission, then give it time to propagate.
///
/// The pause is not followed by any verification.
async fn grant_invoke(admin: &dyn CloudAdmin, config: &Config) -> Result<()> {
    let permission = InvokePermission::for_bucket(&config.function.name, &config.localstack.bucket);
    admin.add_permission(&permission).await?;
    tokio::time::sleep(config.function.permission_delay()).await;
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::NamedTempFile;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum AdminCall {
        CreateBucket(String),
        ListObjects(String),
        CreateFunction(String, usize),
        AddPermission(String, String),
        PutNotification(String, String, Vec<String>),
    }

    /// Records every admin call; can hide the bucket for a few listings
    /// and fail at a chosen step.
    #[derive(Default)]
    pub(crate) struct FakeAdmin {
        pub calls: Mutex<Vec<AdminCall>>,
        pub hidden_listings: Mutex<u32>,
        pub fail_create_function: bool,
    }

    impl FakeAdmin {
        pub(crate) fn calls(&self) -> Vec<AdminCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: AdminCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl CloudAdmin for FakeAdmin {
        async fn create_bucket(&self, bucket: &str) -> Result<()> {
            self.record(AdminCall::CreateBucket(bucket.to_string()));
            Ok(())
        }

        async fn list_objects(&self, bucket: &str) -> Result<usize> {
            self.record(AdminCall::ListObjects(bucket.to_string()));
            let mut hidden = self.hidden_listings.lock().unwrap();
            if *hidden > 0 {
                *hidden -= 1;
                return Err(AppError::s3("NoSuchBucket"));
            }
            Ok(0)
        }

        async fn create_function(&self, function: &FunctionDescriptor) -> Result<String> {
            self.record(AdminCall::CreateFunction(
                function.name.clone(),
                function.code.len(),
            ));
            if self.fail_create_function {
                return Err(AppError::lambda("ResourceConflictException"));
            }
            Ok(format!(
                "arn:aws:lambda:us-east-1:000000000000:function:{}",
                function.name
            ))
        }

        async fn add_permission(&self, permission: &InvokePermission) -> Result<()> {
            self.record(AdminCall::AddPermission(
                permission.function_name.clone(),
                permission.source_arn.clone(),
            ));
            Ok(())
        }

        async fn put_bucket_notification(&self, rule: &NotificationRule) -> Result<()> {
            self.record(AdminCall::PutNotification(
                rule.bucket.clone(),
                rule.function_arn.clone(),
                rule.events.clone(),
            ));
            Ok(())
        }
    }

    /// Config pointing at a temporary code archive.
    pub(crate) fn test_config(archive: &NamedTempFile) -> Config {
        let mut config = Config::default();
        config.function.code_path = archive.path().to_path_buf();
        config
    }

    pub(crate) fn archive(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[tokio::test(start_paused = true)]
    async fn steps_run_in_fixed_order() {
        let code = archive(b"PK\x03\x04fake");
        let config = test_config(&code);
        let admin = FakeAdmin::default();

        let report = run_provision(&admin, &config).await.unwrap();

        let arn = "arn:aws:lambda:us-east-1:000000000000:function:handle-video-upload";
        assert_eq!(
            admin.calls(),
            vec![
                AdminCall::CreateBucket("vetube".into()),
                AdminCall::ListObjects("vetube".into()),
                AdminCall::CreateFunction("handle-video-upload".into(), 8),
                AdminCall::AddPermission("handle-video-upload".into(), "arn:aws:s3:::vetube".into()),
                AdminCall::PutNotification(
                    "vetube".into(),
                    arn.into(),
                    vec!["s3:ObjectCreated:*".into()]
                ),
            ]
        );
        assert_eq!(report.function_arn, arn);
        assert_eq!(report.bucket_checks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn function_waits_for_bucket_listing() {
        let code = archive(b"zip");
        let config = test_config(&code);
        let admin = FakeAdmin {
            hidden_listings: Mutex::new(2),
            ..FakeAdmin::default()
        };

        let report = run_provision(&admin, &config).await.unwrap();
        let calls = admin.calls();

        assert_eq!(report.bucket_checks, 3);
        assert_eq!(&calls[1..4], &[
            AdminCall::ListObjects("vetube".into()),
            AdminCall::ListObjects("vetube".into()),
            AdminCall::ListObjects("vetube".into()),
        ]);
        assert!(matches!(calls[4], AdminCall::CreateFunction(..)));
    }

    #[tokio::test(start_paused = true)]
    async fn bucket_never_visible_aborts_before_function() {
        let code = archive(b"zip");
        let mut config = test_config(&code);
        config.readiness.max_attempts = 3;
        let admin = FakeAdmin {
            hidden_listings: Mutex::new(u32::MAX),
            ..FakeAdmin::default()
        };

        let err = run_provision(&admin, &config).await.unwrap_err();

        assert!(err.is_not_ready());
        assert!(
            !admin
                .calls()
                .iter()
                .any(|c| matches!(c, AdminCall::CreateFunction(..)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn notification_targets_reported_function_arn() {
        let code = archive(b"zip");
        let mut config = test_config(&code);
        config.localstack.region = "eu-west-1".into();
        let admin = FakeAdmin::default();

        let report = run_provision(&admin, &config).await.unwrap();

        let reported = "arn:aws:lambda:us-east-1:000000000000:function:handle-video-upload";
        assert_eq!(report.function_arn, reported);
        assert!(matches!(
            admin.calls().last(),
            Some(AdminCall::PutNotification(_, arn, _)) if arn == reported
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn function_failure_stops_sequence() {
        let code = archive(b"zip");
        let config = test_config(&code);
        let admin = FakeAdmin {
            fail_create_function: true,
            ..FakeAdmin::default()
        };

        let err = run_provision(&admin, &config).await.unwrap_err();

        assert!(matches!(err, AppError::Lambda(_)));
        assert!(matches!(admin.calls().last(), Some(AdminCall::CreateFunction(..))));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_archive_is_reported_with_path() {
        let mut config = Config::default();
        config.function.code_path = "does/not/exist.zip".into();
        let admin = FakeAdmin::default();

        let err = run_provision(&admin, &config).await.unwrap_err();

        assert!(matches!(err, AppError::Archive { ref path, .. } if path.contains("exist.zip")));
        assert_eq!(admin.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn permission_is_followed_by_propagation_pause() {
        let code = archive(b"zip");
        let config = test_config(&code);
        let admin = FakeAdmin::default();
        let start = tokio::time::Instant::now();

        run_provision(&admin, &config).await.unwrap();

        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
