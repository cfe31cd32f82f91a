mod s3;
mod transfer;

use aws_config::{BehaviorVersion, Region, SdkConfig};
pub use s3::S3FileStore;
pub use transfer::TransferFamilyDirectory;
use transferdeck_common::AwsConfig;

pub async fn load_sdk_config(config: &AwsConfig) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await
}
