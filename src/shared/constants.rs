/// Region used for the AWS credential check (`DescribeRegions`)
pub const DEFAULT_AWS_ANCHOR_REGION: &str = "us-east-1";

/// Regions scanned when `DescribeRegions` succeeds but returns nothing
pub const AWS_FALLBACK_REGIONS: [&str; 17] = [
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-north-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "sa-east-1",
    "ca-central-1",
];

/// Locations scanned when the subscription location listing comes back empty
pub const AZURE_FALLBACK_REGIONS: [&str; 19] = [
    "eastus",
    "eastus2",
    "westus",
    "westus2",
    "centralus",
    "northeurope",
    "westeurope",
    "uksouth",
    "ukwest",
    "eastasia",
    "southeastasia",
    "japaneast",
    "japanwest",
    "australiaeast",
    "australiasoutheast",
    "southindia",
    "brazilsouth",
    "canadacentral",
    "canadaeast",
];

pub const DEFAULT_AWS_ACCOUNT_NAME: &str = "AWS Account";
pub const DEFAULT_AZURE_ACCOUNT_NAME: &str = "Azure Account";

/// Provider state for instances that are gone and never reported
pub const TERMINATED_STATE: &str = "terminated";

/// State recorded when the provider does not report one
pub const UNKNOWN_STATE: &str = "unknown";

/// Prefix of the scratch directory holding job parameters
pub const REPORT_TEMP_DIR_PREFIX: &str = "cloud-report-";

/// File name of the job parameters inside the scratch directory
pub const REPORT_PARAMS_FILE_NAME: &str = "params.json";
