use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for provider region codes as they appear in resource selectors
    /// Lowercase alphanumeric segments separated by single hyphens
    /// - Valid: "us-east-1", "eastus2", "ap-southeast-2"
    /// - Invalid: "-us", "us-", "us--east", "US-EAST-1", "us_east", ""
    pub static ref REGION_CODE_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}
