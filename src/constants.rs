//! # System Constants
//!
//! Fixed names and limits shared by the resolver, the pipeline and the CLI.

/// Key of the multi-stack section under the host file's `custom` block
pub const CONFIG_SECTION: &str = "multi-stack";

/// Width of the dash rule printed around each stack header
pub const HEADER_WIDTH: usize = 50;

/// Raw configuration keys recognised inside the multi-stack section
pub mod keys {
    pub const STACKS: &str = "stacks";
    pub const REGIONS: &str = "regions";
    pub const PRIORITY: &str = "priority";
    pub const HANDLER: &str = "handler";
    pub const SHELL: &str = "shell";
    pub const CUSTOM: &str = "custom";
}

/// Option keys written by the pipeline into the merged run options
pub mod options {
    pub const CONFIG: &str = "config";
    pub const REGION: &str = "region";
    pub const STAGE: &str = "stage";
}

/// Context slot names managed by the orchestrator
pub mod slots {
    pub const SERVICE: &str = "service";
    pub const CONFIG: &str = "config";
    pub const REGION: &str = "region";
    pub const OPTIONS: &str = "options";
    pub const PLUGINS: &str = "plugins";
    pub const PROVIDER: &str = "provider";

    /// Slots that belong to whichever stack is currently loaded
    pub const STACK_DERIVED: &[&str] = &[SERVICE, CONFIG, REGION, OPTIONS, PLUGINS, PROVIDER];
}

/// Known deployment region codes
pub const KNOWN_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "af-south-1",
    "ap-east-1",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ca-central-1",
    "ca-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-south-1",
    "eu-south-2",
    "eu-north-1",
    "il-central-1",
    "me-south-1",
    "me-central-1",
    "sa-east-1",
    "us-gov-east-1",
    "us-gov-west-1",
    "cn-north-1",
    "cn-northwest-1",
];

/// Maximum accepted size of a host configuration file
pub const MAX_HOST_FILE_SIZE: u64 = 10 * 1024 * 1024;
