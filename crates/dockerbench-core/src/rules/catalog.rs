use serde::{Deserialize, Serialize};

/// CIS Docker Benchmark rules checked by this tool.
///
/// Variant order is evaluation order and report order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    NonRootUser,
    TrustedBaseImage,
    DisallowedPackage,
    Healthcheck,
    UpdateWithoutInstall,
    CopyNotAdd,
    NoSecrets,
}

impl RuleId {
    pub const ALL: [RuleId; 7] = [
        RuleId::NonRootUser,
        RuleId::TrustedBaseImage,
        RuleId::DisallowedPackage,
        RuleId::Healthcheck,
        RuleId::UpdateWithoutInstall,
        RuleId::CopyNotAdd,
        RuleId::NoSecrets,
    ];

    /// Short CIS section number.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::NonRootUser => "CIS-4.1",
            RuleId::TrustedBaseImage => "CIS-4.2",
            RuleId::DisallowedPackage => "CIS-4.3",
            RuleId::Healthcheck => "CIS-4.6",
            RuleId::UpdateWithoutInstall => "CIS-4.7",
            RuleId::CopyNotAdd => "CIS-4.9",
            RuleId::NoSecrets => "CIS-4.10",
        }
    }

    /// Rule text as it appears in reports.
    pub fn title(&self) -> &'static str {
        match self {
            RuleId::NonRootUser => "CIS 4.1 Create a user for the container",
            RuleId::TrustedBaseImage => "CIS 4.2 Use trusted base images for containers",
            RuleId::DisallowedPackage => {
                "CIS 4.3 Do not install unnecessary packages in the container"
            }
            RuleId::Healthcheck => "CIS 4.6 Add HEALTHCHECK instruction to the container image",
            RuleId::UpdateWithoutInstall => {
                "CIS 4.7 Do not use update instructions alone in the Dockerfile"
            }
            RuleId::CopyNotAdd => "CIS 4.9 Use COPY instead of ADD in Dockerfile",
            RuleId::NoSecrets => "CIS 4.10 Do not store secrets in Dockerfiles",
        }
    }

    /// Rules that only run when their allow/deny list is configured.
    pub fn requires_configuration(&self) -> bool {
        matches!(
            self,
            RuleId::TrustedBaseImage | RuleId::DisallowedPackage | RuleId::NoSecrets
        )
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
