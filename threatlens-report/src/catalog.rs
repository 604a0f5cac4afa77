//! Static threat-modeling catalog
//!
//! Fixed framework and risk-area definitions embedded in every assessment
//! prompt. Read-only configuration data.

use serde::{Deserialize, Serialize};

/// The five supported threat-modeling methodologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Framework {
    #[serde(rename = "MITRE ATT&CK")]
    MitreAttack,
    #[serde(rename = "STRIDE")]
    Stride,
    #[serde(rename = "PASTA")]
    Pasta,
    #[serde(rename = "OCTAVE")]
    Octave,
    #[serde(rename = "VAST")]
    Vast,
}

impl Framework {
    pub const ALL: [Framework; 5] = [
        Framework::MitreAttack,
        Framework::Stride,
        Framework::Pasta,
        Framework::Octave,
        Framework::Vast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Framework::MitreAttack => "MITRE ATT&CK",
            Framework::Stride => "STRIDE",
            Framework::Pasta => "PASTA",
            Framework::Octave => "OCTAVE",
            Framework::Vast => "VAST",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Framework::MitreAttack => {
                "Comprehensive framework for understanding cyber adversary behavior"
            }
            Framework::Stride => "Microsoft's threat modeling methodology",
            Framework::Pasta => "Process for Attack Simulation and Threat Analysis",
            Framework::Octave => {
                "Operationally Critical Threat, Asset, and Vulnerability Evaluation"
            }
            Framework::Vast => "Visual, Agile, and Simple Threat modeling",
        }
    }

    pub fn focus(&self) -> &'static str {
        match self {
            Framework::MitreAttack => "Tactics, Techniques, and Procedures (TTPs)",
            Framework::Stride => {
                "Six threat categories (Spoofing, Tampering, Repudiation, Information Disclosure, Denial of Service, Elevation of Privilege)"
            }
            Framework::Pasta => "Risk-centric approach with seven stages",
            Framework::Octave => "Organizational risk assessment",
            Framework::Vast => "Scalable threat modeling for agile development",
        }
    }

    pub fn best_for(&self) -> &'static str {
        match self {
            Framework::MitreAttack => {
                "Advanced threat modeling, APT analysis, comprehensive security assessments"
            }
            Framework::Stride => "Software development, API security, application security",
            Framework::Pasta => "Risk-based threat modeling, business-aligned security",
            Framework::Octave => "Enterprise risk management, asset-based threat modeling",
            Framework::Vast => "DevSecOps, continuous threat modeling, large organizations",
        }
    }

    pub fn coverage(&self) -> &'static [&'static str] {
        match self {
            Framework::MitreAttack => &[
                "Initial Access",
                "Execution",
                "Persistence",
                "Privilege Escalation",
                "Defense Evasion",
                "Credential Access",
                "Discovery",
                "Lateral Movement",
                "Collection",
                "Exfiltration",
                "Impact",
            ],
            Framework::Stride => &[
                "Spoofing Identity",
                "Tampering with Data",
                "Repudiation",
                "Information Disclosure",
                "Denial of Service",
                "Elevation of Privilege",
            ],
            Framework::Pasta => &[
                "Define Objectives",
                "Define Technical Scope",
                "Application Decomposition",
                "Threat Analysis",
                "Vulnerability Analysis",
                "Attack Modeling",
                "Risk & Impact Analysis",
            ],
            Framework::Octave => &[
                "Build Asset-Based Threat Profiles",
                "Identify Infrastructure Vulnerabilities",
                "Develop Security Strategy and Plans",
            ],
            Framework::Vast => &[
                "Application Threat Models",
                "Operational Threat Models",
                "Infrastructure Models",
            ],
        }
    }

    pub fn from_name(name: &str) -> Option<Framework> {
        Framework::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The five supported risk focus areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskArea {
    #[serde(rename = "Agentic AI Risk")]
    AgenticAi,
    #[serde(rename = "Model Risk")]
    Model,
    #[serde(rename = "Data Security Risk")]
    DataSecurity,
    #[serde(rename = "Infrastructure Risk")]
    Infrastructure,
    #[serde(rename = "Compliance Risk")]
    Compliance,
}

impl RiskArea {
    pub const ALL: [RiskArea; 5] = [
        RiskArea::AgenticAi,
        RiskArea::Model,
        RiskArea::DataSecurity,
        RiskArea::Infrastructure,
        RiskArea::Compliance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RiskArea::AgenticAi => "Agentic AI Risk",
            RiskArea::Model => "Model Risk",
            RiskArea::DataSecurity => "Data Security Risk",
            RiskArea::Infrastructure => "Infrastructure Risk",
            RiskArea::Compliance => "Compliance Risk",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskArea::AgenticAi => "Risks from autonomous AI agents and systems",
            RiskArea::Model => "Risks associated with AI/ML model deployment and operations",
            RiskArea::DataSecurity => {
                "Risks related to data confidentiality, integrity, and availability"
            }
            RiskArea::Infrastructure => "Risks in underlying technology infrastructure",
            RiskArea::Compliance => "Regulatory and compliance-related risks",
        }
    }

    /// Ordered threat checklist assessed for this area
    pub fn threats(&self) -> &'static [&'static str] {
        match self {
            RiskArea::AgenticAi => &[
                "Prompt injection and jailbreaking",
                "Unauthorized actions by autonomous agents",
                "Model hallucinations and incorrect decisions",
                "Data poisoning and training manipulation",
                "Agent-to-agent communication security",
                "Privilege escalation by AI agents",
                "Loss of human oversight and control",
            ],
            RiskArea::Model => &[
                "Model drift and degradation",
                "Adversarial attacks on models",
                "Model inversion and extraction",
                "Bias and fairness issues",
                "Model supply chain attacks",
                "Insufficient model validation",
                "Model versioning and rollback issues",
            ],
            RiskArea::DataSecurity => &[
                "Data breaches and exfiltration",
                "Unauthorized access to sensitive data",
                "Data tampering and corruption",
                "Insufficient encryption",
                "Data residency violations",
                "PII exposure",
                "Data retention and disposal issues",
            ],
            RiskArea::Infrastructure => &[
                "Cloud misconfigurations",
                "Network vulnerabilities",
                "Container and orchestration risks",
                "API security weaknesses",
                "Insufficient monitoring",
                "Denial of service vulnerabilities",
                "Third-party integration risks",
            ],
            RiskArea::Compliance => &[
                "GDPR violations",
                "PCI-DSS non-compliance",
                "HIPAA violations",
                "SOX control failures",
                "Industry-specific regulation gaps",
                "Audit trail insufficiencies",
                "Data sovereignty issues",
            ],
        }
    }

    pub fn from_name(name: &str) -> Option<RiskArea> {
        RiskArea::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl std::fmt::Display for RiskArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
