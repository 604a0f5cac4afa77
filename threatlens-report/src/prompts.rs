//! Assessment prompt composition
//!
//! Deterministic templates that assemble the full threat-assessment prompt
//! from a request. Same request, same prompt bytes; timestamps appear only in
//! report metadata, never in the prompt body.

use crate::types::AssessmentRequest;

/// System prompt carrying the consultant persona. Sent as the structured
/// protocol's `system` parameter, or prefixed before the first turn marker on
/// the legacy protocol; never part of the composed prompt body.
pub const ASSESSMENT_SYSTEM_PROMPT: &str = "You are an expert cybersecurity consultant \
specializing in threat modeling and risk assessment. You produce thorough, actionable \
assessment reports in clear markdown, grounded in the project material you are given.";

/// Compose the full assessment prompt for one request.
///
/// Embeds verbatim: the project fields, every document stub under a filename
/// header, the chosen framework's description, and each chosen risk area's
/// description and complete threat list, followed by the fixed report
/// skeleton the model fills in. The consultant persona travels separately as
/// [`ASSESSMENT_SYSTEM_PROMPT`].
pub fn compose_assessment_prompt(request: &AssessmentRequest) -> String {
    let framework = request.framework;

    let compliance = request.project.compliance_list();

    let documents_section: String = request
        .documents
        .iter()
        .map(|doc| format!("\n\n### {}\n{}", doc.filename, doc.content))
        .collect();

    let risk_overview: String = request
        .risk_areas
        .iter()
        .map(|area| format!("- {}: {}\n", area.name(), area.description()))
        .collect();

    let risk_detail: String = request
        .risk_areas
        .iter()
        .map(|area| {
            let threats: String = area
                .threats()
                .iter()
                .map(|threat| format!("- {}\n", threat))
                .collect();
            format!(
                "\n## {}\nAssess the following specific threats:\n{}\n\
                 For each threat:\n\
                 - Current exposure level\n\
                 - Potential impact\n\
                 - Specific mitigations\n\
                 - Detection strategies\n",
                area.name(),
                threats
            )
        })
        .collect();

    let compliance_section: String = compliance
        .iter()
        .map(|req| format!("- {}\n", req))
        .collect();

    format!(
        r#"Perform a comprehensive threat assessment for the following project using the {framework} framework.

**PROJECT INFORMATION:**
- Project Name: {name}
- Application Type: {app_type}
- Deployment Model: {deployment}
- Business Criticality: {criticality}
- Compliance Requirements: {compliance_joined}
- Environment: {environment}

**UPLOADED DOCUMENTATION:**{documents_section}

**THREAT MODELING FRAMEWORK:** {framework}
{framework_description}

**SPECIFIC RISK FOCUS AREAS TO ASSESS:**
{risk_overview}
**ASSESSMENT REQUIREMENTS:**

Please generate a comprehensive threat assessment report with the following structure:

# EXECUTIVE SUMMARY
- Overall Risk Rating (Critical/High/Medium/Low)
- Top 5 Critical Findings
- Key Recommendations (prioritized)
- Assessment Scope and Methodology

# THREAT MODELING ANALYSIS - {framework}

For each relevant category in {framework}, provide:
- Threat Description
- Attack Scenarios
- Risk Rating (Likelihood x Impact)
- Affected Components
- Recommendations

# SPECIALIZED RISK ASSESSMENTS

For each of the following risk areas, provide detailed analysis:
{risk_detail}
# COMPONENT-SPECIFIC ANALYSIS

Analyze threats by system components:
- Frontend/User Interface
- Backend/Application Layer
- Database/Data Layer
- API/Integration Layer
- Infrastructure/Cloud
- AI/ML Components (if applicable)

# ATTACK SCENARIOS & KILL CHAINS

Provide 3-5 realistic attack scenarios showing:
- Attack path from initial access to impact
- Required attacker capabilities
- Detection opportunities
- Mitigation strategies

# RISK ASSESSMENT MATRIX

Create a detailed risk matrix with:
- Likelihood ratings (1-5)
- Impact ratings (1-5)
- Risk scores
- Priority classification

# PRIORITIZED RECOMMENDATIONS

Organize recommendations by priority:
- **P0 - Critical (0-30 days):** Immediate action required
- **P1 - High (30-90 days):** Short-term priorities
- **P2 - Medium (90-180 days):** Medium-term improvements
- **P3 - Low (180+ days):** Long-term enhancements

For each recommendation:
- Specific action items
- Expected effort
- Expected impact
- Dependencies

# SECURITY CONTROLS MAPPING

Map recommended controls to:
- Preventive Controls
- Detective Controls
- Corrective Controls
- Compensating Controls

# COMPLIANCE CONSIDERATIONS

Map findings to compliance requirements:
{compliance_section}
# METRICS AND KPIs

Recommend:
- Security metrics to track
- KPIs for improvement
- Monitoring priorities

# APPENDICES

- Threat taxonomy reference
- Risk rating methodology
- Tool and technology recommendations
- Additional resources

**OUTPUT FORMAT:**
- Use clear markdown formatting
- Include tables for matrices and mappings
- Use bullet points for lists
- Highlight critical findings with bold text
- Use risk level indicators: CRITICAL, HIGH, MEDIUM, LOW
- Assign unique IDs for cross-referencing: F### for findings, R### for recommendations, T### for threats

Generate the complete, detailed threat assessment report now.
"#,
        framework = framework.name(),
        name = request.project.name,
        app_type = request.project.app_type,
        deployment = request.project.deployment,
        criticality = request.project.criticality,
        compliance_joined = compliance.join(", "),
        environment = request.project.environment,
        documents_section = documents_section,
        framework_description = framework.description(),
        risk_overview = risk_overview,
        risk_detail = risk_detail,
        compliance_section = compliance_section,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Framework, RiskArea};
    use threatlens_core::{DocumentStub, ProjectInfo};

    fn acme_request() -> AssessmentRequest {
        AssessmentRequest {
            project: ProjectInfo {
                name: "Acme Portal".to_string(),
                app_type: "Web Application".to_string(),
                deployment: "Cloud (AWS)".to_string(),
                criticality: "High".to_string(),
                compliance: vec!["PCI-DSS".to_string(), "GDPR".to_string()],
                environment: "Production".to_string(),
            },
            documents: vec![DocumentStub {
                filename: "architecture.md".to_string(),
                content: "# Architecture\nThree-tier web app.".to_string(),
            }],
            framework: Framework::Stride,
            risk_areas: vec![RiskArea::DataSecurity],
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let request = acme_request();
        assert_eq!(
            compose_assessment_prompt(&request),
            compose_assessment_prompt(&request)
        );
    }

    #[test]
    fn test_prompt_embeds_project_framework_and_threats() {
        let prompt = compose_assessment_prompt(&acme_request());

        assert!(prompt.contains("Acme Portal"));
        assert!(prompt.contains("STRIDE"));
        assert!(prompt.contains("Microsoft's threat modeling methodology"));

        // Full Data Security Risk threat list, verbatim
        for threat in RiskArea::DataSecurity.threats() {
            assert!(prompt.contains(threat), "missing threat: {threat}");
        }
    }

    #[test]
    fn test_prompt_embeds_document_stubs_with_headers() {
        let prompt = compose_assessment_prompt(&acme_request());
        assert!(prompt.contains("### architecture.md"));
        assert!(prompt.contains("Three-tier web app."));
    }

    #[test]
    fn test_prompt_lists_compliance_or_none_specified() {
        let mut request = acme_request();
        let prompt = compose_assessment_prompt(&request);
        assert!(prompt.contains("PCI-DSS, GDPR"));

        request.project.compliance.clear();
        let prompt = compose_assessment_prompt(&request);
        assert!(prompt.contains("None specified"));
    }

    #[test]
    fn test_prompt_carries_id_formatting_rules() {
        let prompt = compose_assessment_prompt(&acme_request());
        assert!(prompt.contains("F### for findings"));
        assert!(prompt.contains("CRITICAL, HIGH, MEDIUM, LOW"));
    }

    #[test]
    fn test_persona_lives_in_system_prompt_not_body() {
        assert!(ASSESSMENT_SYSTEM_PROMPT.contains("cybersecurity consultant"));

        let prompt = compose_assessment_prompt(&acme_request());
        assert!(!prompt.contains("You are an expert cybersecurity consultant"));
        assert!(prompt.starts_with("Perform a comprehensive threat assessment"));
    }

    #[test]
    fn test_unselected_risk_areas_are_absent() {
        let prompt = compose_assessment_prompt(&acme_request());
        assert!(!prompt.contains("Agentic AI Risk"));
    }
}
