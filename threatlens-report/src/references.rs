//! Reference augmentation
//!
//! Scans the generated report for known security topics and merges matching
//! citations into its REFERENCES section. Merging is idempotent: identical
//! citation lines are never duplicated and the merged set stays lexically
//! sorted.

use std::collections::BTreeSet;

/// Keyword (matched lowercase) -> citation label and URL
const REFERENCE_CATALOG: &[(&str, &str, &str)] = &[
    (
        "prompt injection",
        "OWASP Top 10 for LLM Applications: LLM01 Prompt Injection",
        "https://owasp.org/www-project-top-10-for-large-language-model-applications/",
    ),
    (
        "jailbreak",
        "MITRE ATLAS: LLM Jailbreak (AML.T0054)",
        "https://atlas.mitre.org/techniques/AML.T0054",
    ),
    (
        "mitre",
        "MITRE ATT&CK Knowledge Base",
        "https://attack.mitre.org/",
    ),
    (
        "stride",
        "Microsoft Threat Modeling: STRIDE Threats",
        "https://learn.microsoft.com/en-us/azure/security/develop/threat-modeling-tool-threats",
    ),
    (
        "privilege escalation",
        "MITRE ATT&CK: Privilege Escalation (TA0004)",
        "https://attack.mitre.org/tactics/TA0004/",
    ),
    (
        "exfiltration",
        "MITRE ATT&CK: Exfiltration (TA0010)",
        "https://attack.mitre.org/tactics/TA0010/",
    ),
    ("gdpr", "EU General Data Protection Regulation", "https://gdpr.eu/"),
    (
        "pci-dss",
        "PCI Security Standards Council",
        "https://www.pcisecuritystandards.org/",
    ),
    (
        "hipaa",
        "HHS HIPAA Security Rule",
        "https://www.hhs.gov/hipaa/for-professionals/security/index.html",
    ),
    ("owasp", "OWASP Top Ten", "https://owasp.org/www-project-top-ten/"),
    (
        "zero trust",
        "NIST SP 800-207: Zero Trust Architecture",
        "https://csrc.nist.gov/pubs/sp/800/207/final",
    ),
    (
        "supply chain",
        "NIST SP 800-161: Supply Chain Risk Management",
        "https://csrc.nist.gov/pubs/sp/800/161/r1/final",
    ),
];

/// Suggest citations for topics mentioned anywhere in the report
pub fn suggest_references(markdown: &str) -> Vec<(&'static str, &'static str)> {
    let lower = markdown.to_lowercase();
    REFERENCE_CATALOG
        .iter()
        .filter(|(keyword, _, _)| lower.contains(keyword))
        .map(|(_, label, url)| (*label, *url))
        .collect()
}

/// Scan the report and merge every suggested citation into it.
///
/// Only the text outside the REFERENCES section is scanned, so previously
/// merged citations never seed further suggestions.
pub fn augment_references(markdown: &str) -> String {
    let body = without_references_section(markdown);
    let suggestions = suggest_references(&body);
    merge_references(markdown, &suggestions)
}

fn without_references_section(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.lines().collect();
    let Some(start) = lines.iter().position(|line| is_references_heading(line)) else {
        return markdown.to_string();
    };
    let end = lines[start + 1..]
        .iter()
        .position(|line| line.trim_start().starts_with('#'))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    lines[..start]
        .iter()
        .chain(lines[end..].iter())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
}

/// Merge citations into the report's REFERENCES section, appending the
/// section when absent.
pub fn merge_references(markdown: &str, citations: &[(&str, &str)]) -> String {
    if citations.is_empty() {
        return markdown.to_string();
    }

    let mut bullets: BTreeSet<String> = citations
        .iter()
        .map(|(label, url)| format!("- [{}]({})", label, url))
        .collect();

    let lines: Vec<&str> = markdown.lines().collect();

    let Some(heading_idx) = lines.iter().position(|line| is_references_heading(line)) else {
        let mut out = markdown.trim_end().to_string();
        out.push_str("\n\n## REFERENCES\n\n");
        out.push_str(&bullets.into_iter().collect::<Vec<_>>().join("\n"));
        out.push('\n');
        return out;
    };

    // Section runs until the next heading or end of document
    let section_end = lines[heading_idx + 1..]
        .iter()
        .position(|line| line.trim_start().starts_with('#'))
        .map(|offset| heading_idx + 1 + offset)
        .unwrap_or(lines.len());

    let mut preamble: Vec<String> = Vec::new();
    for line in &lines[heading_idx + 1..section_end] {
        let trimmed = line.trim();
        if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
            bullets.insert(trimmed.to_string());
        } else if !trimmed.is_empty() {
            preamble.push(line.to_string());
        }
    }

    let mut out: Vec<String> = lines[..=heading_idx]
        .iter()
        .map(|line| line.to_string())
        .collect();
    out.push(String::new());
    out.extend(preamble);
    out.extend(bullets);
    if section_end < lines.len() {
        out.push(String::new());
        out.extend(lines[section_end..].iter().map(|line| line.to_string()));
    }

    let mut merged = out.join("\n");
    merged.push('\n');
    merged
}

fn is_references_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('#') {
        return false;
    }
    trimmed
        .trim_start_matches('#')
        .trim()
        .eq_ignore_ascii_case("references")
}
