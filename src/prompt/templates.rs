// src/prompt/templates.rs — Diagnosis prompt templates

use crate::util::truncate_chars;

/// Per-section character limits for the summarize-all prompt.
pub const ALARM_LIMIT: usize = 4000;
pub const PM_LIMIT: usize = 4000;
pub const TOPOLOGY_LIMIT: usize = 6000;

pub const SUMMARY_SYSTEM: &str =
    "You are a helpful assistant for analyzing optical network health.";

pub const CHAT_SYSTEM: &str = "You are a helpful assistant for diagnosing optical network faults.";

pub const SAMPLE_QUESTIONS: [&str; 5] = [
    "Which port on which ROADM is most likely causing the issue?",
    "What is the most probable root cause based on the alarms?",
    "Suggest step-by-step troubleshooting actions.",
    "Are there any critical RX/TX power anomalies?",
    "How do the alarms correlate with the topology?",
];

/// One combined prompt over all three exports, each hard-truncated.
/// Empty inputs render as empty blocks.
pub fn summarize_all(alarm_xml: &str, pm_xml: &str, topology_xml: &str) -> String {
    let mut prompt = String::with_capacity(ALARM_LIMIT + PM_LIMIT + TOPOLOGY_LIMIT + 1024);

    prompt.push_str("\nYou are an expert in optical transport network diagnosis.\n\n");
    prompt.push_str("Below are the network data:\n\n");

    push_block(&mut prompt, "ALARM XML", truncate_chars(alarm_xml, ALARM_LIMIT));
    push_block(
        &mut prompt,
        "PERFORMANCE MONITORING XML",
        truncate_chars(pm_xml, PM_LIMIT),
    );
    push_block(
        &mut prompt,
        "TOPOLOGY XML",
        truncate_chars(topology_xml, TOPOLOGY_LIMIT),
    );

    prompt.push_str("Task:\n");
    prompt.push_str("- Summarize critical PM issues (e.g., RX/TX anomalies, dropped signals)\n");
    prompt.push_str("- Extract key alarms (device, port, severity, cause)\n");
    prompt.push_str("- Cross-analyze with topology if possible\n");
    prompt.push_str("- Produce a brief network health summary\n");

    prompt
}

/// Second local pass: full alarm XML plus the compressed PM summary.
pub fn analyze_summary(alarm_xml: &str, pm_summary: &str) -> String {
    let mut prompt = String::with_capacity(alarm_xml.len() + pm_summary.len() + 1024);

    prompt.push_str("\nYou are a fault diagnosis expert in optical transport networks.\n\n");
    prompt.push_str(
        "The following is a full alarm XML and a simplified summary of PM data. \
         Your job is to analyze and diagnose what might be going wrong in the network.\n\n",
    );

    push_block(&mut prompt, "ALARM XML (full)", alarm_xml);
    push_block(&mut prompt, "PM SUMMARY", pm_summary);

    prompt.push_str("Please answer the following:\n");
    prompt.push_str("1. What devices or ports show critical issues?\n");
    prompt.push_str("2. What are the most likely root causes of the problems?\n");
    prompt.push_str("3. What troubleshooting actions would you recommend?\n\n");
    prompt.push_str("Organize your answer in sections:\n");
    prompt.push_str("- Observations\n");
    prompt.push_str("- Probable Causes\n");
    prompt.push_str("- Suggested Actions\n");

    prompt
}

/// User turn that grounds the follow-up chat in the diagnosis.
pub fn chat_seed(summary: &str) -> String {
    format!(
        "Here is the latest summary of my network:\n{summary}\n\
         You will answer my follow-up questions based on this."
    )
}

fn push_block(prompt: &mut String, title: &str, body: &str) {
    prompt.push_str("=== ");
    prompt.push_str(title);
    prompt.push_str(" ===\n");
    prompt.push_str(body);
    prompt.push_str("\n\n");
}
