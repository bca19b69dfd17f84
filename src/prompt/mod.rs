// src/prompt/mod.rs — Prompt construction: extraction rules and diagnosis templates

pub mod rules;
pub mod templates;

pub use rules::{extraction_prompt, rules_for, ALARM_RULES, PM_RULES};
pub use templates::{analyze_summary, chat_seed, summarize_all, SAMPLE_QUESTIONS};
