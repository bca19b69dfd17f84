// src/prompt/rules.rs — Extraction rule sets for the local compression pass
//
// The rules are instructions to the model, not local predicates. Each
// extraction prompt is the category's rule text, a fixed separator, then the
// raw XML.

use crate::infra::errors::OptiscopeError;
use crate::telemetry::Category;

pub const ALARM_RULES: &str = r#"
You are a network fault XML simplifier.

Your task is to extract only meaningful and active alarms from the provided alarm XML. For each valid alarm, output the following fields **explicitly and completely**:

- Device name
- Port or interface name
- Alarm type
- Severity
- Time (if available)
- Probable cause

IMPORTANT RULES:
- Only include alarms that contain **all six fields** above.
- Discard entries with status "cleared", "normal", or missing values.
- Do not include partial, placeholder, or unknown alarms.
- If any of the required fields are missing, skip that alarm.

Format the output in clean, plain English, grouped by device if applicable.

Here is the XML input:
"#;

pub const PM_RULES: &str = r#"
You are a performance monitoring XML parser.

Your task is to extract and compress raw PM (performance monitoring) entries from the XML.

Extraction rules:
- Only extract PM entries where the "pm-type" contains **"input"** or **"output"**
- Ignore any entries where "pm-type" includes "avg", "min", or "max"
- For each entry, extract the following fields:
  - Interface name (if available)
  - Port name (if available)
  - PM type
  - PM value
  - Timestamp

Additional requirements:
- Do not perform any interpretation or filtering based on value thresholds
- Do not analyze or comment on the data
- Ensure every matching PM entry is extracted, do not skip any

Output format:
List each PM entry as a block of plain English with clearly labeled fields.
Group by device or circuit-pack if available.

Here is the XML input:
"#;

const XML_SEPARATOR: &str = "\n\nHere is the XML:\n\n";

/// Rule text for a category. Topology has none.
pub fn rules_for(category: Category) -> Option<&'static str> {
    match category {
        Category::Alarm => Some(ALARM_RULES),
        Category::Pm => Some(PM_RULES),
        Category::Topology => None,
    }
}

/// Build the extraction prompt for one telemetry export.
pub fn extraction_prompt(category: Category, xml: &str) -> Result<String, OptiscopeError> {
    let rules = rules_for(category).ok_or(OptiscopeError::NoExtractionRules { category })?;
    let mut prompt = String::with_capacity(rules.len() + XML_SEPARATOR.len() + xml.len());
    prompt.push_str(rules);
    prompt.push_str(XML_SEPARATOR);
    prompt.push_str(xml);
    Ok(prompt)
}
