use std::fmt::Write;

use crate::record::ComplaintRecord;
use crate::record::taxonomy::{
    Category, FAILURE_MODES, LEVEL2, PRIORITIES, SEVERITIES, SYSTEM_COMPONENTS,
};

const PREAMBLE: &str = "You are an expert in classifying complaints about medical CT equipment, \
with deep knowledge of CT products and medical device regulations. Analyse the complaint below \
and classify it using the classification system that follows.";

const INSTRUCTIONS: &str = "Return the result as JSON with the fields system_component, \
failure_mode, severity, priority, level2. Do not include any explanation.";

fn push_categories(out: &mut String, indent: &str, categories: &[Category]) {
    for category in categories {
        let _ = writeln!(out, "{indent}- {}: {}", category.name, category.description);
    }
}

/// Builds the classification prompt for `record`.
pub fn build_prompt(record: &ComplaintRecord) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();

    let mut out = String::with_capacity(4096);
    let _ = writeln!(out, "{PREAMBLE}\n");
    let _ = writeln!(out, "Complaint:");
    let _ = writeln!(out, "Short description: {}", field(&record.short_description));
    let _ = writeln!(out, "Description: {}", field(&record.description));
    let _ = writeln!(
        out,
        "Customer description: {}",
        field(&record.source_customer_description)
    );
    let _ = writeln!(out, "Source notes: {}\n", field(&record.source_notes));

    let _ = writeln!(
        out,
        "Pick exactly one value per category. Do not invent new category names.\n"
    );

    let _ = writeln!(out, "1. system_component:");
    push_categories(&mut out, "   ", SYSTEM_COMPONENTS);
    let _ = writeln!(out, "\n2. failure_mode:");
    push_categories(&mut out, "   ", FAILURE_MODES);
    let _ = writeln!(out, "\n3. severity:");
    push_categories(&mut out, "   ", SEVERITIES);
    let _ = writeln!(out, "\n4. priority:");
    push_categories(&mut out, "   ", PRIORITIES);

    let _ = writeln!(out, "\n5. level2 (depends on system_component):");
    for (component, categories) in LEVEL2 {
        let _ = writeln!(out, "   - {component}:");
        push_categories(&mut out, "      ", categories);
    }

    let _ = write!(out, "\n{INSTRUCTIONS}");
    out
}
