//! Record builders and canned model replies.

use triage::ComplaintRecord;

pub const GANTRY_REPLY: &str = r#"<think>
The gantry stops rotating during the scan, so this is a gantry power problem.
</think>

```json
{"system_component": "Gantry", "failure_mode": "FM2-Fail to scan", "severity": "High", "priority": "High", "level2": "Power Supply"}
```"#;

pub const TWO_OBJECT_REPLY: &str = "<think>reasoning</think>\
{\"system_component\":\"Gantry\",\"failure_mode\":\"FM1\",\"severity\":\"High\",\"priority\":\"High\",\"level2\":\"Power Supply\"}\
{\"system_component\":\"Couch\",\"failure_mode\":\"FM3\",\"severity\":\"Low\",\"priority\":\"Low\",\"level2\":\"Noise\"}";

pub const NO_JSON_REPLY: &str = "<think>not sure</think>The complaint is ambiguous.";

pub struct RecordBuilder {
    record: ComplaintRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: ComplaintRecord::new(id),
        }
    }

    pub fn short(mut self, text: &str) -> Self {
        self.record.short_description = Some(text.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.record.description = Some(text.to_string());
        self
    }

    pub fn notes(mut self, text: &str) -> Self {
        self.record.source_notes = Some(text.to_string());
        self
    }

    pub fn component(mut self, value: &str) -> Self {
        self.record.classification.system_component = Some(value.to_string());
        self
    }

    pub fn failure_mode(mut self, value: &str) -> Self {
        self.record.classification.failure_mode = Some(value.to_string());
        self
    }

    pub fn build(self) -> ComplaintRecord {
        self.record
    }
}

/// Small corpus: two near-duplicate gantry complaints, one couch complaint, one unrelated.
pub fn sample_corpus() -> Vec<ComplaintRecord> {
    vec![
        RecordBuilder::new("PR-100")
            .short("Gantry stops rotating mid scan")
            .description("Rotation halts after two revolutions, error 0x3F")
            .component("Gantry")
            .failure_mode("FM2-Fail to scan")
            .build(),
        RecordBuilder::new("PR-101")
            .short("Gantry stops rotating mid scan")
            .description("Rotation halts after two revolutions, error 0x3F")
            .component("Gantry")
            .failure_mode("FM2-Fail to scan")
            .build(),
        RecordBuilder::new("PR-102")
            .short("Couch does not move to scan position")
            .description("Horizontal motion blocked")
            .component("Couch")
            .build(),
        RecordBuilder::new("PR-103")
            .short("Request for dark mode in viewer")
            .build(),
    ]
}
