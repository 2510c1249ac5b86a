//! Context-aware extraction engine: label location, section resolution, and
//! value association over a document snapshot.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::snapshot::DocSnapshot;

pub mod conversation;
pub mod label;
pub mod section;
pub mod value;

/// One named field and the label texts that may identify it, ordered from
/// most to least canonical.
pub struct FieldSpec {
    pub field_name: &'static str,
    pub label_aliases: &'static [&'static str],
}

/// A named logical section: the heading texts that locate its container and
/// the fields expected inside it.
pub struct SectionSpec {
    pub section_name: &'static str,
    pub aliases: &'static [&'static str],
    pub fields: &'static [FieldSpec],
}

pub const SALES_FUNNEL: SectionSpec = SectionSpec {
    section_name: "Sales Funnel",
    aliases: &["Sales Funnel", "Funnel"],
    fields: &[
        FieldSpec {
            field_name: "Customers",
            label_aliases: &["Customers", "Total Customers"],
        },
        FieldSpec {
            field_name: "Contacted",
            label_aliases: &["Contacted"],
        },
        FieldSpec {
            field_name: "Appts Set",
            label_aliases: &["Appts Set", "Appointments Set"],
        },
        FieldSpec {
            field_name: "Appts Shown",
            label_aliases: &["Appts Shown", "Appointments Shown", "Shown"],
        },
        FieldSpec {
            field_name: "Sold",
            label_aliases: &["Sold"],
        },
    ],
};

pub const PERFORMANCE_INDICATORS: SectionSpec = SectionSpec {
    section_name: "Performance Indicators",
    aliases: &["Performance Indicators", "Key Performance Indicators", "KPIs"],
    fields: &[
        FieldSpec {
            field_name: "Unanswered Comms",
            label_aliases: &["Unanswered Comms", "Unanswered Communications"],
        },
        FieldSpec {
            field_name: "Open Visits",
            label_aliases: &["Open Visits"],
        },
        FieldSpec {
            field_name: "Buying Signals",
            label_aliases: &["Buying Signals"],
        },
        FieldSpec {
            field_name: "Pending Deals",
            label_aliases: &["Pending Deals"],
        },
    ],
};

/// The sections scraped on every dashboard pass.
pub const DASHBOARD_SECTIONS: &[&SectionSpec] = &[&SALES_FUNNEL, &PERFORMANCE_INDICATORS];

/// One extracted field. `None` means the value could not be recovered; it is
/// never silently coerced to zero here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: Option<i64>,
}

/// One record per section per extraction pass, built fresh every pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub section: String,
    pub fields: Vec<FieldValue>,
}

impl ExtractedRecord {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value)
    }
}

/// Everything one dashboard pass produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub url: String,
    pub title: Option<String>,
    pub date_range: Option<String>,
    pub records: Vec<ExtractedRecord>,
}

/// Extract one section's record from the snapshot.
///
/// The section heading is located by its aliases and climbed to a container;
/// when the heading is absent the whole document is searched instead, trading
/// precision for recall the way the source page's unstable markup demands.
/// Field misses propagate as `None`.
pub fn extract_section(doc: &DocSnapshot, spec: &SectionSpec) -> ExtractedRecord {
    let root = doc.root();
    let container = match label::find_label(root, spec.aliases) {
        Some(heading) => section::resolve_section(heading),
        None => {
            debug!(section = spec.section_name, "section heading not found, scanning document");
            root
        }
    };

    let fields = spec
        .fields
        .iter()
        .map(|field| FieldValue {
            name: field.field_name.to_string(),
            value: field_value(container, field),
        })
        .collect();

    ExtractedRecord {
        section: spec.section_name.to_string(),
        fields,
    }
}

fn field_value(container: ElementRef<'_>, field: &FieldSpec) -> Option<i64> {
    let label = label::find_label(container, field.label_aliases)?;
    value::associate_value(container, label, field.label_aliases[0])
}

/// Run the full dashboard extraction pass.
pub fn scrape_dashboard(doc: &DocSnapshot) -> DashboardReport {
    let records = DASHBOARD_SECTIONS
        .iter()
        .map(|spec| extract_section(doc, spec))
        .collect();

    DashboardReport {
        url: doc.url().to_string(),
        title: doc.title(),
        date_range: date_range(doc),
        records,
    }
}

/// Recover the dashboard's reporting date range from its filter inputs, when
/// both ends carry a value in the markup.
pub fn date_range(doc: &DocSnapshot) -> Option<String> {
    let inputs = doc.inputs();
    let start = inputs
        .iter()
        .find(|i| input_matches(**i, &["start", "begin"]))?;
    let end = inputs.iter().find(|i| input_matches(**i, &["end"]))?;

    match (start.value().attr("value"), end.value().attr("value")) {
        (Some(s), Some(e)) if !s.is_empty() && !e.is_empty() => Some(format!("{} - {}", s, e)),
        _ => None,
    }
}

fn input_matches(input: ElementRef<'_>, hints: &[&str]) -> bool {
    let hay = [
        input.value().attr("placeholder"),
        input.value().attr("aria-label"),
        input.value().attr("id"),
    ]
    .iter()
    .flatten()
    .map(|s| s.to_lowercase())
    .collect::<Vec<_>>()
    .join(" ");
    hints.iter().any(|h| hay.contains(h))
}
