// Filters module
// Filter context the events were fetched under; shown in the export header only

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarFilters {
    #[serde(default)]
    pub date_from: String,
    #[serde(default)]
    pub date_to: String,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub task_type: Option<String>,
}

impl CalendarFilters {
    /// Label/value pairs of the non-empty filter fields, in display order
    pub fn applied(&self) -> Vec<(&'static str, &str)> {
        let fields = [
            ("Date From", Some(self.date_from.as_str())),
            ("Date To", Some(self.date_to.as_str())),
            ("Schedule Type", self.schedule_type.as_deref()),
            ("Task Type", self.task_type.as_deref()),
        ];

        fields
            .into_iter()
            .filter_map(|(label, value)| {
                let value = value?.trim();
                (!value.is_empty()).then_some((label, value))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.applied().is_empty()
    }
}
