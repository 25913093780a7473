use serde::Deserialize;

/// An issue as returned by Jira's search endpoint, restricted to the fields we request.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IssueFields {
    pub summary: String,
    pub status: Status,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub name: String,
}

impl Issue {
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    pub fn status_name(&self) -> &str {
        &self.fields.status.name
    }

    /// Description text, treating a blank description the same as a missing one
    pub fn description(&self) -> Option<&str> {
        self.fields
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
pub fn make_issue(key: &str, summary: &str, status: &str, description: Option<&str>) -> Issue {
    Issue {
        key: key.to_string(),
        fields: IssueFields {
            summary: summary.to_string(),
            status: Status {
                name: status.to_string(),
            },
            description: description.map(String::from),
        },
    }
}
