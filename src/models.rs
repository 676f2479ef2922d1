// src/models.rs
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ForumError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    /// `None` means the poll never closes.
    pub ending_date: Option<DateTime<Utc>>,
    pub options: Vec<PollOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PollOption {
    pub id: i64,
    pub poll_id: i64,
    pub name: String,
    pub votes_count: i32,
}

impl Poll {
    /// A poll accepts votes until its ending date has passed.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.ending_date {
            Some(ending_date) => ending_date > now,
            None => true,
        }
    }

    /// Adds one vote to every option listed in `chosen` and returns how many
    /// options were incremented. Unknown ids are skipped; a closed poll is
    /// left as it is.
    pub fn apply_votes(&mut self, chosen: &HashSet<i64>, now: DateTime<Utc>) -> usize {
        if !self.is_active(now) {
            return 0;
        }
        let mut applied = 0;
        for option in self.options.iter_mut().filter(|o| chosen.contains(&o.id)) {
            option.votes_count = option.votes_count.saturating_add(1);
            applied += 1;
        }
        applied
    }

    pub fn option(&self, option_id: i64) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|o| i64::from(o.votes_count)).sum()
    }
}

/// Poll as submitted together with a new topic, before it has any ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPoll {
    pub title: String,
    pub ending_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub options: Vec<String>,
}

impl NewPoll {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ending_date: None,
            options: Vec::new(),
        }
    }

    pub fn ending_at(mut self, ending_date: DateTime<Utc>) -> Self {
        self.ending_date = Some(ending_date);
        self
    }

    pub fn option<T: Into<String>>(mut self, name: T) -> Self {
        self.options.push(name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ForumError::invalid_argument("poll title is blank"));
        }
        if let Some(position) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(ForumError::invalid_argument(format!(
                "poll option {position} has a blank name"
            )));
        }
        Ok(())
    }
}

/// Stored settings of one forum plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfiguration {
    pub id: i64,
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub properties: Vec<PluginProperty>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    String,
    Int,
    Boolean,
}

impl PluginConfiguration {
    pub fn new<T: Into<String>>(name: T, active: bool, properties: Vec<PluginProperty>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            active,
            properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PluginProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn poll(ending_date: Option<DateTime<Utc>>) -> Poll {
        Poll {
            id: 1,
            title: "Poll".into(),
            ending_date,
            options: [1, 5, 9]
                .into_iter()
                .map(|id| PollOption {
                    id,
                    poll_id: 1,
                    name: format!("Option:{id}"),
                    votes_count: 4,
                })
                .collect(),
        }
    }

    #[test]
    fn poll_without_ending_date_is_active() {
        assert!(poll(None).is_active(Utc::now()));
    }

    #[test]
    fn ending_date_must_be_strictly_in_the_future() {
        let now = Utc::now();
        assert!(poll(Some(now + Duration::seconds(1))).is_active(now));
        assert!(!poll(Some(now)).is_active(now));
        assert!(!poll(Some(now - Duration::days(1))).is_active(now));
    }

    #[test]
    fn apply_votes_touches_only_chosen_options() {
        let mut poll = poll(None);
        let chosen = HashSet::from([5, 42]);

        assert_eq!(poll.apply_votes(&chosen, Utc::now()), 1);
        assert_eq!(poll.option(1).unwrap().votes_count, 4);
        assert_eq!(poll.option(5).unwrap().votes_count, 5);
        assert_eq!(poll.option(9).unwrap().votes_count, 4);
        assert_eq!(poll.total_votes(), 13);
    }

    #[test]
    fn apply_votes_on_closed_poll_is_noop() {
        let ending = Utc.with_ymd_and_hms(1999, 1, 1, 1, 1, 1).unwrap();
        let mut poll = poll(Some(ending));
        let before = poll.clone();

        assert_eq!(poll.apply_votes(&HashSet::from([1, 5, 9]), Utc::now()), 0);
        assert_eq!(poll, before);
    }

    #[test]
    fn new_poll_rejects_blank_names() {
        assert!(NewPoll::new("  ").validate().is_err());
        assert!(NewPoll::new("Lunch?").option("Pizza").option("").validate().is_err());
        assert!(NewPoll::new("Lunch?").option("Pizza").validate().is_ok());
    }

    #[test]
    fn plugin_configuration_from_json() {
        let json = r#"{
            "id": 3,
            "name": "Questions",
            "active": true,
            "properties": [
                {"name": "Url", "type": "STRING", "value": "http://localhost"},
                {"name": "Timeout", "type": "INT", "value": null}
            ]
        }"#;
        let mut configuration: PluginConfiguration = serde_json::from_str(json).unwrap();

        assert_eq!(configuration.name, "Questions");
        let url = configuration.property("Url").unwrap();
        assert_eq!(url.kind, PropertyKind::String);
        assert_eq!(url.value.as_deref(), Some("http://localhost"));
        assert_eq!(configuration.property("Timeout").unwrap().value, None);
        assert!(configuration.property("Missing").is_none());

        configuration.deactivate();
        assert!(!configuration.active);
        configuration.activate();
        assert!(configuration.active);
    }
}
