use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::de;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    pub child_id: i64,
    pub name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub diagnosis_date: Option<String>,
}

/// Parse the leading `YYYY-MM-DD` of a date or timestamp string.
fn parse_leading_date(value: &str) -> Option<NaiveDate> {
    let date = value.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

impl Child {
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth.as_deref().and_then(parse_leading_date)
    }

    /// Age in whole years as of `today`
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.date_of_birth().map(|dob| {
            let mut age = today.year() - dob.year();
            if (today.month(), today.day()) < (dob.month(), dob.day()) {
                age -= 1;
            }
            age.max(0)
        })
    }

    pub fn age(&self) -> Option<i32> {
        self.age_on(Utc::now().date_naive())
    }

    pub fn age_str(&self) -> String {
        self.age().map(|a| a.to_string()).unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewChild {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthLog {
    pub log_id: i64,
    #[serde(default)]
    pub child_id: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub height_cm: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub weight_kg: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub head_circumference_cm: Option<f64>,
    pub note: Option<String>,
    pub recorded_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGrowthLog {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub head_circumference_cm: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    #[default]
    Learning,
    Speech,
    Therapy,
    Play,
    #[serde(other)]
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Learning => "learning",
            ActivityType::Speech => "speech",
            ActivityType::Therapy => "therapy",
            ActivityType::Play => "play",
            ActivityType::Other => "other",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learning" => Ok(ActivityType::Learning),
            "speech" => Ok(ActivityType::Speech),
            "therapy" => Ok(ActivityType::Therapy),
            "play" => Ok(ActivityType::Play),
            other => Err(format!(
                "Unknown activity type: {} (expected learning, speech, therapy or play)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub activity_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub activity_type: ActivityType,
    pub scheduled_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub scheduled_time: String,
}
