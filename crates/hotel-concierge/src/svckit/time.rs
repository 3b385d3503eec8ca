//! Date Tools

use async_trait::async_trait;
use chrono::{Local, NaiveDate, TimeDelta};

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::model::DATE_FORMAT;

/// Source of "today" for the date tools
#[derive(Clone, Copy, Debug, Default)]
pub enum Clock {
    /// Local calendar date of the host
    #[default]
    System,
    /// Pinned date, for reproducible runs
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => date,
        }
    }
}

/// Tool returning today's date
#[derive(Default)]
pub struct GetTodayTool {
    clock: Clock,
}

impl GetTodayTool {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Tool for GetTodayTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_today".into(),
            description: "Returns today's date in YYYY-MM-DD format.".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(ToolResult::success("get_today", self.clock.today().format(DATE_FORMAT).to_string()))
    }
}

/// Tool returning a date offset from today
#[derive(Default)]
pub struct GetRelativeDateTool {
    clock: Clock,
}

impl GetRelativeDateTool {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }
}

#[async_trait]
impl Tool for GetRelativeDateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_relative_date".into(),
            description: "Returns a relative date based on offset in days.".into(),
            parameters: vec![ParameterSchema::required(
                "days_offset",
                "integer",
                "Number of days to add to today.",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let date = call
            .int_arg("days_offset")
            .and_then(TimeDelta::try_days)
            .and_then(|offset| self.clock.today().checked_add_signed(offset));

        Ok(match date {
            Some(date) => ToolResult::success("get_relative_date", date.format(DATE_FORMAT).to_string()),
            None => ToolResult::failure("get_relative_date", "days_offset must be a whole number of days"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixed() -> Clock {
        Clock::Fixed(NaiveDate::from_ymd_opt(2025, 4, 12).unwrap())
    }

    #[tokio::test]
    async fn test_today() {
        let result = GetTodayTool::new(fixed()).execute(&ToolCall::new("get_today", json!({}))).await.unwrap();
        assert_eq!(result.output, "2025-04-12");
    }

    #[tokio::test]
    async fn test_relative_date_offsets() {
        let tool = GetRelativeDateTool::new(fixed());
        let at = |offset: serde_json::Value| ToolCall::new("get_relative_date", json!({"days_offset": offset}));

        assert_eq!(tool.execute(&at(json!(1))).await.unwrap().output, "2025-04-13");
        assert_eq!(tool.execute(&at(json!(-12))).await.unwrap().output, "2025-03-31");
        assert_eq!(tool.execute(&at(json!("30"))).await.unwrap().output, "2025-05-12");
        assert!(!tool.execute(&at(json!("soon"))).await.unwrap().success);
        assert!(!tool.execute(&at(json!(i64::MAX))).await.unwrap().success);
    }

    #[test]
    fn test_system_clock_is_default() {
        assert!(matches!(Clock::default(), Clock::System));
    }
}
