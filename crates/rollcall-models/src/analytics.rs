//! Aggregate read models: per-class gender breakdown and period financials.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::ids::StudentId;
use crate::teachers::TeacherSummary;
use crate::value_types::Gender;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct StudentGenderSummary {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ClassAnalyticsDetails {
    pub name: String,
    pub year: i32,
    pub teacher: Option<TeacherSummary>,
    pub students: Vec<StudentGenderSummary>,
}

/// Male and female head counts. `Other` is left for the client to derive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct GenderDistribution {
    pub male: i64,
    pub female: i64,
}

impl GenderDistribution {
    pub fn from_students(students: &[StudentGenderSummary]) -> Self {
        students.iter().fold(Self::default(), |mut acc, s| {
            match s.gender {
                Gender::Male => acc.male += 1,
                Gender::Female => acc.female += 1,
                Gender::Other => {}
            }
            acc
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassAnalytics {
    pub class: ClassAnalyticsDetails,
    pub gender_distribution: GenderDistribution,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Yearly,
    #[default]
    Monthly,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FinancialsParams {
    /// `yearly` or `monthly` (default: monthly)
    #[serde(default, rename = "type")]
    pub period: Option<PeriodType>,
    pub year: Option<i32>,
    /// 1-12, required for monthly reports
    pub month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    MissingYear,
    MissingMonth,
    InvalidMonth(u32),
    OutOfRange,
}

impl std::fmt::Display for PeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingYear => write!(f, "Year is required"),
            Self::MissingMonth => write!(f, "Month is required for monthly reports"),
            Self::InvalidMonth(_) => write!(f, "Month must be between 1 and 12"),
            Self::OutOfRange => write!(f, "Year is out of range"),
        }
    }
}

impl std::error::Error for PeriodError {}

/// Half-open `[start, end)` creation-time window.
///
/// The end is the first instant after the last calendar day, so the whole last
/// day is included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn yearly(year: i32) -> Result<Self, PeriodError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(PeriodError::OutOfRange)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or(PeriodError::OutOfRange)?;
        Ok(Self::between(start, end))
    }

    pub fn monthly(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::OutOfRange)?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(PeriodError::OutOfRange)?;
        Ok(Self::between(start, end))
    }

    fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.and_time(chrono::NaiveTime::MIN).and_utc(),
            end: end.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }

    #[cfg(test)]
    pub fn year(&self) -> i32 {
        chrono::Datelike::year(&self.start)
    }

    /// Last calendar day covered by the window.
    #[cfg(test)]
    pub fn last_day(&self) -> NaiveDate {
        self.end.date_naive().pred_opt().unwrap_or(self.end.date_naive())
    }

    #[cfg(test)]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

impl FinancialsParams {
    pub fn window(&self) -> Result<ReportWindow, PeriodError> {
        let year = self.year.ok_or(PeriodError::MissingYear)?;
        match self.period.unwrap_or_default() {
            PeriodType::Yearly => ReportWindow::yearly(year),
            PeriodType::Monthly => {
                let month = self.month.ok_or(PeriodError::MissingMonth)?;
                ReportWindow::monthly(year, month)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct FinancialSummary {
    /// Sum of teacher salaries
    pub expenses: f64,
    /// Sum of student fees paid
    pub income: f64,
}
