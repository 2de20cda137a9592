// Time-ranged player-to-slot assignment records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Database identifier of an assignment row.
pub type AssignmentId = i64;

/// Identifier of a player in the player directory.
pub type PlayerId = i64;

/// A record linking a player to a roster slot over a datetime range.
///
/// `from_datetime == None` means the player has held the slot since the
/// tracked window began; `to_datetime == None` means the player currently
/// holds it. The backend partitions each slot into non-overlapping
/// `[from, to)` intervals; the client does not enforce that invariant and
/// treats assignments purely as independent records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub player_id: PlayerId,
    pub roster_slot_code: String,
    pub from_datetime: Option<DateTime<Utc>>,
    pub to_datetime: Option<DateTime<Utc>>,
}

impl Assignment {
    /// UTC calendar day of the transfer-in boundary, if closed.
    pub fn from_day(&self) -> Option<NaiveDate> {
        self.from_datetime.map(|ts| utc_day(&ts))
    }

    /// UTC calendar day of the transfer-out boundary, if closed.
    pub fn to_day(&self) -> Option<NaiveDate> {
        self.to_datetime.map(|ts| utc_day(&ts))
    }
}

/// Truncate a timestamp to its UTC calendar day.
///
/// All bucketing goes through this single helper so day boundaries never
/// depend on the host locale or time zone.
pub fn utc_day(ts: &DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_day_truncates_to_calendar_day() {
        let late_evening = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        assert_eq!(
            utc_day(&late_evening),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );

        let midnight = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(
            utc_day(&midnight),
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn boundary_days_follow_optional_fields() {
        let assignment = Assignment {
            id: 1,
            player_id: 10,
            roster_slot_code: "F1".into(),
            from_datetime: None,
            to_datetime: Some(Utc.with_ymd_and_hms(2024, 1, 10, 12, 30, 0).unwrap()),
        };
        assert_eq!(assignment.from_day(), None);
        assert_eq!(
            assignment.to_day(),
            Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
    }
}
