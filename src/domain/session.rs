use chrono::{DateTime, Utc};
use serde::Serialize;

/// A charging session reported by a charger. Read-only for the admin surfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSession {
    pub session_id: i32,
    pub charger_id: String,
    pub user: String,
    pub start_time: DateTime<Utc>,
    pub stop_time: Option<DateTime<Utc>>,
    pub unit_consumed: f64,
    pub price: f64,
}

/// Most recently stopped first; sessions still running sort last.
pub fn sort_by_stop_time_desc(sessions: &mut [DeviceSession]) {
    sessions.sort_by(|a, b| match (a.stop_time, b.stop_time) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.start_time.cmp(&a.start_time),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(id: i32, stop_offset: Option<i64>) -> DeviceSession {
        let base = Utc::now();
        DeviceSession {
            session_id: id,
            charger_id: "CP-1".into(),
            user: "driver".into(),
            start_time: base,
            stop_time: stop_offset.map(|m| base + Duration::minutes(m)),
            unit_consumed: 1.0,
            price: 10.0,
        }
    }

    #[test]
    fn open_sessions_sort_last() {
        let mut sessions = vec![session(1, Some(5)), session(2, None), session(3, Some(30))];
        sort_by_stop_time_desc(&mut sessions);
        let order: Vec<_> = sessions.iter().map(|s| s.session_id).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }
}
