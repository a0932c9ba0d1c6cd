use crate::domain::model::{
    BookingAction, BookingRequest, BookingStatus, BookingSummary, NewBookingRequest,
};
use crate::utils::error::{AssistantError, Result};
use chrono::{DateTime, Utc};

/// In-memory booking requests received by a provider.
#[derive(Debug, Default)]
pub struct BookingLedger {
    requests: Vec<BookingRequest>,
    next_id: u64,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, new: NewBookingRequest) -> Result<BookingRequest> {
        self.create_at(new, Utc::now())
    }

    fn create_at(&mut self, new: NewBookingRequest, now: DateTime<Utc>) -> Result<BookingRequest> {
        for (field, value) in [
            ("clientName", &new.client_name),
            ("eventType", &new.event_type),
            ("service", &new.service),
            ("location", &new.location),
        ] {
            if value.trim().is_empty() {
                return Err(AssistantError::ValidationError {
                    message: format!("{} cannot be empty", field),
                });
            }
        }
        if new.guests == 0 {
            return Err(AssistantError::ValidationError {
                message: "guests must be at least 1".to_string(),
            });
        }

        self.next_id += 1;
        let request = BookingRequest {
            id: self.next_id.to_string(),
            client_name: new.client_name.trim().to_string(),
            event_date: new.event_date,
            event_type: new.event_type,
            service: new.service,
            location: new.location,
            guests: new.guests,
            status: BookingStatus::Pending,
            created_at: now,
        };
        tracing::info!(
            "📨 Booking request {} from {} for {}",
            request.id,
            request.client_name,
            request.event_date
        );
        self.requests.push(request.clone());
        Ok(request)
    }

    /// Accepts or rejects a pending request.
    pub fn respond(&mut self, id: &str, action: BookingAction) -> Result<BookingRequest> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AssistantError::NotFoundError {
                entity: "booking request".to_string(),
                id: id.to_string(),
            })?;

        if request.status != BookingStatus::Pending {
            return Err(AssistantError::ValidationError {
                message: format!(
                    "booking request {} is already {}",
                    id,
                    request.status.as_str()
                ),
            });
        }

        request.status = action.target_status();
        tracing::info!("Booking request {} is now {}", id, request.status.as_str());
        Ok(request.clone())
    }

    /// Newest first, optionally restricted to one status.
    pub fn list(&self, status: Option<BookingStatus>) -> Vec<BookingRequest> {
        let mut matching: Vec<BookingRequest> = self
            .requests
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    pub fn summary(&self) -> BookingSummary {
        self.requests
            .iter()
            .fold(BookingSummary::default(), |mut summary, r| {
                match r.status {
                    BookingStatus::Pending => summary.pending += 1,
                    BookingStatus::Accepted => summary.accepted += 1,
                    BookingStatus::Rejected => summary.rejected += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn new_request(client: &str, guests: u32) -> NewBookingRequest {
        NewBookingRequest {
            client_name: client.to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
            event_type: "Birthday".to_string(),
            service: "Premium Catering".to_string(),
            location: "Polanco, CDMX".to_string(),
            guests,
        }
    }

    #[test]
    fn test_create_starts_pending_with_sequential_ids() {
        let mut ledger = BookingLedger::new();
        let first = ledger.create(new_request("María González", 50)).unwrap();
        let second = ledger.create(new_request("Carlos Ruiz", 120)).unwrap();

        assert_eq!(first.id, "1");
        assert_eq!(second.id, "2");
        assert_eq!(first.status, BookingStatus::Pending);
        assert_eq!(ledger.summary().pending, 2);
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let mut ledger = BookingLedger::new();
        assert!(ledger.create(new_request("  ", 10)).is_err());
        assert!(ledger.create(new_request("Ana", 0)).is_err());
        assert!(ledger.list(None).is_empty());
    }

    #[test]
    fn test_respond_only_from_pending() {
        let mut ledger = BookingLedger::new();
        let created = ledger.create(new_request("María González", 50)).unwrap();

        let accepted = ledger.respond(&created.id, BookingAction::Accept).unwrap();
        assert_eq!(accepted.status, BookingStatus::Accepted);

        let err = ledger.respond(&created.id, BookingAction::Reject).unwrap_err();
        assert!(matches!(err, AssistantError::ValidationError { .. }));
        assert_eq!(
            err.to_string(),
            "Validation error: booking request 1 is already accepted"
        );

        let err = ledger.respond("404", BookingAction::Accept).unwrap_err();
        assert_eq!(err.status_code(), 404);

        let summary = ledger.summary();
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.pending, 0);
    }

    #[test]
    fn test_list_is_newest_first_and_filters_by_status() {
        let mut ledger = BookingLedger::new();
        let base = Utc.with_ymd_and_hms(2024, 7, 18, 9, 0, 0).unwrap();
        ledger
            .create_at(new_request("Carlos Ruiz", 120), base)
            .unwrap();
        ledger
            .create_at(new_request("María González", 50), base + Duration::days(2))
            .unwrap();
        ledger.respond("1", BookingAction::Reject).unwrap();

        let all = ledger.list(None);
        assert_eq!(all[0].client_name, "María González");
        assert_eq!(all[1].client_name, "Carlos Ruiz");

        let rejected = ledger.list(Some(BookingStatus::Rejected));
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].id, "1");
    }
}
