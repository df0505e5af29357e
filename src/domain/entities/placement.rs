//! Placement entity: a purchased ad slot in a newsletter send.

use chrono::{DateTime, Utc};

/// An ad placement linking an advertiser, a publisher and a newsletter send.
///
/// Placements are owned by the persistence layer. The click pipeline only
/// reads them, by identifier, to obtain the landing URL and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: String,
    pub advertiser_id: String,
    pub publisher_id: String,
    pub send_id: String,
    pub price_cpc_cents: i64,
    pub landing_url: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Placement {
    /// Returns true if the placement has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input data for creating a new placement.
///
/// `id` is assigned by the service layer; `created_at` is set by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlacement {
    pub id: String,
    pub advertiser_id: String,
    pub publisher_id: String,
    pub send_id: String,
    pub price_cpc_cents: i64,
    pub landing_url: String,
}

/// Partial update for a live placement.
///
/// `None` fields are left unchanged. The advertiser, publisher and landing
/// page are fixed once a placement exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementPatch {
    pub price_cpc_cents: Option<i64>,
    pub send_id: Option<String>,
}

impl PlacementPatch {
    /// Returns true if the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.price_cpc_cents.is_none() && self.send_id.is_none()
    }

    /// Applies the set fields to `placement`.
    pub fn apply_to(&self, placement: &mut Placement) {
        if let Some(price) = self.price_cpc_cents {
            placement.price_cpc_cents = price;
        }
        if let Some(send_id) = &self.send_id {
            placement.send_id.clone_from(send_id);
        }
    }
}

/// Optional equality filters for listing placements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementFilter {
    pub advertiser_id: Option<String>,
    pub publisher_id: Option<String>,
    pub send_id: Option<String>,
}

impl PlacementFilter {
    /// Returns true if the placement satisfies every set filter field.
    pub fn matches(&self, placement: &Placement) -> bool {
        self.advertiser_id
            .as_deref()
            .is_none_or(|v| v == placement.advertiser_id)
            && self
                .publisher_id
                .as_deref()
                .is_none_or(|v| v == placement.publisher_id)
            && self
                .send_id
                .as_deref()
                .is_none_or(|v| v == placement.send_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement() -> Placement {
        Placement {
            id: "p1".to_string(),
            advertiser_id: "adv".to_string(),
            publisher_id: "pub".to_string(),
            send_id: "send".to_string(),
            price_cpc_cents: 150,
            landing_url: "https://advertiser.example/offer".to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_is_deleted() {
        let mut p = placement();
        assert!(!p.is_deleted());

        p.deleted_at = Some(Utc::now());
        assert!(p.is_deleted());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(PlacementFilter::default().matches(&placement()));
    }

    #[test]
    fn test_filter_fields_are_conjunctive() {
        let filter = PlacementFilter {
            advertiser_id: Some("adv".to_string()),
            publisher_id: Some("other".to_string()),
            send_id: None,
        };
        assert!(!filter.matches(&placement()));

        let filter = PlacementFilter {
            advertiser_id: Some("adv".to_string()),
            publisher_id: Some("pub".to_string()),
            send_id: Some("send".to_string()),
        };
        assert!(filter.matches(&placement()));
    }

    #[test]
    fn test_patch_changes_only_set_fields() {
        let mut p = placement();
        assert!(PlacementPatch::default().is_empty());

        let patch = PlacementPatch {
            price_cpc_cents: Some(300),
            send_id: None,
        };
        assert!(!patch.is_empty());
        patch.apply_to(&mut p);

        assert_eq!(p.price_cpc_cents, 300);
        assert_eq!(p.send_id, "send");
    }
}
