use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{
    channel_stats, comp_summary, monthly_pnl, overview, segment_customers, sponsor_report,
    zone_stats,
};
use crate::models::{
    ChannelStat, CompSummary, CrmFilter, CrmReport, CustomerSegment, PnlMonth, RevenueOverview,
    SponsorFilter, SponsorReport, ZoneStat,
};

use super::{date_param, non_empty, GameQuery};

// ── Arena ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ArenaResponse {
    pub overview: RevenueOverview,
    pub zones: Vec<ZoneStat>,
}

pub async fn arena(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<ArenaResponse>, ApiError> {
    let filter = query.to_filter()?;
    let dataset = state.dataset.read().await;

    Ok(Json(ArenaResponse {
        overview: overview(&dataset.games, &filter),
        zones: zone_stats(&dataset.games, &filter),
    }))
}

// ── Channels ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelStat>,
}

pub async fn channels(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<ChannelsResponse>, ApiError> {
    let filter = query.to_filter()?;
    let dataset = state.dataset.read().await;

    Ok(Json(ChannelsResponse {
        channels: channel_stats(&dataset.games, &filter),
    }))
}

// ── Comps ───────────────────────────────────────────────────────

pub async fn comps(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<CompSummary>, ApiError> {
    let filter = query.to_filter()?;
    let dataset = state.dataset.read().await;

    Ok(Json(comp_summary(&dataset.games, &filter)))
}

// ── P&L ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PnlResponse {
    pub months: Vec<PnlMonth>,
    pub total: f64,
}

pub async fn pnl(
    State(state): State<AppState>,
    Query(query): Query<GameQuery>,
) -> Result<Json<PnlResponse>, ApiError> {
    let filter = query.to_filter()?;
    let dataset = state.dataset.read().await;

    let months = monthly_pnl(&dataset.games, &filter);
    let total = months.iter().map(|m| m.revenue).sum();
    Ok(Json(PnlResponse { months, total }))
}

// ── CRM ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CrmParams {
    pub reference_date: Option<String>,
    /// Segment key, e.g. `at_risk`
    pub segment: Option<String>,
}

impl CrmParams {
    fn to_filter(&self) -> Result<CrmFilter, ApiError> {
        let segment = match non_empty(&self.segment) {
            None => None,
            Some(raw) => Some(
                serde_json::from_value::<CustomerSegment>(serde_json::Value::String(
                    raw.to_lowercase(),
                ))
                .map_err(|_| ApiError::BadRequest(format!("unknown segment: {}", raw)))?,
            ),
        };

        Ok(CrmFilter {
            reference_date: date_param("reference_date", &self.reference_date)?,
            segment,
        })
    }
}

pub async fn crm(
    State(state): State<AppState>,
    Query(params): Query<CrmParams>,
) -> Result<Json<CrmReport>, ApiError> {
    let filter = params.to_filter()?;
    let dataset = state.dataset.read().await;

    Ok(Json(segment_customers(&dataset.customers, &filter)))
}

// ── Sponsors ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SponsorParams {
    pub season: Option<String>,
    pub category: Option<String>,
}

pub async fn sponsors(
    State(state): State<AppState>,
    Query(params): Query<SponsorParams>,
) -> Result<Json<SponsorReport>, ApiError> {
    let filter = SponsorFilter {
        season: non_empty(&params.season),
        category: non_empty(&params.category),
    };
    let dataset = state.dataset.read().await;

    Ok(Json(sponsor_report(&dataset.sponsors, &filter)))
}

#[cfg(test)]
mod tests {
    use super::super::testing::{empty_state, fixture_state, get_json};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_arena() {
        let (status, json) = get_json(fixture_state(), "/api/analytics/arena").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["overview"]["games"], 4);
        let zones = json["zones"].as_array().unwrap();
        assert_eq!(zones.len(), 7);

        let curva = zones.iter().find(|z| z["zone"] == "curva").unwrap();
        // Libera 1100+1750+650+1500 plus Omaggi 60+120+200+90
        assert_eq!(curva["sold"], 5470);
        assert_eq!(curva["capacity"], 1800 * 4);
    }

    #[tokio::test]
    async fn test_arena_channel_subset() {
        let (status, json) =
            get_json(fixture_state(), "/api/analytics/arena?channels=giveaway").await;

        assert_eq!(status, StatusCode::OK);
        let curva = json["zones"]
            .as_array()
            .unwrap()
            .iter()
            .find(|z| z["zone"] == "curva")
            .unwrap()
            .clone();
        assert_eq!(curva["sold"], 470);
        assert_eq!(curva["revenue"], 0.0);
    }

    #[tokio::test]
    async fn test_arena_empty_dataset() {
        let (status, json) = get_json(empty_state(), "/api/analytics/arena").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["overview"]["games"], 0);
        assert_eq!(json["overview"]["occupancy"], 0.0);
    }

    #[tokio::test]
    async fn test_channels() {
        let (status, json) = get_json(fixture_state(), "/api/analytics/channels").await;

        assert_eq!(status, StatusCode::OK);
        let channels = json["channels"].as_array().unwrap();
        assert_eq!(channels.len(), 7);
        let share: f64 = channels
            .iter()
            .map(|c| c["revenue_share"].as_f64().unwrap())
            .sum();
        assert!((share - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_comps() {
        let (status, json) = get_json(fixture_state(), "/api/analytics/comps").await;

        assert_eq!(status, StatusCode::OK);
        // Curva Omaggi 470 plus Parterre Prot 18+22+10+25
        assert_eq!(json["total_giveaway"], 545);
        assert!(json["giveaway_reasons"]["Sponsor"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_pnl() {
        let (status, json) = get_json(fixture_state(), "/api/analytics/pnl").await;

        assert_eq!(status, StatusCode::OK);
        let months = json["months"].as_array().unwrap();
        let keys: Vec<u64> = months.iter().map(|m| m["month"].as_u64().unwrap()).collect();
        assert_eq!(keys, vec![2, 10]);
        assert_eq!(json["total"], 267_750.0);
    }

    #[tokio::test]
    async fn test_crm_segment_filter() {
        let (status, json) =
            get_json(fixture_state(), "/api/analytics/crm?segment=hibernating").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reference_date"], "2024-11-03");
        let customers = json["customers"].as_array().unwrap();
        assert!(!customers.is_empty());
        assert!(customers.iter().all(|c| c["segment"] == "hibernating"));
    }

    #[tokio::test]
    async fn test_crm_unknown_segment() {
        let (status, json) = get_json(fixture_state(), "/api/analytics/crm?segment=vip").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_sponsors() {
        let (status, json) =
            get_json(fixture_state(), "/api/analytics/sponsors?season=2024-25").await;

        assert_eq!(status, StatusCode::OK);
        let sponsors = json["sponsors"].as_array().unwrap();
        assert_eq!(sponsors.len(), 3);
        assert_eq!(sponsors[0]["company"], "Banca Alpina");
        assert_eq!(sponsors[0]["tier"], "platinum");
        assert_eq!(json["tier_counts"]["gold"], 1);
    }
}
