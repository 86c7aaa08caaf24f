//! Offline assistant: routes the question by keyword to one aggregate and
//! phrases it. Deterministic; no network.

use async_trait::async_trait;

use super::{AssistantBackend, AssistantContext, AssistantError};
use crate::models::SponsorTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Zones,
    Channels,
    Comps,
    Pnl,
    Customers,
    Sponsors,
    Overview,
}

/// Keyword stems, English and Italian. First topic with a hit wins.
const TOPICS: &[(Topic, &[&str])] = &[
    (Topic::Comps, &["omagg", "comp", "giveaway", "gratuit", "leakage"]),
    (Topic::Sponsors, &["sponsor", "partner", "contratt"]),
    (Topic::Customers, &["client", "customer", "crm", "segment", "rfm", "tifos"]),
    (Topic::Channels, &["channel", "canal", "abbonament", "season ticket"]),
    (Topic::Pnl, &["month", "mese", "mesi", "p&l", "pnl", "trend"]),
    (Topic::Zones, &["zone", "zona", "settor", "occupan", "riempiment", "seat", "posti"]),
];

fn topic_for(question: &str) -> Topic {
    let lower = question.to_lowercase();
    TOPICS
        .iter()
        .find(|(_, stems)| stems.iter().any(|s| lower.contains(s)))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Overview)
}

fn euro(value: f64) -> String {
    format!("€{value:.2}")
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn month_name(month: u8) -> String {
    chrono::Month::try_from(month)
        .map(|m| m.name().to_string())
        .unwrap_or_else(|_| format!("month {month}"))
}

const NO_GAMES: &str = "No games match the current filter.";

fn answer_overview(ctx: &AssistantContext) -> String {
    let o = &ctx.overview;
    if o.games == 0 {
        return NO_GAMES.to_string();
    }
    format!(
        "{} games, {} spectators ({} occupancy), {} revenue at {} per ticket.",
        o.games,
        o.attendance,
        percent(o.occupancy),
        euro(o.total_revenue),
        euro(o.yield_per_ticket)
    )
}

fn answer_zones(ctx: &AssistantContext) -> String {
    let offered: Vec<_> = ctx.zones.iter().filter(|z| z.capacity > 0).collect();
    let best = offered
        .iter()
        .max_by(|a, b| a.occupancy.total_cmp(&b.occupancy));
    let worst = offered
        .iter()
        .min_by(|a, b| a.occupancy.total_cmp(&b.occupancy));

    match (best, worst) {
        (Some(best), Some(worst)) => format!(
            "Highest occupancy: {} at {} ({} per ticket). Lowest: {} at {}.",
            best.zone,
            percent(best.occupancy),
            euro(best.yield_per_ticket),
            worst.zone,
            percent(worst.occupancy)
        ),
        _ => NO_GAMES.to_string(),
    }
}

fn answer_channels(ctx: &AssistantContext) -> String {
    let top = ctx
        .channels
        .iter()
        .filter(|c| c.revenue > 0.0)
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue));
    match top {
        Some(top) => format!(
            "{} leads with {} ({} of revenue, {} tickets at {} each).",
            top.channel,
            euro(top.revenue),
            percent(top.revenue_share),
            top.quantity,
            euro(top.yield_per_ticket)
        ),
        None => "No paid channel revenue for the current filter.".to_string(),
    }
}

fn answer_comps(ctx: &AssistantContext) -> String {
    let c = &ctx.comps;
    if c.total_giveaway == 0 {
        return "No complimentary tickets for the current filter.".to_string();
    }
    let mut answer = format!(
        "{} complimentary tickets against {} paid ({} comp rate), an estimated {} in leakage.",
        c.total_giveaway,
        c.total_paid,
        percent(c.comp_rate),
        euro(c.leakage_value)
    );
    if let Some((reason, count)) = c.giveaway_reasons.iter().max_by_key(|(_, n)| **n) {
        answer.push_str(&format!(" Main reason: {reason} ({count})."));
    }
    answer
}

fn answer_pnl(ctx: &AssistantContext) -> String {
    let best = ctx
        .pnl
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue));
    match best {
        Some(best) => {
            let total: f64 = ctx.pnl.iter().map(|m| m.revenue).sum();
            format!(
                "{} is the strongest month with {} of {} across {} months.",
                month_name(best.month),
                euro(best.revenue),
                euro(total),
                ctx.pnl.len()
            )
        }
        None => NO_GAMES.to_string(),
    }
}

fn answer_customers(ctx: &AssistantContext) -> String {
    if ctx.segments.is_empty() {
        return "No CRM data loaded.".to_string();
    }
    let parts: Vec<String> = ctx
        .segments
        .iter()
        .map(|s| format!("{} {} ({})", s.customers, s.segment, euro(s.revenue)))
        .collect();
    format!("Customer segments: {}.", parts.join(", "))
}

fn answer_sponsors(ctx: &AssistantContext) -> String {
    let s = &ctx.sponsors;
    let Some(top) = s.sponsors.first() else {
        return "No sponsorship data loaded.".to_string();
    };
    format!(
        "{} sponsors worth {} in contracts ({} Platinum). Largest: {} at {} ({}).",
        s.sponsors.len(),
        euro(s.total_contract_value),
        s.in_tier(SponsorTier::Platinum).len(),
        top.company,
        euro(top.contract_value),
        top.tier
    )
}

/// Keyword-routed answers from the aggregates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicBackend;

#[async_trait]
impl AssistantBackend for HeuristicBackend {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn answer(
        &self,
        question: &str,
        context: &AssistantContext,
    ) -> Result<String, AssistantError> {
        let answer = match topic_for(question) {
            Topic::Zones => answer_zones(context),
            Topic::Channels => answer_channels(context),
            Topic::Comps => answer_comps(context),
            Topic::Pnl => answer_pnl(context),
            Topic::Customers => answer_customers(context),
            Topic::Sponsors => answer_sponsors(context),
            Topic::Overview => answer_overview(context),
        };
        Ok(answer)
    }
}
