//! Zone heat-map and channel mix.

use crate::models::{ChannelStat, GameData, GameFilter, SalesChannel, Zone, ZoneStat};

use super::{calculate_occupancy, calculate_share, calculate_yield};

/// One heat-map cell per zone, in venue order.
///
/// Capacity is summed over every game that passes the filter, so occupancy is
/// the share of all seats offered across those games. Only sales on channels
/// in the filter's channel subset count towards `sold` and `revenue`.
pub fn zone_stats(games: &[GameData], filter: &GameFilter) -> Vec<ZoneStat> {
    let mut sold = [0u32; Zone::ALL.len()];
    let mut revenue = [0f64; Zone::ALL.len()];
    let mut capacity = [0u32; Zone::ALL.len()];

    for game in filter.apply(games) {
        for (i, zone) in Zone::ALL.iter().enumerate() {
            capacity[i] = capacity[i].saturating_add(game.zone_capacity(*zone));
        }
        for point in &game.sales_breakdown {
            if !filter.includes_channel(point.channel) {
                continue;
            }
            let i = zone_index(point.zone);
            sold[i] = sold[i].saturating_add(point.quantity);
            revenue[i] += point.revenue;
        }
    }

    Zone::ALL
        .iter()
        .enumerate()
        .map(|(i, zone)| ZoneStat {
            zone: *zone,
            sold: sold[i],
            revenue: revenue[i],
            capacity: capacity[i],
            occupancy: calculate_occupancy(sold[i], capacity[i]),
            yield_per_ticket: calculate_yield(revenue[i], sold[i]),
        })
        .collect()
}

/// Sales mix per channel in the filter's subset.
///
/// `revenue_share` is relative to the revenue of the returned channels.
pub fn channel_stats(games: &[GameData], filter: &GameFilter) -> Vec<ChannelStat> {
    let channels: Vec<SalesChannel> = SalesChannel::ALL
        .iter()
        .copied()
        .filter(|c| filter.includes_channel(*c))
        .collect();

    let mut quantity = vec![0u32; channels.len()];
    let mut revenue = vec![0f64; channels.len()];

    for game in filter.apply(games) {
        for point in &game.sales_breakdown {
            if let Some(i) = channels.iter().position(|c| *c == point.channel) {
                quantity[i] = quantity[i].saturating_add(point.quantity);
                revenue[i] += point.revenue;
            }
        }
    }

    let total: f64 = revenue.iter().sum();

    channels
        .iter()
        .enumerate()
        .map(|(i, channel)| ChannelStat {
            channel: *channel,
            quantity: quantity[i],
            revenue: revenue[i],
            yield_per_ticket: calculate_yield(revenue[i], quantity[i]),
            revenue_share: calculate_share(revenue[i], total),
        })
        .collect()
}

fn zone_index(zone: Zone) -> usize {
    Zone::ALL.iter().position(|z| *z == zone).unwrap_or(0)
}
