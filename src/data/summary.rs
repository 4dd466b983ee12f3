use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use serde::Serialize;

use super::model::{Record, NOT_AVAILABLE};

/// How many routes the revenue chart and the heatmap keep.
pub const TOP_ROUTES: usize = 10;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Scalar headline metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_tickets: usize,
    pub avg_fare: f64,
    pub total_revenue: f64,
    pub max_booking: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMeans {
    pub category: String,
    pub mean_seat_fare: f64,
    pub mean_total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteRevenue {
    pub route: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeGenderRevenue {
    pub age_group: String,
    pub gender: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderCount {
    pub gender: String,
    pub count: usize,
}

/// Row counts pivoted by route (rows) and time of travel (columns).
/// Both axes are sorted; absent combinations hold 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Heatmap {
    pub routes: Vec<String>,
    pub times: Vec<String>,
    /// `counts[row][col]` for `routes[row]` × `times[col]`.
    pub counts: Vec<Vec<usize>>,
}

impl Heatmap {
    pub fn get(&self, route: &str, time: &str) -> Option<usize> {
        let row = self.routes.iter().position(|r| r == route)?;
        let col = self.times.iter().position(|t| t == time)?;
        Some(self.counts[row][col])
    }

    /// Largest cell, used to scale colours.
    pub fn max_count(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Mode-based statements about the filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub top_route: String,
    pub top_time: String,
    pub dominant_gender: String,
    pub dominant_age_group: String,
    pub multi_seat_percent: f64,
}

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub kpis: Kpis,
    pub category_means: Vec<CategoryMeans>,
    pub route_revenue_top10: Vec<RouteRevenue>,
    pub age_gender_revenue: Vec<AgeGenderRevenue>,
    pub gender_counts: Vec<GenderCount>,
    /// `None` when there are no rows to pivot.
    pub route_time_heatmap: Option<Heatmap>,
    pub insights: Insights,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute every statistic over `records`. Empty input yields zeros and
/// `"N/A"` rather than failing.
pub fn summarize<'a, I>(records: I) -> Summary
where
    I: IntoIterator<Item = &'a Record>,
{
    let rows: Vec<&Record> = records.into_iter().collect();

    Summary {
        kpis: kpis(&rows),
        category_means: category_means(&rows),
        route_revenue_top10: route_revenue_top(&rows, TOP_ROUTES),
        age_gender_revenue: age_gender_revenue(&rows),
        gender_counts: gender_counts(&rows),
        route_time_heatmap: route_time_heatmap(&rows, TOP_ROUTES),
        insights: insights(&rows),
    }
}

fn kpis(rows: &[&Record]) -> Kpis {
    let total_tickets = rows.len();
    if total_tickets == 0 {
        return Kpis::default();
    }
    let fare_sum: f64 = rows.iter().map(|r| r.seat_fare).sum();
    Kpis {
        total_tickets,
        avg_fare: fare_sum / total_tickets as f64,
        total_revenue: rows.iter().map(|r| r.total_amount).sum(),
        max_booking: rows.iter().map(|r| r.total_amount).fold(0.0, f64::max),
    }
}

fn category_means(rows: &[&Record]) -> Vec<CategoryMeans> {
    // category → (fare sum, total sum, n)
    let mut groups: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for r in rows {
        let entry = groups.entry(r.category.as_str()).or_default();
        entry.0 += r.seat_fare;
        entry.1 += r.total_amount;
        entry.2 += 1;
    }
    groups
        .into_iter()
        .map(|(category, (fare, total, n))| CategoryMeans {
            category: category.to_string(),
            mean_seat_fare: fare / n as f64,
            mean_total_amount: total / n as f64,
        })
        .collect()
}

/// Revenue per route, highest first. Equal sums keep first-seen order.
fn route_revenue_top(rows: &[&Record], n: usize) -> Vec<RouteRevenue> {
    let mut sums: IndexMap<&str, f64> = IndexMap::new();
    for r in rows {
        *sums.entry(r.route.as_str()).or_default() += r.total_amount;
    }
    let mut ranked: Vec<RouteRevenue> = sums
        .into_iter()
        .map(|(route, revenue)| RouteRevenue {
            route: route.to_string(),
            revenue,
        })
        .collect();
    ranked.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    ranked.truncate(n);
    ranked
}

fn age_gender_revenue(rows: &[&Record]) -> Vec<AgeGenderRevenue> {
    let mut sums: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in rows {
        *sums
            .entry((r.age_group.as_str(), r.gender.as_str()))
            .or_default() += r.total_amount;
    }
    sums.into_iter()
        .map(|((age_group, gender), revenue)| AgeGenderRevenue {
            age_group: age_group.to_string(),
            gender: gender.to_string(),
            revenue,
        })
        .collect()
}

fn gender_counts(rows: &[&Record]) -> Vec<GenderCount> {
    value_counts(rows.iter().map(|r| r.gender.as_str()))
        .into_iter()
        .map(|(gender, count)| GenderCount {
            gender: gender.to_string(),
            count,
        })
        .collect()
}

/// Pivot of the `n` most frequent routes. Returns `None` for no rows.
fn route_time_heatmap(rows: &[&Record], n: usize) -> Option<Heatmap> {
    let frequent: BTreeSet<&str> = value_counts(rows.iter().map(|r| r.route.as_str()))
        .into_iter()
        .take(n)
        .map(|(route, _)| route)
        .collect();

    let mut cells: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut times: BTreeSet<&str> = BTreeSet::new();
    for r in rows.iter().filter(|r| frequent.contains(r.route.as_str())) {
        *cells
            .entry((r.route.as_str(), r.time_of_travel.as_str()))
            .or_default() += 1;
        times.insert(r.time_of_travel.as_str());
    }
    if cells.is_empty() {
        return None;
    }

    let counts = frequent
        .iter()
        .map(|route| {
            times
                .iter()
                .map(|time| cells.get(&(*route, *time)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    Some(Heatmap {
        routes: frequent.iter().map(|s| s.to_string()).collect(),
        times: times.iter().map(|s| s.to_string()).collect(),
        counts,
    })
}

fn insights(rows: &[&Record]) -> Insights {
    let mode_or_na = |values: Vec<&str>| mode(values).unwrap_or(NOT_AVAILABLE).to_string();

    let multi_seat_percent = if rows.is_empty() {
        0.0
    } else {
        let multi = rows.iter().filter(|r| r.is_multi_seat()).count();
        multi as f64 / rows.len() as f64 * 100.0
    };

    Insights {
        top_route: mode_or_na(rows.iter().map(|r| r.route.as_str()).collect()),
        top_time: mode_or_na(rows.iter().map(|r| r.time_of_travel.as_str()).collect()),
        dominant_gender: mode_or_na(rows.iter().map(|r| r.gender.as_str()).collect()),
        dominant_age_group: mode_or_na(rows.iter().map(|r| r.age_group.as_str()).collect()),
        multi_seat_percent,
    }
}

// ---------------------------------------------------------------------------
// Counting helpers
// ---------------------------------------------------------------------------

/// Occurrences per value, most frequent first. Equal counts keep first-seen
/// order.
pub fn value_counts<'a, I>(values: I) -> Vec<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Most frequent value. Among equally frequent values the lexicographically
/// smallest wins. `None` for no values.
pub fn mode<'a, I>(values: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Seat fare vs transaction total per category, for the scatter chart.
pub fn fare_scatter<'a, I>(records: I) -> BTreeMap<&'a str, Vec<[f64; 2]>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut points: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for r in records {
        points
            .entry(r.category.as_str())
            .or_default()
            .push([r.seat_fare, r.total_amount]);
    }
    points
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

impl Summary {
    /// Markdown bullets describing the selection.
    pub fn narrative(&self) -> Vec<String> {
        let i = &self.insights;
        vec![
            format!(
                "**Operational Lead:** The busiest route is **{}**, with most travel during **{}**.",
                i.top_route, i.top_time
            ),
            format!(
                "**Customer Profile:** Passengers are mostly **{}**, and the **{}** age group is the most active.",
                i.dominant_gender, i.dominant_age_group
            ),
            format!(
                "**Group Travel:** About **{:.1}%** of bookings cover more than one seat (Total Amount > Seat Fare).",
                i.multi_seat_percent
            ),
            format!(
                "**Yield:** Average seat fare is **{}**, and the largest single transaction is **{}**.",
                format_money(self.kpis.avg_fare),
                format_money(self.kpis.max_booking)
            ),
        ]
    }
}

/// `1234567` → `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Rupee amount rounded to two decimals with thousands separators.
pub fn format_money(v: f64) -> String {
    let fixed = format!("{v:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("₹{}.{frac_part}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{sign}{out}")
}
