//! Wardrobe recommendation: comfort band selection followed by condition modifiers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{
    condition,
    derived::DewPointFeel,
    effective::EffectiveTemperature,
    flags::{WindLevel, is_snowy, is_stormy, known},
    format::{fmt0, fmt1},
    model::{BadgeLevel, HourlyContext, Recommendation, UserPreferences, WeatherObservation},
};

/// Base wardrobe tier. Each band includes its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComfortBand {
    /// ≤ 0°C
    Freezing,
    /// ≤ 8°C
    Cold,
    /// ≤ 14°C
    Cool,
    /// ≤ 20°C
    Mild,
    /// ≤ 25°C
    Warm,
    /// > 25°C
    Hot,
}

impl ComfortBand {
    pub fn for_comfort(comfort_c: f64) -> Self {
        if comfort_c <= 0.0 {
            ComfortBand::Freezing
        } else if comfort_c <= 8.0 {
            ComfortBand::Cold
        } else if comfort_c <= 14.0 {
            ComfortBand::Cool
        } else if comfort_c <= 20.0 {
            ComfortBand::Mild
        } else if comfort_c <= 25.0 {
            ComfortBand::Warm
        } else {
            ComfortBand::Hot
        }
    }
}

const TOP_FORMAL: &[(&str, &str)] = &[("t-shirt", "polo or button-down"), ("hoodie", "knit sweater")];
const BOTTOM_FORMAL: &[(&str, &str)] = &[("shorts", "chinos"), ("jeans", "chinos")];

/// Everything the rules read, computed once up front.
struct Inputs<'a> {
    obs: &'a WeatherObservation,
    ctx: Option<&'a HourlyContext>,
    prefs: UserPreferences,
    comfort_c: Option<f64>,
    wet: bool,
    snow: bool,
    storm: bool,
    windy: bool,
    humid: bool,
    sunny: bool,
}

impl<'a> Inputs<'a> {
    fn new(
        obs: &'a WeatherObservation,
        ctx: Option<&'a HourlyContext>,
        prefs: UserPreferences,
        effective: &EffectiveTemperature,
    ) -> Self {
        let precip_prob = ctx.and_then(|c| c.precipitation_probability_pct);

        Self {
            obs,
            ctx,
            prefs,
            comfort_c: effective.value_c.map(|t| t + prefs.bias.offset_c()),
            wet: known(obs.precipitation_mm, |p| p >= 0.2)
                || obs.weather_code.is_some_and(|c| c.is_wet())
                || known(precip_prob, |p| p >= 40.0),
            snow: is_snowy(obs, ctx),
            storm: is_stormy(obs),
            windy: WindLevel::classify(obs).is_windy(),
            humid: known(obs.humidity_pct, |rh| rh >= 75.0)
                || known(effective.dew_point_c, |d| d >= 16.0),
            sunny: known(obs.cloud_cover_pct, |c| c <= 25.0) && known(obs.uv_index, |uv| uv >= 3.0),
        }
    }

    fn precip_prob(&self) -> Option<f64> {
        self.ctx.and_then(|c| c.precipitation_probability_pct)
    }

    fn comfort_at_most(&self, limit: f64) -> bool {
        known(self.comfort_c, |c| c <= limit)
    }

    fn comfort_at_least(&self, limit: f64) -> bool {
        known(self.comfort_c, |c| c >= limit)
    }
}

#[derive(Debug, Default)]
struct Wardrobe {
    outer: Vec<String>,
    top: Vec<String>,
    bottom: Vec<String>,
    accessories: Vec<String>,
    reasons: Vec<String>,
}

fn add(list: &mut Vec<String>, items: &[&str]) {
    list.extend(items.iter().map(|s| s.to_string()));
}

/// A (predicate, effect) pair applied after band selection.
struct Modifier {
    name: &'static str,
    applies: fn(&Inputs<'_>) -> bool,
    apply: fn(&Inputs<'_>, &mut Wardrobe),
}

// Evaluation order is also the order of the reason sentences.
const MODIFIERS: &[Modifier] = &[
    Modifier { name: "wet", applies: |i| i.wet, apply: wet },
    Modifier { name: "snow", applies: |i| i.snow, apply: snow },
    Modifier { name: "storm", applies: |i| i.storm, apply: storm },
    Modifier { name: "windy", applies: |i| i.windy, apply: windy },
    Modifier { name: "sunny", applies: |i| i.sunny, apply: sunny },
    Modifier { name: "bike_walk", applies: |i| i.prefs.bike_walk, apply: bike_walk },
    Modifier { name: "formal", applies: |i| i.prefs.formal, apply: formal },
];

fn base_layers(band: ComfortBand, i: &Inputs<'_>, w: &mut Wardrobe) {
    match band {
        ComfortBand::Freezing => {
            add(&mut w.top, &["thermal base layer (merino/synthetic)", "mid-layer sweater/fleece"]);
            add(&mut w.outer, &["insulated coat (windproof if possible)"]);
            add(&mut w.bottom, &["long pants", "optional thermal leggings if outside >30 min"]);
            add(&mut w.accessories, &["warm socks", "closed shoes/boots"]);
            if i.windy {
                add(&mut w.accessories, &["beanie", "gloves", "scarf/neck gaiter"]);
            }
        }
        ComfortBand::Cold => {
            add(&mut w.top, &["long-sleeve", "mid-layer (sweater/light fleece)"]);
            add(&mut w.outer, &["jacket (wind-resistant)"]);
            add(&mut w.bottom, &["pants"]);
            add(&mut w.accessories, &["closed shoes"]);
            if i.windy {
                add(&mut w.accessories, &["windproof outer layer"]);
            }
        }
        ComfortBand::Cool => {
            add(&mut w.top, &["t-shirt", "light layer (overshirt/cardigan)"]);
            add(&mut w.outer, &["optional light jacket if you'll be out late"]);
            add(&mut w.bottom, &["jeans/chinos"]);
            add(&mut w.accessories, &["sneakers"]);
        }
        ComfortBand::Mild => {
            add(&mut w.top, &["t-shirt or light long-sleeve"]);
            add(&mut w.bottom, &["light pants or jeans"]);
            add(&mut w.outer, &["optional thin layer for wind/AC"]);
            add(&mut w.accessories, &["breathable shoes"]);
            if i.sunny {
                add(&mut w.accessories, &["sunglasses"]);
            }
            if i.windy {
                add(&mut w.accessories, &["thin windbreaker (packable)"]);
            }
        }
        ComfortBand::Warm => {
            add(&mut w.top, &["t-shirt (breathable)"]);
            add(&mut w.bottom, &["light pants or shorts"]);
            add(&mut w.accessories, &["breathable shoes"]);
            if i.sunny {
                add(&mut w.accessories, &["sunglasses", "SPF (face/neck)"]);
            }
            if i.humid {
                add(&mut w.accessories, &["choose moisture-wicking fabric"]);
            }
        }
        ComfortBand::Hot => {
            add(&mut w.top, &["very light top (linen/mesh/cotton)"]);
            add(&mut w.bottom, &["shorts or very light pants"]);
            add(&mut w.accessories, &["breathable shoes/sandals", "water bottle (if outside)"]);
            if i.sunny {
                add(&mut w.accessories, &["hat", "SPF 30+", "sunglasses"]);
            }
            if i.humid {
                add(&mut w.accessories, &["moisture-wicking underwear/socks", "avoid heavy denim"]);
            }
        }
    }
}

fn wet(i: &Inputs<'_>, w: &mut Wardrobe) {
    let shell = if i.windy { "waterproof shell (hood)" } else { "rain jacket / shell" };
    w.outer.insert(0, shell.to_string());
    if !i.windy {
        add(&mut w.accessories, &["umbrella (optional)"]);
    }
    add(&mut w.accessories, &["water-resistant shoes"]);
    if known(i.precip_prob(), |p| p >= 60.0) || known(i.obs.precipitation_mm, |p| p >= 1.0) {
        add(&mut w.accessories, &["avoid suede / consider spare socks"]);
    }

    let mut reason = format!("Wet risk: {}", condition::describe(i.obs.weather_code));
    if i.obs.precipitation_mm.is_some() {
        reason.push_str(&format!("; precip ~{}", fmt1(i.obs.precipitation_mm, " mm/h")));
    }
    if i.precip_prob().is_some() {
        reason.push_str(&format!(", chance ~{}", fmt0(i.precip_prob(), "%")));
    }
    reason.push('.');
    w.reasons.push(reason);
}

fn snow(i: &Inputs<'_>, w: &mut Wardrobe) {
    w.outer.insert(0, "insulated shell".to_string());
    add(&mut w.accessories, &["boots with grip"]);
    w.reasons.push(format!("Snowy conditions ({}).", condition::describe(i.obs.weather_code)));
}

fn storm(_: &Inputs<'_>, w: &mut Wardrobe) {
    add(&mut w.accessories, &["avoid umbrellas if gusty", "consider postponing if exposed"]);
    w.reasons.push("Thunderstorm conditions.".to_string());
}

fn windy(i: &Inputs<'_>, w: &mut Wardrobe) {
    w.reasons.push(format!(
        "Wind: {} (gusts {}).",
        fmt0(i.obs.wind_speed_kmh, " km/h"),
        fmt0(i.obs.wind_gust_kmh, " km/h")
    ));
    add(&mut w.accessories, &["secure hat/hood", "avoid very loose outerwear"]);
}

fn sunny(i: &Inputs<'_>, w: &mut Wardrobe) {
    w.reasons.push(format!(
        "Sun/UV: UV ~{} with low cloud cover ({}).",
        fmt1(i.obs.uv_index, ""),
        fmt0(i.obs.cloud_cover_pct, "%")
    ));
    add(&mut w.accessories, &["sunglasses"]);
    if known(i.obs.uv_index, |uv| uv >= 6.0) {
        add(&mut w.accessories, &["SPF 30+", "hat", "seek shade mid-day"]);
    } else {
        add(&mut w.accessories, &["SPF (face/neck)"]);
    }
}

fn bike_walk(_: &Inputs<'_>, w: &mut Wardrobe) {
    add(
        &mut w.accessories,
        &["light windbreaker (packable)", "avoid heavy fabrics", "prefer breathable layers you can vent"],
    );
    w.reasons.push("Activity: bike/walk → plan for wind + sweat (layers > heavy coat).".to_string());
}

fn formal(_: &Inputs<'_>, w: &mut Wardrobe) {
    substitute(&mut w.top, TOP_FORMAL);
    substitute(&mut w.bottom, BOTTOM_FORMAL);
    w.reasons.push("You prefer formal-ish: recommending smarter basics.".to_string());
}

/// Replaces the first occurrence of each casual pattern in every item, then
/// collapses "a/b" alternatives that became the same piece.
fn substitute(items: &mut [String], table: &[(&str, &str)]) {
    for item in items.iter_mut() {
        let mut changed = false;
        for (casual, smart) in table {
            if item.contains(casual) {
                *item = item.replacen(casual, smart, 1);
                changed = true;
            }
        }
        if changed {
            *item = collapse_alternatives(item);
        }
    }
}

fn collapse_alternatives(item: &str) -> String {
    let mut seen = HashSet::new();
    item.split('/').filter(|alt| seen.insert(alt.trim())).collect::<Vec<_>>().join("/")
}

/// First-occurrence order, blanks dropped.
fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| !s.is_empty() && seen.insert(s.clone()))
        .collect()
}

fn context_reasons(i: &Inputs<'_>, effective: &EffectiveTemperature, w: &mut Wardrobe) {
    match effective.value_c {
        Some(_) => {
            let mut reason =
                format!("Effective temp: ~{} ({})", fmt1(effective.value_c, "°C"), effective.source.label());
            if i.prefs.bias.offset_c() != 0.0 {
                reason.push_str(&format!(
                    ", adjusted to ~{} for your preference",
                    fmt1(i.comfort_c, "°C")
                ));
            }
            reason.push('.');
            w.reasons.push(reason);
        }
        None => w.reasons.push("Effective temp unavailable; base layers skipped.".to_string()),
    }

    if let Some(dew) = effective.dew_point_c {
        w.reasons.push(format!(
            "Dew point ~{} ({}).",
            fmt1(Some(dew), "°C"),
            DewPointFeel::from_dew_point(dew).as_str()
        ));
    }
    if i.precip_prob().is_some() {
        w.reasons.push(format!("Precip chance this hour: ~{}.", fmt0(i.precip_prob(), "%")));
    }
    let next = i.ctx.and_then(|c| c.next_hours_precipitation_mm);
    if known(next, |mm| mm >= 0.5) {
        w.reasons.push(format!("Next ~2h precip: ~{}.", fmt1(next, " mm")));
    }
}

fn tips(i: &Inputs<'_>) -> Vec<String> {
    let mut tips = Vec::new();
    if known(i.precip_prob(), |p| p >= 50.0) || known(i.obs.precipitation_mm, |p| p >= 0.5) {
        tips.push("If you'll be out >15 min: pick a hooded shell + water-resistant shoes.".to_string());
    }
    if i.windy && i.comfort_at_most(10.0) {
        tips.push(
            "If you get cold easily: add a windproof layer (wind matters more than temperature)."
                .to_string(),
        );
    }
    if known(i.obs.uv_index, |uv| uv >= 6.0) {
        tips.push("If you're outdoors mid-day: SPF + hat.".to_string());
    }
    tips
}

fn badge(i: &Inputs<'_>) -> BadgeLevel {
    if i.storm || i.snow {
        BadgeLevel::Severe
    } else if i.wet || i.windy || i.comfort_at_most(2.0) || i.comfort_at_least(28.0) {
        BadgeLevel::Cautionary
    } else {
        BadgeLevel::Comfortable
    }
}

/// Builds a deduplicated, explained wardrobe recommendation for the observation.
pub fn derive_recommendation(
    obs: &WeatherObservation,
    ctx: Option<&HourlyContext>,
    prefs: UserPreferences,
) -> Recommendation {
    let effective = EffectiveTemperature::select(obs);
    let inputs = Inputs::new(obs, ctx, prefs, &effective);
    let mut w = Wardrobe::default();

    context_reasons(&inputs, &effective, &mut w);

    let band = inputs.comfort_c.map(ComfortBand::for_comfort);
    if let Some(band) = band {
        base_layers(band, &inputs, &mut w);
    }

    let fired: Vec<&str> = MODIFIERS
        .iter()
        .filter(|m| (m.applies)(&inputs))
        .map(|m| {
            (m.apply)(&inputs, &mut w);
            m.name
        })
        .collect();

    let badge = badge(&inputs);
    tracing::debug!(comfort_c = ?inputs.comfort_c, ?band, ?fired, ?badge, "derived recommendation");

    Recommendation {
        badge,
        badge_text: badge.text().to_string(),
        outer: dedup(w.outer),
        top: dedup(w.top),
        bottom: dedup(w.bottom),
        accessories: dedup(w.accessories),
        tips: tips(&inputs),
        reasons: w.reasons,
    }
}
