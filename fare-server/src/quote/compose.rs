//! The fare pipeline.

use serde_json::Value;

use super::render::map_url;
use super::{FareQuote, FareReply, QuoteSource, QuotedPrice};
use crate::config::FareContext;
use crate::duration::normalize_minutes;
use crate::pricing::{LiveQuote, PricingError, PricingService, coerce_number};
use crate::route::{
    extract_route, rewrite_distance_query, rewrite_separated_route, rewrite_two_place_names,
};
use crate::tariff::{fits_rounding, is_night_tariff};

/// Answer a free-text fare question.
///
/// Distance questions are first rewritten into a route from the default
/// area, and shorthands such as "Πάτρα-Ρίο" or "Πάτρα Πρέβεζα" into a full
/// route sentence. If no complete route can be recovered the reply is a
/// clarification prompt; otherwise the trip is priced by
/// [`quote_route`]'s pipeline with night detection over the message and
/// `when`.
pub async fn quote_trip<P: PricingService>(
    ctx: &FareContext,
    pricing: &P,
    message: &str,
    when: &str,
) -> FareReply {
    let rewritten = rewrite_distance_query(message, ctx.default_area())
        .or_else(|| rewrite_separated_route(message))
        .or_else(|| rewrite_two_place_names(message));
    let route = extract_route(rewritten.as_deref().unwrap_or(message));
    tracing::debug!(?route, rewritten = rewritten.is_some(), "route extracted");

    let Some((origin, destination)) = route.both() else {
        return clarify(ctx);
    };

    let night = is_night_tariff(message, when);
    price_route(ctx, pricing, origin, destination, when, night).await
}

/// Price a trip whose endpoints are already known.
///
/// Night detection applies the clock rule to `when` only.
pub async fn quote_route<P: PricingService>(
    ctx: &FareContext,
    pricing: &P,
    origin: &str,
    destination: &str,
    when: &str,
) -> FareReply {
    let (origin, destination) = (origin.trim(), destination.trim());
    if origin.is_empty() || destination.is_empty() {
        return clarify(ctx);
    }

    let night = is_night_tariff("", when);
    price_route(ctx, pricing, origin, destination, when, night).await
}

fn clarify(ctx: &FareContext) -> FareReply {
    FareReply::Clarify {
        prompt: ctx.text().ask_trip_route.clone(),
    }
}

async fn price_route<P: PricingService>(
    ctx: &FareContext,
    pricing: &P,
    origin: &str,
    destination: &str,
    when: &str,
    night: bool,
) -> FareReply {
    let quote = match pricing.quote(origin, destination, when).await {
        Ok(live) => {
            tracing::info!(origin, destination, night, "quoting from live pricing");
            from_live(ctx, &live, origin, destination, night)
        }
        Err(PricingError::NotConfigured) => {
            tracing::debug!(origin, destination, night, "quoting offline");
            from_fallback(ctx, origin, destination, night)
        }
        Err(err) => {
            tracing::warn!(%err, origin, destination, "pricing unavailable, using fallback");
            from_fallback(ctx, origin, destination, night)
        }
    };
    FareReply::Quote(quote)
}

/// Use what the live service sent, filling gaps offline.
fn from_live(
    ctx: &FareContext,
    live: &LiveQuote,
    origin: &str,
    destination: &str,
    night: bool,
) -> FareQuote {
    let distance_km = live
        .distance_km()
        .unwrap_or_else(|| ctx.distances().rough_distance_km(origin, destination));

    let price = match live.price() {
        Some(value) => match coerce_number(value).filter(|eur| fits_rounding(*eur)) {
            Some(eur) => QuotedPrice::estimate(eur),
            None => QuotedPrice::Raw {
                value: raw_text(value),
            },
        },
        None => QuotedPrice::estimate(ctx.tariff().estimate(distance_km, night).price_eur),
    };

    let duration_min = normalize_minutes(live.duration().as_ref(), Some(distance_km));

    let map_url = live
        .map_url()
        .map(str::to_string)
        .unwrap_or_else(|| map_url(origin, destination));

    FareQuote {
        origin: origin.to_string(),
        destination: destination.to_string(),
        night,
        source: QuoteSource::Live,
        price,
        distance_km,
        duration_min,
        map_url,
    }
}

/// Fallback distance table and tariff only.
fn from_fallback(ctx: &FareContext, origin: &str, destination: &str, night: bool) -> FareQuote {
    let distance_km = ctx.distances().rough_distance_km(origin, destination);
    let estimate = ctx.tariff().estimate(distance_km, night);

    FareQuote {
        origin: origin.to_string(),
        destination: destination.to_string(),
        night,
        source: QuoteSource::Fallback,
        price: QuotedPrice::estimate(estimate.price_eur),
        distance_km: estimate.distance_km,
        duration_min: Some(estimate.duration_min),
        map_url: map_url(origin, destination),
    }
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::pricing::Pricing;

    /// Replies with a fixed body, or fails.
    struct MockPricing {
        body: Option<Value>,
    }

    impl MockPricing {
        fn answering(body: Value) -> Self {
            Self { body: Some(body) }
        }

        fn failing() -> Self {
            Self { body: None }
        }
    }

    impl PricingService for MockPricing {
        async fn quote(
            &self,
            _origin: &str,
            _destination: &str,
            _when: &str,
        ) -> Result<LiveQuote, PricingError> {
            match &self.body {
                Some(body) => LiveQuote::from_value(body.clone()),
                None => Err(PricingError::Api {
                    status: 503,
                    message: "down".into(),
                }),
            }
        }
    }

    fn ctx() -> FareContext {
        FareContext::builtin().unwrap()
    }

    async fn offline(message: &str, when: &str) -> FareReply {
        quote_trip(&ctx(), &Pricing::Offline, message, when).await
    }

    fn expect_quote(reply: FareReply) -> FareQuote {
        match reply {
            FareReply::Quote(q) => q,
            FareReply::Clarify { prompt } => panic!("unexpected clarification: {prompt}"),
        }
    }

    #[tokio::test]
    async fn empty_message_asks_for_route() {
        let reply = offline("", "now").await;
        assert_eq!(
            reply,
            FareReply::Clarify {
                prompt: ctx().text().ask_trip_route.clone()
            }
        );
        assert!(reply.quote().is_none());
    }

    #[tokio::test]
    async fn unrecognized_or_partial_route_asks_for_route() {
        assert!(matches!(offline("τι ώρα είναι", "now").await, FareReply::Clarify { .. }));
        assert!(matches!(
            offline("από Πάτρα μέχρι πού;", "now").await,
            FareReply::Clarify { .. }
        ));
    }

    #[tokio::test]
    async fn offline_fallback_quote() {
        let q = expect_quote(offline("από Πάτρα μέχρι Αθήνα πόσο κάνει;", "now").await);
        assert_eq!(q.origin, "Πάτρα");
        assert_eq!(q.destination, "Αθήνα");
        assert_eq!(q.source, QuoteSource::Fallback);
        assert!(!q.night);
        assert_eq!(q.distance_km, 275.0);
        assert_eq!(q.duration_min, Some(194));
        assert_eq!(q.price, QuotedPrice::estimate(251.5));
        match q.price {
            QuotedPrice::Estimate {
                rounded_eur,
                low_eur,
                high_eur,
                ..
            } => assert_eq!((rounded_eur, low_eur, high_eur), (250, 230, 270)),
            QuotedPrice::Raw { .. } => panic!("expected an estimate"),
        }
        assert_eq!(q.map_url, map_url("Πάτρα", "Αθήνα"));
    }

    #[tokio::test]
    async fn night_keyword_uses_night_rate() {
        let q = expect_quote(offline("νυχτερινή διαδρομή από Πάτρα μέχρι Αθήνα", "now").await);
        assert!(q.night);
        // 4 + 1.25 * 275
        assert_eq!(q.price, QuotedPrice::estimate(347.75));
    }

    #[tokio::test]
    async fn night_clock_uses_night_rate() {
        let q = expect_quote(offline("από Πάτρα μέχρι Αθήνα", "03:15").await);
        assert!(q.night);
    }

    #[tokio::test]
    async fn unknown_pair_uses_default_distance() {
        let q = expect_quote(offline("από Ρίο μέχρι Ναύπακτο", "now").await);
        assert_eq!(q.distance_km, 200.0);
        assert_eq!(q.price, QuotedPrice::estimate(184.0));
    }

    #[tokio::test]
    async fn distance_question_starts_from_default_area() {
        let q = expect_quote(offline("πόσα χιλιόμετρα είναι μέχρι Αθήνα;", "now").await);
        assert_eq!(q.origin, "Πάτρα");
        assert_eq!(q.destination, "Αθήνα");
        assert_eq!(q.distance_km, 275.0);
    }

    #[tokio::test]
    async fn route_shorthands_are_quoted() {
        let q = expect_quote(offline("Πάτρα Αθήνα", "now").await);
        assert_eq!((q.origin.as_str(), q.destination.as_str()), ("Πάτρα", "Αθήνα"));
        assert_eq!(q.distance_km, 275.0);

        let q = expect_quote(offline("πάτρα-καλαμάτα πόσο κάνει;", "now").await);
        assert_eq!((q.origin.as_str(), q.destination.as_str()), ("πάτρα", "καλαμάτα"));
        assert_eq!(q.distance_km, 210.0);

        assert!(matches!(
            offline("φαρμακείο Ρίο", "now").await,
            FareReply::Clarify { .. }
        ));
    }

    #[tokio::test]
    async fn live_quote_is_preferred() {
        let pricing = MockPricing::answering(json!({
            "price_eur": 238.4,
            "distance_km": 262.0,
            "duration": "PT2H55M",
            "map_url": "https://maps.example/route/1",
        }));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Αθήνα", "now").await);
        assert_eq!(q.source, QuoteSource::Live);
        assert_eq!(q.price, QuotedPrice::estimate(238.4));
        assert_eq!(q.distance_km, 262.0);
        assert_eq!(q.duration_min, Some(175));
        assert_eq!(q.map_url, "https://maps.example/route/1");
    }

    #[tokio::test]
    async fn live_gaps_are_filled_offline() {
        let pricing = MockPricing::answering(json!({"km": 100}));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Πύργο", "now").await);
        assert_eq!(q.source, QuoteSource::Live);
        // price derived from the live distance
        assert_eq!(q.price, QuotedPrice::estimate(94.0));
        // duration estimated from the live distance
        assert_eq!(q.duration_min, Some(71));
        assert_eq!(q.map_url, map_url("Πάτρα", "Πύργο"));

        let pricing = MockPricing::answering(json!({"fare": 60}));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Λουτράκι", "now").await);
        assert_eq!(q.distance_km, 184.0);
        assert_eq!(q.price, QuotedPrice::estimate(60.0));
    }

    #[tokio::test]
    async fn non_numeric_live_price_is_echoed() {
        let pricing = MockPricing::answering(json!({"price": "κατόπιν συνεννόησης", "minutes": "??"}));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Αθήνα", "now").await);
        assert_eq!(
            q.price,
            QuotedPrice::Raw {
                value: "κατόπιν συνεννόησης".into()
            }
        );
        // unparseable duration falls back to the fallback distance
        assert_eq!(q.duration_min, Some(194));
    }

    #[tokio::test]
    async fn live_failure_falls_back() {
        let q = expect_quote(
            quote_trip(&ctx(), &MockPricing::failing(), "από Πάτρα μέχρι Αθήνα", "now").await,
        );
        assert_eq!(q.source, QuoteSource::Fallback);
        assert_eq!(q.price, QuotedPrice::estimate(251.5));
    }

    #[tokio::test]
    async fn remote_error_falls_back() {
        let pricing = MockPricing::answering(json!({"error": "unavailable"}));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Αθήνα", "now").await);
        assert_eq!(q.source, QuoteSource::Fallback);
    }

    #[tokio::test]
    async fn direct_route_quote() {
        let q = expect_quote(quote_route(&ctx(), &Pricing::Offline, " Πάτρα ", "Καλαμάτα", "now").await);
        assert_eq!(q.origin, "Πάτρα");
        assert_eq!(q.distance_km, 210.0);
        assert!(!q.night);

        let q = expect_quote(quote_route(&ctx(), &Pricing::Offline, "Πάτρα", "Καλαμάτα", "01:00").await);
        assert!(q.night);
    }

    #[tokio::test]
    async fn direct_route_ignores_keywords_in_when() {
        let q = expect_quote(quote_route(&ctx(), &Pricing::Offline, "Πάτρα", "Αθήνα", "night").await);
        assert!(!q.night);
        let q = expect_quote(
            quote_route(&ctx(), &Pricing::Offline, "Πάτρα", "Αθήνα", "νυχτερινή 23:00").await,
        );
        assert!(!q.night);
    }

    #[tokio::test]
    async fn extreme_live_values_degrade() {
        let pricing = MockPricing::answering(json!({
            "price_eur": 1e300,
            "distance_km": 1e300,
            "duration": "PT1H4294967295M",
        }));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Αθήνα", "now").await);
        assert_eq!(q.source, QuoteSource::Live);
        assert_eq!(q.price, QuotedPrice::Raw { value: "1e300".into() });
        // duration estimated from the distance, saturated
        assert_eq!(q.duration_min, Some(u32::MAX));
        let text = FareReply::Quote(q).render(&ctx().text().fare_disclaimer);
        assert!(text.contains("~1e300€"));

        let pricing = MockPricing::answering(json!({
            "distance_km": 1e300,
            "duration_min": -1e300,
        }));
        let q = expect_quote(quote_trip(&ctx(), &pricing, "από Πάτρα μέχρι Αθήνα", "now").await);
        match q.price {
            QuotedPrice::Estimate { rounded_eur, high_eur, .. } => {
                assert_eq!((rounded_eur, high_eur), (i64::MAX, i64::MAX));
            }
            QuotedPrice::Raw { .. } => panic!("expected an estimate"),
        }
        assert_eq!(q.duration_min, Some(0));
    }

    #[tokio::test]
    async fn direct_route_needs_both_ends() {
        let reply = quote_route(&ctx(), &Pricing::Offline, "Πάτρα", "  ", "now").await;
        assert!(matches!(reply, FareReply::Clarify { .. }));
    }

    #[tokio::test]
    async fn rendered_reply_ends_with_disclaimer() {
        let c = ctx();
        let reply = quote_trip(&c, &Pricing::Offline, "apo Patra mexri Athens", "now").await;
        let text = reply.render(&c.text().fare_disclaimer);
        assert!(text.ends_with(&c.text().fare_disclaimer));
        assert!(text.contains("~"));
    }
}
