use crate::domain::fare::{FareOption, FareQueryResult};
use crate::domain::search::SearchConfig;
use crate::money::format_price;
use crate::time::window::DateWindow;

#[derive(Debug, Clone, PartialEq)]
pub struct FareAlert {
    pub price: f64,
    pub airline: Option<String>,
    pub duration_minutes: Option<u32>,
    pub stops: usize,
    pub results_url: Option<String>,
    pub search_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    NothingFound,
    /// Options were returned but none carried a usable price.
    NoUsablePrice,
    AboveTarget { min_price: f64 },
    TargetMet(FareAlert),
}

impl Evaluation {
    pub fn is_alert(&self) -> bool {
        matches!(self, Evaluation::TargetMet(_))
    }
}

/// Cheapest option and its price. Ties keep the first option seen.
pub fn select_cheapest<'a, I>(options: I) -> Option<(&'a FareOption, f64)>
where
    I: IntoIterator<Item = &'a FareOption>,
{
    let mut best: Option<(&'a FareOption, f64)> = None;
    for (idx, option) in options.into_iter().enumerate() {
        let Some(price) = option.usable_price() else {
            tracing::debug!(idx, price = ?option.price, "fare option has no usable price; ignoring");
            continue;
        };
        match best {
            Some((_, min)) if price >= min => {}
            _ => best = Some((option, price)),
        }
    }
    best
}

pub fn evaluate(result: &FareQueryResult, window: &DateWindow, config: &SearchConfig) -> Evaluation {
    if result.is_empty() {
        tracing::info!(%window, "no flights found");
        return Evaluation::NothingFound;
    }

    let Some((cheapest, min_price)) = select_cheapest(result.options()) else {
        tracing::warn!(%window, "no valid price among returned flights");
        return Evaluation::NoUsablePrice;
    };

    let price_fmt = format_price(&config.currency, min_price);
    let target_fmt = format_price(&config.currency, config.target_price);

    tracing::info!(%window, price = %price_fmt, "lowest fare found");

    if min_price > config.target_price {
        tracing::info!(
            %window,
            price = %price_fmt,
            target = %target_fmt,
            "lowest fare is above target"
        );
        return Evaluation::AboveTarget { min_price };
    }

    let alert = FareAlert {
        price: min_price,
        airline: cheapest.leading_airline().map(str::to_string),
        duration_minutes: cheapest.total_duration,
        stops: cheapest.stops(),
        results_url: result.results_url().map(str::to_string),
        search_id: result.search_id().map(str::to_string),
    };

    tracing::warn!(%window, target = %target_fmt, "!!! LOW FARE ALERT !!! target price reached");
    tracing::warn!(
        %window,
        price = %price_fmt,
        airline = alert.airline.as_deref().unwrap_or("unknown"),
        duration_minutes = ?alert.duration_minutes,
        stops = alert.stops,
        url = alert.results_url.as_deref().unwrap_or("-"),
        search_id = alert.search_id.as_deref().unwrap_or("-"),
        "best flight details"
    );

    Evaluation::TargetMet(alert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fare::{FlightSegment, SearchMetadata};
    use chrono::NaiveDate;
    use serde_json::json;

    fn window() -> DateWindow {
        DateWindow::new(NaiveDate::from_ymd_opt(2025, 4, 17).unwrap(), 7)
    }

    fn option(price: Option<f64>, airline: &str, segments: usize) -> FareOption {
        FareOption {
            price,
            flights: (0..segments)
                .map(|i| FlightSegment {
                    airline: Some(if i == 0 { airline.to_string() } else { format!("{airline}-{i}") }),
                })
                .collect(),
            total_duration: Some(600 + segments as u32 * 60),
        }
    }

    fn result(options: Vec<FareOption>) -> FareQueryResult {
        FareQueryResult {
            best_flights: Some(options),
            other_flights: None,
            search_metadata: Some(SearchMetadata {
                id: Some("search-1".to_string()),
                google_flights_url: Some("https://example.test/flights".to_string()),
            }),
        }
    }

    #[test]
    fn alerts_when_cheapest_is_below_target() {
        let cfg = SearchConfig::default();
        let r = result(vec![
            option(Some(9500.0), "LATAM", 2),
            option(Some(7800.0), "Azul", 3),
        ]);

        match evaluate(&r, &window(), &cfg) {
            Evaluation::TargetMet(alert) => {
                assert_eq!(alert.price, 7800.0);
                assert_eq!(alert.airline.as_deref(), Some("Azul"));
                assert_eq!(alert.stops, 2);
                assert_eq!(alert.duration_minutes, Some(780));
                assert_eq!(alert.results_url.as_deref(), Some("https://example.test/flights"));
                assert_eq!(alert.search_id.as_deref(), Some("search-1"));
            }
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[test]
    fn no_alert_when_all_above_target() {
        let cfg = SearchConfig::default();
        let r = result(vec![
            option(Some(8500.0), "LATAM", 1),
            option(Some(9000.0), "Azul", 1),
        ]);

        let eval = evaluate(&r, &window(), &cfg);
        assert!(!eval.is_alert());
        assert_eq!(eval, Evaluation::AboveTarget { min_price: 8500.0 });
    }

    #[test]
    fn price_equal_to_target_alerts() {
        let cfg = SearchConfig::default();
        let r = result(vec![option(Some(8000.0), "GOL", 1)]);
        assert!(evaluate(&r, &window(), &cfg).is_alert());
    }

    #[test]
    fn empty_options_are_nothing_found() {
        let cfg = SearchConfig::default();
        assert_eq!(evaluate(&result(vec![]), &window(), &cfg), Evaluation::NothingFound);
        assert_eq!(
            evaluate(&FareQueryResult::default(), &window(), &cfg),
            Evaluation::NothingFound
        );
    }

    #[test]
    fn options_without_prices_are_no_usable_price() {
        let cfg = SearchConfig::default();
        let r = result(vec![option(None, "LATAM", 1), option(Some(f64::NAN), "Azul", 1)]);
        assert_eq!(evaluate(&r, &window(), &cfg), Evaluation::NoUsablePrice);
    }

    #[test]
    fn unpriced_options_are_ignored_when_others_are_priced() {
        let cfg = SearchConfig::default();
        let r = result(vec![option(None, "LATAM", 1), option(Some(7000.0), "Azul", 1)]);
        match evaluate(&r, &window(), &cfg) {
            Evaluation::TargetMet(alert) => assert_eq!(alert.airline.as_deref(), Some("Azul")),
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[test]
    fn ties_keep_the_first_option() {
        let options = vec![
            option(Some(9000.0), "A", 1),
            option(Some(7500.0), "B", 1),
            option(Some(7500.0), "C", 1),
            option(Some(7500.0), "D", 2),
        ];
        let (chosen, price) = select_cheapest(&options).unwrap();
        assert_eq!(price, 7500.0);
        assert_eq!(chosen.leading_airline(), Some("B"));
    }

    #[test]
    fn cheapest_is_no_greater_than_any_option() {
        let prices = [4200.0, 3999.99, 12000.0, 3999.99, 8000.0, 15.0, 16.0];
        let options: Vec<_> = prices.iter().map(|p| option(Some(*p), "X", 1)).collect();
        let (_, min) = select_cheapest(&options).unwrap();
        assert!(prices.iter().all(|p| min <= *p));
        assert_eq!(min, 15.0);
    }

    #[test]
    fn other_flights_are_considered() {
        let cfg = SearchConfig::default();
        let r: FareQueryResult = serde_json::from_value(json!({
            "best_flights": [{"flights": [{"airline": "LATAM"}], "price": 9100}],
            "other_flights": [{"flights": [{"airline": "TAP"}, {"airline": "TAP"}], "price": 7900}]
        }))
        .unwrap();

        match evaluate(&r, &window(), &cfg) {
            Evaluation::TargetMet(alert) => {
                assert_eq!(alert.airline.as_deref(), Some("TAP"));
                assert_eq!(alert.stops, 1);
                assert_eq!(alert.results_url, None);
                assert_eq!(alert.search_id, None);
            }
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[test]
    fn alert_without_segments_reports_unknown_airline() {
        let cfg = SearchConfig::default();
        let r = result(vec![FareOption {
            price: Some(100.0),
            flights: vec![],
            total_duration: None,
        }]);
        match evaluate(&r, &window(), &cfg) {
            Evaluation::TargetMet(alert) => {
                assert_eq!(alert.airline, None);
                assert_eq!(alert.stops, 0);
            }
            other => panic!("expected alert, got {other:?}"),
        }
    }
}
