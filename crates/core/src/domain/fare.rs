use serde::Deserialize;

/// Decoded Google Flights response for one date window.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareQueryResult {
    #[serde(default)]
    pub best_flights: Option<Vec<FareOption>>,
    #[serde(default)]
    pub other_flights: Option<Vec<FareOption>>,
    #[serde(default)]
    pub search_metadata: Option<SearchMetadata>,
}

impl FareQueryResult {
    /// All returned options in provider order: best flights first, then the rest.
    pub fn options(&self) -> impl Iterator<Item = &FareOption> {
        self.best_flights
            .iter()
            .flatten()
            .chain(self.other_flights.iter().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.options().next().is_none()
    }

    pub fn search_id(&self) -> Option<&str> {
        self.search_metadata.as_ref().and_then(|m| m.id.as_deref())
    }

    pub fn results_url(&self) -> Option<&str> {
        self.search_metadata
            .as_ref()
            .and_then(|m| m.google_flights_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FareOption {
    /// Total itinerary price in the configured currency.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, alias = "segments")]
    pub flights: Vec<FlightSegment>,
    /// Minutes.
    #[serde(default, alias = "duration")]
    pub total_duration: Option<u32>,
}

impl FareOption {
    /// Price usable for comparison; missing and non-finite prices are not.
    pub fn usable_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite())
    }

    pub fn leading_airline(&self) -> Option<&str> {
        self.flights.first().and_then(|s| s.airline.as_deref())
    }

    pub fn stops(&self) -> usize {
        self.flights.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSegment {
    #[serde(default)]
    pub airline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMetadata {
    /// SerpApi search id; lets an alert be traced back in the SerpApi dashboard.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub google_flights_url: Option<String>,
}
