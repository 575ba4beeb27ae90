use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use crate::seat_map_parser::ProcessingError;

// Simplified seat map produced from an OTA_AirSeatMapRS document.
// Field order matches the reference JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatMapResponse {
    pub seats: Vec<Seat>,
    #[serde(serialize_with = "segment_or_empty")]
    pub segment: Option<FlightSegment>,
}

impl SeatMapResponse {
    pub fn priced_seat_count(&self) -> usize {
        self.seats.iter().filter(|s| s.price.is_some()).count()
    }

    pub fn available_seat_count(&self) -> usize {
        self.seats.iter().filter(|s| s.available).count()
    }

    // pretty JSON, 4-space indent
    pub fn to_json_pretty(&self) -> Result<String, ProcessingError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut serializer)
            .map_err(|e| ProcessingError::ConversionError(e.to_string()))?;

        String::from_utf8(buf).map_err(|e| ProcessingError::ConversionError(e.to_string()))
    }
}

// A missing segment is written as `{}`, never dropped or `null`
fn segment_or_empty<S>(segment: &Option<FlightSegment>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match segment {
        Some(segment) => segment.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FlightSegment {
    pub departure: Departure,
    pub arrival: Arrival,
    pub equipment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Departure {
    pub airport: Option<String>,
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Arrival {
    pub airport: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    pub cabin: Option<String>,
    pub number: Option<String>,
    pub price: Option<SeatPrice>,
    pub available: bool,
    #[serde(rename = "type")]
    pub seat_type: SeatType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SeatType {
    #[default]
    Seat,
    Bathroom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatPrice {
    pub fee: Charge,
    pub taxes: Option<Charge>,
}

// Amounts stay as the raw attribute text (e.g. "5900" with implied decimals)
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Charge {
    pub amount: Option<String>,
    pub currency: Option<String>,
}
