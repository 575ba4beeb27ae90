// Seat map extraction for OTA_AirSeatMapRS documents

pub mod seat_map;
pub mod seat_map_parser;
pub mod xml_tree;

// Re-export key types for convenience
pub use seat_map::{
    Arrival, Charge, Departure, FlightSegment, Seat, SeatMapResponse, SeatPrice, SeatType,
};
pub use seat_map_parser::{ParserConfig, ProcessingError, SeatMapParser, OTA_NAMESPACE};
