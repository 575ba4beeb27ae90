// OTA_AirSeatMapRS extraction
use std::path::Path;

use roxmltree::Node;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::seat_map::{
    Arrival, Charge, Departure, FlightSegment, Seat, SeatMapResponse, SeatPrice, SeatType,
};
use crate::xml_tree;

pub const OTA_NAMESPACE: &str = "http://www.opentravel.org/OTA/2003/05/common/";

// Error types for seat map processing
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("XML parse error: {0}")]
    XmlParseError(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ParserConfig {
    // namespace every looked-up element must belong to
    pub namespace: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            namespace: OTA_NAMESPACE.to_string(),
        }
    }
}

impl ParserConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

pub struct SeatMapParser {
    config: ParserConfig,
}

impl Default for SeatMapParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatMapParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    // Parse the XML document and extract the seat map
    pub fn process(&self, xml: &str) -> Result<SeatMapResponse, ProcessingError> {
        let doc = xml_tree::parse(xml)?;
        self.parse_seat_map_response(doc.root_element())
    }

    // Missing FlightSegmentInfo gives an empty segment, missing SeatMapDetails is an error
    pub fn parse_seat_map_response(
        &self,
        root: Node<'_, '_>,
    ) -> Result<SeatMapResponse, ProcessingError> {
        let segment = match self.find(root, "FlightSegmentInfo") {
            Some(info) => {
                let segments = self.find_all(root, "FlightSegmentInfo").count();
                if segments > 1 {
                    warn!(segments, "multiple flight segments found, using the first one");
                }
                Some(self.parse_flight_segment_info(info))
            }
            None => {
                debug!("no FlightSegmentInfo in document");
                None
            }
        };

        let details = self.find(root, "SeatMapDetails").ok_or_else(|| {
            ProcessingError::MissingRequiredField(format!(
                "SeatMapDetails element in namespace {}",
                self.config.namespace
            ))
        })?;
        let seats = self.parse_seat_map_details(details);

        Ok(SeatMapResponse { seats, segment })
    }

    pub fn parse_flight_segment_info(&self, info: Node<'_, '_>) -> FlightSegment {
        FlightSegment {
            departure: Departure {
                airport: self.child_attr(info, "DepartureAirport", "LocationCode"),
                datetime: info.attribute("DepartureDateTime").map(str::to_string),
            },
            arrival: Arrival {
                airport: self.child_attr(info, "ArrivalAirport", "LocationCode"),
            },
            equipment: self.child_attr(info, "Equipment", "AirEquipType"),
        }
    }

    // Cabin classes, then their rows, then seats, all in document order
    pub fn parse_seat_map_details(&self, details: Node<'_, '_>) -> Vec<Seat> {
        let mut seats = Vec::new();
        for cabin_class in xml_tree::element_children(details) {
            for seat_row in xml_tree::element_children(cabin_class) {
                seats.extend(self.parse_seat_row(seat_row));
            }
        }
        debug!(seats = seats.len(), "extracted seat map details");
        seats
    }

    fn parse_seat_row(&self, seat_row: Node<'_, '_>) -> Vec<Seat> {
        let cabin = seat_row.attribute("CabinType").map(str::to_lowercase);
        self.find_all(seat_row, "SeatInfo")
            .map(|seat| self.parse_seat(seat, cabin.clone()))
            .collect()
    }

    pub fn parse_seat(&self, seat: Node<'_, '_>, cabin: Option<String>) -> Seat {
        Seat {
            cabin,
            number: self.child_attr(seat, "Summary", "SeatNumber"),
            price: self.seat_pricing(seat),
            available: self.seat_availability(seat),
            seat_type: self.seat_type(seat),
        }
    }

    // Only the exact string "true" counts
    fn seat_availability(&self, seat: Node<'_, '_>) -> bool {
        self.find(seat, "Summary")
            .and_then(|summary| summary.attribute("AvailableInd"))
            == Some("true")
    }

    fn seat_type(&self, seat: Node<'_, '_>) -> SeatType {
        let lavatory = self
            .find_all(seat, "Features")
            .any(|feature| feature.attribute("extension") == Some("Lavatory"));
        if lavatory {
            SeatType::Bathroom
        } else {
            SeatType::Seat
        }
    }

    // Service present but without a Fee means no price, same as no Service
    fn seat_pricing(&self, seat: Node<'_, '_>) -> Option<SeatPrice> {
        let service = self.find(seat, "Service")?;
        let fee = self.find(service, "Fee")?;
        let taxes = self.find(fee, "Taxes").map(charge);
        Some(SeatPrice {
            fee: charge(fee),
            taxes,
        })
    }

    // Read input, extract the seat map and write it as pretty JSON to output
    #[instrument(skip(self, input, output), fields(input = %input.as_ref().display()))]
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<SeatMapResponse, ProcessingError> {
        let xml = std::fs::read_to_string(input.as_ref())?;
        let response = self.process(&xml)?;
        std::fs::write(output.as_ref(), response.to_json_pretty()?)?;

        info!(
            output = %output.as_ref().display(),
            seats = response.seats.len(),
            priced = response.priced_seat_count(),
            available = response.available_seat_count(),
            "seat map written"
        );
        Ok(response)
    }

    // Helper method to load the sample seat map XML
    pub fn load_sample_response(&self) -> Result<String, ProcessingError> {
        match std::fs::read_to_string(SAMPLE_XML_PATH) {
            Ok(content) => Ok(content),
            Err(e) => Err(ProcessingError::IoError(e)),
        }
    }

    fn find<'a, 'input: 'a>(&self, node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        xml_tree::find(node, &self.config.namespace, name)
    }

    fn find_all<'a, 'input: 'a, 's>(
        &'s self,
        node: Node<'a, 'input>,
        name: &'s str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + 's
    where
        'a: 's,
    {
        xml_tree::find_all(node, &self.config.namespace, name)
    }

    fn child_attr(&self, node: Node<'_, '_>, name: &str, attr: &str) -> Option<String> {
        xml_tree::child_attr(node, &self.config.namespace, name, attr).map(str::to_string)
    }
}

fn charge(node: Node<'_, '_>) -> Charge {
    Charge {
        amount: node.attribute("Amount").map(str::to_string),
        currency: node.attribute("CurrencyCode").map(str::to_string),
    }
}

// Sample file path (the actual file is stored in the samples directory)
pub const SAMPLE_XML_PATH: &str = "samples/OTA_AirSeatMapRS.xml";
