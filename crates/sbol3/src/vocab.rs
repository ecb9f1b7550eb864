//! Well-known URIs of the SBOL3 vocabulary used by this crate.
//!
//! Only the terms needed by the bundled entity types are listed here.
//! Namespace and prefix management belongs to the surrounding tooling.

/// The SBOL3 namespace.
pub const SBOL3_NS: &str = "http://sbols.org/v3#";

/// `rdf:type`, used to declare the type of every graph subject.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Property URIs.
pub mod properties {
    pub const DISPLAY_ID: &str = "http://sbols.org/v3#displayId";
    pub const NAME: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";

    pub const SEQUENCES: &str = "http://sbols.org/v3#hasSequence";
    pub const ORIENTATION: &str = "http://sbols.org/v3#orientation";
    pub const ORDER: &str = "http://sbols.org/v3#order";
    pub const START: &str = "http://sbols.org/v3#start";
    pub const END: &str = "http://sbols.org/v3#end";
    pub const AT: &str = "http://sbols.org/v3#at";

    pub const ROLE: &str = "http://sbols.org/v3#role";
    pub const TYPE: &str = "http://sbols.org/v3#type";
    pub const PARTICIPANT: &str = "http://sbols.org/v3#participant";
    pub const HAS_PARTICIPATION: &str = "http://sbols.org/v3#hasParticipation";
    pub const HAS_LOCATION: &str = "http://sbols.org/v3#hasLocation";
}

/// Type URIs.
pub mod types {
    pub const IDENTIFIED: &str = "http://sbols.org/v3#Identified";
    pub const RANGE: &str = "http://sbols.org/v3#Range";
    pub const CUT: &str = "http://sbols.org/v3#Cut";
    pub const ENTIRE_SEQUENCE: &str = "http://sbols.org/v3#EntireSequence";
    pub const PARTICIPATION: &str = "http://sbols.org/v3#Participation";
    pub const INTERACTION: &str = "http://sbols.org/v3#Interaction";
    pub const SEQUENCE_FEATURE: &str = "http://sbols.org/v3#SequenceFeature";
}

/// Orientation values for locations and features.
pub mod orientation {
    pub const INLINE: &str = "https://identifiers.org/SO:0001030";
    pub const REVERSE_COMPLEMENT: &str = "https://identifiers.org/SO:0001031";
}
